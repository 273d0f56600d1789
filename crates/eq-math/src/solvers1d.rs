//! 1D root-finding solvers.
//!
//! The pricing searches (implied volatility, zero-cost collar strikes) use
//! a Newton iteration whose derivative is a one-sided finite difference.
//! Running out of iterations is a normal outcome here, reported through
//! [`NewtonOutcome`] rather than as an error, so callers can apply their own
//! sentinel conventions.

use eq_core::{errors::Result, Real, Size};

const DEFAULT_MAX_ITERATIONS: Size = 100;
const DEFAULT_ACCURACY: Real = 1.0e-11;

/// Why a [`FiniteDifferenceNewton`] search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewtonStop {
    /// `|f(x)|` dropped below the accuracy.
    Converged,
    /// `f(x + h) == f(x)` (or the difference was not finite).
    FlatDifference,
    /// The next iterate would fall below the configured lower bound.
    BelowLowerBound,
    /// The iteration budget was exhausted.
    MaxIterations,
}

/// Result of a [`FiniteDifferenceNewton`] search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonOutcome {
    /// Last point at which `f` was evaluated.
    pub root: Real,
    /// `f(root)`.
    pub value: Real,
    /// Number of Newton steps evaluated.
    pub iterations: Size,
    /// Stop reason.
    pub stop: NewtonStop,
}

impl NewtonOutcome {
    /// `true` if the search met its accuracy.
    pub fn converged(&self) -> bool {
        self.stop == NewtonStop::Converged
    }
}

/// Newton's method with a forward-difference derivative.
///
/// At each iterate `x` the objective is evaluated at `x` and `x + h(x)`;
/// the update is `x ← x − f(x)·h / (f(x + h) − f(x))`.  The objective may
/// fail (e.g. a lattice cannot be built), in which case the error is
/// propagated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiniteDifferenceNewton {
    accuracy: Real,
    max_iterations: Size,
    lower_bound: Option<Real>,
}

impl Default for FiniteDifferenceNewton {
    fn default() -> Self {
        Self::new(DEFAULT_ACCURACY, DEFAULT_MAX_ITERATIONS)
    }
}

impl FiniteDifferenceNewton {
    /// Create a solver; a non-positive accuracy selects the default.
    pub fn new(accuracy: Real, max_iterations: Size) -> Self {
        Self {
            accuracy: if accuracy > 0.0 {
                accuracy
            } else {
                DEFAULT_ACCURACY
            },
            max_iterations,
            lower_bound: None,
        }
    }

    /// Stop as soon as an update would move below `lower`.
    pub fn with_lower_bound(mut self, lower: Real) -> Self {
        self.lower_bound = Some(lower);
        self
    }

    /// Accuracy on `|f(x)|`.
    pub fn accuracy(&self) -> Real {
        self.accuracy
    }

    /// Run the search from `x0`; `bump` gives the difference step at `x`.
    pub fn solve<F, B>(&self, mut f: F, x0: Real, bump: B) -> Result<NewtonOutcome>
    where
        F: FnMut(Real) -> Result<Real>,
        B: Fn(Real) -> Real,
    {
        let mut x = x0;
        let (mut evaluated, mut fx) = (x0, Real::NAN);
        for iteration in 1..=self.max_iterations {
            fx = f(x)?;
            evaluated = x;
            tracing::trace!(iteration, x, fx, "finite-difference newton step");
            if fx.abs() < self.accuracy {
                return Ok(self.outcome(x, fx, iteration, NewtonStop::Converged));
            }
            let h = bump(x);
            let df = f(x + h)? - fx;
            if df == 0.0 || !df.is_finite() {
                return Ok(self.outcome(x, fx, iteration, NewtonStop::FlatDifference));
            }
            let next = x - fx * h / df;
            if matches!(self.lower_bound, Some(lower) if next < lower) {
                return Ok(self.outcome(x, fx, iteration, NewtonStop::BelowLowerBound));
            }
            x = next;
        }
        Ok(self.outcome(evaluated, fx, self.max_iterations, NewtonStop::MaxIterations))
    }

    fn outcome(&self, root: Real, value: Real, iterations: Size, stop: NewtonStop) -> NewtonOutcome {
        NewtonOutcome {
            root,
            value,
            iterations,
            stop,
        }
    }
}
