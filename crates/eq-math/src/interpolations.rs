//! 1D interpolation.

use eq_core::{ensure, errors::Result, Real};

/// Piecewise-linear interpolation, flat outside the node range.
///
/// `f(x) = y[i] + (y[i+1] - y[i]) * (x - x[i]) / (x[i+1] - x[i])` inside
/// `[x[0], x[n-1]]`, `y[0]` to the left and `y[n-1]` to the right.  A single
/// node defines a constant function.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearInterpolation {
    xs: Vec<Real>,
    ys: Vec<Real>,
}

impl LinearInterpolation {
    /// Construct from strictly increasing `xs` and corresponding `ys`.
    ///
    /// # Errors
    /// Returns an error if the slices are empty, differ in length, contain
    /// non-finite values, or `xs` is not strictly increasing.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        ensure!(!xs.is_empty(), "need at least 1 point for interpolation");
        ensure!(
            xs.len() == ys.len(),
            "xs and ys must have the same length ({} vs {})",
            xs.len(),
            ys.len()
        );
        ensure!(
            xs.iter().chain(ys.iter()).all(|v| v.is_finite()),
            "interpolation nodes must be finite"
        );
        ensure!(
            xs.windows(2).all(|w| w[0] < w[1]),
            "xs must be strictly increasing"
        );
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        })
    }

    /// Lower bound of the node range.
    pub fn x_min(&self) -> Real {
        self.xs[0]
    }

    /// Upper bound of the node range.
    pub fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }

    /// The interpolation nodes.
    pub fn xs(&self) -> &[Real] {
        &self.xs
    }

    /// The interpolated values at the nodes.
    pub fn ys(&self) -> &[Real] {
        &self.ys
    }

    /// Evaluate at `x`.
    pub fn value(&self, x: Real) -> Real {
        let n = self.xs.len();
        if x <= self.xs[0] {
            return self.ys[0];
        }
        if x >= self.xs[n - 1] {
            return self.ys[n - 1];
        }
        // x[0] < x < x[n-1], so the left node index is in 0..n-1
        let i = self.xs.partition_point(|&xi| xi <= x) - 1;
        let dx = self.xs[i + 1] - self.xs[i];
        self.ys[i] + (x - self.xs[i]) * (self.ys[i + 1] - self.ys[i]) / dx
    }
}
