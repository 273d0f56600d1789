//! Zero-cost collar strikes.
//!
//! A collar pairs a bought option with a sold option on the other side.
//! Given the strike of one leg, the solver finds the strike of the other
//! leg whose premium matches, starting from the forward and stepping with
//! a finite-difference Newton update on the strike.

use eq_core::{errors::Result, Real, Size};
use eq_instruments::OptionType;
use eq_math::FiniteDifferenceNewton;

use crate::binomial_engine::BinomialEngine;
use crate::config::CollarConfig;

/// Outcome of a collar strike search.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollarResult {
    /// Strike found (the last iterate if the search did not converge).
    pub strike: Real,
    /// Premium of the solved leg at `strike`.
    pub premium: Real,
    /// Premium of the fixed leg.
    pub target: Real,
    /// Newton steps evaluated.
    pub iterations: Size,
    /// `|premium − target|` met the tolerance.
    pub converged: bool,
}

/// Finds zero-cost collar strikes on one engine.
#[derive(Debug, Clone, Copy)]
pub struct CollarSolver<'a> {
    engine: &'a BinomialEngine,
    config: CollarConfig,
}

impl<'a> CollarSolver<'a> {
    /// Solver with the default [`CollarConfig`].
    pub fn new(engine: &'a BinomialEngine) -> Self {
        Self::with_config(engine, CollarConfig::default())
    }

    /// Solver with explicit settings.
    pub fn with_config(engine: &'a BinomialEngine, config: CollarConfig) -> Self {
        Self { engine, config }
    }

    /// Call strike whose premium equals the put struck at `put_strike`.
    pub fn find_zero_cost_call(&self, put_strike: Real) -> Result<CollarResult> {
        self.solve(OptionType::Call, put_strike)
    }

    /// Put strike whose premium equals the call struck at `call_strike`.
    pub fn find_zero_cost_put(&self, call_strike: Real) -> Result<CollarResult> {
        self.solve(OptionType::Put, call_strike)
    }

    fn solve(&self, side: OptionType, fixed_strike: Real) -> Result<CollarResult> {
        let engine = self.engine;
        let target = engine.price(side.opposite(), fixed_strike)?;
        let start = engine.atm_forward();
        let relative_bump = self.config.relative_bump;

        let outcome = FiniteDifferenceNewton::new(self.config.tolerance, self.config.max_iterations)
            .solve(
                |strike| Ok(engine.price(side, strike)? - target),
                start,
                |strike| relative_bump * strike,
            )?;

        let result = CollarResult {
            strike: outcome.root,
            premium: outcome.value + target,
            target,
            iterations: outcome.iterations,
            converged: outcome.converged(),
        };
        if result.converged {
            tracing::debug!(
                %side,
                fixed_strike,
                strike = result.strike,
                iterations = result.iterations,
                "zero-cost strike found"
            );
        } else {
            tracing::warn!(
                %side,
                fixed_strike,
                strike = result.strike,
                gap = outcome.value,
                stop = ?outcome.stop,
                "zero-cost strike search did not converge"
            );
        }
        Ok(result)
    }
}
