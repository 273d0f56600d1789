//! Pricing and solver settings.
//!
//! Plain value types with `Default` implementations; with the `serde`
//! feature they can be loaded from any serde format.

use eq_core::{Real, Size};
use eq_methods::DividendTreatment;

/// Number of lattice steps used when a caller asks for zero.
pub const DEFAULT_GRID_STEPS: Size = 20;

/// Lattice settings shared by every binomial computation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BinomialConfig {
    /// Lattice steps; `0` selects [`DEFAULT_GRID_STEPS`].
    pub grid_steps: Size,
    /// Replace the three near-the-money nodes before expiry with one-period
    /// Black values.
    pub smoothing: bool,
    /// Use the zero rate to expiry at every step instead of step forwards.
    pub flat: bool,
    /// Dividend convention of the lattice.
    pub treatment: DividendTreatment,
}

impl Default for BinomialConfig {
    fn default() -> Self {
        Self {
            grid_steps: DEFAULT_GRID_STEPS,
            smoothing: true,
            flat: true,
            treatment: DividendTreatment::Additive,
        }
    }
}

impl BinomialConfig {
    /// Configured steps with `0` mapped to the default.
    pub fn effective_grid_steps(&self) -> Size {
        if self.grid_steps == 0 {
            DEFAULT_GRID_STEPS
        } else {
            self.grid_steps
        }
    }

    /// Copy with another number of steps.
    pub fn with_grid_steps(self, grid_steps: Size) -> Self {
        Self { grid_steps, ..self }
    }

    /// Copy with another dividend convention.
    pub fn with_treatment(self, treatment: DividendTreatment) -> Self {
        Self { treatment, ..self }
    }

    /// Copy with smoothing switched on or off.
    pub fn with_smoothing(self, smoothing: bool) -> Self {
        Self { smoothing, ..self }
    }

    /// Copy with the flat-rate switch set.
    pub fn with_flat(self, flat: bool) -> Self {
        Self { flat, ..self }
    }
}

/// Secant search for implied volatility.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ImpliedVolConfig {
    /// Stop once `|price(σ) − target| < tolerance`.
    pub tolerance: Real,
    /// Volatility step of the difference quotient.
    pub step: Real,
    /// Iteration budget.
    pub max_iterations: Size,
}

impl Default for ImpliedVolConfig {
    fn default() -> Self {
        Self {
            tolerance: 1.0e-7,
            step: 1.0e-4,
            max_iterations: 120,
        }
    }
}

/// Newton search for zero-cost collar strikes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CollarConfig {
    /// Stop once the premium difference is below this.
    pub tolerance: Real,
    /// Strike bump as a fraction of the current strike.
    pub relative_bump: Real,
    /// Iteration budget.
    pub max_iterations: Size,
}

impl Default for CollarConfig {
    fn default() -> Self {
        Self {
            tolerance: 1.0e-4,
            relative_bump: 0.01,
            max_iterations: 20,
        }
    }
}
