//! # eq-math
//!
//! Mathematical utilities used by the lattice and the pricing facade: the
//! standard normal distribution (via statrs), the one-period Black formula,
//! linear interpolation, and a finite-difference Newton search.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Standard normal distribution and the Black forward formula.
pub mod distributions;

/// 1D interpolation.
pub mod interpolations;

/// 1D root-finding solvers.
pub mod solvers1d;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use distributions::{black_formula, normal_cdf};
pub use interpolations::LinearInterpolation;
pub use solvers1d::{FiniteDifferenceNewton, NewtonOutcome, NewtonStop};
