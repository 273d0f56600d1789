//! # eq-methods
//!
//! Recombining binomial lattices for equities paying discrete cash
//! dividends, the backward-induction pricer that runs on them, and the
//! perturbation engine that turns repeated lattice prices into Greeks.
//!
//! # Modules
//!
//! * [`lattice`]: the [`Lattice`] capability and its additive and
//!   proportional dividend variants, plus the [`LatticeFactory`] used to
//!   rebuild lattices under perturbed inputs
//! * [`pricer`]: [`PriceGrid`], backward induction with early exercise and
//!   near-the-money smoothing
//! * [`greeks`]: [`GreeksEngine`] producing Delta, Gamma, Vega and Theta

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Dividend-adjusted binomial lattices.
pub mod lattice;

/// Backward-induction pricing on a lattice.
pub mod pricer;

/// Greeks by lattice perturbation.
pub mod greeks;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use greeks::{GreeksEngine, GreeksResult};
pub use lattice::{
    AdditiveDividendLattice, DividendTreatment, Lattice, LatticeFactory, LatticeParams,
    ProportionalDividendLattice, StepFactors, TriangularMatrix,
};
pub use pricer::{PriceGrid, UNINITIALIZED_PRICE};
