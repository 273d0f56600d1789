//! # eq-instruments
//!
//! Contract terms of vanilla equity options: payoff side, exercise style,
//! and the immutable [`ContractSpec`] handed to the lattice pricer.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Call/put payoff side.
pub mod payoff;

/// American/European exercise.
pub mod exercise;

/// `ContractSpec` value object.
pub mod contract;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use contract::ContractSpec;
pub use exercise::ExerciseStyle;
pub use payoff::OptionType;
