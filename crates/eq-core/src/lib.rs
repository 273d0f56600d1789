//! # eq-core
//!
//! Core types and error definitions shared by every crate of the equity
//! lattice pricer: numeric type aliases, the error enum, and the `ensure!`
//! macro.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types and the `ensure!` macro.
pub mod errors;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the library.
pub type Real = f64;

/// Alias used for array sizes / indices.
pub type Size = usize;

/// A rate expressed as a decimal (e.g. 0.05 = 5 %), continuously compounded.
pub type Rate = Real;

/// A discount factor in [0, 1].
pub type DiscountFactor = Real;

/// A volatility level expressed as a decimal.
pub type Volatility = Real;

/// A time measurement in years.
pub type Time = Real;

// ── Day-count constants ───────────────────────────────────────────────────────

/// Days per year used for every date-to-time conversion (Actual/365 fixed).
pub const DAYS_PER_YEAR: Real = 365.0;

/// One calendar day as a year fraction.
pub const ONE_DAY: Time = 1.0 / DAYS_PER_YEAR;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};
