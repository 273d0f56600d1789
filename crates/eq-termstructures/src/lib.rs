//! # eq-termstructures
//!
//! Market inputs consumed by the lattice: continuously compounded zero-rate
//! curves and schedules of discrete cash dividends, both on an Actual/365
//! time axis measured from the valuation date.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Actual/365 date-to-time conversion.
pub mod day_count;

/// `RateCurve` trait, the interpolated `ZeroCurve` and `ShiftedCurve`.
pub mod rate_curve;

/// `Dividend` and `DividendSchedule`.
pub mod dividends;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use day_count::year_fraction;
pub use dividends::{Dividend, DividendSchedule};
pub use rate_curve::{RateCurve, ShiftedCurve, ZeroCurve};
