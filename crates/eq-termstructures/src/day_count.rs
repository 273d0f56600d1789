//! Actual/365 fixed year fractions.

use chrono::NaiveDate;
use eq_core::{Time, DAYS_PER_YEAR};

/// Whole calendar days from `start` to `end` divided by 365.
///
/// Negative when `end` precedes `start`.
pub fn year_fraction(start: NaiveDate, end: NaiveDate) -> Time {
    (end - start).num_days() as Time / DAYS_PER_YEAR
}
