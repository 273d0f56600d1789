//! Discrete cash dividends.

use chrono::NaiveDate;
use eq_core::{ensure, errors::Result, Real, Size, Time};

use crate::day_count::year_fraction;
use crate::rate_curve::RateCurve;

/// A cash dividend paid at a year fraction from the valuation date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dividend {
    /// Payment time in years.
    pub time: Time,
    /// Cash amount.
    pub amount: Real,
}

impl Dividend {
    /// Create a dividend.
    pub fn new(time: Time, amount: Real) -> Self {
        Self { time, amount }
    }
}

/// Dividends ordered by payment time.
///
/// Dividends at or before the valuation date (`time <= 0`) and after the
/// option's expiry are kept in the schedule; the lattice ignores them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DividendSchedule {
    dividends: Vec<Dividend>,
}

impl DividendSchedule {
    /// A schedule without dividends.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a schedule, sorting by payment time.
    pub fn new(mut dividends: Vec<Dividend>) -> Result<Self> {
        ensure!(
            dividends
                .iter()
                .all(|d| d.time.is_finite() && d.amount.is_finite()),
            "dividend times and amounts must be finite"
        );
        dividends.sort_by(|a, b| a.time.total_cmp(&b.time));
        Ok(Self { dividends })
    }

    /// Build from parallel slices of times and amounts.
    pub fn from_times(times: &[Time], amounts: &[Real]) -> Result<Self> {
        ensure!(
            times.len() == amounts.len(),
            "dividend schedule needs one amount per time ({} times, {} amounts)",
            times.len(),
            amounts.len()
        );
        Self::new(
            times
                .iter()
                .zip(amounts)
                .map(|(&t, &d)| Dividend::new(t, d))
                .collect(),
        )
    }

    /// Build from payment dates, measured Actual/365 from `today`.
    pub fn from_dates(today: NaiveDate, dates: &[NaiveDate], amounts: &[Real]) -> Result<Self> {
        let times: Vec<Time> = dates.iter().map(|&d| year_fraction(today, d)).collect();
        Self::from_times(&times, amounts)
    }

    /// Number of dividends.
    pub fn len(&self) -> Size {
        self.dividends.len()
    }

    /// `true` if there are no dividends.
    pub fn is_empty(&self) -> bool {
        self.dividends.is_empty()
    }

    /// Payment time of dividend `i`, or `0.0` if out of range.
    pub fn time(&self, i: Size) -> Time {
        self.dividends.get(i).map_or(0.0, |d| d.time)
    }

    /// Amount of dividend `i`, or `0.0` if out of range.
    pub fn amount(&self, i: Size) -> Real {
        self.dividends.get(i).map_or(0.0, |d| d.amount)
    }

    /// All dividends in payment order.
    pub fn iter(&self) -> impl Iterator<Item = &Dividend> {
        self.dividends.iter()
    }

    /// Dividends paid in `(after, until]`.
    pub fn between(&self, after: Time, until: Time) -> impl Iterator<Item = &Dividend> {
        self.dividends
            .iter()
            .filter(move |d| d.time > after && d.time <= until)
    }

    /// Present value at time zero of the dividends paid in `(0, tau]`.
    pub fn present_value(&self, curve: &dyn RateCurve, tau: Time) -> Real {
        self.between(0.0, tau)
            .map(|d| d.amount * curve.discount(d.time))
            .sum()
    }

    /// The schedule seen `dt` years later: every payment time moves by `−dt`.
    pub fn shifted(&self, dt: Time) -> Self {
        Self {
            dividends: self
                .dividends
                .iter()
                .map(|d| Dividend::new(d.time - dt, d.amount))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_curve::ZeroCurve;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sorted_on_construction() {
        let s = DividendSchedule::from_times(&[0.5, 0.1, 0.3], &[3.0, 1.0, 2.0]).unwrap();
        assert_eq!(s.len(), 3);
        assert_eq!(s.time(0), 0.1);
        assert_eq!(s.amount(2), 3.0);
    }

    #[test]
    fn out_of_range_accessors_return_zero() {
        let s = DividendSchedule::from_times(&[0.5], &[3.0]).unwrap();
        assert_eq!(s.time(1), 0.0);
        assert_eq!(s.amount(7), 0.0);
        assert!(DividendSchedule::empty().is_empty());
    }

    #[test]
    fn between_is_open_closed() {
        let s = DividendSchedule::from_times(&[0.0, 0.5, 1.0, 1.2], &[5.0; 4]).unwrap();
        let inside: Vec<Time> = s.between(0.0, 1.0).map(|d| d.time).collect();
        assert_eq!(inside, vec![0.5, 1.0]);
    }

    #[test]
    fn present_value_ignores_paid_and_late_dividends() {
        let curve = ZeroCurve::flat(0.05).unwrap();
        let s = DividendSchedule::from_times(&[0.0, 0.5, 2.0], &[5.0, 4.0, 3.0]).unwrap();
        assert_abs_diff_eq!(s.present_value(&curve, 1.0), 4.0 * (-0.025_f64).exp(), epsilon = 1e-14);
    }

    #[test]
    fn shift_moves_every_payment() {
        let s = DividendSchedule::from_times(&[0.1, 0.4], &[1.0, 2.0]).unwrap();
        let moved = s.shifted(0.1);
        assert_abs_diff_eq!(moved.time(0), 0.0);
        assert_abs_diff_eq!(moved.time(1), 0.3, epsilon = 1e-15);
        assert_eq!(moved.amount(1), 2.0);
    }

    #[test]
    fn from_dates_uses_actual_365() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let pay = NaiveDate::from_ymd_opt(2024, 1, 21).unwrap();
        let s = DividendSchedule::from_dates(today, &[pay], &[20.0]).unwrap();
        assert_abs_diff_eq!(s.time(0), 20.0 / 365.0);
        assert!(DividendSchedule::from_dates(today, &[pay], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(DividendSchedule::from_times(&[f64::NAN], &[1.0]).is_err());
    }
}
