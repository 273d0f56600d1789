//! Zero-rate term structures.
//!
//! The lattice needs two quantities from a curve: the continuously
//! compounded zero rate to a time `t` (used for the flat-rate lattice and
//! for proportional dividend ratios) and the average forward rate between
//! two times (used for per-step rates and for carrying dividends back to a
//! lattice step).

use chrono::NaiveDate;
use eq_core::{ensure, errors::Result, DiscountFactor, Rate, Time};
use eq_math::LinearInterpolation;

use crate::day_count::year_fraction;

/// A continuously compounded zero-rate curve on a year-fraction axis.
pub trait RateCurve: std::fmt::Debug + Send + Sync {
    /// Zero rate to time `t`, linearly interpolated between pillars.
    fn lin_interp(&self, t: Time) -> Rate;

    /// Average continuously compounded forward rate over `[t1, t2]`.
    ///
    /// `(r(t2)·t2 − r(t1)·t1) / (t2 − t1)`, and `0` for an empty interval.
    fn forward_rate(&self, t1: Time, t2: Time) -> Rate {
        if t1 == t2 {
            return 0.0;
        }
        (self.lin_interp(t2) * t2 - self.lin_interp(t1) * t1) / (t2 - t1)
    }

    /// Discount factor to time `t`.
    fn discount(&self, t: Time) -> DiscountFactor {
        (-self.lin_interp(t) * t).exp()
    }
}

/// Zero rates at pillar times, linear in between and flat outside.
#[derive(Debug, Clone, PartialEq)]
pub struct ZeroCurve {
    zero_rates: LinearInterpolation,
}

impl ZeroCurve {
    /// Build a curve from pillar times (strictly increasing) and zero rates.
    pub fn new(times: &[Time], rates: &[Rate]) -> Result<Self> {
        Ok(Self {
            zero_rates: LinearInterpolation::new(times, rates)?,
        })
    }

    /// A single-rate curve.
    pub fn flat(rate: Rate) -> Result<Self> {
        Self::new(&[0.0], &[rate])
    }

    /// Build a curve from pillar dates, measured Actual/365 from `today`.
    ///
    /// Pillars are sorted by date; duplicated dates are rejected.
    pub fn from_dates(today: NaiveDate, dates: &[NaiveDate], rates: &[Rate]) -> Result<Self> {
        ensure!(
            dates.len() == rates.len(),
            "zero curve needs one rate per date ({} dates, {} rates)",
            dates.len(),
            rates.len()
        );
        let mut pillars: Vec<(Time, Rate)> = dates
            .iter()
            .zip(rates)
            .map(|(&d, &r)| (year_fraction(today, d), r))
            .collect();
        pillars.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (times, rates): (Vec<Time>, Vec<Rate>) = pillars.into_iter().unzip();
        Self::new(&times, &rates)
    }

    /// Pillar times.
    pub fn times(&self) -> &[Time] {
        self.zero_rates.xs()
    }

    /// Pillar zero rates.
    pub fn rates(&self) -> &[Rate] {
        self.zero_rates.ys()
    }
}

impl RateCurve for ZeroCurve {
    fn lin_interp(&self, t: Time) -> Rate {
        self.zero_rates.value(t)
    }
}

/// A curve seen `dt` later: every pillar moves `dt` closer, so the zero
/// rate to `t` is the underlying curve's rate to `t + dt`.
#[derive(Debug, Clone, Copy)]
pub struct ShiftedCurve<'a> {
    base: &'a dyn RateCurve,
    dt: Time,
}

impl<'a> ShiftedCurve<'a> {
    /// Roll `base` forward by `dt`.
    pub fn new(base: &'a dyn RateCurve, dt: Time) -> Self {
        Self { base, dt }
    }
}

impl RateCurve for ShiftedCurve<'_> {
    fn lin_interp(&self, t: Time) -> Rate {
        self.base.lin_interp(t + self.dt)
    }
}
