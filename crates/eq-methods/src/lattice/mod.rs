//! Dividend-adjusted binomial lattices.
//!
//! # Overview
//!
//! * [`LatticeParams`]: spot, volatility, expiry, number of steps and the
//!   flat-rate switch
//! * [`StepFactors`]: per-step rate, up/down factors and dividend buckets,
//!   shared by both dividend conventions
//! * [`Lattice`]: read-only capability consumed by the pricer and the
//!   Greeks engine
//! * [`AdditiveDividendLattice`] / [`ProportionalDividendLattice`]: the
//!   two dividend conventions
//! * [`LatticeFactory`] / [`DividendTreatment`]: rebuild a lattice of the
//!   same convention under perturbed parameters

pub mod additive;
pub mod proportional;

pub use additive::AdditiveDividendLattice;
pub use proportional::ProportionalDividendLattice;

use eq_core::{
    ensure,
    errors::{Error, Result},
    Rate, Real, Size, Time, Volatility,
};
use eq_termstructures::{DividendSchedule, RateCurve};
use std::fmt;

// ─── LatticeParams ────────────────────────────────────────────────────────────

/// Inputs that size a lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeParams {
    /// Spot price of the underlying.
    pub spot: Real,
    /// Black volatility.
    pub sigma: Volatility,
    /// Time to expiry in years.
    pub tau: Time,
    /// Number of time steps.
    pub grid_steps: Size,
    /// Use the single zero rate to expiry at every step instead of the
    /// per-step forward rates.
    pub flat: bool,
}

impl LatticeParams {
    /// Bundle lattice inputs.
    pub fn new(spot: Real, sigma: Volatility, tau: Time, grid_steps: Size, flat: bool) -> Self {
        Self {
            spot,
            sigma,
            tau,
            grid_steps,
            flat,
        }
    }

    /// Length of one time step.
    pub fn dt(&self) -> Time {
        self.tau / self.grid_steps as Real
    }

    /// Copy with another volatility.
    pub fn with_sigma(self, sigma: Volatility) -> Self {
        Self { sigma, ..self }
    }

    /// Copy with another expiry.
    pub fn with_tau(self, tau: Time) -> Self {
        Self { tau, ..self }
    }

    /// Copy with another number of steps.
    pub fn with_grid_steps(self, grid_steps: Size) -> Self {
        Self { grid_steps, ..self }
    }

    /// Check the inputs before any lattice arithmetic.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.grid_steps >= 1, "grid steps must be at least 1");
        ensure!(
            self.spot.is_finite() && self.spot > 0.0,
            "spot must be positive, got {}",
            self.spot
        );
        ensure!(
            self.sigma.is_finite() && self.sigma >= 0.0,
            "volatility must be non-negative, got {}",
            self.sigma
        );
        ensure!(
            self.tau.is_finite() && self.tau > 0.0,
            "time to expiry must be positive, got {}",
            self.tau
        );
        Ok(())
    }
}

// ─── TriangularMatrix ─────────────────────────────────────────────────────────

/// Lower-triangular storage for lattice nodes `(i, j)` with `j <= i`.
///
/// Row `i` holds `i + 1` nodes; reads outside the triangle return `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangularMatrix {
    rows: Size,
    data: Vec<Real>,
}

impl TriangularMatrix {
    /// Zero-filled matrix with `rows` rows.
    pub fn new(rows: Size) -> Self {
        Self {
            rows,
            data: vec![0.0; rows * (rows + 1) / 2],
        }
    }

    #[inline]
    fn offset(i: Size) -> Size {
        i * (i + 1) / 2
    }

    /// Number of rows.
    pub fn rows(&self) -> Size {
        self.rows
    }

    /// Node `(i, j)`, or `0.0` outside the triangle.
    #[inline]
    pub fn get(&self, i: Size, j: Size) -> Real {
        if i < self.rows && j <= i {
            self.data[Self::offset(i) + j]
        } else {
            0.0
        }
    }

    /// Write node `(i, j)`.
    ///
    /// # Panics
    /// Panics if `(i, j)` is outside the triangle.
    #[inline]
    pub fn set(&mut self, i: Size, j: Size, value: Real) {
        assert!(i < self.rows && j <= i, "node ({i}, {j}) outside lattice");
        self.data[Self::offset(i) + j] = value;
    }

    /// Row `i` as a slice of `i + 1` nodes.
    pub fn row(&self, i: Size) -> &[Real] {
        let start = Self::offset(i);
        &self.data[start..start + i + 1]
    }

    /// Mutable row `i`.
    pub fn row_mut(&mut self, i: Size) -> &mut [Real] {
        let start = Self::offset(i);
        &mut self.data[start..start + i + 1]
    }
}

// ─── StepFactors ──────────────────────────────────────────────────────────────

/// Per-step arrays common to both dividend conventions.
///
/// Each array has one entry per step; out-of-range reads return `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct StepFactors {
    dt: Time,
    rate: Vec<Rate>,
    up: Vec<Real>,
    down: Vec<Real>,
    dividend: Vec<Real>,
    dividend_time: Vec<Time>,
}

impl StepFactors {
    /// Rates, CRR-style up/down factors and dividend buckets for `params`.
    ///
    /// The up factor at step `i` is
    /// `(a + √(a² − 4e^{2rΔt})) / (2e^{rΔt})` with `a = 1 + e^{(2r + σ²)Δt}`;
    /// the down factor is its reciprocal.  The dividend bucket at step `i`
    /// is the value at `iΔt` of every dividend paid in `(iΔt, τ]`.
    pub fn build(
        params: &LatticeParams,
        curve: &dyn RateCurve,
        dividends: &DividendSchedule,
    ) -> Result<Self> {
        params.validate()?;
        let n = params.grid_steps;
        let dt = params.dt();
        let sigma2 = params.sigma * params.sigma;

        let rate: Vec<Rate> = if params.flat {
            vec![curve.lin_interp(params.tau); n]
        } else {
            (0..n)
                .map(|i| curve.forward_rate(i as Real * dt, (i + 1) as Real * dt))
                .collect()
        };

        let mut up = Vec::with_capacity(n);
        let mut down = Vec::with_capacity(n);
        for (i, &r) in rate.iter().enumerate() {
            let a = 1.0 + ((2.0 * r + sigma2) * dt).exp();
            let discriminant = a * a - 4.0 * (2.0 * r * dt).exp();
            if !(discriminant >= 0.0) || !discriminant.is_finite() {
                return Err(Error::InvalidLatticeInput(format!(
                    "negative up/down discriminant {discriminant} at step {i} \
                     (rate {r}, sigma {}, dt {dt})",
                    params.sigma
                )));
            }
            let u = (a + discriminant.sqrt()) / (2.0 * (r * dt).exp());
            up.push(u);
            down.push(1.0 / u);
        }

        let dividend_time: Vec<Time> = (0..n).map(|i| i as Real * dt).collect();
        let dividend = dividend_time
            .iter()
            .map(|&t0| {
                dividends
                    .between(t0, params.tau)
                    .map(|d| d.amount * (-curve.forward_rate(t0, d.time) * (d.time - t0)).exp())
                    .sum()
            })
            .collect();

        Ok(Self {
            dt,
            rate,
            up,
            down,
            dividend,
            dividend_time,
        })
    }

    /// Number of steps.
    pub fn len(&self) -> Size {
        self.rate.len()
    }

    /// `true` for a lattice without steps (never produced by `build`).
    pub fn is_empty(&self) -> bool {
        self.rate.is_empty()
    }

    /// Step length.
    pub fn dt(&self) -> Time {
        self.dt
    }

    /// Rate applied over step `i`.
    pub fn rate(&self, i: Size) -> Rate {
        self.rate.get(i).copied().unwrap_or(0.0)
    }

    /// Up factor of step `i`.
    pub fn up(&self, i: Size) -> Real {
        self.up.get(i).copied().unwrap_or(0.0)
    }

    /// Down factor of step `i`.
    pub fn down(&self, i: Size) -> Real {
        self.down.get(i).copied().unwrap_or(0.0)
    }

    /// Value at step `i` of the dividends still to be paid.
    pub fn dividend(&self, i: Size) -> Real {
        self.dividend.get(i).copied().unwrap_or(0.0)
    }

    /// Time of step `i`.
    pub fn dividend_time(&self, i: Size) -> Time {
        self.dividend_time.get(i).copied().unwrap_or(0.0)
    }
}

// ─── Lattice capability ───────────────────────────────────────────────────────

/// A built, immutable recombining spot lattice.
///
/// The pricer and the Greeks engine only ever see this trait; every
/// per-step accessor returns `0.0` for an index at or beyond
/// [`grid_steps`](Lattice::grid_steps), and [`spot_at`](Lattice::spot_at)
/// returns `0.0` outside the triangle.
pub trait Lattice: fmt::Debug + Send + Sync {
    /// Inputs the lattice was built from.
    fn params(&self) -> &LatticeParams;

    /// Per-step factors.
    fn factors(&self) -> &StepFactors;

    /// Spot matrix, `grid_steps + 1` rows.
    fn spots(&self) -> &TriangularMatrix;

    /// Spot at node `(i, j)`: `j` up moves after `i` steps.
    fn spot_at(&self, i: Size, j: Size) -> Real {
        self.spots().get(i, j)
    }

    /// Number of steps.
    fn grid_steps(&self) -> Size {
        self.params().grid_steps
    }

    /// Spot price the lattice was built from.
    fn spot(&self) -> Real {
        self.params().spot
    }

    /// Volatility.
    fn sigma(&self) -> Volatility {
        self.params().sigma
    }

    /// Time to expiry.
    fn tau(&self) -> Time {
        self.params().tau
    }

    /// Whether a single flat rate is used.
    fn flat(&self) -> bool {
        self.params().flat
    }

    /// Step length.
    fn dt(&self) -> Time {
        self.factors().dt()
    }

    /// Up factor of step `i`.
    fn up(&self, i: Size) -> Real {
        self.factors().up(i)
    }

    /// Down factor of step `i`.
    fn down(&self, i: Size) -> Real {
        self.factors().down(i)
    }

    /// Rate over step `i`.
    fn rate(&self, i: Size) -> Rate {
        self.factors().rate(i)
    }

    /// Dividend bucket at step `i`.
    fn dividend(&self, i: Size) -> Real {
        self.factors().dividend(i)
    }

    /// Time of step `i`.
    fn dividend_time(&self, i: Size) -> Time {
        self.factors().dividend_time(i)
    }
}

// ─── Factories ────────────────────────────────────────────────────────────────

/// Builds lattices of one dividend convention.
///
/// Implemented by [`DividendTreatment`] and by any closure with the same
/// signature as [`LatticeFactory::build`].
pub trait LatticeFactory: Send + Sync {
    /// Build a lattice for `params`.
    fn build(
        &self,
        params: &LatticeParams,
        curve: &dyn RateCurve,
        dividends: &DividendSchedule,
    ) -> Result<Box<dyn Lattice>>;
}

impl<F> LatticeFactory for F
where
    F: Fn(&LatticeParams, &dyn RateCurve, &DividendSchedule) -> Result<Box<dyn Lattice>>
        + Send
        + Sync,
{
    fn build(
        &self,
        params: &LatticeParams,
        curve: &dyn RateCurve,
        dividends: &DividendSchedule,
    ) -> Result<Box<dyn Lattice>> {
        self(params, curve, dividends)
    }
}

/// How cash dividends enter the spot lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DividendTreatment {
    /// Dividends are added back to a lattice on the ex-dividend spot.
    #[default]
    Additive,
    /// Dividends scale nodes by the ratio of dividend to spot.
    Proportional,
}

impl fmt::Display for DividendTreatment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DividendTreatment::Additive => write!(f, "Additive"),
            DividendTreatment::Proportional => write!(f, "Proportional"),
        }
    }
}

impl LatticeFactory for DividendTreatment {
    fn build(
        &self,
        params: &LatticeParams,
        curve: &dyn RateCurve,
        dividends: &DividendSchedule,
    ) -> Result<Box<dyn Lattice>> {
        Ok(match self {
            DividendTreatment::Additive => {
                Box::new(AdditiveDividendLattice::build(params, curve, dividends)?)
            }
            DividendTreatment::Proportional => {
                Box::new(ProportionalDividendLattice::build(params, curve, dividends)?)
            }
        })
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
