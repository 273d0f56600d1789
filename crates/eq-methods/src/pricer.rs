//! Backward induction on a dividend-adjusted lattice.
//!
//! [`PriceGrid::make_grid`] values a [`ContractSpec`] on a built
//! [`Lattice`]:
//!
//! 1. per-step risk-neutral up-probabilities `(e^{rΔt} − d) / (u − d)`;
//! 2. the payoff on the expiry row;
//! 3. one step of induction to the row before expiry, optionally followed by
//!    *smoothing*: the three nodes nearest the strike are replaced by the
//!    one-period Black value on their forward, which removes most of the
//!    odd/even oscillation of binomial prices in the number of steps;
//! 4. induction down to the root, taking the larger of continuation and
//!    exercise value for American exercise.

use crate::lattice::{Lattice, TriangularMatrix};
use eq_core::{
    ensure,
    errors::{Error, Result},
    Real, Size,
};
use eq_instruments::ContractSpec;
use eq_math::black_formula;

/// Value reported by [`PriceGrid::price`] before a grid has been made.
pub const UNINITIALIZED_PRICE: Real = -1.0;

/// Slack allowed on `[0, 1]` for round-off in the up-probability.
const PROBABILITY_TOLERANCE: Real = 1.0e-12;

/// Option values on every lattice node.
#[derive(Debug, Clone, Default)]
pub struct PriceGrid {
    prices: Option<TriangularMatrix>,
    prob: Vec<Real>,
    rate: Vec<Real>,
}

impl PriceGrid {
    /// An empty grid; [`price`](Self::price) reports
    /// [`UNINITIALIZED_PRICE`] until [`make_grid`](Self::make_grid) succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a grid in one call.
    pub fn build(lattice: &dyn Lattice, contract: &ContractSpec) -> Result<Self> {
        let mut grid = Self::new();
        grid.make_grid(lattice, contract)?;
        Ok(grid)
    }

    /// Value `contract` on `lattice`, replacing any previous grid.
    ///
    /// # Errors
    /// * [`Error::ProbabilityOutOfRange`] if an up-probability falls
    ///   outside `[0, 1]`; the value is reported, never clamped.  With zero
    ///   volatility the spot path is deterministic and the probability is
    ///   set to 0 or 1 directly.
    /// * [`Error::Precondition`] if smoothing is requested on fewer than
    ///   four steps.
    pub fn make_grid(&mut self, lattice: &dyn Lattice, contract: &ContractSpec) -> Result<()> {
        let n = lattice.grid_steps();
        let dt = lattice.dt();
        ensure!(
            !contract.smoothing() || n >= 4,
            "smoothing needs at least 4 grid steps, got {n}"
        );
        self.prices = None;

        let rate: Vec<Real> = (0..n).map(|i| lattice.rate(i)).collect();
        let deterministic = lattice.sigma() == 0.0;
        let mut prob = Vec::with_capacity(n);
        for (i, &r) in rate.iter().enumerate() {
            let (u, d) = (lattice.up(i), lattice.down(i));
            let p = if deterministic {
                // the branch growing at the step rate is u for r >= 0 and d below
                if r >= 0.0 {
                    1.0
                } else {
                    0.0
                }
            } else {
                ((r * dt).exp() - d) / (u - d)
            };
            if !(-PROBABILITY_TOLERANCE..=1.0 + PROBABILITY_TOLERANCE).contains(&p) {
                return Err(Error::ProbabilityOutOfRange {
                    step: i,
                    probability: p,
                });
            }
            prob.push(p);
        }

        let mut values = TriangularMatrix::new(n + 1);
        for (j, v) in values.row_mut(n).iter_mut().enumerate() {
            *v = contract.payoff(lattice.spot_at(n, j));
        }

        roll_back(&mut values, lattice, contract, &rate, &prob, n - 1);
        if contract.smoothing() {
            smooth_pre_expiry_row(&mut values, lattice, contract, rate[n - 1]);
        }
        for i in (0..n - 1).rev() {
            roll_back(&mut values, lattice, contract, &rate, &prob, i);
        }

        self.prices = Some(values);
        self.prob = prob;
        self.rate = rate;
        Ok(())
    }

    /// `true` once a grid has been made.
    pub fn is_built(&self) -> bool {
        self.prices.is_some()
    }

    /// Option value at the root, or [`UNINITIALIZED_PRICE`].
    pub fn price(&self) -> Real {
        self.prices
            .as_ref()
            .map_or(UNINITIALIZED_PRICE, |values| values.get(0, 0))
    }

    /// Option value at node `(i, j)`; `0.0` outside the grid or before it
    /// is made.
    pub fn value(&self, i: Size, j: Size) -> Real {
        self.prices.as_ref().map_or(0.0, |values| values.get(i, j))
    }

    /// Up-probability of step `i`, `0.0` out of range.
    pub fn prob(&self, i: Size) -> Real {
        self.prob.get(i).copied().unwrap_or(0.0)
    }

    /// Rate of step `i`, `0.0` out of range.
    pub fn rate(&self, i: Size) -> Real {
        self.rate.get(i).copied().unwrap_or(0.0)
    }

    /// Number of steps of the last grid made.
    pub fn grid_steps(&self) -> Size {
        self.rate.len()
    }
}

// row i from row i + 1
fn roll_back(
    values: &mut TriangularMatrix,
    lattice: &dyn Lattice,
    contract: &ContractSpec,
    rate: &[Real],
    prob: &[Real],
    i: Size,
) {
    let dt = lattice.dt();
    let discount = (-rate[i] * dt).exp();
    let p = prob[i];
    let american = contract.exercise().is_american();
    for j in 0..=i {
        let continuation =
            discount * (p * values.get(i + 1, j + 1) + (1.0 - p) * values.get(i + 1, j));
        let value = if american {
            continuation.max(contract.exercise_value(lattice.spot_at(i, j)))
        } else {
            continuation
        };
        values.set(i, j, value);
    }
}

/// Index of the middle node of the three smoothed nodes on row `n − 1`.
///
/// Scans up the row while two consecutive nodes are both at or below the
/// strike, then picks between the two nodes bracketing the strike by
/// relative distance; the scan is clamped away from both row ends.
fn smoothing_centre(lattice: &dyn Lattice, strike: Real) -> Size {
    let n = lattice.grid_steps();
    let row = n - 1;
    let mut k = 1;
    while k <= n - 1 && lattice.spot_at(row, k - 1) <= strike && lattice.spot_at(row, k) <= strike
    {
        k += 1;
    }
    if k == 1 {
        2
    } else if k >= n - 1 {
        n - 2
    } else {
        let below = (lattice.spot_at(row, k - 2) / strike - 1.0).abs();
        let above = (lattice.spot_at(row, k + 1) / strike - 1.0).abs();
        if below > above {
            k
        } else {
            k - 1
        }
    }
}

fn smooth_pre_expiry_row(
    values: &mut TriangularMatrix,
    lattice: &dyn Lattice,
    contract: &ContractSpec,
    rate: Real,
) {
    let row = lattice.grid_steps() - 1;
    let dt = lattice.dt();
    let strike = contract.strike();
    let sign = contract.option_type().sign();
    let std_dev = lattice.sigma() * dt.sqrt();
    let discount = (-rate * dt).exp();
    let centre = smoothing_centre(lattice, strike);
    for j in centre - 1..=centre + 1 {
        let forward = (lattice.spot_at(row, j) - lattice.dividend(row)) * (rate * dt).exp();
        values.set(row, j, black_formula(sign, forward, strike, std_dev, discount));
    }
}
