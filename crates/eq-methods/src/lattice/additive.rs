//! Lattice with additive (discrete) cash dividends.
//!
//! The random part of the stock is the spot net of the present value of
//! the dividends paid before expiry.  That net spot diffuses on a CRR
//! lattice and each node adds back the value, at the node's time, of the
//! dividends still to come.

use super::{Lattice, LatticeParams, StepFactors, TriangularMatrix};
use eq_core::{errors::Error, errors::Result, Real};
use eq_termstructures::{DividendSchedule, RateCurve};

/// Spot lattice where dividends are added back at every node.
#[derive(Debug, Clone)]
pub struct AdditiveDividendLattice {
    params: LatticeParams,
    factors: StepFactors,
    spots: TriangularMatrix,
    spot_star: Real,
}

impl AdditiveDividendLattice {
    /// Build the lattice.
    ///
    /// Node `(i, j)` holds `S* u^j d^(i−j) + D_i` where `S*` is the spot
    /// net of dividends paid in `(0, τ]`, `u`/`d` are the factors of step
    /// `i − 1` and `D_i` is the dividend bucket of step `i` (none on the
    /// expiry row).  The root holds `S* + D_0`.
    ///
    /// # Errors
    /// Fails on invalid parameters, a negative discriminant, or dividends
    /// whose present value reaches the spot.
    pub fn build(
        params: &LatticeParams,
        curve: &dyn RateCurve,
        dividends: &DividendSchedule,
    ) -> Result<Self> {
        let factors = StepFactors::build(params, curve, dividends)?;
        let n = params.grid_steps;

        let spot_star = params.spot
            - dividends
                .between(0.0, params.tau)
                .map(|d| d.amount * (-curve.forward_rate(0.0, d.time) * d.time).exp())
                .sum::<Real>();
        if spot_star <= 0.0 {
            return Err(Error::InvalidLatticeInput(format!(
                "dividends exceed spot: spot net of dividends is {spot_star}"
            )));
        }

        let mut spots = TriangularMatrix::new(n + 1);
        spots.set(0, 0, spot_star + factors.dividend(0));
        for i in 1..=n {
            let (u, d) = (factors.up(i - 1), factors.down(i - 1));
            let bucket = if i == n { 0.0 } else { factors.dividend(i) };
            for (j, node) in spots.row_mut(i).iter_mut().enumerate() {
                *node = spot_star * u.powi(j as i32) * d.powi((i - j) as i32) + bucket;
            }
        }

        tracing::debug!(
            grid_steps = n,
            spot_star,
            root = spots.get(0, 0),
            "built additive dividend lattice"
        );
        Ok(Self {
            params: *params,
            factors,
            spots,
            spot_star,
        })
    }

    /// Spot net of the present value of dividends paid before expiry.
    pub fn spot_star(&self) -> Real {
        self.spot_star
    }
}

impl Lattice for AdditiveDividendLattice {
    fn params(&self) -> &LatticeParams {
        &self.params
    }

    fn factors(&self) -> &StepFactors {
        &self.factors
    }

    fn spots(&self) -> &TriangularMatrix {
        &self.spots
    }
}
