//! Lattice with proportional (ratio) dividends.
//!
//! Each cash dividend is converted into the fraction of the running spot it
//! represents in present-value terms.  The lattice diffuses the spot
//! stripped of all those fractions, and a node still ahead of a payment is
//! grossed up by `1 / (1 − ratio)` for that payment.

use super::{Lattice, LatticeParams, StepFactors, TriangularMatrix};
use eq_core::{
    errors::{Error, Result},
    Real, Time,
};
use eq_termstructures::{DividendSchedule, RateCurve};

/// Spot lattice where dividends scale the nodes multiplicatively.
#[derive(Debug, Clone)]
pub struct ProportionalDividendLattice {
    params: LatticeParams,
    factors: StepFactors,
    spots: TriangularMatrix,
    ratios: Vec<(Time, Real)>,
}

impl ProportionalDividendLattice {
    /// Build the lattice.
    ///
    /// Walking the dividends paid in `(0, τ]` in time order, dividend `k`
    /// has ratio `PV_k / S_k` where `S_k` is the spot net of the present
    /// value of earlier dividends.  Node `(i, j)` holds
    /// `S₀ u^j d^(i−j) / Π(1 − ratio_k)` over the dividends paid after
    /// `iΔt`, with `S₀ = S Π(1 − ratio_k)`.  The root holds the spot.
    ///
    /// # Errors
    /// Fails on invalid parameters, a negative discriminant, or a ratio of
    /// one or more ("dividend exceeds spot").
    pub fn build(
        params: &LatticeParams,
        curve: &dyn RateCurve,
        dividends: &DividendSchedule,
    ) -> Result<Self> {
        let factors = StepFactors::build(params, curve, dividends)?;
        let n = params.grid_steps;
        let dt = factors.dt();

        let mut running = params.spot;
        let mut ratios = Vec::new();
        for d in dividends.between(0.0, params.tau) {
            let pv = d.amount * (-curve.lin_interp(d.time) * d.time).exp();
            let ratio = pv / running;
            if ratio >= 1.0 {
                return Err(Error::InvalidLatticeInput(format!(
                    "dividend exceeds spot: {} paid at {} is {ratio} of the remaining spot",
                    d.amount, d.time
                )));
            }
            ratios.push((d.time, ratio));
            running -= pv;
        }
        let spot0 = ratios
            .iter()
            .fold(params.spot, |s, &(_, ratio)| s * (1.0 - ratio));

        let mut spots = TriangularMatrix::new(n + 1);
        for i in 1..=n {
            let t = i as Real * dt;
            let gross = ratios
                .iter()
                .filter(|&&(paid, _)| paid > t)
                .fold(1.0, |g, &(_, ratio)| g * (1.0 - ratio));
            let (u, d) = (factors.up(i - 1), factors.down(i - 1));
            for (j, node) in spots.row_mut(i).iter_mut().enumerate() {
                *node = spot0 * u.powi(j as i32) * d.powi((i - j) as i32) / gross;
            }
        }
        spots.set(0, 0, params.spot);

        tracing::debug!(
            grid_steps = n,
            spot0,
            dividends = ratios.len(),
            "built proportional dividend lattice"
        );
        Ok(Self {
            params: *params,
            factors,
            spots,
            ratios,
        })
    }

    /// `(payment time, ratio)` of each dividend folded into the lattice.
    pub fn ratios(&self) -> &[(Time, Real)] {
        &self.ratios
    }
}

impl Lattice for ProportionalDividendLattice {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::AdditiveDividendLattice;
    use approx::assert_abs_diff_eq;
    use eq_termstructures::ZeroCurve;

    fn curve() -> ZeroCurve {
        ZeroCurve::new(&[0.0, 90.0 / 365.0], &[0.05, 0.05]).unwrap()
    }

    #[test]
    fn ratio_of_single_dividend() {
        let divs = DividendSchedule::from_times(&[20.0 / 365.0], &[20.0]).unwrap();
        let params = LatticeParams::new(100.0, 0.5, 90.0 / 365.0, 120, true);
        let l = ProportionalDividendLattice::build(&params, &curve(), &divs).unwrap();
        let pv = 20.0 * (-0.05_f64 * 20.0 / 365.0).exp();
        assert_eq!(l.ratios().len(), 1);
        assert_abs_diff_eq!(l.ratios()[0].1, pv / 100.0, epsilon = 1e-15);
        assert_eq!(l.spot_at(0, 0), 100.0);
        // before the payment the even-row centre node is the full spot
        assert_abs_diff_eq!(l.spot_at(10, 5), 100.0, epsilon = 1e-10);
        // after it, the spot net of the dividend
        assert_abs_diff_eq!(l.spot_at(40, 20), 100.0 - pv, epsilon = 1e-10);
    }

    #[test]
    fn ratios_use_running_spot() {
        let c = ZeroCurve::flat(0.0).unwrap();
        let divs = DividendSchedule::from_times(&[0.2, 0.4, 0.6], &[10.0, 10.0, 10.0]).unwrap();
        let params = LatticeParams::new(100.0, 0.2, 0.5, 10, true);
        let l = ProportionalDividendLattice::build(&params, &c, &divs).unwrap();
        // the dividend at 0.6 is after expiry
        let r: Vec<Real> = l.ratios().iter().map(|&(_, r)| r).collect();
        assert_eq!(r.len(), 2);
        assert_abs_diff_eq!(r[0], 0.1, epsilon = 1e-15);
        assert_abs_diff_eq!(r[1], 10.0 / 90.0, epsilon = 1e-15);
    }

    #[test]
    fn terminal_row_matches_additive_lattice() {
        let divs = DividendSchedule::from_times(&[20.0 / 365.0], &[20.0]).unwrap();
        let params = LatticeParams::new(100.0, 0.5, 90.0 / 365.0, 120, true);
        let prop = ProportionalDividendLattice::build(&params, &curve(), &divs).unwrap();
        let add = AdditiveDividendLattice::build(&params, &curve(), &divs).unwrap();
        for j in 0..=120 {
            let (p, a) = (prop.spot_at(120, j), add.spot_at(120, j));
            assert!((p - a).abs() <= 1e-9 * a.max(1.0), "node {j}: {p} vs {a}");
        }
    }

    #[test]
    fn dividend_exceeding_spot_fails() {
        let c = ZeroCurve::flat(0.0).unwrap();
        let divs = DividendSchedule::from_times(&[0.1, 0.2], &[60.0, 45.0]).unwrap();
        let params = LatticeParams::new(100.0, 0.2, 0.5, 10, true);
        match ProportionalDividendLattice::build(&params, &c, &divs) {
            Err(Error::InvalidLatticeInput(msg)) => assert!(msg.contains("exceeds spot")),
            other => panic!("expected invalid lattice input, got {other:?}"),
        }
    }
}
