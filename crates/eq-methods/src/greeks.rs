//! Greeks by repeated lattice construction.
//!
//! Every sensitivity is obtained by building fresh lattices through a
//! [`LatticeFactory`], so the engine works for either dividend convention
//! and never mutates a lattice in place.
//!
//! * **Delta** and **Gamma** come from one lattice started two steps before
//!   the valuation date (`n + 2` steps over `τ(1 + 2/n)`, same step length).
//!   Rows 2, 4 and 6 of that lattice straddle today's spot with spreads
//!   growing as `u^k − d^k`; the three slope estimates across those rows
//!   are extrapolated to zero spread.  Gamma is the second difference of
//!   the three row-2 nodes.
//! * **Vega** is a central difference over a ±1% relative volatility bump,
//!   expressed per volatility point.
//! * **Theta** is the value change over one calendar day, with expiry,
//!   every dividend and every zero-curve pillar moved one day closer.

use crate::lattice::{LatticeFactory, LatticeParams};
use crate::pricer::PriceGrid;
use eq_core::{ensure, errors::Result, Real, ONE_DAY};
use eq_instruments::ContractSpec;
use eq_termstructures::{DividendSchedule, RateCurve, ShiftedCurve};

/// Delta, Gamma, Vega and Theta of one contract.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GreeksResult {
    /// ∂V/∂S.
    pub delta: Real,
    /// ∂²V/∂S².
    pub gamma: Real,
    /// Value change for one volatility point (0.01).
    pub vega: Real,
    /// Value change over one calendar day.
    pub theta: Real,
}

impl GreeksResult {
    /// `[delta, gamma, vega, theta]`.
    pub fn to_array(&self) -> [Real; 4] {
        [self.delta, self.gamma, self.vega, self.theta]
    }
}

/// Computes Greeks by building perturbed lattices.
pub struct GreeksEngine<'a> {
    factory: &'a dyn LatticeFactory,
    curve: &'a dyn RateCurve,
    dividends: &'a DividendSchedule,
}

impl<'a> GreeksEngine<'a> {
    /// Bind a lattice factory to market inputs.
    pub fn new(
        factory: &'a dyn LatticeFactory,
        curve: &'a dyn RateCurve,
        dividends: &'a DividendSchedule,
    ) -> Self {
        Self {
            factory,
            curve,
            dividends,
        }
    }

    /// Lattice price of `contract` for `params`.
    pub fn price(&self, params: &LatticeParams, contract: &ContractSpec) -> Result<Real> {
        self.price_with(params, self.curve, self.dividends, contract)
    }

    fn price_with(
        &self,
        params: &LatticeParams,
        curve: &dyn RateCurve,
        dividends: &DividendSchedule,
        contract: &ContractSpec,
    ) -> Result<Real> {
        let lattice = self.factory.build(params, curve, dividends)?;
        Ok(PriceGrid::build(&*lattice, contract)?.price())
    }

    /// All four Greeks.
    pub fn compute(&self, params: &LatticeParams, contract: &ContractSpec) -> Result<GreeksResult> {
        let mut greeks = GreeksResult::default();
        self.make_delta_gamma(params, contract, &mut greeks)?;
        self.make_vega(params, contract, &mut greeks)?;
        self.make_theta(params, contract, &mut greeks)?;
        Ok(greeks)
    }

    /// Fill `delta` and `gamma`.
    ///
    /// # Errors
    /// Needs at least 4 grid steps, so that the extended lattice reaches
    /// row 6.
    pub fn make_delta_gamma(
        &self,
        params: &LatticeParams,
        contract: &ContractSpec,
        greeks: &mut GreeksResult,
    ) -> Result<()> {
        let n = params.grid_steps;
        ensure!(n >= 4, "delta needs at least 4 grid steps, got {n}");
        let extended = params
            .with_grid_steps(n + 2)
            .with_tau(params.tau * (1.0 + 2.0 / n as Real));
        let lattice = self.factory.build(&extended, self.curve, self.dividends)?;
        let grid = PriceGrid::build(&*lattice, contract)?;

        let (u, d) = (lattice.up(0), lattice.down(0));
        let mut estimates = [0.0; 3];
        let mut spreads = [0.0; 3];
        for (k, (est, z)) in estimates.iter_mut().zip(spreads.iter_mut()).enumerate() {
            let depth = k + 1;
            let row = 2 * depth;
            *est = (grid.value(row, row) - grid.value(row, 0))
                / (lattice.spot_at(row, row) - lattice.spot_at(row, 0));
            // weight from u^k (first-step factors), not the row-2k spread u^{2k}
            *z = (0.5 * (u.powi(depth as i32) - d.powi(depth as i32))).powi(2);
        }
        greeks.delta = extrapolate_to_zero(&spreads, &estimates);

        let s = [lattice.spot_at(2, 0), lattice.spot_at(2, 1), lattice.spot_at(2, 2)];
        let c = [grid.value(2, 0), grid.value(2, 1), grid.value(2, 2)];
        greeks.gamma = 2.0
            * (s[0] * (c[1] - c[2]) + s[1] * (c[2] - c[0]) + s[2] * (c[0] - c[1]))
            / ((s[1] - s[0]) * (s[2] - s[0]) * (s[2] - s[1]));

        tracing::debug!(delta = greeks.delta, gamma = greeks.gamma, ?estimates, "delta/gamma");
        Ok(())
    }

    /// Fill `vega`; zero volatility leaves it at zero.
    pub fn make_vega(
        &self,
        params: &LatticeParams,
        contract: &ContractSpec,
        greeks: &mut GreeksResult,
    ) -> Result<()> {
        let sigma = params.sigma;
        if sigma == 0.0 {
            greeks.vega = 0.0;
            return Ok(());
        }
        let down = self.price(&params.with_sigma(0.99 * sigma), contract)?;
        let up = self.price(&params.with_sigma(1.01 * sigma), contract)?;
        greeks.vega = 0.01 * (up - down) / (0.02 * sigma);
        Ok(())
    }

    /// Fill `theta`.
    ///
    /// # Errors
    /// Needs more than one day to expiry.
    pub fn make_theta(
        &self,
        params: &LatticeParams,
        contract: &ContractSpec,
        greeks: &mut GreeksResult,
    ) -> Result<()> {
        ensure!(
            params.tau > ONE_DAY,
            "theta needs more than one day to expiry, got {} years",
            params.tau
        );
        let today = self.price(params, contract)?;
        let tomorrow = self.price_with(
            &params.with_tau(params.tau - ONE_DAY),
            &ShiftedCurve::new(self.curve, ONE_DAY),
            &self.dividends.shifted(ONE_DAY),
            contract,
        )?;
        greeks.theta = tomorrow - today;
        Ok(())
    }
}

/// Value at `z = 0` of the polynomial through `(z_i, y_i)` (Lagrange form).
fn extrapolate_to_zero(z: &[Real; 3], y: &[Real; 3]) -> Real {
    (0..3)
        .map(|i| {
            let weight: Real = (0..3)
                .filter(|&j| j != i)
                .map(|j| z[j] / (z[j] - z[i]))
                .product();
            weight * y[i]
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::DividendTreatment;
    use approx::assert_abs_diff_eq;
    use eq_instruments::{ExerciseStyle, OptionType};
    use eq_termstructures::ZeroCurve;

    #[test]
    fn extrapolation_recovers_polynomial_intercept() {
        let z = [0.01, 0.04, 0.09];
        let y = z.map(|x| 0.5 + 2.0 * x - 3.0 * x * x);
        assert_abs_diff_eq!(extrapolate_to_zero(&z, &y), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn european_call_with_one_dividend() {
        let tau = 90.0 / 365.0;
        let curve = ZeroCurve::new(&[0.0, tau], &[0.05, 0.05]).unwrap();
        let divs = DividendSchedule::from_times(&[20.0 / 365.0], &[20.0]).unwrap();
        let params = LatticeParams::new(100.0, 0.5, tau, 120, true);
        let contract =
            ContractSpec::new(100.0, OptionType::Call, ExerciseStyle::European, true).unwrap();
        let factory = DividendTreatment::Proportional;
        let engine = GreeksEngine::new(&factory, &curve, &divs);

        assert_abs_diff_eq!(engine.price(&params, &contract).unwrap(), 2.434_109_914_123_68, epsilon = 1e-8);
        let g = engine.compute(&params, &contract).unwrap();
        assert_abs_diff_eq!(g.vega, 0.122_375_437_065_042_72, epsilon = 1e-7);
        assert_abs_diff_eq!(g.theta, -0.036_892_417_521_977_805, epsilon = 1e-7);
        assert_abs_diff_eq!(g.delta, 0.189_439_442_304_227_02, epsilon = 1e-6);
        assert_abs_diff_eq!(g.gamma, 0.009_906_054_777_133_721, epsilon = 1e-6);
    }

    fn one_year_case(option_type: OptionType) -> (Real, GreeksResult) {
        // dividends today and after expiry are ignored
        let curve = ZeroCurve::new(&[73.0 / 365.0, 1.0], &[0.05, 0.05]).unwrap();
        let divs = DividendSchedule::from_times(
            &[0.0, 182.0 / 365.0, 365.0 / 365.0, 438.0 / 365.0],
            &[5.0, 5.0, 5.0, 5.0],
        )
        .unwrap();
        let params = LatticeParams::new(100.0, 0.5, 1.0, 120, true);
        let contract = ContractSpec::new(100.0, option_type, ExerciseStyle::American, false).unwrap();
        let factory = DividendTreatment::Proportional;
        let engine = GreeksEngine::new(&factory, &curve, &divs);
        let price = engine.price(&params, &contract).unwrap();
        (price, engine.compute(&params, &contract).unwrap())
    }

    #[test]
    fn american_call_one_year() {
        let (price, g) = one_year_case(OptionType::Call);
        assert_abs_diff_eq!(price, 19.195_92, epsilon = 1e-5);
        assert_abs_diff_eq!(g.vega, 0.366_132_965_630_747_26, epsilon = 1e-7);
        assert_abs_diff_eq!(g.theta, -0.029_972_357_914_100_91, epsilon = 1e-7);
        assert_abs_diff_eq!(g.delta, 0.595_914_872_908_666_3, epsilon = 1e-6);
        assert_abs_diff_eq!(g.gamma, 0.008_296_891_524_957_871, epsilon = 1e-6);
    }

    #[test]
    fn american_put_one_year() {
        let (price, g) = one_year_case(OptionType::Put);
        assert_abs_diff_eq!(price, 20.794_27, epsilon = 1e-5);
        assert_abs_diff_eq!(g.vega, 0.353_111_077_170_403_6, epsilon = 1e-7);
        assert_abs_diff_eq!(g.theta, -0.015_503_813_421_815_948, epsilon = 1e-7);
        assert_abs_diff_eq!(g.delta, -0.399_417_612_188_487_6, epsilon = 1e-6);
        assert_abs_diff_eq!(g.gamma, 0.007_149_124_258_878_46, epsilon = 1e-6);
    }

    #[test]
    fn call_minus_put_delta_is_one_without_carry() {
        let curve = ZeroCurve::flat(0.0).unwrap();
        let divs = DividendSchedule::empty();
        let params = LatticeParams::new(100.0, 0.3, 0.5, 60, true);
        let factory = DividendTreatment::Additive;
        let engine = GreeksEngine::new(&factory, &curve, &divs);
        for exercise in [ExerciseStyle::European, ExerciseStyle::American] {
            let mut call = GreeksResult::default();
            let mut put = GreeksResult::default();
            let c = ContractSpec::new(95.0, OptionType::Call, exercise, false).unwrap();
            engine.make_delta_gamma(&params, &c, &mut call).unwrap();
            engine.make_delta_gamma(&params, &c.opposite(), &mut put).unwrap();
            assert_abs_diff_eq!(call.delta - put.delta, 1.0, epsilon = 1e-3);
            assert_abs_diff_eq!(call.gamma, put.gamma, epsilon = 1e-3);
        }
    }

    #[test]
    fn theta_rolls_the_curve_with_the_dividends() {
        let curve = ZeroCurve::new(&[0.1, 0.5, 1.0], &[0.02, 0.04, 0.06]).unwrap();
        let divs = DividendSchedule::from_times(&[0.3], &[2.0]).unwrap();
        let params = LatticeParams::new(100.0, 0.3, 0.8, 60, false);
        let contract =
            ContractSpec::new(100.0, OptionType::Put, ExerciseStyle::American, true).unwrap();
        let factory = DividendTreatment::Additive;
        let engine = GreeksEngine::new(&factory, &curve, &divs);
        let mut g = GreeksResult::default();
        engine.make_theta(&params, &contract, &mut g).unwrap();

        let moved = ZeroCurve::new(&[0.1 - ONE_DAY, 0.5 - ONE_DAY, 1.0 - ONE_DAY], &[0.02, 0.04, 0.06])
            .unwrap();
        let moved_divs = DividendSchedule::from_times(&[0.3 - ONE_DAY], &[2.0]).unwrap();
        let tomorrow = GreeksEngine::new(&factory, &moved, &moved_divs)
            .price(&params.with_tau(0.8 - ONE_DAY), &contract)
            .unwrap();
        let today = engine.price(&params, &contract).unwrap();
        assert_abs_diff_eq!(g.theta, tomorrow - today, epsilon = 1e-10);
    }

    #[test]
    fn zero_vol_has_zero_vega() {
        let curve = ZeroCurve::flat(0.05).unwrap();
        let divs = DividendSchedule::empty();
        let factory = DividendTreatment::Additive;
        let engine = GreeksEngine::new(&factory, &curve, &divs);
        let mut g = GreeksResult {
            vega: 7.0,
            ..GreeksResult::default()
        };
        let contract =
            ContractSpec::new(100.0, OptionType::Put, ExerciseStyle::European, false).unwrap();
        engine
            .make_vega(&LatticeParams::new(100.0, 0.0, 1.0, 10, true), &contract, &mut g)
            .unwrap();
        assert_eq!(g.vega, 0.0);
    }

    #[test]
    fn too_few_steps_or_days_are_rejected() {
        let curve = ZeroCurve::flat(0.05).unwrap();
        let divs = DividendSchedule::empty();
        let factory = DividendTreatment::Additive;
        let engine = GreeksEngine::new(&factory, &curve, &divs);
        let contract =
            ContractSpec::new(100.0, OptionType::Call, ExerciseStyle::American, false).unwrap();
        let mut g = GreeksResult::default();
        assert!(engine
            .make_delta_gamma(&LatticeParams::new(100.0, 0.2, 1.0, 3, true), &contract, &mut g)
            .is_err());
        assert!(engine
            .make_theta(&LatticeParams::new(100.0, 0.2, 0.5 / 365.0, 10, true), &contract, &mut g)
            .is_err());
    }

    proptest::proptest! {
        #![proptest_config(proptest::prelude::ProptestConfig::with_cases(24))]
        #[test]
        fn vega_is_non_negative(
            sigma in 0.05f64..0.8,
            strike in 60.0f64..140.0,
            call in proptest::bool::ANY,
            american in proptest::bool::ANY,
        ) {
            let curve = ZeroCurve::flat(0.04).unwrap();
            let divs = DividendSchedule::from_times(&[0.3], &[2.0]).unwrap();
            let factory = DividendTreatment::Additive;
            let engine = GreeksEngine::new(&factory, &curve, &divs);
            let option_type = if call { OptionType::Call } else { OptionType::Put };
            let exercise = if american { ExerciseStyle::American } else { ExerciseStyle::European };
            let contract = ContractSpec::new(strike, option_type, exercise, true).unwrap();
            let mut g = GreeksResult::default();
            engine.make_vega(&LatticeParams::new(100.0, sigma, 0.75, 40, true), &contract, &mut g).unwrap();
            proptest::prop_assert!(g.vega >= -1e-9, "vega {}", g.vega);
        }
    }
}
