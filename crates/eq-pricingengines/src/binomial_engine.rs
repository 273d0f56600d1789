//! Binomial pricing of one underlying with discrete cash dividends.
//!
//! [`BinomialEngine`] binds the market inputs (zero curve, dividend
//! schedule, spot, volatility, time to expiry) and the lattice settings to
//! an exercise style; prices, Greeks and implied volatilities are then
//! asked per payoff side and strike.  [`BinomialRequest`] is the
//! date-based form of the same call, and the `binomial_*` functions are
//! one-shot wrappers around it.

use std::sync::Arc;

use chrono::NaiveDate;
use eq_core::{ensure, errors::Result, Rate, Real, Time, Volatility};
use eq_instruments::{ContractSpec, ExerciseStyle, OptionType};
use eq_math::FiniteDifferenceNewton;
use eq_methods::{GreeksEngine, GreeksResult, LatticeFactory, LatticeParams, PriceGrid};
use eq_termstructures::{year_fraction, DividendSchedule, RateCurve, ZeroCurve};

use crate::black_scholes::{atm_forward, black_scholes_discrete};
use crate::config::{BinomialConfig, ImpliedVolConfig};

// ─── BinomialEngine ───────────────────────────────────────────────────────────

/// Dividend-adjusted binomial pricer for one underlying and expiry.
#[derive(Debug, Clone)]
pub struct BinomialEngine {
    curve: Arc<dyn RateCurve>,
    dividends: DividendSchedule,
    spot: Real,
    sigma: Volatility,
    tau: Time,
    exercise: ExerciseStyle,
    config: BinomialConfig,
}

impl BinomialEngine {
    /// Bind market inputs to lattice settings.
    ///
    /// # Errors
    /// Fails if the spot, volatility or time to expiry cannot size a lattice.
    pub fn new(
        curve: Arc<dyn RateCurve>,
        dividends: DividendSchedule,
        spot: Real,
        sigma: Volatility,
        tau: Time,
        exercise: ExerciseStyle,
        config: BinomialConfig,
    ) -> Result<Self> {
        let engine = Self {
            curve,
            dividends,
            spot,
            sigma,
            tau,
            exercise,
            config,
        };
        engine.lattice_params().validate()?;
        Ok(engine)
    }

    /// Lattice inputs implied by the engine's settings.
    pub fn lattice_params(&self) -> LatticeParams {
        LatticeParams::new(
            self.spot,
            self.sigma,
            self.tau,
            self.config.effective_grid_steps(),
            self.config.flat,
        )
    }

    /// Copy priced at another volatility.
    pub fn with_sigma(&self, sigma: Volatility) -> Result<Self> {
        Self::new(
            Arc::clone(&self.curve),
            self.dividends.clone(),
            self.spot,
            sigma,
            self.tau,
            self.exercise,
            self.config,
        )
    }

    /// Contract on this engine's exercise style and smoothing switch.
    pub fn contract(&self, option_type: OptionType, strike: Real) -> Result<ContractSpec> {
        ContractSpec::new(strike, option_type, self.exercise, self.config.smoothing)
    }

    /// Lattice price of the `option_type` option struck at `strike`.
    pub fn price(&self, option_type: OptionType, strike: Real) -> Result<Real> {
        self.price_contract(&self.contract(option_type, strike)?)
    }

    /// Lattice price of an arbitrary contract.
    pub fn price_contract(&self, contract: &ContractSpec) -> Result<Real> {
        self.price_at(&self.lattice_params(), contract)
    }

    fn price_at(&self, params: &LatticeParams, contract: &ContractSpec) -> Result<Real> {
        let lattice = self
            .config
            .treatment
            .build(params, &*self.curve, &self.dividends)?;
        Ok(PriceGrid::build(&*lattice, contract)?.price())
    }

    /// Delta, Gamma, Vega and Theta.
    pub fn greeks(&self, option_type: OptionType, strike: Real) -> Result<GreeksResult> {
        let contract = self.contract(option_type, strike)?;
        GreeksEngine::new(&self.config.treatment, &*self.curve, &self.dividends)
            .compute(&self.lattice_params(), &contract)
    }

    /// Volatility at which the lattice price matches `target_price`,
    /// searched from the engine's own volatility.
    ///
    /// Returns `0.0` when the search fails: the difference quotient
    /// vanishes, the volatility would turn negative, or the iteration
    /// budget runs out.  Lattice failures along the way are propagated.
    pub fn implied_vol(
        &self,
        target_price: Real,
        option_type: OptionType,
        strike: Real,
        config: &ImpliedVolConfig,
    ) -> Result<Volatility> {
        let contract = self.contract(option_type, strike)?;
        let params = self.lattice_params();
        let outcome = FiniteDifferenceNewton::new(config.tolerance, config.max_iterations)
            .with_lower_bound(0.0)
            .solve(
                |sigma| Ok(self.price_at(&params.with_sigma(sigma), &contract)? - target_price),
                self.sigma,
                |_| config.step,
            )?;
        if outcome.converged() {
            tracing::debug!(
                sigma = outcome.root,
                iterations = outcome.iterations,
                "implied volatility found"
            );
            Ok(outcome.root)
        } else {
            tracing::warn!(
                target_price,
                strike,
                stop = ?outcome.stop,
                iterations = outcome.iterations,
                "implied volatility search failed"
            );
            Ok(0.0)
        }
    }

    /// Forward to expiry net of dividends.
    pub fn atm_forward(&self) -> Real {
        atm_forward(self.spot, &*self.curve, &self.dividends, self.tau)
    }

    /// European Black–Scholes price on the dividend-adjusted forward.
    pub fn black_scholes_price(&self, option_type: OptionType, strike: Real) -> Real {
        black_scholes_discrete(
            option_type,
            self.spot,
            strike,
            self.sigma,
            self.tau,
            &*self.curve,
            &self.dividends,
        )
    }

    /// Zero curve.
    pub fn curve(&self) -> &dyn RateCurve {
        &*self.curve
    }

    /// Dividend schedule.
    pub fn dividends(&self) -> &DividendSchedule {
        &self.dividends
    }

    /// Spot.
    pub fn spot(&self) -> Real {
        self.spot
    }

    /// Volatility.
    pub fn sigma(&self) -> Volatility {
        self.sigma
    }

    /// Time to expiry.
    pub fn tau(&self) -> Time {
        self.tau
    }

    /// Exercise style.
    pub fn exercise(&self) -> ExerciseStyle {
        self.exercise
    }

    /// Lattice settings.
    pub fn config(&self) -> &BinomialConfig {
        &self.config
    }
}

// ─── BinomialRequest ──────────────────────────────────────────────────────────

/// Date-based pricing request.
///
/// Times are Actual/365 year fractions from `today`; zero-rate pillars and
/// dividends are given as parallel date and value lists.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinomialRequest {
    /// European or American exercise.
    pub exercise: ExerciseStyle,
    /// Call or put.
    pub option_type: OptionType,
    /// Spot price.
    pub spot: Real,
    /// Strike.
    pub strike: Real,
    /// Volatility; the starting guess for implied volatility.
    pub vol: Volatility,
    /// Valuation date.
    pub today: NaiveDate,
    /// Expiry date.
    pub expiry: NaiveDate,
    /// Zero-rate pillar dates.
    pub zero_dates: Vec<NaiveDate>,
    /// Continuously compounded zero rates, one per pillar.
    pub zero_rates: Vec<Rate>,
    /// Dividend payment dates.
    pub dividend_dates: Vec<NaiveDate>,
    /// Cash dividend amounts, one per date.
    pub dividend_amounts: Vec<Real>,
    /// Lattice settings.
    #[cfg_attr(feature = "serde", serde(default))]
    pub config: BinomialConfig,
}

impl BinomialRequest {
    /// Years from `today` to `expiry`.
    ///
    /// # Errors
    /// Fails unless expiry is after today.
    pub fn time_to_expiry(&self) -> Result<Time> {
        let tau = year_fraction(self.today, self.expiry);
        ensure!(
            tau > 0.0,
            "expiry {} must be after the valuation date {}",
            self.expiry,
            self.today
        );
        Ok(tau)
    }

    /// Engine for the request's market inputs.
    pub fn engine(&self) -> Result<BinomialEngine> {
        let tau = self.time_to_expiry()?;
        let curve = ZeroCurve::from_dates(self.today, &self.zero_dates, &self.zero_rates)?;
        let dividends =
            DividendSchedule::from_dates(self.today, &self.dividend_dates, &self.dividend_amounts)?;
        BinomialEngine::new(
            Arc::new(curve),
            dividends,
            self.spot,
            self.vol,
            tau,
            self.exercise,
            self.config,
        )
    }

    /// Forward to expiry net of dividends.
    pub fn forward(&self) -> Result<Real> {
        Ok(self.engine()?.atm_forward())
    }

    /// European Black–Scholes price on the dividend-adjusted forward.
    pub fn black_scholes_price(&self) -> Result<Real> {
        Ok(self
            .engine()?
            .black_scholes_price(self.option_type, self.strike))
    }
}

// ─── One-shot functions ───────────────────────────────────────────────────────

/// Lattice price of the requested option.
pub fn binomial_price(request: &BinomialRequest) -> Result<Real> {
    request
        .engine()?
        .price(request.option_type, request.strike)
}

/// Greeks of the requested option; see [`GreeksResult::to_array`] for the
/// `[delta, gamma, vega, theta]` vector.
pub fn binomial_greeks(request: &BinomialRequest) -> Result<GreeksResult> {
    request
        .engine()?
        .greeks(request.option_type, request.strike)
}

/// Implied volatility of `target_price`, searched from `request.vol`.
///
/// Returns `0.0` when the search does not converge.
pub fn binomial_implied_vol(
    target_price: Real,
    request: &BinomialRequest,
    config: &ImpliedVolConfig,
) -> Result<Volatility> {
    request
        .engine()?
        .implied_vol(target_price, request.option_type, request.strike, config)
}
