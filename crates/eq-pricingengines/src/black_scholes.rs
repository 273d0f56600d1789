//! Closed-form Black–Scholes prices.
//!
//! $$C = e^{-rT}\,(F N(d_1) - K N(d_2)), \quad P = e^{-rT}\,(K N(-d_2) - F N(-d_1))$$
//!
//! with $d_{1,2} = \ln(F/K)/(\sigma\sqrt{T}) \pm \sigma\sqrt{T}/2$.  With
//! discrete dividends the forward is the spot net of the dividends'
//! present value, grown at the zero rate to expiry.

use eq_core::{Rate, Real, Time, Volatility};
use eq_instruments::OptionType;
use eq_math::black_formula;
use eq_termstructures::{DividendSchedule, RateCurve};

/// Black price of an option on a forward, discounted at `rate` over `tau`.
pub fn black_scholes_forward(
    option_type: OptionType,
    forward: Real,
    strike: Real,
    volatility: Volatility,
    tau: Time,
    rate: Rate,
) -> Real {
    if tau <= 0.0 {
        return option_type.payoff(forward, strike);
    }
    black_formula(
        option_type.sign(),
        forward,
        strike,
        volatility * tau.sqrt(),
        (-rate * tau).exp(),
    )
}

/// Black–Scholes–Merton price with a continuous dividend yield.
pub fn black_scholes(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    risk_free_rate: Rate,
    dividend_yield: Rate,
    volatility: Volatility,
    tau: Time,
) -> Real {
    let forward = spot * ((risk_free_rate - dividend_yield) * tau).exp();
    black_scholes_forward(option_type, forward, strike, volatility, tau, risk_free_rate)
}

/// Forward to `tau`: spot less the present value of dividends paid in
/// `(0, tau]`, grown at the zero rate to `tau`.
pub fn atm_forward(
    spot: Real,
    curve: &dyn RateCurve,
    dividends: &DividendSchedule,
    tau: Time,
) -> Real {
    (spot - dividends.present_value(curve, tau)) * (curve.lin_interp(tau) * tau).exp()
}

/// European Black–Scholes price with discrete dividends.
pub fn black_scholes_discrete(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    volatility: Volatility,
    tau: Time,
    curve: &dyn RateCurve,
    dividends: &DividendSchedule,
) -> Real {
    let forward = atm_forward(spot, curve, dividends, tau);
    black_scholes_forward(option_type, forward, strike, volatility, tau, curve.lin_interp(tau))
}
