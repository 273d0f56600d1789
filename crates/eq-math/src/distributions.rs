//! Standard normal distribution and the Black forward formula.
//!
//! The cumulative distribution delegates to statrs' complementary error
//! function, which is accurate to machine precision across the whole real
//! line; lattice smoothing evaluates it at every near-the-money node, so a
//! low-order rational approximation would leak into reference prices.

use eq_core::{DiscountFactor, Real};
use statrs::function::erf::erfc;
use std::f64::consts::FRAC_1_SQRT_2;

/// The standard normal cumulative distribution function Φ(x).
#[inline]
pub fn normal_cdf(x: Real) -> Real {
    0.5 * erfc(-x * FRAC_1_SQRT_2)
}

/// Black's formula on a forward.
///
/// `sign` is `+1` for a call and `-1` for a put; `std_dev` is `σ√τ`.
/// Returns `sign·(F·Φ(sign·d1) − K·Φ(sign·d2))·discount`.
///
/// A zero standard deviation or a non-positive forward collapses to the
/// discounted intrinsic value of the forward.
pub fn black_formula(
    sign: Real,
    forward: Real,
    strike: Real,
    std_dev: Real,
    discount: DiscountFactor,
) -> Real {
    if std_dev <= 0.0 || forward <= 0.0 || strike <= 0.0 {
        return (sign * (forward - strike)).max(0.0) * discount;
    }
    let d1 = (forward / strike).ln() / std_dev + 0.5 * std_dev;
    let d2 = d1 - std_dev;
    sign * (forward * normal_cdf(sign * d1) - strike * normal_cdf(sign * d2)) * discount
}
