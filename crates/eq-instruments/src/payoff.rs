//! Option payoff side.
//!
//! `payoff = max(φ(S − K), 0)` where `φ = +1` for a call and `−1` for a put.

use eq_core::{errors::Error, Real};
use std::fmt;
use std::str::FromStr;

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionType {
    /// A call option (right to buy).
    Call,
    /// A put option (right to sell).
    Put,
}

impl OptionType {
    /// +1 for Call, −1 for Put.
    pub fn sign(self) -> Real {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    /// The other side of the collar.
    pub fn opposite(self) -> Self {
        match self {
            OptionType::Call => OptionType::Put,
            OptionType::Put => OptionType::Call,
        }
    }

    /// Exercise value `φ(S − K)`, not floored at zero.
    #[inline]
    pub fn exercise_value(self, spot: Real, strike: Real) -> Real {
        self.sign() * (spot - strike)
    }

    /// Terminal payoff `max(φ(S − K), 0)`.
    #[inline]
    pub fn payoff(self, spot: Real, strike: Real) -> Real {
        self.exercise_value(spot, strike).max(0.0)
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "Call"),
            OptionType::Put => write!(f, "Put"),
        }
    }
}

/// Accepts `"C"`/`"Call"` and `"P"`/`"Put"`, case-insensitively.
impl FromStr for OptionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" | "call" => Ok(OptionType::Call),
            "p" | "put" => Ok(OptionType::Put),
            other => Err(Error::InvalidArgument(format!(
                "unknown option type '{other}'"
            ))),
        }
    }
}
