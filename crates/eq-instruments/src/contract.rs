//! Contract terms handed to the lattice pricer.

use crate::{exercise::ExerciseStyle, payoff::OptionType};
use eq_core::{ensure, errors::Result, Real};

/// Strike, payoff side, exercise style and the smoothing switch.
///
/// Immutable once built; [`ContractSpec::with_strike`] returns a copy.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContractSpec {
    strike: Real,
    option_type: OptionType,
    exercise: ExerciseStyle,
    smoothing: bool,
}

impl ContractSpec {
    /// Create a contract; the strike must be positive and finite.
    pub fn new(
        strike: Real,
        option_type: OptionType,
        exercise: ExerciseStyle,
        smoothing: bool,
    ) -> Result<Self> {
        ensure!(
            strike.is_finite() && strike > 0.0,
            "strike must be positive, got {strike}"
        );
        Ok(Self {
            strike,
            option_type,
            exercise,
            smoothing,
        })
    }

    /// Same terms at another strike.
    pub fn with_strike(&self, strike: Real) -> Result<Self> {
        Self::new(strike, self.option_type, self.exercise, self.smoothing)
    }

    /// Same terms on the other payoff side.
    pub fn opposite(&self) -> Self {
        Self {
            option_type: self.option_type.opposite(),
            ..*self
        }
    }

    /// Strike.
    pub fn strike(&self) -> Real {
        self.strike
    }

    /// Call or put.
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Exercise style.
    pub fn exercise(&self) -> ExerciseStyle {
        self.exercise
    }

    /// Whether near-the-money smoothing is applied.
    pub fn smoothing(&self) -> bool {
        self.smoothing
    }

    /// Terminal payoff at `spot`.
    pub fn payoff(&self, spot: Real) -> Real {
        self.option_type.payoff(spot, self.strike)
    }

    /// Early-exercise value at `spot` (may be negative).
    pub fn exercise_value(&self, spot: Real) -> Real {
        self.option_type.exercise_value(spot, self.strike)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_and_rebuilds() {
        let c = ContractSpec::new(100.0, OptionType::Call, ExerciseStyle::American, true).unwrap();
        assert_eq!(c.payoff(120.0), 20.0);
        let p = c.opposite().with_strike(90.0).unwrap();
        assert_eq!(p.option_type(), OptionType::Put);
        assert_eq!(p.strike(), 90.0);
        assert!(p.smoothing());
        assert_eq!(p.exercise_value(100.0), -10.0);
    }

    #[test]
    fn rejects_bad_strike() {
        assert!(ContractSpec::new(0.0, OptionType::Put, ExerciseStyle::European, false).is_err());
        assert!(ContractSpec::new(f64::NAN, OptionType::Put, ExerciseStyle::European, false).is_err());
    }
}
