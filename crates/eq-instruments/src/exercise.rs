//! Option exercise style.

use eq_core::errors::Error;
use std::fmt;
use std::str::FromStr;

/// When the holder may exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExerciseStyle {
    /// Only at expiry.
    European,
    /// At any lattice step up to expiry.
    American,
}

impl ExerciseStyle {
    /// `true` for American exercise.
    pub fn is_american(self) -> bool {
        matches!(self, ExerciseStyle::American)
    }
}

impl fmt::Display for ExerciseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseStyle::European => write!(f, "European"),
            ExerciseStyle::American => write!(f, "American"),
        }
    }
}

/// Accepts `"E"`/`"European"` and `"A"`/`"American"`, case-insensitively.
impl FromStr for ExerciseStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "e" | "european" => Ok(ExerciseStyle::European),
            "a" | "american" => Ok(ExerciseStyle::American),
            other => Err(Error::InvalidArgument(format!(
                "unknown exercise style '{other}'"
            ))),
        }
    }
}
