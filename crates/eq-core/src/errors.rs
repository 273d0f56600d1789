//! Error types for the lattice pricer.
//!
//! Construction-time problems (bad inputs, an unbuildable lattice, a
//! risk-neutral probability outside `[0, 1]`) are reported through a single
//! `thiserror`-derived enum.  Iterative searches that fail to converge are
//! *not* errors; they report sentinel values instead (see the solver docs).

use thiserror::Error;

/// The top-level error type used throughout the workspace.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Precondition violated (see [`ensure!`](crate::ensure)).
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// The lattice cannot be built from the given inputs: the up/down
    /// discriminant is negative or a proportional dividend exceeds the spot.
    #[error("invalid lattice input: {0}")]
    InvalidLatticeInput(String),

    /// A per-step risk-neutral probability fell outside `[0, 1]`.
    #[error("risk-neutral probability {probability} at step {step} is outside [0, 1]")]
    ProbabilityOutOfRange {
        /// Step of the lattice.
        step: usize,
        /// The offending up-probability.
        probability: f64,
    },

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Shorthand `Result` type used throughout the workspace.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use eq_core::{ensure, errors::Error};
/// fn positive(x: f64) -> eq_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(positive(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}
