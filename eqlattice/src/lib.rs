//! # eqlattice
//!
//! Binomial-tree pricing of American and European equity options on an
//! underlying that pays discrete cash dividends.
//!
//! This crate is a **façade** that re-exports the public items of the
//! workspace crates. Application code should depend on this crate rather
//! than the individual `eq-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use eqlattice::instruments::{ExerciseStyle, OptionType};
//! use eqlattice::pricingengines::{BinomialConfig, BinomialEngine};
//! use eqlattice::termstructures::{DividendSchedule, ZeroCurve};
//!
//! let engine = BinomialEngine::new(
//!     Arc::new(ZeroCurve::flat(0.05)?),
//!     DividendSchedule::from_times(&[0.25], &[2.0])?,
//!     100.0,
//!     0.2,
//!     1.0,
//!     ExerciseStyle::American,
//!     BinomialConfig::default().with_grid_steps(100),
//! )?;
//! let put = engine.price(OptionType::Put, 100.0)?;
//! assert!(put > 0.0);
//! # Ok::<(), eqlattice::core::Error>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use eq_core as core;

/// Normal distribution, Black formula, interpolation, 1D solvers.
pub use eq_math as math;

/// Zero curves, dividend schedules and day counting.
pub use eq_termstructures as termstructures;

/// Option payoff side, exercise style and contract terms.
pub use eq_instruments as instruments;

/// Dividend lattices, backward induction and lattice Greeks.
pub use eq_methods as methods;

/// Pricing facade, implied volatility and zero-cost collars.
pub use eq_pricingengines as pricingengines;

pub use eq_core::{Error, Result};
pub use eq_pricingengines::{
    binomial_greeks, binomial_implied_vol, binomial_price, BinomialConfig, BinomialEngine,
    BinomialRequest, CollarResult, CollarSolver,
};
