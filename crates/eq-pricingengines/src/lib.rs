//! # eq-pricingengines
//!
//! Single-call entry points over the lattice machinery.
//!
//! ## Engines
//!
//! - [`BinomialEngine`]: prices, Greeks and implied volatility of one
//!   underlying on a dividend-adjusted binomial lattice
//! - [`BinomialRequest`]: date-based request mirroring a spreadsheet call
//!   (dates, zero-rate pillars, dividend dates and amounts)
//! - [`CollarSolver`]: Newton search for zero-cost collar strikes
//! - [`black_scholes`], [`black_scholes_forward`], [`atm_forward`]: closed
//!   forms used for comparison and as the collar's starting point

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod binomial_engine;
pub mod black_scholes;
pub mod collar;
pub mod config;

pub use binomial_engine::{
    binomial_greeks, binomial_implied_vol, binomial_price, BinomialEngine, BinomialRequest,
};
pub use black_scholes::{atm_forward, black_scholes, black_scholes_discrete, black_scholes_forward};
pub use collar::{CollarResult, CollarSolver};
pub use config::{BinomialConfig, CollarConfig, ImpliedVolConfig, DEFAULT_GRID_STEPS};
