//! Pricing models
//!
//! Implements:
//! - Standard normal distribution (shared, stateless)
//! - Black-Scholes closed-form price and Greeks
//! - Newton-Raphson implied volatility

pub mod black_scholes;
pub mod implied_vol;
pub mod normal;

pub use black_scholes::{check_inputs, d1, d2, greeks, price, valuation, Valuation};
pub use implied_vol::*;
pub use normal::*;
