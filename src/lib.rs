//! # Vanilla Greeks - Black-Scholes pricing and Greek term structures
//!
//! Prices vanilla European options under Black-Scholes with a flat risk-free
//! rate and a continuous dividend yield, and derives their risk.
//!
//! ## Key Components
//!
//! - **Day counting**: `YYYYMMDD` dates, Actual/365 Fixed year fractions
//! - **Black-Scholes**: closed-form price, delta, gamma, theta, vega
//! - **Implied volatility**: Newton-Raphson from the booked premium
//! - **Greeks engine**: a flat Greek set at full tenor, or one snapshot per
//!   day to expiry with PnL against the booked premium
//! - **Risk grid**: Greeks over a spot ladder for every day to expiry
//!
//! ## Usage
//!
//! ```rust
//! use vanilla_greeks::prelude::*;
//!
//! let contract = OptionContract::new(OptionType::Put, "20200510", "20210510", 280.0, 280.0, 26.191744957864472)
//!     .unwrap()
//!     .with_rate(0.05);
//!
//! let engine = GreeksEngine::default();
//! let priced = engine.compute_at_expiry(&contract).unwrap();
//! assert!((priced.sigma - 0.3).abs() < 1e-3);
//!
//! let term = engine.compute_term_structure(&contract).unwrap();
//! assert_eq!(term.greeks.len(), 365);
//! ```
//!
//! ## What This Crate Does NOT Do
//!
//! - American or exotic options
//! - Volatility surfaces across strikes
//! - Market data ingestion
//! - Multi-curve discounting

pub mod config;
pub mod core;
pub mod models;
pub mod pricing;

/// Prelude with commonly used types
pub mod prelude {
    pub use crate::config::{EngineConfig, RiskGridConfig, SolverConfig};

    pub use crate::core::{
        day_count, parse_date, year_fraction, ContractTerms, GreekSnapshot, Greeks, OptionContract, OptionType,
        PricingError, PricingResult,
    };

    pub use crate::models::{
        greeks as bs_greeks, implied_volatility, norm_cdf, norm_pdf, price as bs_price, valuation, ImpliedVolSolver,
        IvProblem, IvSolution, StandardNormal, Valuation, STANDARD_NORMAL,
    };

    pub use crate::pricing::{price_option, GreeksEngine, PricedOption, RiskGridPoint, SpotLadder, TermStructure};
}

// Re-export main types at crate root
pub use crate::core::{PricingError, PricingResult};
pub use crate::pricing::{price_option, GreeksEngine};
