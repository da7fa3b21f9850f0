//! Error types for vanilla option pricing

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Invalid date '{0}': expected an 8-digit YYYYMMDD calendar date")]
    DateFormat(String),

    #[error("Expiry date {exp} is not after evaluation date {eval}")]
    DateOrder { eval: String, exp: String },

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Unsupported option type '{0}': use C (call) or P (put)")]
    UnsupportedOptionType(String),

    #[error("Implied volatility solver diverged: {0}")]
    SolverDiverged(String),

    #[error("Implied volatility did not converge after {iterations} iterations (residual {residual:e})")]
    NonConvergence { residual: f64, iterations: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type PricingResult<T> = Result<T, PricingError>;

impl PricingError {
    pub fn date_format(value: impl Into<String>) -> Self {
        Self::DateFormat(value.into())
    }

    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateInput(msg.into())
    }

    pub fn unsupported_type(value: impl Into<String>) -> Self {
        Self::UnsupportedOptionType(value.into())
    }

    pub fn diverged(msg: impl Into<String>) -> Self {
        Self::SolverDiverged(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<serde_json::Error> for PricingError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
