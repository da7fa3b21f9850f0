//! Greeks engine
//!
//! Two modes over one pipeline (resolve volatility, evaluate formulas,
//! assemble output):
//! - [`GreeksEngine::compute_at_expiry`]: one flat Greek set at the full tenor
//! - [`GreeksEngine::compute_term_structure`]: one snapshot per calendar day
//!   to expiry, each carrying the PnL against the booked premium
//!
//! The engine holds no mutable state, so one instance can serve any number of
//! threads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::core::day_count::yyyymmdd;
use crate::core::{
    GreekSnapshot, Greeks, OptionContract, OptionType, PricingError, PricingResult, DAYS_PER_YEAR,
};
use crate::models::{valuation, ImpliedVolSolver};

/// A contract valued at its full time to expiry.
///
/// `price` is the model price at the resolved volatility, not the booked
/// premium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedOption {
    #[serde(rename = "type")]
    pub option_type: OptionType,
    pub strike: f64,
    pub spot: f64,
    /// Resolved volatility
    pub sigma: f64,
    #[serde(with = "yyyymmdd")]
    pub eval_date: NaiveDate,
    #[serde(with = "yyyymmdd")]
    pub exp_date: NaiveDate,
    pub risk_free_rate: f64,
    #[serde(rename = "divYield")]
    pub dividend_yield: f64,
    pub time_to_expiry: f64,
    pub price: f64,
    #[serde(flatten)]
    pub greeks: Greeks,
}

/// Daily Greek/PnL term structure of a contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermStructure {
    #[serde(rename = "type")]
    pub option_type: OptionType,
    pub strike: f64,
    pub spot: f64,
    /// Resolved volatility, shared by every snapshot
    pub sigma: f64,
    #[serde(with = "yyyymmdd")]
    pub eval_date: NaiveDate,
    #[serde(with = "yyyymmdd")]
    pub exp_date: NaiveDate,
    pub risk_free_rate: f64,
    #[serde(rename = "divYield")]
    pub dividend_yield: f64,
    /// Booked premium the PnL is measured against
    pub price: f64,
    /// Ordered by strictly increasing `daysToExpiry`, from 1 to the full day count
    pub greeks: Vec<GreekSnapshot>,
}

/// Black-Scholes Greeks engine
#[derive(Debug, Clone, Default)]
pub struct GreeksEngine {
    config: EngineConfig,
    solver: ImpliedVolSolver,
}

impl GreeksEngine {
    pub fn new(config: EngineConfig) -> Self {
        let solver = ImpliedVolSolver::new(config.solver.clone());
        Self { config, solver }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The contract's own volatility, or the one implied by its booked premium
    pub fn resolve_volatility(&self, contract: &OptionContract) -> PricingResult<f64> {
        match contract.volatility {
            Some(vol) if vol > 0.0 && vol.is_finite() => Ok(vol),
            Some(vol) => Err(PricingError::degenerate(format!(
                "volatility must be positive, got {}",
                vol
            ))),
            None => Ok(self.solver.solve(contract)?.volatility),
        }
    }

    /// Price and Greeks at the contract's full time to expiry
    pub fn compute_at_expiry(&self, contract: &OptionContract) -> PricingResult<PricedOption> {
        let time = contract.time_to_expiry()?;
        let sigma = self.resolve_volatility(contract)?;
        let v = valuation(
            contract.spot,
            contract.strike,
            contract.risk_free_rate,
            contract.dividend_yield,
            sigma,
            time,
            contract.option_type,
        )?;

        tracing::debug!(
            option_type = %contract.option_type,
            strike = contract.strike,
            sigma,
            price = v.price,
            "priced contract"
        );

        Ok(PricedOption {
            option_type: contract.option_type,
            strike: contract.strike,
            spot: contract.spot,
            sigma,
            eval_date: contract.eval_date,
            exp_date: contract.exp_date,
            risk_free_rate: contract.risk_free_rate,
            dividend_yield: contract.dividend_yield,
            time_to_expiry: time,
            price: v.price,
            greeks: v.greeks,
        })
    }

    /// One snapshot per day from 1 to the full day count, at a single resolved volatility.
    ///
    /// Any failing day aborts the whole structure.
    pub fn compute_term_structure(&self, contract: &OptionContract) -> PricingResult<TermStructure> {
        let days = contract.day_count()?;
        let sigma = self.resolve_volatility(contract)?;

        let greeks = (1..=days)
            .map(|day| {
                let v = valuation(
                    contract.spot,
                    contract.strike,
                    contract.risk_free_rate,
                    contract.dividend_yield,
                    sigma,
                    day as f64 / DAYS_PER_YEAR,
                    contract.option_type,
                )?;
                Ok(GreekSnapshot {
                    days_to_expiry: day,
                    greeks: v.greeks,
                    pnl: v.price - contract.market_price,
                })
            })
            .collect::<PricingResult<Vec<_>>>()?;

        tracing::debug!(days, sigma, "built greek term structure");

        Ok(TermStructure {
            option_type: contract.option_type,
            strike: contract.strike,
            spot: contract.spot,
            sigma,
            eval_date: contract.eval_date,
            exp_date: contract.exp_date,
            risk_free_rate: contract.risk_free_rate,
            dividend_yield: contract.dividend_yield,
            price: contract.market_price,
            greeks,
        })
    }
}

/// Build a contract from raw terms and price it with the default engine.
///
/// `option_type` is the wire code (`C`/`P`, or `Call`/`Put`); `volatility`
/// of `None` solves it from `market_price`.
#[allow(clippy::too_many_arguments)]
pub fn price_option(
    option_type: &str,
    eval_date: &str,
    exp_date: &str,
    strike: f64,
    spot: f64,
    risk_free_rate: f64,
    dividend_yield: f64,
    market_price: f64,
    volatility: Option<f64>,
) -> PricingResult<PricedOption> {
    let option_type: OptionType = option_type.parse()?;
    let contract = OptionContract::new(option_type, eval_date, exp_date, strike, spot, market_price)?
        .with_rate(risk_free_rate)
        .with_dividend_yield(dividend_yield)
        .with_volatility(volatility);

    GreeksEngine::default().compute_at_expiry(&contract)
}
