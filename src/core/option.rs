//! Option contract definitions
//!
//! A vanilla European contract as booked: strike, dates, flat rate and
//! dividend yield, the observed premium and optionally a known volatility.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::day_count::{self, DAYS_PER_YEAR};
use super::error::{PricingError, PricingResult};

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    #[serde(rename = "C", alias = "Call")]
    Call,
    #[serde(rename = "P", alias = "Put")]
    Put,
}

impl OptionType {
    /// Payoff direction: +1 for call, -1 for put
    pub fn phi(&self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    /// Single-letter wire code
    pub fn code(&self) -> &'static str {
        match self {
            OptionType::Call => "C",
            OptionType::Put => "P",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for OptionType {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" | "call" => Ok(OptionType::Call),
            "p" | "put" => Ok(OptionType::Put),
            _ => Err(PricingError::unsupported_type(s)),
        }
    }
}

/// Legacy wire marker for "volatility unknown"
const UNKNOWN_SIGMA_SENTINEL: f64 = -1.0;

/// Raw contract terms as they cross the JSON boundary.
///
/// Every field is kept in its wire form; [`OptionContract`] is the validated
/// counterpart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractTerms {
    #[serde(rename = "type")]
    pub option_type: String,
    pub strike: f64,
    pub spot: f64,
    /// Absent, null or -1 means "solve it from `price`"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sigma: Option<f64>,
    pub eval_date: String,
    pub exp_date: String,
    #[serde(default)]
    pub risk_free_rate: f64,
    #[serde(default, rename = "divYield")]
    pub div_yield: f64,
    /// Observed / booked premium
    #[serde(default)]
    pub price: f64,
}

/// Validated vanilla European option contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ContractTerms", into = "ContractTerms")]
pub struct OptionContract {
    /// Call or put
    pub option_type: OptionType,
    /// Strike price
    pub strike: f64,
    /// Underlying spot at evaluation
    pub spot: f64,
    /// Annualized flat risk-free rate (continuous)
    pub risk_free_rate: f64,
    /// Annualized continuous dividend yield
    pub dividend_yield: f64,
    /// Known volatility; `None` means solve from `market_price`
    pub volatility: Option<f64>,
    /// Evaluation (trade) date
    pub eval_date: NaiveDate,
    /// Expiration date
    pub exp_date: NaiveDate,
    /// Observed / booked premium
    pub market_price: f64,
}

impl OptionContract {
    /// Create a contract with zero rate, zero dividend yield and unknown volatility.
    pub fn new(
        option_type: OptionType,
        eval_date: &str,
        exp_date: &str,
        strike: f64,
        spot: f64,
        market_price: f64,
    ) -> PricingResult<Self> {
        let eval = day_count::parse_date(eval_date)?;
        let exp = day_count::parse_date(exp_date)?;
        day_count::days_between(eval, exp)?;

        if !(strike > 0.0 && strike.is_finite()) {
            return Err(PricingError::invalid_input(format!("strike must be positive, got {}", strike)));
        }
        if !(spot > 0.0 && spot.is_finite()) {
            return Err(PricingError::invalid_input(format!("spot must be positive, got {}", spot)));
        }

        Ok(Self {
            option_type,
            strike,
            spot,
            risk_free_rate: 0.0,
            dividend_yield: 0.0,
            volatility: None,
            eval_date: eval,
            exp_date: exp,
            market_price,
        })
    }

    pub fn with_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = rate;
        self
    }

    pub fn with_dividend_yield(mut self, div: f64) -> Self {
        self.dividend_yield = div;
        self
    }

    pub fn with_volatility(mut self, vol: Option<f64>) -> Self {
        self.volatility = vol;
        self
    }

    /// Whole calendar days from evaluation to expiry
    pub fn day_count(&self) -> PricingResult<i64> {
        day_count::days_between(self.eval_date, self.exp_date)
    }

    /// Time to expiry in years (Act/365 Fixed)
    pub fn time_to_expiry(&self) -> PricingResult<f64> {
        Ok(self.day_count()? as f64 / DAYS_PER_YEAR)
    }
}

impl TryFrom<ContractTerms> for OptionContract {
    type Error = PricingError;

    fn try_from(terms: ContractTerms) -> Result<Self, Self::Error> {
        let option_type: OptionType = terms.option_type.parse()?;

        let volatility = match terms.sigma {
            None => None,
            Some(s) if s == UNKNOWN_SIGMA_SENTINEL => None,
            Some(s) if s > 0.0 && s.is_finite() => Some(s),
            Some(s) => {
                return Err(PricingError::degenerate(format!(
                    "volatility must be positive, got {}",
                    s
                )))
            }
        };

        Ok(OptionContract::new(
            option_type,
            &terms.eval_date,
            &terms.exp_date,
            terms.strike,
            terms.spot,
            terms.price,
        )?
        .with_rate(terms.risk_free_rate)
        .with_dividend_yield(terms.div_yield)
        .with_volatility(volatility))
    }
}

impl From<OptionContract> for ContractTerms {
    fn from(contract: OptionContract) -> Self {
        Self {
            option_type: contract.option_type.code().to_string(),
            strike: contract.strike,
            spot: contract.spot,
            sigma: contract.volatility,
            eval_date: day_count::format_date(contract.eval_date),
            exp_date: day_count::format_date(contract.exp_date),
            risk_free_rate: contract.risk_free_rate,
            div_yield: contract.dividend_yield,
            price: contract.market_price,
        }
    }
}
