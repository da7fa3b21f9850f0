//! Black-Scholes Model
//!
//! Closed-form European option price and Greeks under a flat rate `r` and a
//! continuous dividend yield `q`:
//!
//! ```text
//! d1 = (ln(S/K) + T(r - q + σ²/2)) / (σ√T)
//! d2 = d1 - σ√T
//! ```
//!
//! Theta is reported per calendar day and vega per vol point (scaled by 0.01).
//! Inputs that would divide by zero or take the log of a non-positive number
//! are rejected instead of producing NaN.

use super::normal::{norm_cdf, norm_pdf};
use crate::core::{Greeks, OptionType, PricingError, PricingResult, DAYS_PER_YEAR};

/// Price and Greeks from a single evaluation of the formulas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Valuation {
    pub price: f64,
    pub greeks: Greeks,
}

/// Reject inputs for which d1/d2 are undefined.
pub fn check_inputs(spot: f64, strike: f64, rate: f64, div: f64, vol: f64, time: f64) -> PricingResult<()> {
    if !(time > 0.0 && time.is_finite()) {
        return Err(PricingError::degenerate(format!("time to expiry must be positive, got {}", time)));
    }
    if !(vol > 0.0 && vol.is_finite()) {
        return Err(PricingError::degenerate(format!("volatility must be positive, got {}", vol)));
    }
    if !(spot > 0.0 && spot.is_finite()) || !(strike > 0.0 && strike.is_finite()) {
        return Err(PricingError::degenerate(format!(
            "spot and strike must be positive, got spot {} strike {}",
            spot, strike
        )));
    }
    if !rate.is_finite() || !div.is_finite() {
        return Err(PricingError::degenerate("rate and dividend yield must be finite"));
    }
    Ok(())
}

/// Black-Scholes d1 parameter
pub fn d1(spot: f64, strike: f64, rate: f64, div: f64, vol: f64, time: f64) -> f64 {
    ((spot / strike).ln() + time * (rate - div + 0.5 * vol * vol)) / (vol * time.sqrt())
}

/// Black-Scholes d2 parameter
pub fn d2(spot: f64, strike: f64, rate: f64, div: f64, vol: f64, time: f64) -> f64 {
    d1(spot, strike, rate, div, vol, time) - vol * time.sqrt()
}

/// Price and Greeks in one pass
pub fn valuation(
    spot: f64,
    strike: f64,
    rate: f64,
    div: f64,
    vol: f64,
    time: f64,
    option_type: OptionType,
) -> PricingResult<Valuation> {
    check_inputs(spot, strike, rate, div, vol, time)?;

    let sqrt_t = time.sqrt();
    let d1 = d1(spot, strike, rate, div, vol, time);
    let d2 = d1 - vol * sqrt_t;
    let n_prime = norm_pdf(d1);
    let q_disc = (-div * time).exp();
    let r_disc = (-rate * time).exp();

    // Shared decay term; the carry term differs by side
    let decay = -n_prime * 0.5 * spot * vol / sqrt_t;

    let (price, delta, theta) = match option_type {
        OptionType::Call => (
            norm_cdf(d1) * spot * q_disc - norm_cdf(d2) * strike * r_disc,
            q_disc * norm_cdf(d1),
            (decay - rate * strike * r_disc * norm_cdf(d2)) / DAYS_PER_YEAR,
        ),
        OptionType::Put => (
            strike * norm_cdf(-d2) * r_disc - spot * norm_cdf(-d1) * q_disc,
            q_disc * (norm_cdf(d1) - 1.0),
            (decay + rate * strike * r_disc * norm_cdf(-d2)) / DAYS_PER_YEAR,
        ),
    };

    let gamma = n_prime * q_disc / (spot * vol * sqrt_t);
    let vega = 0.01 * spot * q_disc * sqrt_t * n_prime;

    Ok(Valuation {
        price,
        greeks: Greeks::new(delta, gamma, theta, vega),
    })
}

/// Black-Scholes European option price
pub fn price(
    spot: f64,
    strike: f64,
    rate: f64,
    div: f64,
    vol: f64,
    time: f64,
    option_type: OptionType,
) -> PricingResult<f64> {
    Ok(valuation(spot, strike, rate, div, vol, time, option_type)?.price)
}

/// Black-Scholes Greeks
pub fn greeks(
    spot: f64,
    strike: f64,
    rate: f64,
    div: f64,
    vol: f64,
    time: f64,
    option_type: OptionType,
) -> PricingResult<Greeks> {
    Ok(valuation(spot, strike, rate, div, vol, time, option_type)?.greeks)
}
