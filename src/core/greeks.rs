//! Option Greeks
//!
//! First and second order sensitivities reported by the pricing engine.

use serde::{Deserialize, Serialize};

/// Option Greeks (sensitivities)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta: dV/dS (sensitivity to spot)
    pub delta: f64,
    /// Gamma: d²V/dS² (sensitivity of delta to spot)
    pub gamma: f64,
    /// Theta: dV/dt (time decay, per calendar day)
    pub theta: f64,
    /// Vega: dV/dσ per one vol point
    pub vega: f64,
}

impl Greeks {
    pub fn new(delta: f64, gamma: f64, theta: f64, vega: f64) -> Self {
        Self { delta, gamma, theta, vega }
    }

    /// Scale Greeks by a factor (e.g., for a contract multiplier)
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            delta: self.delta * factor,
            gamma: self.gamma * factor,
            theta: self.theta * factor,
            vega: self.vega * factor,
        }
    }

    /// Add two Greeks (for portfolio)
    pub fn add(&self, other: &Greeks) -> Self {
        Self {
            delta: self.delta + other.delta,
            gamma: self.gamma + other.gamma,
            theta: self.theta + other.theta,
            vega: self.vega + other.vega,
        }
    }
}

/// One point of a daily Greek term structure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GreekSnapshot {
    /// Calendar days left to expiry at this horizon (>= 1)
    pub days_to_expiry: i64,
    #[serde(flatten)]
    pub greeks: Greeks,
    /// Model price at this horizon minus the booked premium
    #[serde(rename = "PnL")]
    pub pnl: f64,
}
