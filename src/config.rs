//! Engine configuration
//!
//! Every field has a default, so a partial JSON document (or none at all)
//! yields the standard behavior: a 100-step Newton budget that always returns
//! its last iterate.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{PricingError, PricingResult};
use crate::pricing::SpotLadder;

/// Top-level configuration for [`crate::pricing::GreeksEngine`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Implied volatility solver
    pub solver: SolverConfig,
    /// Spot x day risk grid
    pub risk_grid: RiskGridConfig,
}

impl EngineConfig {
    pub fn from_json_str(raw: &str) -> PricingResult<Self> {
        let config: EngineConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> PricingResult<Self> {
        let raw = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&raw)?;
        tracing::info!("Loaded engine config from {:?}", path.as_ref());
        Ok(config)
    }

    pub fn validate(&self) -> PricingResult<()> {
        self.solver.validate()?;
        self.risk_grid.validate()
    }
}

/// Newton-Raphson solver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Iteration budget
    /// Default: 100
    pub max_iterations: usize,

    /// Early-stop threshold on |model - market|
    /// Default: 1e-25 (in practice the full budget runs)
    pub tolerance: f64,

    /// Residual at or below which a result counts as converged
    /// Default: 1e-6
    pub convergence_tolerance: f64,

    /// Fail with `NonConvergence` instead of returning an unconverged iterate
    /// Default: false
    pub require_convergence: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-25,
            convergence_tolerance: 1e-6,
            require_convergence: false,
        }
    }
}

impl SolverConfig {
    /// Reject any result whose residual exceeds 1e-8
    pub fn strict() -> Self {
        Self {
            convergence_tolerance: 1e-8,
            require_convergence: true,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> PricingResult<()> {
        if self.max_iterations == 0 {
            return Err(PricingError::config("solver.max_iterations must be at least 1"));
        }
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(PricingError::config("solver.tolerance must be non-negative"));
        }
        if !(self.convergence_tolerance > 0.0 && self.convergence_tolerance.is_finite()) {
            return Err(PricingError::config("solver.convergence_tolerance must be positive and finite"));
        }
        Ok(())
    }
}

/// Risk grid settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskGridConfig {
    /// Contract multiplier applied to value and Greeks
    /// Default: 1000
    pub multiplier: f64,

    /// Spot ladder; `None` means ±25% of spot in 1% steps
    pub ladder: Option<SpotLadder>,
}

impl Default for RiskGridConfig {
    fn default() -> Self {
        Self {
            multiplier: 1000.0,
            ladder: None,
        }
    }
}

impl RiskGridConfig {
    pub fn validate(&self) -> PricingResult<()> {
        if !self.multiplier.is_finite() {
            return Err(PricingError::config("risk_grid.multiplier must be finite"));
        }
        if let Some(ladder) = &self.ladder {
            ladder
                .validate()
                .map_err(|e| PricingError::config(format!("risk_grid.ladder: {}", e)))?;
        }
        Ok(())
    }

    /// Configured ladder, or the default band around `spot`
    pub fn ladder_for(&self, spot: f64) -> SpotLadder {
        self.ladder.clone().unwrap_or_else(|| SpotLadder::around(spot, 0.25, 0.01))
    }
}
