//! Spot x day risk grid
//!
//! Value and Greeks of one contract over a ladder of spot levels for every
//! day left to expiry, scaled by a contract multiplier. Feeds scenario
//! tables and "Greek vs spot" plots comparing two valuation dates.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::engine::GreeksEngine;
use crate::core::day_count::yyyymmdd;
use crate::core::{Greeks, OptionContract, PricingError, PricingResult, DAYS_PER_YEAR};
use crate::models::valuation;

/// Most spot levels a ladder may hold
pub const MAX_LADDER_LEVELS: f64 = 100_000.0;

/// Inclusive, evenly spaced spot levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotLadder {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl SpotLadder {
    pub fn new(start: f64, end: f64, step: f64) -> PricingResult<Self> {
        let ladder = Self { start, end, step };
        ladder.validate()?;
        Ok(ladder)
    }

    /// `spot · (1 ± width)` in steps of `spot · step_fraction`
    pub fn around(spot: f64, width: f64, step_fraction: f64) -> Self {
        Self {
            start: spot * (1.0 - width),
            end: spot * (1.0 + width),
            step: spot * step_fraction,
        }
    }

    pub fn validate(&self) -> PricingResult<()> {
        if !(self.start > 0.0 && self.end.is_finite()) {
            return Err(PricingError::invalid_input(format!(
                "ladder must start at a positive spot and end at a finite one, got {}..{}",
                self.start, self.end
            )));
        }
        if self.start > self.end {
            return Err(PricingError::invalid_input(format!(
                "ladder start {} is above its end {}",
                self.start, self.end
            )));
        }
        if !(self.step > 0.0 && self.step.is_finite()) {
            return Err(PricingError::invalid_input(format!("ladder step must be positive, got {}", self.step)));
        }
        let levels = (self.end - self.start) / self.step;
        if levels > MAX_LADDER_LEVELS {
            return Err(PricingError::invalid_input(format!(
                "ladder {}..{} by {} has more than {} levels",
                self.start, self.end, self.step, MAX_LADDER_LEVELS
            )));
        }
        Ok(())
    }

    /// Spot levels from `start` to `end` inclusive
    pub fn spots(&self) -> Vec<f64> {
        // Tolerate rounding when `end` sits exactly on a step
        let steps = ((self.end - self.start) / self.step + 1e-9).floor() as usize;
        (0..=steps).map(|i| self.start + i as f64 * self.step).collect()
    }
}

/// One cell of the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskGridPoint {
    /// Valuation date at which `days_to_expiry` days remain
    #[serde(with = "yyyymmdd")]
    pub date: NaiveDate,
    pub days_to_expiry: i64,
    pub spot: f64,
    /// Model value times the multiplier
    pub value: f64,
    #[serde(flatten)]
    pub greeks: Greeks,
}

impl GreeksEngine {
    /// Grid over `ladder` for every day to expiry, ordered by day then spot.
    ///
    /// Volatility is resolved once at the booked spot and full tenor.
    pub fn risk_grid(
        &self,
        contract: &OptionContract,
        ladder: &SpotLadder,
        multiplier: f64,
    ) -> PricingResult<Vec<RiskGridPoint>> {
        ladder.validate()?;
        let days = contract.day_count()?;
        let sigma = self.resolve_volatility(contract)?;
        let spots = ladder.spots();

        let cells = usize::try_from(days)
            .ok()
            .and_then(|d| d.checked_mul(spots.len()))
            .ok_or_else(|| {
                PricingError::invalid_input(format!("risk grid of {} days by {} spots is too large", days, spots.len()))
            })?;
        let mut grid = Vec::with_capacity(cells);
        for day in 1..=days {
            let time = day as f64 / DAYS_PER_YEAR;
            let date = contract.exp_date - Duration::days(day);
            for &spot in &spots {
                let v = valuation(
                    spot,
                    contract.strike,
                    contract.risk_free_rate,
                    contract.dividend_yield,
                    sigma,
                    time,
                    contract.option_type,
                )?;
                grid.push(RiskGridPoint {
                    date,
                    days_to_expiry: day,
                    spot,
                    value: v.price * multiplier,
                    greeks: v.greeks.scale(multiplier),
                });
            }
        }

        tracing::debug!(days, spots = spots.len(), sigma, "built risk grid");
        Ok(grid)
    }

    /// Grid using the configured ladder (or the default band) and multiplier
    pub fn configured_risk_grid(&self, contract: &OptionContract) -> PricingResult<Vec<RiskGridPoint>> {
        let settings = &self.config().risk_grid;
        self.risk_grid(contract, &settings.ladder_for(contract.spot), settings.multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EngineConfig, RiskGridConfig};
    use crate::core::{parse_date, OptionType};
    use crate::models::greeks;

    fn call() -> OptionContract {
        OptionContract::new(OptionType::Call, "20200801", "20200918", 280.0, 280.0, 0.0)
            .unwrap()
            .with_rate(0.05)
            .with_volatility(Some(0.3))
    }

    #[test]
    fn test_ladder_spots() {
        let ladder = SpotLadder::new(200.0, 350.0, 1.0).unwrap();
        let spots = ladder.spots();
        assert_eq!(spots.len(), 151);
        assert_eq!(spots[0], 200.0);
        assert_eq!(*spots.last().unwrap(), 350.0);

        let band = SpotLadder::around(280.0, 0.25, 0.01);
        let spots = band.spots();
        assert_eq!(spots.len(), 51);
        assert!((spots[25] - 280.0).abs() < 1e-9);
    }

    #[test]
    fn test_ladder_validation() {
        assert!(SpotLadder::new(0.0, 10.0, 1.0).is_err());
        assert!(SpotLadder::new(10.0, 5.0, 1.0).is_err());
        assert!(SpotLadder::new(5.0, 10.0, 0.0).is_err());
        assert!(SpotLadder::new(5.0, 5.0, 1.0).unwrap().spots() == vec![5.0]);
    }

    #[test]
    fn test_ladder_level_cap() {
        assert!(matches!(
            SpotLadder::new(1.0, 1e300, 1e-300),
            Err(PricingError::InvalidInput(_))
        ));
        assert!(SpotLadder::new(100.0, 200.0, 1e-6).is_err());
        assert_eq!(SpotLadder::new(0.5, 100_000.5, 1.0).unwrap().spots().len(), 100_001);

        // A ladder deserialized from config is checked again before the grid is built
        let wide = SpotLadder {
            start: 1.0,
            end: 1e300,
            step: 1e-300,
        };
        assert!(matches!(
            GreeksEngine::default().risk_grid(&call(), &wide, 1.0),
            Err(PricingError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_grid_layout() {
        let contract = call();
        let ladder = SpotLadder::new(270.0, 290.0, 5.0).unwrap();
        let grid = GreeksEngine::default().risk_grid(&contract, &ladder, 1000.0).unwrap();

        let days = contract.day_count().unwrap();
        assert_eq!(days, 48);
        assert_eq!(grid.len(), 48 * 5);

        let first = grid[0];
        assert_eq!(first.days_to_expiry, 1);
        assert_eq!(first.spot, 270.0);
        assert_eq!(first.date, parse_date("20200917").unwrap());

        let last = grid[grid.len() - 1];
        assert_eq!(last.days_to_expiry, 48);
        assert_eq!(last.spot, 290.0);
        assert_eq!(last.date, contract.eval_date);
    }

    #[test]
    fn test_grid_scaled_by_multiplier() {
        let contract = call();
        let ladder = SpotLadder::new(280.0, 280.0, 1.0).unwrap();
        let grid = GreeksEngine::default().risk_grid(&contract, &ladder, 1000.0).unwrap();

        let point = grid.iter().find(|p| p.days_to_expiry == 30).unwrap();
        let unit = greeks(280.0, 280.0, 0.05, 0.0, 0.3, 30.0 / 365.0, OptionType::Call).unwrap();
        assert!((point.greeks.delta - unit.delta * 1000.0).abs() < 1e-9);
        assert!((point.greeks.vega - unit.vega * 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_configured_grid() {
        let config = EngineConfig {
            risk_grid: RiskGridConfig {
                multiplier: 1.0,
                ladder: None,
            },
            ..Default::default()
        };
        let grid = GreeksEngine::new(config).configured_risk_grid(&call()).unwrap();
        assert_eq!(grid.len(), 48 * 51);
        assert!(grid.iter().all(|p| p.value >= 0.0));
    }

    #[test]
    fn test_grid_wire_format() {
        let ladder = SpotLadder::new(280.0, 280.0, 1.0).unwrap();
        let grid = GreeksEngine::default().risk_grid(&call(), &ladder, 1.0).unwrap();
        let value = serde_json::to_value(grid[0]).unwrap();

        assert_eq!(value["date"], "20200917");
        assert_eq!(value["daysToExpiry"], 1);
        assert!(value.get("delta").is_some());
        assert!(value.get("value").is_some());
    }
}
