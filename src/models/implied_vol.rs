//! Implied volatility solver
//!
//! Newton-Raphson on the price residual, started from the
//! Brenner-Subrahmanyam approximation `σ0 = √(2π/T) · price / S`.
//!
//! The iteration runs for a fixed budget and stops early only once the
//! residual drops below the configured tolerance. By default the last iterate
//! is returned whether or not it converged; `SolverConfig::require_convergence`
//! turns an unconverged result into an error.

use std::f64::consts::PI;

use super::black_scholes::d1;
use super::normal::{norm_cdf, norm_pdf};
use crate::config::SolverConfig;
use crate::core::{OptionContract, OptionType, PricingError, PricingResult};

/// Inputs of one implied volatility problem
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IvProblem {
    pub market_price: f64,
    pub spot: f64,
    pub strike: f64,
    pub rate: f64,
    pub div: f64,
    pub time: f64,
    pub option_type: OptionType,
}

impl IvProblem {
    /// Problem posed by a booked contract at its full time to expiry
    pub fn from_contract(contract: &OptionContract) -> PricingResult<Self> {
        Ok(Self {
            market_price: contract.market_price,
            spot: contract.spot,
            strike: contract.strike,
            rate: contract.risk_free_rate,
            div: contract.dividend_yield,
            time: contract.time_to_expiry()?,
            option_type: contract.option_type,
        })
    }

    /// Brenner-Subrahmanyam starting point
    pub fn initial_guess(&self) -> f64 {
        (2.0 * PI / self.time).sqrt() * self.market_price / self.spot
    }
}

/// Result of a solver run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IvSolution {
    /// Last iterate
    pub volatility: f64,
    /// Newton steps taken
    pub iterations: usize,
    /// Model price minus market price at the last evaluated iterate
    pub residual: f64,
    /// Whether |residual| is within the acceptance tolerance
    pub converged: bool,
}

/// Newton-Raphson implied volatility solver
#[derive(Debug, Clone, Default)]
pub struct ImpliedVolSolver {
    config: SolverConfig,
}

impl ImpliedVolSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve for the volatility reproducing a contract's booked premium.
    pub fn solve(&self, contract: &OptionContract) -> PricingResult<IvSolution> {
        self.solve_problem(&IvProblem::from_contract(contract)?)
    }

    pub fn solve_problem(&self, p: &IvProblem) -> PricingResult<IvSolution> {
        if !(p.time > 0.0 && p.time.is_finite()) {
            return Err(PricingError::degenerate(format!(
                "time to expiry must be positive, got {}",
                p.time
            )));
        }
        if !(p.spot > 0.0 && p.spot.is_finite()) || !(p.strike > 0.0 && p.strike.is_finite()) {
            return Err(PricingError::degenerate("spot and strike must be positive"));
        }

        let sqrt_t = p.time.sqrt();
        let cp = p.option_type.phi();
        let r_disc = (-p.rate * p.time).exp();

        let mut vol = p.initial_guess();
        let mut residual = f64::INFINITY;
        let mut iterations = 0;

        tracing::debug!(initial_guess = vol, market_price = p.market_price, "solving implied volatility");

        for _ in 0..self.config.max_iterations {
            let d1 = d1(p.spot, p.strike, p.rate, p.div, vol, p.time);
            let d2 = d1 - vol * sqrt_t;
            let vega = p.spot * norm_pdf(d1) * sqrt_t;
            let model = cp * p.spot * norm_cdf(cp * d1) - cp * p.strike * r_disc * norm_cdf(cp * d2);

            residual = model - p.market_price;
            iterations += 1;

            if !(vega.is_finite() && vega > 0.0) {
                return Err(PricingError::diverged(format!(
                    "vega vanished at iteration {} (vol {}, residual {:e})",
                    iterations, vol, residual
                )));
            }

            vol -= residual / vega;

            if !vol.is_finite() {
                return Err(PricingError::diverged(format!(
                    "non-finite volatility at iteration {}",
                    iterations
                )));
            }
            if residual.abs() < self.config.tolerance {
                break;
            }
        }

        if vol <= 0.0 {
            return Err(PricingError::diverged(format!(
                "solver ended on non-positive volatility {} (residual {:e})",
                vol, residual
            )));
        }

        let converged = residual.abs() <= self.config.convergence_tolerance;
        if !converged {
            if self.config.require_convergence {
                return Err(PricingError::NonConvergence { residual, iterations });
            }
            tracing::warn!(
                volatility = vol,
                residual,
                iterations,
                "implied volatility not converged, returning last iterate"
            );
        } else {
            tracing::debug!(volatility = vol, residual, iterations, "implied volatility solved");
        }

        Ok(IvSolution {
            volatility: vol,
            iterations,
            residual,
            converged,
        })
    }
}

/// Implied volatility with the default solver settings
pub fn implied_volatility(
    market_price: f64,
    spot: f64,
    strike: f64,
    rate: f64,
    div: f64,
    time: f64,
    option_type: OptionType,
) -> PricingResult<f64> {
    let problem = IvProblem {
        market_price,
        spot,
        strike,
        rate,
        div,
        time,
        option_type,
    };
    Ok(ImpliedVolSolver::default().solve_problem(&problem)?.volatility)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::black_scholes::price;

    #[test]
    fn test_implied_vol() {
        let spot = 100.0;
        let strike = 100.0;
        let rate = 0.05;
        let vol: f64 = 0.25;
        let time = 0.5;

        let market_price = price(spot, strike, rate, 0.0, vol, time, OptionType::Call).unwrap();
        let iv = implied_volatility(market_price, spot, strike, rate, 0.0, time, OptionType::Call).unwrap();

        assert!((iv - vol).abs() < 1e-4);
    }

    fn assert_round_trip(spot: f64, strike: f64, rate: f64, vol: f64, time: f64, option_type: OptionType) {
        let market_price = price(spot, strike, rate, 0.0, vol, time, option_type).unwrap();
        let iv = implied_volatility(market_price, spot, strike, rate, 0.0, time, option_type).unwrap();
        assert!(
            (iv - vol).abs() < 1e-4,
            "vol {} time {} strike {} {:?}: got {}",
            vol,
            time,
            strike,
            option_type,
            iv
        );
    }

    #[test]
    fn test_round_trip_at_the_forward() {
        let spot = 280.0;
        let rate: f64 = 0.05;

        for &vol in &[0.05, 0.1, 0.2, 0.3, 0.5, 0.75, 1.0] {
            for &time in &[7.0_f64 / 365.0, 30.0 / 365.0, 0.5, 1.0, 2.0] {
                let forward = spot * (rate * time).exp();
                assert_round_trip(spot, forward, rate, vol, time, OptionType::Call);
                assert_round_trip(spot, forward, rate, vol, time, OptionType::Put);
            }
        }
    }

    #[test]
    fn test_round_trip_within_half_a_deviation_of_the_forward() {
        // Newton from the Brenner-Subrahmanyam start recovers the volatility
        // whenever |ln(F/K)| <= 0.5 * vol * sqrt(T)
        let spot = 280.0;
        let rate: f64 = 0.05;
        let mut checked = 0;

        for &vol in &[0.05_f64, 0.1, 0.15, 0.2, 0.25, 0.3, 0.4, 0.5, 0.75, 1.0] {
            for &time in &[7.0_f64 / 365.0, 14.0 / 365.0, 30.0 / 365.0, 60.0 / 365.0, 0.25, 0.5, 1.0, 1.5, 2.0] {
                let forward = spot * (rate * time).exp();
                for strike in (230..=330).step_by(4).map(f64::from) {
                    if (forward / strike).ln().abs() > 0.5 * vol * time.sqrt() {
                        continue;
                    }
                    assert_round_trip(spot, strike, rate, vol, time, OptionType::Call);
                    assert_round_trip(spot, strike, rate, vol, time, OptionType::Put);
                    checked += 1;
                }
            }
        }
        assert!(checked > 1000);
    }

    #[test]
    fn test_low_vol_out_of_the_money_diverges() {
        // At 5% vol the one-year ATM-spot put is well out of the money against
        // the forward. The first step overshoots to a volatility where vega
        // underflows, which must surface as an error rather than a number.
        for &time in &[1.0, 2.0] {
            let market_price = price(280.0, 280.0, 0.05, 0.0, 0.05, time, OptionType::Put).unwrap();
            let err = implied_volatility(market_price, 280.0, 280.0, 0.05, 0.0, time, OptionType::Put).unwrap_err();
            assert!(matches!(err, PricingError::SolverDiverged(_)), "time {}: {:?}", time, err);
        }
    }

    #[test]
    fn test_negative_final_iterate_diverges() {
        // Premium below intrinsic: one step from the starting guess lands
        // below zero volatility
        let config = SolverConfig {
            max_iterations: 1,
            ..SolverConfig::default()
        };
        let problem = IvProblem {
            market_price: 60.0,
            spot: 280.0,
            strike: 200.0,
            rate: 0.05,
            div: 0.0,
            time: 1.0,
            option_type: OptionType::Call,
        };

        match ImpliedVolSolver::new(config).solve_problem(&problem) {
            Err(PricingError::SolverDiverged(msg)) => assert!(msg.contains("non-positive")),
            other => panic!("expected SolverDiverged, got {:?}", other),
        }
    }

    #[test]
    fn test_solution_reports_convergence() {
        let market_price = price(280.0, 280.0, 0.05, 0.0, 0.3, 1.0, OptionType::Put).unwrap();
        let problem = IvProblem {
            market_price,
            spot: 280.0,
            strike: 280.0,
            rate: 0.05,
            div: 0.0,
            time: 1.0,
            option_type: OptionType::Put,
        };
        let solution = ImpliedVolSolver::default().solve_problem(&problem).unwrap();

        assert!(solution.converged);
        assert!(solution.residual.abs() < 1e-8);
        assert!(solution.iterations >= 1 && solution.iterations <= 100);
        assert!((solution.volatility - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_initial_guess() {
        let problem = IvProblem {
            market_price: 26.191744957864472,
            spot: 280.0,
            strike: 280.0,
            rate: 0.05,
            div: 0.0,
            time: 1.0,
            option_type: OptionType::Put,
        };
        let expected = (2.0 * PI).sqrt() * 26.191744957864472 / 280.0;
        assert_eq!(problem.initial_guess(), expected);
    }

    #[test]
    fn test_strict_mode_reports_non_convergence() {
        let config = SolverConfig {
            max_iterations: 1,
            ..SolverConfig::strict()
        };
        // A single Newton step from the starting guess cannot land within 1e-8
        let market_price = price(280.0, 250.0, 0.05, 0.0, 0.6, 0.5, OptionType::Call).unwrap();
        let problem = IvProblem {
            market_price,
            spot: 280.0,
            strike: 250.0,
            rate: 0.05,
            div: 0.0,
            time: 0.5,
            option_type: OptionType::Call,
        };

        match ImpliedVolSolver::new(config).solve_problem(&problem) {
            Err(PricingError::NonConvergence { iterations, residual }) => {
                assert_eq!(iterations, 1);
                assert!(residual.abs() > 1e-8);
            }
            other => panic!("expected NonConvergence, got {:?}", other),
        }

        // The lenient default returns the last iterate instead
        let lenient = SolverConfig {
            max_iterations: 1,
            ..SolverConfig::default()
        };
        let solution = ImpliedVolSolver::new(lenient).solve_problem(&problem).unwrap();
        assert!(!solution.converged);
        assert!(solution.volatility > 0.0);
    }

    #[test]
    fn test_zero_premium_diverges() {
        // Starting guess of zero volatility leaves d1 undefined and vega at zero
        let err = implied_volatility(0.0, 280.0, 280.0, 0.05, 0.0, 1.0, OptionType::Call).unwrap_err();
        assert!(matches!(err, PricingError::SolverDiverged(_)));
    }

    #[test]
    fn test_degenerate_time() {
        let err = implied_volatility(10.0, 280.0, 280.0, 0.05, 0.0, 0.0, OptionType::Call).unwrap_err();
        assert!(matches!(err, PricingError::DegenerateInput(_)));
    }
}
