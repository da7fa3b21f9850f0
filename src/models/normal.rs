//! Standard normal distribution
//!
//! A zero-sized, immutable provider shared by every valuation. There is no
//! state to guard, so any number of threads may use it concurrently.

use std::f64::consts::{PI, SQRT_2};

use statrs::function::erf::erfc;

/// N(0, 1): cumulative distribution and density
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardNormal;

/// Shared instance used by the pricing formulas
pub const STANDARD_NORMAL: StandardNormal = StandardNormal;

impl StandardNormal {
    /// Φ(x), accurate in both tails
    pub fn cdf(&self, x: f64) -> f64 {
        0.5 * erfc(-x / SQRT_2)
    }

    /// φ(x)
    pub fn pdf(&self, x: f64) -> f64 {
        (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
    }
}

/// Standard normal CDF
pub fn norm_cdf(x: f64) -> f64 {
    STANDARD_NORMAL.cdf(x)
}

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    STANDARD_NORMAL.pdf(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_norm_cdf() {
        assert!((norm_cdf(0.0) - 0.5).abs() < 1e-10);
        assert!((norm_cdf(1.96) - 0.975).abs() < 0.001);
        assert!((norm_cdf(-1.96) - 0.025).abs() < 0.001);
        assert!(norm_cdf(-40.0) >= 0.0);
        assert!(norm_cdf(40.0) <= 1.0);
    }

    #[test]
    fn test_cdf_symmetry() {
        for x in [0.1, 0.5, 1.0, 2.5, 4.0] {
            assert!((norm_cdf(x) + norm_cdf(-x) - 1.0).abs() < 1e-14);
        }
    }

    #[test]
    fn test_norm_pdf() {
        assert!((norm_pdf(0.0) - 0.398_942_280_401_432_7).abs() < 1e-15);
        assert_eq!(norm_pdf(1.3), norm_pdf(-1.3));
        assert!(norm_pdf(50.0) >= 0.0);
    }

    #[test]
    fn test_shared_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|i| std::thread::spawn(move || STANDARD_NORMAL.cdf(i as f64 * 0.5)))
            .collect();
        let results: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        for (i, r) in results.iter().enumerate() {
            assert_eq!(*r, norm_cdf(i as f64 * 0.5));
        }
    }
}
