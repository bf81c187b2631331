//! One-sample significance test of mean CAR against zero.

use crate::error::{StatsError, StatsResult};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Standard deviations below this are treated as zero spread.
const MIN_STD: f64 = 1e-15;

/// Result of a one-sample two-sided t test of mean = 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TTestResult {
    /// Sample size.
    pub n: usize,

    /// Sample mean.
    pub mean: f64,

    /// Sample standard deviation (N-1 denominator).
    pub std_dev: f64,

    /// t statistic: `mean / (std_dev / sqrt(n))`.
    pub t_statistic: f64,

    /// Degrees of freedom (n - 1).
    pub df: f64,

    /// Two-sided p-value.
    pub p_value: f64,
}

impl TTestResult {
    /// Whether the mean differs from zero at the given significance level.
    #[must_use]
    pub fn is_significant(&self, level: f64) -> bool {
        self.p_value < level
    }
}

/// Run a one-sample two-sided t test of the null hypothesis mean = 0.
///
/// Non-finite values are dropped before testing. Requires at least 2 usable
/// values; a sample with zero spread gets p = 1 when its mean is zero and
/// p = 0 otherwise (the statistic diverges).
pub fn one_sample_ttest(values: &[f64]) -> StatsResult<TTestResult> {
    let sample: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();

    let n = sample.len();
    if n < 2 {
        return Err(StatsError::InsufficientData { required: 2, actual: n });
    }

    let mean = sample.iter().sum::<f64>() / n as f64;
    let variance =
        sample.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std_dev = variance.sqrt();
    let df = (n - 1) as f64;

    if std_dev < MIN_STD {
        let (t_statistic, p_value) = if mean.abs() < MIN_STD {
            (0.0, 1.0)
        } else {
            (f64::INFINITY.copysign(mean), 0.0)
        };
        return Ok(TTestResult { n, mean, std_dev, t_statistic, df, p_value });
    }

    let t_statistic = mean / (std_dev / (n as f64).sqrt());
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| StatsError::Distribution(e.to_string()))?;
    let p_value = 2.0 * (1.0 - dist.cdf(t_statistic.abs()));

    Ok(TTestResult { n, mean, std_dev, t_statistic, df, p_value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_centered_sample_is_insignificant() {
        let values = vec![-0.02, -0.01, 0.0, 0.01, 0.02];

        let result = one_sample_ttest(&values).unwrap();

        assert_relative_eq!(result.mean, 0.0, epsilon = 1e-15);
        assert_relative_eq!(result.t_statistic, 0.0, epsilon = 1e-12);
        assert_relative_eq!(result.p_value, 1.0, epsilon = 1e-12);
        assert!(!result.is_significant(0.05));
    }

    #[test]
    fn test_shifted_sample_is_significant() {
        // Tight spread far from zero.
        let values: Vec<f64> = (0..30).map(|i| 0.05 + 0.0001 * (i % 3) as f64).collect();

        let result = one_sample_ttest(&values).unwrap();

        assert!(result.t_statistic > 100.0);
        assert!(result.p_value < 1e-10);
        assert!(result.is_significant(0.05));
    }

    #[test]
    fn test_known_t_statistic() {
        // mean 2, sd 1, n 4 => t = 2 / (1/2) = 4, df = 3.
        let values = vec![1.0, 2.0, 2.0, 3.0];

        let result = one_sample_ttest(&values).unwrap();

        assert_relative_eq!(result.mean, 2.0, epsilon = 1e-15);
        assert_relative_eq!(
            result.std_dev,
            (2.0_f64 / 3.0).sqrt(),
            epsilon = 1e-12
        );
        let expected_t = 2.0 / (result.std_dev / 2.0);
        assert_relative_eq!(result.t_statistic, expected_t, epsilon = 1e-12);
        assert_relative_eq!(result.df, 3.0, epsilon = 1e-15);
        assert!(result.p_value > 0.0 && result.p_value < 0.05);
    }

    #[test]
    fn test_non_finite_values_dropped() {
        let values = vec![0.01, f64::NAN, 0.02, f64::INFINITY, 0.03];

        let result = one_sample_ttest(&values).unwrap();
        assert_eq!(result.n, 3);
    }

    #[test]
    fn test_too_few_values() {
        let err = one_sample_ttest(&[0.01]).unwrap_err();
        assert!(matches!(err, StatsError::InsufficientData { required: 2, actual: 1 }));
    }

    #[test]
    fn test_constant_nonzero_sample_degenerates_to_certainty() {
        let result = one_sample_ttest(&[0.01, 0.01, 0.01]).unwrap();
        assert_eq!(result.p_value, 0.0);
        assert!(result.t_statistic.is_infinite());
    }
}
