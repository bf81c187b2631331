//! Study configuration.

use crate::error::{StudyError, StudyResult};
use serde::{Deserialize, Serialize};

/// Trading days per year, used to scale the annual risk-free rate.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// One named CAR window: inclusive calendar-day-offset bounds around the event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarWindow {
    /// Window name, e.g. "CAR5".
    pub name: String,
    /// Inclusive lower offset bound (negative = before the event).
    pub low: i64,
    /// Inclusive upper offset bound.
    pub high: i64,
}

impl CarWindow {
    /// Create a new symmetric or asymmetric window.
    pub fn new(name: &str, low: i64, high: i64) -> Self {
        Self { name: name.to_string(), low, high }
    }

    /// Whether the given relative-day offset falls inside the window.
    #[must_use]
    pub const fn contains(&self, offset: i64) -> bool {
        offset >= self.low && offset <= self.high
    }
}

/// Configuration for an event study run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Estimation window length in trading observations (default: 250).
    pub estimation_window: usize,

    /// Daily risk-free rate (default: 1% annual over 252 trading days).
    pub risk_free_daily: f64,

    /// Named CAR windows (default: CAR5, CAR10, CAR120).
    pub windows: Vec<CarWindow>,

    /// Calendar-day lookback buffer multiplier applied to the estimation
    /// window when searching past observations, to tolerate non-trading
    /// days and gaps (default: 1.5).
    pub buffer_multiplier: f64,

    /// Two-sided significance threshold for CAR mean tests (default: 0.05).
    pub significance_level: f64,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            estimation_window: 250,
            risk_free_daily: 0.01 / TRADING_DAYS_PER_YEAR,
            windows: vec![
                CarWindow::new("CAR5", -5, 5),
                CarWindow::new("CAR10", -10, 10),
                CarWindow::new("CAR120", -120, 120),
            ],
            buffer_multiplier: 1.5,
            significance_level: 0.05,
        }
    }
}

impl StudyConfig {
    /// Maximum absolute offset across all configured windows.
    ///
    /// A single shared bound sizes the abnormal-return series for every
    /// window and the AAR/CAAR aggregation.
    #[must_use]
    pub fn max_abs_offset(&self) -> i64 {
        self.windows
            .iter()
            .flat_map(|w| [w.low.abs(), w.high.abs()])
            .max()
            .unwrap_or(0)
    }

    /// Validate the configuration before a run.
    pub fn validate(&self) -> StudyResult<()> {
        if self.estimation_window < 2 {
            return Err(StudyError::InvalidConfig(format!(
                "estimation window must be at least 2, got {}",
                self.estimation_window
            )));
        }
        if self.buffer_multiplier < 1.0 {
            return Err(StudyError::InvalidConfig(format!(
                "buffer multiplier must be at least 1.0, got {}",
                self.buffer_multiplier
            )));
        }
        if self.windows.is_empty() {
            return Err(StudyError::InvalidConfig("no CAR windows configured".to_string()));
        }
        for window in &self.windows {
            if window.low > window.high {
                return Err(StudyError::InvalidConfig(format!(
                    "window '{}' has low {} > high {}",
                    window.name, window.low, window.high
                )));
            }
        }
        if !(0.0..1.0).contains(&self.significance_level) {
            return Err(StudyError::InvalidConfig(format!(
                "significance level must be in (0, 1), got {}",
                self.significance_level
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StudyConfig::default();
        assert_eq!(config.estimation_window, 250);
        assert_eq!(config.windows.len(), 3);
        assert_eq!(config.max_abs_offset(), 120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_window_contains_inclusive_bounds() {
        let window = CarWindow::new("CAR5", -5, 5);
        assert!(window.contains(-5));
        assert!(window.contains(0));
        assert!(window.contains(5));
        assert!(!window.contains(6));
        assert!(!window.contains(-6));
    }

    #[test]
    fn test_validate_rejects_inverted_bounds() {
        let config = StudyConfig {
            windows: vec![CarWindow::new("BAD", 3, -3)],
            ..StudyConfig::default()
        };
        assert!(matches!(config.validate(), Err(StudyError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_short_estimation_window() {
        let config = StudyConfig { estimation_window: 1, ..StudyConfig::default() };
        assert!(config.validate().is_err());
    }
}
