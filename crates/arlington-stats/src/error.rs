//! Error types for regression and testing operations.

use thiserror::Error;

/// Result type for statistics operations.
pub type StatsResult<T> = std::result::Result<T, StatsError>;

/// Errors that can occur during regression or significance testing.
#[derive(Debug, Error)]
pub enum StatsError {
    /// Too few usable rows for the requested fit.
    ///
    /// Recoverable: the caller skips this analysis and continues.
    #[error("insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Required number of observations.
        required: usize,
        /// Observations actually available.
        actual: usize,
    },

    /// The design matrix is rank deficient.
    ///
    /// Recoverable: the caller skips this analysis and continues.
    #[error("rank deficient design matrix at pivot column {column}")]
    RankDeficient {
        /// Column index where elimination found no usable pivot.
        column: usize,
    },

    /// No rows contributed to an aggregation or grouping.
    ///
    /// Recoverable: that specific output is skipped with a warning.
    #[error("empty result: {0}")]
    EmptyResult(String),

    /// Mismatched input lengths.
    #[error("dimension mismatch for {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
        /// What was being compared.
        context: String,
    },

    /// A distribution could not be constructed from the fit's degrees of
    /// freedom.
    #[error("distribution error: {0}")]
    Distribution(String),
}

impl StatsError {
    /// Whether the caller should skip this analysis and continue.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InsufficientData { .. } | Self::RankDeficient { .. } | Self::EmptyResult(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(StatsError::InsufficientData { required: 5, actual: 2 }.is_recoverable());
        assert!(StatsError::RankDeficient { column: 1 }.is_recoverable());
        assert!(StatsError::EmptyResult("sector".into()).is_recoverable());
        assert!(
            !StatsError::DimensionMismatch { expected: 3, actual: 2, context: "cars".into() }
                .is_recoverable()
        );
    }
}
