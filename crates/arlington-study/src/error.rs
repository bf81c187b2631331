//! Error types for the event-study engine.

use thiserror::Error;

/// Result type for study operations.
pub type StudyResult<T> = std::result::Result<T, StudyError>;

/// Errors that can occur while processing an event.
#[derive(Debug, Error)]
pub enum StudyError {
    /// The estimation window holds fewer observations than required.
    ///
    /// Recoverable: the event is skipped and processing continues.
    #[error("insufficient data: need {required} observations, got {actual}")]
    InsufficientData {
        /// Required number of observations.
        required: usize,
        /// Observations actually found.
        actual: usize,
    },

    /// The market-model regression is degenerate (no market variance).
    ///
    /// Recoverable: the event is skipped and processing continues.
    #[error("degenerate fit: market excess return has no variance over {n_valid} observations")]
    DegenerateFit {
        /// Valid paired observations that entered the fit.
        n_valid: usize,
    },

    /// No return series exists for the entity at all.
    ///
    /// Recoverable: the event is skipped and processing continues.
    #[error("no return series for entity '{entity}'")]
    UnknownEntity {
        /// Entity identifier.
        entity: String,
    },

    /// The study configuration is invalid.
    ///
    /// Not recoverable: the run cannot start.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl StudyError {
    /// Whether the caller should skip the current event and continue.
    ///
    /// Per-event numeric failures never escalate to a run-level failure;
    /// configuration failures always do.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InsufficientData { .. } | Self::DegenerateFit { .. } | Self::UnknownEntity { .. }
        )
    }
}
