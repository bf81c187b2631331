#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/arlington/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod officials;

// Re-export main types from sub-crates
pub use arlington_data as data;
pub use arlington_output as output;
pub use arlington_stats as stats;
pub use arlington_study as study;

// Re-export common vocabulary types
pub use officials::{Party, TransactionType};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
