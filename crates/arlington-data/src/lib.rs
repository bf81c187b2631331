#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/arlington/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod amount;
pub mod error;
pub mod loader;
pub mod schema;

pub use error::{DataError, Result};
pub use loader::{EventRecord, FactorRecords, MarketRecord, ReturnRecord};
pub use schema::{SchemaMapping, TableMapping};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
