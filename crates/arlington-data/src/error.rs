//! Error types for ingestion operations.

use thiserror::Error;

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading and normalizing input tables.
#[derive(Debug, Error)]
pub enum DataError {
    /// A required canonical column is absent after schema mapping.
    ///
    /// Fatal: downstream computation is meaningless without it.
    #[error("missing required column '{column}' in {table} table (accepted aliases: {aliases})")]
    MissingColumn {
        /// Canonical column name.
        column: String,
        /// Which input table the column was expected in.
        table: String,
        /// Accepted source aliases, comma separated.
        aliases: String,
    },

    /// A cell could not be parsed into its canonical type.
    #[error("parse error in {table} table, row {row}: {reason}")]
    Parse {
        /// Which input table the row belongs to.
        table: String,
        /// Zero-based row index.
        row: usize,
        /// Reason for the failure.
        reason: String,
    },

    /// An input table contained no rows.
    #[error("{table} table is empty")]
    EmptyTable {
        /// Which input table was empty.
        table: String,
    },

    /// Polars error.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
