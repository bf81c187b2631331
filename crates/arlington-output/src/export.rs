//! Export of event-study outputs.
//!
//! The per-event result table has dynamic CAR columns (one per configured
//! window), so CSV rows are written field-by-field; the AAR/CAAR series has
//! a fixed shape and serializes directly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }

    /// Parse a format name ("csv", "json", "pretty-json").
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "pretty-json" | "pretty_json" => Some(Self::PrettyJson),
            _ => None,
        }
    }
}

/// One row of the persisted per-event result table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventResultRow {
    /// Entity (ticker) identifier.
    pub entity: String,

    /// Trade date.
    pub trade_date: NaiveDate,

    /// CAR per window name; `None` marks missing data, not zero.
    pub cars: BTreeMap<String, Option<f64>>,

    /// Party affiliation passthrough.
    pub party: Option<String>,

    /// Transaction type passthrough.
    pub transaction_type: Option<String>,

    /// Normalized amount passthrough.
    pub amount: Option<f64>,

    /// Sector passthrough.
    pub sector: Option<String>,
}

/// One row of the exported AAR/CAAR series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AarExportRow {
    /// Relative calendar-day offset from the event date.
    pub offset: i64,

    /// Average abnormal return at this offset.
    pub aar: f64,

    /// Cumulative average abnormal return at this offset.
    pub caar: f64,

    /// Events contributing at this offset.
    pub n_events: usize,
}

/// Writes study outputs in the configured format.
#[derive(Debug, Clone, Copy)]
pub struct Exporter {
    format: ExportFormat,
}

impl Exporter {
    /// Create an exporter for the given format.
    #[must_use]
    pub const fn new(format: ExportFormat) -> Self {
        Self { format }
    }

    /// The exporter's format.
    #[must_use]
    pub const fn format(&self) -> ExportFormat {
        self.format
    }

    /// Write the per-event result table to `path`.
    ///
    /// `window_names` fixes the CAR column order; rows are written in input
    /// order so identical runs produce byte-identical files.
    pub fn export_results(
        &self,
        rows: &[EventResultRow],
        window_names: &[String],
        path: &Path,
    ) -> Result<(), ExportError> {
        match self.format {
            ExportFormat::Csv => self.write_results_csv(rows, window_names, path),
            ExportFormat::Json | ExportFormat::PrettyJson => self.write_json(rows, path),
        }
    }

    /// Write the AAR/CAAR series to `path`.
    pub fn export_aar(&self, rows: &[AarExportRow], path: &Path) -> Result<(), ExportError> {
        match self.format {
            ExportFormat::Csv => {
                let mut writer = csv::Writer::from_path(path)?;
                for row in rows {
                    writer.serialize(row)?;
                }
                writer.flush()?;
                Ok(())
            }
            ExportFormat::Json | ExportFormat::PrettyJson => self.write_json(rows, path),
        }
    }

    fn write_results_csv(
        &self,
        rows: &[EventResultRow],
        window_names: &[String],
        path: &Path,
    ) -> Result<(), ExportError> {
        let mut writer = csv::Writer::from_path(path)?;

        let mut header = vec!["entity".to_string(), "trade_date".to_string()];
        header.extend(window_names.iter().cloned());
        header.extend(
            ["party", "transaction_type", "amount", "sector"]
                .iter()
                .map(|s| (*s).to_string()),
        );
        writer.write_record(&header)?;

        for row in rows {
            let mut record = vec![row.entity.clone(), row.trade_date.to_string()];
            for name in window_names {
                record.push(format_optional_f64(row.cars.get(name).copied().flatten()));
            }
            record.push(row.party.clone().unwrap_or_default());
            record.push(row.transaction_type.clone().unwrap_or_default());
            record.push(format_optional_f64(row.amount));
            record.push(row.sector.clone().unwrap_or_default());
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }

    fn write_json<T: Serialize + ?Sized>(&self, value: &T, path: &Path) -> Result<(), ExportError> {
        let contents = match self.format {
            ExportFormat::PrettyJson => serde_json::to_string_pretty(value)?,
            _ => serde_json::to_string(value)?,
        };
        let mut file = File::create(path)?;
        file.write_all(contents.as_bytes())?;
        Ok(())
    }
}

/// Missing numerics become empty CSV cells.
fn format_optional_f64(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
