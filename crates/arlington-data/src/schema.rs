//! Declarative schema mapping for heterogeneous input tables.
//!
//! Source spreadsheets name the same column many ways ("ticker", "symbol",
//! "Stock"). Rather than ad hoc string matching scattered through the
//! pipeline, each input table carries a [`TableMapping`]: an ordered list of
//! canonical columns with their accepted source aliases, applied once at
//! load. The core engine only ever sees canonical names.

use crate::error::{DataError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Mapping for a single canonical column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// Canonical column name the core expects.
    pub canonical: String,

    /// Accepted source column names, matched case-insensitively.
    /// The canonical name itself always matches.
    pub aliases: Vec<String>,

    /// Whether the run must abort if no source column matches.
    pub required: bool,
}

impl ColumnMapping {
    /// Create a new column mapping.
    pub fn new(canonical: &str, aliases: &[&str], required: bool) -> Self {
        Self {
            canonical: canonical.to_string(),
            aliases: aliases.iter().map(|a| (*a).to_string()).collect(),
            required,
        }
    }

    /// Find the source column in `names` that this mapping accepts.
    fn resolve<'a>(&self, names: &'a [String]) -> Option<&'a String> {
        names
            .iter()
            .find(|n| n.eq_ignore_ascii_case(&self.canonical))
            .or_else(|| {
                self.aliases.iter().find_map(|alias| {
                    names.iter().find(|n| n.eq_ignore_ascii_case(alias))
                })
            })
    }
}

/// Schema mapping for one input table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMapping {
    /// Canonical columns of the table, in output order.
    pub columns: Vec<ColumnMapping>,
}

impl TableMapping {
    /// Rename matching source columns to their canonical names.
    ///
    /// Returns [`DataError::MissingColumn`] if a required canonical column
    /// has no matching source column; optional columns are simply absent
    /// from the normalized frame.
    pub fn normalize(&self, df: &mut DataFrame, table: &str) -> Result<()> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();

        for mapping in &self.columns {
            match mapping.resolve(&names) {
                Some(src) => {
                    if src != &mapping.canonical {
                        df.rename(src, mapping.canonical.as_str().into())?;
                    }
                }
                None if mapping.required => {
                    return Err(DataError::MissingColumn {
                        column: mapping.canonical.clone(),
                        table: table.to_string(),
                        aliases: mapping.aliases.join(", "),
                    });
                }
                None => {}
            }
        }

        Ok(())
    }

    /// Whether the normalized frame carries the given canonical column.
    pub fn has_column(df: &DataFrame, canonical: &str) -> bool {
        df.get_column_names()
            .iter()
            .any(|n| n.as_str() == canonical)
    }
}

/// Schema mapping for all three input tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaMapping {
    /// Mapping for the disclosed-events table.
    pub events: TableMapping,

    /// Mapping for the per-entity daily-return table.
    pub entity_returns: TableMapping,

    /// Mapping for the market daily-return table.
    pub market_returns: TableMapping,
}

impl Default for SchemaMapping {
    fn default() -> Self {
        Self {
            events: TableMapping {
                columns: vec![
                    ColumnMapping::new("entity", &["ticker", "symbol", "stock"], true),
                    ColumnMapping::new(
                        "date",
                        &["transaction_date", "trade_date", "traded"],
                        true,
                    ),
                    ColumnMapping::new("party", &["party_affiliation"], false),
                    ColumnMapping::new("sector", &["industry", "gics_sector"], false),
                    ColumnMapping::new(
                        "transaction_type",
                        &["type", "transaction", "trade_type"],
                        false,
                    ),
                    ColumnMapping::new("amount", &["amount_range", "range", "value"], false),
                ],
            },
            entity_returns: TableMapping {
                columns: vec![
                    ColumnMapping::new("entity", &["ticker", "symbol", "stock"], true),
                    ColumnMapping::new("date", &["trading_date"], true),
                    ColumnMapping::new(
                        "daily_return",
                        &["return", "ret", "daily_ret", "returns"],
                        true,
                    ),
                ],
            },
            market_returns: TableMapping {
                columns: vec![
                    ColumnMapping::new("date", &["trading_date"], true),
                    ColumnMapping::new(
                        "market_return",
                        &["return", "ret", "mkt_return", "sp500_return", "index_return"],
                        true,
                    ),
                ],
            },
        }
    }
}

impl SchemaMapping {
    /// Load a schema mapping from a JSON file.
    pub fn from_json_file(path: &std::path::Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(names: &[&str]) -> DataFrame {
        let columns: Vec<Column> = names
            .iter()
            .map(|n| Column::new((*n).into(), vec!["x"]))
            .collect();
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn test_rename_alias_to_canonical() {
        let mapping = SchemaMapping::default();
        let mut df = frame(&["Ticker", "Transaction_Date", "Party"]);

        mapping.events.normalize(&mut df, "events").unwrap();

        assert!(TableMapping::has_column(&df, "entity"));
        assert!(TableMapping::has_column(&df, "date"));
        assert!(TableMapping::has_column(&df, "party"));
    }

    #[test]
    fn test_canonical_name_wins_over_alias() {
        let mapping = SchemaMapping::default();
        let mut df = frame(&["entity", "ticker", "date"]);

        mapping.events.normalize(&mut df, "events").unwrap();

        // "entity" was already canonical; "ticker" must not be renamed onto it.
        assert!(TableMapping::has_column(&df, "entity"));
        assert!(TableMapping::has_column(&df, "ticker"));
    }

    #[test]
    fn test_missing_required_column_is_fatal() {
        let mapping = SchemaMapping::default();
        let mut df = frame(&["ticker", "party"]);

        let err = mapping.events.normalize(&mut df, "events").unwrap_err();
        match err {
            DataError::MissingColumn { column, table, .. } => {
                assert_eq!(column, "date");
                assert_eq!(table, "events");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_optional_column_is_tolerated() {
        let mapping = SchemaMapping::default();
        let mut df = frame(&["ticker", "traded"]);

        mapping.events.normalize(&mut df, "events").unwrap();
        assert!(!TableMapping::has_column(&df, "sector"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let mapping = SchemaMapping::default();
        let json = serde_json::to_string(&mapping).unwrap();
        let back: SchemaMapping = serde_json::from_str(&json).unwrap();
        assert_eq!(back.events.columns.len(), mapping.events.columns.len());
    }
}
