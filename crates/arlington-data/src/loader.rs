//! CSV loading into canonical typed records.
//!
//! Each loader reads one input table, applies the table's schema mapping and
//! extracts canonical rows. Rows with a missing numeric observation are
//! dropped (the core treats them as missing data); a malformed required cell
//! aborts the load with a row-indexed parse error.

use crate::amount::parse_amount;
use crate::error::{DataError, Result};
use crate::schema::{SchemaMapping, TableMapping};
use chrono::NaiveDate;
use polars::prelude::*;
use std::path::Path;

/// One disclosed transaction, canonical form.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    /// Entity (ticker) identifier.
    pub entity: String,
    /// Trade date.
    pub date: NaiveDate,
    /// Party affiliation of the disclosing official, as reported.
    pub party: Option<String>,
    /// Sector of the traded entity, as reported.
    pub sector: Option<String>,
    /// Transaction type, as reported.
    pub transaction_type: Option<String>,
    /// Normalized transaction amount (range midpoint, currency stripped).
    pub amount: Option<f64>,
}

/// One daily return observation for an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnRecord {
    /// Entity (ticker) identifier.
    pub entity: String,
    /// Observation date.
    pub date: NaiveDate,
    /// Daily simple return.
    pub daily_return: f64,
}

/// One market-wide daily return observation.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketRecord {
    /// Observation date.
    pub date: NaiveDate,
    /// Market daily simple return.
    pub market_return: f64,
}

/// An externally supplied factor table: named factor values per (entity, date).
#[derive(Debug, Clone)]
pub struct FactorRecords {
    /// Factor names, in column order.
    pub names: Vec<String>,
    /// Factor rows.
    pub rows: Vec<FactorRecord>,
}

/// Factor values for one (entity, date) pair.
#[derive(Debug, Clone)]
pub struct FactorRecord {
    /// Entity (ticker) identifier.
    pub entity: String,
    /// Observation date.
    pub date: NaiveDate,
    /// Factor values, aligned with [`FactorRecords::names`].
    pub values: Vec<f64>,
}

/// Load the disclosed-events table.
pub fn load_events(path: &Path, mapping: &SchemaMapping) -> Result<Vec<EventRecord>> {
    let mut df = read_csv(path)?;
    mapping.events.normalize(&mut df, "events")?;
    ensure_non_empty(&df, "events")?;

    let entities = string_column(&df, "entity")?;
    let dates = string_column(&df, "date")?;
    let parties = optional_string_column(&df, "party")?;
    let sectors = optional_string_column(&df, "sector")?;
    let types = optional_string_column(&df, "transaction_type")?;
    let amounts = optional_string_column(&df, "amount")?;

    let mut records = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let entity = required_cell(&entities, row, "entity", "events")?;
        let date = parse_date(&required_cell(&dates, row, "date", "events")?, "events", row)?;

        records.push(EventRecord {
            entity,
            date,
            party: cell(&parties, row),
            sector: cell(&sectors, row),
            transaction_type: cell(&types, row),
            amount: cell(&amounts, row).as_deref().and_then(parse_amount),
        });
    }

    Ok(records)
}

/// Load the per-entity daily-return table.
///
/// Rows with a null or non-finite return are dropped; the core treats those
/// dates as missing observations.
pub fn load_entity_returns(path: &Path, mapping: &SchemaMapping) -> Result<Vec<ReturnRecord>> {
    let mut df = read_csv(path)?;
    mapping.entity_returns.normalize(&mut df, "entity returns")?;
    ensure_non_empty(&df, "entity returns")?;

    let entities = string_column(&df, "entity")?;
    let dates = string_column(&df, "date")?;
    let returns = float_column(&df, "daily_return")?;

    let mut records = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let Some(daily_return) = returns[row].filter(|r| r.is_finite()) else {
            continue;
        };
        let entity = required_cell(&entities, row, "entity", "entity returns")?;
        let date = parse_date(
            &required_cell(&dates, row, "date", "entity returns")?,
            "entity returns",
            row,
        )?;

        records.push(ReturnRecord { entity, date, daily_return });
    }

    Ok(records)
}

/// Load the market daily-return table.
pub fn load_market_returns(path: &Path, mapping: &SchemaMapping) -> Result<Vec<MarketRecord>> {
    let mut df = read_csv(path)?;
    mapping.market_returns.normalize(&mut df, "market returns")?;
    ensure_non_empty(&df, "market returns")?;

    let dates = string_column(&df, "date")?;
    let returns = float_column(&df, "market_return")?;

    let mut records = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let Some(market_return) = returns[row].filter(|r| r.is_finite()) else {
            continue;
        };
        let date = parse_date(
            &required_cell(&dates, row, "date", "market returns")?,
            "market returns",
            row,
        )?;

        records.push(MarketRecord { date, market_return });
    }

    Ok(records)
}

/// Load an externally supplied factor table.
///
/// Expects canonical `entity` and `date` columns (the events aliases apply);
/// every remaining column is treated as one named factor. Rows with any
/// missing factor value are dropped, matching the regression layer's
/// exclude-don't-impute contract.
pub fn load_factor_table(path: &Path, mapping: &SchemaMapping) -> Result<FactorRecords> {
    let mut df = read_csv(path)?;

    // Reuse the events aliases for the key columns only.
    let keys: Vec<_> = mapping
        .events
        .columns
        .iter()
        .filter(|c| c.canonical == "entity" || c.canonical == "date")
        .cloned()
        .collect();
    TableMapping { columns: keys }.normalize(&mut df, "factors")?;
    ensure_non_empty(&df, "factors")?;

    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .filter(|n| n != "entity" && n != "date")
        .collect();
    if names.is_empty() {
        return Err(DataError::MissingColumn {
            column: "<factor>".to_string(),
            table: "factors".to_string(),
            aliases: "any numeric column besides entity/date".to_string(),
        });
    }

    let entities = string_column(&df, "entity")?;
    let dates = string_column(&df, "date")?;
    let factor_columns: Vec<Vec<Option<f64>>> = names
        .iter()
        .map(|name| float_column(&df, name))
        .collect::<Result<_>>()?;

    let mut rows = Vec::with_capacity(df.height());
    'rows: for row in 0..df.height() {
        let mut values = Vec::with_capacity(names.len());
        for column in &factor_columns {
            match column[row].filter(|v| v.is_finite()) {
                Some(v) => values.push(v),
                None => continue 'rows,
            }
        }

        let entity = required_cell(&entities, row, "entity", "factors")?;
        let date = parse_date(&required_cell(&dates, row, "date", "factors")?, "factors", row)?;
        rows.push(FactorRecord { entity, date, values });
    }

    Ok(FactorRecords { names, rows })
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(1000))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

fn ensure_non_empty(df: &DataFrame, table: &str) -> Result<()> {
    if df.height() == 0 {
        return Err(DataError::EmptyTable { table: table.to_string() });
    }
    Ok(())
}

/// Extract a column as strings, casting whatever dtype inference produced.
fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let cast = df.column(name)?.cast(&DataType::String)?;
    let chunked = cast.str()?;
    Ok(chunked
        .into_iter()
        .map(|v| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
        .collect())
}

/// Extract an optional column as strings; `None` if the column is absent.
#[allow(clippy::type_complexity)]
fn optional_string_column(df: &DataFrame, name: &str) -> Result<Option<Vec<Option<String>>>> {
    if TableMapping::has_column(df, name) {
        Ok(Some(string_column(df, name)?))
    } else {
        Ok(None)
    }
}

/// Extract a column as floats, casting non-numeric cells to null.
fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let cast = df.column(name)?.cast(&DataType::Float64)?;
    let chunked = cast.f64()?;
    Ok(chunked.into_iter().collect())
}

fn cell(column: &Option<Vec<Option<String>>>, row: usize) -> Option<String> {
    column.as_ref().and_then(|values| values[row].clone())
}

fn required_cell(
    column: &[Option<String>],
    row: usize,
    name: &str,
    table: &str,
) -> Result<String> {
    column[row].clone().ok_or_else(|| DataError::Parse {
        table: table.to_string(),
        row,
        reason: format!("empty {name} cell"),
    })
}

/// Parse a calendar date from the formats the reference spreadsheets use.
fn parse_date(raw: &str, table: &str, row: usize) -> Result<NaiveDate> {
    for format in ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Ok(date);
        }
    }
    Err(DataError::Parse {
        table: table.to_string(),
        row,
        reason: format!("unparsable date '{raw}'"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("arlington-data-{name}"));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_events_normalizes_aliases_and_amounts() {
        let path = write_temp(
            "events.csv",
            "Ticker,Transaction_Date,Party,Type,Amount\n\
             ABC,2023-06-01,Republican,purchase,\"$1,001 - $15,000\"\n\
             XYZ,06/02/2023,D,sale_full,15000\n",
        );

        let records = load_events(&path, &SchemaMapping::default()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].entity, "ABC");
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2023, 6, 1).unwrap());
        assert_eq!(records[0].amount, Some(8000.5));
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2023, 6, 2).unwrap());
        assert_eq!(records[1].amount, Some(15000.0));
        assert_eq!(records[1].party.as_deref(), Some("D"));
    }

    #[test]
    fn test_load_events_missing_required_column() {
        let path = write_temp("events-bad.csv", "Ticker,Party\nABC,R\n");

        let err = load_events(&path, &SchemaMapping::default()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { .. }));
    }

    #[test]
    fn test_load_returns_drops_null_observations() {
        let path = write_temp(
            "returns.csv",
            "ticker,date,return\nABC,2023-05-30,0.001\nABC,2023-05-31,\nABC,2023-06-01,0.002\n",
        );

        let records = load_entity_returns(&path, &SchemaMapping::default()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].daily_return, 0.001);
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2023, 6, 1).unwrap());
    }

    #[test]
    fn test_load_market_returns() {
        let path = write_temp(
            "market.csv",
            "date,sp500_return\n2023-05-31,0.003\n2023-06-01,-0.001\n",
        );

        let records = load_market_returns(&path, &SchemaMapping::default()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].market_return, -0.001);
    }

    #[test]
    fn test_load_factor_table_drops_incomplete_rows() {
        let path = write_temp(
            "factors.csv",
            "ticker,date,mkt_rf,smb,hml\n\
             ABC,2023-06-01,0.01,0.002,-0.003\n\
             ABC,2023-06-02,0.02,,0.001\n",
        );

        let factors = load_factor_table(&path, &SchemaMapping::default()).unwrap();

        assert_eq!(factors.names, vec!["mkt_rf", "smb", "hml"]);
        assert_eq!(factors.rows.len(), 1);
        assert_eq!(factors.rows[0].values, vec![0.01, 0.002, -0.003]);
    }
}
