//! Pipeline glue: load inputs, run the study, assemble reporting shapes.

use arlington::officials::{Party, TransactionType};
use arlington_data::schema::SchemaMapping;
use arlington_data::{DataError, loader};
use arlington_output::{
    AarExportRow, CategoryBreakdown, EventResultRow, StudySummary, WindowSignificance,
};
use arlington_stats::one_sample_ttest;
use arlington_study::{
    AarSeries, Event, EventStudy, ReturnSeriesStore, StudyConfig, StudyError, StudyOutcome,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Errors surfaced by the command-line pipeline.
#[derive(Debug, thiserror::Error)]
pub(crate) enum PipelineError {
    /// Ingestion failure.
    #[error("data error: {0}")]
    Data(#[from] DataError),
    /// Study failure (invalid configuration).
    #[error("study error: {0}")]
    Study(#[from] StudyError),
    /// Configuration file failure.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
    /// IO failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything a subcommand needs after the shared load-and-run phase.
#[derive(Debug)]
pub(crate) struct CompletedStudy {
    pub(crate) config: StudyConfig,
    pub(crate) outcome: StudyOutcome,
}

/// Load the schema mapping, or defaults when no file is given.
pub(crate) fn load_schema(path: Option<&Path>) -> Result<SchemaMapping, PipelineError> {
    match path {
        Some(path) => Ok(SchemaMapping::from_json_file(path)?),
        None => Ok(SchemaMapping::default()),
    }
}

/// Load the study configuration, or defaults when no file is given.
pub(crate) fn load_config(path: Option<&Path>) -> Result<StudyConfig, PipelineError> {
    match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&contents)?)
        }
        None => Ok(StudyConfig::default()),
    }
}

/// Load the three input tables and build the immutable store plus the event
/// list, normalizing party and transaction-type spellings.
pub(crate) fn load_inputs(
    events_path: &Path,
    returns_path: &Path,
    market_path: &Path,
    mapping: &SchemaMapping,
) -> Result<(ReturnSeriesStore, Vec<Event>), PipelineError> {
    let event_records = loader::load_events(events_path, mapping)?;
    let return_records = loader::load_entity_returns(returns_path, mapping)?;
    let market_records = loader::load_market_returns(market_path, mapping)?;

    let store = ReturnSeriesStore::new(
        return_records
            .into_iter()
            .map(|r| (r.entity, r.date, r.daily_return)),
        market_records.into_iter().map(|m| (m.date, m.market_return)),
    );

    let events = event_records
        .into_iter()
        .map(|record| Event {
            entity: record.entity,
            date: record.date,
            party: record.party.map(|p| Party::parse(&p).name().to_string()),
            sector: record.sector,
            transaction_type: record
                .transaction_type
                .map(|t| TransactionType::parse(&t).name().to_string()),
            amount: record.amount,
        })
        .collect();

    Ok((store, events))
}

/// Run the per-event phase with a progress bar, reporting skip counts on
/// stderr afterwards.
pub(crate) fn run_study(
    store: &ReturnSeriesStore,
    events: &[Event],
    config: StudyConfig,
) -> Result<CompletedStudy, PipelineError> {
    let study = EventStudy::new(config);

    let progress = ProgressBar::new(events.len() as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("{bar:40.cyan/blue} {pos}/{len} events")
    {
        progress.set_style(style);
    }

    let outcome = study.run_with_progress(store, events, |_| progress.inc(1))?;
    progress.finish_and_clear();

    let stats = outcome.stats;
    if stats.skipped() > 0 {
        eprintln!(
            "Warning: skipped {} of {} events ({} unknown entity, {} insufficient data, {} degenerate fit)",
            stats.skipped(),
            stats.total_events,
            stats.skipped_unknown_entity,
            stats.skipped_insufficient_data,
            stats.skipped_degenerate_fit,
        );
    }

    Ok(CompletedStudy { config: study.config().clone(), outcome })
}

/// Per-event results in export shape.
pub(crate) fn result_rows(outcome: &StudyOutcome) -> Vec<EventResultRow> {
    outcome
        .results
        .iter()
        .map(|r| EventResultRow {
            entity: r.entity.clone(),
            trade_date: r.date,
            cars: r.cars.clone(),
            party: r.party.clone(),
            transaction_type: r.transaction_type.clone(),
            amount: r.amount,
            sector: r.sector.clone(),
        })
        .collect()
}

/// AAR/CAAR aggregation in export shape.
///
/// Returns an empty vector when no event contributed any abnormal return;
/// the caller warns and skips that output.
pub(crate) fn aar_rows(completed: &CompletedStudy) -> Vec<AarExportRow> {
    let aggregated = AarSeries::aggregate(
        completed.outcome.series.iter(),
        completed.config.max_abs_offset(),
    );
    aggregated
        .points()
        .iter()
        .map(|p| AarExportRow {
            offset: p.offset,
            aar: p.aar,
            caar: p.caar,
            n_events: p.n_events,
        })
        .collect()
}

/// Window names in configured order.
pub(crate) fn window_names(config: &StudyConfig) -> Vec<String> {
    config.windows.iter().map(|w| w.name.clone()).collect()
}

/// Non-missing CAR values for one window, in result order.
pub(crate) fn window_cars(outcome: &StudyOutcome, window: &str) -> Vec<f64> {
    outcome
        .results
        .iter()
        .filter_map(|r| r.car(window))
        .collect()
}

/// Assemble the study summary: audit counters, per-window significance,
/// sector and party breakdowns.
pub(crate) fn build_summary(completed: &CompletedStudy) -> StudySummary {
    let stats = completed.outcome.stats;
    let mut summary = StudySummary {
        total_events: stats.total_events,
        processed: stats.processed,
        skipped_unknown_entity: stats.skipped_unknown_entity,
        skipped_insufficient_data: stats.skipped_insufficient_data,
        skipped_degenerate_fit: stats.skipped_degenerate_fit,
        ..StudySummary::default()
    };

    for name in window_names(&completed.config) {
        let cars = window_cars(&completed.outcome, &name);
        match one_sample_ttest(&cars) {
            Ok(test) => summary.windows.push(WindowSignificance {
                window: name.clone(),
                n: test.n,
                mean_car: test.mean,
                t_statistic: test.t_statistic,
                p_value: test.p_value,
                significant: test.is_significant(completed.config.significance_level),
            }),
            Err(error) if error.is_recoverable() => {
                eprintln!("Warning: skipping significance test for {name}: {error}");
            }
            Err(error) => {
                eprintln!("Warning: significance test for {name} failed: {error}");
            }
        }

        for attribute in ["sector", "party"] {
            let rows = completed.outcome.results.iter().map(|r| {
                let label = match attribute {
                    "sector" => r.sector.as_deref(),
                    _ => r.party.as_deref(),
                };
                (label, r.car(&name))
            });
            match CategoryBreakdown::from_rows(attribute, &name, rows) {
                Some(breakdown) => summary.breakdowns.push(breakdown),
                None => {
                    eprintln!("Warning: no rows with both {attribute} and {name}; skipping breakdown");
                }
            }
        }
    }

    summary
}
