//! The per-event study pipeline.
//!
//! For each event: select the estimation window, fit the market model,
//! compute the abnormal-return series, sum CARs. Recoverable failures skip
//! the event and increment an audit counter; they never abort the run.
//! Events are processed in input order and results keep that order, so a
//! run over identical input is byte-for-byte reproducible.

use crate::abnormal::AbnormalReturnSeries;
use crate::car::compute_cars;
use crate::config::StudyConfig;
use crate::error::{StudyError, StudyResult};
use crate::event::{Event, EventStudyResult};
use crate::model::MarketModelParameters;
use crate::store::ReturnSeriesStore;
use crate::window::select_estimation_window;
use serde::{Deserialize, Serialize};

/// Skip/processing counters for one run, the audit trail for excluded
/// events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyStats {
    /// Events submitted to the run.
    pub total_events: usize,

    /// Events that produced a result.
    pub processed: usize,

    /// Events skipped because the entity has no return series at all.
    pub skipped_unknown_entity: usize,

    /// Events skipped because the estimation window was short.
    pub skipped_insufficient_data: usize,

    /// Events skipped because the market-model fit was degenerate.
    pub skipped_degenerate_fit: usize,
}

impl StudyStats {
    /// Total number of skipped events.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped_unknown_entity + self.skipped_insufficient_data + self.skipped_degenerate_fit
    }

    fn record_skip(&mut self, error: &StudyError) {
        match error {
            StudyError::UnknownEntity { .. } => self.skipped_unknown_entity += 1,
            StudyError::InsufficientData { .. } => self.skipped_insufficient_data += 1,
            StudyError::DegenerateFit { .. } => self.skipped_degenerate_fit += 1,
            StudyError::InvalidConfig(_) => {}
        }
    }
}

/// Everything a run produces: per-event results, the abnormal-return series
/// behind them (aligned index-for-index, for AAR/CAAR aggregation), and the
/// audit counters.
#[derive(Debug, Clone, Default)]
pub struct StudyOutcome {
    /// One result per processed event, in input order.
    pub results: Vec<EventStudyResult>,

    /// The abnormal-return series behind each result, same order.
    pub series: Vec<AbnormalReturnSeries>,

    /// Processing and skip counters.
    pub stats: StudyStats,
}

/// The event-study runner.
#[derive(Debug, Clone, Default)]
pub struct EventStudy {
    config: StudyConfig,
}

impl EventStudy {
    /// Create a runner with the given configuration.
    #[must_use]
    pub const fn new(config: StudyConfig) -> Self {
        Self { config }
    }

    /// The runner's configuration.
    #[must_use]
    pub const fn config(&self) -> &StudyConfig {
        &self.config
    }

    /// Run the study over all events.
    ///
    /// # Errors
    /// Returns [`StudyError::InvalidConfig`] if the configuration is
    /// invalid. Per-event failures never surface here; they are counted in
    /// the outcome's [`StudyStats`].
    pub fn run(&self, store: &ReturnSeriesStore, events: &[Event]) -> StudyResult<StudyOutcome> {
        self.run_with_progress(store, events, |_| {})
    }

    /// Run the study, invoking `on_event` with the index of each event as
    /// it completes (processed or skipped).
    pub fn run_with_progress(
        &self,
        store: &ReturnSeriesStore,
        events: &[Event],
        mut on_event: impl FnMut(usize),
    ) -> StudyResult<StudyOutcome> {
        self.config.validate()?;

        let mut outcome = StudyOutcome {
            stats: StudyStats { total_events: events.len(), ..StudyStats::default() },
            ..StudyOutcome::default()
        };

        for (index, event) in events.iter().enumerate() {
            match self.process_event(store, event) {
                Ok((result, series)) => {
                    outcome.stats.processed += 1;
                    outcome.results.push(result);
                    outcome.series.push(series);
                }
                Err(error) if error.is_recoverable() => outcome.stats.record_skip(&error),
                Err(error) => return Err(error),
            }
            on_event(index);
        }

        Ok(outcome)
    }

    /// Process one event end to end.
    fn process_event(
        &self,
        store: &ReturnSeriesStore,
        event: &Event,
    ) -> StudyResult<(EventStudyResult, AbnormalReturnSeries)> {
        let window = select_estimation_window(
            store,
            &event.entity,
            event.date,
            self.config.estimation_window,
            self.config.buffer_multiplier,
        )?;

        // Parameters are re-estimated per event, never cached per entity.
        let params = MarketModelParameters::fit(&window, self.config.risk_free_daily)?;

        let series = AbnormalReturnSeries::compute(
            store,
            &event.entity,
            event.date,
            &params,
            self.config.risk_free_daily,
            self.config.max_abs_offset(),
        );

        let cars = compute_cars(&series, &self.config.windows);

        let result = EventStudyResult {
            entity: event.entity.clone(),
            date: event.date,
            cars,
            party: event.party.clone(),
            sector: event.sector.clone(),
            transaction_type: event.transaction_type.clone(),
            amount: event.amount,
        };

        Ok((result, series))
    }
}
