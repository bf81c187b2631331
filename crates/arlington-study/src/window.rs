//! Estimation window selection.

use crate::error::{StudyError, StudyResult};
use crate::store::ReturnSeriesStore;
use chrono::{Duration, NaiveDate};

/// A fixed-length trailing window of paired (entity, market) daily returns
/// ending strictly before an event date.
#[derive(Debug, Clone)]
pub struct EstimationWindow {
    pairs: Vec<(f64, f64)>,
    start: NaiveDate,
    end: NaiveDate,
}

impl EstimationWindow {
    /// Paired (entity return, market return) observations, oldest first.
    #[must_use]
    pub fn pairs(&self) -> &[(f64, f64)] {
        &self.pairs
    }

    /// Number of paired observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the window holds no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// First observation date in the window.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last observation date in the window.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }
}

/// Select the `length` most recent qualifying observations strictly before
/// `event_date`, paired by date with market observations.
///
/// A calendar-day lookback buffer of `length * buffer_multiplier` days is
/// searched so weekends, holidays and gaps do not starve the window. Entity
/// observations without a matching market observation do not qualify. If
/// fewer than `length` qualifying observations exist even after the buffer,
/// the selector reports [`StudyError::InsufficientData`] and the caller
/// skips the event.
///
/// No look-ahead: observations dated on or after `event_date` are excluded.
pub fn select_estimation_window(
    store: &ReturnSeriesStore,
    entity: &str,
    event_date: NaiveDate,
    length: usize,
    buffer_multiplier: f64,
) -> StudyResult<EstimationWindow> {
    let series = store
        .entity(entity)
        .ok_or_else(|| StudyError::UnknownEntity { entity: entity.to_string() })?;

    let lookback_days = (length as f64 * buffer_multiplier).ceil() as i64;
    let search_start = event_date - Duration::days(lookback_days);

    let mut qualifying: Vec<(NaiveDate, f64, f64)> = series
        .range(search_start, event_date)
        .filter_map(|(date, entity_return)| {
            store
                .market()
                .return_on(date)
                .map(|market_return| (date, entity_return, market_return))
        })
        .collect();

    if qualifying.len() < length {
        return Err(StudyError::InsufficientData {
            required: length,
            actual: qualifying.len(),
        });
    }

    // Keep the most recent `length` observations.
    let excess = qualifying.len() - length;
    qualifying.drain(..excess);

    let (Some(&(start, ..)), Some(&(end, ..))) = (qualifying.first(), qualifying.last()) else {
        return Err(StudyError::InsufficientData { required: length.max(1), actual: 0 });
    };
    let pairs = qualifying.into_iter().map(|(_, e, m)| (e, m)).collect();

    Ok(EstimationWindow { pairs, start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Store with contiguous daily observations for one entity and the market.
    fn daily_store(entity_days: i64) -> ReturnSeriesStore {
        let base = date(2023, 1, 1);
        let entity_obs: Vec<_> = (0..entity_days)
            .map(|i| ("ABC".to_string(), base + Duration::days(i), 0.001 * i as f64))
            .collect();
        let market_obs: Vec<_> = (0..entity_days)
            .map(|i| (base + Duration::days(i), 0.0005 * i as f64))
            .collect();
        ReturnSeriesStore::new(entity_obs, market_obs)
    }

    #[test]
    fn test_selects_most_recent_window() {
        let store = daily_store(100);
        let event_date = date(2023, 1, 1) + Duration::days(100);

        let window = select_estimation_window(&store, "ABC", event_date, 10, 1.5).unwrap();

        assert_eq!(window.len(), 10);
        // Most recent 10 observations: days 90..=99.
        assert_eq!(window.start(), date(2023, 1, 1) + Duration::days(90));
        assert_eq!(window.end(), date(2023, 1, 1) + Duration::days(99));
    }

    #[test]
    fn test_no_lookahead() {
        let store = daily_store(100);
        // Event in the middle of the series: observations on/after it must
        // not qualify.
        let event_date = date(2023, 1, 1) + Duration::days(50);

        let window = select_estimation_window(&store, "ABC", event_date, 10, 1.5).unwrap();

        assert_eq!(window.end(), date(2023, 1, 1) + Duration::days(49));
    }

    #[test]
    fn test_insufficient_data_reports_actual_count() {
        let store = daily_store(5);
        let event_date = date(2023, 1, 1) + Duration::days(5);

        let err = select_estimation_window(&store, "ABC", event_date, 10, 1.5).unwrap_err();
        match err {
            StudyError::InsufficientData { required, actual } => {
                assert_eq!(required, 10);
                assert_eq!(actual, 5);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_entity() {
        let store = daily_store(5);
        let err =
            select_estimation_window(&store, "XYZ", date(2023, 3, 1), 10, 1.5).unwrap_err();
        assert!(matches!(err, StudyError::UnknownEntity { .. }));
    }

    #[test]
    fn test_unpaired_dates_do_not_qualify() {
        let base = date(2023, 1, 1);
        let entity_obs: Vec<_> = (0..20)
            .map(|i| ("ABC".to_string(), base + Duration::days(i), 0.001))
            .collect();
        // Market data only exists for the first 10 days.
        let market_obs: Vec<_> = (0..10).map(|i| (base + Duration::days(i), 0.0005)).collect();
        let store = ReturnSeriesStore::new(entity_obs, market_obs);

        let err = select_estimation_window(&store, "ABC", base + Duration::days(20), 15, 1.5)
            .unwrap_err();
        assert!(matches!(err, StudyError::InsufficientData { actual: 10, .. }));
    }

    #[test]
    fn test_buffer_bounds_the_search() {
        let base = date(2023, 1, 1);
        // 30 observations, then a long gap, then the event.
        let entity_obs: Vec<_> = (0..30)
            .map(|i| ("ABC".to_string(), base + Duration::days(i), 0.001))
            .collect();
        let market_obs: Vec<_> = (0..30).map(|i| (base + Duration::days(i), 0.0005)).collect();
        let store = ReturnSeriesStore::new(entity_obs, market_obs);

        // Buffer of 10 * 1.5 = 15 calendar days reaches none of the data.
        let event_date = base + Duration::days(100);
        let err = select_estimation_window(&store, "ABC", event_date, 10, 1.5).unwrap_err();
        assert!(matches!(err, StudyError::InsufficientData { actual: 0, .. }));
    }
}
