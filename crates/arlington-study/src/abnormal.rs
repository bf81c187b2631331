//! Abnormal return computation over the event window.

use crate::model::MarketModelParameters;
use crate::store::ReturnSeriesStore;
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

/// Abnormal returns for one event, keyed by relative calendar-day offset
/// from the event date (negative = before the event).
///
/// One series per event is computed over the widest configured window and
/// reused by both the CAR aggregator and the AAR/CAAR aggregation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AbnormalReturnSeries {
    points: BTreeMap<i64, f64>,
}

impl AbnormalReturnSeries {
    /// Compute abnormal returns for dates within `max_offset` calendar days
    /// of `event_date`.
    ///
    /// For every date with both an observed entity return and a market
    /// return, `abnormal = actual - expected` where expected comes from the
    /// fitted market model. Dates missing either observation are omitted.
    /// An event window with no qualifying dates yields an empty series, not
    /// an error.
    #[must_use]
    pub fn compute(
        store: &ReturnSeriesStore,
        entity: &str,
        event_date: NaiveDate,
        params: &MarketModelParameters,
        risk_free: f64,
        max_offset: i64,
    ) -> Self {
        let Some(series) = store.entity(entity) else {
            return Self::default();
        };

        let start = event_date - Duration::days(max_offset);
        let end = event_date + Duration::days(max_offset + 1);

        let points = series
            .range(start, end)
            .filter_map(|(date, actual)| {
                store.market().return_on(date).map(|market_return| {
                    let expected = params.expected_return(market_return, risk_free);
                    let offset = (date - event_date).num_days();
                    (offset, actual - expected)
                })
            })
            .collect();

        Self { points }
    }

    /// Build a series directly from (offset, abnormal return) pairs.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = (i64, f64)>) -> Self {
        Self { points: points.into_iter().collect() }
    }

    /// The abnormal return at `offset`, if observed.
    #[must_use]
    pub fn get(&self, offset: i64) -> Option<f64> {
        self.points.get(&offset).copied()
    }

    /// (offset, abnormal return) pairs in increasing offset order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.points.iter().map(|(offset, ar)| (*offset, *ar))
    }

    /// Number of observed offsets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series holds no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of abnormal returns with offsets in the inclusive `[low, high]`
    /// range; `None` when no entries fall inside (missing, distinct from a
    /// zero abnormal return).
    #[must_use]
    pub fn sum_in(&self, low: i64, high: i64) -> Option<f64> {
        let mut any = false;
        let mut sum = 0.0;
        for (_, ar) in self.points.range(low..=high) {
            any = true;
            sum += ar;
        }
        any.then_some(sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ReturnSeriesStore;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_compute_actual_minus_expected() {
        let event_date = date(2023, 6, 1);
        let store = ReturnSeriesStore::new(
            vec![
                ("ABC".to_string(), date(2023, 5, 31), 0.02),
                ("ABC".to_string(), date(2023, 6, 1), 0.03),
                ("ABC".to_string(), date(2023, 6, 2), -0.01),
            ],
            vec![
                (date(2023, 5, 31), 0.01),
                (date(2023, 6, 1), 0.01),
                (date(2023, 6, 2), 0.01),
            ],
        );
        let params = MarketModelParameters { alpha: 0.0, beta: 1.0 };

        let series = AbnormalReturnSeries::compute(&store, "ABC", event_date, &params, 0.0, 5);

        assert_eq!(series.len(), 3);
        assert_relative_eq!(series.get(-1).unwrap(), 0.01, epsilon = 1e-15);
        assert_relative_eq!(series.get(0).unwrap(), 0.02, epsilon = 1e-15);
        assert_relative_eq!(series.get(1).unwrap(), -0.02, epsilon = 1e-15);
    }

    #[test]
    fn test_dates_outside_max_offset_are_excluded() {
        let event_date = date(2023, 6, 10);
        let store = ReturnSeriesStore::new(
            vec![
                ("ABC".to_string(), date(2023, 6, 1), 0.01),
                ("ABC".to_string(), date(2023, 6, 10), 0.01),
            ],
            vec![(date(2023, 6, 1), 0.0), (date(2023, 6, 10), 0.0)],
        );
        let params = MarketModelParameters { alpha: 0.0, beta: 1.0 };

        let series = AbnormalReturnSeries::compute(&store, "ABC", event_date, &params, 0.0, 5);

        assert_eq!(series.len(), 1);
        assert!(series.get(-9).is_none());
        assert!(series.get(0).is_some());
    }

    #[test]
    fn test_missing_market_dates_are_omitted() {
        let event_date = date(2023, 6, 1);
        let store = ReturnSeriesStore::new(
            vec![
                ("ABC".to_string(), date(2023, 5, 31), 0.02),
                ("ABC".to_string(), date(2023, 6, 1), 0.03),
            ],
            vec![(date(2023, 6, 1), 0.01)],
        );
        let params = MarketModelParameters { alpha: 0.0, beta: 1.0 };

        let series = AbnormalReturnSeries::compute(&store, "ABC", event_date, &params, 0.0, 5);

        assert_eq!(series.len(), 1);
        assert!(series.get(-1).is_none());
    }

    #[test]
    fn test_empty_input_yields_empty_series() {
        let store = ReturnSeriesStore::new(vec![], vec![]);
        let params = MarketModelParameters { alpha: 0.0, beta: 1.0 };

        let series =
            AbnormalReturnSeries::compute(&store, "ABC", date(2023, 6, 1), &params, 0.0, 120);

        assert!(series.is_empty());
    }

    #[test]
    fn test_sum_in_distinguishes_empty_from_zero() {
        let series = AbnormalReturnSeries::from_points(vec![(-1, 0.01), (0, -0.01)]);

        assert_relative_eq!(series.sum_in(-1, 0).unwrap(), 0.0, epsilon = 1e-15);
        assert_eq!(series.sum_in(3, 5), None);
    }
}
