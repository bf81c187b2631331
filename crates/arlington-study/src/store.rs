//! Indexed, date-sorted daily return series.
//!
//! The store is built once from canonical ingestion rows and read-only
//! afterwards. Each entity carries its own sorted series; one market-wide
//! series sits alongside. Lookups are binary searches, range scans are
//! contiguous slices.

use chrono::NaiveDate;
use std::collections::HashMap;

/// A date-sorted series of daily returns for one entity.
#[derive(Debug, Clone, Default)]
pub struct EntitySeries {
    dates: Vec<NaiveDate>,
    returns: Vec<f64>,
}

impl EntitySeries {
    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the series holds no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The return observed on `date`, if any.
    #[must_use]
    pub fn return_on(&self, date: NaiveDate) -> Option<f64> {
        self.dates
            .binary_search(&date)
            .ok()
            .map(|idx| self.returns[idx])
    }

    /// Observations with dates in `[start, end)`, oldest first.
    pub fn range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        let lo = self.dates.partition_point(|d| *d < start);
        let hi = self.dates.partition_point(|d| *d < end);
        self.dates[lo..hi]
            .iter()
            .copied()
            .zip(self.returns[lo..hi].iter().copied())
    }

    /// Sort by date and drop duplicate dates, keeping the first observation.
    fn finish(observations: Vec<(NaiveDate, f64)>) -> Self {
        let mut sorted = observations;
        sorted.sort_by_key(|(date, _)| *date);
        sorted.dedup_by_key(|(date, _)| *date);

        let (dates, returns) = sorted.into_iter().unzip();
        Self { dates, returns }
    }
}

/// The market-wide daily return series.
#[derive(Debug, Clone, Default)]
pub struct MarketSeries {
    inner: EntitySeries,
}

impl MarketSeries {
    /// Build from (date, market return) observations.
    ///
    /// Observations are sorted; duplicate dates keep the first observation
    /// (the ingestion contract promises one per date).
    #[must_use]
    pub fn new(observations: impl IntoIterator<Item = (NaiveDate, f64)>) -> Self {
        Self { inner: EntitySeries::finish(observations.into_iter().collect()) }
    }

    /// The market return observed on `date`, if any.
    #[must_use]
    pub fn return_on(&self, date: NaiveDate) -> Option<f64> {
        self.inner.return_on(date)
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the series holds no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Immutable store of per-entity return series plus the market series.
#[derive(Debug, Clone, Default)]
pub struct ReturnSeriesStore {
    series: HashMap<String, EntitySeries>,
    market: MarketSeries,
}

impl ReturnSeriesStore {
    /// Build the store from canonical (entity, date, return) observations
    /// and (date, market return) observations.
    ///
    /// Per-entity series are sorted by date; duplicate (entity, date) pairs
    /// keep the first observation.
    #[must_use]
    pub fn new(
        entity_observations: impl IntoIterator<Item = (String, NaiveDate, f64)>,
        market_observations: impl IntoIterator<Item = (NaiveDate, f64)>,
    ) -> Self {
        let mut grouped: HashMap<String, Vec<(NaiveDate, f64)>> = HashMap::new();
        for (entity, date, ret) in entity_observations {
            grouped.entry(entity).or_default().push((date, ret));
        }

        let series = grouped
            .into_iter()
            .map(|(entity, observations)| (entity, EntitySeries::finish(observations)))
            .collect();

        Self { series, market: MarketSeries::new(market_observations) }
    }

    /// The series for `entity`, if any observations exist.
    #[must_use]
    pub fn entity(&self, entity: &str) -> Option<&EntitySeries> {
        self.series.get(entity)
    }

    /// The market-wide series.
    #[must_use]
    pub const fn market(&self) -> &MarketSeries {
        &self.market
    }

    /// Number of entities with at least one observation.
    #[must_use]
    pub fn n_entities(&self) -> usize {
        self.series.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sorted_lookup() {
        let store = ReturnSeriesStore::new(
            vec![
                ("ABC".to_string(), date(2023, 6, 2), 0.02),
                ("ABC".to_string(), date(2023, 6, 1), 0.01),
            ],
            vec![(date(2023, 6, 1), 0.001)],
        );

        let series = store.entity("ABC").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.return_on(date(2023, 6, 1)), Some(0.01));
        assert_eq!(series.return_on(date(2023, 6, 3)), None);
    }

    #[test]
    fn test_duplicate_dates_keep_first() {
        let store = ReturnSeriesStore::new(
            vec![
                ("ABC".to_string(), date(2023, 6, 1), 0.01),
                ("ABC".to_string(), date(2023, 6, 1), 0.99),
            ],
            vec![],
        );

        let series = store.entity("ABC").unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.return_on(date(2023, 6, 1)), Some(0.01));
    }

    #[test]
    fn test_range_is_half_open() {
        let store = ReturnSeriesStore::new(
            vec![
                ("ABC".to_string(), date(2023, 6, 1), 0.01),
                ("ABC".to_string(), date(2023, 6, 2), 0.02),
                ("ABC".to_string(), date(2023, 6, 5), 0.05),
            ],
            vec![],
        );

        let series = store.entity("ABC").unwrap();
        let window: Vec<_> = series.range(date(2023, 6, 1), date(2023, 6, 5)).collect();
        assert_eq!(window, vec![(date(2023, 6, 1), 0.01), (date(2023, 6, 2), 0.02)]);
    }

    #[test]
    fn test_unknown_entity() {
        let store = ReturnSeriesStore::new(vec![], vec![]);
        assert!(store.entity("NOPE").is_none());
    }

    #[test]
    fn test_market_series() {
        let market = MarketSeries::new(vec![(date(2023, 6, 2), 0.002), (date(2023, 6, 1), 0.001)]);
        assert_eq!(market.len(), 2);
        assert_eq!(market.return_on(date(2023, 6, 2)), Some(0.002));
    }
}
