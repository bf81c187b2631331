//! Cumulative abnormal return aggregation over named event windows.

use crate::abnormal::AbnormalReturnSeries;
use crate::config::CarWindow;
use std::collections::BTreeMap;

/// Sum an event's abnormal returns over each named window.
///
/// `CAR_name` is the sum of abnormal returns whose relative-day offset lies
/// in the window's inclusive `[low, high]` bounds. A window with no
/// contributing entries maps to `None` — "no data" stays distinct from
/// "zero abnormal return".
#[must_use]
pub fn compute_cars(
    series: &AbnormalReturnSeries,
    windows: &[CarWindow],
) -> BTreeMap<String, Option<f64>> {
    windows
        .iter()
        .map(|window| (window.name.clone(), series.sum_in(window.low, window.high)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn default_windows() -> Vec<CarWindow> {
        vec![
            CarWindow::new("CAR5", -5, 5),
            CarWindow::new("CAR10", -10, 10),
            CarWindow::new("CAR120", -120, 120),
        ]
    }

    #[test]
    fn test_car_is_exact_sum_within_bounds() {
        // +0.01 on offsets -1, 0, +1 and nothing else: every default window
        // sees the same three entries.
        let series = AbnormalReturnSeries::from_points(vec![(-1, 0.01), (0, 0.01), (1, 0.01)]);

        let cars = compute_cars(&series, &default_windows());

        assert_relative_eq!(cars["CAR5"].unwrap(), 0.03, epsilon = 1e-15);
        assert_relative_eq!(cars["CAR10"].unwrap(), 0.03, epsilon = 1e-15);
        assert_relative_eq!(cars["CAR120"].unwrap(), 0.03, epsilon = 1e-15);
    }

    #[test]
    fn test_empty_window_is_missing_not_zero() {
        let series = AbnormalReturnSeries::from_points(vec![(8, 0.02)]);

        let cars = compute_cars(&series, &default_windows());

        assert_eq!(cars["CAR5"], None);
        assert_relative_eq!(cars["CAR10"].unwrap(), 0.02, epsilon = 1e-15);
    }

    #[rstest]
    #[case(-5, true)]
    #[case(5, true)]
    #[case(-6, false)]
    #[case(6, false)]
    fn test_boundary_inclusion(#[case] offset: i64, #[case] included: bool) {
        let series = AbnormalReturnSeries::from_points(vec![(offset, 0.01)]);
        let cars = compute_cars(&series, &[CarWindow::new("CAR5", -5, 5)]);
        assert_eq!(cars["CAR5"].is_some(), included);
    }

    #[test]
    fn test_monotonic_window_inclusion() {
        // Entries spread across the full range: each wider window includes
        // everything the narrower one does.
        let series = AbnormalReturnSeries::from_points(
            (-120..=120).map(|offset| (offset, 0.001)).collect::<Vec<_>>(),
        );

        let cars = compute_cars(&series, &default_windows());
        let car5 = cars["CAR5"].unwrap();
        let car10 = cars["CAR10"].unwrap();
        let car120 = cars["CAR120"].unwrap();

        assert!(car5 <= car10);
        assert!(car10 <= car120);
        assert_relative_eq!(car5, 11.0 * 0.001, epsilon = 1e-12);
        assert_relative_eq!(car10, 21.0 * 0.001, epsilon = 1e-12);
        assert_relative_eq!(car120, 241.0 * 0.001, epsilon = 1e-12);
    }
}
