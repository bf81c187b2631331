//! One-hot categorical regression of window CARs.
//!
//! Explains CAR by membership in a categorical attribute (sector, party)
//! alone: categories are one-hot encoded with the first category (sorted
//! order) dropped as the reference to avoid collinearity with the
//! intercept, and the R² of the indicator-only fit is the fraction of CAR
//! variance explained by category membership.

use crate::error::{StatsError, StatsResult};
use crate::ols::fit_ols;
use ndarray::{Array1, Array2};
use std::collections::BTreeSet;

/// Effect of one category relative to the reference category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryEffect {
    /// Category label.
    pub label: String,

    /// Mean CAR difference versus the reference category.
    pub coefficient: f64,

    /// Rows carrying this label.
    pub n_rows: usize,
}

/// Result of a one-hot categorical regression.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalRegression {
    /// Which attribute was encoded ("sector", "party").
    pub attribute: String,

    /// Which CAR window was explained.
    pub window: String,

    /// The dropped reference category.
    pub reference: String,

    /// Intercept: mean CAR of the reference category.
    pub intercept: f64,

    /// Per-category effects, excluding the reference.
    pub effects: Vec<CategoryEffect>,

    /// Fraction of CAR variance explained by category membership alone.
    pub r_squared: f64,

    /// Rows that entered the fit.
    pub n_observations: usize,
}

/// Regress one CAR window on a one-hot encoding of `labels`.
///
/// `cars` and `labels` are aligned per event. Rows with a missing CAR or a
/// missing label are excluded, never imputed. Returns
/// [`StatsError::EmptyResult`] when no rows carry both values.
pub fn fit_categorical(
    attribute: &str,
    window: &str,
    cars: &[Option<f64>],
    labels: &[Option<String>],
) -> StatsResult<CategoricalRegression> {
    if labels.len() != cars.len() {
        return Err(StatsError::DimensionMismatch {
            expected: cars.len(),
            actual: labels.len(),
            context: format!("{attribute} labels"),
        });
    }

    let rows: Vec<(&str, f64)> = labels
        .iter()
        .zip(cars.iter())
        .filter_map(|(label, car)| match (label, car) {
            (Some(label), Some(car)) if car.is_finite() => Some((label.as_str(), *car)),
            _ => None,
        })
        .collect();

    if rows.is_empty() {
        return Err(StatsError::EmptyResult(format!(
            "no rows with both {attribute} and {window}"
        )));
    }

    // Sorted distinct labels; the first becomes the reference category.
    let categories: Vec<&str> = rows
        .iter()
        .map(|(label, _)| *label)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let reference = categories[0];
    let encoded = &categories[1..];

    let n = rows.len();
    let p = encoded.len() + 1;
    if n < p {
        return Err(StatsError::InsufficientData { required: p, actual: n });
    }

    let mut design = Array2::zeros((n, p));
    let mut response = Array1::zeros(n);
    for (i, (label, car)) in rows.iter().enumerate() {
        design[[i, 0]] = 1.0;
        if let Some(j) = encoded.iter().position(|c| c == label) {
            design[[i, j + 1]] = 1.0;
        }
        response[i] = *car;
    }

    let fit = fit_ols(&design, &response)?;

    let effects = encoded
        .iter()
        .enumerate()
        .map(|(j, label)| CategoryEffect {
            label: (*label).to_string(),
            coefficient: fit.coefficients[j + 1],
            n_rows: rows.iter().filter(|(l, _)| l == label).count(),
        })
        .collect();

    Ok(CategoricalRegression {
        attribute: attribute.to_string(),
        window: window.to_string(),
        reference: reference.to_string(),
        intercept: fit.coefficients[0],
        effects,
        r_squared: fit.r_squared,
        n_observations: n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn labels(raw: &[Option<&str>]) -> Vec<Option<String>> {
        raw.iter().map(|l| l.map(str::to_string)).collect()
    }

    #[test]
    fn test_category_means_recovered() {
        // Energy rows average 0.02, Tech rows average -0.01.
        let cars = vec![
            Some(0.01),
            Some(0.03),
            Some(-0.02),
            Some(0.0),
            Some(0.02),
            Some(-0.01),
        ];
        let sectors = labels(&[
            Some("Energy"),
            Some("Energy"),
            Some("Tech"),
            Some("Tech"),
            Some("Energy"),
            Some("Tech"),
        ]);

        let result = fit_categorical("sector", "CAR5", &cars, &sectors).unwrap();

        assert_eq!(result.reference, "Energy");
        assert_relative_eq!(result.intercept, 0.02, epsilon = 1e-10);
        assert_eq!(result.effects.len(), 1);
        assert_eq!(result.effects[0].label, "Tech");
        assert_eq!(result.effects[0].n_rows, 3);
        // Tech mean minus Energy mean.
        assert_relative_eq!(result.effects[0].coefficient, -0.03, epsilon = 1e-10);
    }

    #[test]
    fn test_membership_explains_all_variance_when_groups_are_constant() {
        let cars = vec![Some(0.01), Some(0.01), Some(0.05), Some(0.05)];
        let parties = labels(&[Some("D"), Some("D"), Some("R"), Some("R")]);

        let result = fit_categorical("party", "CAR10", &cars, &parties).unwrap();

        assert_relative_eq!(result.r_squared, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_single_category_explains_nothing() {
        let cars = vec![Some(0.01), Some(0.02), Some(0.03)];
        let parties = labels(&[Some("D"), Some("D"), Some("D")]);

        let result = fit_categorical("party", "CAR5", &cars, &parties).unwrap();

        assert_eq!(result.reference, "D");
        assert!(result.effects.is_empty());
        assert_relative_eq!(result.r_squared, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_rows_are_excluded() {
        let cars = vec![Some(0.01), None, Some(0.03), Some(0.02)];
        let sectors = labels(&[Some("A"), Some("A"), None, Some("B")]);

        let result = fit_categorical("sector", "CAR5", &cars, &sectors).unwrap();

        assert_eq!(result.n_observations, 2);
    }

    #[test]
    fn test_no_usable_rows_is_empty_result() {
        let cars = vec![None, Some(0.01)];
        let sectors = labels(&[Some("A"), None]);

        let err = fit_categorical("sector", "CAR5", &cars, &sectors).unwrap_err();
        assert!(matches!(err, StatsError::EmptyResult(_)));
        assert!(err.is_recoverable());
    }
}
