//! Multi-factor explanatory regression of window CARs.
//!
//! The factor table is an injected collaborator mapping (entity, date) to
//! named numeric factor values. Production code never generates factor
//! data; test fixtures may simulate it.

use crate::error::{StatsError, StatsResult};
use crate::ols::{OlsFit, fit_ols};
use chrono::NaiveDate;
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Named factor values per (entity, date) pair.
#[derive(Debug, Clone, Default)]
pub struct FactorTable {
    names: Vec<String>,
    values: HashMap<(String, NaiveDate), Vec<f64>>,
}

impl FactorTable {
    /// Create an empty table with the given factor names.
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        Self { names, values: HashMap::new() }
    }

    /// Factor names, in column order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Insert factor values for one (entity, date) pair.
    ///
    /// Returns [`StatsError::DimensionMismatch`] if the value count does
    /// not match the declared factor names.
    pub fn insert(
        &mut self,
        entity: &str,
        date: NaiveDate,
        values: Vec<f64>,
    ) -> StatsResult<()> {
        if values.len() != self.names.len() {
            return Err(StatsError::DimensionMismatch {
                expected: self.names.len(),
                actual: values.len(),
                context: format!("factor values for {entity}"),
            });
        }
        self.values.insert((entity.to_string(), date), values);
        Ok(())
    }

    /// Factor values for an (entity, date) pair, if present.
    #[must_use]
    pub fn get(&self, entity: &str, date: NaiveDate) -> Option<&[f64]> {
        self.values
            .get(&(entity.to_string(), date))
            .map(Vec::as_slice)
    }

    /// Number of (entity, date) pairs with factor values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the table holds no factor rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Result of regressing one CAR window on the factor table.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorRegression {
    /// Which CAR window was explained.
    pub window: String,

    /// Regression intercept.
    pub intercept: f64,

    /// Per-factor loadings, in factor-name order.
    pub loadings: Vec<(String, f64)>,

    /// Fraction of CAR variance explained.
    pub r_squared: f64,

    /// Overall model F statistic.
    pub f_statistic: Option<f64>,

    /// Upper-tail p-value of the F statistic.
    pub f_p_value: Option<f64>,

    /// Rows that entered the fit.
    pub n_observations: usize,
}

/// Regress `CAR - rf` on an intercept plus the named factors.
///
/// `cars` and `keys` are aligned per event. Rows with a missing CAR or no
/// factor values for the event's (entity, date) are excluded from the fit,
/// never imputed.
pub fn fit_factor_model(
    window: &str,
    keys: &[(String, NaiveDate)],
    cars: &[Option<f64>],
    factors: &FactorTable,
    risk_free: f64,
) -> StatsResult<FactorRegression> {
    if keys.len() != cars.len() {
        return Err(StatsError::DimensionMismatch {
            expected: keys.len(),
            actual: cars.len(),
            context: format!("CAR values for {window}"),
        });
    }

    let k = factors.names().len();
    let mut rows: Vec<f64> = Vec::new();
    let mut response: Vec<f64> = Vec::new();

    for ((entity, date), car) in keys.iter().zip(cars.iter()) {
        let (Some(car), Some(values)) = (*car, factors.get(entity, *date)) else {
            continue;
        };
        if !car.is_finite() || values.iter().any(|v| !v.is_finite()) {
            continue;
        }
        rows.push(1.0);
        rows.extend_from_slice(values);
        response.push(car - risk_free);
    }

    let n = response.len();
    // Intercept + k loadings, plus at least one residual degree of freedom.
    if n < k + 2 {
        return Err(StatsError::InsufficientData { required: k + 2, actual: n });
    }

    let design = Array2::from_shape_vec((n, k + 1), rows).map_err(|_| {
        StatsError::DimensionMismatch {
            expected: n * (k + 1),
            actual: 0,
            context: "factor design matrix".to_string(),
        }
    })?;
    let response = Array1::from_vec(response);

    let fit: OlsFit = fit_ols(&design, &response)?;

    let loadings = factors
        .names()
        .iter()
        .cloned()
        .zip(fit.coefficients[1..].iter().copied())
        .collect();

    Ok(FactorRegression {
        window: window.to_string(),
        intercept: fit.coefficients[0],
        loadings,
        r_squared: fit.r_squared,
        f_statistic: fit.f_statistic,
        f_p_value: fit.f_p_value,
        n_observations: fit.n_observations,
    })
}
