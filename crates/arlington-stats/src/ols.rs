//! Ordinary least squares on a design matrix.
//!
//! Solves the normal equations `(X^T X) b = X^T y` by Gaussian elimination
//! with partial pivoting. The design matrix is expected to carry an
//! intercept column first; goodness-of-fit statistics treat the remaining
//! columns as model terms.

use crate::error::{StatsError, StatsResult};
use ndarray::{Array1, Array2};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

/// Pivots smaller than this are treated as zero (rank deficiency).
const PIVOT_TOLERANCE: f64 = 1e-12;

/// Variance smaller than this means the response is constant.
const MIN_VARIANCE: f64 = 1e-30;

/// A fitted least-squares model.
#[derive(Debug, Clone, PartialEq)]
pub struct OlsFit {
    /// Coefficients in design-column order (intercept first).
    pub coefficients: Vec<f64>,

    /// Fraction of response variance explained by the model.
    pub r_squared: f64,

    /// Overall model F statistic; absent when the fit leaves no residual
    /// degrees of freedom or the response has no variance.
    pub f_statistic: Option<f64>,

    /// Upper-tail p-value of the F statistic.
    pub f_p_value: Option<f64>,

    /// Rows that entered the fit.
    pub n_observations: usize,

    /// Model degrees of freedom (design columns minus the intercept).
    pub df_model: usize,

    /// Residual degrees of freedom.
    pub df_residual: usize,
}

/// Fit ordinary least squares of `response` on `design`.
///
/// The first design column must be the intercept. Requires at least as many
/// rows as columns; returns [`StatsError::RankDeficient`] when elimination
/// finds no usable pivot (collinear columns).
pub fn fit_ols(design: &Array2<f64>, response: &Array1<f64>) -> StatsResult<OlsFit> {
    let n = design.nrows();
    let p = design.ncols();

    if response.len() != n {
        return Err(StatsError::DimensionMismatch {
            expected: n,
            actual: response.len(),
            context: "response length".to_string(),
        });
    }
    if p == 0 || n < p {
        return Err(StatsError::InsufficientData { required: p.max(1), actual: n });
    }

    // Normal equations.
    let xtx = design.t().dot(design);
    let xty = design.t().dot(response);
    let coefficients = solve_linear(xtx, xty)?;

    let fitted = design.dot(&Array1::from_vec(coefficients.clone()));
    let residual_ss: f64 = response
        .iter()
        .zip(fitted.iter())
        .map(|(y, f)| (y - f).powi(2))
        .sum();

    let mean = response.sum() / n as f64;
    let total_ss: f64 = response.iter().map(|y| (y - mean).powi(2)).sum();

    let r_squared = if total_ss > MIN_VARIANCE { 1.0 - residual_ss / total_ss } else { 0.0 };

    let df_model = p - 1;
    let df_residual = n - p;

    let (f_statistic, f_p_value) =
        f_test(total_ss, residual_ss, df_model, df_residual)?;

    Ok(OlsFit {
        coefficients,
        r_squared,
        f_statistic,
        f_p_value,
        n_observations: n,
        df_model,
        df_residual,
    })
}

/// Overall model F test against the intercept-only model.
fn f_test(
    total_ss: f64,
    residual_ss: f64,
    df_model: usize,
    df_residual: usize,
) -> StatsResult<(Option<f64>, Option<f64>)> {
    if df_model == 0 || df_residual == 0 || total_ss <= MIN_VARIANCE {
        return Ok((None, None));
    }

    let explained_ss = (total_ss - residual_ss).max(0.0);
    if residual_ss <= MIN_VARIANCE {
        // Perfect fit: the statistic diverges and the tail probability is 0.
        return Ok((Some(f64::INFINITY), Some(0.0)));
    }

    let f = (explained_ss / df_model as f64) / (residual_ss / df_residual as f64);
    let dist = FisherSnedecor::new(df_model as f64, df_residual as f64)
        .map_err(|e| StatsError::Distribution(e.to_string()))?;
    let p = 1.0 - dist.cdf(f);

    Ok((Some(f), Some(p)))
}

/// Solve `a x = b` by Gaussian elimination with partial pivoting.
fn solve_linear(mut a: Array2<f64>, mut b: Array1<f64>) -> StatsResult<Vec<f64>> {
    let n = a.nrows();

    for k in 0..n {
        let mut pivot_row = k;
        let mut pivot_val = a[[k, k]].abs();
        for i in (k + 1)..n {
            let candidate = a[[i, k]].abs();
            if candidate > pivot_val {
                pivot_row = i;
                pivot_val = candidate;
            }
        }
        if pivot_val < PIVOT_TOLERANCE {
            return Err(StatsError::RankDeficient { column: k });
        }
        if pivot_row != k {
            for j in 0..n {
                a.swap([k, j], [pivot_row, j]);
            }
            b.swap(k, pivot_row);
        }

        for i in (k + 1)..n {
            let factor = a[[i, k]] / a[[k, k]];
            if factor == 0.0 {
                continue;
            }
            for j in k..n {
                a[[i, j]] -= factor * a[[k, j]];
            }
            b[i] -= factor * b[k];
        }
    }

    let mut x = vec![0.0; n];
    for k in (0..n).rev() {
        let mut sum = b[k];
        for j in (k + 1)..n {
            sum -= a[[k, j]] * x[j];
        }
        x[k] = sum / a[[k, k]];
    }

    Ok(x)
}
