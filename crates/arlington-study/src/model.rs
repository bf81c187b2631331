//! Single-factor market model estimation.
//!
//! Fits `excess_entity = alpha + beta * excess_market` by ordinary least
//! squares over an estimation window, where excess returns subtract the
//! daily risk-free rate. The closed form is
//! `beta = Cov(x, y) / Var(x)`, `alpha = mean(y) - beta * mean(x)`.

use crate::error::{StudyError, StudyResult};
use crate::window::EstimationWindow;
use serde::{Deserialize, Serialize};

/// Market excess-return variance below this threshold makes the slope
/// indeterminate and the fit degenerate.
const MIN_MARKET_VARIANCE: f64 = 1e-12;

/// Fitted market-model parameters for one event.
///
/// Computed once per event from its estimation window and never reused
/// across events, even for the same entity (rolling re-estimation).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketModelParameters {
    /// Regression intercept.
    pub alpha: f64,

    /// Regression slope: sensitivity to market excess returns.
    pub beta: f64,
}

impl MarketModelParameters {
    /// Model-expected return for a date with the given market return:
    /// `rf + beta * (market_return - rf) + alpha`.
    #[must_use]
    pub fn expected_return(&self, market_return: f64, risk_free: f64) -> f64 {
        risk_free + self.beta * (market_return - risk_free) + self.alpha
    }

    /// Fit the market model on an estimation window.
    ///
    /// Pairs with a non-finite value in either series are dropped rather
    /// than failing the whole fit. Requires at least 2 valid pairs
    /// ([`StudyError::InsufficientData`] otherwise); a window with no
    /// market-return variance yields [`StudyError::DegenerateFit`]. Both
    /// are recoverable: the caller skips the event.
    pub fn fit(window: &EstimationWindow, risk_free: f64) -> StudyResult<Self> {
        let valid: Vec<(f64, f64)> = window
            .pairs()
            .iter()
            .filter(|(entity, market)| entity.is_finite() && market.is_finite())
            .map(|&(entity, market)| (entity - risk_free, market - risk_free))
            .collect();

        let n = valid.len();
        if n < 2 {
            return Err(StudyError::InsufficientData { required: 2, actual: n });
        }

        let mean_market = valid.iter().map(|(_, m)| m).sum::<f64>() / n as f64;
        let mean_entity = valid.iter().map(|(e, _)| e).sum::<f64>() / n as f64;

        let mut covariance = 0.0;
        let mut market_variance = 0.0;
        for (entity, market) in &valid {
            let dm = market - mean_market;
            covariance += dm * (entity - mean_entity);
            market_variance += dm * dm;
        }

        if market_variance < MIN_MARKET_VARIANCE {
            return Err(StudyError::DegenerateFit { n_valid: n });
        }

        let beta = covariance / market_variance;
        let alpha = mean_entity - beta * mean_market;

        Ok(Self { alpha, beta })
    }
}
