//! Events and per-event study results.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One disclosed transaction anchored at a trade date.
///
/// Immutable once constructed; categorical attributes are passed through to
/// the result untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Entity (ticker) identifier.
    pub entity: String,

    /// Trade date the study anchors on.
    pub date: NaiveDate,

    /// Party affiliation of the disclosing official.
    pub party: Option<String>,

    /// Sector of the traded entity.
    pub sector: Option<String>,

    /// Transaction type.
    pub transaction_type: Option<String>,

    /// Normalized transaction amount.
    pub amount: Option<f64>,
}

impl Event {
    /// Create an event with no categorical attributes.
    pub fn new(entity: &str, date: NaiveDate) -> Self {
        Self {
            entity: entity.to_string(),
            date,
            party: None,
            sector: None,
            transaction_type: None,
            amount: None,
        }
    }
}

/// The final per-event record: CAR values per named window plus the event's
/// passthrough attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventStudyResult {
    /// Entity (ticker) identifier.
    pub entity: String,

    /// Trade date.
    pub date: NaiveDate,

    /// CAR per window name; `None` when no abnormal-return entries fell
    /// inside the window (missing, distinct from zero).
    pub cars: BTreeMap<String, Option<f64>>,

    /// Party affiliation, passed through from the event.
    pub party: Option<String>,

    /// Sector, passed through from the event.
    pub sector: Option<String>,

    /// Transaction type, passed through from the event.
    pub transaction_type: Option<String>,

    /// Normalized transaction amount, passed through from the event.
    pub amount: Option<f64>,
}

impl EventStudyResult {
    /// The CAR value for `window`, if the window had contributing entries.
    #[must_use]
    pub fn car(&self, window: &str) -> Option<f64> {
        self.cars.get(window).copied().flatten()
    }
}
