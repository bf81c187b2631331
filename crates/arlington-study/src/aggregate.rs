//! Cross-event aggregation: AAR and CAAR by relative-day offset.

use crate::abnormal::AbnormalReturnSeries;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregated abnormal returns at one relative-day offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AarPoint {
    /// Relative calendar-day offset from the event date.
    pub offset: i64,

    /// Average abnormal return: mean across contributing events.
    pub aar: f64,

    /// Cumulative average abnormal return: running sum of AAR over
    /// increasing offsets.
    pub caar: f64,

    /// Number of events contributing at this offset.
    pub n_events: usize,
}

/// The population-level AAR/CAAR series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AarSeries {
    points: Vec<AarPoint>,
}

impl AarSeries {
    /// Aggregate many events' abnormal-return series.
    ///
    /// All (offset, abnormal return) pairs with `|offset| <= max_offset`
    /// are grouped by offset across events; `AAR(offset)` is the arithmetic
    /// mean over contributing events, `CAAR(offset)` the running sum of AAR
    /// starting from the minimum offset present. Offsets with zero
    /// contributing events are omitted, not interpolated.
    #[must_use]
    pub fn aggregate<'a>(
        series: impl IntoIterator<Item = &'a AbnormalReturnSeries>,
        max_offset: i64,
    ) -> Self {
        let mut grouped: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
        for event_series in series {
            for (offset, ar) in event_series.iter() {
                if offset.abs() <= max_offset {
                    let entry = grouped.entry(offset).or_insert((0.0, 0));
                    entry.0 += ar;
                    entry.1 += 1;
                }
            }
        }

        let mut caar = 0.0;
        let points = grouped
            .into_iter()
            .map(|(offset, (sum, n_events))| {
                let aar = sum / n_events as f64;
                caar += aar;
                AarPoint { offset, aar, caar, n_events }
            })
            .collect();

        Self { points }
    }

    /// Points in increasing offset order.
    #[must_use]
    pub fn points(&self) -> &[AarPoint] {
        &self.points
    }

    /// The point at `offset`, if any event contributed there.
    #[must_use]
    pub fn at(&self, offset: i64) -> Option<&AarPoint> {
        self.points
            .binary_search_by_key(&offset, |p| p.offset)
            .ok()
            .map(|idx| &self.points[idx])
    }

    /// Number of offsets with at least one contributing event.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no offsets had contributing events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
