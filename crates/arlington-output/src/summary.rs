//! Study summary reporting.
//!
//! Collects the run's audit counters, per-window significance results and
//! per-category breakdowns into one renderable structure with plain-text
//! (`Display`) and Markdown output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Significance of one CAR window's mean across events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowSignificance {
    /// Window name.
    pub window: String,

    /// Events with a non-missing CAR in this window.
    pub n: usize,

    /// Mean CAR across those events.
    pub mean_car: f64,

    /// One-sample t statistic against mean zero.
    pub t_statistic: f64,

    /// Two-sided p-value.
    pub p_value: f64,

    /// Whether the p-value clears the configured significance level.
    pub significant: bool,
}

/// Mean CAR of one category's events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryMean {
    /// Category label.
    pub label: String,

    /// Events carrying this label with a non-missing CAR.
    pub n: usize,

    /// Mean CAR across those events.
    pub mean_car: f64,
}

/// Per-category mean CARs for one attribute and window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryBreakdown {
    /// Attribute that was grouped ("sector", "party").
    pub attribute: String,

    /// Window whose CAR was averaged.
    pub window: String,

    /// One row per category, sorted by label.
    pub rows: Vec<CategoryMean>,
}

impl CategoryBreakdown {
    /// Group CAR values by category label and average them.
    ///
    /// Rows with a missing label or missing CAR are excluded. Returns
    /// `None` when no rows contribute — the caller skips this breakdown
    /// with a warning instead of rendering an empty table.
    pub fn from_rows<'a>(
        attribute: &str,
        window: &str,
        rows: impl IntoIterator<Item = (Option<&'a str>, Option<f64>)>,
    ) -> Option<Self> {
        let mut grouped: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        for (label, car) in rows {
            let (Some(label), Some(car)) = (label, car) else {
                continue;
            };
            if !car.is_finite() {
                continue;
            }
            let entry = grouped.entry(label.to_string()).or_insert((0.0, 0));
            entry.0 += car;
            entry.1 += 1;
        }

        if grouped.is_empty() {
            return None;
        }

        let rows = grouped
            .into_iter()
            .map(|(label, (sum, n))| CategoryMean { label, n, mean_car: sum / n as f64 })
            .collect();

        Some(Self {
            attribute: attribute.to_string(),
            window: window.to_string(),
            rows,
        })
    }
}

/// The complete study summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StudySummary {
    /// Events submitted to the run.
    pub total_events: usize,

    /// Events that produced a result.
    pub processed: usize,

    /// Events skipped: entity had no return series.
    pub skipped_unknown_entity: usize,

    /// Events skipped: estimation window was short.
    pub skipped_insufficient_data: usize,

    /// Events skipped: market-model fit was degenerate.
    pub skipped_degenerate_fit: usize,

    /// Per-window significance results.
    pub windows: Vec<WindowSignificance>,

    /// Per-category breakdowns that had contributing rows.
    pub breakdowns: Vec<CategoryBreakdown>,
}

impl StudySummary {
    /// Total number of skipped events.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped_unknown_entity + self.skipped_insufficient_data + self.skipped_degenerate_fit
    }

    /// Render the summary as Markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Event Study Summary\n\n");
        out.push_str(&format!(
            "Processed {} of {} events ({} skipped: {} unknown entity, {} insufficient data, {} degenerate fit)\n\n",
            self.processed,
            self.total_events,
            self.skipped(),
            self.skipped_unknown_entity,
            self.skipped_insufficient_data,
            self.skipped_degenerate_fit,
        ));

        out.push_str("## Mean CAR significance\n\n");
        out.push_str("| Window | N | Mean CAR | t | p-value | Significant |\n");
        out.push_str("|--------|---|----------|---|---------|-------------|\n");
        for w in &self.windows {
            out.push_str(&format!(
                "| {} | {} | {:.6} | {:.3} | {:.4} | {} |\n",
                w.window,
                w.n,
                w.mean_car,
                w.t_statistic,
                w.p_value,
                if w.significant { "yes" } else { "no" }
            ));
        }

        for breakdown in &self.breakdowns {
            out.push_str(&format!(
                "\n## Mean {} by {}\n\n",
                breakdown.window, breakdown.attribute
            ));
            out.push_str("| Category | N | Mean CAR |\n");
            out.push_str("|----------|---|----------|\n");
            for row in &breakdown.rows {
                out.push_str(&format!(
                    "| {} | {} | {:.6} |\n",
                    row.label, row.n, row.mean_car
                ));
            }
        }

        out
    }
}

impl fmt::Display for StudySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Processed {}/{} events, {} skipped ({} unknown entity, {} insufficient data, {} degenerate fit)",
            self.processed,
            self.total_events,
            self.skipped(),
            self.skipped_unknown_entity,
            self.skipped_insufficient_data,
            self.skipped_degenerate_fit,
        )?;

        for w in &self.windows {
            writeln!(
                f,
                "{:>8}: n={:<5} mean={:+.6} t={:+.3} p={:.4}{}",
                w.window,
                w.n,
                w.mean_car,
                w.t_statistic,
                w.p_value,
                if w.significant { " *" } else { "" }
            )?;
        }

        for breakdown in &self.breakdowns {
            writeln!(f, "{} by {}:", breakdown.window, breakdown.attribute)?;
            for row in &breakdown.rows {
                writeln!(f, "  {:<24} n={:<5} mean={:+.6}", row.label, row.n, row.mean_car)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_summary() -> StudySummary {
        StudySummary {
            total_events: 10,
            processed: 8,
            skipped_unknown_entity: 1,
            skipped_insufficient_data: 1,
            skipped_degenerate_fit: 0,
            windows: vec![WindowSignificance {
                window: "CAR5".to_string(),
                n: 8,
                mean_car: 0.012,
                t_statistic: 2.4,
                p_value: 0.043,
                significant: true,
            }],
            breakdowns: vec![CategoryBreakdown {
                attribute: "party".to_string(),
                window: "CAR5".to_string(),
                rows: vec![CategoryMean {
                    label: "Republican".to_string(),
                    n: 5,
                    mean_car: 0.02,
                }],
            }],
        }
    }

    #[test]
    fn test_skip_accounting() {
        let summary = sample_summary();
        assert_eq!(summary.skipped(), 2);
        assert_eq!(summary.processed + summary.skipped(), summary.total_events);
    }

    #[test]
    fn test_display_mentions_counts_and_windows() {
        let text = sample_summary().to_string();
        assert!(text.contains("Processed 8/10"));
        assert!(text.contains("CAR5"));
        assert!(text.contains("*"));
    }

    #[test]
    fn test_markdown_contains_tables() {
        let md = sample_summary().to_markdown();
        assert!(md.contains("# Event Study Summary"));
        assert!(md.contains("| Window | N | Mean CAR |"));
        assert!(md.contains("| CAR5 | 8 |"));
        assert!(md.contains("## Mean CAR5 by party"));
    }

    #[test]
    fn test_breakdown_groups_and_averages() {
        let rows = vec![
            (Some("Energy"), Some(0.01)),
            (Some("Energy"), Some(0.03)),
            (Some("Tech"), Some(-0.01)),
            (None, Some(0.5)),
            (Some("Tech"), None),
        ];

        let breakdown = CategoryBreakdown::from_rows("sector", "CAR5", rows).unwrap();

        assert_eq!(breakdown.rows.len(), 2);
        assert_eq!(breakdown.rows[0].label, "Energy");
        assert_eq!(breakdown.rows[0].n, 2);
        assert!((breakdown.rows[0].mean_car - 0.02).abs() < 1e-12);
        assert_eq!(breakdown.rows[1].label, "Tech");
        assert_eq!(breakdown.rows[1].n, 1);
    }

    #[test]
    fn test_empty_breakdown_is_none() {
        let rows: Vec<(Option<&str>, Option<f64>)> = vec![(None, None)];
        assert!(CategoryBreakdown::from_rows("sector", "CAR5", rows).is_none());
    }
}
