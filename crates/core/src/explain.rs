//! Ranked, signed views over the per-feature attributions of one prediction.
//!
//! Both views are derived on demand from the same mapping; nothing here is
//! stored or mutated. Ordering among equal magnitudes always follows the
//! order the service sent the features in.

use crate::domain::scoring::Attributions;
use serde::Serialize;

/// Features shown in the compact bar chart.
pub const CHART_TOP_N: usize = 15;
/// Rows shown in the detailed table.
pub const TABLE_TOP_N: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Pushes the default probability up.
    IncreasesRisk,
    /// Pushes the default probability down.
    DecreasesRisk,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplanationEntry {
    pub feature: String,
    pub impact: f64,
    pub abs_impact: f64,
}

impl ExplanationEntry {
    pub fn new(feature: impl Into<String>, impact: f64) -> Self {
        Self {
            feature: feature.into(),
            impact,
            abs_impact: impact.abs(),
        }
    }

    /// Sign relative to the zero midpoint of the color scale.
    pub fn direction(&self) -> Direction {
        if self.impact > 0.0 {
            Direction::IncreasesRisk
        } else if self.impact < 0.0 {
            Direction::DecreasesRisk
        } else {
            Direction::Neutral
        }
    }
}

/// Stable sort by absolute impact ascending, keeping the last `n`.
pub fn ranked_top_n(values: &Attributions, n: usize) -> Vec<ExplanationEntry> {
    let mut entries: Vec<ExplanationEntry> = values
        .iter()
        .map(|(feature, impact)| ExplanationEntry::new(feature, impact))
        .collect();
    entries.sort_by(|a, b| a.abs_impact.total_cmp(&b.abs_impact));
    let skip = entries.len().saturating_sub(n);
    entries.split_off(skip)
}

/// Same selection as [`ranked_top_n`], listed largest magnitude first.
pub fn ranked_top_n_largest_first(values: &Attributions, n: usize) -> Vec<ExplanationEntry> {
    let mut entries = ranked_top_n(values, n);
    entries.reverse();
    entries
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    /// Bar chart rows, smallest magnitude first so the largest sits on top.
    pub chart: Vec<ExplanationEntry>,
    /// Table rows, largest magnitude first.
    pub table: Vec<ExplanationEntry>,
}

impl Explanation {
    pub fn from_attributions(values: &Attributions) -> Self {
        Self {
            chart: ranked_top_n(values, CHART_TOP_N),
            table: ranked_top_n_largest_first(values, TABLE_TOP_N),
        }
    }

    /// Largest absolute impact in the chart, used to scale bar lengths.
    pub fn max_abs_impact(&self) -> f64 {
        self.chart
            .iter()
            .map(|e| e.abs_impact)
            .fold(0.0, f64::max)
    }
}
