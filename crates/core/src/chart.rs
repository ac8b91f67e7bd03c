//! Chart data model and the adapter that normalizes it for rendering.
//!
//! [`ChartData`] is the stored/wire shape: fully tolerant, every field
//! defaulted, the kind kept as a raw string. [`ChartSpec`] is what the
//! renderer consumes: a known kind and series values aligned to the
//! category count. All defaulting lives in [`ChartSpec::from_data`], not
//! in serde.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Stored shape
// ---------------------------------------------------------------------------

/// Chart payload as generated and stored. May be partial or malformed;
/// deserialization never fails on missing fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartData {
    /// Raw chart kind string; unknown values fall back to a bar chart.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub series: Vec<ChartSeries>,
}

/// One named series of values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartSeries {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub values: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Normalized shape
// ---------------------------------------------------------------------------

/// Recognized chart kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Clustered column chart. Also the fallback for unknown kinds.
    Bar,
    Pie,
    Line,
}

impl ChartKind {
    /// Parse a raw kind string. Unknown values map to [`ChartKind::Bar`],
    /// never an error.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pie" => ChartKind::Pie,
            "line" => ChartKind::Line,
            _ => ChartKind::Bar,
        }
    }
}

/// Chart ready for rendering: known kind, aligned series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub categories: Vec<String>,
    pub series: Vec<SeriesSpec>,
}

/// A series whose values match the category count exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSpec {
    pub name: String,
    pub values: Vec<f64>,
}

impl ChartSpec {
    /// Normalize stored chart data for rendering.
    ///
    /// Categories pass through verbatim. Each series is aligned to the
    /// category count: extra values are truncated, missing ones padded
    /// with 0.0. Unnamed series get a positional name. Numbers are never
    /// reformatted.
    pub fn from_data(data: &ChartData) -> Self {
        let categories = data.categories.clone();
        let len = categories.len();

        let series = data
            .series
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let name = if s.name.trim().is_empty() {
                    format!("Series {}", i + 1)
                } else {
                    s.name.clone()
                };
                let mut values = s.values.clone();
                values.truncate(len);
                values.resize(len, 0.0);
                SeriesSpec { name, values }
            })
            .collect();

        Self {
            kind: ChartKind::parse(&data.kind),
            title: data.title.clone(),
            categories,
            series,
        }
    }

    /// Whether there is anything to draw. Charts without categories or
    /// series degrade to a title-only rendering upstream.
    pub fn is_renderable(&self) -> bool {
        !self.categories.is_empty() && !self.series.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
