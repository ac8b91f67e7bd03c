//! Fixed fallback values for failed generation calls.
//!
//! Handlers apply these when a [`crate::Generator`] call errors, so a
//! generation outage degrades output instead of failing requests. Keeping
//! the constants in one module keeps handlers and tests agreeing on the
//! exact degraded values.

use docforge_core::chart::{ChartData, ChartSeries};

/// Outline used when outline generation fails.
pub fn outline() -> Vec<String> {
    vec![
        "Introduction".to_string(),
        "Main Body".to_string(),
        "Conclusion".to_string(),
    ]
}

/// Body text used when content generation fails for `item_title`.
pub fn content(item_title: &str) -> String {
    format!("Content generation failed for {item_title}.")
}

/// Sample chart used when chart generation fails. Always renderable.
pub fn chart() -> ChartData {
    ChartData {
        kind: "bar".to_string(),
        title: "Sample Data".to_string(),
        categories: vec![
            "Q1".to_string(),
            "Q2".to_string(),
            "Q3".to_string(),
            "Q4".to_string(),
        ],
        series: vec![ChartSeries {
            name: "Series A".to_string(),
            values: vec![3.0, 5.0, 4.0, 6.0],
        }],
    }
}

/// Generic search keywords used when image-query generation fails.
pub fn image_query() -> String {
    "abstract professional background".to_string()
}
