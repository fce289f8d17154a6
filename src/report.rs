//! Plain-text rendering of a finished comparison

use crate::comparison_service::Comparison;
use crate::models::{ComparisonTable, SummaryMetric};

const DATE_WIDTH: usize = 10;

/// `"📍 London avg max temp: 8.4°C"`
#[must_use]
pub fn format_metric(metric: &SummaryMetric) -> String {
    format!(
        "📍 {} avg max temp: {}",
        metric.city_label,
        metric.format_average()
    )
}

fn cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"))
}

/// Date column followed by one column per city; absent cells print as `-`
#[must_use]
pub fn format_table(table: &ComparisonTable) -> String {
    let width_a = table.label_a.chars().count().max(6);
    let width_b = table.label_b.chars().count().max(6);

    let mut lines = vec![
        format!(
            "{:<DATE_WIDTH$}  {:>width_a$}  {:>width_b$}",
            "Date", table.label_a, table.label_b
        ),
        format!(
            "{}  {}  {}",
            "-".repeat(DATE_WIDTH),
            "-".repeat(width_a),
            "-".repeat(width_b)
        ),
    ];
    lines.extend(table.rows.iter().map(|row| {
        format!(
            "{:<DATE_WIDTH$}  {:>width_a$}  {:>width_b$}",
            row.date.format("%Y-%m-%d").to_string(),
            cell(row.city_a),
            cell(row.city_b)
        )
    }));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Full report: both metrics, then the table
#[must_use]
pub fn format_comparison(comparison: &Comparison) -> String {
    format!(
        "{}\n{}\n\nMax Daily Temperature (°C): {} vs {}\n{}",
        format_metric(&comparison.metric_a),
        format_metric(&comparison.metric_b),
        comparison.table.label_a,
        comparison.table.label_b,
        format_table(&comparison.table)
    )
}
