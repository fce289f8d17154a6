//! Series alignment and summary statistics
//!
//! Pure functions over [`TemperatureSeries`]; no I/O happens here.

use std::cmp::Ordering;

use crate::models::{ComparisonRow, ComparisonTable, SummaryMetric, TemperatureSeries};

/// Full outer join of two series on date.
///
/// Every date present in either series yields exactly one row. A side with no
/// sample for that date is `None`. Rows come out ascending by date.
#[must_use]
pub fn align(series_a: &TemperatureSeries, series_b: &TemperatureSeries) -> ComparisonTable {
    let a = series_a.samples();
    let b = series_b.samples();
    let mut rows = Vec::with_capacity(a.len().max(b.len()));
    let (mut i, mut j) = (0, 0);

    // both inputs are sorted with unique dates, so a merge walk is enough
    while i < a.len() || j < b.len() {
        let order = match (a.get(i), b.get(j)) {
            (Some(x), Some(y)) => x.date.cmp(&y.date),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => break,
        };
        let row = match order {
            Ordering::Less => {
                i += 1;
                ComparisonRow {
                    date: a[i - 1].date,
                    city_a: a[i - 1].max_temperature,
                    city_b: None,
                }
            }
            Ordering::Greater => {
                j += 1;
                ComparisonRow {
                    date: b[j - 1].date,
                    city_a: None,
                    city_b: b[j - 1].max_temperature,
                }
            }
            Ordering::Equal => {
                i += 1;
                j += 1;
                ComparisonRow {
                    date: a[i - 1].date,
                    city_a: a[i - 1].max_temperature,
                    city_b: b[j - 1].max_temperature,
                }
            }
        };
        rows.push(row);
    }

    ComparisonTable {
        label_a: series_a.label().to_string(),
        label_b: series_b.label().to_string(),
        rows,
    }
}

/// Arithmetic mean over the present values, `None` if there are none
#[must_use]
pub fn mean(series: &TemperatureSeries) -> Option<f64> {
    let (sum, count) = series
        .present_values()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Pair the mean with the series label
#[must_use]
pub fn summarize(series: &TemperatureSeries) -> SummaryMetric {
    SummaryMetric {
        city_label: series.label().to_string(),
        average_max_temp: mean(series),
    }
}
