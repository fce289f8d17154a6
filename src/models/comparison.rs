//! Date-aligned comparison of two cities and their summary metrics

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One date of the comparison; either side may be absent
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct ComparisonRow {
    pub date: NaiveDate,
    pub city_a: Option<f64>,
    pub city_b: Option<f64>,
}

impl ComparisonRow {
    #[must_use]
    pub fn new(date: NaiveDate, city_a: Option<f64>, city_b: Option<f64>) -> Self {
        Self {
            date,
            city_a,
            city_b,
        }
    }
}

/// Outer join of two temperature series, ascending by date
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ComparisonTable {
    pub label_a: String,
    pub label_b: String,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    /// Min and max over every present value in both columns
    #[must_use]
    pub fn temperature_range(&self) -> Option<(f64, f64)> {
        self.rows
            .iter()
            .flat_map(|r| [r.city_a, r.city_b])
            .flatten()
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Average daily maximum for one city
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SummaryMetric {
    pub city_label: String,
    /// `None` when the series had no present values
    pub average_max_temp: Option<f64>,
}

impl SummaryMetric {
    pub fn new(city_label: impl Into<String>, average_max_temp: Option<f64>) -> Self {
        Self {
            city_label: city_label.into(),
            average_max_temp,
        }
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_average(&self) -> String {
        match self.average_max_temp {
            Some(avg) => format!("{avg:.1}°C"),
            None => "n/a".to_string(),
        }
    }
}
