//! Daily temperature samples and the per-city series built from them

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One day of the archive: the maximum 2 m temperature, if reported
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct DailyTemperatureSample {
    pub date: NaiveDate,
    /// Maximum temperature in Celsius
    pub max_temperature: Option<f64>,
}

impl DailyTemperatureSample {
    #[must_use]
    pub fn new(date: NaiveDate, max_temperature: Option<f64>) -> Self {
        Self {
            date,
            max_temperature,
        }
    }
}

/// Ordered daily samples for one city.
///
/// Dates are strictly increasing; construction sorts the input and keeps only
/// the first sample seen for any date.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TemperatureSeries {
    label: String,
    samples: Vec<DailyTemperatureSample>,
}

impl TemperatureSeries {
    pub fn new(label: impl Into<String>, mut samples: Vec<DailyTemperatureSample>) -> Self {
        let label = label.into();
        // stable sort keeps upstream order among equal dates
        samples.sort_by_key(|s| s.date);
        let before = samples.len();
        samples.dedup_by_key(|s| s.date);
        if samples.len() != before {
            warn!(
                "Dropped {} duplicate date(s) from series '{}'",
                before - samples.len(),
                label
            );
        }
        Self { label, samples }
    }

    #[must_use]
    pub fn empty(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            samples: Vec::new(),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Same samples under a different label
    #[must_use]
    pub fn relabel(self, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            samples: self.samples,
        }
    }

    #[must_use]
    pub fn samples(&self) -> &[DailyTemperatureSample] {
        &self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = &DailyTemperatureSample> {
        self.samples.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Temperatures that are actually present
    pub fn present_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().filter_map(|s| s.max_temperature)
    }

    /// First and last date covered
    #[must_use]
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.samples.first()?.date, self.samples.last()?.date))
    }
}
