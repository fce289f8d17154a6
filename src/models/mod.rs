//! Data models for the SkyCast pipeline
//!
//! This module contains the core domain models organized by concern:
//! - Location: resolved places and their coordinates
//! - Series: daily maximum temperature samples for one city
//! - Comparison: the aligned two-city table and summary metrics

pub mod comparison;
pub mod location;
pub mod series;

// Re-export all public types for convenient access
pub use comparison::{ComparisonRow, ComparisonTable, SummaryMetric};
pub use location::Place;
pub use series::{DailyTemperatureSample, TemperatureSeries};
