//! `SkyCast` - historical temperature comparison between two cities
//!
//! This library resolves city names with the Open-Meteo geocoding API, fetches
//! daily maximum temperatures from the Open-Meteo archive, aligns the two
//! series by date and summarizes them.

pub mod analysis;
pub mod cache;
pub mod chart;
pub mod comparison_service;
pub mod config;
pub mod error;
pub mod historical_fetcher;
pub mod location_resolver;
pub mod logging;
pub mod models;
pub mod report;
pub mod weather;

// Re-export core types for public API
pub use analysis::{align, mean, summarize};
pub use cache::{CacheKey, CacheStore, InMemoryStore, MemoCache};
pub use comparison_service::{
    Comparison, ComparisonOutcome, ComparisonRequest, ComparisonService,
};
pub use config::SkyCastConfig;
pub use error::{ApiError, SkyCastError};
pub use historical_fetcher::HistoricalWeatherFetcher;
pub use location_resolver::LocationResolver;
pub use models::{
    ComparisonRow, ComparisonTable, DailyTemperatureSample, Place, SummaryMetric,
    TemperatureSeries,
};
pub use weather::{Geocoder, OpenMeteoClient, WeatherArchive};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SkyCastError>;
