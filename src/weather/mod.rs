//! Upstream weather services.
//!
//! The pipeline only talks to the two traits below; [`OpenMeteoClient`]
//! implements both against the public Open-Meteo APIs.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::ApiError;
use crate::models::{Place, TemperatureSeries};

pub mod open_meteo;

pub use open_meteo::OpenMeteoClient;

/// Forward geocoding: place name to coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Best match for `name`, or `None` when the service knows no such place.
    ///
    /// Only the first result is considered.
    async fn search(&self, name: &str) -> Result<Option<Place>, ApiError>;
}

/// Historical daily weather
#[async_trait]
pub trait WeatherArchive: Send + Sync {
    /// Daily maximum 2 m temperature for every day in `start..=end` that the
    /// service reports, in the place's local timezone. The range is passed
    /// through unchecked.
    async fn daily_max_temperatures(
        &self,
        place: &Place,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TemperatureSeries, ApiError>;
}
