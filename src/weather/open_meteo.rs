//! Open-Meteo geocoding and archive client
//!
//! Neither API needs a key. Requests are issued once; there is no retry and no
//! rate limiting.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Response};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::{Geocoder, WeatherArchive};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::models::{DailyTemperatureSample, Place, TemperatureSeries};

const DAILY_METRIC: &str = "temperature_2m_max";

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    geocoding_base_url: String,
    archive_base_url: String,
    language: String,
}

impl OpenMeteoClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            geocoding_base_url: config.geocoding_base_url.trim_end_matches('/').to_string(),
            archive_base_url: config.archive_base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
        })
    }

    fn search_url(&self, name: &str) -> String {
        format!(
            "{}/search?name={}&count=1&language={}&format=json",
            self.geocoding_base_url,
            urlencoding::encode(name),
            self.language
        )
    }

    fn archive_url(&self, place: &Place, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/archive?latitude={}&longitude={}&start_date={}&end_date={}&daily={}&timezone=auto",
            self.archive_base_url,
            place.latitude,
            place.longitude,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
            DAILY_METRIC
        )
    }

    /// GET `url` and return the body of a 2xx response
    async fn get_text(&self, url: &str, endpoint: &str) -> Result<String, ApiError> {
        let start_time = Instant::now();
        debug!("Open-Meteo request URL: {}", url);

        let response: Response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!(
            "HTTP response received: {} in {:.3}s",
            status,
            start_time.elapsed().as_secs_f64()
        );

        if !status.is_success() {
            let reason = serde_json::from_str::<wire::ErrorBody>(&body)
                .ok()
                .and_then(|e| e.reason);
            warn!("{} request failed with {}: {:?}", endpoint, status, reason);
            return Err(ApiError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
                reason,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl Geocoder for OpenMeteoClient {
    #[instrument(skip(self))]
    async fn search(&self, name: &str) -> Result<Option<Place>, ApiError> {
        info!("Geocoding location: '{}'", name);

        let body = self.get_text(&self.search_url(name), "search").await?;
        let response: wire::GeocodingResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::invalid(format!("geocoding body: {e}")))?;

        let Some(first) = response.results.unwrap_or_default().into_iter().next() else {
            warn!("No results found for location '{}'", name);
            return Ok(None);
        };

        let place = first.into_place(name);
        if !place.has_valid_coordinates() {
            return Err(ApiError::invalid(format!(
                "coordinates out of range: {}",
                place.format_coordinates()
            )));
        }

        debug!(
            "Found location: {} ({})",
            place.display_name(),
            place.format_coordinates()
        );
        Ok(Some(place))
    }
}

#[async_trait]
impl WeatherArchive for OpenMeteoClient {
    #[instrument(skip(self, place), fields(place = %place.query))]
    async fn daily_max_temperatures(
        &self,
        place: &Place,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TemperatureSeries, ApiError> {
        info!(
            "Fetching daily max temperature for {} from {} to {}",
            place.format_coordinates(),
            start,
            end
        );
        let start_time = Instant::now();

        let body = self
            .get_text(&self.archive_url(place, start, end), "archive")
            .await?;
        let response: wire::ArchiveResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::invalid(format!("archive body: {e}")))?;

        let daily = response
            .daily
            .ok_or_else(|| ApiError::invalid("response has no daily block"))?;
        let samples = daily.into_samples()?;

        info!(
            "Retrieved {} daily samples in {:.3}s",
            samples.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(TemperatureSeries::new(place.query.clone(), samples))
    }
}

/// Open-Meteo response bodies
mod wire {
    use super::DailyTemperatureSample;
    use crate::error::ApiError;
    use crate::models::Place;
    use chrono::NaiveDate;
    use serde::Deserialize;

    /// Error body returned with 4xx responses
    #[derive(Debug, Deserialize)]
    pub struct ErrorBody {
        pub reason: Option<String>,
    }

    /// Geocoding response; `results` is omitted entirely when nothing matches
    #[derive(Debug, Deserialize)]
    pub struct GeocodingResponse {
        pub results: Option<Vec<GeocodingResult>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodingResult {
        pub name: String,
        pub latitude: f64,
        pub longitude: f64,
        pub country: Option<String>,
        pub timezone: Option<String>,
    }

    impl GeocodingResult {
        pub fn into_place(self, query: &str) -> Place {
            Place {
                query: query.to_string(),
                name: self.name,
                latitude: self.latitude,
                longitude: self.longitude,
                country: self.country,
                timezone: self.timezone,
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct ArchiveResponse {
        pub daily: Option<DailyData>,
    }

    /// Parallel arrays, one entry per day
    #[derive(Debug, Deserialize)]
    pub struct DailyData {
        pub time: Vec<String>,
        #[serde(rename = "temperature_2m_max")]
        pub temperature_max: Option<Vec<Option<f64>>>,
    }

    impl DailyData {
        pub fn into_samples(self) -> Result<Vec<DailyTemperatureSample>, ApiError> {
            let temperatures = self
                .temperature_max
                .ok_or_else(|| ApiError::invalid("daily block has no temperature_2m_max"))?;

            if temperatures.len() != self.time.len() {
                return Err(ApiError::invalid(format!(
                    "daily arrays differ in length: {} dates, {} temperatures",
                    self.time.len(),
                    temperatures.len()
                )));
            }

            self.time
                .iter()
                .zip(temperatures)
                .map(|(time, temperature)| {
                    let date = NaiveDate::parse_from_str(time, "%Y-%m-%d")
                        .map_err(|e| ApiError::invalid(format!("bad date '{time}': {e}")))?;
                    Ok(DailyTemperatureSample::new(date, temperature))
                })
                .collect()
        }
    }
}
