//! Memoized retrieval of daily maximum temperatures for a place

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::cache::{CacheKey, MemoCache};
use crate::error::SkyCastError;
use crate::models::{Place, TemperatureSeries};
use crate::weather::WeatherArchive;

#[derive(Clone)]
pub struct HistoricalWeatherFetcher {
    archive: Arc<dyn WeatherArchive>,
    cache: MemoCache,
}

impl HistoricalWeatherFetcher {
    pub fn new(archive: Arc<dyn WeatherArchive>, cache: MemoCache) -> Self {
        Self { archive, cache }
    }

    /// Daily max temperatures for `place` over `start..=end`.
    ///
    /// The returned series is labeled with the place's query name. Successful
    /// results are memoized per coordinate and range, empty ones included.
    pub async fn fetch_daily_max(
        &self,
        place: &Place,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TemperatureSeries, SkyCastError> {
        if start > end {
            warn!("Start date {} is after end date {}", start, end);
        }

        let key = CacheKey::new("archive", &(place.latitude, place.longitude, start, end)).ok();
        if let Some(key) = &key {
            match self.cache.get::<TemperatureSeries>(key).await {
                Ok(Some(series)) => {
                    debug!("Archive cache hit for {}", place.format_coordinates());
                    return Ok(series.relabel(place.query.clone()));
                }
                Ok(None) => {}
                Err(e) => warn!("Ignoring unreadable cache entry: {}", e),
            }
        }

        let series = self
            .archive
            .daily_max_temperatures(place, start, end)
            .await
            .map_err(|e| SkyCastError::fetch(place.query.clone(), e))?;

        if let Some(key) = &key {
            if let Err(e) = self.cache.put(key, &series).await {
                warn!("Failed to cache archive result: {}", e);
            }
        }

        Ok(series.relabel(place.query.clone()))
    }
}
