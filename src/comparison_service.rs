//! Two-city comparison pipeline
//!
//! Resolves both city names, fetches both temperature series, aligns them and
//! computes the per-city averages. Every failure is folded into a
//! [`ComparisonOutcome`] instead of being returned as an error, so callers
//! pattern-match on what happened.

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::analysis::{align, summarize};
use crate::cache::MemoCache;
use crate::config::SkyCastConfig;
use crate::error::SkyCastError;
use crate::historical_fetcher::HistoricalWeatherFetcher;
use crate::location_resolver::LocationResolver;
use crate::models::{ComparisonTable, Place, SummaryMetric, TemperatureSeries};
use crate::weather::{Geocoder, OpenMeteoClient, WeatherArchive};

/// What the user asked to compare
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRequest {
    pub city_a: String,
    pub city_b: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ComparisonRequest {
    pub fn new(
        city_a: impl Into<String>,
        city_b: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            city_a: city_a.into(),
            city_b: city_b.into(),
            start,
            end,
        }
    }
}

/// A finished comparison, ready for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison {
    pub place_a: Place,
    pub place_b: Place,
    pub series_a: TemperatureSeries,
    pub series_b: TemperatureSeries,
    pub metric_a: SummaryMetric,
    pub metric_b: SummaryMetric,
    pub table: ComparisonTable,
}

#[derive(Debug)]
pub enum ComparisonOutcome {
    /// Both series fetched and non-empty
    Ready(Box<Comparison>),
    /// At least one city did not resolve; nothing was fetched
    Unresolved(Vec<SkyCastError>),
    /// At least one fetch failed
    FetchFailed(Vec<SkyCastError>),
    /// Fetches succeeded but at least one series has no samples
    NoData(Vec<SkyCastError>),
}

impl ComparisonOutcome {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, ComparisonOutcome::Ready(_))
    }

    /// Errors that prevented the comparison, in city A, city B order
    #[must_use]
    pub fn failures(&self) -> &[SkyCastError] {
        match self {
            ComparisonOutcome::Ready(_) => &[],
            ComparisonOutcome::Unresolved(errors)
            | ComparisonOutcome::FetchFailed(errors)
            | ComparisonOutcome::NoData(errors) => errors,
        }
    }

    /// One user-facing line per failure
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.failures().iter().map(SkyCastError::user_message).collect()
    }
}

/// Collect the errors of a pair of results, or both values if neither failed
fn both<T>(
    a: Result<T, SkyCastError>,
    b: Result<T, SkyCastError>,
) -> Result<(T, T), Vec<SkyCastError>> {
    match (a, b) {
        (Ok(a), Ok(b)) => Ok((a, b)),
        (a, b) => Err(a.err().into_iter().chain(b.err()).collect()),
    }
}

/// Comparison pipeline service
#[derive(Clone)]
pub struct ComparisonService {
    resolver: LocationResolver,
    fetcher: HistoricalWeatherFetcher,
}

impl ComparisonService {
    /// Build a service over explicit collaborators sharing one cache
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        archive: Arc<dyn WeatherArchive>,
        cache: MemoCache,
    ) -> Self {
        Self {
            resolver: LocationResolver::new(geocoder, cache.clone()),
            fetcher: HistoricalWeatherFetcher::new(archive, cache),
        }
    }

    /// Build a service talking to Open-Meteo as configured
    pub fn from_config(config: &SkyCastConfig) -> Result<Self> {
        let client = Arc::new(OpenMeteoClient::new(&config.api)?);
        let cache = MemoCache::in_memory(config.cache.ttl());
        Ok(Self::new(client.clone(), client, cache))
    }

    #[must_use]
    pub fn resolver(&self) -> &LocationResolver {
        &self.resolver
    }

    #[must_use]
    pub fn fetcher(&self) -> &HistoricalWeatherFetcher {
        &self.fetcher
    }

    /// Run the whole pipeline for one request
    #[instrument(skip(self), fields(a = %request.city_a, b = %request.city_b))]
    pub async fn compare(&self, request: &ComparisonRequest) -> ComparisonOutcome {
        info!(
            "Comparing '{}' and '{}' from {} to {}",
            request.city_a, request.city_b, request.start, request.end
        );

        let (place_a, place_b) = match self.resolve_pair(request).await {
            Ok(places) => places,
            Err(errors) => {
                warn!("{} city name(s) could not be resolved", errors.len());
                return ComparisonOutcome::Unresolved(errors);
            }
        };

        let (series_a, series_b) = match self.fetch_pair(&place_a, &place_b, request).await {
            Ok(series) => series,
            Err(errors) => {
                warn!("{} weather fetch(es) failed", errors.len());
                return ComparisonOutcome::FetchFailed(errors);
            }
        };

        let empty: Vec<SkyCastError> = [&series_a, &series_b]
            .into_iter()
            .filter(|s| s.is_empty())
            .map(|s| SkyCastError::empty_series(s.label()))
            .collect();
        if !empty.is_empty() {
            warn!("No weather data for {} city(ies) in range", empty.len());
            return ComparisonOutcome::NoData(empty);
        }

        let table = align(&series_a, &series_b);
        let metric_a = summarize(&series_a);
        let metric_b = summarize(&series_b);
        info!(
            "Comparison ready: {} rows, averages {} / {}",
            table.len(),
            metric_a.format_average(),
            metric_b.format_average()
        );

        ComparisonOutcome::Ready(Box::new(Comparison {
            place_a,
            place_b,
            series_a,
            series_b,
            metric_a,
            metric_b,
            table,
        }))
    }

    /// Resolve both names concurrently; the same name is looked up once
    async fn resolve_pair(
        &self,
        request: &ComparisonRequest,
    ) -> Result<(Place, Place), Vec<SkyCastError>> {
        if request.city_a.trim() == request.city_b.trim() {
            debug!("Both sides name '{}', resolving once", request.city_a.trim());
            let place = self
                .resolver
                .resolve(&request.city_a)
                .await
                .map_err(|e| vec![e])?;
            return Ok((place.clone(), place));
        }

        let (a, b) = futures::join!(
            self.resolver.resolve(&request.city_a),
            self.resolver.resolve(&request.city_b)
        );
        both(a, b)
    }

    /// Fetch both series concurrently; places at the same coordinates share one fetch
    async fn fetch_pair(
        &self,
        place_a: &Place,
        place_b: &Place,
        request: &ComparisonRequest,
    ) -> Result<(TemperatureSeries, TemperatureSeries), Vec<SkyCastError>> {
        if place_a.same_coordinates(place_b) {
            debug!(
                "'{}' and '{}' share coordinates {}, fetching once",
                place_a.query,
                place_b.query,
                place_a.format_coordinates()
            );
            let series = self
                .fetcher
                .fetch_daily_max(place_a, request.start, request.end)
                .await
                .map_err(|e| vec![e])?;
            let other = series.clone().relabel(place_b.query.clone());
            return Ok((series, other));
        }

        let (a, b) = futures::join!(
            self.fetcher
                .fetch_daily_max(place_a, request.start, request.end),
            self.fetcher
                .fetch_daily_max(place_b, request.start, request.end)
        );
        both(a, b)
    }
}
