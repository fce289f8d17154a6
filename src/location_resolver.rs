//! Location Resolution Module
//!
//! Turns a free-text city name into a [`Place`], memoizing lookups by the
//! trimmed name.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{CacheKey, MemoCache};
use crate::error::SkyCastError;
use crate::models::Place;
use crate::weather::Geocoder;

/// Service for resolving city names
#[derive(Clone)]
pub struct LocationResolver {
    geocoder: Arc<dyn Geocoder>,
    cache: MemoCache,
}

impl LocationResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>, cache: MemoCache) -> Self {
        Self { geocoder, cache }
    }

    /// Resolve a city name to a place.
    ///
    /// Blank input is `NotFound` without touching the network. A lookup that
    /// matches nothing is also `NotFound`; transport and decoding failures are
    /// `Geocoding` errors and are not memoized.
    pub async fn resolve(&self, city_name: &str) -> Result<Place, SkyCastError> {
        let name = city_name.trim();
        if name.is_empty() {
            debug!("Blank city name, skipping lookup");
            return Err(SkyCastError::not_found(city_name));
        }

        let key = CacheKey::new("geocode", &(name,)).ok();
        if let Some(key) = &key {
            match self.cache.get::<Option<Place>>(key).await {
                Ok(Some(cached)) => {
                    debug!("Geocoding cache hit for '{}'", name);
                    return cached.ok_or_else(|| SkyCastError::not_found(name));
                }
                Ok(None) => {}
                Err(e) => warn!("Ignoring unreadable cache entry for '{}': {}", name, e),
            }
        }

        debug!("Geocoding location name: {}", name);
        let found = self
            .geocoder
            .search(name)
            .await
            .map_err(|e| SkyCastError::geocoding(name, e))?;

        if let Some(key) = &key {
            if let Err(e) = self.cache.put(key, &found).await {
                warn!("Failed to cache geocoding result for '{}': {}", name, e);
            }
        }

        match found {
            Some(place) => {
                debug!(
                    "Resolved location: {} at ({}, {})",
                    place.name, place.latitude, place.longitude
                );
                Ok(place)
            }
            None => Err(SkyCastError::not_found(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use async_trait::async_trait;
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct StubGeocoder {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl Geocoder for StubGeocoder {
        async fn search(&self, name: &str) -> Result<Option<Place>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ApiError::invalid("boom"));
            }
            Ok(match name {
                "London" => Some(Place::new(name, "London", 51.5085, -0.1257)),
                _ => None,
            })
        }
    }

    fn resolver(geocoder: &Arc<StubGeocoder>) -> LocationResolver {
        LocationResolver::new(geocoder.clone(), MemoCache::default())
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    #[tokio::test]
    async fn test_blank_name_is_not_found_without_lookup(#[case] name: &str) {
        let geocoder = Arc::new(StubGeocoder::default());
        let err = resolver(&geocoder).resolve(name).await.unwrap_err();
        assert!(matches!(err, SkyCastError::NotFound { .. }));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolve_trims_and_memoizes() {
        let geocoder = Arc::new(StubGeocoder::default());
        let resolver = resolver(&geocoder);

        let place = resolver.resolve("  London ").await.unwrap();
        assert_eq!(place.query, "London");
        assert!(place.has_valid_coordinates());

        let again = resolver.resolve("London").await.unwrap();
        assert_eq!(again, place);
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_not_found_is_memoized() {
        let geocoder = Arc::new(StubGeocoder::default());
        let resolver = resolver(&geocoder);

        for _ in 0..2 {
            let err = resolver.resolve("Atlantis").await.unwrap_err();
            assert_eq!(err.user_message(), "Could not find city: Atlantis");
        }
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_memoized() {
        let geocoder = Arc::new(StubGeocoder {
            fail: true,
            ..Default::default()
        });
        let resolver = resolver(&geocoder);

        for _ in 0..2 {
            let err = resolver.resolve("London").await.unwrap_err();
            assert!(matches!(err, SkyCastError::Geocoding { .. }));
        }
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 2);
    }
}
