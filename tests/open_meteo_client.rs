//! OpenMeteoClient against a mock HTTP server.

use chrono::NaiveDate;
use skycast::config::ApiConfig;
use std::sync::Arc;

use skycast::{
    ApiError, Geocoder, LocationResolver, MemoCache, OpenMeteoClient, Place, SkyCastError,
    WeatherArchive,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OpenMeteoClient {
    let config = ApiConfig {
        geocoding_base_url: format!("{}/v1", server.uri()),
        archive_base_url: format!("{}/v1", server.uri()),
        timeout_seconds: 5,
        ..ApiConfig::default()
    };
    OpenMeteoClient::new(&config).unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn london() -> Place {
    Place::new("London", "London", 51.50853, -0.12574)
}

#[tokio::test]
async fn test_geocode_takes_first_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "New York"))
        .and(query_param("count", "1"))
        .and(query_param("language", "en"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                {
                    "id": 5128581,
                    "name": "New York",
                    "latitude": 40.71427,
                    "longitude": -74.00597,
                    "country": "United States",
                    "timezone": "America/New_York"
                },
                {
                    "id": 1,
                    "name": "New York Mills",
                    "latitude": 46.51802,
                    "longitude": -95.37615
                }
            ],
            "generationtime_ms": 0.9
        })))
        .expect(1)
        .mount(&server)
        .await;

    let place = client_for(&server).search("New York").await.unwrap().unwrap();

    assert_eq!(place.query, "New York");
    assert_eq!(place.name, "New York");
    assert_eq!(place.latitude, 40.71427);
    assert_eq!(place.longitude, -74.00597);
    assert_eq!(place.country.as_deref(), Some("United States"));
    assert_eq!(place.timezone.as_deref(), Some("America/New_York"));
    assert!(place.has_valid_coordinates());
}

#[tokio::test]
async fn test_geocode_without_results_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "generationtime_ms": 0.4 })),
        )
        .mount(&server)
        .await;

    let found = client_for(&server).search("Atlantis").await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_geocode_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server).search("London").await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 503, .. }));
}

#[tokio::test]
async fn test_geocode_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).search("London").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_geocode_out_of_range_coordinates_are_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Nowhere"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{ "name": "Nowhere", "latitude": 95.0, "longitude": 0.0 }]
        })))
        .expect(3)
        .mount(&server)
        .await;

    let client = Arc::new(client_for(&server));
    let err = client.search("Nowhere").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse(_)));

    // A malformed answer is a geocoding failure and is not memoized
    let resolver = LocationResolver::new(client, MemoCache::default());
    for _ in 0..2 {
        let err = resolver.resolve("Nowhere").await.unwrap_err();
        assert!(matches!(err, SkyCastError::Geocoding { .. }));
        assert_eq!(err.city(), Some("Nowhere"));
    }
}

#[tokio::test]
async fn test_archive_daily_max() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .and(query_param("latitude", "51.50853"))
        .and(query_param("longitude", "-0.12574"))
        .and(query_param("start_date", "2024-01-01"))
        .and(query_param("end_date", "2024-01-03"))
        .and(query_param("daily", "temperature_2m_max"))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": 51.5,
            "longitude": -0.119999886,
            "timezone": "Europe/London",
            "daily_units": { "time": "iso8601", "temperature_2m_max": "°C" },
            "daily": {
                "time": ["2024-01-01", "2024-01-02", "2024-01-03"],
                "temperature_2m_max": [10.1, null, 8.3]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let series = client_for(&server)
        .daily_max_temperatures(&london(), date("2024-01-01"), date("2024-01-03"))
        .await
        .unwrap();

    assert_eq!(series.label(), "London");
    assert_eq!(series.len(), 3);
    assert_eq!(series.samples()[0].date, date("2024-01-01"));
    assert_eq!(series.samples()[0].max_temperature, Some(10.1));
    assert_eq!(series.samples()[1].max_temperature, None);
}

#[tokio::test]
async fn test_archive_single_day() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "daily": { "time": ["2024-06-01"], "temperature_2m_max": [21.4] }
        })))
        .mount(&server)
        .await;

    let series = client_for(&server)
        .daily_max_temperatures(&london(), date("2024-06-01"), date("2024-06-01"))
        .await
        .unwrap();
    assert!(series.len() <= 1);
}

#[tokio::test]
async fn test_archive_missing_daily_block() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "latitude": 51.5 })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .daily_max_temperatures(&london(), date("2024-01-01"), date("2024-01-03"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no daily block"));
}

#[tokio::test]
async fn test_archive_reversed_range_reports_reason() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": true,
            "reason": "Parameter 'start_date' is out of allowed range"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .daily_max_temperatures(&london(), date("2024-01-09"), date("2024-01-01"))
        .await
        .unwrap_err();

    match err {
        ApiError::Status { status, reason, .. } => {
            assert_eq!(status, 400);
            assert!(reason.unwrap().contains("start_date"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}
