//! Integration tests for ForecastOrchestrator using wiremock.
//!
//! Both Open-Meteo endpoints are served by one mock server.

use std::time::Duration;

use classy_weather_core::{
    Config, ForecastOrchestrator, RequestState, orchestrator_from_config, presenter,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SLOW: Duration = Duration::from_millis(400);

fn place(name: &str, lat: f64, lon: f64, tz: &str, cc: &str) -> serde_json::Value {
    serde_json::json!({
        "results": [{
            "name": name,
            "latitude": lat,
            "longitude": lon,
            "timezone": tz,
            "country_code": cc
        }]
    })
}

fn week_forecast() -> serde_json::Value {
    serde_json::json!({
        "latitude": 48.86,
        "longitude": 2.34,
        "daily": {
            "time": [
                "2024-05-06", "2024-05-07", "2024-05-08", "2024-05-09",
                "2024-05-10", "2024-05-11", "2024-05-12"
            ],
            "weathercode": [0, 1, 61, 63, 95, 96, 3],
            "temperature_2m_max": [21.2, 19.0, 17.4, 16.01, 22.5, 23.9, 18.0],
            "temperature_2m_min": [11.7, 10.0, 9.9, 8.2, 12.5, 13.1, -0.4]
        }
    })
}

async fn mount_geocode(server: &MockServer, query: &str, body: serde_json::Value, delay: Duration) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("name", query))
        .respond_with(ResponseTemplate::new(200).set_body_json(body).set_delay(delay))
        .mount(server)
        .await;
}

async fn mount_forecast(server: &MockServer, lat: &str, body: serde_json::Value, delay: Duration) {
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("latitude", lat))
        .respond_with(ResponseTemplate::new(200).set_body_json(body).set_delay(delay))
        .mount(server)
        .await;
}

fn orchestrator(server: &MockServer) -> ForecastOrchestrator {
    orchestrator_from_config(&Config::with_base_url(server.uri())).unwrap()
}

#[tokio::test]
async fn test_paris_week_forecast() {
    let mock_server = MockServer::start().await;
    mount_geocode(
        &mock_server,
        "Paris",
        place("Paris", 48.85, 2.35, "Europe/Paris", "FR"),
        Duration::ZERO,
    )
    .await;
    mount_forecast(&mock_server, "48.85", week_forecast(), Duration::ZERO).await;

    let view = orchestrator(&mock_server).search("Paris").await;

    assert_eq!(view.query, "Paris");
    assert_eq!(view.display_location, "Paris");

    let RequestState::Success(location, days) = &view.state else {
        panic!("expected success, got {:?}", view.state);
    };
    assert_eq!(location.display_name, "Paris");
    assert_eq!(location.timezone, "Europe/Paris");
    assert_eq!(location.country_code, "FR");
    assert_eq!(days.len(), 7);
    assert_eq!(days[0].date, "2024-05-06");
    assert_eq!(days[4].weather_code, Some(95));

    let rows = presenter::visible_rows(&view);
    assert_eq!(rows.len(), 7);
    assert_eq!((rows[0].min, rows[0].max), (11, 22));
    assert_eq!((rows[3].min, rows[3].max), (8, 17));
    assert_eq!((rows[6].min, rows[6].max), (-1, 18));
    assert_eq!(rows[0].weekday, "Mon");
    assert_eq!(rows[5].icon.glyph(), "⛈");
    assert_eq!(presenter::status_message(&view), "Weather details for Paris");
}

#[tokio::test]
async fn test_unknown_place_fails_with_not_found() {
    let mock_server = MockServer::start().await;
    mount_geocode(
        &mock_server,
        "Atlantis",
        serde_json::json!({ "generationtime_ms": 0.3 }),
        Duration::ZERO,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let view = orchestrator(&mock_server).search("Atlantis").await;

    assert_eq!(view.state, RequestState::Failure("Location not found!".into()));
    assert!(view.display_location.is_empty());
    assert_eq!(presenter::status_message(&view), "Location not found!");
}

#[tokio::test]
async fn test_mismatched_daily_arrays_fail_the_request() {
    let mock_server = MockServer::start().await;
    mount_geocode(
        &mock_server,
        "Paris",
        place("Paris", 48.85, 2.35, "Europe/Paris", "FR"),
        Duration::ZERO,
    )
    .await;
    mount_forecast(
        &mock_server,
        "48.85",
        serde_json::json!({
            "daily": {
                "time": ["2024-05-06", "2024-05-07"],
                "weathercode": [0, 1],
                "temperature_2m_max": [21.2, 19.0],
                "temperature_2m_min": [11.7]
            }
        }),
        Duration::ZERO,
    )
    .await;

    let view = orchestrator(&mock_server).search("Paris").await;

    let msg = view.state.error_message().expect("failure expected");
    assert!(msg.contains("mismatched lengths"), "{msg}");
    assert!(presenter::visible_rows(&view).is_empty());
}

#[tokio::test]
async fn test_null_daily_values_still_render() {
    let mock_server = MockServer::start().await;
    mount_geocode(
        &mock_server,
        "Paris",
        place("Paris", 48.85, 2.35, "Europe/Paris", "FR"),
        Duration::ZERO,
    )
    .await;
    mount_forecast(
        &mock_server,
        "48.85",
        serde_json::json!({
            "daily": {
                "time": ["2024-05-06", "2024-05-07"],
                "weathercode": [0, null],
                "temperature_2m_max": [20.2, null],
                "temperature_2m_min": [null, 9.4]
            }
        }),
        Duration::ZERO,
    )
    .await;

    let view = orchestrator(&mock_server).search("Paris").await;

    assert!(matches!(view.state, RequestState::Success(..)), "{:?}", view.state);

    let rows = presenter::visible_rows(&view);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].to_string(), "☀️  Mon  0° - 21°");
    assert_eq!(rows[1].to_string(), "NOT FOUND  Tue  9° - 0°");
}

#[tokio::test]
async fn test_configured_timeout_fails_slow_requests() {
    let mock_server = MockServer::start().await;
    mount_geocode(
        &mock_server,
        "Paris",
        place("Paris", 48.85, 2.35, "Europe/Paris", "FR"),
        Duration::from_secs(2),
    )
    .await;

    let mut config = Config::with_base_url(mock_server.uri());
    config.timeout_secs = Some(1);
    let orch = orchestrator_from_config(&config).unwrap();

    let view = orch.search("Paris").await;

    let msg = view.state.error_message().expect("timed out request must fail");
    assert!(!msg.is_empty());
    assert_ne!(msg, "Location not found!");
    assert!(view.display_location.is_empty());
}

#[tokio::test]
async fn test_forecast_status_error_is_surfaced() {
    let mock_server = MockServer::start().await;
    mount_geocode(
        &mock_server,
        "Paris",
        place("Paris", 48.85, 2.35, "Europe/Paris", "FR"),
        Duration::ZERO,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string("upstream exploded"),
        )
        .mount(&mock_server)
        .await;

    let view = orchestrator(&mock_server).search("Paris").await;

    let msg = view.state.error_message().expect("failure expected");
    assert!(msg.contains("500"), "{msg}");
    assert!(msg.contains("upstream exploded"), "{msg}");
    // Geocoding succeeded, so the name stays committed for this cycle.
    assert_eq!(view.display_location, "Paris");
}

#[tokio::test]
async fn test_slow_stale_success_never_overwrites_newer_query() {
    let mock_server = MockServer::start().await;
    mount_geocode(
        &mock_server,
        "Lon",
        place("Lonavala", 18.75, 73.41, "Asia/Kolkata", "IN"),
        SLOW,
    )
    .await;
    mount_forecast(&mock_server, "18.75", week_forecast(), Duration::ZERO).await;
    mount_geocode(
        &mock_server,
        "London",
        place("London", 51.51, -0.13, "Europe/London", "GB"),
        Duration::ZERO,
    )
    .await;
    mount_forecast(&mock_server, "51.51", week_forecast(), Duration::ZERO).await;

    let orch = orchestrator(&mock_server);
    let stale = orch.submit("Lon").unwrap();
    let fresh = orch.submit("London").unwrap();

    tokio::join!(orch.run(stale), orch.run(fresh));

    let view = orch.view();
    assert_eq!(view.query, "London");
    assert_eq!(view.display_location, "London");
    assert_eq!(view.location().unwrap().country_code, "GB");
}

#[tokio::test]
async fn test_slow_stale_failure_never_overwrites_newer_success() {
    let mock_server = MockServer::start().await;
    mount_geocode(
        &mock_server,
        "Ber",
        serde_json::json!({ "generationtime_ms": 0.2 }),
        SLOW,
    )
    .await;
    mount_geocode(
        &mock_server,
        "Berlin",
        place("Berlin", 52.52, 13.41, "Europe/Berlin", "DE"),
        Duration::ZERO,
    )
    .await;
    mount_forecast(&mock_server, "52.52", week_forecast(), Duration::ZERO).await;

    let orch = orchestrator(&mock_server);
    let stale = orch.submit("Ber").unwrap();
    let fresh = orch.submit("Berlin").unwrap();

    tokio::join!(orch.run(stale), orch.run(fresh));

    let view = orch.view();
    assert!(matches!(view.state, RequestState::Success(..)));
    assert_eq!(view.display_location, "Berlin");
}

#[tokio::test]
async fn test_stale_forecast_after_newer_geocode_is_dropped() {
    let mock_server = MockServer::start().await;
    mount_geocode(
        &mock_server,
        "Rome",
        place("Rome", 41.89, 12.48, "Europe/Rome", "IT"),
        Duration::ZERO,
    )
    .await;
    mount_forecast(&mock_server, "41.89", week_forecast(), SLOW).await;
    mount_geocode(
        &mock_server,
        "Oslo",
        serde_json::json!({ "generationtime_ms": 0.2 }),
        Duration::from_millis(50),
    )
    .await;

    let orch = orchestrator(&mock_server);
    let rome = orch.submit("Rome").unwrap();

    let runner = {
        let orch = orch.clone();
        tokio::spawn(async move { orch.run(rome).await })
    };

    let mut rx = orch.subscribe();
    rx.wait_for(|v| v.display_location == "Rome").await.unwrap();

    let oslo = orch.submit("Oslo").unwrap();
    orch.run(oslo).await;
    runner.await.unwrap();

    let view = orch.view();
    assert_eq!(view.query, "Oslo");
    assert_eq!(view.state, RequestState::Failure("Location not found!".into()));
    assert!(view.display_location.is_empty());
}

#[tokio::test]
async fn test_display_name_commits_before_forecast_arrives() {
    let mock_server = MockServer::start().await;
    mount_geocode(
        &mock_server,
        "Paris",
        place("Paris", 48.85, 2.35, "Europe/Paris", "FR"),
        Duration::ZERO,
    )
    .await;
    mount_forecast(&mock_server, "48.85", week_forecast(), SLOW).await;

    let orch = orchestrator(&mock_server);
    let ticket = orch.submit("Paris").unwrap();

    let runner = {
        let orch = orch.clone();
        tokio::spawn(async move { orch.run(ticket).await })
    };

    let mut rx = orch.subscribe();
    let mid = rx.wait_for(|v| !v.display_location.is_empty()).await.unwrap().clone();
    assert_eq!(mid.display_location, "Paris");
    assert_eq!(mid.state, RequestState::Loading);
    assert!(presenter::visible_rows(&mid).is_empty());

    runner.await.unwrap();
    assert!(matches!(orch.view().state, RequestState::Success(..)));
}

#[tokio::test]
async fn test_clearing_input_mid_flight_returns_to_idle() {
    let mock_server = MockServer::start().await;
    mount_geocode(
        &mock_server,
        "Paris",
        place("Paris", 48.85, 2.35, "Europe/Paris", "FR"),
        SLOW,
    )
    .await;
    mount_forecast(&mock_server, "48.85", week_forecast(), Duration::ZERO).await;

    let orch = orchestrator(&mock_server);
    let ticket = orch.submit("Paris").unwrap();

    let runner = {
        let orch = orch.clone();
        tokio::spawn(async move { orch.run(ticket).await })
    };

    assert!(orch.submit("").is_none());
    runner.await.unwrap();

    let view = orch.view();
    assert_eq!(view.state, RequestState::Idle);
    assert!(view.display_location.is_empty());
    assert_eq!(presenter::status_message(&view), presenter::MSG_PROMPT);
}

#[tokio::test]
async fn test_clearing_after_success_resets_display() {
    let mock_server = MockServer::start().await;
    mount_geocode(
        &mock_server,
        "Paris",
        place("Paris", 48.85, 2.35, "Europe/Paris", "FR"),
        Duration::ZERO,
    )
    .await;
    mount_forecast(&mock_server, "48.85", week_forecast(), Duration::ZERO).await;

    let orch = orchestrator(&mock_server);
    let view = orch.search("Paris").await;
    assert_eq!(view.display_location, "Paris");

    let view = orch.search("").await;
    assert_eq!(view.state, RequestState::Idle);
    assert_eq!(view.display_location, "");
}

#[tokio::test]
async fn test_new_query_clears_previous_display_and_error() {
    let mock_server = MockServer::start().await;
    mount_geocode(
        &mock_server,
        "Paris",
        place("Paris", 48.85, 2.35, "Europe/Paris", "FR"),
        Duration::ZERO,
    )
    .await;
    mount_forecast(&mock_server, "48.85", week_forecast(), Duration::ZERO).await;
    mount_geocode(
        &mock_server,
        "Atlantis",
        serde_json::json!({}),
        Duration::ZERO,
    )
    .await;

    let orch = orchestrator(&mock_server);
    orch.search("Paris").await;

    orch.submit("Pari");
    let view = orch.view();
    assert_eq!(view.state, RequestState::Loading);
    assert!(view.display_location.is_empty());

    let failed = orch.search("Atlantis").await;
    assert!(failed.state.error_message().is_some());

    orch.submit("Paris");
    assert_eq!(orch.view().state.error_message(), None);
}
