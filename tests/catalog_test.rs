use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use oan_seeker::config::EndpointConfig;
use oan_seeker::modules::location::model::{find_district, find_state, LocationId};
use oan_seeker::modules::weather::forecast::{daily_forecasts, ForecastWindow};
use oan_seeker::services::beckn::BecknError;
use oan_seeker::services::location::LocationError;
use oan_seeker::AppState;
use serde_json::{json, Value};

type Captured = Arc<Mutex<Vec<Value>>>;

fn weather_catalog() -> Value {
    json!({
        "responses": [{
            "message": { "catalog": { "providers": [{
                "descriptor": { "name": "IMD" },
                "items": [
                    { "descriptor": { "name": "Forecast for 2024-06-02 06:00:00" } },
                    {
                        "descriptor": { "name": "Pune", "short_desc": "Haze" },
                        "tags": [{
                            "descriptor": { "code": "2024-06-01" },
                            "list": [{ "descriptor": { "code": "Temperature" }, "value": "33" }]
                        }]
                    },
                    { "descriptor": { "name": "Forecast for 2024-06-01 15:00:00" } },
                    { "descriptor": { "name": "Forecast for 2024-06-02 12:00:00", "short_desc": "Light rain" } },
                    { "descriptor": { "name": "Forecast for 2024-06-03 09:00:00" } }
                ]
            }]}}
        }]
    })
}

fn scheme_catalog() -> Value {
    json!({
        "responses": [{
            "message": { "catalog": { "providers": [{
                "items": [
                    {
                        "id": "pmfby",
                        "descriptor": { "name": "PM Fasal Bima Yojana", "short_desc": "Crop insurance" },
                        "tags": [{
                            "descriptor": { "name": "Insurance" },
                            "list": [{ "value": "Apply via bank" }]
                        }]
                    },
                    { "id": "untitled" }
                ]
            }]}}
        }]
    })
}

async fn weather_handler(State(captured): State<Captured>, Json(body): Json<Value>) -> Json<Value> {
    captured.lock().unwrap().push(body);
    Json(weather_catalog())
}

async fn search_handler(State(captured): State<Captured>, Json(body): Json<Value>) -> Json<Value> {
    captured.lock().unwrap().push(body);
    Json(scheme_catalog())
}

async fn failing_handler() -> (StatusCode, &'static str) {
    (StatusCode::BAD_GATEWAY, "gateway down")
}

async fn setup(app: Router) -> AppState {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    AppState::new(EndpointConfig::for_base_url(&format!("http://{}", addr)))
}

async fn setup_catalogs() -> (AppState, Captured) {
    let captured = Captured::default();
    let app = Router::new()
        .route("/api/weather/", post(weather_handler))
        .route("/api/search/", post(search_handler))
        .with_state(captured.clone());

    (setup(app).await, captured)
}

#[tokio::test]
async fn test_weather_current_first_then_forecasts() {
    let (state, captured) = setup_catalogs().await;
    let weather = state.weather.expect("weather endpoint configured");

    let items = weather.fetch("Pune").await.unwrap();

    let names: Vec<&str> = items.iter().map(|i| i.name()).collect();
    assert_eq!(
        names,
        vec![
            "Pune",
            "Forecast for 2024-06-02 06:00:00",
            "Forecast for 2024-06-01 15:00:00",
            "Forecast for 2024-06-02 12:00:00",
            "Forecast for 2024-06-03 09:00:00",
        ]
    );
    assert_eq!(items[0].temperature(), Some(33.0));

    let requests = captured.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["context"]["domain"], "weather");
    assert_eq!(requests[0]["context"]["action"], "search");
    assert_eq!(
        requests[0]["message"]["intent"]["item"]["descriptor"]["name"],
        "Pune"
    );
}

#[tokio::test]
async fn test_weather_feeds_daily_forecasts() {
    let (state, _captured) = setup_catalogs().await;
    let items = state.weather.unwrap().fetch("Pune").await.unwrap();

    let days = daily_forecasts(&items, ForecastWindow::Next5Days);

    assert_eq!(days.len(), 2);
    assert_eq!(days[0].date, "2024-06-02");
    assert_eq!(days[0].forecast.name(), "Forecast for 2024-06-02 12:00:00");
    assert_eq!(days[0].forecast.short_desc(), Some("Light rain"));
    assert_eq!(days[1].date, "2024-06-03");
}

#[tokio::test]
async fn test_weather_without_district_skips_request() {
    let (state, captured) = setup_catalogs().await;

    let items = state.weather.unwrap().fetch("  ").await.unwrap();

    assert!(items.is_empty());
    assert!(captured.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_schemes_are_mapped() {
    let (state, captured) = setup_catalogs().await;

    let schemes = state.schemes.unwrap().fetch().await.unwrap();

    assert_eq!(schemes.len(), 2);
    assert_eq!(schemes[0].title, "PM Fasal Bima Yojana");
    assert_eq!(schemes[0].provider_name, "Government");
    assert_eq!(schemes[0].categories, vec!["Insurance"]);
    assert_eq!(schemes[0].fulfillments, vec!["Apply via bank"]);
    assert_eq!(schemes[1].title, "Untitled Scheme");

    let requests = captured.lock().unwrap();
    assert_eq!(requests[0]["context"]["domain"], "schemes");
    assert_eq!(requests[0]["message"]["intent"], json!({}));
}

#[tokio::test]
async fn test_catalog_error_status() {
    let app = Router::new()
        .route("/api/weather/", post(failing_handler))
        .route("/api/search/", post(failing_handler));
    let state = setup(app).await;

    let err = state.schemes.unwrap().fetch().await.unwrap_err();
    assert!(matches!(
        err,
        BecknError::ApiError { status: 502, ref body } if body == "gateway down"
    ));

    let err = state.weather.unwrap().fetch("Pune").await.unwrap_err();
    assert!(matches!(err, BecknError::ApiError { status: 502, .. }));
}

type Queries = Arc<Mutex<Vec<HashMap<String, String>>>>;

async fn states_handler(
    State(queries): State<Queries>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    queries.lock().unwrap().push(params);
    Json(json!({
        "states": [
            { "state_id": 27, "state_name": "Maharashtra" },
            { "state_id": 29, "state_name": "Karnataka" }
        ]
    }))
}

async fn districts_handler(Path(state_id): Path<String>) -> (StatusCode, Json<Value>) {
    match state_id.as_str() {
        "27" => (
            StatusCode::OK,
            Json(json!({
                "districts": [
                    { "district_id": 521, "district_name": "Pune" },
                    { "district_name": "Nashik" }
                ]
            })),
        ),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "detail": "no such state" }))),
    }
}

async fn setup_locations() -> (AppState, Queries) {
    let queries = Queries::default();
    let app = Router::new()
        .route("/api/states/", get(states_handler))
        .route("/api/districts/{state_id}", get(districts_handler))
        .with_state(queries.clone());

    (setup(app).await, queries)
}

#[tokio::test]
async fn test_states_then_districts() {
    let (state, queries) = setup_locations().await;
    let locations = state.locations.expect("location endpoints configured");

    let states = locations.states("mr", "Pune").await.unwrap();
    assert_eq!(states.len(), 2);

    let maharashtra = find_state(&states, "maharashtra").unwrap();
    assert_eq!(maharashtra.state_id, LocationId::Number(27));

    let districts = locations
        .districts(&maharashtra.state_id, "mr", "")
        .await
        .unwrap();
    assert_eq!(
        find_district(&districts, "PUNE").and_then(|d| d.district_id.clone()),
        Some(LocationId::Number(521))
    );
    assert!(find_district(&districts, "Mumbai").is_none());

    let queries = queries.lock().unwrap();
    assert_eq!(queries[0]["lang"], "mr");
    assert_eq!(queries[0]["loc"], "Pune");
}

#[tokio::test]
async fn test_unknown_state_districts_error() {
    let (state, _queries) = setup_locations().await;
    let locations = state.locations.unwrap();

    let err = locations
        .districts(&LocationId::Number(99), "en", "")
        .await
        .unwrap_err();

    assert!(matches!(err, LocationError::ApiError { status: 404, .. }));
}
