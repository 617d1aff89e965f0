//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use solar_payback::api::{AppState, router};
use solar_payback::config::ScenarioConfig;

fn build_api_state(defaults: ScenarioConfig) -> Arc<AppState> {
    Arc::new(AppState {
        table: common::builtin_table(),
        defaults: defaults.project,
    })
}

async fn get_json(state: Arc<AppState>, uri: &str) -> (StatusCode, serde_json::Value) {
    let app = router(state);
    let req = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    let resp = app.oneshot(req).await.expect("router should respond");
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should collect");
    let json = serde_json::from_slice(&body).expect("body should be JSON");
    (status, json)
}

#[tokio::test]
async fn locations_expose_derived_metrics() {
    let (status, json) = get_json(build_api_state(ScenarioConfig::default()), "/locations").await;
    assert_eq!(status, StatusCode::OK);

    let quito = json["locations"]
        .as_array()
        .and_then(|locs| locs.iter().find(|l| l["location"] == "Quito"))
        .expect("Quito should be listed");
    let pr = quito["performance_ratio"].as_f64().expect("numeric PR");
    assert!((pr - 0.82).abs() < 1e-12);
    assert_eq!(quito["monthly_insolation"].as_array().map(Vec::len), Some(12));
}

#[tokio::test]
async fn projection_matches_library_result() {
    let state = build_api_state(ScenarioConfig::default());
    let (status, json) = get_json(state, "/projection?location=Quito").await;
    assert_eq!(status, StatusCode::OK);

    let expected = common::run("Quito", &common::default_params());
    let capacity = json["summary"]["capacity_kwp"].as_f64().expect("capacity");
    assert!((capacity - expected.capacity_kwp()).abs() < 1e-9);
    assert_eq!(json["summary"]["payback"]["year"], 9);
}

#[tokio::test]
async fn server_defaults_come_from_scenario() {
    let state = build_api_state(ScenarioConfig::guayaquil_amortized());
    let (status, json) = get_json(state, "/projection?location=Guayaquil").await;
    assert_eq!(status, StatusCode::OK);

    let first = &json["result"]["years"][0];
    assert!(first["rebate"].as_f64().expect("rebate") > 0.0);
    assert_eq!(json["summary"]["payback"]["year"], 5);
}

#[tokio::test]
async fn missing_location_query_is_rejected() {
    let app = router(build_api_state(ScenarioConfig::default()));
    let req = Request::builder()
        .uri("/projection")
        .body(Body::empty())
        .expect("request should build");
    let resp = app.oneshot(req).await.expect("router should respond");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn zero_consumption_returns_error_body() {
    let state = build_api_state(ScenarioConfig::default());
    let (status, json) =
        get_json(state, "/projection?location=Quito&monthly_consumption_kwh=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let msg = json["error"].as_str().expect("error string");
    assert!(msg.contains("monthly_consumption_kwh"), "{msg}");
}
