// tests/sources_http.rs
//
// Source clients against a real local HTTP server (axum on 127.0.0.1:0).
//
// Covered:
// - survey answers with one field, the other two time out (documented scenario)
// - api-key and format travel as query parameters
// - non-2xx status and malformed bodies fall back to defaults
// - full payloads from the JSON fixtures

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use career_dashboard::config::{DashboardConfig, Resources};
use career_dashboard::reconcile::fallback_view_model;
use career_dashboard::sources::{SourceClient, Sources, SurveyClient};
use career_dashboard::Reconciler;

const KEY: &str = "test-key";

async fn resource(Path(id): Path<String>, Query(q): Query<HashMap<String, String>>) -> Response {
    if q.get("format").map(String::as_str) != Some("json") {
        return (StatusCode::BAD_REQUEST, "format required").into_response();
    }
    if q.get("api-key").map(String::as_str) != Some(KEY) {
        return (StatusCode::FORBIDDEN, Json(json!({"error": "Invalid key"}))).into_response();
    }
    match id.as_str() {
        "engineering-only" => Json(json!({"records": [{"engineering": 80}]})).into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({"records": [{"urban_usage": 99}]})).into_response()
        }
        "broken" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "no-records" => Json(json!({"message": "resource retired"})).into_response(),
        "survey-full" => fixture(include_str!("fixtures/survey.json")),
        "platform-full" => fixture(include_str!("fixtures/platform.json")),
        "schools-full" => fixture(include_str!("fixtures/schools.json")),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

fn fixture(body: &'static str) -> Response {
    ([("content-type", "application/json")], body).into_response()
}

async fn spawn_server() -> String {
    let app = Router::new().route("/resource/{id}", get(resource));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}/resource")
}

fn config(base_url: String, api_key: &str, ids: [&str; 3]) -> DashboardConfig {
    DashboardConfig {
        base_url,
        api_key: api_key.to_string(),
        timeout_ms: 300,
        resources: Resources {
            survey_preferences: ids[0].to_string(),
            platform_usage: ids[1].to_string(),
            school_infrastructure: ids[2].to_string(),
        },
        ..DashboardConfig::default()
    }
}

#[tokio::test]
async fn one_field_plus_two_timeouts() {
    let base = spawn_server().await;
    let cfg = config(base, KEY, ["engineering-only", "slow", "slow"]);
    let r = Reconciler::new(Sources::from_config(&cfg).expect("sources"));

    let t0 = Instant::now();
    let out = r.load().await;
    assert!(
        t0.elapsed() < Duration::from_secs(2),
        "timeouts were not enforced: {:?}",
        t0.elapsed()
    );

    let fb = fallback_view_model();
    let vm = &out.view_model;
    let prefs: Vec<f64> = vm.career_preferences.iter().map(|p| p.value).collect();
    assert_eq!(prefs, vec![80.0, 45.0, 12.0, 8.0, 5.0, 7.0]);
    assert_eq!(vm.platform_usage, fb.platform_usage);
    assert_eq!(vm.education_stats, fb.education_stats);
    assert!(out.warning.is_none(), "field-level failures must not warn");

    let kinds: Vec<_> = out.sources.iter().map(|s| s.ok).collect();
    assert_eq!(kinds, vec![true, false, false]);
    assert!(out.sources[1]
        .error
        .as_deref()
        .unwrap_or_default()
        .contains("timed out"));
}

#[tokio::test]
async fn wrong_key_and_bad_responses_fall_back() {
    let base = spawn_server().await;

    let cfg = config(base.clone(), "wrong", ["engineering-only", "broken", "no-records"]);
    let out = Reconciler::new(Sources::from_config(&cfg).expect("sources"))
        .load()
        .await;
    assert_eq!(out.view_model, fallback_view_model());
    assert!(out.warning.is_none());
    assert!(out.sources.iter().all(|s| !s.ok));
    let survey_err = out.sources[0].error.clone().unwrap_or_default();
    assert!(survey_err.contains("HTTP 403"), "{survey_err}");
    assert!(!survey_err.contains("wrong"), "key leaked: {survey_err}");

    let cfg = config(base, KEY, ["engineering-only", "broken", "no-records"]);
    let out = Reconciler::new(Sources::from_config(&cfg).expect("sources"))
        .load()
        .await;
    assert_eq!(out.view_model.career_preferences[0].value, 80.0);
    assert!(out.sources[1].error.as_deref().unwrap_or_default().contains("HTTP 500"));
    assert!(out.sources[2].error.as_deref().unwrap_or_default().contains("records"));
}

#[tokio::test]
async fn full_fixtures_flow_through() {
    let base = spawn_server().await;
    let cfg = config(base, KEY, ["survey-full", "platform-full", "schools-full"]);
    let out = Reconciler::new(Sources::from_config(&cfg).expect("sources"))
        .load()
        .await;
    let vm = out.view_model;

    let prefs: Vec<f64> = vm.career_preferences.iter().map(|p| p.value).collect();
    assert_eq!(prefs, vec![62.0, 48.0, 15.0, 11.0, 6.0, 9.0]);
    assert_eq!(vm.platform_usage.urban, 70.0);
    assert_eq!(vm.platform_usage.total_users, 1_410_000);
    assert_eq!(vm.education_stats.total_schools, 1_480_000);
    assert_eq!(vm.education_stats.career_counseling_availability, 38.0);
    // Fixed constants are not fetched
    assert_eq!(vm.awareness_stats.traditional, 78.0);
    assert_eq!(vm.feedback_loops[0].strength, 0.75);
}

#[tokio::test]
async fn standalone_client_fetches_live_endpoint() {
    let base = spawn_server().await;
    let cfg = config(base, KEY, ["engineering-only", "slow", "slow"]);
    let client =
        SurveyClient::from_endpoint(cfg.endpoint(&cfg.resources.survey_preferences), cfg.timeout())
            .expect("client");
    assert_eq!(client.name(), "survey-preferences");
    assert!(client.fetch().await.is_success());
}
