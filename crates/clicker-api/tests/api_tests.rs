//! Integration tests for the game API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic and routing
//! without needing a live network connection.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use clicker_api::build_router;
use clicker_api::state::AppState;
use clicker_core::{GameSession, RulesConfig, TickerControl};
use serde_json::Value;
use tower::ServiceExt;

fn scratch_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("clicker-api-{}-{name}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("save.json");
    let _ = std::fs::remove_file(&path);
    path
}

fn make_test_state(name: &str) -> Arc<AppState> {
    let session = GameSession::new(RulesConfig::default(), scratch_path(name));
    Arc::new(AppState::new(Arc::new(session)))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(state: &Arc<AppState>, uri: &str) -> Response {
    build_router(Arc::clone(state))
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post(state: &Arc<AppState>, uri: &str) -> Response {
    build_router(Arc::clone(state))
        .oneshot(Request::post(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_json(state: &Arc<AppState>, uri: &str, body: &Value) -> Response {
    build_router(Arc::clone(state))
        .oneshot(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_index_returns_html() {
    let state = make_test_state("index");
    let response = get(&state, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.contains("text/html"));
}

#[tokio::test]
async fn test_get_game() {
    let state = make_test_state("game");
    let response = get(&state, "/api/game").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["points"], 0);
    assert_eq!(json["selected_target"], 1);
    assert_eq!(json["next_target_id"], 2);
    assert_eq!(json["targets"]["1"]["base_yield_per_click"], 1);
    assert_eq!(json["targets"]["1"]["color"], "#4CAF50");
    assert_eq!(json["upgrades"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_get_points() {
    let state = make_test_state("points");
    post(&state, "/api/click/1").await;
    let response = get(&state, "/api/points").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["points"], 1);
    assert_eq!(json["total_clicks"], 1);
}

#[tokio::test]
async fn test_get_upgrades_for_target() {
    let state = make_test_state("upgrades");
    let response = get(&state, "/api/upgrades/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json[0]["kind"], "ClickPower");
    assert_eq!(json[0]["price"], 10);
}

#[tokio::test]
async fn test_get_upgrades_unknown_target() {
    let state = make_test_state("upgrades-missing");
    let response = get(&state, "/api/upgrades/42").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], 404);
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_click() {
    let state = make_test_state("click");
    let response = post(&state, "/api/click/1").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["awarded"], 1);
    assert_eq!(json["points_total"], 1);
}

#[tokio::test]
async fn test_click_unknown_target_awards_nothing() {
    let state = make_test_state("click-missing");
    let response = post(&state, "/api/click/99").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["awarded"], 0);
    assert_eq!(json["points_total"], 0);
}

#[tokio::test]
async fn test_click_non_numeric_id_is_rejected() {
    let state = make_test_state("click-bad");
    let response = post(&state, "/api/click/abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_select() {
    let state = make_test_state("select");

    let response = post(&state, "/api/select/1").await;
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["upgrades"].as_array().unwrap().len(), 5);

    let response = post(&state, "/api/select/7").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["success"], false);
    assert!(json.get("upgrades").is_none());
}

#[tokio::test]
async fn test_purchase_scenario() {
    let state = make_test_state("purchase");
    for _ in 0..3 {
        post(&state, "/api/click/1").await;
    }
    let body = serde_json::json!({ "kind": "ClickPower", "target_id": 1 });

    let response = post_json(&state, "/api/upgrades/purchase", &body).await;
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["game_state"]["points"], 3);

    for _ in 0..7 {
        post(&state, "/api/click/1").await;
    }
    let response = post_json(&state, "/api/upgrades/purchase", &body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["game_state"]["points"], 0);
    assert_eq!(json["game_state"]["targets"]["1"]["base_yield_per_click"], 2);
    assert_eq!(json["game_state"]["upgrades"][0]["level"], 1);
}

#[tokio::test]
async fn test_purchase_unknown_kind() {
    let state = make_test_state("purchase-unknown");
    let body = serde_json::json!({ "kind": "MegaBonus", "target_id": 1 });
    let response = post_json(&state, "/api/upgrades/purchase", &body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["success"], false);
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_load_without_save_file() {
    let state = make_test_state("load-missing");
    let response = post(&state, "/api/load").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_save_then_load() {
    let state = make_test_state("save-load");
    for _ in 0..5 {
        post(&state, "/api/click/1").await;
    }
    let response = post(&state, "/api/save").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["success"], true);

    post(&state, "/api/click/1").await;

    let response = post(&state, "/api/load").await;
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["game_state"]["points"], 5);

    let current = body_to_json(get(&state, "/api/game").await.into_body()).await;
    assert_eq!(json["game_state"], current);
}

#[tokio::test]
async fn test_load_corrupt_save_is_unprocessable() {
    let state = make_test_state("load-corrupt");
    std::fs::write(state.session.save_path(), "{\"points\": \"lots\"}").unwrap();
    post(&state, "/api/click/1").await;

    let response = post(&state, "/api/load").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["success"], false);

    // The game is untouched.
    let json = body_to_json(get(&state, "/api/points").await.into_body()).await;
    assert_eq!(json["points"], 1);
}

#[tokio::test]
async fn test_save_io_failure_is_internal_error() {
    let path = std::env::temp_dir()
        .join(format!("clicker-api-absent-{}", std::process::id()))
        .join("nested")
        .join("save.json");
    let session = GameSession::new(RulesConfig::default(), path);
    let state = Arc::new(AppState::new(Arc::new(session)));

    let response = post(&state, "/api/save").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ---------------------------------------------------------------------------
// Ticker control
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_ticker_routes_without_ticker() {
    let state = make_test_state("ticker-none");
    let response = post(&state, "/api/ticker/pause").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_ticker_pause_and_resume() {
    let session = Arc::new(GameSession::new(
        RulesConfig::default(),
        scratch_path("ticker"),
    ));
    let control = Arc::new(TickerControl::new(Duration::from_millis(100)));
    let state = Arc::new(AppState::with_ticker(session, Arc::clone(&control)));

    let response = post(&state, "/api/ticker/pause").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(control.is_paused());

    let json = body_to_json(get(&state, "/api/ticker/status").await.into_body()).await;
    assert_eq!(json["paused"], true);
    assert_eq!(json["poll_interval_ms"], 100);
    assert_eq!(json["auto_tick_delay_seconds"], 3.0);

    let response = post(&state, "/api/ticker/resume").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!control.is_paused());
}
