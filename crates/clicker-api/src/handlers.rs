//! REST API endpoint handlers for the game.
//!
//! Every handler runs exactly one session command, so each request sees
//! and leaves a consistent game.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/game` | Full game state |
//! | `GET` | `/api/points` | Balance and click count |
//! | `POST` | `/api/click/{id}` | Click a target |
//! | `POST` | `/api/select/{id}` | Select a target |
//! | `GET` | `/api/upgrades/{id}` | Catalog priced for a target |
//! | `POST` | `/api/upgrades/purchase` | Buy an upgrade level |
//! | `POST` | `/api/save` | Write the save file |
//! | `POST` | `/api/load` | Replace the game from the save file |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse};
use clicker_core::LoadOutcome;
use clicker_types::{GameStateView, TargetId, UpgradeView};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/upgrades/purchase`.
#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    /// Upgrade tag, e.g. `"ClickPower"`.
    pub kind: String,
    /// Target for per-target upgrades. Ignored by global upgrades.
    pub target_id: Option<TargetId>,
}

/// Response of `POST /api/click/{id}`.
#[derive(Debug, Serialize)]
struct ClickResponse {
    success: bool,
    awarded: u64,
    points_total: u64,
}

/// Response of `POST /api/select/{id}`.
#[derive(Debug, Serialize)]
struct SelectResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    upgrades: Option<Vec<UpgradeView>>,
}

/// Response of `POST /api/upgrades/purchase`.
#[derive(Debug, Serialize)]
struct PurchaseResponse {
    success: bool,
    game_state: GameStateView,
}

/// Response of `POST /api/load`.
#[derive(Debug, Serialize)]
struct LoadResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    game_state: Option<GameStateView>,
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing the game and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let game = state.session.state().await;
    let points = game.points;
    let total_clicks = game.total_clicks;
    let target_count = game.targets.len();
    let delay = game.auto_tick_delay_seconds;
    let selected = game.selected_target;

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Clicker</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #4CAF50; margin-bottom: 0.25rem; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #4CAF50; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        .method {{ color: #7ee787; font-weight: bold; }}
    </style>
</head>
<body>
    <h1>Clicker</h1>

    <div>
        <div class="metric">
            <div class="label">Points</div>
            <div class="value">{points}</div>
        </div>
        <div class="metric">
            <div class="label">Clicks</div>
            <div class="value">{total_clicks}</div>
        </div>
        <div class="metric">
            <div class="label">Targets</div>
            <div class="value">{target_count}</div>
        </div>
        <div class="metric">
            <div class="label">Selected</div>
            <div class="value">{selected}</div>
        </div>
        <div class="metric">
            <div class="label">Auto delay (s)</div>
            <div class="value">{delay:.1}</div>
        </div>
    </div>

    <h2>API</h2>
    <ul>
        <li><span class="method">GET</span> <a href="/api/game">/api/game</a></li>
        <li><span class="method">GET</span> <a href="/api/points">/api/points</a></li>
        <li><span class="method">GET</span> <a href="/api/upgrades/{selected}">/api/upgrades/{{id}}</a></li>
        <li><span class="method">POST</span> /api/click/{{id}}</li>
        <li><span class="method">POST</span> /api/select/{{id}}</li>
        <li><span class="method">POST</span> /api/upgrades/purchase</li>
        <li><span class="method">POST</span> /api/save</li>
        <li><span class="method">POST</span> /api/load</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Return the full game state.
pub async fn get_game(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.session.state().await)
}

/// Return the balance and click count.
pub async fn get_points(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.session.points().await)
}

/// Return the catalog priced for one target.
pub async fn get_upgrades(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TargetId>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .session
        .upgrades_for(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("target {id}")))
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Click a target. Unknown targets award nothing.
pub async fn click(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TargetId>,
) -> impl IntoResponse {
    let outcome = state.session.click(id).await;
    Json(ClickResponse {
        success: true,
        awarded: outcome.awarded,
        points_total: outcome.points_total,
    })
}

/// Select a target and return the catalog priced for it.
pub async fn select(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TargetId>,
) -> impl IntoResponse {
    let upgrades = state.session.select_target(id).await;
    Json(SelectResponse {
        success: upgrades.is_some(),
        upgrades,
    })
}

/// Buy one level of an upgrade and return the resulting state.
pub async fn purchase(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PurchaseRequest>,
) -> impl IntoResponse {
    let (success, game_state) = state
        .session
        .purchase_with_state(&body.kind, body.target_id)
        .await;
    Json(PurchaseResponse {
        success,
        game_state,
    })
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// Write the save file.
pub async fn save(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    state.session.save().await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Replace the game with the save file contents.
///
/// A missing save file answers `success: false`; a rejected one is a 422.
pub async fn load(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let (outcome, game_state) = state.session.load_with_state().await?;
    Ok(Json(LoadResponse {
        success: outcome == LoadOutcome::Loaded,
        game_state,
    }))
}
