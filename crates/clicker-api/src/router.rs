//! Axum router construction for the game API.
//!
//! Assembles all routes into a single [`Router`] with CORS middleware
//! enabled so a browser frontend on another origin can call it.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ticker;

/// Build the complete Axum router for the game server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /api/game`, `GET /api/points` -- state reads
/// - `GET /api/upgrades/{id}` -- catalog priced for a target
/// - `POST /api/click/{id}`, `POST /api/select/{id}`,
///   `POST /api/upgrades/purchase` -- game commands
/// - `POST /api/save`, `POST /api/load` -- persistence
/// - `/api/ticker/*` -- ticker pause, resume, and status
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // Reads
        .route("/api/game", get(handlers::get_game))
        .route("/api/points", get(handlers::get_points))
        .route("/api/upgrades/{id}", get(handlers::get_upgrades))
        // Commands
        .route("/api/click/{id}", post(handlers::click))
        .route("/api/select/{id}", post(handlers::select))
        .route("/api/upgrades/purchase", post(handlers::purchase))
        // Persistence
        .route("/api/save", post(handlers::save))
        .route("/api/load", post(handlers::load))
        // Ticker control
        .route("/api/ticker/pause", post(ticker::pause))
        .route("/api/ticker/resume", post(ticker::resume))
        .route("/api/ticker/status", get(ticker::status))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
