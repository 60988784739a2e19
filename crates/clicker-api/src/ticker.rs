//! Ticker control handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/ticker/pause` | Suspend autoclick ticks |
//! | `POST` | `/api/ticker/resume` | Resume autoclick ticks |
//! | `GET` | `/api/ticker/status` | Ticker and delay status |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use clicker_core::TickerControl;
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Generic success response.
#[derive(Debug, Serialize)]
struct TickerResponse {
    success: bool,
    message: String,
}

/// Response of `GET /api/ticker/status`.
#[derive(Debug, Serialize)]
struct TickerStatus {
    paused: bool,
    stop_requested: bool,
    poll_interval_ms: u64,
    auto_tick_delay_seconds: f64,
}

fn control(state: &AppState) -> Result<&Arc<TickerControl>, ApiError> {
    state
        .ticker
        .as_ref()
        .ok_or_else(|| ApiError::Internal("ticker not running".to_owned()))
}

/// Suspend autoclick ticks. Clicks and purchases keep working.
pub async fn pause(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    control(&state)?.pause();
    Ok(Json(TickerResponse {
        success: true,
        message: "Ticker paused".to_owned(),
    }))
}

/// Resume autoclick ticks.
pub async fn resume(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    control(&state)?.resume();
    Ok(Json(TickerResponse {
        success: true,
        message: "Ticker resumed".to_owned(),
    }))
}

/// Report whether the ticker is paused and the current autoclick delay.
pub async fn status(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let ticker = control(&state)?;
    let game = state.session.state().await;
    Ok(Json(TickerStatus {
        paused: ticker.is_paused(),
        stop_requested: ticker.is_stop_requested(),
        poll_interval_ms: u64::try_from(ticker.poll_interval().as_millis()).unwrap_or(u64::MAX),
        auto_tick_delay_seconds: game.auto_tick_delay_seconds,
    }))
}
