//! Shared application state for the game API.
//!
//! [`AppState`] holds the game session every handler operates on, and
//! optionally the control handle of the background ticker.

use std::sync::Arc;

use clicker_core::{GameSession, TickerControl};

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The game every command runs against.
    pub session: Arc<GameSession>,
    /// Control handle of the running ticker, if one was started.
    pub ticker: Option<Arc<TickerControl>>,
}

impl AppState {
    /// Create application state without a ticker.
    pub const fn new(session: Arc<GameSession>) -> Self {
        Self {
            session,
            ticker: None,
        }
    }

    /// Create application state with ticker control attached.
    pub const fn with_ticker(session: Arc<GameSession>, ticker: Arc<TickerControl>) -> Self {
        Self {
            session,
            ticker: Some(ticker),
        }
    }
}
