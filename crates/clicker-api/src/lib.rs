//! HTTP API for the clicker game.
//!
//! This crate is a thin presentation adapter over
//! [`clicker_core::GameSession`]. It exposes:
//!
//! - **REST endpoints** for reading the game and issuing commands (click,
//!   select, purchase, save, load)
//! - **Ticker control endpoints** (pause, resume, status)
//! - **Minimal HTML page** (`GET /`) showing the balance and API links
//!
//! All game rules live in `clicker-core`; handlers only translate HTTP
//! to session calls and views to JSON.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod ticker;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, shutdown_signal, start_server};
pub use state::AppState;
