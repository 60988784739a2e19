//! Error types for the game server binary.
//!
//! [`AppError`] is the top-level error type that wraps all possible
//! failure modes during server startup and shutdown.

/// Top-level error for the game server binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: clicker_core::ConfigError,
    },

    /// Saving the game failed.
    #[error("save error: {source}")]
    Save {
        /// The underlying save error.
        #[from]
        source: clicker_core::SaveError,
    },

    /// The HTTP server failed to start or crashed.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: clicker_api::ServerError,
    },

    /// The ticker task panicked or was cancelled.
    #[error("ticker error: {message}")]
    Ticker {
        /// Description of the ticker failure.
        message: String,
    },
}
