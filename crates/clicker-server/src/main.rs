//! Game server binary for the clicker game.
//!
//! Wires the game session, the background autoclick ticker, and the HTTP
//! API together, and persists the game on shutdown.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `clicker-config.yaml` and initialize
//!    structured logging (tracing)
//! 2. Create the game session
//! 3. Restore the previous game from the save file, if any
//! 4. Spawn the autoclick ticker
//! 5. Serve the HTTP API until `Ctrl-C`
//! 6. Stop the ticker and save the game

mod error;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clicker_api::{AppState, ServerConfig};
use clicker_core::{ClickerConfig, GameSession, LoadOutcome, TickerControl};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Default configuration file, overridable with `CLICKER_CONFIG`.
const CONFIG_FILE: &str = "clicker-config.yaml";

/// Application entry point for the game server.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the server cannot bind,
/// or the final save fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration, then initialize structured logging at the
    //    configured level. RUST_LOG wins when set.
    let config = load_config()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("clicker-server starting");

    info!(
        save_path = %config.save.path.display(),
        poll_interval_ms = config.ticker.poll_interval_ms,
        autosave_interval_seconds = config.ticker.autosave_interval_seconds,
        initial_targets = config.game.initial_targets,
        "Configuration loaded"
    );

    // 2. Session.
    let session = Arc::new(GameSession::new(
        config.game.clone(),
        config.save.path.clone(),
    ));

    // 3. Restore the previous game.
    match session.load().await {
        Ok(LoadOutcome::Loaded) => info!("Previous game restored"),
        Ok(LoadOutcome::NoSaveFile) => info!("No save file, starting a new game"),
        Err(e) => warn!(error = %e, "Save file rejected, starting a new game"),
    }

    // 4. Ticker.
    let control = Arc::new(TickerControl::new(Duration::from_millis(
        config.ticker.poll_interval_ms,
    )));
    let autosave = (config.ticker.autosave_interval_seconds > 0)
        .then(|| Duration::from_secs(config.ticker.autosave_interval_seconds));
    let ticker = clicker_core::spawn_ticker(Arc::clone(&session), Arc::clone(&control), autosave);

    // 5. HTTP API.
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let state = Arc::new(AppState::with_ticker(
        Arc::clone(&session),
        Arc::clone(&control),
    ));
    let served = clicker_api::start_server(&server_config, state, clicker_api::shutdown_signal())
        .await
        .map_err(AppError::from);

    // 6. Shutdown: stop the ticker, then save.
    control.request_stop();
    let report = ticker.await.map_err(|e| AppError::Ticker {
        message: format!("{e}"),
    })?;
    info!(
        polls = report.polls,
        ticks_applied = report.ticks_applied,
        points_awarded = report.points_awarded,
        "Ticker finished"
    );

    session.save().await.map_err(AppError::from)?;
    info!(path = %session.save_path().display(), "Game saved, exiting");

    served?;
    Ok(())
}

/// Load configuration from the config file, or defaults if it is absent.
///
/// Environment overrides apply in both cases.
fn load_config() -> Result<ClickerConfig, AppError> {
    let path = std::env::var("CLICKER_CONFIG")
        .map_or_else(|_| PathBuf::from(CONFIG_FILE), PathBuf::from);
    load_config_from(&path)
}

fn load_config_from(path: &Path) -> Result<ClickerConfig, AppError> {
    if path.exists() {
        Ok(ClickerConfig::from_file(path)?)
    } else {
        Ok(ClickerConfig::parse("")?)
    }
}
