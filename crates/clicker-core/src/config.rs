//! Configuration loading and typed config structures for the clicker game.
//!
//! The configuration lives in `clicker-config.yaml` next to the binary's
//! working directory. Every field has a default, so an empty or missing
//! file yields a playable game.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value is outside its allowed range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `clicker-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClickerConfig {
    /// Economy rules (tick delay, floor, starting targets).
    #[serde(default)]
    pub game: RulesConfig,

    /// Background stepper settings.
    #[serde(default)]
    pub ticker: TickerConfig,

    /// Save file settings.
    #[serde(default)]
    pub save: SaveConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClickerConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override file values:
    /// - `CLICKER_SAVE_PATH` overrides `save.path`
    /// - `CLICKER_PORT` overrides `server.port` (ignored if not a port number)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty map.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Override selected values with environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("CLICKER_SAVE_PATH") {
            self.save.path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("CLICKER_PORT") {
            if let Ok(port) = val.parse::<u16>() {
                self.server.port = port;
            }
        }
    }

    /// Check every section for out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.game.validate()?;
        if self.ticker.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "ticker.poll_interval_ms must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

/// Economy rules that shape the engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RulesConfig {
    /// Autoclick delay of a fresh game, in seconds.
    #[serde(default = "default_initial_auto_tick_delay_seconds")]
    pub initial_auto_tick_delay_seconds: f64,

    /// Lowest delay the Auto Speed upgrade can reach, in seconds.
    #[serde(default = "default_min_auto_tick_delay_seconds")]
    pub min_auto_tick_delay_seconds: f64,

    /// Delay removed by each Auto Speed level, in seconds.
    #[serde(default = "default_auto_speed_step_seconds")]
    pub auto_speed_step_seconds: f64,

    /// Number of targets a fresh game starts with.
    #[serde(default = "default_initial_targets")]
    pub initial_targets: u32,
}

impl RulesConfig {
    /// Check the rules for out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let floor = self.min_auto_tick_delay_seconds;
        if !floor.is_finite() || floor <= 0.0 {
            return Err(invalid("game.min_auto_tick_delay_seconds must be positive"));
        }
        let initial = self.initial_auto_tick_delay_seconds;
        if !initial.is_finite() || initial < floor {
            return Err(invalid(
                "game.initial_auto_tick_delay_seconds must be finite and at least the floor",
            ));
        }
        let step = self.auto_speed_step_seconds;
        if !step.is_finite() || step < 0.0 {
            return Err(invalid("game.auto_speed_step_seconds must not be negative"));
        }
        if self.initial_targets == 0 {
            return Err(invalid("game.initial_targets must be at least 1"));
        }
        Ok(())
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            initial_auto_tick_delay_seconds: default_initial_auto_tick_delay_seconds(),
            min_auto_tick_delay_seconds: default_min_auto_tick_delay_seconds(),
            auto_speed_step_seconds: default_auto_speed_step_seconds(),
            initial_targets: default_initial_targets(),
        }
    }
}

/// Background stepper configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TickerConfig {
    /// How often the stepper checks whether an autoclick tick is due.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Seconds between automatic saves (0 = disabled).
    #[serde(default)]
    pub autosave_interval_seconds: u64,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            autosave_interval_seconds: 0,
        }
    }
}

/// Save file configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SaveConfig {
    /// Path of the JSON snapshot file.
    #[serde(default = "default_save_path")]
    pub path: PathBuf,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            path: default_save_path(),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// Address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.to_owned(),
    }
}

const fn default_initial_auto_tick_delay_seconds() -> f64 {
    3.0
}

const fn default_min_auto_tick_delay_seconds() -> f64 {
    0.3
}

const fn default_auto_speed_step_seconds() -> f64 {
    0.2
}

const fn default_initial_targets() -> u32 {
    1
}

const fn default_poll_interval_ms() -> u64 {
    100
}

fn default_save_path() -> PathBuf {
    PathBuf::from("save.json")
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_owned()
}
