//! Game-state engine for the clicker game.
//!
//! This crate owns every rule of the economy and nothing about how it is
//! presented. It provides:
//!
//! - [`target`] -- Clickable producers and the yield formula
//! - [`upgrade`] -- The fixed upgrade catalog, pricing, and levels
//! - [`engine`] -- [`GameEngine`], the aggregate root (click, select,
//!   purchase, autoclick tick, views)
//! - [`save`] -- The versioned JSON save document and its validation
//! - [`session`] -- [`GameSession`], one engine behind one async lock
//! - [`ticker`] -- The background autoclick stepper
//! - [`config`] -- YAML configuration
//!
//! # Example
//!
//! ```
//! use std::time::Instant;
//!
//! use clicker_core::{GameEngine, RulesConfig};
//! use clicker_types::TargetId;
//!
//! let mut engine = GameEngine::new(RulesConfig::default(), Instant::now());
//! for _ in 0..10 {
//!     engine.register_click(TargetId::FIRST);
//! }
//! assert!(engine.purchase_upgrade("ClickPower", Some(TargetId::FIRST)));
//! assert_eq!(engine.points(), 0);
//! ```

pub mod config;
pub mod engine;
pub mod save;
pub mod session;
pub mod target;
pub mod ticker;
pub mod upgrade;

pub use config::{ClickerConfig, ConfigError, RulesConfig};
pub use engine::GameEngine;
pub use save::{EngineSnapshot, LoadError, SAVE_VERSION, decode, encode};
pub use session::{GameSession, LoadOutcome, SaveError};
pub use target::Target;
pub use ticker::{TickerControl, TickerReport, run_ticker, spawn_ticker};
pub use upgrade::{CATALOG, Upgrade, UpgradeSpec};
