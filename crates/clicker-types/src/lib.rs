//! Shared type definitions for the clicker game.
//!
//! This crate is the single source of truth for the identifiers and views
//! exchanged between the game engine and its presentation layers. Types
//! defined here flow downstream to `TypeScript` via `ts-rs` for the web
//! frontend.
//!
//! # Modules
//!
//! - [`ids`] -- [`TargetId`] and the reserved global level key
//! - [`enums`] -- [`UpgradeKind`], the closed set of upgrade variants
//! - [`views`] -- Owned state views for rendering and the HTTP API

pub mod enums;
pub mod ids;
pub mod views;

// Re-export all public types at crate root for convenience.
pub use enums::UpgradeKind;
pub use ids::TargetId;
pub use views::{ClickOutcome, GameStateView, PointsView, TargetView, UpgradeView};
