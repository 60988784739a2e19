//! Read-only views of the game state served to presentation layers.
//!
//! Views are owned copies: producing one never aliases live engine state,
//! so a view can be serialized or rendered after the engine lock is
//! released.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::UpgradeKind;
use crate::ids::TargetId;

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

/// One target as seen by the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TargetView {
    /// Target identifier.
    pub id: TargetId,
    /// Points awarded per manual click.
    pub base_yield_per_click: u64,
    /// Implicit clicks applied on every autoclick tick.
    pub auto_clicks_per_tick: u64,
    /// Manual clicks received.
    pub total_clicks: u64,
    /// Points produced by this target, manual and automatic.
    pub total_points_earned: u64,
    /// Index into the display palette.
    pub color_index: u32,
    /// Hex color of the palette entry.
    pub color: String,
}

// ---------------------------------------------------------------------------
// Upgrades
// ---------------------------------------------------------------------------

/// One catalog entry priced for a selection context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct UpgradeView {
    /// Variant tag used to purchase it.
    pub kind: UpgradeKind,
    /// Display name.
    pub name: String,
    /// Display description.
    pub description: String,
    /// Price of the next level in this context.
    pub price: u64,
    /// Current level in this context.
    pub level: u32,
    /// Whether the upgrade is bought per target.
    pub per_target: bool,
}

// ---------------------------------------------------------------------------
// Whole game
// ---------------------------------------------------------------------------

/// Full point-in-time view of the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameStateView {
    /// Spendable balance.
    pub points: u64,
    /// Manual clicks across all targets.
    pub total_clicks: u64,
    /// Seconds between autoclick ticks.
    pub auto_tick_delay_seconds: f64,
    /// Target whose per-target upgrades are priced in `upgrades`.
    pub selected_target: TargetId,
    /// Identifier the next unlocked target will receive.
    pub next_target_id: TargetId,
    /// All targets keyed by id.
    pub targets: BTreeMap<TargetId, TargetView>,
    /// The catalog priced for `selected_target`.
    pub upgrades: Vec<UpgradeView>,
}

/// Result of a manual click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ClickOutcome {
    /// Points awarded by this click; 0 for an unknown target.
    pub awarded: u64,
    /// Balance after the click.
    pub points_total: u64,
}

/// Lightweight balance view for frequent polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PointsView {
    /// Spendable balance.
    pub points: u64,
    /// Manual clicks across all targets.
    pub total_clicks: u64,
}
