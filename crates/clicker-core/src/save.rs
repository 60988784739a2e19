//! JSON save document: encoding, decoding, and validation.
//!
//! A save captures the whole persistent state of a [`GameEngine`]. The
//! autoclick clock and target colors are not persisted: the clock restarts
//! at load time and colors are derived from ids.
//!
//! Decoding is all-or-nothing. [`decode`] builds a brand-new engine and
//! only returns it once every field has been validated, so a caller that
//! swaps the result in never observes a partially loaded game.

use std::collections::BTreeMap;
use std::time::Instant;

use clicker_types::{TargetId, UpgradeKind};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::RulesConfig;
use crate::engine::{EngineParts, GameEngine};
use crate::target::Target;

/// Current save document version.
pub const SAVE_VERSION: u32 = 1;

/// Reasons a save document is rejected.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The document is not valid JSON or has the wrong shape.
    #[error("malformed save document: {source}")]
    Malformed {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The document was written by a newer version.
    #[error("unsupported save version {found}")]
    UnsupportedVersion {
        /// Version found in the document.
        found: u32,
    },

    /// The document contains no targets.
    #[error("save contains no targets")]
    NoTargets,

    /// A target's map key disagrees with its `id` field, or uses id 0.
    #[error("target stored under key {key} has id {id}")]
    TargetIdMismatch {
        /// Key the target was stored under.
        key: TargetId,
        /// Id recorded inside the target.
        id: TargetId,
    },

    /// Target ids are not contiguous from 1.
    #[error("target ids skip {missing}")]
    SparseTargetIds {
        /// Lowest id with no target.
        missing: TargetId,
    },

    /// The selected target is not among the loaded targets.
    #[error("selected target {0} does not exist")]
    UnknownSelectedTarget(TargetId),

    /// `next_target_id` is not one past the highest target id.
    #[error("next target id {found} should be {expected}")]
    NextTargetMismatch {
        /// Value found in the document.
        found: TargetId,
        /// Value implied by the loaded targets.
        expected: TargetId,
    },

    /// An upgrade level is stored under a key that cannot hold it.
    #[error("upgrade {kind} has a level under invalid key {key}")]
    InvalidLevelKey {
        /// Upgrade whose levels are inconsistent.
        kind: UpgradeKind,
        /// Offending key.
        key: TargetId,
    },

    /// An upgrade tag names no catalog entry.
    #[error("unknown upgrade {0:?}")]
    UnknownUpgrade(String),

    /// The autoclick delay is not a positive finite number.
    #[error("invalid autoclick delay {0}")]
    InvalidDelay(f64),
}

/// Persisted fields of one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedTarget {
    /// Target identifier; must match the map key.
    pub id: TargetId,
    /// Points awarded per manual click.
    pub base_yield_per_click: u64,
    /// Implicit clicks per autoclick tick.
    pub auto_clicks_per_tick: u64,
    /// Manual clicks received.
    pub total_clicks: u64,
    /// Points produced, manual and automatic.
    pub total_points_earned: u64,
}

/// The persistent state of an engine, as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Document version. Absent means version 1.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Spendable balance.
    pub points: u64,
    /// Manual clicks across all targets.
    pub total_clicks: u64,
    /// Seconds between autoclick ticks.
    pub auto_tick_delay_seconds: f64,
    /// Identifier the next unlocked target will receive.
    pub next_target_id: TargetId,
    /// The currently selected target.
    pub selected_target: TargetId,
    /// All targets keyed by id.
    pub targets: BTreeMap<TargetId, SavedTarget>,
    /// Upgrade levels keyed by tag, then by target id (0 for global).
    #[serde(default)]
    pub upgrades: BTreeMap<String, BTreeMap<TargetId, u32>>,
}

const fn default_version() -> u32 {
    1
}

impl EngineSnapshot {
    /// Capture the persistent state of an engine.
    pub fn capture(engine: &GameEngine) -> Self {
        let targets = engine
            .targets()
            .map(|t| {
                (
                    t.id(),
                    SavedTarget {
                        id: t.id(),
                        base_yield_per_click: t.base_yield_per_click(),
                        auto_clicks_per_tick: t.auto_clicks_per_tick(),
                        total_clicks: t.total_clicks(),
                        total_points_earned: t.total_points_earned(),
                    },
                )
            })
            .collect();
        let upgrades = engine
            .upgrades()
            .iter()
            .filter(|u| !u.levels().is_empty())
            .map(|u| (u.kind().tag().to_owned(), u.levels().clone()))
            .collect();
        Self {
            version: SAVE_VERSION,
            points: engine.points(),
            total_clicks: engine.total_clicks(),
            auto_tick_delay_seconds: engine.auto_tick_delay_seconds(),
            next_target_id: engine.next_target_id(),
            selected_target: engine.selected_target(),
            targets,
            upgrades,
        }
    }

    /// Validate the snapshot and build an engine from it.
    ///
    /// The autoclick clock starts at `now`. A delay below the configured
    /// floor is raised to the floor.
    pub fn restore(self, rules: RulesConfig, now: Instant) -> Result<GameEngine, LoadError> {
        if self.version > SAVE_VERSION {
            return Err(LoadError::UnsupportedVersion {
                found: self.version,
            });
        }

        let delay = self.auto_tick_delay_seconds;
        if !delay.is_finite() || delay <= 0.0 {
            return Err(LoadError::InvalidDelay(delay));
        }
        let floor = rules.min_auto_tick_delay_seconds;
        let auto_tick_delay_seconds = if delay < floor {
            warn!(saved = delay, floor, "Saved autoclick delay below floor, raising it");
            floor
        } else {
            delay
        };

        let targets = restore_targets(self.targets)?;
        let Some(max_id) = targets.keys().next_back().copied() else {
            return Err(LoadError::NoTargets);
        };
        if let Some(missing) = first_gap(targets.keys().copied()) {
            return Err(LoadError::SparseTargetIds { missing });
        }
        if !targets.contains_key(&self.selected_target) {
            return Err(LoadError::UnknownSelectedTarget(self.selected_target));
        }
        let expected = max_id.next().unwrap_or(max_id);
        if self.next_target_id != expected {
            return Err(LoadError::NextTargetMismatch {
                found: self.next_target_id,
                expected,
            });
        }

        let mut levels = BTreeMap::new();
        for (tag, by_key) in self.upgrades {
            let Some(kind) = UpgradeKind::from_tag(&tag) else {
                return Err(LoadError::UnknownUpgrade(tag));
            };
            let per_target = crate::upgrade::spec_for(kind).per_target;
            for key in by_key.keys() {
                let valid = if per_target {
                    targets.contains_key(key)
                } else {
                    key.is_global()
                };
                if !valid {
                    return Err(LoadError::InvalidLevelKey { kind, key: *key });
                }
            }
            levels.insert(kind, by_key);
        }

        let parts = EngineParts {
            points: self.points,
            total_clicks: self.total_clicks,
            targets,
            next_target_id: self.next_target_id,
            selected_target: self.selected_target,
            auto_tick_delay_seconds,
            levels,
        };
        Ok(GameEngine::from_parts(parts, rules, now))
    }
}

/// Lowest id absent from an ascending id sequence that should read 1, 2, 3...
fn first_gap(ids: impl Iterator<Item = TargetId>) -> Option<TargetId> {
    let mut expected = TargetId::FIRST;
    for id in ids {
        if id != expected {
            return Some(expected);
        }
        expected = expected.next()?;
    }
    None
}

fn restore_targets(
    saved: BTreeMap<TargetId, SavedTarget>,
) -> Result<BTreeMap<TargetId, Target>, LoadError> {
    saved
        .into_iter()
        .map(|(key, t)| {
            if key != t.id || key.is_global() {
                return Err(LoadError::TargetIdMismatch { key, id: t.id });
            }
            let target = Target::from_parts(
                t.id,
                t.base_yield_per_click,
                t.auto_clicks_per_tick,
                t.total_clicks,
                t.total_points_earned,
            );
            Ok((key, target))
        })
        .collect()
}

/// Serialize an engine to a pretty-printed JSON document.
pub fn encode(engine: &GameEngine) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&EngineSnapshot::capture(engine))
}

/// Parse and validate a JSON document into a fresh engine.
pub fn decode(json: &str, rules: RulesConfig, now: Instant) -> Result<GameEngine, LoadError> {
    let snapshot: EngineSnapshot = serde_json::from_str(json)?;
    snapshot.restore(rules, now)
}
