//! Upgrade catalog, pricing, and level bookkeeping.
//!
//! The catalog is a fixed, closed set of variants keyed by
//! [`UpgradeKind`]. Each entry carries its pricing parameters as data;
//! the effect of a purchase is dispatched by tag in
//! [`GameEngine`](crate::engine::GameEngine).
//!
//! # Pricing
//!
//! ```text
//! price(level) = floor(base_price * factor(target) * price_growth^level)
//! factor       = sqrt(target_id) for per-target upgrades, 1.0 otherwise
//! ```
//!
//! `level` is the stored level *before* the purchase being priced.
//!
//! # Level keys
//!
//! Per-target upgrades store one level per target id. Global upgrades
//! store a single level under [`TargetId::GLOBAL`]. A level queried
//! without a target always reads the global key; per-target levels are
//! never summed.

use std::collections::BTreeMap;

use clicker_types::{TargetId, UpgradeKind, UpgradeView};

/// Static parameters of one catalog entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeSpec {
    /// Variant tag.
    pub kind: UpgradeKind,
    /// Display name.
    pub name: &'static str,
    /// Display description.
    pub description: &'static str,
    /// Price of level 0 (before the per-target factor).
    pub base_price: u64,
    /// Geometric growth per level, at least 1.0.
    pub price_growth: f64,
    /// Whether levels are kept per target.
    pub per_target: bool,
}

/// The fixed catalog, in display order.
pub static CATALOG: [UpgradeSpec; 5] = [
    UpgradeSpec {
        kind: UpgradeKind::ClickPower,
        name: "Click Power",
        description: "+1 point per click",
        base_price: 10,
        price_growth: 1.15,
        per_target: true,
    },
    UpgradeSpec {
        kind: UpgradeKind::ClickMultiplier,
        name: "Click Multiplier",
        description: "Doubles points per click",
        base_price: 100,
        price_growth: 2.0,
        per_target: true,
    },
    UpgradeSpec {
        kind: UpgradeKind::AutoClicker,
        name: "Auto-Clicker",
        description: "+1 automatic click per tick",
        base_price: 50,
        price_growth: 1.15,
        per_target: true,
    },
    UpgradeSpec {
        kind: UpgradeKind::AutoSpeed,
        name: "Auto Speed",
        description: "Shortens the automatic click delay",
        base_price: 200,
        price_growth: 1.5,
        per_target: false,
    },
    UpgradeSpec {
        kind: UpgradeKind::NewTarget,
        name: "New Target",
        description: "Unlocks a new target",
        base_price: 500,
        price_growth: 2.5,
        per_target: false,
    },
];

/// Look up the catalog entry for a variant.
pub fn spec_for(kind: UpgradeKind) -> &'static UpgradeSpec {
    match kind {
        UpgradeKind::ClickPower => &CATALOG[0],
        UpgradeKind::ClickMultiplier => &CATALOG[1],
        UpgradeKind::AutoClicker => &CATALOG[2],
        UpgradeKind::AutoSpeed => &CATALOG[3],
        UpgradeKind::NewTarget => &CATALOG[4],
    }
}

/// Compute the price of an upgrade at a given level.
///
/// Truncates toward zero. Prices beyond `u64` saturate to `u64::MAX`,
/// which no balance can afford.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn price_at(spec: &UpgradeSpec, target: Option<TargetId>, level: u32) -> u64 {
    let factor = match target {
        Some(id) if spec.per_target && !id.is_global() => f64::from(id.get()).sqrt(),
        _ => 1.0,
    };
    let raw = spec.base_price as f64 * factor * spec.price_growth.powf(f64::from(level));
    // `as` saturates: +inf and anything above u64::MAX become u64::MAX.
    raw.floor() as u64
}

/// One catalog entry plus its purchase levels.
#[derive(Debug, Clone, PartialEq)]
pub struct Upgrade {
    spec: &'static UpgradeSpec,
    levels: BTreeMap<TargetId, u32>,
}

impl Upgrade {
    /// Create an upgrade with no levels bought.
    pub fn new(kind: UpgradeKind) -> Self {
        Self {
            spec: spec_for(kind),
            levels: BTreeMap::new(),
        }
    }

    /// The full catalog with no levels bought.
    pub fn catalog() -> Vec<Self> {
        UpgradeKind::ALL.into_iter().map(Self::new).collect()
    }

    /// Static parameters.
    pub const fn spec(&self) -> &'static UpgradeSpec {
        self.spec
    }

    /// Variant tag.
    pub const fn kind(&self) -> UpgradeKind {
        self.spec.kind
    }

    /// Whether levels are kept per target.
    pub const fn per_target(&self) -> bool {
        self.spec.per_target
    }

    /// Resolve the level key for a purchase or query.
    ///
    /// Global upgrades always use [`TargetId::GLOBAL`]. Per-target
    /// upgrades use the given id, or the global key when none is given.
    pub fn level_key(&self, target: Option<TargetId>) -> TargetId {
        if self.spec.per_target {
            target.unwrap_or(TargetId::GLOBAL)
        } else {
            TargetId::GLOBAL
        }
    }

    /// Stored level for the resolved key, 0 if never bought.
    pub fn current_level(&self, target: Option<TargetId>) -> u32 {
        self.levels
            .get(&self.level_key(target))
            .copied()
            .unwrap_or(0)
    }

    /// Price of the next level for the resolved key.
    pub fn current_price(&self, target: Option<TargetId>) -> u64 {
        let target = if self.spec.per_target { target } else { None };
        price_at(self.spec, target, self.current_level(target))
    }

    /// Increment the level stored under `key`.
    pub(crate) fn bump_level(&mut self, key: TargetId) {
        let level = self.levels.entry(key).or_insert(0);
        *level = level.saturating_add(1);
    }

    /// All stored levels, keyed by target id (or the global key).
    pub const fn levels(&self) -> &BTreeMap<TargetId, u32> {
        &self.levels
    }

    /// Replace all stored levels. Used when restoring a save.
    pub(crate) fn set_levels(&mut self, levels: BTreeMap<TargetId, u32>) {
        self.levels = levels;
    }

    /// Owned view priced for a selection context.
    pub fn view(&self, target: Option<TargetId>) -> UpgradeView {
        let target = if self.spec.per_target { target } else { None };
        UpgradeView {
            kind: self.spec.kind,
            name: self.spec.name.to_owned(),
            description: self.spec.description.to_owned(),
            price: self.current_price(target),
            level: self.current_level(target),
            per_target: self.spec.per_target,
        }
    }
}
