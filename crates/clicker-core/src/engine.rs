//! The game-state engine: points, targets, upgrades, and the tick clock.
//!
//! [`GameEngine`] is the aggregate root. It exclusively owns every
//! [`Target`] and [`Upgrade`]; callers interact through commands (click,
//! select, purchase, auto-tick) and read through owned views.
//!
//! # Invariants
//!
//! - `points` never goes negative: purchases check-then-debit in one call.
//! - Every key in `targets` equals the id stored in its target.
//! - `selected_target` always names an existing target.
//! - `next_target_id == 1 + max(target ids)` and never decreases.
//! - `auto_tick_delay_seconds >= rules.min_auto_tick_delay_seconds`.
//!
//! The engine is a plain synchronous value. Mutual exclusion between
//! concurrent callers is provided by [`GameSession`](crate::session::GameSession).

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use clicker_types::{GameStateView, PointsView, TargetId, UpgradeKind, UpgradeView};
use tracing::{debug, info};

use crate::config::RulesConfig;
use crate::target::Target;
use crate::upgrade::Upgrade;

/// The single-player economy.
#[derive(Debug, Clone)]
pub struct GameEngine {
    points: u64,
    total_clicks: u64,
    targets: BTreeMap<TargetId, Target>,
    next_target_id: TargetId,
    selected_target: TargetId,
    auto_tick_delay_seconds: f64,
    last_auto_tick: Instant,
    upgrades: Vec<Upgrade>,
    rules: RulesConfig,
}

/// Fully validated state used to rebuild an engine from a save.
#[derive(Debug)]
pub(crate) struct EngineParts {
    pub points: u64,
    pub total_clicks: u64,
    pub targets: BTreeMap<TargetId, Target>,
    pub next_target_id: TargetId,
    pub selected_target: TargetId,
    pub auto_tick_delay_seconds: f64,
    pub levels: BTreeMap<UpgradeKind, BTreeMap<TargetId, u32>>,
}

impl GameEngine {
    /// Create a fresh game with `rules.initial_targets` targets.
    ///
    /// The autoclick clock starts at `now`, so the first tick is due one
    /// full delay later.
    pub fn new(rules: RulesConfig, now: Instant) -> Self {
        let mut engine = Self {
            points: 0,
            total_clicks: 0,
            targets: BTreeMap::new(),
            next_target_id: TargetId::FIRST,
            selected_target: TargetId::FIRST,
            auto_tick_delay_seconds: rules.initial_auto_tick_delay_seconds,
            last_auto_tick: now,
            upgrades: Upgrade::catalog(),
            rules,
        };
        for _ in 0..engine.rules.initial_targets.max(1) {
            engine.create_target();
        }
        engine
    }

    /// Rebuild an engine from validated parts. The autoclick clock
    /// restarts at `now`.
    pub(crate) fn from_parts(parts: EngineParts, rules: RulesConfig, now: Instant) -> Self {
        let mut upgrades = Upgrade::catalog();
        for upgrade in &mut upgrades {
            if let Some(levels) = parts.levels.get(&upgrade.kind()) {
                upgrade.set_levels(levels.clone());
            }
        }
        Self {
            points: parts.points,
            total_clicks: parts.total_clicks,
            targets: parts.targets,
            next_target_id: parts.next_target_id,
            selected_target: parts.selected_target,
            auto_tick_delay_seconds: parts.auto_tick_delay_seconds,
            last_auto_tick: now,
            upgrades,
            rules,
        }
    }

    // -----------------------------------------------------------------------
    // Targets
    // -----------------------------------------------------------------------

    /// Create and register the next target. Returns its id.
    ///
    /// Ids are never reused. Should the id space ever run out the last id
    /// is returned again and nothing is created.
    pub fn create_target(&mut self) -> TargetId {
        let id = self.next_target_id;
        let Some(next) = id.next() else {
            return id;
        };
        self.targets.insert(id, Target::new(id));
        self.next_target_id = next;
        info!(target_id = %id, "Target unlocked");
        id
    }

    /// Register a manual click on a target.
    ///
    /// Returns the points awarded, or 0 (with no mutation) if the target
    /// does not exist.
    pub fn register_click(&mut self, id: TargetId) -> u64 {
        let Some(target) = self.targets.get_mut(&id) else {
            return 0;
        };
        let awarded = target.register_click();
        self.points = self.points.saturating_add(awarded);
        self.total_clicks = self.total_clicks.saturating_add(1);
        debug!(target_id = %id, awarded, points = self.points, "Click");
        awarded
    }

    /// Change the target whose per-target upgrades are shown and priced.
    ///
    /// Returns `false` (with no mutation) if the target does not exist.
    pub fn select_target(&mut self, id: TargetId) -> bool {
        if !self.targets.contains_key(&id) {
            return false;
        }
        self.selected_target = id;
        true
    }

    // -----------------------------------------------------------------------
    // Upgrades
    // -----------------------------------------------------------------------

    /// Purchase an upgrade identified by its tag.
    ///
    /// Returns `false` if the tag names no catalog entry, otherwise
    /// behaves like [`purchase`](Self::purchase).
    pub fn purchase_upgrade(&mut self, tag: &str, target: Option<TargetId>) -> bool {
        UpgradeKind::from_tag(tag).is_some_and(|kind| self.purchase(kind, target))
    }

    /// Purchase one level of an upgrade.
    ///
    /// For per-target upgrades `target` must name an existing target. For
    /// global upgrades it is ignored. Returns `false` with the engine
    /// unchanged when the target is missing or the balance is below the
    /// price. On success the price is debited, the level at the resolved
    /// key is incremented, and the effect is applied, all in this call.
    pub fn purchase(&mut self, kind: UpgradeKind, target: Option<TargetId>) -> bool {
        let Some(index) = self.upgrades.iter().position(|u| u.kind() == kind) else {
            return false;
        };
        let Some(upgrade) = self.upgrades.get(index) else {
            return false;
        };

        let target = if upgrade.per_target() {
            match target {
                Some(id) if self.targets.contains_key(&id) => Some(id),
                _ => return false,
            }
        } else {
            None
        };

        let price = upgrade.current_price(target);
        let key = upgrade.level_key(target);
        let Some(remaining) = self.points.checked_sub(price) else {
            debug!(upgrade = %kind, price, points = self.points, "Purchase refused");
            return false;
        };

        self.points = remaining;
        if let Some(upgrade) = self.upgrades.get_mut(index) {
            upgrade.bump_level(key);
        }
        self.apply_effect(kind, target);
        debug!(upgrade = %kind, price, key = %key, points = self.points, "Upgrade purchased");
        true
    }

    /// Apply the permanent effect of one purchased level.
    ///
    /// Effects that name a missing target do nothing.
    fn apply_effect(&mut self, kind: UpgradeKind, target: Option<TargetId>) {
        match kind {
            UpgradeKind::ClickPower => {
                if let Some(t) = target.and_then(|id| self.targets.get_mut(&id)) {
                    t.add_yield(1);
                }
            }
            UpgradeKind::ClickMultiplier => {
                if let Some(t) = target.and_then(|id| self.targets.get_mut(&id)) {
                    t.double_yield();
                }
            }
            UpgradeKind::AutoClicker => {
                if let Some(t) = target.and_then(|id| self.targets.get_mut(&id)) {
                    t.add_auto_click();
                }
            }
            UpgradeKind::AutoSpeed => {
                let shortened = self.auto_tick_delay_seconds - self.rules.auto_speed_step_seconds;
                self.auto_tick_delay_seconds = shortened.max(self.rules.min_auto_tick_delay_seconds);
            }
            UpgradeKind::NewTarget => {
                self.create_target();
            }
        }
    }

    /// The catalog priced for a target, or `None` if it does not exist.
    pub fn upgrades_for(&self, id: TargetId) -> Option<Vec<UpgradeView>> {
        self.targets
            .contains_key(&id)
            .then(|| self.upgrade_views(id))
    }

    fn upgrade_views(&self, id: TargetId) -> Vec<UpgradeView> {
        self.upgrades.iter().map(|u| u.view(Some(id))).collect()
    }

    // -----------------------------------------------------------------------
    // Autoclick
    // -----------------------------------------------------------------------

    /// Run one autoclick tick if it is due at `now`.
    ///
    /// Returns `None` when less than the delay has elapsed since the last
    /// applied tick. Otherwise every target with auto-clicks contributes
    /// `yield * auto_clicks` to its own earnings and to the balance, the
    /// tick clock moves to `now`, and the total bonus is returned. The
    /// whole batch happens inside this call.
    pub fn run_auto_tick(&mut self, now: Instant) -> Option<u64> {
        let elapsed = now.saturating_duration_since(self.last_auto_tick);
        if elapsed < self.auto_tick_delay() {
            return None;
        }
        let mut bonus: u64 = 0;
        for target in self.targets.values_mut() {
            if target.auto_clicks_per_tick() > 0 {
                bonus = bonus.saturating_add(target.apply_auto_clicks());
            }
        }
        self.points = self.points.saturating_add(bonus);
        self.last_auto_tick = now;
        if bonus > 0 {
            debug!(bonus, points = self.points, "Autoclick tick");
        }
        Some(bonus)
    }

    /// Current autoclick delay as a [`Duration`].
    pub fn auto_tick_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.auto_tick_delay_seconds).unwrap_or(Duration::MAX)
    }

    // -----------------------------------------------------------------------
    // Accessors and views
    // -----------------------------------------------------------------------

    /// Spendable balance.
    pub const fn points(&self) -> u64 {
        self.points
    }

    /// Manual clicks across all targets.
    pub const fn total_clicks(&self) -> u64 {
        self.total_clicks
    }

    /// Look up a target.
    pub fn target(&self, id: TargetId) -> Option<&Target> {
        self.targets.get(&id)
    }

    /// All targets in ascending id order.
    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.values()
    }

    /// Number of targets.
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Identifier the next unlocked target will receive.
    pub const fn next_target_id(&self) -> TargetId {
        self.next_target_id
    }

    /// The currently selected target.
    pub const fn selected_target(&self) -> TargetId {
        self.selected_target
    }

    /// Seconds between autoclick ticks.
    pub const fn auto_tick_delay_seconds(&self) -> f64 {
        self.auto_tick_delay_seconds
    }

    /// When the last autoclick tick was applied.
    pub const fn last_auto_tick(&self) -> Instant {
        self.last_auto_tick
    }

    /// The upgrade catalog with its levels.
    pub fn upgrades(&self) -> &[Upgrade] {
        &self.upgrades
    }

    /// Look up an upgrade by variant.
    pub fn upgrade(&self, kind: UpgradeKind) -> Option<&Upgrade> {
        self.upgrades.iter().find(|u| u.kind() == kind)
    }

    /// Rules this engine was built with.
    pub const fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Owned view of the whole game, upgrades priced for the selection.
    pub fn state_view(&self) -> GameStateView {
        GameStateView {
            points: self.points,
            total_clicks: self.total_clicks,
            auto_tick_delay_seconds: self.auto_tick_delay_seconds,
            selected_target: self.selected_target,
            next_target_id: self.next_target_id,
            targets: self
                .targets
                .iter()
                .map(|(id, target)| (*id, target.view()))
                .collect(),
            upgrades: self.upgrade_views(self.selected_target),
        }
    }

    /// Owned balance view.
    pub const fn points_view(&self) -> PointsView {
        PointsView {
            points: self.points,
            total_clicks: self.total_clicks,
        }
    }

    #[cfg(test)]
    pub(crate) const fn set_points(&mut self, points: u64) {
        self.points = points;
    }
}
