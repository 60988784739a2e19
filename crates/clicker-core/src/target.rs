//! Clickable point-producing targets.
//!
//! A target's yield starts as a pure function of its id
//! (`floor(id^1.5)`) and from then on is engine-owned state: upgrades
//! mutate it in place and it is never recomputed.

use clicker_types::{TargetId, TargetView};

/// Display palette. A target's color is `PALETTE[(id - 1) % PALETTE.len()]`.
pub const PALETTE: [&str; 10] = [
    "#4CAF50", "#FF9800", "#2196F3", "#9C27B0", "#F44336", "#00BCD4", "#FF5722", "#8BC34A",
    "#FFEB3B", "#E91E63",
];

/// Yield per click of a freshly created target: `floor(id^1.5)`.
///
/// Computed exactly as `isqrt(id^3)` so perfect powers (4 -> 8, 9 -> 27)
/// never land one below the true value.
pub fn base_yield_for(id: TargetId) -> u64 {
    let cubed = u128::from(id.get()).pow(3);
    u64::try_from(cubed.isqrt()).unwrap_or(u64::MAX)
}

/// One clickable producer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    id: TargetId,
    base_yield_per_click: u64,
    auto_clicks_per_tick: u64,
    total_clicks: u64,
    total_points_earned: u64,
}

impl Target {
    /// Create a target with the yield derived from its id and zeroed stats.
    pub fn new(id: TargetId) -> Self {
        Self {
            id,
            base_yield_per_click: base_yield_for(id),
            auto_clicks_per_tick: 0,
            total_clicks: 0,
            total_points_earned: 0,
        }
    }

    /// Rebuild a target from persisted fields.
    pub(crate) const fn from_parts(
        id: TargetId,
        base_yield_per_click: u64,
        auto_clicks_per_tick: u64,
        total_clicks: u64,
        total_points_earned: u64,
    ) -> Self {
        Self {
            id,
            base_yield_per_click,
            auto_clicks_per_tick,
            total_clicks,
            total_points_earned,
        }
    }

    /// Register one manual click. Returns the points awarded.
    pub const fn register_click(&mut self) -> u64 {
        self.total_clicks = self.total_clicks.saturating_add(1);
        self.total_points_earned = self
            .total_points_earned
            .saturating_add(self.base_yield_per_click);
        self.base_yield_per_click
    }

    /// Apply this target's share of an autoclick tick.
    ///
    /// Returns `base_yield_per_click * auto_clicks_per_tick`, already added
    /// to `total_points_earned`. Manual click count is untouched.
    pub const fn apply_auto_clicks(&mut self) -> u64 {
        let bonus = self
            .base_yield_per_click
            .saturating_mul(self.auto_clicks_per_tick);
        self.total_points_earned = self.total_points_earned.saturating_add(bonus);
        bonus
    }

    pub(crate) const fn add_yield(&mut self, amount: u64) {
        self.base_yield_per_click = self.base_yield_per_click.saturating_add(amount);
    }

    pub(crate) const fn double_yield(&mut self) {
        self.base_yield_per_click = self.base_yield_per_click.saturating_mul(2);
    }

    pub(crate) const fn add_auto_click(&mut self) {
        self.auto_clicks_per_tick = self.auto_clicks_per_tick.saturating_add(1);
    }

    /// Target identifier.
    pub const fn id(&self) -> TargetId {
        self.id
    }

    /// Points awarded per manual click.
    pub const fn base_yield_per_click(&self) -> u64 {
        self.base_yield_per_click
    }

    /// Implicit clicks per autoclick tick.
    pub const fn auto_clicks_per_tick(&self) -> u64 {
        self.auto_clicks_per_tick
    }

    /// Manual clicks received.
    pub const fn total_clicks(&self) -> u64 {
        self.total_clicks
    }

    /// Points produced, manual and automatic.
    pub const fn total_points_earned(&self) -> u64 {
        self.total_points_earned
    }

    /// Palette index, derived from the id.
    pub const fn color_index(&self) -> u32 {
        #[allow(clippy::cast_possible_truncation)]
        let size = PALETTE.len() as u32;
        match self.id.get().saturating_sub(1).checked_rem(size) {
            Some(index) => index,
            None => 0,
        }
    }

    /// Owned view for rendering.
    pub fn view(&self) -> TargetView {
        let color_index = self.color_index();
        let color = usize::try_from(color_index)
            .ok()
            .and_then(|i| PALETTE.get(i))
            .copied()
            .unwrap_or(PALETTE[0]);
        TargetView {
            id: self.id,
            base_yield_per_click: self.base_yield_per_click,
            auto_clicks_per_tick: self.auto_clicks_per_tick,
            total_clicks: self.total_clicks,
            total_points_earned: self.total_points_earned,
            color_index,
            color: color.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yield_formula_matches_floor_of_power() {
        assert_eq!(base_yield_for(TargetId(1)), 1);
        assert_eq!(base_yield_for(TargetId(2)), 2);
        assert_eq!(base_yield_for(TargetId(3)), 5);
        assert_eq!(base_yield_for(TargetId(4)), 8);
        assert_eq!(base_yield_for(TargetId(9)), 27);
        assert_eq!(base_yield_for(TargetId(10)), 31);
    }

    #[test]
    fn yield_is_monotonic_in_id() {
        let mut previous = 0;
        for n in 1..500 {
            let current = base_yield_for(TargetId(n));
            assert!(current >= previous, "yield dropped at id {n}");
            previous = current;
        }
    }

    #[test]
    fn click_updates_counters() {
        let mut target = Target::new(TargetId(4));
        let awarded = target.register_click();
        assert_eq!(awarded, 8);
        assert_eq!(target.total_clicks(), 1);
        assert_eq!(target.total_points_earned(), 8);
    }

    #[test]
    fn auto_clicks_do_not_count_as_manual_clicks() {
        let mut target = Target::from_parts(TargetId(1), 5, 2, 0, 0);
        assert_eq!(target.apply_auto_clicks(), 10);
        assert_eq!(target.total_clicks(), 0);
        assert_eq!(target.total_points_earned(), 10);
    }

    #[test]
    fn color_wraps_around_palette() {
        assert_eq!(Target::new(TargetId(1)).color_index(), 0);
        assert_eq!(Target::new(TargetId(10)).color_index(), 9);
        assert_eq!(Target::new(TargetId(11)).color_index(), 0);
        assert_eq!(Target::new(TargetId(12)).view().color, "#FF9800");
    }

    #[test]
    fn yield_saturates_instead_of_overflowing() {
        let mut target = Target::from_parts(TargetId(1), u64::MAX, 0, 0, 0);
        target.double_yield();
        target.add_yield(1);
        assert_eq!(target.base_yield_per_click(), u64::MAX);
    }
}
