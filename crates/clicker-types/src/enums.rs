//! Enumeration types for the clicker game.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The closed set of purchasable upgrade variants.
///
/// The serde representation (the variant name, e.g. `"ClickPower"`) is
/// the stable tag used by the command surface and the save document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum UpgradeKind {
    /// +1 yield per click on one target.
    ClickPower,
    /// Doubles the yield per click of one target.
    ClickMultiplier,
    /// +1 implicit click per autoclick tick on one target.
    AutoClicker,
    /// Shortens the global autoclick delay down to a floor.
    AutoSpeed,
    /// Unlocks a new target.
    NewTarget,
}

impl UpgradeKind {
    /// All variants in catalog order.
    pub const ALL: [Self; 5] = [
        Self::ClickPower,
        Self::ClickMultiplier,
        Self::AutoClicker,
        Self::AutoSpeed,
        Self::NewTarget,
    ];

    /// The stable tag of this variant.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::ClickPower => "ClickPower",
            Self::ClickMultiplier => "ClickMultiplier",
            Self::AutoClicker => "AutoClicker",
            Self::AutoSpeed => "AutoSpeed",
            Self::NewTarget => "NewTarget",
        }
    }

    /// Look a variant up by its tag. Case-sensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

impl core::fmt::Display for UpgradeKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for kind in UpgradeKind::ALL {
            assert_eq!(UpgradeKind::from_tag(kind.tag()), Some(kind));
        }
    }

    #[test]
    fn unknown_and_miscased_tags_are_rejected() {
        assert_eq!(UpgradeKind::from_tag("MegaBonus"), None);
        assert_eq!(UpgradeKind::from_tag("clickpower"), None);
        assert_eq!(UpgradeKind::from_tag(""), None);
    }

    #[test]
    fn serde_name_matches_tag() {
        for kind in UpgradeKind::ALL {
            let json = serde_json::to_string(&kind).unwrap_or_default();
            assert_eq!(json, format!("\"{}\"", kind.tag()));
        }
    }
}
