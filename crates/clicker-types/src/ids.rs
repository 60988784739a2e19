//! Type-safe target identifier.
//!
//! Targets are numbered sequentially from 1 and never reused. The value 0
//! is reserved: it is the level key under which global (non per-target)
//! upgrades record their purchases.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Identifier of a clickable target.
///
/// Serializes as a bare integer so it can be used directly as a JSON map
/// key (`"1"`, `"2"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TargetId(pub u32);

impl TargetId {
    /// Reserved key for global upgrade levels. Never names a real target.
    pub const GLOBAL: Self = Self(0);

    /// The first target every new game starts with.
    pub const FIRST: Self = Self(1);

    /// Return the raw numeric value.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether this is the reserved global key.
    pub const fn is_global(self) -> bool {
        self.0 == 0
    }

    /// The identifier following this one, or `None` on overflow.
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }
}

impl core::fmt::Display for TargetId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TargetId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<TargetId> for u32 {
    fn from(id: TargetId) -> Self {
        id.0
    }
}
