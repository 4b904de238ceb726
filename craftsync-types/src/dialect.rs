//! Wire-format dialects.
//!
//! The remote software has shipped several layouts for the trailing fields
//! of a serialized crafted item. Which one applies is decided once per
//! session from a fingerprint of the remote build and then passed explicitly
//! to every encode call.

use crate::CraftedItem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Trailing-field layout of a serialized record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// No trailing fields. Used for unrecognised fingerprints.
    #[default]
    Legacy,
    /// Appends the numeric override priority.
    DialectA,
    /// Appends an empty placeholder field followed by the extended
    /// properties as JSON.
    DialectB,
}

impl Dialect {
    /// Returns true if records in this dialect carry the override priority.
    #[must_use]
    pub const fn carries_override_priority(self) -> bool {
        matches!(self, Self::DialectA)
    }

    /// Returns true if records in this dialect carry extended properties.
    #[must_use]
    pub const fn carries_extended_properties(self) -> bool {
        matches!(self, Self::DialectB)
    }

    /// Returns a copy of `item` with the fields this dialect cannot carry
    /// cleared. Encoding then decoding under `self` yields exactly this.
    #[must_use]
    pub fn project(self, item: &CraftedItem) -> CraftedItem {
        let mut projected = item.clone();
        if !self.carries_override_priority() {
            projected.override_priority = None;
        }
        if !self.carries_extended_properties() {
            projected.extended_properties = None;
        }
        projected
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Legacy => "legacy",
            Self::DialectA => "dialect_a",
            Self::DialectB => "dialect_b",
        };
        f.write_str(name)
    }
}

/// A short string derived from the remote software's observable behavior.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialectFingerprint(String);

impl DialectFingerprint {
    /// Wraps a raw fingerprint.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw fingerprint.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Looks the fingerprint up in `table`, falling back to
    /// [`Dialect::Legacy`] when it is unknown.
    #[must_use]
    pub fn resolve(&self, table: &BTreeMap<String, Dialect>) -> Dialect {
        table.get(&self.0).copied().unwrap_or_default()
    }
}

impl fmt::Display for DialectFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
