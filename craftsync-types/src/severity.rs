//! Validation severity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of validating one decoded record.
///
/// Variants are ordered by badness, so combining per-field outcomes is a
/// `max`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// The record is valid exactly as decoded.
    #[default]
    Ok,
    /// The record is usable after normalization; it must be written back.
    Error,
    /// The record cannot be salvaged and must be discarded.
    CriticalError,
}

impl Severity {
    /// Returns the worse of two severities.
    #[must_use]
    pub fn worst(self, other: Self) -> Self {
        self.max(other)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ok => "OK",
            Self::Error => "ERROR",
            Self::CriticalError => "CRITICAL_ERROR",
        };
        f.write_str(name)
    }
}
