use crate::error::SyncResult;
use craftsync_types::{Capacity, Dialect};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Configuration for the cache sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Slots the remote store supports natively.
    pub base_capacity: usize,
    /// Hard upper bound on the collection length.
    pub ceiling_capacity: usize,
    /// Delay before the repair save fires (ms).
    pub repair_delay_ms: u64,
    /// Known remote fingerprints and the dialect each one speaks.
    pub dialect_fingerprints: BTreeMap<String, Dialect>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_capacity: 400,
            ceiling_capacity: 800,
            repair_delay_ms: 1_000,
            dialect_fingerprints: BTreeMap::new(),
        }
    }
}

impl SyncConfig {
    /// Parses a configuration from JSON; missing keys take their defaults.
    pub fn from_json(json: &str) -> SyncResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validated capacity bounds.
    pub fn capacity(&self) -> SyncResult<Capacity> {
        Ok(Capacity::new(self.base_capacity, self.ceiling_capacity)?)
    }

    pub fn repair_delay(&self) -> Duration {
        Duration::from_millis(self.repair_delay_ms)
    }

    /// Registers a fingerprint.
    #[must_use]
    pub fn with_dialect(mut self, fingerprint: &str, dialect: Dialect) -> Self {
        self.dialect_fingerprints.insert(fingerprint.to_string(), dialect);
        self
    }
}
