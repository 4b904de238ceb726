//! Account-scoped settings that carry the cache blob.

use crate::error::SyncResult;
use serde::{Deserialize, Serialize};

/// The slice of the host's account settings this crate owns.
///
/// Field names follow the remote's settings layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountSettings {
    #[serde(default)]
    pub version: String,
    /// Compressed, encoded overflow tail.
    #[serde(default)]
    pub crafting_cache: String,
}

impl AccountSettings {
    pub fn new(version: impl Into<String>, crafting_cache: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            crafting_cache: crafting_cache.into(),
        }
    }

    pub fn from_json(json: &str) -> SyncResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> SyncResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
