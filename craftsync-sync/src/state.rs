//! Sync lifecycle state.

use crate::merge::MergeReport;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle phase of a [`crate::CacheSync`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    /// Waiting for `start`.
    #[default]
    Uninitialized,
    /// Decoding and merging the cache blob.
    Loading,
    /// Collection merged; saves are accepted.
    Ready,
    /// A save is encoding and pushing the tail.
    Pushing,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Pushing => "pushing",
        };
        f.write_str(name)
    }
}

/// Summary of a completed load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Records decoded from the cache blob, empty slots included.
    pub decoded: usize,
    /// Collection length after the merge.
    pub slots: usize,
    pub merge: MergeReport,
    /// True if a repair save was scheduled.
    pub repair_scheduled: bool,
    /// True if the merge changed the native slots.
    pub native_stale: bool,
}
