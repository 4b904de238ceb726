//! Error types for the sync layer.

use crate::state::SyncPhase;
use craftsync_types::AccountId;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur in sync operations.
///
/// None of these are fatal: record-level problems never surface here at all,
/// and a failed push leaves the previous cache blob authoritative.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Network error reaching a remote collaborator.
    #[error("network error: {0}")]
    Network(String),

    /// The remote answered but refused the cache blob.
    #[error("push rejected for account {0}")]
    PushRejected(AccountId),

    /// Saving the native slots failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] craftsync_types::Error),

    /// `start` was called more than once.
    #[error("sync already started")]
    AlreadyStarted,

    /// The operation needs the `Ready` phase.
    #[error("sync not ready (phase: {0})")]
    NotReady(SyncPhase),

    /// Slot index at or beyond the capacity ceiling.
    #[error("slot {index} is beyond the ceiling of {ceiling}")]
    SlotOutOfRange { index: usize, ceiling: usize },

    /// Channel closed.
    #[error("channel closed")]
    ChannelClosed,
}
