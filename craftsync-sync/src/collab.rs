//! External collaborator interfaces.
//!
//! The orchestrator only talks to the outside world through these traits:
//! compression, the remote key/value push, the version fingerprint, the
//! settings-ready gate and, optionally, the remote's own slot store.

use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use craftsync_types::{AccountId, CraftedItem, DialectFingerprint};
use std::sync::Arc;
use tokio::sync::watch;

/// Reversible string compression of the encoded cache.
///
/// `decompress(compress(s))` must equal `s` for every string the codec
/// produces, the empty string included.
pub trait Compressor: Send + Sync {
    fn compress(&self, text: &str) -> String;

    /// Returns `None` if `blob` is not valid compressor output.
    fn decompress(&self, blob: &str) -> Option<String>;
}

/// A [`Compressor`] that stores text as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughCompressor;

impl Compressor for PassthroughCompressor {
    fn compress(&self, text: &str) -> String {
        text.to_string()
    }

    fn decompress(&self, blob: &str) -> Option<String> {
        Some(blob.to_string())
    }
}

/// Persists the cache blob remotely.
#[async_trait]
pub trait RemotePush: Send + Sync {
    /// Pushes `blob` for `account_id`. `Ok` means the remote acknowledged it.
    async fn push(&self, account_id: AccountId, blob: &str) -> SyncResult<()>;
}

/// Reports the remote software's version fingerprint.
pub trait FingerprintSource: Send + Sync {
    fn fingerprint(&self) -> String;
}

impl FingerprintSource for DialectFingerprint {
    fn fingerprint(&self) -> String {
        self.as_str().to_string()
    }
}

/// Resolves once the host's settings have been loaded.
#[async_trait]
pub trait SettingsGate: Send + Sync {
    async fn wait_ready(&self) -> SyncResult<()>;
}

/// A gate that is always open.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysReady;

#[async_trait]
impl SettingsGate for AlwaysReady {
    async fn wait_ready(&self) -> SyncResult<()> {
        Ok(())
    }
}

#[async_trait]
impl SettingsGate for watch::Receiver<bool> {
    async fn wait_ready(&self) -> SyncResult<()> {
        let mut rx = self.clone();
        rx.wait_for(|ready| *ready)
            .await
            .map(|_| ())
            .map_err(|_| SyncError::ChannelClosed)
    }
}

/// Saves the slots the remote store holds natively, `[0, base)`.
#[async_trait]
pub trait NativeSlotStore: Send + Sync {
    async fn save_native(&self, slots: &[Option<CraftedItem>]) -> SyncResult<()>;
}

/// The full set of collaborators an orchestrator needs.
#[derive(Clone)]
pub struct Collaborators {
    pub compressor: Arc<dyn Compressor>,
    pub remote: Arc<dyn RemotePush>,
    pub fingerprint: Arc<dyn FingerprintSource>,
    pub gate: Arc<dyn SettingsGate>,
    pub native_store: Option<Arc<dyn NativeSlotStore>>,
}

impl Collaborators {
    /// Collaborators with a passthrough compressor, an open gate and no
    /// native store.
    pub fn new(remote: Arc<dyn RemotePush>, fingerprint: Arc<dyn FingerprintSource>) -> Self {
        Self {
            compressor: Arc::new(PassthroughCompressor),
            remote,
            fingerprint,
            gate: Arc::new(AlwaysReady),
            native_store: None,
        }
    }

    #[must_use]
    pub fn with_compressor(mut self, compressor: Arc<dyn Compressor>) -> Self {
        self.compressor = compressor;
        self
    }

    #[must_use]
    pub fn with_gate(mut self, gate: Arc<dyn SettingsGate>) -> Self {
        self.gate = gate;
        self
    }

    #[must_use]
    pub fn with_native_store(mut self, store: Arc<dyn NativeSlotStore>) -> Self {
        self.native_store = Some(store);
        self
    }
}
