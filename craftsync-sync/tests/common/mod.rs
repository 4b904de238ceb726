//! Shared collaborators for sync tests.

#![allow(dead_code)]

use async_trait::async_trait;
use craftsync_model::{CatalogValidator, ItemCatalog, ItemDefinition, RecordValidator};
use craftsync_sync::{
    codec, CacheSync, Collaborators, Compressor, FingerprintSource, NativeSlotStore, RemotePush,
    SettingsGate, SyncConfig, SyncError, SyncResult,
};
use craftsync_types::{AccountId, CraftedItem, Dialect};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const ACCOUNT: u64 = 4242;

/// Routes orchestrator logs to the test output. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Records every push; fails while `fail` is set and never answers while
/// `hang` is set.
#[derive(Default)]
pub struct RecordingRemote {
    pub pushes: Mutex<Vec<(AccountId, String)>>,
    pub fail: AtomicBool,
    pub hang: AtomicBool,
}

impl RecordingRemote {
    pub fn failing() -> Self {
        let remote = Self::default();
        remote.fail.store(true, Ordering::SeqCst);
        remote
    }

    pub fn count(&self) -> usize {
        self.pushes.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<String> {
        self.pushes.lock().unwrap().last().map(|(_, blob)| blob.clone())
    }
}

#[async_trait]
impl RemotePush for RecordingRemote {
    async fn push(&self, account_id: AccountId, blob: &str) -> SyncResult<()> {
        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(SyncError::PushRejected(account_id));
        }
        self.pushes.lock().unwrap().push((account_id, blob.to_string()));
        Ok(())
    }
}

/// Fixed fingerprint that counts how often it was asked.
pub struct CountingFingerprint {
    value: String,
    pub calls: AtomicUsize,
}

impl CountingFingerprint {
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FingerprintSource for CountingFingerprint {
    fn fingerprint(&self) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.value.clone()
    }
}

/// Reverses text and tags it, so tests can tell compressed from raw blobs.
pub struct ReversingCompressor;

impl Compressor for ReversingCompressor {
    fn compress(&self, text: &str) -> String {
        format!("z:{}", text.chars().rev().collect::<String>())
    }

    fn decompress(&self, blob: &str) -> Option<String> {
        blob.strip_prefix("z:").map(|rest| rest.chars().rev().collect())
    }
}

#[derive(Default)]
pub struct RecordingNativeStore {
    pub saved: Mutex<Vec<Vec<Option<CraftedItem>>>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl NativeSlotStore for RecordingNativeStore {
    async fn save_native(&self, slots: &[Option<CraftedItem>]) -> SyncResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SyncError::Storage("native store offline".into()));
        }
        self.saved.lock().unwrap().push(slots.to_vec());
        Ok(())
    }
}

/// Reports a closed channel on the first wait and is open afterwards.
#[derive(Default)]
pub struct FlakyGate {
    pub waits: AtomicUsize,
}

#[async_trait]
impl SettingsGate for FlakyGate {
    async fn wait_ready(&self) -> SyncResult<()> {
        if self.waits.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(SyncError::ChannelClosed);
        }
        Ok(())
    }
}

pub fn validator() -> Arc<dyn RecordValidator> {
    let catalog = ItemCatalog::new()
        .with_item(
            ItemDefinition::new("HempRope", "ItemArms")
                .lockable()
                .with_properties(&["Secure"])
                .with_type_tags(&["Hogtie"]),
        )
        .with_item(ItemDefinition::new("Rope", "ItemHands"))
        .with_item(ItemDefinition::new("Gag", "ItemMouth"))
        .with_lock_type("ExclusivePadlock");
    Arc::new(CatalogValidator::new(catalog))
}

pub fn config(base: usize, ceiling: usize) -> SyncConfig {
    SyncConfig {
        base_capacity: base,
        ceiling_capacity: ceiling,
        ..SyncConfig::default()
    }
    .with_dialect("R100", Dialect::DialectA)
    .with_dialect("R110", Dialect::DialectB)
}

/// Everything a test needs to drive and observe one orchestrator.
pub struct Harness {
    pub sync: CacheSync,
    pub remote: Arc<RecordingRemote>,
    pub fingerprint: Arc<CountingFingerprint>,
}

pub fn harness(config: SyncConfig) -> Harness {
    harness_with(config, Arc::new(RecordingRemote::default()), |c| c)
}

pub fn harness_with(
    config: SyncConfig,
    remote: Arc<RecordingRemote>,
    customize: impl FnOnce(Collaborators) -> Collaborators,
) -> Harness {
    init_tracing();
    let fingerprint = Arc::new(CountingFingerprint::new("R99"));
    let collab = customize(Collaborators::new(remote.clone(), fingerprint.clone()));
    let sync = CacheSync::new(AccountId::new(ACCOUNT), config, collab, validator()).unwrap();
    Harness {
        sync,
        remote,
        fingerprint,
    }
}

/// Legacy encoding of a run of slots.
pub fn blob(slots: &[Option<CraftedItem>]) -> String {
    codec::encode(slots, Dialect::Legacy)
}
