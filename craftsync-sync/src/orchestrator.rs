//! Load / repair / push lifecycle of the crafted-item cache.
//!
//! The orchestrator exclusively owns the slot collection and the mirrored
//! cache blob. The codec and validator it drives are stateless.

use crate::codec;
use crate::collab::Collaborators;
use crate::config::SyncConfig;
use crate::deferred::DeferredTask;
use crate::error::{SyncError, SyncResult};
use crate::merge::merge;
use crate::settings::AccountSettings;
use crate::state::{LoadReport, SyncPhase};
use craftsync_model::RecordValidator;
use craftsync_types::{AccountId, Capacity, CraftedItem, Dialect, DialectFingerprint, SlotCollection};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::sync::{watch, Mutex, RwLock};
use tracing::{debug, info, warn};

/// Handle to the cache sync of one account. Clones share the same state.
#[derive(Clone)]
pub struct CacheSync {
    inner: Arc<Inner>,
}

struct Inner {
    account_id: AccountId,
    capacity: Capacity,
    collab: Collaborators,
    validator: Arc<dyn RecordValidator>,
    config: SyncConfig,
    phase: watch::Sender<SyncPhase>,
    started: AtomicBool,
    slots: RwLock<SlotCollection>,
    settings: RwLock<AccountSettings>,
    native_stale: AtomicBool,
    dialect: OnceLock<Dialect>,
    repair_save: DeferredTask,
    /// Serializes saves so at most one push is in flight.
    save_lock: Mutex<()>,
}

impl CacheSync {
    /// Creates an orchestrator in the `Uninitialized` phase.
    pub fn new(
        account_id: AccountId,
        config: SyncConfig,
        collab: Collaborators,
        validator: Arc<dyn RecordValidator>,
    ) -> SyncResult<Self> {
        let capacity = config.capacity()?;
        let (phase, _) = watch::channel(SyncPhase::Uninitialized);
        Ok(Self {
            inner: Arc::new(Inner {
                account_id,
                capacity,
                collab,
                validator,
                repair_save: DeferredTask::new(config.repair_delay()),
                config,
                phase,
                started: AtomicBool::new(false),
                slots: RwLock::new(SlotCollection::new()),
                settings: RwLock::new(AccountSettings::default()),
                native_stale: AtomicBool::new(false),
                dialect: OnceLock::new(),
                save_lock: Mutex::new(()),
            }),
        })
    }

    pub fn account_id(&self) -> AccountId {
        self.inner.account_id
    }

    pub fn capacity(&self) -> Capacity {
        self.inner.capacity
    }

    pub fn phase(&self) -> SyncPhase {
        *self.inner.phase.borrow()
    }

    /// Subscribes to phase changes.
    pub fn subscribe_phase(&self) -> watch::Receiver<SyncPhase> {
        self.inner.phase.subscribe()
    }

    /// The session dialect. Resolved from the fingerprint on first use and
    /// never re-evaluated.
    pub fn dialect(&self) -> Dialect {
        *self.inner.dialect.get_or_init(|| {
            let fingerprint = DialectFingerprint::new(self.inner.collab.fingerprint.fingerprint());
            let dialect = fingerprint.resolve(&self.inner.config.dialect_fingerprints);
            info!("remote fingerprint {} selects dialect {}", fingerprint, dialect);
            dialect
        })
    }

    /// Snapshot of the slot collection.
    pub async fn slots(&self) -> SlotCollection {
        self.inner.slots.read().await.clone()
    }

    /// The last cache blob the remote acknowledged (or the one loaded at
    /// start).
    pub async fn cache_blob(&self) -> String {
        self.inner.settings.read().await.crafting_cache.clone()
    }

    /// Snapshot of the mirrored account settings.
    pub async fn settings(&self) -> AccountSettings {
        self.inner.settings.read().await.clone()
    }

    /// True if the native slots differ from what the remote last stored.
    pub fn native_stale(&self) -> bool {
        self.inner.native_stale.load(Ordering::Acquire)
    }

    /// True while a repair save waits for its timer.
    pub fn repair_pending(&self) -> bool {
        self.inner.repair_save.is_pending()
    }

    /// Number of repair saves that have fired.
    pub fn repair_runs(&self) -> u64 {
        self.inner.repair_save.runs()
    }

    /// Loads the cache: waits for the settings gate, then decodes
    /// `settings.crafting_cache` and merges it after `native`.
    ///
    /// `native` is padded to the base capacity first. If any record had to
    /// be repaired, a single save is scheduled after the configured delay.
    pub async fn start(
        &self,
        native: SlotCollection,
        settings: AccountSettings,
    ) -> SyncResult<LoadReport> {
        if self.inner.started.load(Ordering::Acquire) {
            return Err(SyncError::AlreadyStarted);
        }

        debug!("waiting for settings before loading crafting cache");
        self.inner.collab.gate.wait_ready().await?;
        // Claimed only once the gate is open, so a failed or abandoned wait
        // can be retried.
        if self.inner.started.swap(true, Ordering::AcqRel) {
            return Err(SyncError::AlreadyStarted);
        }
        self.inner.phase.send_replace(SyncPhase::Loading);

        let base = self.inner.capacity.base();
        let mut existing = native;
        existing.pad_to(base);
        let native_before = existing.native(base).to_vec();

        let text = self.decompress(&settings.crafting_cache);
        let decoded = codec::decode(&text);
        let decoded_len = decoded.len();
        let incoming = decoded
            .into_iter()
            .map(|item| self.inner.validator.inspect(item))
            .collect();

        let outcome = merge(existing, incoming, self.inner.capacity);
        let native_stale = outcome.slots.native(base) != native_before.as_slice();
        if native_stale {
            info!("crafting cache merge changed native slots, marking them stale");
            self.inner.native_stale.store(true, Ordering::Release);
        }

        let slot_count = outcome.slots.len();
        *self.inner.slots.write().await = outcome.slots;
        *self.inner.settings.write().await = settings;
        self.inner.phase.send_replace(SyncPhase::Ready);
        info!(
            "crafting cache loaded: {} records, {} slots ({:?})",
            decoded_len, slot_count, outcome.report
        );

        let repair_scheduled = outcome.repaired && self.request_repair_save();
        Ok(LoadReport {
            decoded: decoded_len,
            slots: slot_count,
            merge: outcome.report,
            repair_scheduled,
            native_stale,
        })
    }

    /// Authoritative save: encodes the overflow tail with the session
    /// dialect, compresses it and pushes it once.
    ///
    /// On success the mirrored blob is replaced. On failure it is left as is
    /// and the error returned; nothing is retried here.
    pub async fn save(&self) -> SyncResult<()> {
        let _guard = self.inner.save_lock.lock().await;
        let phase = self.phase();
        if phase != SyncPhase::Ready {
            return Err(SyncError::NotReady(phase));
        }

        self.inner.phase.send_replace(SyncPhase::Pushing);
        let _reset = ReadyOnDrop(&self.inner.phase);
        self.push_tail().await
    }

    /// Replaces one slot. Indices past the current end create empty slots.
    pub async fn set_slot(
        &self,
        index: usize,
        item: Option<CraftedItem>,
    ) -> SyncResult<Option<CraftedItem>> {
        self.ensure_loaded()?;
        let ceiling = self.inner.capacity.ceiling();
        if index >= ceiling {
            return Err(SyncError::SlotOutOfRange { index, ceiling });
        }
        Ok(self.inner.slots.write().await.set(index, item))
    }

    /// Mutates the collection in place. Anything pushed past the ceiling is
    /// cut off afterwards.
    pub async fn update_slots<F>(&self, f: F) -> SyncResult<()>
    where
        F: FnOnce(&mut SlotCollection),
    {
        self.ensure_loaded()?;
        let ceiling = self.inner.capacity.ceiling();
        let mut slots = self.inner.slots.write().await;
        f(&mut slots);
        if slots.len() > ceiling {
            warn!("slot update grew collection to {}, truncating to {}", slots.len(), ceiling);
            slots.truncate(ceiling);
        }
        Ok(())
    }

    fn ensure_loaded(&self) -> SyncResult<()> {
        match self.phase() {
            SyncPhase::Ready | SyncPhase::Pushing => Ok(()),
            phase @ (SyncPhase::Uninitialized | SyncPhase::Loading) => {
                Err(SyncError::NotReady(phase))
            }
        }
    }

    fn decompress(&self, blob: &str) -> String {
        if blob.is_empty() {
            return String::new();
        }
        match self.inner.collab.compressor.decompress(blob) {
            Some(text) => text,
            None => {
                warn!("crafting cache blob could not be decompressed, ignoring it");
                String::new()
            }
        }
    }

    /// Schedules a save after the repair delay. Returns false if one is
    /// already pending; the pending save will see the latest collection.
    pub fn request_repair_save(&self) -> bool {
        let handle = self.clone();
        let scheduled = self.inner.repair_save.schedule(move || async move {
            if let Err(e) = handle.save().await {
                warn!("repair save failed: {}", e);
            }
        });
        if scheduled {
            info!(
                "repaired crafted items, saving in {:?}",
                self.inner.repair_save.delay()
            );
        }
        scheduled
    }

    async fn push_tail(&self) -> SyncResult<()> {
        let base = self.inner.capacity.base();
        let dialect = self.dialect();
        let (text, native) = {
            let slots = self.inner.slots.read().await;
            let native = self.native_stale().then(|| slots.native(base).to_vec());
            (codec::encode(slots.overflow_tail(base), dialect), native)
        };

        if let (Some(native), Some(store)) = (native, self.inner.collab.native_store.as_ref()) {
            match store.save_native(&native).await {
                Ok(()) => {
                    debug!("native slots saved");
                    self.inner.native_stale.store(false, Ordering::Release);
                }
                Err(e) => warn!("saving native slots failed: {}", e),
            }
        }

        let blob = self.inner.collab.compressor.compress(&text);
        match self.inner.collab.remote.push(self.inner.account_id, &blob).await {
            Ok(()) => {
                debug!("crafting cache pushed for account {}", self.inner.account_id);
                self.inner.settings.write().await.crafting_cache = blob;
                Ok(())
            }
            Err(e) => {
                warn!(
                    "crafting cache push for account {} failed: {}",
                    self.inner.account_id, e
                );
                Err(e)
            }
        }
    }
}

/// Returns the phase to `Ready` when a save ends, including when the save
/// future is dropped mid-push.
struct ReadyOnDrop<'a>(&'a watch::Sender<SyncPhase>);

impl Drop for ReadyOnDrop<'_> {
    fn drop(&mut self) {
        self.0.send_replace(SyncPhase::Ready);
    }
}
