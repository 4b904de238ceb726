//! Crafted-item cache sync for craftsync.
//!
//! The remote store keeps a small, fixed number of crafted-item slots. This
//! crate keeps a larger client-side collection whose overflow tail is
//! serialized, compressed and pushed to the remote as a single cache blob.
//!
//! # Architecture
//!
//! ## Components
//!
//! - **Codec**: delimiter-separated record format, dialect-aware
//! - **Merge**: folds decoded, validated records into the slot collection
//!   under a capacity ceiling, with deduplication
//! - **Deferred**: a single-pending, coalescing delayed task
//! - **Orchestrator**: owns the load / repair / push lifecycle
//!
//! ## Sync Process
//!
//! 1. **Gate**: wait for the host's settings to be loaded
//! 2. **Load**: decompress and decode the cache blob
//! 3. **Validate**: classify each record, repair the repairable ones
//! 4. **Merge**: append to the native slots, respecting the ceiling
//! 5. **Repair push**: if anything was repaired, save once after a delay
//! 6. **Save**: on every authoritative save, re-encode and push the tail
//!
//! # Example
//!
//! ```
//! use craftsync_sync::codec;
//! use craftsync_types::{CraftedItem, Dialect};
//!
//! let item = CraftedItem::new("HempRope").with_name("Tight");
//! let wire = codec::encode_item(Some(&item), Dialect::Legacy);
//! assert_eq!(wire, "HempRope¶¶¶Tight¶¶¶¶");
//! assert_eq!(codec::decode(&wire), vec![Some(item)]);
//! ```

pub mod codec;
pub mod collab;
mod config;
pub mod deferred;
mod error;
pub mod merge;
mod orchestrator;
pub mod settings;
pub mod state;

pub use collab::{
    AlwaysReady, Collaborators, Compressor, FingerprintSource, NativeSlotStore,
    PassthroughCompressor, RemotePush, SettingsGate,
};
pub use config::SyncConfig;
pub use deferred::DeferredTask;
pub use error::{SyncError, SyncResult};
pub use merge::{merge, MergeOutcome, MergeReport};
pub use orchestrator::CacheSync;
pub use settings::AccountSettings;
pub use state::{LoadReport, SyncPhase};
