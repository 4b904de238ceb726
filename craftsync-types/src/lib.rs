//! Core type definitions for craftsync.
//!
//! This crate defines the vocabulary shared by the codec, the validator, the
//! slot merger and the sync orchestrator:
//! - [`CraftedItem`], one crafted-item record
//! - [`SlotCollection`] and its [`Capacity`] bounds
//! - [`Dialect`], the wire layout selected per remote version
//! - [`Severity`], the three-tier validation outcome
//! - [`AccountId`], the key the cache blob is pushed under
//!
//! Nothing here performs I/O. Encoding lives in `craftsync-sync`, catalog
//! validation in `craftsync-model`.

mod dialect;
mod ids;
mod item;
mod severity;
mod slots;

pub use dialect::{Dialect, DialectFingerprint};
pub use ids::AccountId;
pub use item::{CraftedItem, ItemProperties};
pub use severity::Severity;
pub use slots::{Capacity, SlotCollection};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid capacity: ceiling {ceiling} is below base {base}")]
    InvalidCapacity { base: usize, ceiling: usize },

    #[error("invalid account id: {0}")]
    InvalidAccountId(#[from] std::num::ParseIntError),
}
