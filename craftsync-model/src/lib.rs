//! Item catalog and record validation for craftsync.
//!
//! Defines the static capability table the host exposes and the validator
//! that judges decoded crafted items against it:
//! - [`ItemCatalog`]: known items, their groups, properties and variants
//! - [`ItemDefinition`]: one entry of the catalog
//! - [`RecordValidator`]: the classify/repair seam the sync layer consumes
//! - [`CatalogValidator`]: the catalog-backed implementation
//!
//! Validation is pure: no I/O, no shared mutable state.

mod catalog;
mod validator;

pub use catalog::{
    CatalogError, CatalogResult, FieldLimits, ItemCatalog, ItemDefinition, DEFAULT_PROPERTY,
};
pub use validator::{CatalogValidator, RecordValidator};
