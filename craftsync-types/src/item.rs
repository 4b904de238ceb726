//! The crafted-item record.
//!
//! A crafted item is a named, customised variant of a base item the host
//! defines. The record itself is plain data: whether its fields make sense for
//! the referenced item is decided by the validator in `craftsync-model`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque extended item properties.
///
/// Keys are kept sorted so the serialized form is stable.
pub type ItemProperties = BTreeMap<String, serde_json::Value>;

/// One crafted-item record.
///
/// An empty `item_id` means "no item"; such a record is equivalent to an
/// empty slot and encodes as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CraftedItem {
    /// Name of the base item this craft is built on.
    pub item_id: String,
    /// Crafting property (e.g. "Secure", "Large").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
    /// Lock applied when the item is equipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Comma-separated color list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_spec: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    /// Item variant tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<String>,
    /// Draw-order override. Only [`crate::Dialect::DialectA`] carries it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_priority: Option<i64>,
    /// Only [`crate::Dialect::DialectB`] carries it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_properties: Option<ItemProperties>,
}

impl CraftedItem {
    /// Creates a record for the given base item with every other field unset.
    #[must_use]
    pub fn new(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            ..Self::default()
        }
    }

    /// Returns true if this record holds no item.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.item_id.is_empty()
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the crafting property.
    #[must_use]
    pub fn with_property(mut self, property_id: impl Into<String>) -> Self {
        self.property_id = Some(property_id.into());
        self
    }

    /// Sets the lock type.
    #[must_use]
    pub fn with_lock(mut self, lock_type: impl Into<String>) -> Self {
        self.lock_type = Some(lock_type.into());
        self
    }

    /// Sets the color list.
    #[must_use]
    pub fn with_color(mut self, color_spec: impl Into<String>) -> Self {
        self.color_spec = Some(color_spec.into());
        self
    }

    /// Sets the type tag.
    #[must_use]
    pub fn with_type_tag(mut self, type_tag: impl Into<String>) -> Self {
        self.type_tag = Some(type_tag.into());
        self
    }
}
