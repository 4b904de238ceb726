use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use thiserror::Error;

/// Property every item accepts, and the one invalid properties are reset to.
pub const DEFAULT_PROPERTY: &str = "Normal";

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog JSON was malformed.
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two definitions share an item id.
    #[error("duplicate item definition: {0}")]
    DuplicateItem(String),
}

/// Describes one base item a crafted record may reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub item_id: String,
    /// Body group the item is worn on (e.g. "ItemArms").
    pub group: String,
    /// Crafting properties accepted besides [`DEFAULT_PROPERTY`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<String>,
    /// Whether the item's group can hold a lock at all.
    #[serde(default)]
    pub lockable: bool,
    /// Variant tags the item declares. Empty means the item has no variants.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[serde(alias = "types")]
    pub type_tags: Vec<String>,
}

impl ItemDefinition {
    /// Shorthand for an item without properties, locks or variants.
    pub fn new(item_id: &str, group: &str) -> Self {
        Self {
            item_id: item_id.into(),
            group: group.into(),
            properties: Vec::new(),
            lockable: false,
            type_tags: Vec::new(),
        }
    }

    /// Marks the item as lockable.
    #[must_use]
    pub fn lockable(mut self) -> Self {
        self.lockable = true;
        self
    }

    /// Adds accepted crafting properties.
    #[must_use]
    pub fn with_properties(mut self, properties: &[&str]) -> Self {
        self.properties.extend(properties.iter().map(|p| (*p).to_string()));
        self
    }

    /// Adds declared variant tags.
    #[must_use]
    pub fn with_type_tags(mut self, tags: &[&str]) -> Self {
        self.type_tags.extend(tags.iter().map(|t| (*t).to_string()));
        self
    }

    /// Returns true if `property` may be set on this item.
    pub fn accepts_property(&self, property: &str) -> bool {
        property == DEFAULT_PROPERTY || self.properties.iter().any(|p| p == property)
    }

    /// Returns true if `tag` is one of the item's variants.
    pub fn accepts_type_tag(&self, tag: &str) -> bool {
        self.type_tags.iter().any(|t| t == tag)
    }
}

/// Length limits on free-text fields, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldLimits {
    pub max_name_len: usize,
    pub max_description_len: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            max_name_len: 30,
            max_description_len: 200,
        }
    }
}

/// On-disk representation of a catalog.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    items: Vec<ItemDefinition>,
    #[serde(default)]
    lock_types: Vec<String>,
    #[serde(default)]
    limits: FieldLimits,
}

/// The static capability table of the host.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: HashMap<String, ItemDefinition>,
    lock_types: BTreeSet<String>,
    limits: FieldLimits,
}

impl ItemCatalog {
    /// Creates an empty catalog with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a catalog from JSON of the form
    /// `{"items": [...], "lock_types": [...], "limits": {...}}`.
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let mut catalog = Self {
            items: HashMap::with_capacity(file.items.len()),
            lock_types: file.lock_types.into_iter().collect(),
            limits: file.limits,
        };
        for definition in file.items {
            if catalog.items.contains_key(&definition.item_id) {
                return Err(CatalogError::DuplicateItem(definition.item_id));
            }
            catalog.items.insert(definition.item_id.clone(), definition);
        }
        Ok(catalog)
    }

    /// Reads and parses a catalog JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serializes the catalog back to JSON, items sorted by id.
    pub fn to_json(&self) -> CatalogResult<String> {
        let mut items: Vec<ItemDefinition> = self.items.values().cloned().collect();
        items.sort_by(|a, b| a.item_id.cmp(&b.item_id));
        let file = CatalogFile {
            items,
            lock_types: self.lock_types.iter().cloned().collect(),
            limits: self.limits,
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Adds or replaces an item definition.
    #[must_use]
    pub fn with_item(mut self, definition: ItemDefinition) -> Self {
        self.items.insert(definition.item_id.clone(), definition);
        self
    }

    /// Registers a known lock type.
    #[must_use]
    pub fn with_lock_type(mut self, lock_type: &str) -> Self {
        self.lock_types.insert(lock_type.to_string());
        self
    }

    /// Overrides the free-text limits.
    #[must_use]
    pub fn with_limits(mut self, limits: FieldLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Looks up an item definition.
    pub fn get(&self, item_id: &str) -> Option<&ItemDefinition> {
        self.items.get(item_id)
    }

    /// Returns true if `lock_type` is a known lock.
    pub fn is_lock_type(&self, lock_type: &str) -> bool {
        self.lock_types.contains(lock_type)
    }

    pub fn limits(&self) -> FieldLimits {
        self.limits
    }

    /// Number of item definitions.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
