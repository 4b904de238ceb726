use crate::catalog::{ItemCatalog, ItemDefinition, DEFAULT_PROPERTY};
use craftsync_types::{CraftedItem, Severity};
use tracing::debug;

/// Color entry that stands for "use the asset's own color".
const DEFAULT_COLOR: &str = "Default";

/// Judges decoded crafted items and normalizes the repairable ones.
///
/// Implementations must be pure functions of the record and a static
/// capability table. The sync layer calls [`RecordValidator::inspect`] once
/// per decoded record.
pub trait RecordValidator: Send + Sync {
    /// Classifies a record. Empty slots are always [`Severity::Ok`].
    fn classify(&self, item: Option<&CraftedItem>) -> Severity;

    /// Applies the normalization an [`Severity::Error`] record needs.
    /// Must leave already-valid fields untouched.
    fn repair(&self, item: CraftedItem) -> CraftedItem;

    /// Classifies a record and repairs it when the severity calls for it.
    ///
    /// Critical records are returned unchanged; discarding them is the
    /// caller's job.
    fn inspect(&self, item: Option<CraftedItem>) -> (Option<CraftedItem>, Severity) {
        let severity = self.classify(item.as_ref());
        match severity {
            Severity::Ok | Severity::CriticalError => (item, severity),
            Severity::Error => (item.map(|i| self.repair(i)), severity),
        }
    }
}

/// A [`RecordValidator`] backed by an [`ItemCatalog`].
#[derive(Debug, Clone, Default)]
pub struct CatalogValidator {
    catalog: ItemCatalog,
}

impl CatalogValidator {
    pub fn new(catalog: ItemCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    fn classify_known(&self, item: &CraftedItem, definition: &ItemDefinition) -> Severity {
        let mut severity = Severity::Ok;

        if let Some(lock) = item.lock_type.as_deref() {
            if !definition.lockable {
                debug!(
                    "lock {} impossible on {} (group {})",
                    lock, item.item_id, definition.group
                );
                return Severity::CriticalError;
            }
            if !self.catalog.is_lock_type(lock) {
                severity = severity.worst(Severity::Error);
            }
        }

        if let Some(property) = item.property_id.as_deref() {
            if !definition.accepts_property(property) {
                severity = severity.worst(Severity::Error);
            }
        }

        if let Some(tag) = item.type_tag.as_deref() {
            if !definition.accepts_type_tag(tag) {
                severity = severity.worst(Severity::Error);
            }
        }

        let limits = self.catalog.limits();
        if exceeds(item.name.as_deref(), limits.max_name_len)
            || exceeds(item.description.as_deref(), limits.max_description_len)
        {
            severity = severity.worst(Severity::Error);
        }

        if let Some(colors) = item.color_spec.as_deref() {
            if !colors.split(',').all(is_valid_color) {
                severity = severity.worst(Severity::Error);
            }
        }

        severity
    }
}

impl RecordValidator for CatalogValidator {
    fn classify(&self, item: Option<&CraftedItem>) -> Severity {
        let Some(item) = item.filter(|i| !i.is_empty()) else {
            return Severity::Ok;
        };
        match self.catalog.get(&item.item_id) {
            Some(definition) => self.classify_known(item, definition),
            None => {
                debug!("unknown item id {}", item.item_id);
                Severity::CriticalError
            }
        }
    }

    fn repair(&self, mut item: CraftedItem) -> CraftedItem {
        let Some(definition) = self.catalog.get(&item.item_id) else {
            return item;
        };

        if item
            .lock_type
            .as_deref()
            .is_some_and(|lock| !self.catalog.is_lock_type(lock))
        {
            item.lock_type = None;
        }

        if item
            .property_id
            .as_deref()
            .is_some_and(|p| !definition.accepts_property(p))
        {
            item.property_id = Some(DEFAULT_PROPERTY.to_string());
        }

        if item
            .type_tag
            .as_deref()
            .is_some_and(|t| !definition.accepts_type_tag(t))
        {
            item.type_tag = None;
        }

        let limits = self.catalog.limits();
        item.name = item.name.map(|n| truncate_chars(n, limits.max_name_len));
        item.description = item
            .description
            .map(|d| truncate_chars(d, limits.max_description_len));

        item.color_spec = item.color_spec.map(|colors| {
            colors
                .split(',')
                .map(|c| if is_valid_color(c) { c } else { DEFAULT_COLOR })
                .collect::<Vec<_>>()
                .join(",")
        });

        item
    }
}

fn exceeds(text: Option<&str>, max: usize) -> bool {
    text.is_some_and(|t| t.chars().count() > max)
}

fn truncate_chars(text: String, max: usize) -> String {
    if text.chars().count() <= max {
        text
    } else {
        text.chars().take(max).collect()
    }
}

/// `Default`, `#RGB` or `#RRGGBB`.
fn is_valid_color(color: &str) -> bool {
    if color == DEFAULT_COLOR {
        return true;
    }
    match color.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}
