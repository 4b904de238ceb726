//! Delimiter-separated record codec.
//!
//! Wire layout of one record (fields joined by [`FIELD_DELIMITER`]):
//!
//! ```text
//! item_id ¶ property_id ¶ lock_type ¶ name ¶ description ¶ color_spec ¶ T|"" ¶ type_tag [¶ trailer]
//! ```
//!
//! The trailer depends on the [`Dialect`]. Records are joined by
//! [`RECORD_DELIMITER`]; an empty record is an empty slot.
//!
//! Decoding is permissive and dialect-agnostic: it reads whatever trailing
//! fields are present and never fails. Judging the result is the validator's
//! job.

use craftsync_types::{CraftedItem, Dialect, ItemProperties};
use tracing::debug;

/// Separates the fields of one record.
pub const FIELD_DELIMITER: char = '¶';

/// Separates records.
pub const RECORD_DELIMITER: char = '§';

/// Value of the private field when set.
const PRIVATE_FLAG: &str = "T";

/// What a delimiter inside a text field is replaced with.
const SUBSTITUTE: char = ' ';

const ID: usize = 0;
const PROPERTY: usize = 1;
const LOCK: usize = 2;
const NAME: usize = 3;
const DESCRIPTION: usize = 4;
const COLOR: usize = 5;
const PRIVATE: usize = 6;
const TYPE_TAG: usize = 7;
const OVERRIDE_PRIORITY: usize = 8;
const EXTENDED_PROPERTIES: usize = 9;

/// Encodes one slot. Empty slots and records without an item id encode as
/// the empty string.
///
/// Delimiter characters inside text fields are replaced with a space, which
/// is lossy. Fields the dialect does not carry are omitted.
pub fn encode_item(item: Option<&CraftedItem>, dialect: Dialect) -> String {
    let Some(item) = item.filter(|i| !i.is_empty()) else {
        return String::new();
    };

    let mut fields = vec![
        sanitize(&item.item_id),
        sanitize_opt(item.property_id.as_deref()),
        sanitize_opt(item.lock_type.as_deref()),
        sanitize_opt(item.name.as_deref()),
        sanitize_opt(item.description.as_deref()),
        sanitize_opt(item.color_spec.as_deref()),
        if item.is_private { PRIVATE_FLAG.to_string() } else { String::new() },
        sanitize_opt(item.type_tag.as_deref()),
    ];

    match dialect {
        Dialect::Legacy => {}
        Dialect::DialectA => {
            fields.push(item.override_priority.map(|p| p.to_string()).unwrap_or_default());
        }
        Dialect::DialectB => {
            fields.push(String::new());
            fields.push(encode_properties(item.extended_properties.as_ref()));
        }
    }

    let mut out = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(FIELD_DELIMITER);
        }
        out.push_str(field);
    }
    out
}

/// Encodes a run of slots, keeping empty slots as empty records so positions
/// survive a round trip.
pub fn encode(slots: &[Option<CraftedItem>], dialect: Dialect) -> String {
    let mut out = String::new();
    for (i, slot) in slots.iter().enumerate() {
        if i > 0 {
            out.push(RECORD_DELIMITER);
        }
        out.push_str(&encode_item(slot.as_ref(), dialect));
    }
    out
}

/// Decodes a run of slots.
///
/// The empty string decodes to no slots at all, so a run made of a single
/// empty slot does not survive a round trip.
pub fn decode(text: &str) -> Vec<Option<CraftedItem>> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split(RECORD_DELIMITER).map(decode_item).collect()
}

/// Decodes one record. Missing fields default; malformed trailing fields
/// are dropped rather than failing the record.
pub fn decode_item(record: &str) -> Option<CraftedItem> {
    if record.is_empty() {
        return None;
    }
    let fields: Vec<&str> = record.split(FIELD_DELIMITER).collect();
    let text = |index: usize| -> Option<String> {
        fields
            .get(index)
            .filter(|f| !f.is_empty())
            .map(|f| (*f).to_string())
    };

    let item_id = text(ID)?;
    Some(CraftedItem {
        item_id,
        property_id: text(PROPERTY),
        lock_type: text(LOCK),
        name: text(NAME),
        description: text(DESCRIPTION),
        color_spec: text(COLOR),
        is_private: fields.get(PRIVATE).is_some_and(|f| *f == PRIVATE_FLAG),
        type_tag: text(TYPE_TAG),
        override_priority: text(OVERRIDE_PRIORITY).and_then(|p| decode_priority(&p)),
        extended_properties: text(EXTENDED_PROPERTIES).and_then(|p| decode_properties(&p)),
    })
}

/// Dialect-independent, field-order-stable serialization of a record. Only
/// used to compare records for deduplication.
///
/// Empty text fields count as unset, matching how they encode on the wire.
pub fn canonical_form(item: &CraftedItem) -> String {
    let mut item = item.clone();
    for field in [
        &mut item.property_id,
        &mut item.lock_type,
        &mut item.name,
        &mut item.description,
        &mut item.color_spec,
        &mut item.type_tag,
    ] {
        if field.as_deref() == Some("") {
            *field = None;
        }
    }
    // Struct fields serialize in declaration order and the property map is
    // sorted, so equal records always produce equal strings.
    serde_json::to_string(&item).unwrap_or_else(|_| format!("{item:?}"))
}

fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| if c == FIELD_DELIMITER || c == RECORD_DELIMITER { SUBSTITUTE } else { c })
        .collect()
}

fn sanitize_opt(value: Option<&str>) -> String {
    value.map(sanitize).unwrap_or_default()
}

/// JSON for the extended properties, with delimiters written as `\u`
/// escapes. Delimiters can only occur inside JSON strings, where the escape
/// is equivalent.
fn encode_properties(properties: Option<&ItemProperties>) -> String {
    let Some(properties) = properties else {
        return String::new();
    };
    match serde_json::to_string(properties) {
        Ok(json) => json
            .replace(FIELD_DELIMITER, "\\u00b6")
            .replace(RECORD_DELIMITER, "\\u00a7"),
        Err(e) => {
            debug!("dropping unserializable extended properties: {}", e);
            String::new()
        }
    }
}

fn decode_priority(field: &str) -> Option<i64> {
    match field.trim().parse() {
        Ok(priority) => Some(priority),
        Err(_) => {
            debug!("ignoring malformed override priority {:?}", field);
            None
        }
    }
}

fn decode_properties(field: &str) -> Option<ItemProperties> {
    match serde_json::from_str(field) {
        Ok(properties) => Some(properties),
        Err(e) => {
            debug!("ignoring malformed extended properties: {}", e);
            None
        }
    }
}
