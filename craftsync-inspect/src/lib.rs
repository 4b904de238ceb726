//! Offline inspection of crafting cache blobs.

use craftsync_model::RecordValidator;
use craftsync_sync::{codec, merge, MergeReport};
use craftsync_types::{Capacity, CraftedItem, Dialect, Severity, SlotCollection};
use serde::Serialize;
use std::fmt::Write as _;

/// Verdict on one decoded slot.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SlotVerdict {
    pub index: usize,
    pub item_id: Option<String>,
    pub severity: Severity,
    /// The normalized record, for slots that needed repair.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repaired: Option<CraftedItem>,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub empty: usize,
    pub ok: usize,
    pub error: usize,
    pub critical: usize,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct InspectReport {
    pub slots: Vec<SlotVerdict>,
    pub summary: Summary,
}

/// Decodes an uncompressed blob and classifies every slot.
pub fn inspect_blob(text: &str, validator: &dyn RecordValidator) -> InspectReport {
    let mut summary = Summary::default();
    let slots = codec::decode(text)
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            let item_id = slot.as_ref().map(|i| i.item_id.clone());
            let (checked, severity) = validator.inspect(slot);
            match (&item_id, severity) {
                (None, _) => summary.empty += 1,
                (Some(_), Severity::Ok) => summary.ok += 1,
                (Some(_), Severity::Error) => summary.error += 1,
                (Some(_), Severity::CriticalError) => summary.critical += 1,
            }
            SlotVerdict {
                index,
                item_id,
                severity,
                repaired: checked.filter(|_| severity == Severity::Error),
            }
        })
        .collect();
    InspectReport { slots, summary }
}

/// Rewrites a blob the way a load followed by a save would: records are
/// repaired, deduplicated and capped at `capacity`, then the slots past
/// `capacity.base()` are encoded in `dialect`.
pub fn normalize_blob(
    text: &str,
    validator: &dyn RecordValidator,
    capacity: Capacity,
    dialect: Dialect,
) -> (String, MergeReport) {
    let incoming = codec::decode(text)
        .into_iter()
        .map(|slot| validator.inspect(slot))
        .collect();
    let outcome = merge(
        SlotCollection::with_empty_slots(capacity.base()),
        incoming,
        capacity,
    );
    let tail = outcome.slots.overflow_tail(capacity.base());
    (codec::encode(tail, dialect), outcome.report)
}

/// Parses a dialect name as written in sync configuration files.
pub fn parse_dialect(name: &str) -> Result<Dialect, String> {
    serde_json::from_value(serde_json::Value::String(name.to_string()))
        .map_err(|_| format!("unknown dialect {name:?} (expected legacy, dialect_a or dialect_b)"))
}

/// Human-readable rendering of a report, one line per slot.
pub fn render_report(report: &InspectReport) -> String {
    let mut out = String::new();
    for slot in &report.slots {
        let id = slot.item_id.as_deref().unwrap_or("-");
        let severity = slot.severity.to_string();
        let _ = writeln!(out, "{:>4}  {:<14}  {}", slot.index, severity, id);
    }
    let s = &report.summary;
    let _ = writeln!(
        out,
        "\n{} slots: {} ok, {} repairable, {} critical, {} empty",
        report.slots.len(),
        s.ok,
        s.error,
        s.critical,
        s.empty
    );
    out
}
