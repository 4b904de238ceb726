//! Folds decoded records into a slot collection.
//!
//! Incoming records are appended after the existing slots in order. Records
//! whose canonical form is already present are dropped; critical records
//! leave an empty placeholder behind. When the ceiling is reached, empty
//! slots are compacted away (overflow tail first, then everywhere) before
//! the remaining incoming records are given up on. Existing content is never
//! evicted.

use crate::codec::canonical_form;
use craftsync_types::{Capacity, CraftedItem, Severity, SlotCollection};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Counters describing what a merge did with its input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Records appended to the collection.
    pub kept: usize,
    /// Kept records that needed normalization.
    pub repaired: usize,
    /// Records dropped because an identical record was already present.
    pub duplicates: usize,
    /// Unsalvageable records replaced by an empty placeholder.
    pub critical: usize,
    /// Empty placeholders appended.
    pub placeholders: usize,
    /// Records discarded because the ceiling was reached.
    pub overflow: usize,
    /// Empty slots removed to make room.
    pub compacted: usize,
}

/// Result of [`merge`].
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub slots: SlotCollection,
    /// True if a record classified [`Severity::Error`] was newly kept, which
    /// means the remote copy is stale and must be rewritten.
    pub repaired: bool,
    pub report: MergeReport,
}

/// Merges `incoming` into `existing` without exceeding `capacity.ceiling()`.
pub fn merge(
    existing: SlotCollection,
    incoming: Vec<(Option<CraftedItem>, Severity)>,
    capacity: Capacity,
) -> MergeOutcome {
    let base = capacity.base();
    let ceiling = capacity.ceiling();
    let mut report = MergeReport::default();
    let mut slots = existing;
    if slots.len() > ceiling {
        shrink_to_ceiling(&mut slots, capacity, &mut report);
    }

    let mut seen: HashSet<String> = slots.items().map(canonical_form).collect();
    let mut repaired = false;
    let mut entries = incoming.into_iter();

    while let Some((item, severity)) = entries.next() {
        let slot = match item.filter(|i| !i.is_empty()) {
            None => None,
            Some(item) => match severity {
                Severity::CriticalError => {
                    warn!("discarding unsalvageable crafted item {}", item.item_id);
                    report.critical += 1;
                    None
                }
                Severity::Error | Severity::Ok => {
                    if !seen.insert(canonical_form(&item)) {
                        debug!("skipping duplicate crafted item {}", item.item_id);
                        report.duplicates += 1;
                        continue;
                    }
                    Some(item)
                }
            },
        };

        if slots.len() >= ceiling {
            if slot.is_none() {
                continue;
            }
            if slots.has_empty_from(base) {
                report.compacted += slots.compact_from(base);
            } else if slots.has_empty_from(0) {
                report.compacted += slots.compact_from(0);
            } else {
                report.overflow += 1 + entries.by_ref().filter(|(i, _)| i.is_some()).count();
                warn!(
                    "crafted item capacity of {} exhausted, discarding {} incoming records",
                    ceiling, report.overflow
                );
                break;
            }
        }

        match slot {
            Some(item) => {
                if severity == Severity::Error {
                    info!("keeping repaired crafted item {}", item.item_id);
                    repaired = true;
                    report.repaired += 1;
                }
                report.kept += 1;
                slots.push(Some(item));
            }
            None => {
                report.placeholders += 1;
                slots.push(None);
            }
        }
    }

    MergeOutcome {
        slots,
        repaired,
        report,
    }
}

/// Brings an over-long collection back under the ceiling: empty tail slots
/// go first, then any empty slot, then whatever sits past the ceiling.
fn shrink_to_ceiling(slots: &mut SlotCollection, capacity: Capacity, report: &mut MergeReport) {
    report.compacted += slots.compact_from(capacity.base());
    if slots.len() > capacity.ceiling() {
        report.compacted += slots.compact_from(0);
    }
    if slots.len() > capacity.ceiling() {
        warn!(
            "existing collection holds {} slots, truncating to {}",
            slots.len(),
            capacity.ceiling()
        );
        slots.truncate(capacity.ceiling());
    }
}
