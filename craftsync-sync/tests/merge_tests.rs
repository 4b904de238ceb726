use craftsync_sync::codec::{canonical_form, decode_item};
use craftsync_sync::{merge, MergeReport};
use craftsync_types::{Capacity, CraftedItem, Severity, SlotCollection};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::HashSet;

fn cap(base: usize, ceiling: usize) -> Capacity {
    Capacity::new(base, ceiling).unwrap()
}

fn ok(id: &str) -> (Option<CraftedItem>, Severity) {
    (Some(CraftedItem::new(id)), Severity::Ok)
}

fn item(id: &str) -> Option<CraftedItem> {
    Some(CraftedItem::new(id))
}

fn ids(slots: &SlotCollection) -> Vec<Option<&str>> {
    slots
        .iter()
        .map(|s| s.as_ref().map(|i| i.item_id.as_str()))
        .collect()
}

// ── scenarios ────────────────────────────────────────────────────

#[test]
fn new_item_is_appended_after_native_slots() {
    let outcome = merge(SlotCollection::with_empty_slots(40), vec![ok("Rope")], cap(40, 100));

    assert_eq!(outcome.slots.len(), 41);
    assert_eq!(outcome.slots.get(40), Some(&CraftedItem::new("Rope")));
    assert!(!outcome.repaired);
    assert_eq!(outcome.report.kept, 1);
}

#[test]
fn duplicate_of_existing_item_is_dropped() {
    let mut existing = SlotCollection::with_empty_slots(40);
    existing.set(3, item("Rope"));

    let outcome = merge(existing.clone(), vec![ok("Rope")], cap(40, 100));

    assert_eq!(outcome.slots, existing);
    assert!(!outcome.repaired);
    assert_eq!(outcome.report.duplicates, 1);
}

#[test]
fn blank_text_fields_match_their_decoded_twin() {
    let mut existing = SlotCollection::with_empty_slots(40);
    existing.set(3, Some(CraftedItem::new("Rope").with_name("").with_color("")));
    let decoded = decode_item("Rope¶¶¶¶¶¶¶").unwrap();
    assert_eq!(decoded.name, None);

    let outcome = merge(existing.clone(), vec![(Some(decoded), Severity::Ok)], cap(40, 100));

    assert_eq!(outcome.slots, existing);
    assert_eq!(outcome.report.duplicates, 1);
}

#[test]
fn repaired_item_is_kept_and_flagged() {
    let incoming = vec![(item("HempRope"), Severity::Error)];
    let outcome = merge(SlotCollection::with_empty_slots(2), incoming, cap(2, 10));

    assert_eq!(ids(&outcome.slots), vec![None, None, Some("HempRope")]);
    assert!(outcome.repaired);
    assert_eq!(outcome.report.repaired, 1);
}

#[test]
fn full_collection_discards_new_item() {
    let existing: SlotCollection = ["A", "B", "C", "D"].iter().map(|id| item(id)).collect();

    let outcome = merge(existing.clone(), vec![ok("Rope")], cap(2, 4));

    assert_eq!(outcome.slots, existing);
    assert_eq!(outcome.report.overflow, 1);
    assert_eq!(outcome.report.kept, 0);
}

// ── severities ───────────────────────────────────────────────────

#[test]
fn critical_item_leaves_placeholder() {
    let incoming = vec![
        (item("Teleporter"), Severity::CriticalError),
        ok("Rope"),
    ];
    let outcome = merge(SlotCollection::new(), incoming, cap(0, 10));

    assert_eq!(ids(&outcome.slots), vec![None, Some("Rope")]);
    assert!(!outcome.repaired);
    assert_eq!(outcome.report.critical, 1);
}

#[test]
fn repaired_duplicate_does_not_flag_repair() {
    let existing: SlotCollection = vec![item("Rope")].into();
    let incoming = vec![(item("Rope"), Severity::Error)];

    let outcome = merge(existing, incoming, cap(1, 10));

    assert!(!outcome.repaired);
    assert_eq!(outcome.slots.len(), 1);
}

#[test]
fn incoming_duplicates_collapse_to_first() {
    let incoming = vec![ok("Rope"), ok("Gag"), ok("Rope")];
    let outcome = merge(SlotCollection::new(), incoming, cap(0, 10));

    assert_eq!(ids(&outcome.slots), vec![Some("Rope"), Some("Gag")]);
    assert_eq!(outcome.report.duplicates, 1);
}

#[test]
fn items_differing_in_one_field_are_both_kept() {
    let incoming = vec![
        (Some(CraftedItem::new("Rope").with_name("a")), Severity::Ok),
        (Some(CraftedItem::new("Rope").with_name("b")), Severity::Ok),
    ];
    let outcome = merge(SlotCollection::new(), incoming, cap(0, 10));
    assert_eq!(outcome.slots.len(), 2);
}

#[test]
fn empty_slots_are_kept_as_placeholders() {
    let incoming = vec![ok("Rope"), (None, Severity::Ok), ok("Gag")];
    let outcome = merge(SlotCollection::new(), incoming, cap(0, 10));

    assert_eq!(ids(&outcome.slots), vec![Some("Rope"), None, Some("Gag")]);
    assert_eq!(outcome.report.placeholders, 1);
}

#[test]
fn empty_input_changes_nothing() {
    let existing: SlotCollection = vec![item("Rope"), None].into();
    let outcome = merge(existing.clone(), Vec::new(), cap(2, 4));

    assert_eq!(outcome.slots, existing);
    assert_eq!(outcome.report, MergeReport::default());
}

// ── capacity ─────────────────────────────────────────────────────

#[test]
fn tail_gaps_are_compacted_first() {
    let existing: SlotCollection = vec![None, item("A"), item("B"), None].into();

    let outcome = merge(existing, vec![ok("Rope")], cap(2, 4));

    // The native gap at index 0 survives.
    assert_eq!(ids(&outcome.slots), vec![None, Some("A"), Some("B"), Some("Rope")]);
    assert_eq!(outcome.report.compacted, 1);
}

#[test]
fn native_gaps_are_compacted_when_tail_is_full() {
    let existing: SlotCollection = vec![None, item("A"), item("B"), item("C")].into();

    let outcome = merge(existing, vec![ok("Rope")], cap(2, 4));

    assert_eq!(ids(&outcome.slots), vec![Some("A"), Some("B"), Some("C"), Some("Rope")]);
    assert_eq!(outcome.report.compacted, 1);
}

#[test]
fn placeholders_are_skipped_when_full() {
    let existing: SlotCollection = vec![item("A"), None].into();
    let incoming = vec![(None, Severity::Ok), (item("X"), Severity::CriticalError)];

    let outcome = merge(existing.clone(), incoming, cap(1, 2));

    assert_eq!(outcome.slots, existing);
    assert_eq!(outcome.report.placeholders, 0);
    assert_eq!(outcome.report.critical, 1);
}

#[test]
fn overflow_counts_every_remaining_item() {
    let existing: SlotCollection = vec![item("A"), item("B")].into();
    let incoming = vec![ok("C"), (None, Severity::Ok), ok("D"), ok("E")];

    let outcome = merge(existing, incoming, cap(1, 2));

    assert_eq!(outcome.report.overflow, 3);
    assert_eq!(outcome.slots.len(), 2);
}

#[test]
fn repaired_item_lost_to_overflow_does_not_flag_repair() {
    let existing: SlotCollection = vec![item("A"), item("B")].into();
    let incoming = vec![(item("C"), Severity::Error)];

    let outcome = merge(existing, incoming, cap(1, 2));

    assert!(!outcome.repaired);
    assert_eq!(outcome.report.overflow, 1);
}

#[test]
fn oversized_existing_collection_is_shrunk() {
    let existing: SlotCollection = vec![item("A"), None, item("B"), None, item("C"), item("D")].into();

    let outcome = merge(existing, Vec::new(), cap(2, 3));

    assert_eq!(ids(&outcome.slots), vec![Some("A"), Some("B"), Some("C")]);
}

// ── properties ───────────────────────────────────────────────────

fn pool_item() -> impl Strategy<Value = CraftedItem> {
    (
        prop::sample::select(vec!["Rope", "Gag", "Cuffs", "Collar"]),
        proptest::option::of(prop::sample::select(vec!["a", "b"])),
    )
        .prop_map(|(id, name)| {
            let item = CraftedItem::new(id);
            match name {
                Some(name) => item.with_name(name),
                None => item,
            }
        })
}

fn entry() -> impl Strategy<Value = (Option<CraftedItem>, Severity)> {
    prop_oneof![
        4 => pool_item().prop_map(|i| (Some(i), Severity::Ok)),
        2 => pool_item().prop_map(|i| (Some(i), Severity::Error)),
        1 => "[0-9]{1,3}".prop_map(|n| (Some(CraftedItem::new(format!("Bad{n}"))), Severity::CriticalError)),
        1 => Just((None, Severity::Ok)),
    ]
}

fn existing_slots() -> impl Strategy<Value = SlotCollection> {
    proptest::collection::vec(proptest::option::of(pool_item()), 0..10).prop_map(|slots| {
        let mut seen = HashSet::new();
        slots
            .into_iter()
            .map(|slot| slot.filter(|i| seen.insert(canonical_form(i))))
            .collect()
    })
}

fn capacity_bounds() -> impl Strategy<Value = Capacity> {
    (0usize..6, 0usize..8).prop_map(|(base, extra)| cap(base, base + extra))
}

proptest! {
    #[test]
    fn never_exceeds_ceiling(
        existing in existing_slots(),
        incoming in proptest::collection::vec(entry(), 0..20),
        capacity in capacity_bounds(),
    ) {
        let outcome = merge(existing, incoming, capacity);
        prop_assert!(outcome.slots.len() <= capacity.ceiling());
    }

    #[test]
    fn kept_items_are_unique(
        existing in existing_slots(),
        incoming in proptest::collection::vec(entry(), 0..20),
        capacity in capacity_bounds(),
    ) {
        let outcome = merge(existing, incoming, capacity);
        let mut seen = HashSet::new();
        for item in outcome.slots.items() {
            prop_assert!(seen.insert(canonical_form(item)), "duplicate {:?}", item);
        }
    }

    #[test]
    fn critical_items_never_survive(
        existing in existing_slots(),
        incoming in proptest::collection::vec(entry(), 0..20),
        capacity in capacity_bounds(),
    ) {
        let outcome = merge(existing, incoming, capacity);
        prop_assert!(outcome.slots.items().all(|i| !i.item_id.starts_with("Bad")));
    }

    #[test]
    fn merging_twice_needs_no_repair(
        existing in existing_slots(),
        incoming in proptest::collection::vec(entry(), 0..20),
        capacity in capacity_bounds(),
    ) {
        let first = merge(existing, incoming.clone(), capacity);
        let second = merge(first.slots, incoming, capacity);
        prop_assert!(!second.repaired);
    }

    #[test]
    fn existing_items_are_never_evicted(
        existing in existing_slots(),
        incoming in proptest::collection::vec(entry(), 0..20),
        extra in 0usize..8,
    ) {
        // A ceiling at least as long as the input keeps every existing item.
        let capacity = cap(existing.len(), existing.len() + extra);
        let before: Vec<String> = existing.items().map(canonical_form).collect();
        let outcome = merge(existing, incoming, capacity);
        let after: HashSet<String> = outcome.slots.items().map(canonical_form).collect();
        for form in before {
            prop_assert!(after.contains(&form));
        }
    }
}
