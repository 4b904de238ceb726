//! Ordered, nullable slot collections and their capacity bounds.
//!
//! Indices `[0, base)` mirror the slots the remote store supports natively.
//! Indices `[base, ceiling)` form the overflow tail, which only exists in the
//! locally cached blob.

use crate::{CraftedItem, Error, Result};
use serde::{Deserialize, Serialize};

/// Capacity bounds of a slot collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capacity {
    base: usize,
    ceiling: usize,
}

impl Capacity {
    /// Creates capacity bounds. Fails if `ceiling < base`.
    pub fn new(base: usize, ceiling: usize) -> Result<Self> {
        if ceiling < base {
            return Err(Error::InvalidCapacity { base, ceiling });
        }
        Ok(Self { base, ceiling })
    }

    /// Number of slots the remote store supports natively.
    #[must_use]
    pub const fn base(&self) -> usize {
        self.base
    }

    /// Hard upper bound on the collection length.
    #[must_use]
    pub const fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Number of slots that can only live in the overflow tail.
    #[must_use]
    pub const fn overflow_len(&self) -> usize {
        self.ceiling - self.base
    }
}

/// An ordered sequence of slots; `None` is an empty slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotCollection(Vec<Option<CraftedItem>>);

impl SlotCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Creates a collection of `len` empty slots.
    #[must_use]
    pub fn with_empty_slots(len: usize) -> Self {
        Self(vec![None; len])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the item in slot `index`, if the slot exists and is filled.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CraftedItem> {
        self.0.get(index).and_then(Option::as_ref)
    }

    /// Replaces slot `index`, returning the previous occupant.
    ///
    /// Slots between the current end and `index` are created empty.
    pub fn set(&mut self, index: usize, item: Option<CraftedItem>) -> Option<CraftedItem> {
        if index >= self.0.len() {
            self.0.resize(index + 1, None);
        }
        std::mem::replace(&mut self.0[index], item)
    }

    /// Appends a slot.
    pub fn push(&mut self, item: Option<CraftedItem>) {
        self.0.push(item);
    }

    /// Extends the collection with empty slots until it is at least `len`
    /// long. Never shrinks.
    pub fn pad_to(&mut self, len: usize) {
        if self.0.len() < len {
            self.0.resize(len, None);
        }
    }

    /// Drops every slot at or beyond `len`.
    pub fn truncate(&mut self, len: usize) {
        self.0.truncate(len);
    }

    /// The native slots, `[0, base)`, clipped to the current length.
    #[must_use]
    pub fn native(&self, base: usize) -> &[Option<CraftedItem>] {
        &self.0[..base.min(self.0.len())]
    }

    /// The overflow tail, `[base, len)`. Empty when the collection is not
    /// longer than `base`.
    #[must_use]
    pub fn overflow_tail(&self, base: usize) -> &[Option<CraftedItem>] {
        &self.0[base.min(self.0.len())..]
    }

    /// Returns true if an empty slot exists at or after `start`.
    #[must_use]
    pub fn has_empty_from(&self, start: usize) -> bool {
        self.0.iter().skip(start).any(Option::is_none)
    }

    /// Removes empty slots at or after `start`, leaving earlier slots in
    /// place. Returns how many slots were removed.
    pub fn compact_from(&mut self, start: usize) -> usize {
        let before = self.0.len();
        let mut index = 0;
        self.0.retain(|slot| {
            let keep = index < start || slot.is_some();
            index += 1;
            keep
        });
        before - self.0.len()
    }

    /// Iterates over every slot in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Option<CraftedItem>> {
        self.0.iter()
    }

    /// Iterates over filled slots only.
    pub fn items(&self) -> impl Iterator<Item = &CraftedItem> {
        self.0.iter().flatten()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Option<CraftedItem>] {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<Option<CraftedItem>> {
        self.0
    }
}

impl From<Vec<Option<CraftedItem>>> for SlotCollection {
    fn from(slots: Vec<Option<CraftedItem>>) -> Self {
        Self(slots)
    }
}

impl FromIterator<Option<CraftedItem>> for SlotCollection {
    fn from_iter<I: IntoIterator<Item = Option<CraftedItem>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for SlotCollection {
    type Item = Option<CraftedItem>;
    type IntoIter = std::vec::IntoIter<Option<CraftedItem>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a SlotCollection {
    type Item = &'a Option<CraftedItem>;
    type IntoIter = std::slice::Iter<'a, Option<CraftedItem>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
