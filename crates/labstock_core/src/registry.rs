//! Identity registry for top-level items.
//!
//! # Responsibility
//! - Allocate stable, monotonically increasing base-36 IDs.
//! - Track the set of live registered IDs in lockstep with the owning
//!   item sequence.
//!
//! # Invariants
//! - IDs are assigned once and never reused, regardless of deletions.
//! - The entry set equals the set of live registered items; a stamped
//!   item that was removed keeps its ID but loses its entry.
//! - Re-registering a stamped item restores its entry without touching
//!   the allocation counter.

use crate::model::item::Item;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Stable item identifier: the base-36 rendering of an allocation
/// serial.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub(crate) fn from_serial(serial: u64) -> Self {
        Self(encode_base36(serial))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Allocation serial this ID encodes, or `None` for a string that
    /// is not a canonical lowercase base-36 rendering.
    pub fn serial(&self) -> Option<u64> {
        decode_base36(&self.0)
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Renders a serial in lowercase base 36.
pub fn encode_base36(mut value: u64) -> String {
    let mut digits = Vec::new();
    loop {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
        if value == 0 {
            break;
        }
    }
    digits.reverse();
    // Digits are drawn from an ASCII table, so the bytes are valid UTF-8.
    String::from_utf8(digits).unwrap_or_default()
}

/// Parses a canonical lowercase base-36 rendering back to its serial.
pub fn decode_base36(text: &str) -> Option<u64> {
    if text.is_empty() || text.len() > 1 && text.starts_with('0') {
        return None;
    }
    if !text.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()) {
        return None;
    }
    u64::from_str_radix(text, 36).ok()
}

/// Registry allocation and bookkeeping errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The `u64` allocation counter is spent; no further IDs exist.
    CounterExhausted,
    /// A live entry already exists for this ID.
    DuplicateId(ItemId),
    /// The item carries an ID with no live entry.
    NotRegistered(ItemId),
    /// The item was never stamped with an ID.
    UnstampedItem,
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CounterExhausted => write!(f, "identity counter exhausted"),
            Self::DuplicateId(id) => write!(f, "item id already registered: {id}"),
            Self::NotRegistered(id) => write!(f, "item id not registered: {id}"),
            Self::UnstampedItem => write!(f, "item carries no id"),
        }
    }
}

impl Error for RegistryError {}

/// ID bookkeeping for one ordered item sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityRegistry {
    entries: BTreeMap<ItemId, u64>,
    next_serial: u64,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a registry from persisted parts.
    ///
    /// Used by snapshot loading; entries come from the live items and
    /// must already satisfy the lockstep invariant.
    pub(crate) fn from_parts(
        next_serial: u64,
        entries: impl IntoIterator<Item = (ItemId, u64)>,
    ) -> Self {
        Self {
            entries: entries.into_iter().collect(),
            next_serial,
        }
    }

    /// Registers an item, allocating an ID when it has none.
    ///
    /// A stamped item (re-inserted by redo or delete-undo) gets its
    /// entry restored and the counter is left untouched, so IDs stay
    /// stable across undo/redo round trips.
    pub(crate) fn register(&mut self, item: &mut Item) -> Result<ItemId, RegistryError> {
        if let Some(id) = item.id() {
            let serial = id.serial().ok_or_else(|| RegistryError::NotRegistered(id.clone()))?;
            if self.entries.contains_key(id) {
                return Err(RegistryError::DuplicateId(id.clone()));
            }
            self.entries.insert(id.clone(), serial);
            return Ok(id.clone());
        }

        let serial = self.next_serial;
        self.next_serial = serial.checked_add(1).ok_or(RegistryError::CounterExhausted)?;
        let id = ItemId::from_serial(serial);
        if self.entries.contains_key(&id) {
            return Err(RegistryError::DuplicateId(id));
        }
        item.stamp_id(id.clone());
        self.entries.insert(id.clone(), serial);
        Ok(id)
    }

    /// Removes the entry keyed by the item's ID.
    ///
    /// The ID itself is never renumbered or reclaimed.
    pub(crate) fn deregister(&mut self, item: &Item) -> Result<(), RegistryError> {
        let id = item.id().ok_or(RegistryError::UnstampedItem)?;
        self.entries
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RegistryError::NotRegistered(id.clone()))
    }

    /// True when a live entry exists for this ID.
    pub fn contains(&self, id: &ItemId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Live IDs in lexicographic order.
    pub fn ids(&self) -> Vec<ItemId> {
        self.entries.keys().cloned().collect()
    }

    /// Serial the next allocation will use.
    pub fn next_serial(&self) -> u64 {
        self.next_serial
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_base36, encode_base36, IdentityRegistry, ItemId, RegistryError};
    use crate::model::item::Item;

    #[test]
    fn base36_encodes_lowercase_and_round_trips() {
        assert_eq!(encode_base36(0), "0");
        assert_eq!(encode_base36(35), "z");
        assert_eq!(encode_base36(36), "10");
        assert_eq!(encode_base36(46655), "zzz");
        for value in [0, 1, 35, 36, 12345, u64::MAX] {
            assert_eq!(decode_base36(&encode_base36(value)), Some(value));
        }
    }

    #[test]
    fn decode_rejects_non_canonical_text() {
        assert_eq!(decode_base36(""), None);
        assert_eq!(decode_base36("01"), None);
        assert_eq!(decode_base36("A1"), None);
        assert_eq!(decode_base36("-3"), None);
    }

    #[test]
    fn register_allocates_monotonic_ids() {
        let mut registry = IdentityRegistry::new();
        let mut first = Item::new("first");
        let mut second = Item::new("second");

        let id_a = registry.register(&mut first).unwrap();
        let id_b = registry.register(&mut second).unwrap();
        assert_eq!(id_a.as_str(), "0");
        assert_eq!(id_b.as_str(), "1");
        assert!(id_a.serial() < id_b.serial());
        assert_eq!(registry.next_serial(), 2);
    }

    #[test]
    fn deleted_ids_are_never_reused() {
        let mut registry = IdentityRegistry::new();
        let mut first = Item::new("first");
        registry.register(&mut first).unwrap();
        registry.deregister(&first).unwrap();

        let mut second = Item::new("second");
        let id = registry.register(&mut second).unwrap();
        assert_eq!(id.as_str(), "1");
        assert!(!registry.contains(first.id().unwrap()));
    }

    #[test]
    fn reregistering_a_stamped_item_keeps_its_id_and_counter() {
        let mut registry = IdentityRegistry::new();
        let mut item = Item::new("stable");
        let id = registry.register(&mut item).unwrap();
        registry.deregister(&item).unwrap();

        let counter_before = registry.next_serial();
        let restored = registry.register(&mut item).unwrap();
        assert_eq!(restored, id);
        assert_eq!(registry.next_serial(), counter_before);
    }

    #[test]
    fn duplicate_live_registration_is_rejected() {
        let mut registry = IdentityRegistry::new();
        let mut item = Item::new("dup");
        registry.register(&mut item).unwrap();
        let err = registry.register(&mut item.clone()).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateId(_)));
    }

    #[test]
    fn deregister_requires_a_live_entry() {
        let mut registry = IdentityRegistry::new();
        let unstamped = Item::new("ghost");
        assert_eq!(
            registry.deregister(&unstamped),
            Err(RegistryError::UnstampedItem)
        );

        let mut item = Item::new("once");
        registry.register(&mut item).unwrap();
        registry.deregister(&item).unwrap();
        let err = registry.deregister(&item).unwrap_err();
        assert!(matches!(err, RegistryError::NotRegistered(id) if &id == item.id().unwrap()));
    }

    #[test]
    fn from_parts_restores_counter_and_entries() {
        let id = ItemId::from_serial(7);
        let registry = IdentityRegistry::from_parts(9, [(id.clone(), 7)]);
        assert!(registry.contains(&id));
        assert_eq!(registry.next_serial(), 9);
    }
}
