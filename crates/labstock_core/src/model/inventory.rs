//! Catalog and inventory document types.
//!
//! # Responsibility
//! - Own one ordered item sequence per catalog together with its
//!   identity registry.
//! - Define the versioned two-catalog `Inventory` document and its
//!   wire shape.
//!
//! # Invariants
//! - `items` is sorted by name after every completed action.
//! - The registry entry set equals the set of live items.
//! - The wire shape carries the next-ID counter as a decimal string;
//!   loading rejects documents that violate either invariant above.

use crate::model::item::{Item, SubItem};
use crate::model::record::Record;
use crate::registry::{IdentityRegistry, ItemId};
use serde::{Deserialize, Serialize};

/// Highest snapshot major version this build understands.
pub const SUPPORTED_MAJOR_VER: u32 = 1;

/// One ordered top-level item collection plus its identity registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CatalogWire", into = "CatalogWire")]
pub struct Catalog {
    items: Vec<Item>,
    registry: IdentityRegistry,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items sorted by name.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Identity bookkeeping for this catalog.
    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    /// Locates a live item by its stable ID.
    pub fn find_item(&self, id: &ItemId) -> Option<(usize, &Item)> {
        self.items
            .iter()
            .enumerate()
            .find(|(_, item)| item.id() == Some(id))
    }

    /// Index of a live item by its stable ID.
    pub fn find_index(&self, id: &ItemId) -> Option<usize> {
        self.find_item(id).map(|(index, _)| index)
    }

    /// Sub-item at a stable item ID plus position.
    pub fn subitem(&self, id: &ItemId, index: usize) -> Option<&SubItem> {
        self.find_item(id)
            .and_then(|(_, item)| item.subitems().get(index))
    }

    pub(crate) fn item_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.id() == Some(id))
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<Item> {
        &mut self.items
    }

    /// Simultaneous borrow of the item sequence and its registry, for
    /// mutations that must keep both in lockstep.
    pub(crate) fn parts_mut(&mut self) -> (&mut Vec<Item>, &mut IdentityRegistry) {
        (&mut self.items, &mut self.registry)
    }
}

/// Persisted catalog shape: counter as decimal string plus item tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogWire {
    next_id: String,
    items: Vec<Item>,
}

impl TryFrom<CatalogWire> for Catalog {
    type Error = String;

    fn try_from(wire: CatalogWire) -> Result<Self, Self::Error> {
        let next_serial: u64 = wire
            .next_id
            .parse()
            .map_err(|_| format!("invalid next_id counter `{}`", wire.next_id))?;

        let mut entries = Vec::with_capacity(wire.items.len());
        for (position, item) in wire.items.iter().enumerate() {
            let id = item
                .id()
                .ok_or_else(|| format!("item `{}` carries no id", item.name()))?;
            let serial = id
                .serial()
                .ok_or_else(|| format!("item id `{id}` is not base 36"))?;
            if serial >= next_serial {
                return Err(format!(
                    "item id `{id}` is at or above the next_id counter {next_serial}"
                ));
            }
            if entries.iter().any(|(existing, _)| existing == id) {
                return Err(format!("duplicate item id `{id}`"));
            }
            if position > 0 && wire.items[position - 1].name() > item.name() {
                return Err(format!(
                    "items are not sorted by name at `{}`",
                    item.name()
                ));
            }
            for (sub_position, sub) in item.subitems().iter().enumerate() {
                if sub_position > 0 && item.subitems()[sub_position - 1].name() > sub.name() {
                    return Err(format!(
                        "subitems of `{}` are not sorted by name at `{}`",
                        item.name(),
                        sub.name()
                    ));
                }
            }
            entries.push((id.clone(), serial));
        }

        Ok(Self {
            items: wire.items,
            registry: IdentityRegistry::from_parts(next_serial, entries),
        })
    }
}

impl From<Catalog> for CatalogWire {
    fn from(catalog: Catalog) -> Self {
        Self {
            next_id: catalog.registry.next_serial().to_string(),
            items: catalog.items,
        }
    }
}

/// Versioned inventory document: two catalogs, no history.
///
/// History trees belong to the editing layer; a freshly loaded
/// inventory always starts with empty history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    /// Document format major version.
    pub major_ver: u32,
    /// Document format minor version.
    pub minor_ver: u32,
    /// Chemical kinds.
    pub chemicals: Catalog,
    /// Apparatus kinds.
    pub apparatuses: Catalog,
}

impl Inventory {
    /// Creates an empty inventory at the current format version.
    pub fn new() -> Self {
        Self {
            major_ver: SUPPORTED_MAJOR_VER,
            minor_ver: 0,
            chemicals: Catalog::new(),
            apparatuses: Catalog::new(),
        }
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalog, Inventory};
    use serde_json::json;

    #[test]
    fn empty_catalog_serializes_with_decimal_counter() {
        let catalog = Catalog::new();
        let value = serde_json::to_value(&catalog).unwrap();
        assert_eq!(value, json!({"next_id": "0", "items": []}));
    }

    #[test]
    fn deserialization_rejects_duplicate_ids() {
        let value = json!({
            "next_id": "2",
            "items": [
                {"name": "a", "edited_at": 0, "id": "0", "notes": "", "subitems": []},
                {"name": "b", "edited_at": 0, "id": "0", "notes": "", "subitems": []}
            ]
        });
        let err = serde_json::from_value::<Catalog>(value).unwrap_err();
        assert!(err.to_string().contains("duplicate item id"));
    }

    #[test]
    fn deserialization_rejects_unsorted_items() {
        let value = json!({
            "next_id": "2",
            "items": [
                {"name": "b", "edited_at": 0, "id": "0", "notes": "", "subitems": []},
                {"name": "a", "edited_at": 0, "id": "1", "notes": "", "subitems": []}
            ]
        });
        let err = serde_json::from_value::<Catalog>(value).unwrap_err();
        assert!(err.to_string().contains("not sorted"));
    }

    #[test]
    fn deserialization_rejects_ids_beyond_the_counter() {
        let value = json!({
            "next_id": "1",
            "items": [
                {"name": "a", "edited_at": 0, "id": "5", "notes": "", "subitems": []}
            ]
        });
        let err = serde_json::from_value::<Catalog>(value).unwrap_err();
        assert!(err.to_string().contains("next_id counter"));
    }

    #[test]
    fn deserialization_rejects_non_decimal_counter() {
        let value = json!({"next_id": "zz", "items": []});
        let err = serde_json::from_value::<Catalog>(value).unwrap_err();
        assert!(err.to_string().contains("invalid next_id counter"));
    }

    #[test]
    fn new_inventory_is_versioned_and_empty() {
        let inventory = Inventory::new();
        assert_eq!(inventory.major_ver, 1);
        assert_eq!(inventory.minor_ver, 0);
        assert!(inventory.chemicals.is_empty());
        assert!(inventory.apparatuses.is_empty());
    }
}
