//! Read-only item catalog.
//!
//! The catalog is loaded once per session before any inventory operation and
//! is never mutated afterwards. Engine code reaches it through the
//! [`ItemLookup`] trait so tests can substitute a minimal lookup.

use crate::item::ItemId;
use crate::key::ItemKey;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    /// Category flags consumed by collaborators outside the engine.
    pub struct ItemFlags: u8 {
        /// The item can be produced by a mining action.
        const MINEABLE = 0b0000_0001;
    }
}

impl Default for ItemFlags {
    fn default() -> Self {
        ItemFlags::empty()
    }
}

/// Catalog entry for a single item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDefinition {
    /// Numeric id used by stacks and save files.
    pub id: ItemId,
    /// Stable data-file key.
    pub key: ItemKey,
    /// Display name (e.g. "Oak log").
    pub name: String,
    /// Category flags.
    pub flags: ItemFlags,
}

impl ItemDefinition {
    /// Convenience constructor.
    pub fn new(id: ItemId, key: ItemKey, name: impl Into<String>, flags: ItemFlags) -> Self {
        Self {
            id,
            key,
            name: name.into(),
            flags,
        }
    }
}

/// Errors raised while assembling a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Two definitions share an id.
    #[error("duplicate item id {0}")]
    DuplicateId(ItemId),
    /// Two definitions share a key.
    #[error("duplicate item key {0}")]
    DuplicateKey(ItemKey),
}

/// Narrow read-only view of the catalog used by the engine.
pub trait ItemLookup {
    /// Display name for an id.
    fn lookup_name(&self, id: ItemId) -> Option<&str>;

    /// Whether the id names a real item.
    fn contains(&self, id: ItemId) -> bool {
        self.lookup_name(id).is_some()
    }
}

/// Immutable mapping from item id to display name and metadata.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: BTreeMap<ItemId, ItemDefinition>,
    key_to_id: HashMap<ItemKey, ItemId>,
}

impl ItemCatalog {
    /// Build a catalog, rejecting duplicate ids or keys.
    pub fn new(definitions: Vec<ItemDefinition>) -> Result<Self, CatalogError> {
        let mut items = BTreeMap::new();
        let mut key_to_id = HashMap::new();
        for def in definitions {
            if key_to_id.contains_key(&def.key) {
                return Err(CatalogError::DuplicateKey(def.key));
            }
            if items.contains_key(&def.id) {
                return Err(CatalogError::DuplicateId(def.id));
            }
            key_to_id.insert(def.key.clone(), def.id);
            items.insert(def.id, def);
        }
        Ok(Self { items, key_to_id })
    }

    /// All ids in ascending order.
    pub fn all_ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.keys().copied()
    }

    /// Full definition for an id.
    pub fn definition(&self, id: ItemId) -> Option<&ItemDefinition> {
        self.items.get(&id)
    }

    /// Resolve an id by key.
    pub fn id_by_key(&self, key: &ItemKey) -> Option<ItemId> {
        self.key_to_id.get(key).copied()
    }

    /// Resolve an id by display name (exact match).
    pub fn id_by_name(&self, name: &str) -> Option<ItemId> {
        self.items
            .values()
            .find(|def| def.name == name)
            .map(|def| def.id)
    }

    /// Whether the item carries [`ItemFlags::MINEABLE`].
    pub fn is_mineable(&self, id: ItemId) -> bool {
        self.definition(id)
            .is_some_and(|def| def.flags.contains(ItemFlags::MINEABLE))
    }

    /// Ids of every mineable item, ascending.
    pub fn mineable_ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items
            .values()
            .filter(|def| def.flags.contains(ItemFlags::MINEABLE))
            .map(|def| def.id)
    }

    /// Number of catalog entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ItemLookup for ItemCatalog {
    fn lookup_name(&self, id: ItemId) -> Option<&str> {
        self.items.get(&id).map(|def| def.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(raw: u16, key: &str, name: &str, flags: ItemFlags) -> ItemDefinition {
        ItemDefinition::new(
            ItemId::new(raw).unwrap(),
            ItemKey::parse(key).unwrap(),
            name,
            flags,
        )
    }

    #[test]
    fn lookup_by_id_key_and_name() {
        let catalog = ItemCatalog::new(vec![
            def(2, "oak_planks", "Oak Planks", ItemFlags::empty()),
            def(1, "oak_log", "Oak log", ItemFlags::MINEABLE),
        ])
        .unwrap();

        let log = ItemId::new(1).unwrap();
        assert_eq!(catalog.lookup_name(log), Some("Oak log"));
        assert_eq!(
            catalog.id_by_key(&ItemKey::parse("oak_log").unwrap()),
            Some(log)
        );
        assert_eq!(catalog.id_by_name("Oak Planks").map(ItemId::get), Some(2));
        assert!(catalog.contains(log));
        assert!(!catalog.contains(ItemId::new(9).unwrap()));
    }

    #[test]
    fn ids_iterate_in_ascending_order() {
        let catalog = ItemCatalog::new(vec![
            def(3, "stick", "Stick", ItemFlags::empty()),
            def(1, "oak_log", "Oak log", ItemFlags::MINEABLE),
            def(2, "oak_planks", "Oak Planks", ItemFlags::empty()),
        ])
        .unwrap();
        let ids: Vec<u16> = catalog.all_ids().map(ItemId::get).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        let mineable: Vec<u16> = catalog.mineable_ids().map(ItemId::get).collect();
        assert_eq!(mineable, vec![1]);
    }

    #[test]
    fn rejects_duplicates() {
        let dup_id = ItemCatalog::new(vec![
            def(1, "oak_log", "Oak log", ItemFlags::MINEABLE),
            def(1, "stick", "Stick", ItemFlags::empty()),
        ]);
        assert!(matches!(dup_id, Err(CatalogError::DuplicateId(_))));

        let dup_key = ItemCatalog::new(vec![
            def(1, "oak_log", "Oak log", ItemFlags::MINEABLE),
            def(2, "oak_log", "Other log", ItemFlags::empty()),
        ]);
        assert!(matches!(dup_key, Err(CatalogError::DuplicateKey(_))));
    }
}
