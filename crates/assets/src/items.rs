use std::fs;
use std::path::Path;

use craftbench_core::{ItemCatalog, ItemDefinition, ItemFlags, ItemId, ItemKey};
use serde::Deserialize;
use tracing::debug;

use crate::AssetError;

/// One entry of an items file.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemEntry {
    /// Stable key, e.g. `oak_log` or `craftbench:oak_log`.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Whether mining can produce this item.
    #[serde(default)]
    pub mineable: bool,
    /// Explicit numeric id. Defaults to the 1-based position in the file.
    #[serde(default)]
    pub id: Option<u64>,
}

/// Load an item catalog from the provided JSON file path.
pub fn catalog_from_file(path: &Path) -> Result<ItemCatalog, AssetError> {
    let data = fs::read_to_string(path)?;
    catalog_from_str(&data)
}

/// Load an item catalog from an in-memory JSON string.
pub fn catalog_from_str(input: &str) -> Result<ItemCatalog, AssetError> {
    let entries: Vec<ItemEntry> = serde_json::from_str(input)?;
    let mut definitions = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        let key = ItemKey::parse(&entry.key)?;
        let raw = entry.id.unwrap_or(index as u64 + 1);
        let id = u16::try_from(raw)
            .ok()
            .and_then(ItemId::new)
            .ok_or_else(|| AssetError::InvalidId {
                key: entry.key.clone(),
                id: raw,
            })?;
        let flags = if entry.mineable {
            ItemFlags::MINEABLE
        } else {
            ItemFlags::empty()
        };
        definitions.push(ItemDefinition::new(id, key, entry.name, flags));
    }

    let catalog = ItemCatalog::new(definitions)?;
    debug!(items = catalog.len(), "item catalog loaded");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftbench_core::{CatalogError, ItemLookup};

    #[test]
    fn ids_follow_file_order() {
        let catalog = catalog_from_str(
            r#"[
                { "key": "dirt", "name": "Dirt", "mineable": true },
                { "key": "gem", "name": "Gem", "id": 40 },
                { "key": "stone", "name": "Stone" }
            ]"#,
        )
        .unwrap();

        let ids: Vec<u16> = catalog.all_ids().map(ItemId::get).collect();
        assert_eq!(ids, vec![1, 3, 40]);
        assert_eq!(catalog.lookup_name(ItemId::new(3).unwrap()), Some("Stone"));
        assert!(catalog.is_mineable(ItemId::new(1).unwrap()));
        assert!(!catalog.is_mineable(ItemId::new(40).unwrap()));
    }

    #[test]
    fn rejects_zero_and_duplicate_ids() {
        let zero = catalog_from_str(r#"[{ "key": "a", "name": "A", "id": 0 }]"#);
        assert!(matches!(zero, Err(AssetError::InvalidId { id: 0, .. })));

        let dup = catalog_from_str(
            r#"[{ "key": "a", "name": "A" }, { "key": "b", "name": "B", "id": 1 }]"#,
        );
        assert!(matches!(
            dup,
            Err(AssetError::Catalog(CatalogError::DuplicateId(_)))
        ));
    }

    #[test]
    fn rejects_bad_keys() {
        let bad = catalog_from_str(r#"[{ "key": "Oak Log", "name": "Oak log" }]"#);
        assert!(matches!(bad, Err(AssetError::Key(_))));
    }
}
