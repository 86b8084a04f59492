//! Inventory save format.
//!
//! Saves enumerate every slot as `(slot, Option<(item_id, quantity)>)`.
//! Loading is lenient: anything that would not form a valid stack is
//! dropped with a warning and the slot is left empty.

use crate::inventory::Inventory;
use craftbench_core::{ItemLookup, ItemStack};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Errors reading or writing a save file.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Filesystem failure.
    #[error("save file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON.
    #[error("save file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialized inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedInventory {
    /// Slots in index order.
    pub slots: Vec<SavedSlot>,
}

/// One saved slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSlot {
    /// Slot index.
    pub slot: i64,
    /// Contents, if any.
    #[serde(default)]
    pub item: Option<SavedItem>,
}

/// Raw stack contents. Kept as signed integers so corrupt saves can be
/// read and rejected instead of failing the whole load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedItem {
    /// Item id.
    pub item_id: i64,
    /// Quantity.
    pub quantity: i64,
}

/// What happened to each saved entry during restore.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Stacks placed.
    pub restored: usize,
    /// Entries with an id missing from the catalog.
    pub unknown_items: usize,
    /// Entries whose id or quantity could not form a stack.
    pub invalid_stacks: usize,
    /// Entries pointing outside the inventory.
    pub out_of_range: usize,
    /// Repeated slot indices after the first.
    pub duplicates: usize,
}

impl LoadReport {
    /// Total entries dropped.
    pub fn dropped(&self) -> usize {
        self.unknown_items + self.invalid_stacks + self.out_of_range + self.duplicates
    }
}

/// Snapshot every slot of an inventory.
pub fn save_inventory(inventory: &Inventory) -> SavedInventory {
    SavedInventory {
        slots: inventory
            .iter()
            .map(|(index, stack)| SavedSlot {
                slot: index as i64,
                item: stack.map(|s| SavedItem {
                    item_id: i64::from(s.item_id().get()),
                    quantity: i64::from(s.quantity()),
                }),
            })
            .collect(),
    }
}

/// Rebuild an inventory of `size` slots from a save.
///
/// The first valid entry for a slot wins; later entries for a restored slot
/// count as duplicates. Invalid entries never claim their slot.
pub fn restore_inventory(
    saved: &SavedInventory,
    catalog: &impl ItemLookup,
    size: usize,
) -> (Inventory, LoadReport) {
    let mut inventory = Inventory::with_size(size);
    let mut report = LoadReport::default();
    let mut seen = BTreeSet::new();

    for entry in &saved.slots {
        let index = match usize::try_from(entry.slot) {
            Ok(index) if index < inventory.size() => index,
            _ => {
                if entry.item.is_some() {
                    warn!(slot = entry.slot, "saved slot out of range, dropped");
                    report.out_of_range += 1;
                }
                continue;
            }
        };
        let Some(item) = entry.item else {
            continue;
        };
        if seen.contains(&index) {
            warn!(slot = index, "duplicate saved slot, dropped");
            report.duplicates += 1;
            continue;
        }
        let stack = match ItemStack::from_raw(item.item_id, item.quantity) {
            Ok(stack) => stack,
            Err(err) => {
                warn!(slot = index, %err, "saved stack invalid, dropped");
                report.invalid_stacks += 1;
                continue;
            }
        };
        if !catalog.contains(stack.item_id()) {
            warn!(slot = index, item_id = item.item_id, "saved item unknown, dropped");
            report.unknown_items += 1;
            continue;
        }
        seen.insert(index);
        inventory.set(index, Some(stack));
        report.restored += 1;
    }

    (inventory, report)
}

/// Pretty JSON for a save.
pub fn to_json(saved: &SavedInventory) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(saved)?)
}

/// Parse a save from JSON.
pub fn from_json(json: &str) -> Result<SavedInventory, PersistError> {
    Ok(serde_json::from_str(json)?)
}

/// Write a save to disk.
pub fn write_save(path: &Path, saved: &SavedInventory) -> Result<(), PersistError> {
    fs::write(path, to_json(saved)?)?;
    Ok(())
}

/// Read a save from disk.
pub fn read_save(path: &Path) -> Result<SavedInventory, PersistError> {
    from_json(&fs::read_to_string(path)?)
}
