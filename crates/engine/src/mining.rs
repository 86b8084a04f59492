//! Mining deposits.
//!
//! The countdown and tool speeds live outside the engine; completion hands a
//! validated [`MiningRequest`] to the session, which deposits it with a
//! single `add_items` call.

use crate::inventory::Inventory;
use craftbench_core::{ItemCatalog, ItemId, ItemLookup, MAX_STACK_SIZE};
use thiserror::Error;
use tracing::{debug, warn};

/// Reasons a mining request is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MiningError {
    /// The id is not in the catalog.
    #[error("unknown item id {0}")]
    UnknownItem(ItemId),
    /// The item exists but cannot be mined.
    #[error("{name} cannot be mined")]
    NotMineable {
        /// Item id.
        item_id: ItemId,
        /// Display name.
        name: String,
    },
    /// Quantity outside `1..=MAX_STACK_SIZE`.
    #[error("mining quantity {0} must be between 1 and 64")]
    InvalidQuantity(u32),
}

/// A completed mining action ready to be deposited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiningRequest {
    item_id: ItemId,
    name: String,
    quantity: u32,
}

impl MiningRequest {
    /// Validate a mining result against the catalog.
    pub fn new(catalog: &ItemCatalog, item_id: ItemId, quantity: u32) -> Result<Self, MiningError> {
        let name = catalog
            .lookup_name(item_id)
            .ok_or(MiningError::UnknownItem(item_id))?
            .to_string();
        if !catalog.is_mineable(item_id) {
            return Err(MiningError::NotMineable { item_id, name });
        }
        if quantity == 0 || quantity > MAX_STACK_SIZE {
            return Err(MiningError::InvalidQuantity(quantity));
        }
        Ok(Self {
            item_id,
            name,
            quantity,
        })
    }

    /// Item being mined.
    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    /// Amount mined.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Deposit into the inventory. Overflow is reported, not retained.
    pub fn deposit(self, inventory: &mut Inventory) -> MiningReport {
        let lost = inventory.add_items(self.item_id, self.quantity);
        if lost > 0 {
            warn!(item = %self.name, lost, "inventory full, mined items lost");
        } else {
            debug!(item = %self.name, quantity = self.quantity, "mined items deposited");
        }
        MiningReport {
            item_id: self.item_id,
            name: self.name,
            gained: self.quantity - lost,
            lost,
        }
    }
}

/// Outcome of a deposit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiningReport {
    /// Item that was mined.
    pub item_id: ItemId,
    /// Display name at the time of mining.
    pub name: String,
    /// Items that made it into the inventory.
    pub gained: u32,
    /// Items dropped because the inventory was full.
    pub lost: u32,
}

impl MiningReport {
    /// Player-facing status line.
    pub fn status_message(&self) -> String {
        let mined = self.gained + self.lost;
        let plural = if mined == 1 { "" } else { "s" };
        let mut message = format!("Mined {mined} {}{plural}.", self.name);
        if self.lost > 0 {
            message.push_str(&format!(" (Inventory full, {} lost)", self.lost));
        }
        message
    }
}
