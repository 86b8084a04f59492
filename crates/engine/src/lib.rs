#![warn(missing_docs)]
//! Inventory, crafting grid, recipe matching and crafting transactions.

pub mod grid;
pub mod inventory;
pub mod mining;
pub mod persistence;
pub mod recipe;
pub mod session;
pub mod transaction;
pub mod transfer;

pub use grid::*;
pub use inventory::*;
pub use mining::*;
pub use persistence::{
    read_save, restore_inventory, save_inventory, write_save, LoadReport, PersistError,
    SavedInventory, SavedItem, SavedSlot,
};
pub use recipe::*;
pub use session::*;
pub use transaction::*;
pub use transfer::*;
