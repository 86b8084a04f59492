#![warn(missing_docs)]
//! Core item primitives shared across the workspace.

pub mod catalog;
pub mod item;
pub mod key;

// Re-export commonly used types
pub use catalog::{CatalogError, ItemCatalog, ItemDefinition, ItemFlags, ItemLookup};
pub use item::{drain_slot, ItemId, ItemStack, StackError, MAX_STACK_SIZE};
pub use key::{ItemKey, ItemKeyError, DEFAULT_NAMESPACE};
