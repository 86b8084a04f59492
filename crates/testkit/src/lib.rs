#![warn(missing_docs)]
//! Shared fixtures and assertions for engine tests.

mod ledger;
mod scenario;
mod snapshot;

use anyhow::{Context, Result};
use craftbench_assets::{default_catalog, default_recipe_book, resolve_item};
use craftbench_core::{ItemCatalog, ItemId, ItemStack};
use craftbench_engine::{Inventory, RecipeBook, Session};

pub use ledger::*;
pub use scenario::*;
pub use snapshot::*;

/// Ids of the bundled items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardIds {
    /// Oak log.
    pub log: ItemId,
    /// Oak Planks.
    pub planks: ItemId,
    /// Stick.
    pub stick: ItemId,
    /// Crafting Table.
    pub table: ItemId,
}

impl StandardIds {
    /// Resolve the bundled keys against `catalog`.
    pub fn resolve(catalog: &ItemCatalog) -> Result<Self> {
        let id = |key: &str| resolve_item(catalog, key).with_context(|| format!("resolve {key}"));
        Ok(Self {
            log: id("oak_log")?,
            planks: id("oak_planks")?,
            stick: id("stick")?,
            table: id("crafting_table")?,
        })
    }
}

/// Catalog built from the bundled data.
pub fn standard_catalog() -> Result<ItemCatalog> {
    default_catalog().context("load bundled item catalog")
}

/// Recipe book built from the bundled data.
pub fn standard_recipes(catalog: &ItemCatalog) -> Result<RecipeBook> {
    default_recipe_book(catalog).context("load bundled recipes")
}

/// Session over the bundled data with an empty inventory of `slots` slots.
pub fn standard_session(slots: usize) -> Result<(Session, StandardIds)> {
    let catalog = standard_catalog()?;
    let recipes = standard_recipes(&catalog)?;
    let ids = StandardIds::resolve(&catalog)?;
    Ok((
        Session::new(catalog, recipes, Inventory::with_size(slots)),
        ids,
    ))
}

/// Build a stack, failing the test on invalid input.
pub fn stack(item_id: ItemId, quantity: u32) -> Result<ItemStack> {
    ItemStack::new(item_id, quantity).with_context(|| format!("stack {item_id} x{quantity}"))
}
