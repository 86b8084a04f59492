#![warn(missing_docs)]
//! Item catalog and recipe book loading from JSON data files.

mod items;
mod recipes;

pub use items::{catalog_from_file, catalog_from_str, ItemEntry};
pub use recipes::{recipe_book_from_file, recipe_book_from_str, resolve_item};

use craftbench_core::{CatalogError, ItemCatalog, ItemKeyError};
use craftbench_engine::RecipeBook;
use thiserror::Error;

/// Bundled item definitions.
pub const DEFAULT_ITEMS_JSON: &str = include_str!("../data/items.json");

/// Bundled recipes.
pub const DEFAULT_RECIPES_JSON: &str = include_str!("../data/recipes.json");

/// Errors emitted while loading data files.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Wrap IO errors when reading data files.
    #[error("failed to read data file: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap serde parsing issues.
    #[error("failed to parse data file: {0}")]
    Parse(#[from] serde_json::Error),
    /// An item key did not parse.
    #[error("invalid item key: {0}")]
    Key(#[from] ItemKeyError),
    /// An item id was zero or did not fit.
    #[error("item {key} has invalid id {id}")]
    InvalidId {
        /// Key of the offending entry.
        key: String,
        /// Requested or assigned id.
        id: u64,
    },
    /// A reference names no catalog item.
    #[error("unknown item {0}")]
    UnknownItem(String),
    /// The catalog rejected the definitions.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Catalog built from the bundled item list.
pub fn default_catalog() -> Result<ItemCatalog, AssetError> {
    catalog_from_str(DEFAULT_ITEMS_JSON)
}

/// Recipe book built from the bundled recipes against `catalog`.
pub fn default_recipe_book(catalog: &ItemCatalog) -> Result<RecipeBook, AssetError> {
    recipe_book_from_str(DEFAULT_RECIPES_JSON, catalog)
}
