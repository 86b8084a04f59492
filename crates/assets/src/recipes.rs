//! Recipe book loading. Recipes reference items by key; a recipe naming an
//! unknown item or with a malformed body is skipped, the rest still load.

use std::fs;
use std::path::Path;

use craftbench_core::{ItemCatalog, ItemId, ItemKey, ItemKeyError};
use craftbench_engine::{
    GridPattern, Ingredient, Recipe, RecipeBook, RecipeError, RecipeOutput, GRID_SIZE,
};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::AssetError;

#[derive(Debug, Deserialize)]
struct RecipeEntry {
    name: String,
    #[serde(flatten)]
    body: RecipeBody,
    result: CountedItem,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum RecipeBody {
    Shaped { pattern: Vec<Vec<Option<String>>> },
    Shapeless { ingredients: Vec<CountedItem> },
}

#[derive(Debug, Deserialize)]
struct CountedItem {
    item: String,
    #[serde(default = "one")]
    count: u32,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Error)]
enum SkipReason {
    #[error("malformed entry: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("bad item key: {0}")]
    Key(#[from] ItemKeyError),
    #[error("unknown item {0}")]
    UnknownItem(String),
    #[error("pattern must be {0}x{0}")]
    PatternSize(usize),
    #[error(transparent)]
    Recipe(#[from] RecipeError),
}

/// Resolve a data-file item reference (`oak_log` or `ns:oak_log`) to an id.
pub fn resolve_item(catalog: &ItemCatalog, reference: &str) -> Result<ItemId, AssetError> {
    let key = ItemKey::parse(reference)?;
    catalog
        .id_by_key(&key)
        .ok_or_else(|| AssetError::UnknownItem(key.to_string()))
}

/// Load a recipe book from the provided JSON file path.
pub fn recipe_book_from_file(path: &Path, catalog: &ItemCatalog) -> Result<RecipeBook, AssetError> {
    let data = fs::read_to_string(path)?;
    recipe_book_from_str(&data, catalog)
}

/// Load a recipe book from an in-memory JSON array, preserving file order.
pub fn recipe_book_from_str(input: &str, catalog: &ItemCatalog) -> Result<RecipeBook, AssetError> {
    let values: Vec<Value> = serde_json::from_str(input)?;
    let mut book = RecipeBook::default();

    for (index, value) in values.into_iter().enumerate() {
        match build_recipe(value, catalog) {
            Ok(recipe) => book.push(recipe),
            Err(reason) => warn!(index, %reason, "skipping recipe"),
        }
    }

    debug!(recipes = book.len(), "recipe book loaded");
    Ok(book)
}

fn build_recipe(value: Value, catalog: &ItemCatalog) -> Result<Recipe, SkipReason> {
    let entry: RecipeEntry = serde_json::from_value(value)?;
    let output = RecipeOutput {
        item_id: lookup(catalog, &entry.result.item)?,
        quantity: entry.result.count,
    };

    let recipe = match entry.body {
        RecipeBody::Shaped { pattern } => {
            if pattern.len() != GRID_SIZE || pattern.iter().any(|row| row.len() != GRID_SIZE) {
                return Err(SkipReason::PatternSize(GRID_SIZE));
            }
            let mut cells: GridPattern = [[None; GRID_SIZE]; GRID_SIZE];
            for (row, keys) in pattern.iter().enumerate() {
                for (col, key) in keys.iter().enumerate() {
                    if let Some(key) = key {
                        cells[row][col] = Some(lookup(catalog, key)?);
                    }
                }
            }
            Recipe::shaped(entry.name, cells, output)?
        }
        RecipeBody::Shapeless { ingredients } => {
            let ingredients = ingredients
                .iter()
                .map(|ingredient| {
                    Ok(Ingredient {
                        item_id: lookup(catalog, &ingredient.item)?,
                        quantity: ingredient.count,
                    })
                })
                .collect::<Result<Vec<_>, SkipReason>>()?;
            Recipe::shapeless(entry.name, ingredients, output)?
        }
    };
    Ok(recipe)
}

fn lookup(catalog: &ItemCatalog, reference: &str) -> Result<ItemId, SkipReason> {
    let key = ItemKey::parse(reference)?;
    catalog
        .id_by_key(&key)
        .ok_or_else(|| SkipReason::UnknownItem(key.to_string()))
}
