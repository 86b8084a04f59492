//! Shaped and shapeless recipes plus the ordered recipe book.
//!
//! Matching is two-pass and first-match-wins: every shaped recipe is tried
//! in book order before any shapeless recipe, so a grid that satisfies both
//! kinds resolves to the shaped one.

use crate::grid::{CraftingGrid, GridPattern};
use craftbench_core::{ItemId, ItemStack, MAX_STACK_SIZE};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::debug;

/// Errors raised when a recipe definition is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeError {
    /// Shaped pattern has no occupied cell.
    #[error("recipe {0:?} has an empty pattern")]
    EmptyPattern(String),
    /// Shapeless recipe lists no ingredients.
    #[error("recipe {0:?} has no ingredients")]
    NoIngredients(String),
    /// An ingredient requires zero items.
    #[error("recipe {name:?} requires zero of item {item_id}")]
    ZeroIngredient {
        /// Recipe name.
        name: String,
        /// Offending ingredient.
        item_id: ItemId,
    },
    /// Result quantity outside `1..=MAX_STACK_SIZE`.
    #[error("recipe {name:?} yields invalid quantity {quantity}")]
    InvalidOutput {
        /// Recipe name.
        name: String,
        /// Offending quantity.
        quantity: u32,
    },
    /// Repeated entries for one item add up past `u32::MAX`.
    #[error("recipe {name:?} requires too many of item {item_id}")]
    IngredientOverflow {
        /// Recipe name.
        name: String,
        /// Offending ingredient.
        item_id: ItemId,
    },
}

/// Item and quantity produced by one craft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeOutput {
    /// Produced item.
    pub item_id: ItemId,
    /// Items produced per craft.
    pub quantity: u32,
}

impl RecipeOutput {
    /// Fresh stack holding one craft's worth of output.
    pub fn to_stack(self) -> Option<ItemStack> {
        ItemStack::new(self.item_id, self.quantity).ok()
    }
}

/// Required item and per-craft quantity for a shapeless recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ingredient {
    /// Required item.
    pub item_id: ItemId,
    /// Items consumed per craft.
    pub quantity: u32,
}

/// Ingredient layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeShape {
    /// Positional pattern; each occupied cell consumes one item per craft.
    Shaped(GridPattern),
    /// Positionless ingredient list, one entry per distinct item.
    Shapeless(Vec<Ingredient>),
}

/// An immutable crafting recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    name: String,
    shape: RecipeShape,
    output: RecipeOutput,
}

impl Recipe {
    /// Create a shaped recipe.
    pub fn shaped(
        name: impl Into<String>,
        pattern: GridPattern,
        output: RecipeOutput,
    ) -> Result<Self, RecipeError> {
        let name = name.into();
        if pattern.iter().flatten().all(Option::is_none) {
            return Err(RecipeError::EmptyPattern(name));
        }
        Self::validated(name, RecipeShape::Shaped(pattern), output)
    }

    /// Create a shapeless recipe. Repeated items are folded together.
    pub fn shapeless(
        name: impl Into<String>,
        ingredients: impl IntoIterator<Item = Ingredient>,
        output: RecipeOutput,
    ) -> Result<Self, RecipeError> {
        let name = name.into();
        let mut merged: Vec<Ingredient> = Vec::new();
        for ingredient in ingredients {
            if ingredient.quantity == 0 {
                return Err(RecipeError::ZeroIngredient {
                    name,
                    item_id: ingredient.item_id,
                });
            }
            match merged.iter_mut().find(|i| i.item_id == ingredient.item_id) {
                Some(existing) => {
                    existing.quantity = existing
                        .quantity
                        .checked_add(ingredient.quantity)
                        .ok_or_else(|| RecipeError::IngredientOverflow {
                            name: name.clone(),
                            item_id: ingredient.item_id,
                        })?;
                }
                None => merged.push(ingredient),
            }
        }
        if merged.is_empty() {
            return Err(RecipeError::NoIngredients(name));
        }
        Self::validated(name, RecipeShape::Shapeless(merged), output)
    }

    fn validated(name: String, shape: RecipeShape, output: RecipeOutput) -> Result<Self, RecipeError> {
        if output.quantity == 0 || output.quantity > MAX_STACK_SIZE {
            return Err(RecipeError::InvalidOutput {
                name,
                quantity: output.quantity,
            });
        }
        Ok(Self {
            name,
            shape,
            output,
        })
    }

    /// Recipe name (used for logs and errors).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ingredient layout.
    pub fn shape(&self) -> &RecipeShape {
        &self.shape
    }

    /// What one craft yields.
    pub fn output(&self) -> RecipeOutput {
        self.output
    }

    /// Whether this is a shaped recipe.
    pub fn is_shaped(&self) -> bool {
        matches!(self.shape, RecipeShape::Shaped(_))
    }

    /// Whether the recipe applies to the grid's current layout.
    ///
    /// Shaped: the pattern equals the grid pattern cell for cell, including
    /// empty cells. Shapeless: the ingredient item set equals the set of items
    /// in the grid, and each item is present in at least the required amount.
    pub fn matches(&self, grid: &CraftingGrid) -> bool {
        match &self.shape {
            RecipeShape::Shaped(pattern) => {
                let view = grid.pattern();
                view.iter().flatten().any(Option::is_some) && *pattern == view
            }
            RecipeShape::Shapeless(ingredients) => {
                let aggregate = grid.aggregate();
                let required: BTreeSet<ItemId> = ingredients.iter().map(|i| i.item_id).collect();
                let present: BTreeSet<ItemId> = aggregate.keys().copied().collect();
                required == present
                    && ingredients.iter().all(|i| {
                        aggregate.get(&i.item_id).copied().unwrap_or(0) >= i.quantity
                    })
            }
        }
    }

    /// Per-item requirement for `multiplier` crafts, keyed by item.
    pub(crate) fn requirements(&self, multiplier: u32) -> BTreeMap<ItemId, u32> {
        let mut totals = BTreeMap::new();
        match &self.shape {
            RecipeShape::Shaped(pattern) => {
                for item_id in pattern.iter().flatten().flatten() {
                    *totals.entry(*item_id).or_insert(0) += multiplier;
                }
            }
            RecipeShape::Shapeless(ingredients) => {
                for ingredient in ingredients {
                    *totals.entry(ingredient.item_id).or_insert(0) +=
                        ingredient.quantity.saturating_mul(multiplier);
                }
            }
        }
        totals
    }
}

/// Flat, ordered list of recipes. Order is the match tie-break.
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
}

impl RecipeBook {
    /// Create a book from recipes in priority order.
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    /// Append a recipe at the lowest priority.
    pub fn push(&mut self, recipe: Recipe) {
        self.recipes.push(recipe);
    }

    /// Recipes in stored order.
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Look a recipe up by name.
    pub fn get(&self, name: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| recipe.name == name)
    }

    /// Number of recipes.
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Whether the book is empty.
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// First recipe matching the grid: shaped pass, then shapeless pass.
    pub fn find_matching_recipe(&self, grid: &CraftingGrid) -> Option<&Recipe> {
        if grid.is_empty() {
            return None;
        }
        let found = self
            .recipes
            .iter()
            .filter(|recipe| recipe.is_shaped())
            .find(|recipe| recipe.matches(grid))
            .or_else(|| {
                self.recipes
                    .iter()
                    .filter(|recipe| !recipe.is_shaped())
                    .find(|recipe| recipe.matches(grid))
            });
        if let Some(recipe) = found {
            debug!(recipe = recipe.name(), "grid matched recipe");
        }
        found
    }
}
