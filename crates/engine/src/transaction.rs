//! Crafting transactions: affordability and fail-closed ingredient
//! consumption against the grid.

use crate::grid::CraftingGrid;
use crate::recipe::{Recipe, RecipeBook, RecipeShape};
use craftbench_core::{drain_slot, ItemStack};
use thiserror::Error;
use tracing::debug;

/// Recoverable crafting failures. None of these change any state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CraftError {
    /// The grid cannot pay for the requested number of crafts.
    #[error("not enough ingredients for {multiplier}x {recipe}")]
    InsufficientIngredients {
        /// Recipe that was attempted.
        recipe: String,
        /// Requested number of crafts.
        multiplier: u32,
    },
    /// The result slot was used while zero crafts are possible.
    #[error("nothing to craft")]
    NothingToCraft,
    /// The displayed result no longer matches the grid and was refreshed.
    #[error("crafting result was stale and has been refreshed")]
    StaleResult,
}

/// How many times `recipe` can be crafted from the grid as it stands.
///
/// Shaped recipes consume one item per occupied pattern cell per craft, so
/// the answer is the smallest stack among required cells (0 if any required
/// cell is empty or holds another item). Shapeless recipes divide each
/// ingredient's grid total by its per-craft requirement and take the minimum.
pub fn calculate_max_crafts(recipe: &Recipe, grid: &CraftingGrid) -> u32 {
    match recipe.shape() {
        RecipeShape::Shaped(pattern) => {
            let mut max: Option<u32> = None;
            for (row, cells) in pattern.iter().enumerate() {
                for (col, required) in cells.iter().enumerate() {
                    let Some(required) = required else {
                        continue;
                    };
                    match grid.get(row, col) {
                        Some(stack) if stack.item_id() == *required => {
                            max = Some(max.map_or(stack.quantity(), |m| m.min(stack.quantity())));
                        }
                        _ => return 0,
                    }
                }
            }
            max.unwrap_or(0)
        }
        RecipeShape::Shapeless(ingredients) => {
            let aggregate = grid.aggregate();
            ingredients
                .iter()
                .map(|ingredient| {
                    aggregate.get(&ingredient.item_id).copied().unwrap_or(0) / ingredient.quantity
                })
                .min()
                .unwrap_or(0)
        }
    }
}

/// Remove the ingredients for `multiplier` crafts from the grid.
///
/// Runs a read-only sufficiency check first; any shortfall returns
/// [`CraftError::InsufficientIngredients`] with the grid untouched. The
/// commit is applied to a staged copy and swapped in only once every
/// requirement has been drained, so the grid is never left partially
/// consumed. A shortfall discovered during commit is a logic bug and panics.
pub fn consume_ingredients(
    grid: &mut CraftingGrid,
    recipe: &Recipe,
    multiplier: u32,
) -> Result<(), CraftError> {
    if multiplier == 0 {
        return Ok(());
    }
    if calculate_max_crafts(recipe, grid) < multiplier {
        return Err(CraftError::InsufficientIngredients {
            recipe: recipe.name().to_string(),
            multiplier,
        });
    }

    let mut staged = grid.clone();
    match recipe.shape() {
        RecipeShape::Shaped(pattern) => {
            for (row, cells) in pattern.iter().enumerate() {
                for (col, required) in cells.iter().enumerate() {
                    if required.is_none() {
                        continue;
                    }
                    let drained = staged
                        .slot_mut(row, col)
                        .map_or(0, |slot| drain_slot(slot, multiplier));
                    assert_eq!(
                        drained,
                        multiplier,
                        "craft commit for {} drained {drained} of {multiplier} at ({row}, {col})",
                        recipe.name()
                    );
                }
            }
        }
        RecipeShape::Shapeless(_) => {
            let mut remaining = recipe.requirements(multiplier);
            for slot in staged.slots_mut() {
                let Some(item_id) = slot.as_ref().map(ItemStack::item_id) else {
                    continue;
                };
                if let Some(left) = remaining.get_mut(&item_id) {
                    *left -= drain_slot(slot, *left);
                }
            }
            assert!(
                remaining.values().all(|left| *left == 0),
                "craft commit for {} left requirements unmet: {remaining:?}",
                recipe.name()
            );
        }
    }

    *grid = staged;
    debug!(recipe = recipe.name(), multiplier, "ingredients consumed");
    Ok(())
}

/// The crafting output slot shown to the player.
///
/// Holds a single craft's worth of the matched recipe's result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSlot {
    current: Option<ItemStack>,
}

impl ResultSlot {
    /// Currently displayed result.
    pub fn get(&self) -> Option<&ItemStack> {
        self.current.as_ref()
    }

    /// Recompute from the grid. The stored stack is only replaced when the
    /// item or quantity differs.
    pub fn update_result_slot(&mut self, book: &RecipeBook, grid: &CraftingGrid) -> Option<&ItemStack> {
        let fresh = book
            .find_matching_recipe(grid)
            .and_then(|recipe| recipe.output().to_stack());
        if fresh != self.current {
            debug!(
                result = ?fresh.as_ref().map(|s| (s.item_id().get(), s.quantity())),
                "crafting result changed"
            );
            self.current = fresh;
        }
        self.current.as_ref()
    }

    /// Clear the displayed result.
    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::{Ingredient, RecipeOutput};
    use craftbench_core::ItemId;

    fn id(raw: u16) -> ItemId {
        ItemId::new(raw).unwrap()
    }

    fn stack(raw: u16, quantity: u32) -> Option<ItemStack> {
        Some(ItemStack::new(id(raw), quantity).unwrap())
    }

    const A: u16 = 1;
    const B: u16 = 2;
    const OUT: u16 = 3;

    fn a2_b1() -> Recipe {
        Recipe::shapeless(
            "a2_b1",
            [
                Ingredient {
                    item_id: id(A),
                    quantity: 2,
                },
                Ingredient {
                    item_id: id(B),
                    quantity: 1,
                },
            ],
            RecipeOutput {
                item_id: id(OUT),
                quantity: 1,
            },
        )
        .unwrap()
    }

    fn column() -> Recipe {
        let a = Some(id(A));
        Recipe::shaped(
            "column",
            [[a, None], [a, None]],
            RecipeOutput {
                item_id: id(OUT),
                quantity: 4,
            },
        )
        .unwrap()
    }

    #[test]
    fn shapeless_max_crafts_is_min_ratio() {
        let mut grid = CraftingGrid::new();
        grid.set(0, 0, stack(A, 5));
        grid.set(1, 1, stack(B, 3));
        assert_eq!(calculate_max_crafts(&a2_b1(), &grid), 2);

        grid.set(0, 0, stack(A, 1));
        assert_eq!(calculate_max_crafts(&a2_b1(), &grid), 0);
    }

    #[test]
    fn shaped_max_crafts_is_smallest_required_cell() {
        let mut grid = CraftingGrid::new();
        grid.set(0, 0, stack(A, 7));
        grid.set(1, 0, stack(A, 3));
        assert_eq!(calculate_max_crafts(&column(), &grid), 3);

        grid.set(1, 0, stack(B, 3));
        assert_eq!(calculate_max_crafts(&column(), &grid), 0);
        grid.set(1, 0, None);
        assert_eq!(calculate_max_crafts(&column(), &grid), 0);
    }

    #[test]
    fn shaped_consume_subtracts_multiplier_per_cell() {
        let mut grid = CraftingGrid::new();
        grid.set(0, 0, stack(A, 7));
        grid.set(1, 0, stack(A, 3));
        consume_ingredients(&mut grid, &column(), 3).unwrap();
        assert_eq!(grid.get(0, 0).map(ItemStack::quantity), Some(4));
        assert!(grid.get(1, 0).is_none(), "drained cell is emptied");
    }

    #[test]
    fn shapeless_consume_walks_slots_in_order() {
        let mut grid = CraftingGrid::new();
        grid.set(0, 0, stack(A, 1));
        grid.set(0, 1, stack(A, 4));
        grid.set(1, 0, stack(B, 2));
        consume_ingredients(&mut grid, &a2_b1(), 2).unwrap();
        assert!(grid.get(0, 0).is_none());
        assert_eq!(grid.get(0, 1).map(ItemStack::quantity), Some(1));
        assert!(grid.get(1, 0).is_none());
    }

    #[test]
    fn insufficient_ingredients_leave_grid_untouched() {
        let mut grid = CraftingGrid::new();
        grid.set(0, 0, stack(A, 5));
        grid.set(1, 1, stack(B, 3));
        let before = grid.clone();

        let err = consume_ingredients(&mut grid, &a2_b1(), 3).unwrap_err();
        assert_eq!(
            err,
            CraftError::InsufficientIngredients {
                recipe: "a2_b1".into(),
                multiplier: 3
            }
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn zero_multiplier_is_a_no_op() {
        let mut grid = CraftingGrid::new();
        grid.set(0, 0, stack(A, 1));
        let before = grid.clone();
        consume_ingredients(&mut grid, &column(), 0).unwrap();
        assert_eq!(grid, before);
    }

    #[test]
    fn result_slot_tracks_grid() {
        let book = RecipeBook::new(vec![column()]);
        let mut grid = CraftingGrid::new();
        let mut result = ResultSlot::default();
        assert!(result.update_result_slot(&book, &grid).is_none());

        grid.set(0, 0, stack(A, 1));
        grid.set(1, 0, stack(A, 1));
        let shown = result.update_result_slot(&book, &grid).cloned().unwrap();
        assert_eq!(shown.item_id(), id(OUT));
        assert_eq!(shown.quantity(), 4);

        grid.set(1, 0, None);
        assert!(result.update_result_slot(&book, &grid).is_none());
    }
}
