//! Player session: the single owner of inventory, grid, held stack and
//! displayed crafting result.
//!
//! Every mutation goes through `&mut Session`, so there is exactly one
//! writer over the inventory, grid and held stack as a unit.

use crate::grid::CraftingGrid;
use crate::inventory::Inventory;
use crate::mining::{MiningError, MiningReport, MiningRequest};
use crate::recipe::RecipeBook;
use crate::transaction::{calculate_max_crafts, consume_ingredients, CraftError, ResultSlot};
use crate::transfer::{apply_transfer, PointerButton, TransferMode, TransferOutcome};
use craftbench_core::{ItemCatalog, ItemId, ItemStack, MAX_STACK_SIZE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Address of a slot the player can click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotRef {
    /// Inventory slot index.
    Inventory(usize),
    /// Crafting grid cell `(row, col)`.
    Grid(usize, usize),
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotRef::Inventory(index) => write!(f, "inventory[{index}]"),
            SlotRef::Grid(row, col) => write!(f, "grid[{row}][{col}]"),
        }
    }
}

/// Errors from slot interaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The slot reference is out of range.
    #[error("no such slot: {0}")]
    InvalidSlot(SlotRef),
    /// A grid slot was clicked while the crafting view is closed.
    #[error("crafting grid is not open")]
    CraftingClosed,
}

/// How many crafts a result-slot click asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CraftRequest {
    /// A single craft.
    One,
    /// As many as the grid affords.
    All,
}

/// Where crafted items ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CraftDestination {
    /// Onto the held stack.
    Held,
    /// Into the inventory via `add_items`.
    Inventory,
}

/// Summary of a successful craft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftOutcome {
    /// Recipe that was executed.
    pub recipe: String,
    /// Number of crafts performed.
    pub crafts: u32,
    /// Output item.
    pub item_id: ItemId,
    /// Items produced in total.
    pub produced: u32,
    /// Where the output was deposited.
    pub destination: CraftDestination,
    /// Items that did not fit in the inventory.
    pub lost: u32,
}

/// Explicit engine context, created at world load and dropped at exit.
#[derive(Debug, Clone)]
pub struct Session {
    catalog: ItemCatalog,
    recipes: RecipeBook,
    inventory: Inventory,
    grid: CraftingGrid,
    held: Option<ItemStack>,
    result: ResultSlot,
    crafting_open: bool,
}

impl Session {
    /// Start a session over an existing inventory.
    pub fn new(catalog: ItemCatalog, recipes: RecipeBook, inventory: Inventory) -> Self {
        Self {
            catalog,
            recipes,
            inventory,
            grid: CraftingGrid::new(),
            held: None,
            result: ResultSlot::default(),
            crafting_open: false,
        }
    }

    /// Item catalog.
    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    /// Recipe book.
    pub fn recipes(&self) -> &RecipeBook {
        &self.recipes
    }

    /// Player inventory.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Crafting grid.
    pub fn grid(&self) -> &CraftingGrid {
        &self.grid
    }

    /// Stack on the pointer.
    pub fn held(&self) -> Option<&ItemStack> {
        self.held.as_ref()
    }

    /// Displayed crafting result.
    pub fn result(&self) -> Option<&ItemStack> {
        self.result.get()
    }

    /// Whether the crafting view is open.
    pub fn is_crafting_open(&self) -> bool {
        self.crafting_open
    }

    /// Enter the crafting view.
    pub fn open_crafting(&mut self) {
        self.crafting_open = true;
        self.result.update_result_slot(&self.recipes, &self.grid);
        debug!("crafting opened");
    }

    /// Leave the crafting view, returning grid contents and the held stack
    /// to the inventory. Returns the number of items lost to overflow.
    pub fn close_crafting(&mut self) -> u32 {
        let mut lost = 0;
        for stack in self.grid.drain() {
            lost += self.deposit_stack(stack);
        }
        lost += self.return_held();
        self.result.clear();
        self.crafting_open = false;
        if lost > 0 {
            warn!(lost, "inventory full while closing crafting, items lost");
        }
        debug!("crafting closed");
        lost
    }

    /// Put the held stack back into the inventory. Returns items lost.
    pub fn return_held(&mut self) -> u32 {
        match self.held.take() {
            Some(stack) => self.deposit_stack(stack),
            None => 0,
        }
    }

    /// Apply a transfer between the held stack and a slot.
    pub fn click_slot(
        &mut self,
        slot: SlotRef,
        mode: TransferMode,
    ) -> Result<TransferOutcome, SessionError> {
        let outcome = match slot {
            SlotRef::Inventory(index) => {
                let target = self
                    .inventory
                    .slot_mut(index)
                    .ok_or(SessionError::InvalidSlot(slot))?;
                apply_transfer(&mut self.held, target, mode)
            }
            SlotRef::Grid(row, col) => {
                if !self.crafting_open {
                    return Err(SessionError::CraftingClosed);
                }
                let target = self
                    .grid
                    .slot_mut(row, col)
                    .ok_or(SessionError::InvalidSlot(slot))?;
                let outcome = apply_transfer(&mut self.held, target, mode);
                if outcome.changed() {
                    self.result.update_result_slot(&self.recipes, &self.grid);
                }
                outcome
            }
        };
        debug!(%slot, ?mode, ?outcome, "slot clicked");
        Ok(outcome)
    }

    /// Click a slot with a pointer button.
    pub fn click(
        &mut self,
        slot: SlotRef,
        button: PointerButton,
    ) -> Result<TransferOutcome, SessionError> {
        let mode = TransferMode::for_click(button, self.held.is_some());
        self.click_slot(slot, mode)
    }

    /// Execute the displayed recipe from the result slot.
    ///
    /// The live grid is re-matched first; if the displayed result no longer
    /// agrees it is refreshed and [`CraftError::StaleResult`] is returned
    /// without crafting. The deposit target is chosen before ingredients
    /// are consumed, and nothing is produced unless consumption succeeds.
    pub fn craft(&mut self, request: CraftRequest) -> Result<CraftOutcome, CraftError> {
        let Some(recipe) = self.recipes.find_matching_recipe(&self.grid) else {
            self.result.clear();
            return Err(CraftError::NothingToCraft);
        };
        let output = recipe.output();
        if self.result.get() != output.to_stack().as_ref() {
            self.result.update_result_slot(&self.recipes, &self.grid);
            return Err(CraftError::StaleResult);
        }

        let max = calculate_max_crafts(recipe, &self.grid);
        let crafts = match request {
            CraftRequest::One => 1,
            CraftRequest::All => max,
        }
        .min(max);
        if crafts == 0 {
            return Err(CraftError::NothingToCraft);
        }

        let produced = crafts * output.quantity;
        let to_held = match &self.held {
            None => produced <= MAX_STACK_SIZE,
            Some(held) => held.item_id() == output.item_id && held.remaining_space() >= produced,
        };

        consume_ingredients(&mut self.grid, recipe, crafts)?;
        let name = recipe.name().to_string();

        let (destination, lost) = if to_held {
            if let Some(held) = self.held.as_mut() {
                held.add(produced);
            } else {
                self.held = ItemStack::new(output.item_id, produced).ok();
            }
            (CraftDestination::Held, 0)
        } else {
            let lost = self.inventory.add_items(output.item_id, produced);
            if lost > 0 {
                warn!(recipe = %name, lost, "inventory full, crafted items lost");
            }
            (CraftDestination::Inventory, lost)
        };

        self.result.update_result_slot(&self.recipes, &self.grid);
        info!(recipe = %name, crafts, produced, ?destination, "crafted");
        Ok(CraftOutcome {
            recipe: name,
            crafts,
            item_id: output.item_id,
            produced,
            destination,
            lost,
        })
    }

    /// Deposit the result of a completed mining action.
    pub fn deposit_mined(
        &mut self,
        item_id: ItemId,
        quantity: u32,
    ) -> Result<MiningReport, MiningError> {
        let request = MiningRequest::new(&self.catalog, item_id, quantity)?;
        Ok(request.deposit(&mut self.inventory))
    }

    /// Per-item totals over inventory, grid and held stack.
    pub fn item_totals(&self) -> BTreeMap<ItemId, u32> {
        let mut totals = self.inventory.totals();
        for (item_id, quantity) in self.grid.aggregate() {
            *totals.entry(item_id).or_insert(0) += quantity;
        }
        if let Some(held) = &self.held {
            *totals.entry(held.item_id()).or_insert(0) += held.quantity();
        }
        totals
    }

    /// Replace the inventory, e.g. after loading a save.
    pub fn replace_inventory(&mut self, inventory: Inventory) -> Inventory {
        std::mem::replace(&mut self.inventory, inventory)
    }

    fn deposit_stack(&mut self, stack: ItemStack) -> u32 {
        self.inventory.add_items(stack.item_id(), stack.quantity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::{Ingredient, Recipe, RecipeOutput};
    use craftbench_core::{ItemDefinition, ItemFlags, ItemKey};

    const LOG: u16 = 1;
    const PLANKS: u16 = 2;

    fn id(raw: u16) -> ItemId {
        ItemId::new(raw).unwrap()
    }

    fn session(slots: usize) -> Session {
        let catalog = ItemCatalog::new(vec![
            ItemDefinition::new(
                id(LOG),
                ItemKey::parse("oak_log").unwrap(),
                "Oak log",
                ItemFlags::MINEABLE,
            ),
            ItemDefinition::new(
                id(PLANKS),
                ItemKey::parse("oak_planks").unwrap(),
                "Oak Planks",
                ItemFlags::empty(),
            ),
        ])
        .unwrap();
        let planks = Recipe::shapeless(
            "planks",
            [Ingredient {
                item_id: id(LOG),
                quantity: 1,
            }],
            RecipeOutput {
                item_id: id(PLANKS),
                quantity: 4,
            },
        )
        .unwrap();
        Session::new(
            catalog,
            RecipeBook::new(vec![planks]),
            Inventory::with_size(slots),
        )
    }

    #[test]
    fn grid_clicks_require_open_crafting() {
        let mut s = session(4);
        assert_eq!(
            s.click(SlotRef::Grid(0, 0), PointerButton::Primary),
            Err(SessionError::CraftingClosed)
        );
        s.open_crafting();
        assert_eq!(
            s.click(SlotRef::Grid(2, 0), PointerButton::Primary),
            Err(SessionError::InvalidSlot(SlotRef::Grid(2, 0)))
        );
        assert_eq!(
            s.click(SlotRef::Inventory(4), PointerButton::Primary),
            Err(SessionError::InvalidSlot(SlotRef::Inventory(4)))
        );
    }

    #[test]
    fn placing_a_log_shows_planks() {
        let mut s = session(4);
        s.deposit_mined(id(LOG), 1).unwrap();
        s.open_crafting();
        s.click(SlotRef::Inventory(0), PointerButton::Primary).unwrap();
        assert!(s.result().is_none());
        s.click(SlotRef::Grid(1, 1), PointerButton::Primary).unwrap();
        let shown = s.result().unwrap();
        assert_eq!((shown.item_id(), shown.quantity()), (id(PLANKS), 4));
    }

    #[test]
    fn craft_all_deposits_into_inventory_when_hand_cannot_hold() {
        let mut s = session(4);
        s.deposit_mined(id(LOG), 20).unwrap();
        s.open_crafting();
        s.click(SlotRef::Inventory(0), PointerButton::Primary).unwrap();
        s.click(SlotRef::Grid(0, 0), PointerButton::Primary).unwrap();

        let outcome = s.craft(CraftRequest::All).unwrap();
        assert_eq!(outcome.crafts, 20);
        assert_eq!(outcome.produced, 80);
        assert_eq!(outcome.destination, CraftDestination::Inventory);
        assert_eq!(outcome.lost, 0);
        assert!(s.grid().is_empty());
        assert!(s.result().is_none());
        assert_eq!(s.inventory().count_item(id(PLANKS)), 80);
    }

    #[test]
    fn craft_one_goes_to_held_and_merges() {
        let mut s = session(4);
        s.deposit_mined(id(LOG), 2).unwrap();
        s.open_crafting();
        s.click(SlotRef::Inventory(0), PointerButton::Primary).unwrap();
        s.click(SlotRef::Grid(0, 1), PointerButton::Primary).unwrap();

        assert_eq!(s.craft(CraftRequest::One).unwrap().destination, CraftDestination::Held);
        assert_eq!(s.craft(CraftRequest::One).unwrap().destination, CraftDestination::Held);
        assert_eq!(s.held().map(ItemStack::quantity), Some(8));
        assert_eq!(s.craft(CraftRequest::One), Err(CraftError::NothingToCraft));
    }

    #[test]
    fn craft_skips_a_hand_holding_another_item() {
        let mut s = session(4);
        s.deposit_mined(id(LOG), 3).unwrap();
        s.open_crafting();
        s.click(SlotRef::Inventory(0), PointerButton::Primary).unwrap();
        s.click(SlotRef::Grid(0, 0), PointerButton::Secondary).unwrap();

        let outcome = s.craft(CraftRequest::One).unwrap();
        assert_eq!(outcome.destination, CraftDestination::Inventory);
        assert_eq!(outcome.lost, 0);
        assert_eq!(
            s.held().map(|h| (h.item_id(), h.quantity())),
            Some((id(LOG), 2))
        );
        assert_eq!(s.inventory().count_item(id(PLANKS)), 4);
    }

    #[test]
    fn craft_skips_a_hand_without_room() {
        let mut s = session(4);
        s.deposit_mined(id(LOG), 1).unwrap();
        s.open_crafting();
        s.click(SlotRef::Inventory(0), PointerButton::Primary).unwrap();
        s.click(SlotRef::Grid(0, 0), PointerButton::Primary).unwrap();
        s.held = Some(ItemStack::new(id(PLANKS), 62).unwrap());

        let outcome = s.craft(CraftRequest::One).unwrap();
        assert_eq!(outcome.destination, CraftDestination::Inventory);
        assert_eq!(outcome.lost, 0);
        assert_eq!(s.held().map(ItemStack::quantity), Some(62));
        assert_eq!(s.inventory().count_item(id(PLANKS)), 4);
    }

    #[test]
    fn craft_into_a_full_inventory_reports_lost_output() {
        let mut s = session(1);
        s.deposit_mined(id(LOG), 64).unwrap();
        s.open_crafting();
        s.click(SlotRef::Inventory(0), PointerButton::Secondary).unwrap();
        s.click(SlotRef::Grid(0, 0), PointerButton::Secondary).unwrap();
        assert_eq!(s.held().map(ItemStack::quantity), Some(31));

        let outcome = s.craft(CraftRequest::One).unwrap();
        assert_eq!(outcome.destination, CraftDestination::Inventory);
        assert_eq!(outcome.produced, 4);
        assert_eq!(outcome.lost, 4);
        assert!(s.grid().is_empty());
        assert_eq!(s.held().map(ItemStack::quantity), Some(31));
        assert_eq!(s.inventory().count_item(id(PLANKS)), 0);
        assert_eq!(s.inventory().count_item(id(LOG)), 32);
    }

    #[test]
    fn stale_result_is_refreshed_not_crafted() {
        let mut s = session(4);
        s.deposit_mined(id(LOG), 1).unwrap();
        s.open_crafting();
        s.click(SlotRef::Inventory(0), PointerButton::Primary).unwrap();
        s.click(SlotRef::Grid(0, 0), PointerButton::Primary).unwrap();
        s.result.clear();

        let before = s.grid().clone();
        assert_eq!(s.craft(CraftRequest::One), Err(CraftError::StaleResult));
        assert_eq!(s.grid(), &before);
        assert!(s.result().is_some());
        assert!(s.craft(CraftRequest::One).is_ok());
    }

    #[test]
    fn close_crafting_returns_grid_and_held() {
        let mut s = session(1);
        s.deposit_mined(id(LOG), 3).unwrap();
        s.open_crafting();
        s.click(SlotRef::Inventory(0), PointerButton::Secondary).unwrap();
        s.click(SlotRef::Grid(0, 0), PointerButton::Secondary).unwrap();
        assert_eq!(s.held().map(ItemStack::quantity), Some(1));

        let lost = s.close_crafting();
        assert_eq!(lost, 0);
        assert!(s.held().is_none());
        assert!(s.grid().is_empty());
        assert!(!s.is_crafting_open());
        assert_eq!(s.inventory().count_item(id(LOG)), 3);
    }

    #[test]
    fn totals_include_grid_and_held() {
        let mut s = session(4);
        s.deposit_mined(id(LOG), 10).unwrap();
        s.open_crafting();
        s.click(SlotRef::Inventory(0), PointerButton::Secondary).unwrap();
        s.click(SlotRef::Grid(0, 0), PointerButton::Secondary).unwrap();
        assert_eq!(s.item_totals().get(&id(LOG)), Some(&10));
    }
}
