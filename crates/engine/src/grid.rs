//! 2x2 crafting grid.

use craftbench_core::{ItemId, ItemStack};
use std::collections::BTreeMap;

/// Side length of the crafting grid.
pub const GRID_SIZE: usize = 2;

/// Number of slots in the grid.
pub const GRID_SLOTS: usize = GRID_SIZE * GRID_SIZE;

/// Item-only view of the grid; quantities are ignored.
pub type GridPattern = [[Option<ItemId>; GRID_SIZE]; GRID_SIZE];

/// Fixed N×N matrix of optional stacks, addressed by `(row, col)`.
///
/// Row-major slot order (`row * GRID_SIZE + col`) is the canonical walk
/// order for matching and consumption.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CraftingGrid {
    slots: [[Option<ItemStack>; GRID_SIZE]; GRID_SIZE],
}

impl CraftingGrid {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Option<&ItemStack> {
        self.slots.get(row)?.get(col)?.as_ref()
    }

    /// Mutable access to the slot at `(row, col)`, `None` when out of range.
    pub fn slot_mut(&mut self, row: usize, col: usize) -> Option<&mut Option<ItemStack>> {
        self.slots.get_mut(row)?.get_mut(col)
    }

    /// Replace a slot's contents. Returns false when out of range.
    pub fn set(&mut self, row: usize, col: usize, stack: Option<ItemStack>) -> bool {
        match self.slot_mut(row, col) {
            Some(slot) => {
                *slot = stack;
                true
            }
            None => false,
        }
    }

    /// Slots in row-major order with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), Option<&ItemStack>)> + '_ {
        self.slots.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, slot)| ((row, col), slot.as_ref()))
        })
    }

    pub(crate) fn slots_mut(&mut self) -> impl Iterator<Item = &mut Option<ItemStack>> + '_ {
        self.slots.iter_mut().flat_map(|cells| cells.iter_mut())
    }

    /// Item ids per cell.
    pub fn pattern(&self) -> GridPattern {
        let mut pattern = [[None; GRID_SIZE]; GRID_SIZE];
        for ((row, col), stack) in self.iter() {
            pattern[row][col] = stack.map(ItemStack::item_id);
        }
        pattern
    }

    /// Total quantity per item across every cell.
    pub fn aggregate(&self) -> BTreeMap<ItemId, u32> {
        let mut totals = BTreeMap::new();
        for (_, stack) in self.iter() {
            if let Some(stack) = stack {
                *totals.entry(stack.item_id()).or_insert(0) += stack.quantity();
            }
        }
        totals
    }

    /// Whether every cell is empty.
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, stack)| stack.is_none())
    }

    /// Empty every cell, returning the stacks in row-major order.
    pub fn drain(&mut self) -> Vec<ItemStack> {
        self.slots_mut().filter_map(Option::take).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(raw: u16, quantity: u32) -> ItemStack {
        ItemStack::new(ItemId::new(raw).unwrap(), quantity).unwrap()
    }

    #[test]
    fn set_and_get_respect_bounds() {
        let mut grid = CraftingGrid::new();
        assert!(grid.is_empty());
        assert!(grid.set(0, 1, Some(stack(1, 3))));
        assert!(!grid.set(2, 0, Some(stack(1, 3))));
        assert_eq!(grid.get(0, 1).map(ItemStack::quantity), Some(3));
        assert!(grid.get(1, 1).is_none());
        assert!(grid.get(5, 5).is_none());
    }

    #[test]
    fn pattern_ignores_quantities() {
        let mut grid = CraftingGrid::new();
        grid.set(0, 0, Some(stack(2, 1)));
        grid.set(1, 0, Some(stack(2, 40)));
        let log = ItemId::new(2);
        assert_eq!(grid.pattern(), [[log, None], [log, None]]);
    }

    #[test]
    fn aggregate_sums_across_cells() {
        let mut grid = CraftingGrid::new();
        grid.set(0, 0, Some(stack(1, 3)));
        grid.set(1, 1, Some(stack(1, 2)));
        grid.set(0, 1, Some(stack(4, 7)));
        let totals = grid.aggregate();
        assert_eq!(totals.get(&ItemId::new(1).unwrap()), Some(&5));
        assert_eq!(totals.get(&ItemId::new(4).unwrap()), Some(&7));
    }

    #[test]
    fn drain_returns_row_major_stacks() {
        let mut grid = CraftingGrid::new();
        grid.set(1, 0, Some(stack(3, 1)));
        grid.set(0, 1, Some(stack(2, 1)));
        let drained: Vec<u16> = grid.drain().iter().map(|s| s.item_id().get()).collect();
        assert_eq!(drained, vec![2, 3]);
        assert!(grid.is_empty());
    }
}
