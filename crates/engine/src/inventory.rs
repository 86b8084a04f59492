//! Fixed-size slot inventory.
//!
//! Slots are scanned in ascending index order by every operation; insertion
//! fills existing stacks of the same item before opening new ones so the
//! resulting layout is deterministic.

use craftbench_core::{drain_slot, ItemId, ItemStack, MAX_STACK_SIZE};
use std::collections::BTreeMap;

/// Number of slots in the player inventory.
pub const INVENTORY_SIZE: usize = 36;

/// Ordered sequence of slots, each empty or holding exactly one stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    slots: Vec<Option<ItemStack>>,
}

impl Inventory {
    /// Create an empty inventory with [`INVENTORY_SIZE`] slots.
    pub fn new() -> Self {
        Self::with_size(INVENTORY_SIZE)
    }

    /// Create an empty inventory with `size` slots (at least one).
    pub fn with_size(size: usize) -> Self {
        Self {
            slots: vec![None; size.max(1)],
        }
    }

    /// Number of slots.
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Get the stack in a slot.
    pub fn get(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Mutable access to a whole slot, `None` when out of range.
    pub fn slot_mut(&mut self, slot: usize) -> Option<&mut Option<ItemStack>> {
        self.slots.get_mut(slot)
    }

    /// Replace a slot's contents. Returns false when out of range.
    pub fn set(&mut self, slot: usize, stack: Option<ItemStack>) -> bool {
        match self.slots.get_mut(slot) {
            Some(target) => {
                *target = stack;
                true
            }
            None => false,
        }
    }

    /// Take a stack out of a slot, leaving it empty.
    pub fn take(&mut self, slot: usize) -> Option<ItemStack> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    /// Lowest-index empty slot.
    pub fn first_empty_slot(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// Deposit `quantity` items, returning how many did not fit.
    ///
    /// Existing stacks of the item are topped up in slot order first; the
    /// remainder opens new stacks in the lowest empty slots. A non-zero
    /// return means the inventory is full and the caller must surface the
    /// loss.
    pub fn add_items(&mut self, item_id: ItemId, quantity: u32) -> u32 {
        let mut remaining = quantity;

        for stack in self.slots.iter_mut().flatten() {
            if remaining == 0 {
                break;
            }
            if stack.item_id() == item_id && !stack.is_full() {
                remaining -= stack.add(remaining);
            }
        }

        while remaining > 0 {
            let Some(index) = self.first_empty_slot() else {
                break;
            };
            let size = remaining.min(MAX_STACK_SIZE);
            match ItemStack::new(item_id, size) {
                Ok(stack) => self.slots[index] = Some(stack),
                Err(_) => break,
            }
            remaining -= size;
        }

        remaining
    }

    /// Deposit a whole stack, returning whatever did not fit as a stack.
    pub fn add_stack(&mut self, stack: ItemStack) -> Option<ItemStack> {
        let leftover = self.add_items(stack.item_id(), stack.quantity());
        if leftover == 0 {
            return None;
        }
        ItemStack::new(stack.item_id(), leftover).ok()
    }

    /// Remove up to `amount` items of a type in slot order, returning the
    /// number removed.
    pub fn remove_items(&mut self, item_id: ItemId, amount: u32) -> u32 {
        let mut remaining = amount;
        for slot in &mut self.slots {
            if remaining == 0 {
                break;
            }
            if slot.as_ref().is_some_and(|s| s.item_id() == item_id) {
                remaining -= drain_slot(slot, remaining);
            }
        }
        amount - remaining
    }

    /// Total number of an item across all slots.
    pub fn count_item(&self, item_id: ItemId) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|stack| stack.item_id() == item_id)
            .map(ItemStack::quantity)
            .sum()
    }

    /// Whether at least `amount` of the item is present.
    pub fn has_item(&self, item_id: ItemId, amount: u32) -> bool {
        self.count_item(item_id) >= amount
    }

    /// First slot holding the item.
    pub fn find_item(&self, item_id: ItemId) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|s| s.item_id() == item_id))
    }

    /// Number of empty slots.
    pub fn empty_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }

    /// Whether every slot is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Whether every slot is occupied.
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Iterate `(slot_index, contents)` in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<&ItemStack>)> + '_ {
        self.slots.iter().enumerate().map(|(i, s)| (i, s.as_ref()))
    }

    /// Per-item totals across the inventory.
    pub fn totals(&self) -> BTreeMap<ItemId, u32> {
        let mut totals = BTreeMap::new();
        for stack in self.slots.iter().flatten() {
            *totals.entry(stack.item_id()).or_insert(0) += stack.quantity();
        }
        totals
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}
