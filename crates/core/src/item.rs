//! Item identities and bounded item stacks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU16;
use thiserror::Error;

/// Maximum number of items a single stack may hold. Shared by every item.
pub const MAX_STACK_SIZE: u32 = 64;

/// Item identifier referencing the item catalog.
///
/// Id 0 is reserved and can never be constructed; "no item" is expressed as
/// `Option<ItemId>` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(NonZeroU16);

impl ItemId {
    /// Create an id from a raw value, returning `None` for 0.
    pub const fn new(raw: u16) -> Option<Self> {
        match NonZeroU16::new(raw) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Create an id from an untrusted integer (save files, data packs).
    pub fn from_raw(raw: i64) -> Option<Self> {
        u16::try_from(raw).ok().and_then(Self::new)
    }

    /// Raw numeric value.
    pub const fn get(self) -> u16 {
        self.0.get()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors raised when constructing an [`ItemStack`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StackError {
    /// Non-positive item id or a quantity outside `1..=MAX_STACK_SIZE`.
    #[error("invalid stack: item id {item_id}, quantity {quantity}")]
    InvalidStack {
        /// Offending item id as supplied.
        item_id: i64,
        /// Offending quantity as supplied.
        quantity: i64,
    },
}

/// A quantity of one item type, bounded by [`MAX_STACK_SIZE`].
///
/// A stack never holds zero items while resident in a slot; code that drains
/// a stack must clear the slot (see [`drain_slot`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawItemStack")]
pub struct ItemStack {
    item_id: ItemId,
    quantity: u32,
}

#[derive(Deserialize)]
struct RawItemStack {
    item_id: i64,
    quantity: i64,
}

impl TryFrom<RawItemStack> for ItemStack {
    type Error = StackError;

    fn try_from(raw: RawItemStack) -> Result<Self, Self::Error> {
        ItemStack::from_raw(raw.item_id, raw.quantity)
    }
}

impl ItemStack {
    /// Create a stack, rejecting quantities outside `1..=MAX_STACK_SIZE`.
    pub fn new(item_id: ItemId, quantity: u32) -> Result<Self, StackError> {
        if quantity == 0 || quantity > MAX_STACK_SIZE {
            return Err(StackError::InvalidStack {
                item_id: i64::from(item_id.get()),
                quantity: i64::from(quantity),
            });
        }
        Ok(Self { item_id, quantity })
    }

    /// Create a stack from untrusted integers.
    pub fn from_raw(item_id: i64, quantity: i64) -> Result<Self, StackError> {
        let invalid = StackError::InvalidStack { item_id, quantity };
        let id = ItemId::from_raw(item_id).ok_or(invalid.clone())?;
        let quantity = u32::try_from(quantity).map_err(|_| invalid)?;
        Self::new(id, quantity)
    }

    /// Item identity of this stack.
    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    /// Number of items in the stack.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Stack cap for this item.
    pub fn max_stack_size(&self) -> u32 {
        MAX_STACK_SIZE
    }

    /// Whether another stack holds the same item.
    pub fn can_merge(&self, other: &ItemStack) -> bool {
        self.item_id == other.item_id
    }

    /// Whether the stack is at its cap.
    pub fn is_full(&self) -> bool {
        self.quantity >= self.max_stack_size()
    }

    /// True once every item has been removed.
    pub fn is_empty(&self) -> bool {
        self.quantity == 0
    }

    /// Spare capacity before hitting the cap.
    pub fn remaining_space(&self) -> u32 {
        self.max_stack_size().saturating_sub(self.quantity)
    }

    /// How many of `amount` would fit. No side effects.
    pub fn can_add(&self, amount: u32) -> u32 {
        amount.min(self.remaining_space())
    }

    /// Add up to `amount` items, returning how many were actually added.
    ///
    /// The caller routes the remainder elsewhere.
    pub fn add(&mut self, amount: u32) -> u32 {
        let added = self.can_add(amount);
        self.quantity += added;
        added
    }

    /// Remove up to `amount` items, returning how many were removed.
    pub fn remove(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.quantity);
        self.quantity -= removed;
        removed
    }

    /// Split `amount` items off into a new stack.
    ///
    /// Refuses to split zero items or the entire stack.
    pub fn split(&mut self, amount: u32) -> Option<ItemStack> {
        if amount == 0 || amount >= self.quantity {
            return None;
        }
        self.quantity -= amount;
        Some(ItemStack {
            item_id: self.item_id,
            quantity: amount,
        })
    }

    /// Number of items a "take half" action lifts: `ceil(quantity / 2)`.
    pub fn half_rounded_up(&self) -> u32 {
        self.quantity.div_ceil(2)
    }
}

/// Remove up to `amount` items from a slot, clearing it once it is drained.
///
/// Returns the number of items removed.
pub fn drain_slot(slot: &mut Option<ItemStack>, amount: u32) -> u32 {
    let Some(stack) = slot.as_mut() else {
        return 0;
    };
    let removed = stack.remove(amount);
    if stack.is_empty() {
        *slot = None;
    }
    removed
}
