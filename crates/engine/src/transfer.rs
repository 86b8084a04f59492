//! Pointer-drag transfer protocol between the held stack and a slot.

use craftbench_core::{drain_slot, ItemStack};
use serde::{Deserialize, Serialize};
use std::mem;

/// How items move between the held stack and a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferMode {
    /// Lift the whole slot stack into an empty hand.
    TakeAll,
    /// Lift `ceil(quantity / 2)` into an empty hand.
    TakeHalf,
    /// Drop exactly one held item into the slot.
    PlaceOne,
    /// Drop the held stack into the slot, merging or swapping.
    PlaceAll,
}

/// Pointer button that triggered a slot click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    /// Left button.
    Primary,
    /// Right button.
    Secondary,
}

impl TransferMode {
    /// Mode for a click, depending on whether the hand is occupied.
    pub fn for_click(button: PointerButton, holding: bool) -> Self {
        match (button, holding) {
            (PointerButton::Primary, false) => TransferMode::TakeAll,
            (PointerButton::Primary, true) => TransferMode::PlaceAll,
            (PointerButton::Secondary, false) => TransferMode::TakeHalf,
            (PointerButton::Secondary, true) => TransferMode::PlaceOne,
        }
    }
}

/// Result of applying a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// `n` items changed location.
    Moved(u32),
    /// Held stack and slot exchanged contents wholesale.
    Swapped,
    /// Preconditions not met; nothing changed.
    Unchanged,
}

impl TransferOutcome {
    /// Whether any state changed.
    pub fn changed(self) -> bool {
        !matches!(self, TransferOutcome::Unchanged | TransferOutcome::Moved(0))
    }
}

/// Apply `mode` between the held stack and a slot.
///
/// Item totals across `held` and `slot` are conserved by every mode, no
/// stack exceeds the cap and emptied stacks are normalized to `None`.
/// Dropping a different item onto an occupied slot swaps the two stacks.
pub fn apply_transfer(
    held: &mut Option<ItemStack>,
    slot: &mut Option<ItemStack>,
    mode: TransferMode,
) -> TransferOutcome {
    match mode {
        TransferMode::TakeAll => {
            if held.is_some() {
                return TransferOutcome::Unchanged;
            }
            match slot.take() {
                Some(stack) => {
                    let moved = stack.quantity();
                    *held = Some(stack);
                    TransferOutcome::Moved(moved)
                }
                None => TransferOutcome::Unchanged,
            }
        }
        TransferMode::TakeHalf => {
            if held.is_some() {
                return TransferOutcome::Unchanged;
            }
            let Some(source) = slot.as_ref() else {
                return TransferOutcome::Unchanged;
            };
            let item_id = source.item_id();
            let take = source.half_rounded_up();
            if take == 0 {
                return TransferOutcome::Unchanged;
            }
            let Ok(lifted) = ItemStack::new(item_id, take) else {
                return TransferOutcome::Unchanged;
            };
            drain_slot(slot, take);
            *held = Some(lifted);
            TransferOutcome::Moved(take)
        }
        TransferMode::PlaceAll => {
            let Some(incoming) = held.as_ref() else {
                return TransferOutcome::Unchanged;
            };
            match slot.as_mut() {
                None => {
                    let moved = incoming.quantity();
                    *slot = held.take();
                    TransferOutcome::Moved(moved)
                }
                Some(target) if target.can_merge(incoming) => {
                    let moved = target.add(incoming.quantity());
                    drain_slot(held, moved);
                    TransferOutcome::Moved(moved)
                }
                Some(_) => {
                    mem::swap(held, slot);
                    TransferOutcome::Swapped
                }
            }
        }
        TransferMode::PlaceOne => {
            let Some(incoming) = held.as_ref() else {
                return TransferOutcome::Unchanged;
            };
            match slot.as_mut() {
                None => {
                    let Ok(single) = ItemStack::new(incoming.item_id(), 1) else {
                        return TransferOutcome::Unchanged;
                    };
                    *slot = Some(single);
                }
                Some(target) if target.can_merge(incoming) && !target.is_full() => {
                    target.add(1);
                }
                Some(_) => return TransferOutcome::Unchanged,
            }
            drain_slot(held, 1);
            TransferOutcome::Moved(1)
        }
    }
}
