use craftbench_core::{ItemId, MAX_STACK_SIZE};
use craftbench_engine::{Inventory, PointerButton, Session, SlotRef};
use craftbench_testkit::{standard_catalog, standard_recipes, ItemLedger, StandardIds};
use proptest::prelude::*;

const SLOTS: usize = 6;

fn click() -> impl Strategy<Value = (SlotRef, PointerButton)> {
    let slot = prop_oneof![
        (0..SLOTS).prop_map(SlotRef::Inventory),
        (0usize..2, 0usize..2).prop_map(|(row, col)| SlotRef::Grid(row, col)),
    ];
    let button = prop_oneof![Just(PointerButton::Primary), Just(PointerButton::Secondary)];
    (slot, button)
}

fn seeded_session(logs: u32, planks: u32, sticks: u32) -> Session {
    let catalog = standard_catalog().unwrap();
    let recipes = standard_recipes(&catalog).unwrap();
    let ids = StandardIds::resolve(&catalog).unwrap();
    let mut inventory = Inventory::with_size(SLOTS);
    for (item_id, quantity) in [(ids.log, logs), (ids.planks, planks), (ids.stick, sticks)] {
        assert_eq!(inventory.add_items(item_id, quantity), 0);
    }
    let mut session = Session::new(catalog, recipes, inventory);
    session.open_crafting();
    session
}

fn assert_caps(session: &Session) {
    let stacks = session
        .inventory()
        .iter()
        .filter_map(|(_, s)| s)
        .chain(session.grid().iter().filter_map(|(_, s)| s))
        .chain(session.held());
    for stack in stacks {
        assert!((1..=MAX_STACK_SIZE).contains(&stack.quantity()));
    }
}

proptest! {
    #[test]
    fn clicks_conserve_every_item(
        logs in 1u32..=100,
        planks in 1u32..=100,
        sticks in 0u32..=64,
        clicks in prop::collection::vec(click(), 0..80),
    ) {
        let mut session = seeded_session(logs, planks, sticks);
        let ledger = ItemLedger::capture(&session);
        let total_before: u32 = session.item_totals().values().sum();

        for (slot, button) in clicks {
            session.click(slot, button).unwrap();
            prop_assert!(ledger.assert_conserved(&session).is_ok());
            assert_caps(&session);
        }

        // A fragmented inventory can overflow when the grid is emptied back
        // into it; whatever is lost must be reported.
        let lost = session.close_crafting();
        let total_after: u32 = session.item_totals().values().sum();
        prop_assert_eq!(total_after + lost, total_before);
        prop_assert!(session.grid().is_empty());
        prop_assert!(session.held().is_none());
    }

    #[test]
    fn add_items_accounts_for_every_item(
        prefill in prop::collection::vec(prop::option::of((1u16..=3, 1u32..=MAX_STACK_SIZE)), 1..10),
        item in 1u16..=3,
        quantity in 0u32..=400,
    ) {
        let item_id = ItemId::new(item).unwrap();
        let mut inventory = Inventory::with_size(prefill.len());
        for (slot, entry) in prefill.iter().enumerate() {
            if let Some((raw, q)) = entry {
                let stack = craftbench_core::ItemStack::new(ItemId::new(*raw).unwrap(), *q).unwrap();
                inventory.set(slot, Some(stack));
            }
        }
        let before = inventory.count_item(item_id);

        let leftover = inventory.add_items(item_id, quantity);

        prop_assert_eq!(inventory.count_item(item_id) + leftover, before + quantity);
        for (_, stack) in inventory.iter() {
            if let Some(stack) = stack {
                prop_assert!(stack.quantity() >= 1 && stack.quantity() <= MAX_STACK_SIZE);
            }
        }
        if leftover > 0 {
            prop_assert!(inventory.is_full());
            prop_assert!(inventory
                .iter()
                .filter_map(|(_, s)| s)
                .filter(|s| s.item_id() == item_id)
                .all(|s| s.is_full()));
        }
    }
}
