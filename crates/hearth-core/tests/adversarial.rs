//! Adversarial input tests for kitchen actions.
//!
//! Malformed candidate lists, corrupt ledger bytes, and extreme block
//! heights must produce errors, never panics.

use hearth_core::action::*;
use hearth_core::catalog::Catalog;
use hearth_core::context::ActionContext;
use hearth_core::id::*;
use hearth_core::inventory::*;
use hearth_core::ledger::LedgerState;
use hearth_core::reservation::Reservable;
use hearth_core::serialize::DeserializeError;
use hearth_core::test_utils::*;

fn execute(
    action: &impl Action,
    catalog: &Catalog,
    previous: &LedgerState,
    block: BlockIndex,
) -> Result<LedgerState, ActionError> {
    let mut ctx = ActionContext::new(catalog, signer(), block);
    action.execute(&mut ctx, previous)
}

/// The same edible listed twice cannot fill two slots.
#[test]
fn duplicate_edible_candidate_counts_once() {
    let catalog = test_catalog();
    let preset = preset_for(&catalog, SOUP);
    // [carrot, onion, onion']: replace onion' with a second copy of onion.
    let mut edibles = preset.edible_ids.clone();
    edibles[2] = edibles[1];
    let action = CreateFoodAction::new(
        SOUP,
        StateId::new_v4(),
        edibles,
        preset.equipment_ids.clone(),
        preset.space_numbers.clone(),
    );

    let result = execute(&action, &catalog, &preset.ledger(), 1);
    assert_eq!(
        result,
        Err(ActionError::NotHaveRequired(Requirement::Edible(
            EdibleType::Ingredient(IngredientId(8))
        )))
    );
}

/// One space cannot serve two main categories.
#[test]
fn duplicate_space_number_counts_once() {
    let catalog = test_catalog();
    let preset = preset_for(&catalog, FEAST);
    let first = preset.space_numbers[0];
    let action = CreateFoodAction::new(
        FEAST,
        StateId::new_v4(),
        preset.edible_ids.clone(),
        preset.equipment_ids.clone(),
        vec![first, first],
    );

    let result = execute(&action, &catalog, &preset.ledger(), 1);
    assert_eq!(result, Err(ActionError::NotHaveRequired(Requirement::Category(POT))));
}

/// Main equipment handed in as a free-standing tool is not matched.
#[test]
fn main_equipment_in_sub_list_is_ignored() {
    let catalog = test_catalog();
    let preset = preset_for(&catalog, ROAST);
    let kitchen = preset.root.kitchen().unwrap();
    let oven = kitchen.space(preset.space_numbers[0]).installed.unwrap();
    let action = CreateFoodAction::new(
        ROAST,
        StateId::new_v4(),
        preset.edible_ids.clone(),
        vec![oven],
        vec![],
    );

    let result = execute(&action, &catalog, &preset.ledger(), 1);
    assert_eq!(result, Err(ActionError::NotHaveRequired(Requirement::Category(OVEN))));
}

#[test]
fn output_id_colliding_with_equipment_is_rejected() {
    let catalog = test_catalog();
    let preset = preset_for(&catalog, CHOP);
    let action = preset.create_food(CHOP, preset.equipment_ids[0]);
    let result = execute(&action, &catalog, &preset.ledger(), 1);
    assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidArgument);
}

#[test]
fn unknown_recipe_is_not_found() {
    let catalog = test_catalog();
    let preset = preset_for(&catalog, CHOP);
    let action = preset.create_food(RecipeId(u32::MAX), StateId::new_v4());
    let result = execute(&action, &catalog, &preset.ledger(), 1);
    assert_eq!(result, Err(ActionError::NotFoundData(Missing::Recipe(RecipeId(u32::MAX)))));
}

#[test]
fn corrupt_ledger_bytes_are_a_storage_error() {
    let catalog = test_catalog();
    let preset = preset_for(&catalog, CHOP);
    let ledger = LedgerState::new().with_state(signer(), vec![0xde, 0xad, 0xbe, 0xef, 0x00]);

    let action = preset.create_food(CHOP, StateId::new_v4());
    let err = execute(&action, &catalog, &ledger, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
}

#[test]
fn empty_ledger_bytes_are_a_storage_error() {
    let catalog = test_catalog();
    let ledger = LedgerState::new().with_state(signer(), Vec::new());
    let action = UninstallKitchenEquipmentAction::new(SpaceNumber::FIRST);
    let err = execute(&action, &catalog, &ledger, 1).unwrap_err();
    assert!(matches!(err, ActionError::Decode(DeserializeError::Decode(_))));
}

/// A window ending past `u64::MAX` saturates instead of overflowing.
#[test]
fn block_index_near_max_saturates() {
    let catalog = test_catalog();
    let preset = preset_for(&catalog, FEAST);
    let output = StateId::new_v4();
    let block = u64::MAX - 1;

    let action = preset.create_food(FEAST, output);
    let after = execute(&action, &catalog, &preset.ledger(), block).unwrap();
    let root = after.root_state(signer()).unwrap();
    assert_eq!(root.inventory.edible(output).unwrap().available_block_index, u64::MAX);
    for id in &preset.equipment_ids {
        assert!(root.inventory.equipment(*id).unwrap().is_in_use(block));
    }
}

#[test]
fn zero_duration_recipe_is_ready_immediately() {
    let catalog = test_catalog();
    let preset = preset_for(&catalog, RINSE);
    let output = StateId::new_v4();
    let after = execute(&preset.create_food(RINSE, output), &catalog, &preset.ledger(), 7).unwrap();
    let root = after.root_state(signer()).unwrap();
    assert!(root.inventory.edible(output).unwrap().is_available(7));
}

#[test]
fn rehearsal_produces_the_same_state() {
    let catalog = test_catalog();
    let preset = preset_for(&catalog, SOUP);
    let action = preset.create_food(SOUP, StateId([0xab; 16]));
    let before = preset.ledger();

    let mut real = ActionContext::new(&catalog, signer(), 3);
    let mut dry = ActionContext::new(&catalog, signer(), 3).rehearsal(true).with_seed(99);
    assert_eq!(action.execute(&mut real, &before), action.execute(&mut dry, &before));
}

// ===========================================================================
// Installation
// ===========================================================================

#[test]
fn install_sub_equipment_is_rejected() {
    let catalog = test_catalog();
    let knife = StateId([1; 16]);
    let inventory = InventoryState::new().add_equipment(sub_equipment(knife)).unwrap();
    let root = empty_house().with_inventory(inventory);
    let action = InstallKitchenEquipmentAction::new(knife, SpaceNumber::FIRST);

    let result = execute(&action, &catalog, &ledger_with(&root), 1);
    assert_eq!(result, Err(ActionError::NotHaveRequired(Requirement::Installable(KNIFE))));
}

#[test]
fn install_same_equipment_twice_is_rejected() {
    let catalog = test_catalog();
    let preset = preset_for(&catalog, ROAST);
    let oven = preset.root.kitchen().unwrap().space(SpaceNumber::FIRST).installed.unwrap();
    let action = InstallKitchenEquipmentAction::new(oven, SpaceNumber::THIRD);

    let err = execute(&action, &catalog, &preset.ledger(), 1).unwrap_err();
    assert_eq!(err, ActionError::State(StateError::AlreadyInstalled(oven, SpaceNumber::FIRST)));
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn install_without_house_is_not_found() {
    let catalog = test_catalog();
    let oven = StateId([1; 16]);
    let root = hearth_core::state::RootState::default()
        .with_inventory(InventoryState::new().add_equipment(main_equipment(oven)).unwrap());

    let action = InstallKitchenEquipmentAction::new(oven, SpaceNumber::FIRST);
    let result = execute(&action, &catalog, &ledger_with(&root), 1);
    assert_eq!(result, Err(ActionError::NotFoundData(Missing::Kitchen)));
}

#[test]
fn swapping_a_busy_space_is_rejected() {
    let catalog = test_catalog();
    let preset = preset_for(&catalog, ROAST);
    let roast = preset.create_food(ROAST, StateId::new_v4());
    let cooked = execute(&roast, &catalog, &preset.ledger(), 1).unwrap();

    let spare = StateId([0x33; 16]);
    let root = cooked.root_state(signer()).unwrap();
    let inventory = root.inventory.clone().add_equipment(main_equipment(spare)).unwrap();
    let root = root.with_inventory(inventory);
    let ledger = ledger_with(&root);

    let install = InstallKitchenEquipmentAction::new(spare, SpaceNumber::FIRST);
    let uninstall = UninstallKitchenEquipmentAction::new(SpaceNumber::FIRST);
    for block in [1, 2, 3] {
        assert_eq!(
            execute(&install, &catalog, &ledger, block),
            Err(ActionError::AlreadyUsingEquipment(InUse::Space(SpaceNumber::FIRST)))
        );
        assert_eq!(
            execute(&uninstall, &catalog, &ledger, block),
            Err(ActionError::AlreadyUsingEquipment(InUse::Space(SpaceNumber::FIRST)))
        );
    }

    // Window [1, 4) has ended.
    let after = execute(&install, &catalog, &ledger, 4).unwrap();
    let root = after.root_state(signer()).unwrap();
    assert_eq!(root.kitchen().unwrap().space(SpaceNumber::FIRST).installed, Some(spare));
}

#[test]
fn uninstall_empty_space_is_not_found() {
    let catalog = test_catalog();
    let action = UninstallKitchenEquipmentAction::new(SpaceNumber::SECOND);
    let result = execute(&action, &catalog, &ledger_with(&empty_house()), 1);
    assert_eq!(
        result,
        Err(ActionError::NotFoundData(Missing::InstalledEquipment(SpaceNumber::SECOND)))
    );
}

#[test]
fn uninstall_keeps_equipment_in_inventory() {
    let catalog = test_catalog();
    let preset = preset_for(&catalog, ROAST);
    let number = preset.space_numbers[0];
    let oven = preset.root.kitchen().unwrap().space(number).installed.unwrap();

    let action = UninstallKitchenEquipmentAction::new(number);
    let after = execute(&action, &catalog, &preset.ledger(), 1).unwrap();
    let root = after.root_state(signer()).unwrap();
    assert!(root.kitchen().unwrap().space(number).installed.is_none());
    assert!(root.inventory.equipment(oven).is_some());
}
