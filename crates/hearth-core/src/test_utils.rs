//! Shared test helpers for unit tests, integration tests, and property tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::action::CreateFoodAction;
use crate::catalog::{Catalog, CatalogBuilder, CategoryKind, RecipeDef};
use crate::id::*;
use crate::inventory::*;
use crate::kitchen::KitchenState;
use crate::ledger::LedgerState;
use crate::reservation::Reservable;
use crate::state::{HouseState, RootState, VillageState};

// ===========================================================================
// Catalog fixture
// ===========================================================================

pub const OVEN: CategoryId = CategoryId(1);
pub const POT: CategoryId = CategoryId(2);
pub const KNIFE: CategoryId = CategoryId(3);
pub const BOWL: CategoryId = CategoryId(4);

/// 1 ingredient (type 7) + a knife, 5 blocks.
pub const CHOP: RecipeId = RecipeId(1);
/// 3 ingredients + a knife and a pot, 10 blocks.
pub const SOUP: RecipeId = RecipeId(2);
/// 1 ingredient + 1 food + an oven and a bowl, 3 blocks.
pub const ROAST: RecipeId = RecipeId(3);
/// 1 ingredient + 2 foods + every category, 20 blocks.
pub const FEAST: RecipeId = RecipeId(4);
/// 1 ingredient, no equipment, instant.
pub const RINSE: RecipeId = RecipeId(5);

pub fn test_catalog() -> Catalog {
    let mut b = CatalogBuilder::new();
    b.register_category(OVEN, "oven", CategoryKind::Main);
    b.register_category(POT, "pot", CategoryKind::Main);
    b.register_category(KNIFE, "knife", CategoryKind::Sub);
    b.register_category(BOWL, "bowl", CategoryKind::Sub);

    b.register_equipment(EquipmentId(1), "clay_oven", OVEN);
    b.register_equipment(EquipmentId(2), "iron_pot", POT);
    b.register_equipment(EquipmentId(3), "chef_knife", KNIFE);
    b.register_equipment(EquipmentId(4), "wooden_bowl", BOWL);

    let recipes = [
        (CHOP, "chopped_carrot", vec![7], vec![], vec![KNIFE], 1, 5),
        (SOUP, "carrot_soup", vec![7, 8, 8], vec![], vec![KNIFE, POT], 2, 10),
        (ROAST, "roast", vec![9], vec![1], vec![OVEN, BOWL], 3, 3),
        (FEAST, "feast", vec![7], vec![2, 3], vec![OVEN, POT, KNIFE, BOWL], 4, 20),
        (RINSE, "rinsed_rice", vec![10], vec![], vec![], 5, 0),
    ];
    for (id, name, ingredients, foods, categories, result, blocks) in recipes {
        b.register_recipe(RecipeDef {
            id,
            name: name.to_string(),
            ingredients: ingredients.into_iter().map(IngredientId).collect(),
            foods: foods.into_iter().map(FoodId).collect(),
            equipment_categories: categories,
            result: FoodId(result),
            required_blocks: blocks,
        });
    }

    // Fixture data is static; a failure here is a bug in this file.
    match b.build() {
        Ok(catalog) => catalog,
        Err(e) => panic!("test catalog is invalid: {e}"),
    }
}

// ===========================================================================
// Instance constructors
// ===========================================================================

pub fn signer() -> Address {
    Address([0x5a; 20])
}

pub fn ingredient(id: StateId, ty: u32) -> EdibleState {
    EdibleState::ingredient(id, IngredientId(ty), EdibleStats::default())
}

/// A finished food, available from block 1.
pub fn food(id: StateId, ty: u32) -> EdibleState {
    EdibleState::food(id, FoodId(ty), EdibleStats::default(), 1, 1)
}

pub fn main_equipment(id: StateId) -> KitchenEquipmentState {
    KitchenEquipmentState::new(id, EquipmentId(1), OVEN)
}

pub fn sub_equipment(id: StateId) -> KitchenEquipmentState {
    KitchenEquipmentState::new(id, EquipmentId(3), KNIFE)
}

/// A player with a house and an empty kitchen, owning nothing.
pub fn empty_house() -> RootState {
    RootState::new(
        InventoryState::new(),
        Some(VillageState::new(HouseState::new(1, 1, 1, KitchenState::new()))),
    )
}

/// Reserve one space of `root`'s kitchen for `[from, until)`.
pub fn reserve_space(
    root: RootState,
    number: SpaceNumber,
    from: BlockIndex,
    until: BlockIndex,
) -> RootState {
    let Some(kitchen) = root.kitchen() else {
        panic!("fixture state has no kitchen");
    };
    let mut kitchen = kitchen.clone();
    kitchen.space_mut(number).reserve(from, until);
    match root.with_kitchen(kitchen) {
        Ok(root) => root,
        Err(e) => panic!("fixture kitchen rejected: {e}"),
    }
}

pub fn ledger_with(root: &RootState) -> LedgerState {
    let bytes = match root.serialize() {
        Ok(bytes) => bytes,
        Err(e) => panic!("fixture state failed to encode: {e}"),
    };
    LedgerState::new().with_state(signer(), bytes)
}

// ===========================================================================
// Recipe presets
// ===========================================================================

/// A player state holding exactly what one recipe needs, plus the candidate
/// lists that select it.
#[derive(Debug, Clone)]
pub struct Preset {
    pub root: RootState,
    pub edible_ids: Vec<StateId>,
    pub equipment_ids: Vec<StateId>,
    pub space_numbers: Vec<SpaceNumber>,
}

impl Preset {
    pub fn ledger(&self) -> LedgerState {
        ledger_with(&self.root)
    }

    pub fn create_food(&self, recipe: RecipeId, output: StateId) -> CreateFoodAction {
        CreateFoodAction::new(
            recipe,
            output,
            self.edible_ids.clone(),
            self.equipment_ids.clone(),
            self.space_numbers.clone(),
        )
    }
}

/// Build a preset for `recipe`: one edible per required item type, one
/// equipment instance per required category (the first catalog entry of
/// that category), `main` ones installed into consecutive spaces.
pub fn preset_for(catalog: &Catalog, recipe: RecipeId) -> Preset {
    let Some(recipe) = catalog.recipe(recipe) else {
        panic!("recipe {recipe:?} not in catalog");
    };

    let mut next = 1u8;
    let mut fresh = move || {
        let id = StateId([next; 16]);
        next += 1;
        id
    };

    let mut inventory = InventoryState::new();
    let mut edible_ids = Vec::new();
    for required in recipe.required_edibles() {
        let id = fresh();
        let edible = match required {
            EdibleType::Ingredient(ty) => ingredient(id, ty.0),
            EdibleType::Food(ty) => food(id, ty.0),
        };
        inventory = add(inventory.add_edible(edible));
        edible_ids.push(id);
    }

    let mut kitchen = KitchenState::new();
    let mut equipment_ids = Vec::new();
    let mut space_numbers = Vec::new();
    let mut spaces = SpaceNumber::ALL.into_iter();
    for &category_id in &recipe.equipment_categories {
        let (Some(category), Some(def)) = (
            catalog.equipment_category(category_id),
            catalog.equipment_by_category(category_id).first().copied(),
        ) else {
            panic!("category {category_id:?} has no equipment");
        };
        let id = fresh();
        let equipment = KitchenEquipmentState::new(id, def.id, category_id);
        inventory = add(inventory.add_equipment(equipment));
        match category.kind {
            CategoryKind::Main => {
                let Some(number) = spaces.next() else {
                    panic!("recipe needs more than three main categories");
                };
                kitchen = add(kitchen.install_equipment(id, number));
                space_numbers.push(number);
            }
            CategoryKind::Sub => equipment_ids.push(id),
        }
    }

    Preset {
        root: RootState::new(
            inventory,
            Some(VillageState::new(HouseState::new(1, 1, 1, kitchen))),
        ),
        edible_ids,
        equipment_ids,
        space_numbers,
    }
}

fn add<T>(result: Result<T, StateError>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => panic!("fixture mutation failed: {e}"),
    }
}
