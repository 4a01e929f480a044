//! Matching caller-supplied instances against a recipe's requirements.
//!
//! Matching is a greedy single pass in the recipe's declared order: every
//! requirement takes the first suitable candidate not already taken by an
//! earlier requirement, and the first requirement that cannot be satisfied
//! decides the error. Nothing is mutated here; the caller applies the
//! returned [`RecipeMatch`].
//!
//! Candidates after the one that satisfies a requirement are never
//! inspected for that requirement, and candidates no requirement needed are
//! ignored.

use crate::action::{ActionError, InUse, Missing, Requirement};
use crate::catalog::{Catalog, CategoryKind, RecipeDef};
use crate::id::*;
use crate::reservation::Reservable;
use crate::state::RootState;
use std::collections::BTreeSet;

/// Caller-supplied instance references offered to a recipe.
#[derive(Debug, Clone, Copy)]
pub struct Candidates<'a> {
    pub edibles: &'a [StateId],
    pub equipment: &'a [StateId],
    pub spaces: &'a [SpaceNumber],
}

/// The instances selected to satisfy a recipe, in requirement order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeMatch {
    /// Edibles to consume.
    pub edibles: Vec<StateId>,
    /// Free-standing equipment to reserve.
    pub equipment: Vec<StateId>,
    /// Appliance spaces (with their installed equipment) to reserve.
    pub spaces: Vec<SpaceNumber>,
}

/// Match `candidates` against every requirement of `recipe` at `block_index`.
pub fn match_recipe(
    recipe: &RecipeDef,
    catalog: &Catalog,
    root: &RootState,
    candidates: Candidates<'_>,
    block_index: BlockIndex,
) -> Result<RecipeMatch, ActionError> {
    let mut selected = RecipeMatch::default();

    let mut taken_edibles = BTreeSet::new();
    for required in recipe.required_edibles() {
        let id = match_edible(root, candidates.edibles, &taken_edibles, required, block_index)?;
        tracing::trace!(%id, %required, "matched edible");
        taken_edibles.insert(id);
        selected.edibles.push(id);
    }

    let mut taken_equipment = BTreeSet::new();
    let mut taken_spaces = BTreeSet::new();
    for &category_id in &recipe.equipment_categories {
        let category = catalog
            .equipment_category(category_id)
            .ok_or(ActionError::NotFoundData(Missing::Category(category_id)))?;
        match category.kind {
            CategoryKind::Sub => {
                let id = match_equipment(
                    root,
                    candidates.equipment,
                    &taken_equipment,
                    category_id,
                    block_index,
                )?;
                tracing::trace!(%id, category = category_id.0, "matched equipment");
                taken_equipment.insert(id);
                selected.equipment.push(id);
            }
            CategoryKind::Main => {
                let number = match_space(
                    root,
                    candidates.spaces,
                    &taken_spaces,
                    category_id,
                    block_index,
                )?;
                tracing::trace!(
                    space = %number,
                    category = category_id.0,
                    "matched appliance space"
                );
                taken_spaces.insert(number);
                selected.spaces.push(number);
            }
        }
    }

    Ok(selected)
}

fn match_edible(
    root: &RootState,
    candidates: &[StateId],
    taken: &BTreeSet<StateId>,
    required: EdibleType,
    block_index: BlockIndex,
) -> Result<StateId, ActionError> {
    for &id in candidates {
        if taken.contains(&id) {
            continue;
        }
        let edible = root
            .inventory
            .edible(id)
            .ok_or(ActionError::NotFoundData(Missing::Edible(id)))?;
        // A food still being cooked is not a usable input yet.
        if edible.edible_type == required && edible.is_available(block_index) {
            return Ok(id);
        }
    }
    Err(ActionError::NotHaveRequired(Requirement::Edible(required)))
}

fn match_equipment(
    root: &RootState,
    candidates: &[StateId],
    taken: &BTreeSet<StateId>,
    category: CategoryId,
    block_index: BlockIndex,
) -> Result<StateId, ActionError> {
    let mut busy = None;
    for &id in candidates {
        if taken.contains(&id) {
            continue;
        }
        let equipment = root
            .inventory
            .equipment(id)
            .ok_or(ActionError::NotFoundData(Missing::Equipment(id)))?;
        if equipment.category_id != category {
            continue;
        }
        if equipment.is_in_use(block_index) {
            busy.get_or_insert(id);
            continue;
        }
        return Ok(id);
    }
    Err(match busy {
        Some(id) => ActionError::AlreadyUsingEquipment(InUse::Equipment(id)),
        None => ActionError::NotHaveRequired(Requirement::Category(category)),
    })
}

fn match_space(
    root: &RootState,
    candidates: &[SpaceNumber],
    taken: &BTreeSet<SpaceNumber>,
    category: CategoryId,
    block_index: BlockIndex,
) -> Result<SpaceNumber, ActionError> {
    let mut busy = None;
    for &number in candidates {
        if taken.contains(&number) {
            continue;
        }
        let kitchen = root
            .kitchen()
            .ok_or(ActionError::NotFoundData(Missing::Kitchen))?;
        let space = kitchen.space(number);
        let installed = space
            .installed
            .ok_or(ActionError::NotFoundData(Missing::InstalledEquipment(number)))?;
        let equipment = root
            .inventory
            .equipment(installed)
            .ok_or(ActionError::NotFoundData(Missing::Equipment(installed)))?;
        if equipment.category_id != category {
            continue;
        }
        if space.is_in_use(block_index) || equipment.is_in_use(block_index) {
            busy.get_or_insert(number);
            continue;
        }
        return Ok(number);
    }
    Err(match busy {
        Some(number) => ActionError::AlreadyUsingEquipment(InUse::Space(number)),
        None => ActionError::NotHaveRequired(Requirement::Category(category)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogBuilder;
    use crate::inventory::*;
    use crate::kitchen::KitchenState;
    use crate::state::{HouseState, VillageState};
    use crate::test_utils::reserve_space;

    const PAN: CategoryId = CategoryId(3);
    const OVEN: CategoryId = CategoryId(4);

    fn id(n: u8) -> StateId {
        StateId([n; 16])
    }

    fn catalog() -> Catalog {
        let mut b = CatalogBuilder::new();
        b.register_category(PAN, "pan", CategoryKind::Sub);
        b.register_category(OVEN, "oven", CategoryKind::Main);
        b.build().unwrap()
    }

    fn recipe(ingredients: Vec<u32>, foods: Vec<u32>, categories: Vec<CategoryId>) -> RecipeDef {
        RecipeDef {
            id: RecipeId(1),
            name: "test".to_string(),
            ingredients: ingredients.into_iter().map(IngredientId).collect(),
            foods: foods.into_iter().map(FoodId).collect(),
            equipment_categories: categories,
            result: FoodId(100),
            required_blocks: 5,
        }
    }

    fn ingredient(n: u8, ty: u32) -> EdibleState {
        EdibleState::ingredient(id(n), IngredientId(ty), EdibleStats::default())
    }

    fn root_with(edibles: Vec<EdibleState>, equipment: Vec<KitchenEquipmentState>) -> RootState {
        let mut inventory = InventoryState::new();
        for e in edibles {
            inventory = inventory.add_edible(e).unwrap();
        }
        for e in equipment {
            inventory = inventory.add_equipment(e).unwrap();
        }
        RootState::new(
            inventory,
            Some(VillageState::new(HouseState::new(1, 1, 1, KitchenState::new()))),
        )
    }

    fn install(root: RootState, equipment: StateId, number: SpaceNumber) -> RootState {
        let kitchen = root
            .kitchen()
            .unwrap()
            .clone()
            .install_equipment(equipment, number)
            .unwrap();
        root.with_kitchen(kitchen).unwrap()
    }

    fn oven(n: u8) -> KitchenEquipmentState {
        KitchenEquipmentState::new(id(n), EquipmentId(1), OVEN)
    }

    fn run(
        recipe: &RecipeDef,
        root: &RootState,
        edibles: &[StateId],
        equipment: &[StateId],
        spaces: &[SpaceNumber],
    ) -> Result<RecipeMatch, ActionError> {
        match_recipe(
            recipe,
            &catalog(),
            root,
            Candidates {
                edibles,
                equipment,
                spaces,
            },
            1,
        )
    }

    #[test]
    fn matches_ingredients_in_declared_order() {
        let root = root_with(vec![ingredient(1, 8), ingredient(2, 7)], vec![]);
        let m = run(&recipe(vec![7, 8], vec![], vec![]), &root, &[id(1), id(2)], &[], &[]).unwrap();
        assert_eq!(m.edibles, vec![id(2), id(1)]);
    }

    #[test]
    fn same_candidate_never_satisfies_two_requirements() {
        let root = root_with(vec![ingredient(1, 7)], vec![]);
        let result = run(&recipe(vec![7, 7], vec![], vec![]), &root, &[id(1), id(1)], &[], &[]);
        assert_eq!(
            result,
            Err(ActionError::NotHaveRequired(Requirement::Edible(
                EdibleType::Ingredient(IngredientId(7))
            )))
        );
    }

    #[test]
    fn missing_edible_is_not_found() {
        let root = root_with(vec![], vec![]);
        let result = run(&recipe(vec![7], vec![], vec![]), &root, &[id(1)], &[], &[]);
        assert_eq!(result, Err(ActionError::NotFoundData(Missing::Edible(id(1)))));
    }

    #[test]
    fn ingredient_does_not_satisfy_food_with_same_number() {
        let root = root_with(vec![ingredient(1, 7)], vec![]);
        let result = run(&recipe(vec![], vec![7], vec![]), &root, &[id(1)], &[], &[]);
        assert!(matches!(result, Err(ActionError::NotHaveRequired(_))));
    }

    #[test]
    fn food_still_cooking_is_not_usable() {
        let food = EdibleState::food(id(1), FoodId(9), EdibleStats::default(), 1, 10);
        let root = root_with(vec![food], vec![]);
        let result = run(&recipe(vec![], vec![9], vec![]), &root, &[id(1)], &[], &[]);
        assert!(matches!(result, Err(ActionError::NotHaveRequired(_))));
    }

    #[test]
    fn leftover_candidates_are_ignored() {
        let root = root_with(vec![ingredient(1, 7), ingredient(2, 8)], vec![]);
        let m = run(
            &recipe(vec![7], vec![], vec![]),
            &root,
            &[id(1), id(2), id(99)],
            &[],
            &[],
        ).unwrap();
        assert_eq!(m.edibles, vec![id(1)]);
    }

    #[test]
    fn sub_equipment_matches_by_category() {
        let pan = KitchenEquipmentState::new(id(5), EquipmentId(1), PAN);
        let root = root_with(vec![], vec![pan]);
        let m = run(&recipe(vec![], vec![], vec![PAN]), &root, &[], &[id(5)], &[]).unwrap();
        assert_eq!(m.equipment, vec![id(5)]);
        assert!(m.spaces.is_empty());
    }

    #[test]
    fn busy_sub_equipment_reports_in_use() {
        let mut pan = KitchenEquipmentState::new(id(5), EquipmentId(1), PAN);
        pan.reserve(0, 2);
        let root = root_with(vec![], vec![pan]);
        let result = run(&recipe(vec![], vec![], vec![PAN]), &root, &[], &[id(5)], &[]);
        assert_eq!(result, Err(ActionError::AlreadyUsingEquipment(InUse::Equipment(id(5)))));
    }

    #[test]
    fn free_equipment_later_in_list_beats_busy_one() {
        let mut busy = KitchenEquipmentState::new(id(5), EquipmentId(1), PAN);
        busy.reserve(0, 2);
        let free = KitchenEquipmentState::new(id(6), EquipmentId(1), PAN);
        let root = root_with(vec![], vec![busy, free]);
        let m = run(&recipe(vec![], vec![], vec![PAN]), &root, &[], &[id(5), id(6)], &[]).unwrap();
        assert_eq!(m.equipment, vec![id(6)]);
    }

    #[test]
    fn main_requirement_ignores_free_standing_equipment() {
        let oven = KitchenEquipmentState::new(id(5), EquipmentId(1), OVEN);
        let root = root_with(vec![], vec![oven]);
        let result = run(&recipe(vec![], vec![], vec![OVEN]), &root, &[], &[id(5)], &[]);
        assert_eq!(result, Err(ActionError::NotHaveRequired(Requirement::Category(OVEN))));
    }

    #[test]
    fn sub_requirement_ignores_installed_main_equipment() {
        let oven = KitchenEquipmentState::new(id(5), EquipmentId(1), OVEN);
        let root = install(root_with(vec![], vec![oven]), id(5), SpaceNumber::FIRST);
        let result = run(
            &recipe(vec![], vec![], vec![PAN]),
            &root,
            &[],
            &[],
            &[SpaceNumber::FIRST],
        );
        assert_eq!(result, Err(ActionError::NotHaveRequired(Requirement::Category(PAN))));
    }

    #[test]
    fn main_equipment_matches_through_space() {
        let oven = KitchenEquipmentState::new(id(5), EquipmentId(1), OVEN);
        let root = install(root_with(vec![], vec![oven]), id(5), SpaceNumber::THIRD);
        let m = run(
            &recipe(vec![], vec![], vec![OVEN]),
            &root,
            &[],
            &[],
            &[SpaceNumber::FIRST, SpaceNumber::THIRD],
        );
        // Space 1 is empty, so it is reported before space 3 is reached.
        assert_eq!(
            m,
            Err(ActionError::NotFoundData(Missing::InstalledEquipment(SpaceNumber::FIRST)))
        );

        let m = run(
            &recipe(vec![], vec![], vec![OVEN]),
            &root,
            &[],
            &[],
            &[SpaceNumber::THIRD],
        ).unwrap();
        assert_eq!(m.spaces, vec![SpaceNumber::THIRD]);
    }

    #[test]
    fn installed_but_unowned_equipment_is_not_found() {
        let root = install(root_with(vec![], vec![]), id(5), SpaceNumber::FIRST);
        let result = run(
            &recipe(vec![], vec![], vec![OVEN]),
            &root,
            &[],
            &[],
            &[SpaceNumber::FIRST],
        );
        assert_eq!(result, Err(ActionError::NotFoundData(Missing::Equipment(id(5)))));
    }

    #[test]
    fn no_kitchen_is_not_found() {
        let root = RootState::default();
        let result = run(
            &recipe(vec![], vec![], vec![OVEN]),
            &root,
            &[],
            &[],
            &[SpaceNumber::FIRST],
        );
        assert_eq!(result, Err(ActionError::NotFoundData(Missing::Kitchen)));
    }

    #[test]
    fn unknown_category_is_not_found() {
        let root = root_with(vec![], vec![]);
        let result = run(&recipe(vec![], vec![], vec![CategoryId(77)]), &root, &[], &[], &[]);
        assert_eq!(result, Err(ActionError::NotFoundData(Missing::Category(CategoryId(77)))));
    }

    #[test]
    fn busy_space_reports_in_use() {
        let root = install(root_with(vec![], vec![oven(5)]), id(5), SpaceNumber::SECOND);
        let root = reserve_space(root, SpaceNumber::SECOND, 0, 3);
        let result = run(
            &recipe(vec![], vec![], vec![OVEN]),
            &root,
            &[],
            &[],
            &[SpaceNumber::SECOND],
        );
        assert_eq!(
            result,
            Err(ActionError::AlreadyUsingEquipment(InUse::Space(SpaceNumber::SECOND)))
        );
    }

    #[test]
    fn free_space_later_in_list_beats_busy_one() {
        let root = root_with(vec![], vec![oven(5), oven(6)]);
        let root = install(root, id(5), SpaceNumber::FIRST);
        let root = install(root, id(6), SpaceNumber::SECOND);
        let root = reserve_space(root, SpaceNumber::FIRST, 0, 3);

        let spaces = [SpaceNumber::FIRST, SpaceNumber::SECOND];
        let m = run(&recipe(vec![], vec![], vec![OVEN]), &root, &[], &[], &spaces).unwrap();
        assert_eq!(m.spaces, vec![SpaceNumber::SECOND]);
    }

    #[test]
    fn space_is_busy_while_its_installed_equipment_is() {
        let mut busy = oven(5);
        busy.reserve(1, 4);
        let root = install(root_with(vec![], vec![busy]), id(5), SpaceNumber::FIRST);
        let result = run(
            &recipe(vec![], vec![], vec![OVEN]),
            &root,
            &[],
            &[],
            &[SpaceNumber::FIRST],
        );
        assert_eq!(
            result,
            Err(ActionError::AlreadyUsingEquipment(InUse::Space(SpaceNumber::FIRST)))
        );
    }
}
