use crate::id::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether equipment of a category is installed into an appliance space
/// (`Main`) or used straight from the inventory (`Sub`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Main,
    Sub,
}

/// An equipment category definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipmentCategoryDef {
    pub id: CategoryId,
    pub name: String,
    pub kind: CategoryKind,
}

/// A kitchen equipment item type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KitchenEquipmentDef {
    pub id: EquipmentId,
    pub name: String,
    pub category: CategoryId,
}

/// A recipe definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDef {
    pub id: RecipeId,
    pub name: String,
    pub ingredients: Vec<IngredientId>,
    pub foods: Vec<FoodId>,
    pub equipment_categories: Vec<CategoryId>,
    pub result: FoodId,
    /// Blocks until the produced food becomes available.
    pub required_blocks: BlockIndex,
}

impl RecipeDef {
    /// Ingredient requirements followed by food requirements, in declared order.
    pub fn required_edibles(&self) -> impl Iterator<Item = EdibleType> + '_ {
        self.ingredients
            .iter()
            .copied()
            .map(EdibleType::Ingredient)
            .chain(self.foods.iter().copied().map(EdibleType::Food))
    }
}

/// Builder for constructing an immutable [`Catalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    recipes: Vec<RecipeDef>,
    categories: Vec<EquipmentCategoryDef>,
    equipment: Vec<KitchenEquipmentDef>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a category. Duplicates are reported by [`build`](Self::build).
    pub fn register_category(
        &mut self,
        id: CategoryId,
        name: &str,
        kind: CategoryKind,
    ) -> CategoryId {
        self.categories.push(EquipmentCategoryDef {
            id,
            name: name.to_string(),
            kind,
        });
        id
    }

    /// Queue an equipment type belonging to `category`.
    pub fn register_equipment(
        &mut self,
        id: EquipmentId,
        name: &str,
        category: CategoryId,
    ) -> EquipmentId {
        self.equipment.push(KitchenEquipmentDef {
            id,
            name: name.to_string(),
            category,
        });
        id
    }

    /// Queue a recipe. Its categories are checked at build time.
    pub fn register_recipe(&mut self, recipe: RecipeDef) -> RecipeId {
        let id = recipe.id;
        self.recipes.push(recipe);
        id
    }

    /// Finalize. Rejects duplicate ids and dangling category references.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        let mut categories = BTreeMap::new();
        for category in self.categories {
            let id = category.id;
            if categories.insert(id, category).is_some() {
                return Err(CatalogError::DuplicateCategory(id));
            }
        }

        let mut equipment = BTreeMap::new();
        for def in self.equipment {
            if !categories.contains_key(&def.category) {
                return Err(CatalogError::UnknownCategory(def.category));
            }
            let id = def.id;
            if equipment.insert(id, def).is_some() {
                return Err(CatalogError::DuplicateEquipment(id));
            }
        }

        let mut recipes = BTreeMap::new();
        for recipe in self.recipes {
            if let Some(missing) = recipe
                .equipment_categories
                .iter()
                .find(|c| !categories.contains_key(c))
            {
                return Err(CatalogError::UnknownCategory(*missing));
            }
            let id = recipe.id;
            if recipes.insert(id, recipe).is_some() {
                return Err(CatalogError::DuplicateRecipe(id));
            }
        }

        Ok(Catalog {
            recipes,
            categories,
            equipment,
        })
    }
}

/// Immutable catalog of recipes and equipment. Frozen after `build()` and
/// shared read-only by every transition.
#[derive(Debug, Default)]
pub struct Catalog {
    recipes: BTreeMap<RecipeId, RecipeDef>,
    categories: BTreeMap<CategoryId, EquipmentCategoryDef>,
    equipment: BTreeMap<EquipmentId, KitchenEquipmentDef>,
}

impl Catalog {
    /// Look up a recipe by id.
    pub fn recipe(&self, id: RecipeId) -> Option<&RecipeDef> {
        self.recipes.get(&id)
    }

    /// Look up a category, which tells whether it is installed or free-standing.
    pub fn equipment_category(&self, id: CategoryId) -> Option<&EquipmentCategoryDef> {
        self.categories.get(&id)
    }

    pub fn equipment(&self, id: EquipmentId) -> Option<&KitchenEquipmentDef> {
        self.equipment.get(&id)
    }

    /// All equipment types in a category, ordered by id.
    pub fn equipment_by_category(&self, id: CategoryId) -> Vec<&KitchenEquipmentDef> {
        self.equipment.values().filter(|e| e.category == id).collect()
    }

    /// All recipes in ascending id order.
    pub fn recipes(&self) -> impl Iterator<Item = &RecipeDef> {
        self.recipes.values()
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn equipment_count(&self) -> usize {
        self.equipment.len()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate recipe id: {0:?}")]
    DuplicateRecipe(RecipeId),
    #[error("duplicate equipment category id: {0:?}")]
    DuplicateCategory(CategoryId),
    #[error("duplicate equipment id: {0:?}")]
    DuplicateEquipment(EquipmentId),
    #[error("unknown equipment category reference: {0:?}")]
    UnknownCategory(CategoryId),
}
