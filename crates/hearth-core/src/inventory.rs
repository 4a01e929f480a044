use crate::id::*;
use crate::reservation::{Reservable, Reservation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Quality grade of an edible. Opaque to transitions; carried unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    #[default]
    D,
}

/// Per-instance stats of an edible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdibleStats {
    pub grade: Grade,
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

/// An owned edible instance kept in the refrigerator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdibleState {
    pub state_id: StateId,
    pub edible_type: EdibleType,
    pub stats: EdibleStats,
    /// Only crafted foods carry a level.
    pub level: Option<u32>,
    /// First block at which this instance may be used.
    pub available_block_index: BlockIndex,
}

impl EdibleState {
    /// A raw ingredient, available immediately.
    pub fn ingredient(state_id: StateId, ingredient: IngredientId, stats: EdibleStats) -> Self {
        Self {
            state_id,
            edible_type: EdibleType::Ingredient(ingredient),
            stats,
            level: None,
            available_block_index: 0,
        }
    }

    /// A cooked food at `level`, usable from `available_block_index` on.
    pub fn food(
        state_id: StateId,
        food: FoodId,
        stats: EdibleStats,
        level: u32,
        available_block_index: BlockIndex,
    ) -> Self {
        Self {
            state_id,
            edible_type: EdibleType::Food(food),
            stats,
            level: Some(level),
            available_block_index,
        }
    }

    /// Whether the edible can be used as an input at block `at`.
    pub fn is_available(&self, at: BlockIndex) -> bool {
        at >= self.available_block_index
    }
}

/// An owned kitchen equipment instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitchenEquipmentState {
    pub state_id: StateId,
    pub equipment_id: EquipmentId,
    pub category_id: CategoryId,
    #[serde(default)]
    pub reservation: Option<Reservation>,
}

impl KitchenEquipmentState {
    /// An unreserved instance of `equipment_id`.
    pub fn new(state_id: StateId, equipment_id: EquipmentId, category_id: CategoryId) -> Self {
        Self {
            state_id,
            equipment_id,
            category_id,
            reservation: None,
        }
    }
}

impl Reservable for KitchenEquipmentState {
    fn reservation(&self) -> Option<Reservation> {
        self.reservation
    }

    fn set_reservation(&mut self, reservation: Reservation) {
        self.reservation = Some(reservation);
    }
}

/// A player's owned edibles and equipment.
///
/// Both collections are ordered by `StateId` so that encoding is stable.
/// Mutators consume `self` and return the updated inventory; a failed
/// mutation drops the working value and leaves every other copy untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryState {
    edibles: BTreeMap<StateId, EdibleState>,
    equipment: BTreeMap<StateId, KitchenEquipmentState>,
}

impl InventoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` names any owned instance, edible or equipment.
    pub fn contains_state_id(&self, id: StateId) -> bool {
        self.edibles.contains_key(&id) || self.equipment.contains_key(&id)
    }

    pub fn edible(&self, id: StateId) -> Option<&EdibleState> {
        self.edibles.get(&id)
    }

    pub fn equipment(&self, id: StateId) -> Option<&KitchenEquipmentState> {
        self.equipment.get(&id)
    }

    pub(crate) fn equipment_mut(&mut self, id: StateId) -> Option<&mut KitchenEquipmentState> {
        self.equipment.get_mut(&id)
    }

    /// Owned edibles in ascending id order.
    pub fn edibles(&self) -> impl Iterator<Item = &EdibleState> {
        self.edibles.values()
    }

    pub fn equipment_iter(&self) -> impl Iterator<Item = &KitchenEquipmentState> {
        self.equipment.values()
    }

    pub fn edible_count(&self) -> usize {
        self.edibles.len()
    }

    pub fn equipment_count(&self) -> usize {
        self.equipment.len()
    }

    /// Add an edible. Fails if its id is already used by any owned instance.
    pub fn add_edible(mut self, edible: EdibleState) -> Result<Self, StateError> {
        if self.contains_state_id(edible.state_id) {
            return Err(StateError::DuplicateStateId(edible.state_id));
        }
        self.edibles.insert(edible.state_id, edible);
        Ok(self)
    }

    /// Remove an edible, failing if it is not owned.
    pub fn remove_edible(mut self, id: StateId) -> Result<Self, StateError> {
        self.edibles
            .remove(&id)
            .ok_or(StateError::EdibleNotFound(id))?;
        Ok(self)
    }

    /// Add an equipment instance. Ids are unique across edibles and equipment.
    pub fn add_equipment(mut self, equipment: KitchenEquipmentState) -> Result<Self, StateError> {
        if self.contains_state_id(equipment.state_id) {
            return Err(StateError::DuplicateStateId(equipment.state_id));
        }
        self.equipment.insert(equipment.state_id, equipment);
        Ok(self)
    }

    /// Remove an equipment instance, failing if it is not owned.
    pub fn remove_equipment(mut self, id: StateId) -> Result<Self, StateError> {
        self.equipment
            .remove(&id)
            .ok_or(StateError::EquipmentNotFound(id))?;
        Ok(self)
    }
}

/// Errors from structural state mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("state id {0} already exists")]
    DuplicateStateId(StateId),
    #[error("edible {0} not found")]
    EdibleNotFound(StateId),
    #[error("equipment {0} not found")]
    EquipmentNotFound(StateId),
    #[error("equipment {0} is already installed in space {1}")]
    AlreadyInstalled(StateId, SpaceNumber),
    #[error("no kitchen in this state")]
    NoKitchen,
}
