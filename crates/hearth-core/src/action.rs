//! Ledger actions: deterministic transitions of one player's state.
//!
//! Every action decodes the signer's [`RootState`] from the previous ledger
//! snapshot, validates, builds the updated aggregate as a new value, and
//! returns a new snapshot. On any error the previous snapshot is untouched
//! and no new one exists.

use crate::catalog::{CategoryKind, RecipeDef};
use crate::context::ActionContext;
use crate::id::*;
use crate::inventory::{EdibleState, EdibleStats, StateError};
use crate::ledger::LedgerState;
use crate::recipe_match::{Candidates, RecipeMatch, match_recipe};
use crate::reservation::{Reservable, Reservation};
use crate::serialize::{DeserializeError, SerializeError};
use crate::state::RootState;
use std::fmt;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A referenced identifier that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    Recipe(RecipeId),
    Category(CategoryId),
    Edible(StateId),
    Equipment(StateId),
    InstalledEquipment(SpaceNumber),
    Kitchen,
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Missing::Recipe(id) => write!(f, "recipe {}", id.0),
            Missing::Category(id) => write!(f, "equipment category {}", id.0),
            Missing::Edible(id) => write!(f, "edible {id}"),
            Missing::Equipment(id) => write!(f, "kitchen equipment {id}"),
            Missing::InstalledEquipment(n) => write!(f, "equipment installed in space {n}"),
            Missing::Kitchen => write!(f, "kitchen"),
        }
    }
}

/// A requirement no supplied instance satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Edible(EdibleType),
    Category(CategoryId),
    /// Only `main` equipment can be installed into a space.
    Installable(CategoryId),
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Edible(ty) => ty.fmt(f),
            Requirement::Category(id) => write!(f, "equipment of category {}", id.0),
            Requirement::Installable(id) => write!(f, "installable category (got {})", id.0),
        }
    }
}

/// An equipment holder reserved at the requested block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InUse {
    Equipment(StateId),
    Space(SpaceNumber),
}

impl fmt::Display for InUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InUse::Equipment(id) => write!(f, "kitchen equipment {id}"),
            InUse::Space(n) => write!(f, "appliance space {n}"),
        }
    }
}

/// Why an action was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("not found: {0}")]
    NotFoundData(Missing),
    #[error("does not have required {0}")]
    NotHaveRequired(Requirement),
    #[error("already using {0}")]
    AlreadyUsingEquipment(InUse),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    State(#[from] StateError),
    #[error("previous state unreadable: {0}")]
    Decode(#[from] DeserializeError),
    #[error("new state unencodable: {0}")]
    Encode(#[from] SerializeError),
}

/// Coarse classification of [`ActionError`], as presented to players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFoundData,
    NotHaveRequired,
    AlreadyUsingEquipment,
    InvalidArgument,
    Storage,
}

impl ActionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ActionError::NotFoundData(_) => ErrorKind::NotFoundData,
            ActionError::NotHaveRequired(_) => ErrorKind::NotHaveRequired,
            ActionError::AlreadyUsingEquipment(_) => ErrorKind::AlreadyUsingEquipment,
            ActionError::InvalidArgument(_) | ActionError::State(_) => ErrorKind::InvalidArgument,
            ActionError::Decode(_) | ActionError::Encode(_) => ErrorKind::Storage,
        }
    }
}

// ---------------------------------------------------------------------------
// Action trait
// ---------------------------------------------------------------------------

/// A deterministic ledger transition.
pub trait Action {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Apply this action for `ctx.signer` on top of `previous`.
    fn execute(
        &self,
        ctx: &mut ActionContext<'_>,
        previous: &LedgerState,
    ) -> Result<LedgerState, ActionError>;
}

/// Encode `root` and write it under `signer` into a copy of `previous`.
fn commit(
    previous: &LedgerState,
    signer: Address,
    root: &RootState,
) -> Result<LedgerState, ActionError> {
    let bytes = root.serialize()?;
    Ok(previous.clone().with_state(signer, bytes))
}

fn log_outcome<T>(action: &str, ctx: &ActionContext<'_>, result: &Result<T, ActionError>) {
    match result {
        Ok(_) => tracing::debug!(
            action,
            signer = %ctx.signer,
            block = ctx.block_index,
            rehearsal = ctx.rehearsal,
            "action committed"
        ),
        Err(e) => tracing::debug!(
            action,
            signer = %ctx.signer,
            block = ctx.block_index,
            rehearsal = ctx.rehearsal,
            error = %e,
            "action rejected"
        ),
    }
}

// ---------------------------------------------------------------------------
// CreateFoodAction
// ---------------------------------------------------------------------------

/// Cook a recipe: consume edibles, reserve equipment and appliance spaces
/// for the recipe's duration, and store a new food that becomes available
/// once the duration has elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFoodAction {
    pub recipe_id: RecipeId,
    /// Id given to the produced food. Must not name an existing instance.
    pub food_state_id: StateId,
    pub edible_state_ids: Vec<StateId>,
    pub equipment_state_ids: Vec<StateId>,
    pub space_numbers: Vec<SpaceNumber>,
}

impl CreateFoodAction {
    /// Cook `recipe_id` into `food_state_id` from the given candidate lists.
    pub fn new(
        recipe_id: RecipeId,
        food_state_id: StateId,
        edible_state_ids: Vec<StateId>,
        equipment_state_ids: Vec<StateId>,
        space_numbers: Vec<SpaceNumber>,
    ) -> Self {
        Self {
            recipe_id,
            food_state_id,
            edible_state_ids,
            equipment_state_ids,
            space_numbers,
        }
    }

    fn run(
        &self,
        ctx: &ActionContext<'_>,
        previous: &LedgerState,
    ) -> Result<LedgerState, ActionError> {
        let root = previous.root_state(ctx.signer)?;
        let recipe = ctx
            .catalog
            .recipe(self.recipe_id)
            .ok_or(ActionError::NotFoundData(Missing::Recipe(self.recipe_id)))?;

        let selected = match_recipe(
            recipe,
            ctx.catalog,
            &root,
            Candidates {
                edibles: &self.edible_state_ids,
                equipment: &self.equipment_state_ids,
                spaces: &self.space_numbers,
            },
            ctx.block_index,
        )?;

        if root.inventory.contains_state_id(self.food_state_id) {
            return Err(ActionError::InvalidArgument(format!(
                "output id {} already exists",
                self.food_state_id
            )));
        }

        let root = self.cook(root, recipe, &selected, ctx.block_index)?;
        commit(previous, ctx.signer, &root)
    }

    /// Build the post-cooking aggregate from a validated match.
    fn cook(
        &self,
        mut root: RootState,
        recipe: &RecipeDef,
        selected: &RecipeMatch,
        block_index: BlockIndex,
    ) -> Result<RootState, ActionError> {
        let window = Reservation::for_duration(block_index, recipe.required_blocks);

        let mut inventory = std::mem::take(&mut root.inventory);
        for &id in &selected.edibles {
            inventory = inventory.remove_edible(id)?;
        }
        for &id in &selected.equipment {
            inventory
                .equipment_mut(id)
                .ok_or(StateError::EquipmentNotFound(id))?
                .reserve(window.from, window.until);
        }

        if !selected.spaces.is_empty() {
            let kitchen = &mut root
                .village
                .as_mut()
                .ok_or(StateError::NoKitchen)?
                .house
                .kitchen;
            for &number in &selected.spaces {
                let space = kitchen.space_mut(number);
                space.reserve(window.from, window.until);
                if let Some(installed) = space.installed {
                    inventory
                        .equipment_mut(installed)
                        .ok_or(StateError::EquipmentNotFound(installed))?
                        .reserve(window.from, window.until);
                }
            }
        }

        let food = EdibleState::food(
            self.food_state_id,
            recipe.result,
            EdibleStats::default(),
            1,
            window.until,
        );
        inventory = inventory.add_edible(food)?;

        Ok(root.with_inventory(inventory))
    }
}

impl Action for CreateFoodAction {
    fn name(&self) -> &'static str {
        "create_food"
    }

    fn execute(
        &self,
        ctx: &mut ActionContext<'_>,
        previous: &LedgerState,
    ) -> Result<LedgerState, ActionError> {
        let result = self.run(ctx, previous);
        log_outcome(self.name(), ctx, &result);
        result
    }
}

// ---------------------------------------------------------------------------
// Installation
// ---------------------------------------------------------------------------

/// Install an owned `main` equipment into an appliance space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallKitchenEquipmentAction {
    pub equipment_state_id: StateId,
    pub space_number: SpaceNumber,
}

impl InstallKitchenEquipmentAction {
    /// Install the owned `main` equipment `equipment_state_id` into `space_number`.
    pub fn new(equipment_state_id: StateId, space_number: SpaceNumber) -> Self {
        Self {
            equipment_state_id,
            space_number,
        }
    }

    fn run(
        &self,
        ctx: &ActionContext<'_>,
        previous: &LedgerState,
    ) -> Result<LedgerState, ActionError> {
        let root = previous.root_state(ctx.signer)?;
        let id = self.equipment_state_id;

        let equipment = root
            .inventory
            .equipment(id)
            .ok_or(ActionError::NotFoundData(Missing::Equipment(id)))?;
        let category = ctx
            .catalog
            .equipment_category(equipment.category_id)
            .ok_or(ActionError::NotFoundData(Missing::Category(equipment.category_id)))?;
        if category.kind != CategoryKind::Main {
            return Err(ActionError::NotHaveRequired(Requirement::Installable(category.id)));
        }
        if equipment.is_in_use(ctx.block_index) {
            return Err(ActionError::AlreadyUsingEquipment(InUse::Equipment(id)));
        }

        let kitchen = root
            .kitchen()
            .ok_or(ActionError::NotFoundData(Missing::Kitchen))?;
        if kitchen.space(self.space_number).is_in_use(ctx.block_index) {
            return Err(ActionError::AlreadyUsingEquipment(InUse::Space(self.space_number)));
        }

        let kitchen = kitchen.clone().install_equipment(id, self.space_number)?;
        let root = root.with_kitchen(kitchen)?;
        commit(previous, ctx.signer, &root)
    }
}

impl Action for InstallKitchenEquipmentAction {
    fn name(&self) -> &'static str {
        "install_kitchen_equipment"
    }

    fn execute(
        &self,
        ctx: &mut ActionContext<'_>,
        previous: &LedgerState,
    ) -> Result<LedgerState, ActionError> {
        let result = self.run(ctx, previous);
        log_outcome(self.name(), ctx, &result);
        result
    }
}

/// Empty an appliance space. The equipment stays in the inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallKitchenEquipmentAction {
    pub space_number: SpaceNumber,
}

impl UninstallKitchenEquipmentAction {
    /// Empty `space_number`, returning its equipment to free use.
    pub fn new(space_number: SpaceNumber) -> Self {
        Self { space_number }
    }

    fn run(
        &self,
        ctx: &ActionContext<'_>,
        previous: &LedgerState,
    ) -> Result<LedgerState, ActionError> {
        let root = previous.root_state(ctx.signer)?;
        let kitchen = root
            .kitchen()
            .ok_or(ActionError::NotFoundData(Missing::Kitchen))?;
        let space = kitchen.space(self.space_number);
        if space.installed.is_none() {
            return Err(ActionError::NotFoundData(Missing::InstalledEquipment(self.space_number)));
        }
        if space.is_in_use(ctx.block_index) {
            return Err(ActionError::AlreadyUsingEquipment(InUse::Space(self.space_number)));
        }

        let kitchen = kitchen.clone().uninstall_equipment(self.space_number);
        let root = root.with_kitchen(kitchen)?;
        commit(previous, ctx.signer, &root)
    }
}

impl Action for UninstallKitchenEquipmentAction {
    fn name(&self) -> &'static str {
        "uninstall_kitchen_equipment"
    }

    fn execute(
        &self,
        ctx: &mut ActionContext<'_>,
        previous: &LedgerState,
    ) -> Result<LedgerState, ActionError> {
        let result = self.run(ctx, previous);
        log_outcome(self.name(), ctx, &result);
        result
    }
}
