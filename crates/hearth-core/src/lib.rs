//! Hearth Core -- deterministic kitchen transitions for a ledger-backed game.
//!
//! A player's state ([`state::RootState`]) lives in the ledger as an opaque
//! blob keyed by their address. Each action is a pure function of the
//! previous ledger snapshot, its own parameters, and the execution context:
//! it either returns a new snapshot or fails, leaving the old one untouched.
//!
//! # Cooking
//!
//! [`action::CreateFoodAction`] is the central transition:
//!
//! 1. Decode the signer's `RootState` (absent means empty).
//! 2. Look up the recipe in the [`catalog::Catalog`].
//! 3. Match supplied edibles, equipment, and appliance spaces against the
//!    recipe ([`recipe_match`]).
//! 4. Consume the edibles, reserve the equipment and spaces for the recipe's
//!    duration ([`reservation`]), and store a new food that becomes
//!    available when the reservation ends.
//! 5. Encode the aggregate into a copy of the previous snapshot.
//!
//! ```rust,ignore
//! let mut ctx = ActionContext::new(&catalog, signer, block_index);
//! let action = CreateFoodAction::new(recipe, new_food_id, edibles, equipment, spaces);
//! let next = action.execute(&mut ctx, &previous)?;
//! ```
//!
//! # Key Types
//!
//! - [`catalog::Catalog`] -- Immutable recipe and equipment definitions.
//! - [`inventory::InventoryState`] -- Owned edibles and equipment.
//! - [`kitchen::KitchenState`] -- Three appliance spaces for `main` equipment.
//! - [`reservation::Reservable`] -- Half-open block reservation windows.
//! - [`ledger::LedgerState`] -- Per-signer encoded state snapshot.
//! - [`validation`] -- State diffs and determinism checks for desyncs.

pub mod action;
pub mod catalog;
pub mod context;
pub mod id;
pub mod inventory;
pub mod kitchen;
pub mod ledger;
pub mod recipe_match;
pub mod reservation;
pub mod rng;
pub mod serialize;
pub mod state;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
