//! The per-player aggregate stored in the ledger.
//!
//! [`RootState`] bundles the inventory with the village/house hierarchy that
//! owns the kitchen. It is decoded fresh at the start of every transition,
//! updated as a working value, and encoded back only when the transition
//! succeeds (see [`crate::serialize`]).

use crate::inventory::{EdibleState, InventoryState, KitchenEquipmentState, StateError};
use crate::kitchen::KitchenState;
use crate::reservation::Reservation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseState {
    pub village_id: u32,
    pub x: i32,
    pub y: i32,
    pub kitchen: KitchenState,
}

impl HouseState {
    pub fn new(village_id: u32, x: i32, y: i32, kitchen: KitchenState) -> Self {
        Self {
            village_id,
            x,
            y,
            kitchen,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VillageState {
    pub house: HouseState,
}

impl VillageState {
    pub fn new(house: HouseState) -> Self {
        Self { house }
    }
}

/// Everything a player owns. One value per signer in the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootState {
    pub inventory: InventoryState,
    pub village: Option<VillageState>,
}

impl RootState {
    pub fn new(inventory: InventoryState, village: Option<VillageState>) -> Self {
        Self { inventory, village }
    }

    pub fn kitchen(&self) -> Option<&KitchenState> {
        self.village.as_ref().map(|v| &v.house.kitchen)
    }

    pub fn with_inventory(mut self, inventory: InventoryState) -> Self {
        self.inventory = inventory;
        self
    }

    /// Replace the kitchen. Fails when the player has no house yet.
    pub fn with_kitchen(mut self, kitchen: KitchenState) -> Result<Self, StateError> {
        let village = self.village.as_mut().ok_or(StateError::NoKitchen)?;
        village.house.kitchen = kitchen;
        Ok(self)
    }

    /// Deterministic FNV-1a digest of the whole aggregate, for desync checks.
    pub fn state_hash(&self) -> StateHash {
        let mut h = StateHash::new();
        h.write_u64(self.inventory.edible_count() as u64);
        for edible in self.inventory.edibles() {
            hash_edible(&mut h, edible);
        }
        h.write_u64(self.inventory.equipment_count() as u64);
        for equipment in self.inventory.equipment_iter() {
            hash_equipment(&mut h, equipment);
        }
        match self.village.as_ref() {
            None => h.write_u32(0),
            Some(village) => {
                h.write_u32(1);
                let house = &village.house;
                h.write_u32(house.village_id);
                h.write_u32(house.x as u32);
                h.write_u32(house.y as u32);
                for space in house.kitchen.spaces() {
                    h.write(&[space.number.get()]);
                    match space.installed {
                        Some(id) => {
                            h.write_u32(1);
                            h.write(&id.0);
                        }
                        None => h.write_u32(0),
                    }
                    hash_reservation(&mut h, space.reservation);
                }
            }
        }
        h
    }
}

fn hash_edible(h: &mut StateHash, edible: &EdibleState) {
    h.write(&edible.state_id.0);
    match edible.edible_type {
        crate::id::EdibleType::Ingredient(id) => {
            h.write_u32(0);
            h.write_u32(id.0);
        }
        crate::id::EdibleType::Food(id) => {
            h.write_u32(1);
            h.write_u32(id.0);
        }
    }
    h.write(&[edible.stats.grade as u8]);
    h.write_u32(edible.stats.hp);
    h.write_u32(edible.stats.attack);
    h.write_u32(edible.stats.defense);
    h.write_u32(edible.stats.speed);
    h.write_u32(edible.level.map_or(0, |l| l.wrapping_add(1)));
    h.write_u64(edible.available_block_index);
}

fn hash_equipment(h: &mut StateHash, equipment: &KitchenEquipmentState) {
    h.write(&equipment.state_id.0);
    h.write_u32(equipment.equipment_id.0);
    h.write_u32(equipment.category_id.0);
    hash_reservation(h, equipment.reservation);
}

fn hash_reservation(h: &mut StateHash, reservation: Option<Reservation>) {
    match reservation {
        Some(r) => {
            h.write_u32(1);
            h.write_u64(r.from);
            h.write_u64(r.until);
        }
        None => h.write_u32(0),
    }
}

/// A simple deterministic hash of player state for desync detection.
///
/// Uses FNV-1a (64-bit). Not cryptographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHash(pub u64);

impl StateHash {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self(Self::FNV_OFFSET)
    }

    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(Self::FNV_PRIME);
        }
    }

    pub fn write_u64(&mut self, v: u64) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.write(&v.to_le_bytes());
    }

    pub fn finish(self) -> u64 {
        self.0
    }
}

impl Default for StateHash {
    fn default() -> Self {
        Self::new()
    }
}
