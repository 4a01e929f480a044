//! Appliance spaces: the three fixed installation slots of a kitchen.

use crate::id::{SpaceNumber, StateId};
use crate::inventory::StateError;
use crate::reservation::{Reservable, Reservation};
use serde::{Deserialize, Serialize};

/// One installation slot. Holds at most one `main` equipment instance, by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplianceSpaceState {
    pub number: SpaceNumber,
    pub installed: Option<StateId>,
    #[serde(default)]
    pub reservation: Option<Reservation>,
}

impl ApplianceSpaceState {
    pub fn new(number: SpaceNumber) -> Self {
        Self {
            number,
            installed: None,
            reservation: None,
        }
    }

    pub fn install(&mut self, equipment: StateId) {
        self.installed = Some(equipment);
    }

    /// Empty the slot. Returns the id that was installed, if any.
    pub fn uninstall(&mut self) -> Option<StateId> {
        self.installed.take()
    }
}

impl Reservable for ApplianceSpaceState {
    fn reservation(&self) -> Option<Reservation> {
        self.reservation
    }

    fn set_reservation(&mut self, reservation: Reservation) {
        self.reservation = Some(reservation);
    }
}

/// The three spaces of a house, indexed by their number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawKitchen")]
pub struct KitchenState {
    spaces: [ApplianceSpaceState; 3],
}

#[derive(Deserialize)]
struct RawKitchen {
    spaces: [ApplianceSpaceState; 3],
}

impl TryFrom<RawKitchen> for KitchenState {
    type Error = String;

    fn try_from(raw: RawKitchen) -> Result<Self, Self::Error> {
        for (index, space) in raw.spaces.iter().enumerate() {
            if space.number.index() != index {
                return Err(format!(
                    "space at position {} is numbered {}",
                    index + 1,
                    space.number.get()
                ));
            }
        }
        Ok(Self { spaces: raw.spaces })
    }
}

impl Default for KitchenState {
    fn default() -> Self {
        Self::new()
    }
}

impl KitchenState {
    pub fn new() -> Self {
        Self {
            spaces: SpaceNumber::ALL.map(ApplianceSpaceState::new),
        }
    }

    pub fn space(&self, number: SpaceNumber) -> &ApplianceSpaceState {
        &self.spaces[number.index()]
    }

    pub(crate) fn space_mut(&mut self, number: SpaceNumber) -> &mut ApplianceSpaceState {
        &mut self.spaces[number.index()]
    }

    pub fn spaces(&self) -> impl Iterator<Item = &ApplianceSpaceState> {
        self.spaces.iter()
    }

    /// The space currently holding `equipment`, if any.
    pub fn space_of(&self, equipment: StateId) -> Option<SpaceNumber> {
        self.spaces
            .iter()
            .find(|s| s.installed == Some(equipment))
            .map(|s| s.number)
    }

    /// Install `equipment` into `number`, replacing whatever was there.
    /// Fails if the equipment already sits in a different space.
    pub fn install_equipment(
        mut self,
        equipment: StateId,
        number: SpaceNumber,
    ) -> Result<Self, StateError> {
        if let Some(existing) = self.space_of(equipment)
            && existing != number
        {
            return Err(StateError::AlreadyInstalled(equipment, existing));
        }
        self.space_mut(number).install(equipment);
        Ok(self)
    }

    pub fn uninstall_equipment(mut self, number: SpaceNumber) -> Self {
        self.space_mut(number).uninstall();
        self
    }
}
