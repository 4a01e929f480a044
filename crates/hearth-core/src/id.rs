use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Logical clock supplied by the ledger. Monotonically increasing.
pub type BlockIndex = u64;

/// Identifies a recipe in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecipeId(pub u32);

/// Identifies a raw ingredient item type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IngredientId(pub u32);

/// Identifies a crafted food item type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FoodId(pub u32);

/// Identifies a kitchen equipment item type (not an owned instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EquipmentId(pub u32);

/// Identifies an equipment category in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub u32);

/// The item type of an edible instance.
///
/// Ingredients and foods live in separate ID spaces; a recipe's ingredient
/// and food lists are matched as one combined list of `EdibleType`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EdibleType {
    Ingredient(IngredientId),
    Food(FoodId),
}

impl fmt::Display for EdibleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdibleType::Ingredient(id) => write!(f, "ingredient {}", id.0),
            EdibleType::Food(id) => write!(f, "food {}", id.0),
        }
    }
}

/// Unique identifier of an owned instance (edible or equipment).
///
/// Generated by the caller, never by a transition, so that replaying a
/// transition yields the same ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateId(pub [u8; 16]);

impl StateId {
    /// A fresh random id. For callers building actions, not for transitions.
    pub fn new_v4() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(*uuid.as_bytes())
    }

    pub fn as_uuid(&self) -> Uuid {
        Uuid::from_bytes(self.0)
    }
}

impl From<Uuid> for StateId {
    fn from(uuid: Uuid) -> Self {
        Self::from_uuid(uuid)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_uuid().fmt(f)
    }
}

/// Signer identity. Keys the per-player state in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// Number of an appliance space in a kitchen. Always in `1..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SpaceNumber(u8);

impl TryFrom<u8> for SpaceNumber {
    type Error = String;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        SpaceNumber::new(number).ok_or_else(|| format!("space number {number} out of range 1..=3"))
    }
}

impl From<SpaceNumber> for u8 {
    fn from(number: SpaceNumber) -> Self {
        number.0
    }
}

impl SpaceNumber {
    pub const FIRST: SpaceNumber = SpaceNumber(1);
    pub const SECOND: SpaceNumber = SpaceNumber(2);
    pub const THIRD: SpaceNumber = SpaceNumber(3);

    /// Every space number, in slot order.
    pub const ALL: [SpaceNumber; 3] = [Self::FIRST, Self::SECOND, Self::THIRD];

    /// Returns `None` for numbers outside `1..=3`.
    pub fn new(number: u8) -> Option<Self> {
        (1..=3).contains(&number).then_some(Self(number))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based slot index.
    pub(crate) fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl fmt::Display for SpaceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
