//! Serde data file structs for kitchen catalog definitions.
//!
//! Equipment and recipes refer to categories by name; the loader resolves
//! those names into [`CategoryId`](hearth_core::id::CategoryId)s.

use hearth_core::catalog::CategoryKind;
use serde::Deserialize;

// ===========================================================================
// Equipment
// ===========================================================================

/// An equipment category definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryData {
    pub id: u32,
    pub name: String,
    pub kind: CategoryKind,
}

/// A kitchen equipment item type in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct EquipmentData {
    pub id: u32,
    pub name: String,
    /// Category name.
    pub category: String,
}

// ===========================================================================
// Recipes
// ===========================================================================

/// A recipe definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeData {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<u32>,
    #[serde(default)]
    pub foods: Vec<u32>,
    /// Required category names, one entry per required instance.
    #[serde(default)]
    pub equipment: Vec<String>,
    pub result: u32,
    #[serde(default)]
    pub required_blocks: u64,
}

// ===========================================================================
// Tests
// ===========================================================================
