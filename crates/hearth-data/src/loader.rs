//! Reads the three catalog files, resolves category names, and builds the
//! catalog. Each file may be RON, TOML, or JSON.

use crate::schema::{CategoryData, EquipmentData, RecipeData};
use hearth_core::catalog::{Catalog, CatalogBuilder, CatalogError, RecipeDef};
use hearth_core::id::*;
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Base name of the equipment category file.
pub const CATEGORIES_FILE: &str = "equipment_categories";
/// Base name of the equipment file.
pub const EQUIPMENT_FILE: &str = "equipment";
/// Base name of the recipe file.
pub const RECIPES_FILE: &str = "recipes";

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A name reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    /// A duplicate name was found.
    #[error("duplicate name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// The resolved definitions do not form a valid catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Ron,
    Toml,
    Json,
}

fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for `{base_name}.ron`, `.toml`, or `.json`.
///
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// more than one format exists for the same base name.
fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing,
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

fn parse_error(path: &Path, e: impl std::fmt::Display) -> DataLoadError {
    DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: e.to_string(),
    }
}

/// Read a list of definitions. TOML has no top-level arrays, so a TOML file
/// keeps its list under `toml_key`.
fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => {
            let mut table: toml::Table =
                toml::from_str(&content).map_err(|e| parse_error(path, e))?;
            let array = table.remove(toml_key).ok_or_else(|| {
                parse_error(path, format!("missing key '{toml_key}' in TOML file"))
            })?;
            array.try_into().map_err(|e: toml::de::Error| parse_error(path, e))
        }
    }
}

// ===========================================================================
// Name resolution helpers
// ===========================================================================

fn resolve_category(
    names: &HashMap<String, CategoryId>,
    name: &str,
    file: &Path,
) -> Result<CategoryId, DataLoadError> {
    names.get(name).copied().ok_or_else(|| DataLoadError::UnresolvedRef {
        file: file.to_path_buf(),
        name: name.to_string(),
        expected_kind: "category",
    })
}

/// Record `name` as seen, failing if an earlier entry in `file` used it.
fn claim_name(seen: &mut HashSet<String>, name: &str, file: &Path) -> Result<(), DataLoadError> {
    if seen.insert(name.to_string()) {
        Ok(())
    } else {
        Err(DataLoadError::DuplicateName {
            file: file.to_path_buf(),
            name: name.to_string(),
        })
    }
}

// ===========================================================================
// Catalog loading
// ===========================================================================

/// Load `equipment_categories`, `equipment`, and `recipes` from `dir` and
/// build a frozen [`Catalog`].
///
/// Each file may be RON, TOML, or JSON. In TOML files the lists live under
/// the `categories`, `equipment`, and `recipes` keys respectively.
pub fn load_catalog(dir: &Path) -> Result<Catalog, DataLoadError> {
    let categories_path = require_data_file(dir, CATEGORIES_FILE)?;
    let equipment_path = require_data_file(dir, EQUIPMENT_FILE)?;
    let recipes_path = require_data_file(dir, RECIPES_FILE)?;

    let categories: Vec<CategoryData> = deserialize_list(&categories_path, "categories")?;
    let equipment: Vec<EquipmentData> = deserialize_list(&equipment_path, "equipment")?;
    let recipes: Vec<RecipeData> = deserialize_list(&recipes_path, "recipes")?;

    let mut builder = CatalogBuilder::new();

    let mut category_names: HashMap<String, CategoryId> = HashMap::new();
    for data in &categories {
        if category_names.contains_key(&data.name) {
            return Err(DataLoadError::DuplicateName {
                file: categories_path,
                name: data.name.clone(),
            });
        }
        let id = builder.register_category(CategoryId(data.id), &data.name, data.kind);
        category_names.insert(data.name.clone(), id);
    }

    let mut equipment_names = HashSet::new();
    for data in &equipment {
        claim_name(&mut equipment_names, &data.name, &equipment_path)?;
        let category = resolve_category(&category_names, &data.category, &equipment_path)?;
        builder.register_equipment(EquipmentId(data.id), &data.name, category);
    }

    let mut recipe_names = HashSet::new();
    for data in recipes {
        claim_name(&mut recipe_names, &data.name, &recipes_path)?;
        let equipment_categories = data
            .equipment
            .iter()
            .map(|name| resolve_category(&category_names, name, &recipes_path))
            .collect::<Result<Vec<_>, _>>()?;
        builder.register_recipe(RecipeDef {
            id: RecipeId(data.id),
            name: data.name.clone(),
            ingredients: data.ingredients.into_iter().map(IngredientId).collect(),
            foods: data.foods.into_iter().map(FoodId).collect(),
            equipment_categories,
            result: FoodId(data.result),
            required_blocks: data.required_blocks,
        });
    }

    let catalog = builder.build()?;
    tracing::debug!(
        dir = %dir.display(),
        recipes = catalog.recipe_count(),
        categories = catalog.category_count(),
        equipment = catalog.equipment_count(),
        "catalog loaded"
    );
    Ok(catalog)
}

// ===========================================================================
// Tests
// ===========================================================================
