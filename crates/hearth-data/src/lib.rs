//! Catalog loading from RON, TOML, or JSON data files.

pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, load_catalog};
