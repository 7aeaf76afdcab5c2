//! Presets domain.
//!
//! A preset is a named, pure provider of `name => path` entries for a base
//! directory, typically one framework's directory layout. Presets are
//! served by a [`PresetLoader`]; the default [`PresetCatalog`] ships the
//! built-in layouts and caches what it computes.

pub mod definitions;
pub mod error;
pub mod loader;

pub use error::PresetError;
pub use loader::{FnPreset, PresetCatalog, PresetLoader};

use serde::{Deserialize, Serialize};

use crate::domains::paths::PathMap;

/// Descriptive metadata for a registered preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetInfo {
    pub key: String,
    pub name: String,
    pub description: String,
}

/// A source of path entries. Implementations must be pure functions of the
/// base directory: loaders cache their output per `(name, base)`.
pub trait PresetProvider: Send + Sync {
    fn info(&self) -> PresetInfo;

    fn paths(&self, base: &str) -> PathMap;
}
