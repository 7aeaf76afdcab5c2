//! Preset definitions module.
//!
//! Each framework layout lives in its own file as a static table of
//! `name => path relative to the base directory`.
//!
//! ## Adding a New Preset
//!
//! 1. Create a new file (e.g., `symfony.rs`)
//! 2. Implement the `PresetDefinition` trait
//! 3. Export it here
//! 4. Register it in `PresetCatalog::with_builtin`

mod laravel;
mod mezzio;
mod slim4;

pub use laravel::LaravelPreset;
pub use mezzio::MezzioPreset;
pub use slim4::Slim4Preset;

use std::marker::PhantomData;

use super::{PresetInfo, PresetProvider};
use crate::domains::paths::{PathMap, join_relative, trim_base};

/// Entries every framework layout shares. An empty relative path maps to
/// the base directory itself.
pub const COMMON_PATHS: &[(&str, &str)] = &[
    ("base", ""),
    ("vendor", "vendor"),
    ("public", "public"),
    ("tests", "tests"),
    ("docs", "docs"),
];

/// Trait for static preset definitions.
pub trait PresetDefinition {
    /// Lookup key, lowercase.
    const KEY: &'static str;

    /// Human-readable framework name.
    const NAME: &'static str;

    const DESCRIPTION: &'static str;

    /// Framework-specific entries, applied over [`COMMON_PATHS`].
    const PATHS: &'static [(&'static str, &'static str)];

    fn info() -> PresetInfo {
        PresetInfo {
            key: Self::KEY.to_string(),
            name: Self::NAME.to_string(),
            description: Self::DESCRIPTION.to_string(),
        }
    }
}

/// Adapts a [`PresetDefinition`] to the object-safe [`PresetProvider`].
pub struct Builtin<D>(PhantomData<fn() -> D>);

impl<D> Builtin<D> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<D> Default for Builtin<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: PresetDefinition> PresetProvider for Builtin<D> {
    fn info(&self) -> PresetInfo {
        D::info()
    }

    fn paths(&self, base: &str) -> PathMap {
        let base = trim_base(base);
        COMMON_PATHS
            .iter()
            .chain(D::PATHS)
            .map(|(name, relative)| (name.to_string(), join_relative(&base, relative)))
            .collect()
    }
}
