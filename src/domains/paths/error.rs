//! Registry-specific error types.

use thiserror::Error;

use crate::core::security::SanitizeError;
use crate::domains::presets::PresetError;

/// Errors that can occur during registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No path is registered under the requested name.
    #[error("Path '{name}' not found")]
    UnknownPathName { name: String },

    /// A caller-supplied fragment or path was rejected.
    #[error(transparent)]
    Sanitize(#[from] SanitizeError),

    /// A preset could not be loaded.
    #[error(transparent)]
    Preset(#[from] PresetError),
}

impl RegistryError {
    /// Create a new "unknown path name" error.
    pub fn unknown_path(name: impl Into<String>) -> Self {
        Self::UnknownPathName { name: name.into() }
    }

    /// Whether this is a traversal-class rejection.
    pub fn is_traversal(&self) -> bool {
        matches!(self, Self::Sanitize(e) if e.is_traversal())
    }
}
