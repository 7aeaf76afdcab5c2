//! Error types and handling for the crate.
//!
//! This module defines a unified error type that can represent errors from
//! all domains and from configuration, providing consistent error handling
//! for applications embedding the registry.

use thiserror::Error;

/// A specialized Result type for crate-level operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type.
///
/// Domain operations return their own error types; this enum covers
/// building a registry from configuration, where a registry error (carrying
/// any preset or sanitizer failure), a bad setting or an unreadable working
/// directory can occur.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the paths domain.
    #[error("Registry error: {0}")]
    Registry(#[from] crate::domains::paths::RegistryError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors from resolving configured directories.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
