//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks: error handling,
//! configuration, and the security layer that sanitizes untrusted path
//! fragments.

pub mod config;
pub mod error;
pub mod security;

pub use config::{BASE_PATH_ENV, Config, base_path_from_env};
pub use error::{Error, Result};
pub use security::{PathSanitizer, SanitizationPolicy, SanitizeError};
