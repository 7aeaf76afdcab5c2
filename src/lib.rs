//! Application Paths Library
//!
//! This crate maps symbolic names (`config`, `logs`, `uploads`, ...) to
//! directories under an application base, and joins untrusted fragments
//! onto those directories only after sanitizing them.
//!
//! # Architecture
//!
//! - **core**: Configuration, error handling and the path sanitizer
//! - **domains**: Registry logic organized by bounded contexts
//!   - **paths**: The name => path registry and its secure join
//!   - **presets**: Framework directory layouts (Laravel, Slim 4, Mezzio)
//!
//! # Example
//!
//! ```rust
//! use app_paths::{PathMap, PathRegistry};
//!
//! let paths = PathRegistry::new("/var/www/app", PathMap::new());
//! let laravel = paths.apply_preset("laravel")?;
//!
//! let avatar = laravel.secure_path(laravel.get("uploads")?, "avatars/42.png")?;
//! assert!(avatar.ends_with("42.png"));
//! assert!(laravel.secure_path(laravel.get("uploads")?, "../../.env").is_err());
//! # Ok::<(), app_paths::RegistryError>(())
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use crate::core::{Config, Error, PathSanitizer, Result, SanitizationPolicy, SanitizeError};
pub use crate::domains::paths::{MergeStrategy, PathMap, PathRegistry, RegistryBuilder, RegistryError};
pub use crate::domains::presets::{
    FnPreset, PresetCatalog, PresetError, PresetInfo, PresetLoader, PresetProvider,
};
