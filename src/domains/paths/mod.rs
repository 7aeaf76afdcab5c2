//! Paths domain.
//!
//! Owns the mapping from symbolic names (`config`, `logs`, `uploads`, ...)
//! to directories under an application base, and the secure join that
//! appends untrusted fragments to those directories.

pub mod defaults;
pub mod error;
pub mod registry;

pub use error::RegistryError;
pub use registry::{MergeStrategy, PathRegistry, RegistryBuilder};

use std::collections::HashMap;
use std::path::MAIN_SEPARATOR;

/// Symbolic name => resolved path.
pub type PathMap = HashMap<String, String>;

/// Strips every trailing `/` and `\` from a base directory.
pub fn trim_base(base: &str) -> String {
    base.trim_end_matches(['/', '\\']).to_string()
}

/// Appends a trusted relative suffix (written with `/`) to `base` using the
/// platform separator. An empty suffix yields `base` itself.
pub fn join_relative(base: &str, relative: &str) -> String {
    let relative = relative.trim_matches(['/', '\\']);
    if relative.is_empty() {
        return base.to_string();
    }
    let relative = relative.replace(['/', '\\'], &MAIN_SEPARATOR.to_string());
    format!("{base}{MAIN_SEPARATOR}{relative}")
}
