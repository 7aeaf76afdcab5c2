//! Built-in path layout applied to every new registry.

use super::{PathMap, join_relative};

/// Default `name => relative suffix` table. `base` maps to the base
/// directory itself.
pub const DEFAULT_PATHS: &[(&str, &str)] = &[
    ("base", ""),
    ("config", "config"),
    ("src", "src"),
    ("public", "public"),
    ("templates", "templates"),
    ("var", "var"),
    ("cache", "var/cache"),
    ("logs", "var/logs"),
    ("storage", "var/storage"),
    ("tests", "tests"),
    ("vendor", "vendor"),
    ("assets", "public/assets"),
    ("uploads", "public/uploads"),
];

/// Resolves [`DEFAULT_PATHS`] against an already-trimmed base.
pub fn default_paths(base: &str) -> PathMap {
    DEFAULT_PATHS
        .iter()
        .map(|(name, relative)| (name.to_string(), join_relative(base, relative)))
        .collect()
}
