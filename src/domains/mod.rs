//! Domains module containing the registry logic organized by bounded
//! contexts.
//!
//! - **paths**: the name => path registry and secure joining
//! - **presets**: pluggable framework layouts merged into a registry

pub mod paths;
pub mod presets;
