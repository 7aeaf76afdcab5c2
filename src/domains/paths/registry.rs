//! Path Registry - named application directories and secure joining.
//!
//! This module provides:
//! - The name => path map built from defaults, overrides and presets
//! - Lookup of trusted, registry-resolved directories
//! - `secure_path`, the only sanctioned way to append untrusted input to
//!   one of those directories

use std::fmt;
use std::path::MAIN_SEPARATOR;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::defaults::default_paths;
use super::error::RegistryError;
use super::{PathMap, trim_base};
use crate::core::security::{PathSanitizer, SanitizationPolicy};
use crate::domains::presets::{PresetCatalog, PresetLoader};

/// How preset entries combine with a registry's current map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Preset entries replace same-named entries; others are kept.
    #[default]
    PresetWins,
    /// Existing entries are kept; the preset only fills in missing names.
    ExistingWins,
}

impl MergeStrategy {
    fn merge(self, current: &mut PathMap, preset: &PathMap) {
        match self {
            Self::PresetWins => {
                current.extend(preset.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
            Self::ExistingWins => {
                for (name, path) in preset {
                    current
                        .entry(name.clone())
                        .or_insert_with(|| path.clone());
                }
            }
        }
    }
}

/// A preset whose resolution is deferred until the map is first read.
#[derive(Debug, Clone)]
struct PendingPreset {
    name: String,
    seed: PathMap,
}

/// Registry of named application paths.
///
/// Map values are trusted and returned verbatim. Anything derived from
/// outside input must be appended with [`secure_path`](Self::secure_path).
///
/// ```
/// use app_paths::PathRegistry;
///
/// let paths = PathRegistry::new("/var/www/app", Default::default());
/// let upload = paths.secure_path(paths.get("uploads")?, "avatars/me.png")?;
/// assert!(upload.ends_with("me.png"));
/// assert!(paths.secure_path(paths.get("uploads")?, "../../etc/passwd").is_err());
/// # Ok::<(), app_paths::RegistryError>(())
/// ```
#[derive(Clone)]
pub struct PathRegistry {
    base: String,
    paths: OnceLock<PathMap>,
    pending: Option<PendingPreset>,
    sanitizer: PathSanitizer,
    loader: Arc<dyn PresetLoader>,
    merge: MergeStrategy,
}

impl PathRegistry {
    /// Create a registry from the default layout with `overrides` merged on
    /// top. Overrides replace defaults unconditionally and are stored as
    /// given.
    pub fn new(base: impl AsRef<str>, overrides: PathMap) -> Self {
        let base = trim_base(base.as_ref());
        let mut paths = default_paths(&base);
        paths.extend(overrides);

        Self {
            base,
            paths: OnceLock::from(paths),
            pending: None,
            sanitizer: PathSanitizer::default(),
            loader: Arc::new(PresetCatalog::with_builtin()),
            merge: MergeStrategy::default(),
        }
    }

    pub fn builder(base: impl AsRef<str>) -> RegistryBuilder {
        RegistryBuilder::new(base)
    }

    /// Create a registry whose overrides are the built-in preset `name`.
    pub fn with_preset(name: &str, base: impl AsRef<str>) -> Result<Self, RegistryError> {
        Self::builder(base).preset(name).build()
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Look up a named path.
    pub fn get(&self, name: &str) -> Result<&str, RegistryError> {
        self.paths()
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| RegistryError::unknown_path(name))
    }

    /// Look up a named path, falling back to `fallback` when it is absent.
    pub fn get_or<'a>(&'a self, name: &str, fallback: &'a str) -> &'a str {
        self.paths()
            .get(name)
            .map(String::as_str)
            .unwrap_or(fallback)
    }

    pub fn has(&self, name: &str) -> bool {
        self.paths().contains_key(name)
    }

    /// Snapshot of the whole map.
    pub fn all(&self) -> PathMap {
        self.paths().clone()
    }

    /// Register `raw_path` under `name`.
    ///
    /// The path is stored verbatim after a reduced screening for null
    /// bytes, dangerous patterns and `..`.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        raw_path: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        let raw_path = raw_path.into();
        self.sanitizer.screen(&raw_path)?;

        debug!(name = %name, path = %raw_path, "Registering path");
        self.update(|paths| {
            paths.insert(name, raw_path);
        });
        Ok(())
    }

    /// Append an untrusted `fragment` to the trusted `base_path`.
    ///
    /// The fragment is sanitized under the registry's policy; the result is
    /// `base_path + separator + sanitized fragment`.
    pub fn secure_path(&self, base_path: &str, fragment: &str) -> Result<String, RegistryError> {
        let sanitized = self.sanitizer.sanitize(fragment)?;
        Ok(format!("{}{MAIN_SEPARATOR}{sanitized}", trim_base(base_path)))
    }

    /// Alias of [`secure_path`](Self::secure_path).
    pub fn get_path(&self, base_path: &str, fragment: &str) -> Result<String, RegistryError> {
        self.secure_path(base_path, fragment)
    }

    /// Securely join `relative` onto the base directory.
    pub fn path(&self, relative: &str) -> Result<String, RegistryError> {
        self.secure_path(&self.base, relative)
    }

    /// Named directory, or `file` securely joined onto it when non-empty.
    pub fn resolve(&self, name: &str, file: &str) -> Result<String, RegistryError> {
        let dir = self.get(name)?;
        if file.is_empty() {
            Ok(dir.to_string())
        } else {
            self.secure_path(dir, file)
        }
    }

    pub fn config(&self, file: &str) -> Result<String, RegistryError> {
        self.resolve("config", file)
    }

    pub fn templates(&self, file: &str) -> Result<String, RegistryError> {
        self.resolve("templates", file)
    }

    pub fn public(&self, file: &str) -> Result<String, RegistryError> {
        self.resolve("public", file)
    }

    pub fn logs(&self, file: &str) -> Result<String, RegistryError> {
        self.resolve("logs", file)
    }

    pub fn storage(&self, file: &str) -> Result<String, RegistryError> {
        self.resolve("storage", file)
    }

    pub fn cache(&self, file: &str) -> Result<String, RegistryError> {
        self.resolve("cache", file)
    }

    pub fn assets(&self, file: &str) -> Result<String, RegistryError> {
        self.resolve("assets", file)
    }

    pub fn uploads(&self, file: &str) -> Result<String, RegistryError> {
        self.resolve("uploads", file)
    }

    /// Whether `fragment` would be accepted by [`secure_path`](Self::secure_path).
    pub fn validate_path(&self, fragment: &str) -> bool {
        self.sanitizer.is_safe(fragment)
    }

    /// Return a new registry with preset `name` merged over the current map
    /// using this registry's [`MergeStrategy`]. `self` is left untouched.
    pub fn apply_preset(&self, name: &str) -> Result<Self, RegistryError> {
        self.apply_preset_with(name, self.merge)
    }

    pub fn apply_preset_with(
        &self,
        name: &str,
        strategy: MergeStrategy,
    ) -> Result<Self, RegistryError> {
        let preset = self.loader.load_preset(name, &self.base)?;
        let mut paths = self.all();
        strategy.merge(&mut paths, &preset);
        info!(preset = %name, base = %self.base, entries = preset.len(), "Applied preset");

        Ok(Self {
            base: self.base.clone(),
            paths: OnceLock::from(paths),
            pending: None,
            sanitizer: self.sanitizer.clone(),
            loader: self.loader.clone(),
            merge: self.merge,
        })
    }

    pub fn sanitizer(&self) -> &PathSanitizer {
        &self.sanitizer
    }

    pub fn policy(&self) -> &SanitizationPolicy {
        self.sanitizer.policy()
    }

    /// Replace the sanitization policy wholesale.
    pub fn set_policy(&mut self, policy: SanitizationPolicy) {
        self.sanitizer = PathSanitizer::new(policy);
    }

    pub fn with_policy(mut self, policy: SanitizationPolicy) -> Self {
        self.set_policy(policy);
        self
    }

    pub fn merge_strategy(&self) -> MergeStrategy {
        self.merge
    }

    pub fn loader(&self) -> &Arc<dyn PresetLoader> {
        &self.loader
    }

    fn paths(&self) -> &PathMap {
        self.paths.get_or_init(|| self.resolve_pending())
    }

    fn update(&mut self, f: impl FnOnce(&mut PathMap)) {
        let mut paths = match self.paths.take() {
            Some(paths) => paths,
            None => self.resolve_pending(),
        };
        self.pending = None;
        f(&mut paths);
        self.paths = OnceLock::from(paths);
    }

    /// A failing lazy preset is logged and skipped; the registry keeps the
    /// entries resolved without it.
    fn resolve_pending(&self) -> PathMap {
        let Some(pending) = &self.pending else {
            return default_paths(&self.base);
        };

        let mut paths = pending.seed.clone();
        match self.loader.load_preset(&pending.name, &self.base) {
            Ok(preset) => {
                self.merge.merge(&mut paths, &preset);
                info!(preset = %pending.name, base = %self.base, "Lazily applied preset");
            }
            Err(e) => {
                warn!(preset = %pending.name, error = %e, "Preset unavailable, continuing without it");
            }
        }
        paths
    }
}

impl fmt::Debug for PathRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathRegistry")
            .field("base", &self.base)
            .field("paths", &self.paths.get())
            .field("pending", &self.pending.as_ref().map(|p| &p.name))
            .field("policy", self.sanitizer.policy())
            .field("merge", &self.merge)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
enum PresetMode {
    Eager(String),
    Lazy(String),
}

/// Builder for [`PathRegistry`].
///
/// An eager [`preset`](Self::preset) is loaded by [`build`](Self::build) and
/// fails fast on an unknown name. A [`lazy_preset`](Self::lazy_preset) is
/// loaded on first access and is skipped if it cannot be loaded.
pub struct RegistryBuilder {
    base: String,
    overrides: PathMap,
    policy: SanitizationPolicy,
    loader: Option<Arc<dyn PresetLoader>>,
    preset: Option<PresetMode>,
    merge: MergeStrategy,
}

impl RegistryBuilder {
    pub fn new(base: impl AsRef<str>) -> Self {
        Self {
            base: trim_base(base.as_ref()),
            overrides: PathMap::new(),
            policy: SanitizationPolicy::default(),
            loader: None,
            preset: None,
            merge: MergeStrategy::default(),
        }
    }

    pub fn overrides(mut self, overrides: PathMap) -> Self {
        self.overrides.extend(overrides);
        self
    }

    pub fn path(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.overrides.insert(name.into(), path.into());
        self
    }

    pub fn policy(mut self, policy: SanitizationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn loader(mut self, loader: Arc<dyn PresetLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn merge_strategy(mut self, merge: MergeStrategy) -> Self {
        self.merge = merge;
        self
    }

    pub fn preset(mut self, name: impl Into<String>) -> Self {
        self.preset = Some(PresetMode::Eager(name.into()));
        self
    }

    pub fn lazy_preset(mut self, name: impl Into<String>) -> Self {
        self.preset = Some(PresetMode::Lazy(name.into()));
        self
    }

    pub fn build(self) -> Result<PathRegistry, RegistryError> {
        let loader = self
            .loader
            .unwrap_or_else(|| Arc::new(PresetCatalog::with_builtin()));

        let mut paths = default_paths(&self.base);
        paths.extend(self.overrides);

        let mut registry = PathRegistry {
            base: self.base,
            paths: OnceLock::new(),
            pending: None,
            sanitizer: PathSanitizer::new(self.policy),
            loader,
            merge: self.merge,
        };

        match self.preset {
            Some(PresetMode::Eager(name)) => {
                let preset = registry.loader.load_preset(&name, &registry.base)?;
                registry.merge.merge(&mut paths, &preset);
                info!(preset = %name, base = %registry.base, "Applied preset");
                registry.paths = OnceLock::from(paths);
            }
            Some(PresetMode::Lazy(name)) => {
                debug!(preset = %name, "Deferring preset until first lookup");
                registry.pending = Some(PendingPreset { name, seed: paths });
            }
            None => registry.paths = OnceLock::from(paths),
        }

        Ok(registry)
    }
}
