//! Preset loading and caching.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use super::definitions::{Builtin, LaravelPreset, MezzioPreset, PresetDefinition, Slim4Preset};
use super::error::PresetError;
use super::{PresetInfo, PresetProvider};
use crate::domains::paths::{PathMap, trim_base};

/// Source of named presets consumed by the path registry.
pub trait PresetLoader: Send + Sync {
    /// Resolve the entries of preset `name` for `base`.
    fn load_preset(&self, name: &str, base: &str) -> Result<Arc<PathMap>, PresetError>;

    /// Names of every registered preset, lowercase.
    fn list_presets(&self) -> BTreeSet<String>;

    /// Install (or replace) a provider under `name`.
    fn register_preset(&self, name: &str, provider: Arc<dyn PresetProvider>);

    fn has_preset(&self, name: &str) -> bool {
        self.list_presets().contains(&name.to_lowercase())
    }
}

/// Preset built from a closure, for layouts defined at runtime.
pub struct FnPreset {
    info: PresetInfo,
    build: Box<dyn Fn(&str) -> PathMap + Send + Sync>,
}

impl FnPreset {
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, build: F) -> Self
    where
        F: Fn(&str) -> PathMap + Send + Sync + 'static,
    {
        let name = name.into();
        Self {
            info: PresetInfo {
                key: name.to_lowercase(),
                name,
                description: description.into(),
            },
            build: Box::new(build),
        }
    }
}

impl PresetProvider for FnPreset {
    fn info(&self) -> PresetInfo {
        self.info.clone()
    }

    fn paths(&self, base: &str) -> PathMap {
        (self.build)(base)
    }
}

type CacheKey = (String, String);

/// Default [`PresetLoader`]: a case-insensitive provider table with a
/// `(name, base)` result cache.
///
/// Cached maps are immutable `Arc`s and recomputing an entry yields an
/// equal value, so concurrent misses on the same key are harmless.
pub struct PresetCatalog {
    providers: RwLock<HashMap<String, Arc<dyn PresetProvider>>>,
    cache: RwLock<HashMap<CacheKey, Arc<PathMap>>>,
}

impl PresetCatalog {
    /// An empty catalog with no presets registered.
    pub fn new() -> Self {
        Self {
            providers: RwLock::new(HashMap::new()),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// A catalog with the built-in framework layouts: `laravel`, `slim4`,
    /// `mezzio` and its alias `laminas`.
    pub fn with_builtin() -> Self {
        let catalog = Self::new();
        catalog.register_definition::<LaravelPreset>();
        catalog.register_definition::<Slim4Preset>();
        let mezzio = catalog.register_definition::<MezzioPreset>();
        catalog.register_preset("laminas", mezzio);
        catalog
    }

    fn register_definition<D: PresetDefinition + 'static>(&self) -> Arc<dyn PresetProvider> {
        let provider: Arc<dyn PresetProvider> = Arc::new(Builtin::<D>::new());
        self.register_preset(D::KEY, provider.clone());
        provider
    }

    /// Metadata of every registered preset, sorted by key.
    pub fn preset_info(&self) -> Vec<PresetInfo> {
        let providers = read(&self.providers);
        let mut keys: Vec<_> = providers.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|key| PresetInfo {
                key: key.clone(),
                ..providers[key].info()
            })
            .collect()
    }

    /// Number of cached `(name, base)` results.
    pub fn cached_len(&self) -> usize {
        read(&self.cache).len()
    }

    pub fn clear_cache(&self) {
        write(&self.cache).clear();
    }

    fn provider(&self, key: &str) -> Result<Arc<dyn PresetProvider>, PresetError> {
        let providers = read(&self.providers);
        providers.get(key).cloned().ok_or_else(|| {
            let mut available: Vec<_> = providers.keys().cloned().collect();
            available.sort();
            PresetError::unknown(key, available)
        })
    }
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl fmt::Debug for PresetCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresetCatalog")
            .field("presets", &self.list_presets())
            .field("cached", &self.cached_len())
            .finish()
    }
}

impl PresetLoader for PresetCatalog {
    fn load_preset(&self, name: &str, base: &str) -> Result<Arc<PathMap>, PresetError> {
        let key = (name.to_lowercase(), trim_base(base));

        if let Some(paths) = read(&self.cache).get(&key) {
            debug!(preset = %key.0, base = %key.1, "Preset cache hit");
            return Ok(paths.clone());
        }

        loop {
            // Providers run without any lock held.
            let provider = self.provider(&key.0)?;
            let paths = Arc::new(provider.paths(&key.1));

            // Cache only if the provider was not replaced meanwhile; holding
            // the providers lock orders this against `register_preset`.
            let providers = read(&self.providers);
            if providers
                .get(&key.0)
                .is_some_and(|current| Arc::ptr_eq(current, &provider))
            {
                debug!(preset = %key.0, base = %key.1, entries = paths.len(), "Preset loaded");
                return Ok(write(&self.cache).entry(key).or_insert(paths).clone());
            }
            debug!(preset = %key.0, "Preset replaced during load, retrying");
        }
    }

    fn list_presets(&self) -> BTreeSet<String> {
        read(&self.providers).keys().cloned().collect()
    }

    fn register_preset(&self, name: &str, provider: Arc<dyn PresetProvider>) {
        let key = name.to_lowercase();
        info!("Registering preset: {}", key);
        let mut providers = write(&self.providers);
        providers.insert(key.clone(), provider);
        write(&self.cache).retain(|(cached, _), _| *cached != key);
    }
}

// Lock contents stay consistent across a panic: every write is a single
// insert, retain or clear of immutable values.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::paths::join_relative;
    use std::sync::{OnceLock, Weak};

    #[test]
    fn test_builtin_presets_listed() {
        let catalog = PresetCatalog::with_builtin();
        let names = catalog.list_presets();
        for name in ["laravel", "slim4", "mezzio", "laminas"] {
            assert!(names.contains(name), "missing {name}");
        }
        assert!(catalog.has_preset("LARAVEL"));
        assert!(!catalog.has_preset("invalid"));
    }

    #[test]
    fn test_load_is_case_insensitive() {
        let catalog = PresetCatalog::with_builtin();
        let upper = catalog.load_preset("LARAVEL", "/app").unwrap();
        let lower = catalog.load_preset("laravel", "/app").unwrap();
        assert_eq!(upper["app"], lower["app"]);
        assert!(Arc::ptr_eq(&upper, &lower));
    }

    #[test]
    fn test_unknown_preset() {
        let catalog = PresetCatalog::with_builtin();
        let err = catalog.load_preset("invalid", "/app").unwrap_err();
        assert!(err.to_string().contains("Unknown preset 'invalid'"));
        assert!(err.to_string().contains("laravel"));
    }

    #[test]
    fn test_cache_keyed_by_base() {
        let catalog = PresetCatalog::with_builtin();
        catalog.load_preset("slim4", "/a").unwrap();
        catalog.load_preset("slim4", "/a/").unwrap();
        catalog.load_preset("slim4", "/b").unwrap();
        assert_eq!(catalog.cached_len(), 2);

        catalog.clear_cache();
        assert_eq!(catalog.cached_len(), 0);
    }

    #[test]
    fn test_alias_resolves_same_layout() {
        let catalog = PresetCatalog::with_builtin();
        let mezzio = catalog.load_preset("mezzio", "/app").unwrap();
        let laminas = catalog.load_preset("laminas", "/app").unwrap();
        assert_eq!(*mezzio, *laminas);
    }

    #[test]
    fn test_register_custom_preset() {
        let catalog = PresetCatalog::new();
        catalog.register_preset(
            "Custom-Test",
            Arc::new(FnPreset::new("Custom Test", "Custom test preset", |base| {
                PathMap::from([
                    ("base".to_string(), base.to_string()),
                    ("custom".to_string(), join_relative(base, "custom")),
                ])
            })),
        );

        assert!(catalog.has_preset("custom-test"));
        let paths = catalog.load_preset("custom-test", "/var/www/test-app").unwrap();
        assert_eq!(paths["custom"], join_relative("/var/www/test-app", "custom"));
    }

    #[test]
    fn test_reregistering_drops_cached_results() {
        let catalog = PresetCatalog::new();
        let fixed = |value: &'static str| {
            Arc::new(FnPreset::new("fixed", "", move |_| {
                PathMap::from([("x".to_string(), value.to_string())])
            }))
        };

        catalog.register_preset("fixed", fixed("one"));
        assert_eq!(catalog.load_preset("fixed", "/app").unwrap()["x"], "one");

        catalog.register_preset("fixed", fixed("two"));
        assert_eq!(catalog.load_preset("fixed", "/app").unwrap()["x"], "two");
    }

    /// Replaces its own registration while computing, like a concurrent
    /// `register_preset` landing between provider lookup and cache insert.
    struct ReplacedDuringLoad {
        catalog: OnceLock<Weak<PresetCatalog>>,
    }

    impl PresetProvider for ReplacedDuringLoad {
        fn info(&self) -> PresetInfo {
            PresetInfo {
                key: "swap".to_string(),
                name: "Swap".to_string(),
                description: String::new(),
            }
        }

        fn paths(&self, base: &str) -> PathMap {
            if let Some(catalog) = self.catalog.get().and_then(Weak::upgrade) {
                catalog.register_preset(
                    "swap",
                    Arc::new(FnPreset::new("swap", "", |base| {
                        PathMap::from([("x".to_string(), format!("{base}/new"))])
                    })),
                );
            }
            PathMap::from([("x".to_string(), format!("{base}/old"))])
        }
    }

    #[test]
    fn test_replacement_during_load_is_not_cached_stale() {
        let catalog = Arc::new(PresetCatalog::new());
        let provider = Arc::new(ReplacedDuringLoad {
            catalog: OnceLock::new(),
        });
        provider.catalog.set(Arc::downgrade(&catalog)).unwrap();
        catalog.register_preset("swap", provider);

        assert_eq!(catalog.load_preset("swap", "/app").unwrap()["x"], "/app/new");
        assert_eq!(catalog.load_preset("swap", "/app").unwrap()["x"], "/app/new");
        assert_eq!(catalog.cached_len(), 1);
    }

    #[test]
    fn test_preset_info_sorted() {
        let info = PresetCatalog::with_builtin().preset_info();
        let keys: Vec<_> = info.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, ["laminas", "laravel", "mezzio", "slim4"]);
        assert_eq!(info[1].name, "Laravel");
        assert_eq!(info[0].name, "Mezzio/Laminas");
    }
}
