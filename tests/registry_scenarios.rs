//! End-to-end scenarios across the registry, presets and sanitizer.

use std::collections::BTreeSet;
use std::path::MAIN_SEPARATOR;
use std::sync::Arc;
use std::thread;

use app_paths::{
    FnPreset, MergeStrategy, PathMap, PathRegistry, PresetCatalog, PresetError, PresetInfo,
    PresetLoader, PresetProvider, RegistryError, SanitizationPolicy, SanitizeError,
};

fn at(base: &str, relative: &str) -> String {
    format!(
        "{base}{MAIN_SEPARATOR}{}",
        relative.replace('/', &MAIN_SEPARATOR.to_string())
    )
}

#[test]
fn default_layout_scenario() {
    let paths = PathRegistry::new("/var/www/app", PathMap::new());

    assert_eq!(paths.get("logs").unwrap(), at("/var/www/app", "var/logs"));

    let storage = paths.get("storage").unwrap();
    assert_eq!(
        paths.secure_path(storage, "app/uploads/image.jpg").unwrap(),
        at("/var/www/app", "var/storage/app/uploads/image.jpg")
    );

    let err = paths
        .secure_path(storage, "../../../etc/passwd")
        .unwrap_err();
    assert!(err.is_traversal(), "unexpected error: {err}");
}

#[test]
fn merge_precedence_with_laravel() {
    let overrides = PathMap::from([
        ("custom".to_string(), "my-dir".to_string()),
        ("app".to_string(), "my-app-dir".to_string()),
    ]);
    let paths = PathRegistry::new("/app", overrides).apply_preset("laravel").unwrap();

    assert_eq!(paths.get("app").unwrap(), at("/app", "app"));
    assert_eq!(paths.get("custom").unwrap(), "my-dir");
    assert_eq!(
        paths.get("controllers").unwrap(),
        at("/app", "app/Http/Controllers")
    );
}

#[test]
fn preset_keys_win_defaults_kept_otherwise() {
    let before = PathRegistry::new("/app", PathMap::new());
    let after = before.apply_preset("slim4").unwrap();
    let preset = PresetCatalog::with_builtin().load_preset("slim4", "/app").unwrap();

    for (name, path) in before.all() {
        let expected = preset.get(&name).unwrap_or(&path);
        assert_eq!(after.get(&name).unwrap(), expected, "entry {name}");
    }
    for (name, path) in preset.iter() {
        assert_eq!(after.get(name).unwrap(), path, "entry {name}");
    }
}

#[test]
fn unknown_name_and_fallback() {
    let paths = PathRegistry::new("/app", PathMap::new());
    assert!(matches!(
        paths.get("nonexistent"),
        Err(RegistryError::UnknownPathName { .. })
    ));
    assert_eq!(paths.get_or("nonexistent", "fallback"), "fallback");
}

#[test]
fn whitelist_and_blacklist_precedence() {
    let whitelisted = PathRegistry::new("/app", PathMap::new())
        .with_policy(SanitizationPolicy::new().with_allowed_extensions(["jpg", "pdf"]));
    assert_eq!(
        whitelisted.path("x.png"),
        Err(RegistryError::Sanitize(SanitizeError::ExtensionNotAllowed {
            extension: "png".to_string()
        }))
    );

    let blacklisted = PathRegistry::new("/app", PathMap::new());
    assert_eq!(
        blacklisted.path("x.php"),
        Err(RegistryError::Sanitize(SanitizeError::ExtensionBlocked {
            extension: "php".to_string()
        }))
    );
}

#[test]
fn with_preset_per_framework() {
    let base = "/var/www/test-app";

    let laravel = PathRegistry::with_preset("laravel", base).unwrap();
    assert_eq!(laravel.base(), base);
    assert_eq!(laravel.get("views").unwrap(), at(base, "resources/views"));

    let slim = PathRegistry::with_preset("slim4", base).unwrap();
    assert_eq!(slim.get("handlers").unwrap(), at(base, "src/Handler"));

    let mezzio = PathRegistry::with_preset("mezzio", base).unwrap();
    assert_eq!(mezzio.get("content").unwrap(), at(base, "content"));

    let laminas = PathRegistry::with_preset("LAMINAS", base).unwrap();
    assert_eq!(laminas.all(), mezzio.all());
}

#[test]
fn unknown_preset_names_available_presets() {
    let err = PathRegistry::with_preset("invalid", "/app").unwrap_err();
    match err {
        RegistryError::Preset(PresetError::UnknownPreset { name, available }) => {
            assert_eq!(name, "invalid");
            assert!(available.contains("laravel"));
            assert!(available.contains("slim4"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn injected_loader_with_custom_preset() {
    let catalog = Arc::new(PresetCatalog::with_builtin());
    catalog.register_preset(
        "custom-test",
        Arc::new(FnPreset::new("Custom Test", "Custom test preset", |base| {
            PathMap::from([
                ("custom".to_string(), format!("{base}{MAIN_SEPARATOR}custom")),
                ("test".to_string(), format!("{base}{MAIN_SEPARATOR}test")),
            ])
        })),
    );

    let paths = PathRegistry::builder("/var/www/test-app")
        .loader(catalog.clone())
        .preset("custom-test")
        .build()
        .unwrap();
    assert_eq!(paths.get("custom").unwrap(), at("/var/www/test-app", "custom"));

    // Presets applied later go through the same loader.
    let again = paths.apply_preset("CUSTOM-TEST").unwrap();
    assert_eq!(again.get("test").unwrap(), at("/var/www/test-app", "test"));
    assert_eq!(catalog.cached_len(), 1);
}

#[test]
fn preset_security_still_enforced() {
    let paths = PathRegistry::with_preset("laravel", "/var/www/test-app").unwrap();
    let storage = paths.get("storage").unwrap();

    let safe = paths.get_path(storage, "app/uploads/image.jpg").unwrap();
    assert!(safe.starts_with("/var/www/test-app"));
    assert!(paths.get_path(storage, "../../../etc/passwd").is_err());
}

#[test]
fn production_policy_with_trusted_prefix() {
    let paths = PathRegistry::new("/var/www/test-app", PathMap::new()).with_policy(
        SanitizationPolicy::production().with_trusted_paths(["trusted/path"]),
    );

    assert_eq!(
        paths.path("trusted/path/file.txt").unwrap(),
        at("/var/www/test-app", "trusted/path/file.txt")
    );
    assert!(paths.path("file%00.txt").is_err());
    assert!(paths.path("../etc/passwd").unwrap_err().is_traversal());
}

#[test]
fn existing_wins_strategy_from_builder() {
    let paths = PathRegistry::builder("/app")
        .path("logs", "/var/log/app")
        .merge_strategy(MergeStrategy::ExistingWins)
        .preset("laravel")
        .build()
        .unwrap();

    assert_eq!(paths.get("logs").unwrap(), "/var/log/app");
    assert_eq!(paths.get("models").unwrap(), at("/app", "app/Models"));
}

/// Loader whose every preset fails, to exercise the lazy downgrade.
struct BrokenLoader;

impl PresetLoader for BrokenLoader {
    fn load_preset(&self, name: &str, _base: &str) -> Result<Arc<PathMap>, PresetError> {
        Err(PresetError::unknown(name, Vec::<String>::new()))
    }

    fn list_presets(&self) -> BTreeSet<String> {
        BTreeSet::new()
    }

    fn register_preset(&self, _name: &str, _provider: Arc<dyn PresetProvider>) {}
}

#[test]
fn lazy_preset_failure_downgrades() {
    let paths = PathRegistry::builder("/app")
        .loader(Arc::new(BrokenLoader))
        .lazy_preset("laravel")
        .build()
        .unwrap();

    assert!(!paths.has("controllers"));
    assert_eq!(paths.get("config").unwrap(), at("/app", "config"));
}

#[test]
fn shared_registry_across_threads() {
    let paths = Arc::new(
        PathRegistry::builder("/app")
            .lazy_preset("mezzio")
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let paths = paths.clone();
            thread::spawn(move || {
                let modules = paths.get("modules").unwrap().to_string();
                let joined = paths.secure_path(&modules, &format!("Mod{i}/config.json"));
                (modules, joined.is_ok())
            })
        })
        .collect();

    for handle in handles {
        let (modules, ok) = handle.join().unwrap();
        assert_eq!(modules, at("/app", "modules"));
        assert!(ok);
    }
}

#[test]
fn preset_info_lists_builtin_layouts() {
    let info = PresetCatalog::with_builtin().preset_info();
    assert!(info.contains(&PresetInfo {
        key: "slim4".to_string(),
        name: "Slim 4".to_string(),
        description: "Slim 4 Framework directory structure with src, templates, and var directories"
            .to_string(),
    }));
}
