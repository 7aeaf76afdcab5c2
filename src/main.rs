//! Demo entry point.
//!
//! Builds a registry from the environment, prints the resolved map as JSON,
//! then joins each command-line argument onto the `storage` directory.

use anyhow::{Context, Result};
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use app_paths::core::{BASE_PATH_ENV, Config, base_path_from_env};

fn main() -> Result<()> {
    // Load configuration from environment
    let mut config = Config::from_env().context("invalid configuration")?;

    // Initialize logging
    init_logging(&config.logging.level, config.logging.with_timestamps);
    info!(
        preset = ?config.registry.preset,
        lazy = config.registry.lazy_preset,
        merge = ?config.registry.merge,
        profile = %config.security.profile,
        "Configuration loaded"
    );

    if std::env::var_os(BASE_PATH_ENV).is_some() {
        let base = base_path_from_env(BASE_PATH_ENV)?;
        config.registry.base_path = Some(base.into());
    }

    let registry = config
        .build_registry()
        .context("failed to build path registry")?;
    info!("Registry ready for {}", registry.base());

    let mut paths: Vec<_> = registry.all().into_iter().collect();
    paths.sort();
    let map: serde_json::Map<_, _> = paths
        .into_iter()
        .map(|(name, path)| (name, serde_json::Value::String(path)))
        .collect();
    println!("{}", serde_json::to_string_pretty(&map)?);

    let storage = registry.get("storage")?;
    for fragment in std::env::args().skip(1) {
        match registry.secure_path(storage, &fragment) {
            Ok(path) => println!("{fragment} -> {path}"),
            Err(e) => {
                warn!("Rejected '{}': {}", fragment, e);
                println!("{fragment} -> rejected: {e}");
            }
        }
    }

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Configures tracing with the specified log level and format.
fn init_logging(level: &str, with_timestamps: bool) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    if with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
