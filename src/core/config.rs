//! Configuration management.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables, configuration files, or defaults,
//! and turned into a ready-to-use [`PathRegistry`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use super::error::{Error, Result};
use super::security::SanitizationPolicy;
use crate::domains::paths::{MergeStrategy, PathRegistry, trim_base};

/// Environment variable holding the application base directory.
pub const BASE_PATH_ENV: &str = "APP_PATHS_BASE";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Registry construction settings.
    pub registry: RegistryConfig,

    /// Sanitization settings.
    pub security: SecurityConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// How the registry is built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Application base directory. Falls back to the working directory.
    pub base_path: Option<PathBuf>,

    /// Preset applied over the defaults, if any.
    pub preset: Option<String>,

    /// Defer the preset until the first lookup and tolerate its absence.
    pub lazy_preset: bool,

    pub merge: MergeStrategy,
}

/// Configuration for path sanitization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Named policy profile: default, uploads, templates, content,
    /// development or production.
    pub profile: String,

    /// Prefixes exempt from hidden-element and extension checks.
    pub trusted_paths: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_timestamps: true,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            profile: "default".to_string(),
            trusted_paths: Vec::new(),
        }
    }
}

impl SecurityConfig {
    /// Build the sanitization policy this configuration describes.
    pub fn policy(&self) -> Result<SanitizationPolicy> {
        let policy = SanitizationPolicy::profile(&self.profile).ok_or_else(|| {
            Error::config(format!("Unknown security profile '{}'", self.profile))
        })?;
        Ok(policy.with_trusted_paths(self.trusted_paths.iter().cloned()))
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `APP_PATHS_`.
    /// For example: `APP_PATHS_BASE`, `APP_PATHS_PRESET`.
    ///
    /// Runs before logging is initialized, so it reports bad values as
    /// errors instead of logging them.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(level) = std::env::var("APP_PATHS_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(base) = std::env::var(BASE_PATH_ENV) {
            config.registry.base_path = Some(PathBuf::from(base));
        }

        if let Ok(preset) = std::env::var("APP_PATHS_PRESET") {
            config.registry.preset = Some(preset);
        }

        if let Ok(lazy) = std::env::var("APP_PATHS_LAZY_PRESET") {
            config.registry.lazy_preset = lazy.parse().map_err(|_| {
                Error::config(format!(
                    "APP_PATHS_LAZY_PRESET must be 'true' or 'false', got '{lazy}'"
                ))
            })?;
        }

        if let Ok(merge) = std::env::var("APP_PATHS_MERGE") {
            config.registry.merge = match merge.to_lowercase().as_str() {
                "preset_wins" => MergeStrategy::PresetWins,
                "existing_wins" => MergeStrategy::ExistingWins,
                other => {
                    return Err(Error::config(format!(
                        "APP_PATHS_MERGE must be 'preset_wins' or 'existing_wins', got '{other}'"
                    )));
                }
            };
        }

        if let Ok(profile) = std::env::var("APP_PATHS_SECURITY_PROFILE") {
            config.security.profile = profile;
        }

        if let Ok(trusted) = std::env::var("APP_PATHS_TRUSTED_PATHS") {
            config.security.trusted_paths = trusted
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect();
        }

        Ok(config)
    }

    /// Build a registry from this configuration.
    pub fn build_registry(&self) -> Result<PathRegistry> {
        let base = match &self.registry.base_path {
            Some(base) => base.clone(),
            None => {
                let cwd = std::env::current_dir()?;
                warn!("No base path configured, using working directory {:?}", cwd);
                cwd
            }
        };

        let mut builder = PathRegistry::builder(base.to_string_lossy())
            .policy(self.security.policy()?)
            .merge_strategy(self.registry.merge);

        if let Some(preset) = &self.registry.preset {
            builder = if self.registry.lazy_preset {
                builder.lazy_preset(preset)
            } else {
                builder.preset(preset)
            };
        }

        Ok(builder.build()?)
    }
}

/// Read a base directory from environment variable `var`.
///
/// The value must name an existing directory; it is canonicalized and
/// returned without trailing separators.
pub fn base_path_from_env(var: &str) -> Result<String> {
    let value = std::env::var(var)
        .map_err(|_| Error::config(format!("Environment variable '{var}' is not set")))?;

    let path = Path::new(&value);
    if !path.is_dir() {
        return Err(Error::config(format!(
            "'{value}' from {var} is not an existing directory"
        )));
    }

    let resolved = path
        .canonicalize()
        .map_err(|e| Error::config(format!("Cannot resolve '{value}' from {var}: {e}")))?;
    Ok(trim_base(&resolved.to_string_lossy()))
}
