//! Preset-specific error types.

use thiserror::Error;

/// Errors that can occur while loading presets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresetError {
    /// No provider is registered under the requested name.
    #[error("Unknown preset '{name}'. Available presets: {available}")]
    UnknownPreset { name: String, available: String },
}

impl PresetError {
    /// Create a new "unknown preset" error listing the registered names.
    pub fn unknown<I, S>(name: impl Into<String>, available: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let available = available
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Self::UnknownPreset {
            name: name.into(),
            available,
        }
    }
}
