//! Errors raised while sanitizing untrusted path fragments.

use thiserror::Error;

/// Reasons a path fragment was rejected by the sanitizer.
///
/// Every variant is a caller-input validation failure: it is never retried
/// and the offending fragment must not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanitizeError {
    #[error("Path cannot be empty")]
    EmptyPath,

    #[error("Path too long: {length} characters, {max} characters maximum")]
    PathTooLong { length: usize, max: usize },

    #[error("Filename too long: '{filename}' exceeds {max} characters maximum")]
    FilenameTooLong { filename: String, max: usize },

    #[error("Path contains null byte: '{fragment}'")]
    NullByte { fragment: String },

    #[error("Dangerous pattern detected in path '{fragment}': {pattern}")]
    DangerousPattern {
        fragment: String,
        pattern: String,
        traversal: bool,
    },

    #[error("Path traversal detected in '{fragment}'")]
    PathTraversal { fragment: String },

    #[error("Absolute paths not allowed in strict mode: '{fragment}'")]
    AbsolutePathNotAllowed { fragment: String },

    #[error("Hidden files/directories not allowed: '{segment}' in '{fragment}'")]
    HiddenElementNotAllowed { fragment: String, segment: String },

    #[error("File extension '{extension}' not in allowed list")]
    ExtensionNotAllowed { extension: String },

    #[error("File extension '{extension}' is blocked for security reasons")]
    ExtensionBlocked { extension: String },
}

impl SanitizeError {
    /// Whether the rejection belongs to the traversal class: a literal `..`,
    /// or a dangerous pattern that walks out of the base (`../`, `~/`,
    /// `%2e%2e`, encoded separators).
    pub fn is_traversal(&self) -> bool {
        match self {
            Self::PathTraversal { .. } => true,
            Self::DangerousPattern { traversal, .. } => *traversal,
            _ => false,
        }
    }

    pub(crate) fn null_byte(fragment: &str) -> Self {
        Self::NullByte {
            fragment: printable(fragment),
        }
    }
}

/// NUL bytes are shown escaped so error messages stay printable.
pub(crate) fn printable(fragment: &str) -> String {
    fragment.replace('\0', "\\0")
}
