//! Sanitization policy: the rule set a [`PathSanitizer`](super::PathSanitizer)
//! applies to each fragment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::sanitizer::collapse_separators;

/// Default maximum length of a whole fragment.
pub const DEFAULT_MAX_PATH_LENGTH: usize = 4096;

/// Default maximum length of the final path segment.
pub const DEFAULT_MAX_FILENAME_LENGTH: usize = 255;

/// Extensions rejected when no whitelist is configured.
pub const DEFAULT_BLOCKED_EXTENSIONS: &[&str] = &[
    "php", "phtml", "php3", "php4", "php5", "phar", "exe", "bat", "cmd", "com", "scr", "vbs",
    "js", "jar", "sh", "py", "pl", "rb", "asp", "aspx", "jsp", "cgi", "htaccess", "htpasswd",
];

const UPLOAD_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "pdf", "txt", "doc", "docx",
];
const TEMPLATE_EXTENSIONS: &[&str] = &["phtml", "twig", "html", "htm", "xml"];
const CONTENT_EXTENSIONS: &[&str] = &["md", "txt", "json", "yaml", "yml"];

/// Immutable rule set consumed by every `sanitize` call.
///
/// Policies are plain values: build one with the `with_*` methods or a named
/// profile, then hand it to a sanitizer or registry. Extensions are stored
/// lowercased and both length limits are clamped to at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizationPolicy {
    pub max_path_length: usize,
    pub max_filename_length: usize,

    /// Whitelist. Empty means "no whitelist", and the blacklist applies.
    pub allowed_extensions: BTreeSet<String>,
    pub blocked_extensions: BTreeSet<String>,

    /// Rejects absolute fragments and hidden segments.
    pub strict_mode: bool,
    pub hidden_file_protection: bool,

    pub path_traversal_protection: bool,
    pub encoding_protection: bool,
    pub extension_validation: bool,
    pub length_validation: bool,

    pub custom_dangerous_patterns: Vec<String>,

    /// Fragments under one of these prefixes skip hidden-element and
    /// extension checks.
    pub trusted_path_prefixes: Vec<String>,
}

impl Default for SanitizationPolicy {
    fn default() -> Self {
        Self {
            max_path_length: DEFAULT_MAX_PATH_LENGTH,
            max_filename_length: DEFAULT_MAX_FILENAME_LENGTH,
            allowed_extensions: BTreeSet::new(),
            blocked_extensions: lowercase_set(DEFAULT_BLOCKED_EXTENSIONS),
            strict_mode: true,
            hidden_file_protection: false,
            path_traversal_protection: true,
            encoding_protection: true,
            extension_validation: true,
            length_validation: true,
            custom_dangerous_patterns: Vec::new(),
            trusted_path_prefixes: Vec::new(),
        }
    }
}

impl SanitizationPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_path_length(mut self, length: usize) -> Self {
        self.max_path_length = length.max(1);
        self
    }

    pub fn with_max_filename_length(mut self, length: usize) -> Self {
        self.max_filename_length = length.max(1);
        self
    }

    pub fn with_allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_extensions = lowercase_set(extensions);
        self
    }

    pub fn with_blocked_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.blocked_extensions = lowercase_set(extensions);
        self
    }

    pub fn with_strict_mode(mut self, enabled: bool) -> Self {
        self.strict_mode = enabled;
        self
    }

    pub fn with_hidden_file_protection(mut self, enabled: bool) -> Self {
        self.hidden_file_protection = enabled;
        self
    }

    pub fn with_path_traversal_protection(mut self, enabled: bool) -> Self {
        self.path_traversal_protection = enabled;
        self
    }

    pub fn with_encoding_protection(mut self, enabled: bool) -> Self {
        self.encoding_protection = enabled;
        self
    }

    pub fn with_extension_validation(mut self, enabled: bool) -> Self {
        self.extension_validation = enabled;
        self
    }

    pub fn with_length_validation(mut self, enabled: bool) -> Self {
        self.length_validation = enabled;
        self
    }

    /// Adds patterns to the dangerous-pattern scan. Matching is
    /// case-insensitive.
    pub fn with_custom_dangerous_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.custom_dangerous_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn with_trusted_paths<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trusted_path_prefixes
            .extend(prefixes.into_iter().map(Into::into));
        self
    }

    /// Whether an already-decoded fragment lies under a trusted prefix.
    ///
    /// Only separators are normalized on either side; nothing is decoded
    /// here, so the decision is made on the same text that gets joined.
    /// Matching is on whole segments: `trusted/path` covers
    /// `trusted/path/file.txt` but not `trusted/pathology`.
    pub fn is_path_trusted(&self, fragment: &str) -> bool {
        let fragment = collapse_separators(fragment);
        self.trusted_path_prefixes.iter().any(|prefix| {
            let prefix = collapse_separators(prefix);
            !prefix.is_empty()
                && fragment.starts_with(&prefix)
                && fragment[prefix.len()..]
                    .chars()
                    .next()
                    .is_none_or(|c| c == std::path::MAIN_SEPARATOR)
        })
    }

    /// Uploaded files: images and office documents only, short names.
    pub fn uploads() -> Self {
        Self::default()
            .with_allowed_extensions(UPLOAD_EXTENSIONS)
            .with_max_path_length(1024)
            .with_max_filename_length(100)
            .with_strict_mode(true)
    }

    /// Template lookups: markup extensions, relaxed structure rules.
    pub fn templates() -> Self {
        Self::default()
            .with_allowed_extensions(TEMPLATE_EXTENSIONS)
            .with_max_path_length(2048)
            .with_max_filename_length(200)
            .with_strict_mode(false)
            .with_hidden_file_protection(false)
    }

    /// Content files: text and data formats.
    pub fn content() -> Self {
        Self::default()
            .with_allowed_extensions(CONTENT_EXTENSIONS)
            .with_max_path_length(2048)
            .with_max_filename_length(200)
            .with_strict_mode(false)
    }

    pub fn development() -> Self {
        Self::default()
            .with_strict_mode(false)
            .with_hidden_file_protection(false)
            .with_max_path_length(8192)
            .with_max_filename_length(500)
    }

    pub fn production() -> Self {
        Self::default()
            .with_strict_mode(true)
            .with_hidden_file_protection(true)
            .with_max_path_length(2048)
            .with_max_filename_length(200)
    }

    /// Looks up a named profile (`default`, `uploads`, `templates`,
    /// `content`, `development`, `production`), case-insensitively.
    pub fn profile(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "default" => Some(Self::default()),
            "uploads" => Some(Self::uploads()),
            "templates" => Some(Self::templates()),
            "content" => Some(Self::content()),
            "development" | "dev" => Some(Self::development()),
            "production" | "prod" => Some(Self::production()),
            _ => None,
        }
    }
}

fn lowercase_set<I, S>(extensions: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    extensions
        .into_iter()
        .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}
