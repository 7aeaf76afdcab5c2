use std::borrow::Cow;
use std::path::MAIN_SEPARATOR;
use std::sync::Arc;

use tracing::debug;

use super::error::{SanitizeError, printable};
use super::policy::SanitizationPolicy;

/// Which protection toggle governs a dangerous pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternClass {
    /// Walks out of the base directory.
    Traversal,
    /// Percent-encoded traversal or separators.
    EncodedTraversal,
    /// Other percent-encoded payloads.
    Encoding,
    /// URI schemes and inline code markers. Always scanned.
    Payload,
}

impl PatternClass {
    fn is_traversal(self) -> bool {
        matches!(self, Self::Traversal | Self::EncodedTraversal)
    }

    fn enabled(self, policy: &SanitizationPolicy) -> bool {
        match self {
            Self::Traversal => policy.path_traversal_protection,
            Self::EncodedTraversal => {
                policy.path_traversal_protection && policy.encoding_protection
            }
            Self::Encoding => policy.encoding_protection,
            Self::Payload => true,
        }
    }
}

// Lowercase; matching lowercases the subject.
const DANGEROUS_PATTERNS: &[(&str, PatternClass)] = &[
    ("../", PatternClass::Traversal),
    ("..\\", PatternClass::Traversal),
    ("./", PatternClass::Traversal),
    (".\\", PatternClass::Traversal),
    ("~/", PatternClass::Traversal),
    ("~\\", PatternClass::Traversal),
    ("%2e%2e", PatternClass::EncodedTraversal),
    ("%2f", PatternClass::EncodedTraversal),
    ("%5c", PatternClass::EncodedTraversal),
    ("%00", PatternClass::Encoding),
    ("file://", PatternClass::Payload),
    ("http://", PatternClass::Payload),
    ("https://", PatternClass::Payload),
    ("ftp://", PatternClass::Payload),
    ("php://", PatternClass::Payload),
    ("data://", PatternClass::Payload),
    ("expect://", PatternClass::Payload),
    ("zip://", PatternClass::Payload),
    ("<script", PatternClass::Payload),
    ("</script>", PatternClass::Payload),
    ("<?php", PatternClass::Payload),
    ("<?=", PatternClass::Payload),
    ("eval(", PatternClass::Payload),
    ("exec(", PatternClass::Payload),
    ("system(", PatternClass::Payload),
    ("shell_exec(", PatternClass::Payload),
    ("passthru(", PatternClass::Payload),
    ("file_get_contents(", PatternClass::Payload),
    ("include(", PatternClass::Payload),
    ("require(", PatternClass::Payload),
    ("include_once(", PatternClass::Payload),
    ("require_once(", PatternClass::Payload),
];

/// Validates and normalizes untrusted relative path fragments.
///
/// A sanitizer is a pure function of `(fragment, policy)`: it holds no
/// state besides its policy and can be shared freely across threads.
///
/// ```
/// use app_paths::PathSanitizer;
///
/// let sanitizer = PathSanitizer::default();
/// assert!(sanitizer.sanitize("documents/report.pdf").is_ok());
/// assert!(sanitizer.sanitize("../etc/passwd").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathSanitizer {
    policy: Arc<SanitizationPolicy>,
}

impl PathSanitizer {
    pub fn new(policy: SanitizationPolicy) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }

    pub fn from_shared(policy: Arc<SanitizationPolicy>) -> Self {
        Self { policy }
    }

    pub fn uploads() -> Self {
        Self::new(SanitizationPolicy::uploads())
    }

    pub fn templates() -> Self {
        Self::new(SanitizationPolicy::templates())
    }

    pub fn content() -> Self {
        Self::new(SanitizationPolicy::content())
    }

    pub fn policy(&self) -> &SanitizationPolicy {
        &self.policy
    }

    /// Checks `fragment` against the policy and returns its normalized
    /// form, ready to be appended to a trusted base directory.
    pub fn sanitize(&self, fragment: &str) -> Result<String, SanitizeError> {
        self.check(fragment).inspect_err(|e| {
            debug!(fragment = %printable(fragment), error = %e, "Rejected path fragment");
        })
    }

    /// Boolean form of [`sanitize`](Self::sanitize).
    pub fn is_safe(&self, fragment: &str) -> bool {
        self.sanitize(fragment).is_ok()
    }

    /// Reduced check for caller-supplied paths that are stored as-is
    /// rather than joined: null bytes, dangerous patterns and `..`.
    pub fn screen(&self, raw: &str) -> Result<(), SanitizeError> {
        if raw.contains('\0') {
            return Err(SanitizeError::null_byte(raw));
        }
        let decoded = decode(raw);
        if decoded.contains('\0') {
            return Err(SanitizeError::null_byte(raw));
        }
        self.scan_patterns(raw, &decoded)?;
        if self.policy.path_traversal_protection && decoded.contains("..") {
            return Err(SanitizeError::PathTraversal {
                fragment: raw.to_string(),
            });
        }
        Ok(())
    }

    fn check(&self, fragment: &str) -> Result<String, SanitizeError> {
        let policy = &*self.policy;

        if fragment.is_empty() {
            return Err(SanitizeError::EmptyPath);
        }

        if policy.length_validation && fragment.len() > policy.max_path_length {
            return Err(SanitizeError::PathTooLong {
                length: fragment.len(),
                max: policy.max_path_length,
            });
        }

        if fragment.contains('\0') {
            return Err(SanitizeError::null_byte(fragment));
        }

        if policy.length_validation {
            let filename = fragment.rsplit(['/', '\\']).next().unwrap_or(fragment);
            if filename.len() > policy.max_filename_length {
                return Err(SanitizeError::FilenameTooLong {
                    filename: filename.to_string(),
                    max: policy.max_filename_length,
                });
            }
        }

        let normalized = normalize(fragment);
        if normalized.contains('\0') {
            return Err(SanitizeError::null_byte(fragment));
        }
        if normalized.is_empty() {
            return Err(SanitizeError::EmptyPath);
        }

        self.scan_patterns(fragment, &normalized)?;

        if policy.path_traversal_protection && normalized.contains("..") {
            return Err(SanitizeError::PathTraversal {
                fragment: fragment.to_string(),
            });
        }

        if policy.strict_mode && is_absolute(fragment) {
            return Err(SanitizeError::AbsolutePathNotAllowed {
                fragment: fragment.to_string(),
            });
        }

        let trusted = policy.is_path_trusted(&normalized);

        if !trusted && (policy.strict_mode || policy.hidden_file_protection) {
            if let Some(segment) = normalized
                .split(MAIN_SEPARATOR)
                .find(|s| s.starts_with('.') && *s != "." && *s != "..")
            {
                return Err(SanitizeError::HiddenElementNotAllowed {
                    fragment: fragment.to_string(),
                    segment: segment.to_string(),
                });
            }
        }

        if !trusted && policy.extension_validation {
            check_extension(policy, &normalized)?;
        }

        Ok(normalized)
    }

    /// Scans both spellings of the fragment, case-insensitively.
    fn scan_patterns(&self, original: &str, decoded: &str) -> Result<(), SanitizeError> {
        let policy = &*self.policy;
        let subjects = [decoded.to_lowercase(), original.to_lowercase()];

        let reject = |pattern: &str, traversal: bool| SanitizeError::DangerousPattern {
            fragment: original.to_string(),
            pattern: pattern.to_string(),
            traversal,
        };

        if policy.path_traversal_protection && subjects.iter().any(|s| s.starts_with('~')) {
            return Err(reject("~", true));
        }

        for subject in &subjects {
            for &(pattern, class) in DANGEROUS_PATTERNS {
                if class.enabled(policy) && subject.contains(pattern) {
                    return Err(reject(pattern, class.is_traversal()));
                }
            }
            for pattern in &policy.custom_dangerous_patterns {
                if !pattern.is_empty() && subject.contains(&pattern.to_lowercase()) {
                    return Err(reject(pattern.as_str(), false));
                }
            }
        }

        Ok(())
    }
}

fn check_extension(policy: &SanitizationPolicy, normalized: &str) -> Result<(), SanitizeError> {
    let Some(extension) = extension_of(normalized) else {
        return Ok(());
    };

    if !policy.allowed_extensions.is_empty() {
        if !policy.allowed_extensions.contains(&extension) {
            return Err(SanitizeError::ExtensionNotAllowed { extension });
        }
        return Ok(());
    }

    if policy.blocked_extensions.contains(&extension) {
        return Err(SanitizeError::ExtensionBlocked { extension });
    }

    Ok(())
}

/// Lowercased text after the last `.` of the final segment.
fn extension_of(normalized: &str) -> Option<String> {
    let basename = normalized.rsplit(MAIN_SEPARATOR).next()?;
    let (_, extension) = basename.rsplit_once('.')?;
    (!extension.is_empty()).then(|| extension.to_lowercase())
}

fn is_absolute(fragment: &str) -> bool {
    if fragment.starts_with(['/', '\\']) {
        return true;
    }
    let bytes = fragment.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// URL-decodes once (`+` as space, then percent escapes), then decodes
/// HTML entities.
fn decode(fragment: &str) -> String {
    let spaced = fragment.replace('+', " ");
    let bytes = urlencoding::decode_binary(spaced.as_bytes());
    let url_decoded = String::from_utf8_lossy(&bytes);
    match html_escape::decode_html_entities(&url_decoded) {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}

/// Decodes the fragment, then applies [`collapse_separators`].
pub(crate) fn normalize(fragment: &str) -> String {
    collapse_separators(&decode(fragment))
}

/// Maps both separator styles to the platform separator, collapses runs and
/// trims separators from both ends. Performs no decoding.
pub(crate) fn collapse_separators(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len());
    for c in path.chars() {
        if c == '/' || c == '\\' {
            if !normalized.ends_with(MAIN_SEPARATOR) {
                normalized.push(MAIN_SEPARATOR);
            }
        } else {
            normalized.push(c);
        }
    }
    normalized.trim_matches(MAIN_SEPARATOR).to_string()
}


/// Property-based tests for normalization and traversal rejection.
#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn segment() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9_-]{1,10}".prop_map(|s| s)
    }

    /// Safe relative paths: plain segments with an optional benign extension.
    fn safe_path_strategy() -> impl Strategy<Value = String> {
        (
            prop::collection::vec(segment(), 1..5),
            prop_oneof![Just(""), Just(".txt"), Just(".jpg"), Just(".md")],
        )
            .prop_map(|(parts, ext)| format!("{}{}", parts.join("/"), ext))
    }

    /// Paths embedding `..` literally, with backslashes, or percent-encoded.
    fn traversal_path_strategy() -> impl Strategy<Value = String> {
        (
            prop::collection::vec(segment(), 0..3),
            prop_oneof![
                Just(".."),
                Just("../"),
                Just("..\\"),
                Just("%2e%2e/"),
                Just("%2E%2E\\"),
                Just("%2e%2e"),
            ],
            prop::collection::vec(segment(), 0..3),
        )
            .prop_map(|(before, dots, after)| {
                let mut parts = before;
                parts.push(dots.to_string());
                parts.extend(after);
                parts.join("/")
            })
    }

    fn policies() -> Vec<SanitizationPolicy> {
        vec![
            SanitizationPolicy::default(),
            SanitizationPolicy::uploads(),
            SanitizationPolicy::templates(),
            SanitizationPolicy::content(),
            SanitizationPolicy::development(),
            SanitizationPolicy::production(),
            SanitizationPolicy::default().with_encoding_protection(false),
        ]
    }

    proptest! {
        /// Property: sanitizing an accepted result again is a no-op.
        #[test]
        fn normalization_is_idempotent(path in safe_path_strategy()) {
            let sanitizer = PathSanitizer::new(SanitizationPolicy::default());
            let once = sanitizer.sanitize(&path).unwrap();
            let twice = sanitizer.sanitize(&once).unwrap();
            prop_assert_eq!(once, twice);
        }

        /// Property: `..` in any spelling is rejected as traversal under
        /// every policy that keeps traversal protection on.
        #[test]
        fn traversal_always_rejected(path in traversal_path_strategy()) {
            for policy in policies() {
                let sanitizer = PathSanitizer::new(policy);
                let result = sanitizer.sanitize(&path);
                prop_assert!(
                    matches!(&result, Err(e) if e.is_traversal()),
                    "Traversal accepted! path={}, result={:?}",
                    path,
                    result
                );
            }
        }
    }
}
