// Security module for untrusted path fragments
//
// Everything that combines a trusted directory with an externally
// influenced suffix routes the suffix through `PathSanitizer` first. The
// sanitizer rejects traversal, null bytes, encoded payloads and, depending
// on the policy, absolute paths, hidden elements and unwanted extensions.

pub mod error;
pub mod policy;
pub mod sanitizer;

pub use error::SanitizeError;
pub use policy::SanitizationPolicy;
pub use sanitizer::PathSanitizer;
