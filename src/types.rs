//! Core types used throughout the project.

/// A supported language/region identifier for translation content.
///
/// The set of locales is fixed configuration, not discovered at runtime.
pub type Locale = String;

/// One locale's merged translation mapping.
///
/// Keys stay in merge insertion order (`serde_json` is built with
/// `preserve_order`), which the content-addressed artifact names rely on.
pub type LocaleMapping = serde_json::Map<String, serde_json::Value>;

/// Published mapping from locale to the public path of its artifact.
pub type Manifest = serde_json::Map<String, serde_json::Value>;

/// An artifact staged for the host build's own output phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedArtifact {
    /// Path relative to the host's managed output root.
    pub path: String,
    /// Serialized JSON content.
    pub content: String,
    /// Content size in bytes.
    pub size: usize,
}

impl EmittedArtifact {
    /// Create an artifact record for the given relative path.
    #[must_use]
    pub fn new(path: String, content: String) -> Self {
        let size = content.len();
        Self { path, content, size }
    }
}
