//! Locale classification for discovered fragment files.

use std::fmt::Debug;
use std::path::Path;

use crate::types::Locale;

/// Assigns a discovered fragment file to at most one configured locale.
///
/// Contract: for a given path the result is deterministic, and zero or one
/// locale is returned even when several locale identifiers occur in the
/// path. A `None` result excludes the file from merging.
pub trait LocaleClassifier: Debug + Send + Sync {
    /// Classify `path`, returning the owning locale if any.
    fn classify(&self, path: &Path) -> Option<Locale>;
}

/// Default classifier matching locale identifiers against path segments.
///
/// The path is split on `/` and `.` and scanned from the end, so
/// `locales/en.json`, `app/en/common.json` and `menu.en.i18n.json` all
/// classify as `en`. Matching is case-insensitive with `-` and `_` treated
/// as equivalent. When several segments name a locale, the last one wins.
///
/// # Examples
/// - `app/en.i18n.json` → `en`
/// - `app/zh_cn/menu.i18n.json` → `zh_cn`
/// - `app/colors.i18n.json` → no locale
#[derive(Debug, Clone)]
pub struct PathSegmentClassifier {
    /// Configured locales, checked in order for each segment.
    locales: Vec<Locale>,
}

impl PathSegmentClassifier {
    /// Create a classifier over the configured locale set.
    #[must_use]
    pub fn new(locales: Vec<Locale>) -> Self {
        Self { locales }
    }
}

/// Normalize a segment for comparison (lowercase, `-` as `_`).
fn normalize(segment: &str) -> String {
    segment.to_lowercase().replace('-', "_")
}

impl LocaleClassifier for PathSegmentClassifier {
    fn classify(&self, path: &Path) -> Option<Locale> {
        let path_str = path.to_string_lossy();
        let parts: Vec<&str> = path_str.split(['/', '.']).collect();

        for part in parts.iter().rev() {
            let normalized = normalize(part);
            if let Some(locale) = self.locales.iter().find(|locale| normalize(locale) == normalized)
            {
                return Some(locale.clone());
            }
        }

        None
    }
}
