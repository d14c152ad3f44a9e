//! Fragment loading and per-locale merging.

use std::collections::{
    BTreeSet,
    HashMap,
};
use std::path::{
    Path,
    PathBuf,
};

use crate::config::PluginConfig;
use crate::diagnostics::DiagnosticsSink;
use crate::merge::classifier::LocaleClassifier;
use crate::merge::keyset;
use crate::types::{
    Locale,
    LocaleMapping,
};

/// Result of one merge pass.
///
/// `mappings` holds one entry per configured locale, possibly empty, built
/// from scratch on every pass. `dependencies` is the set of every file whose
/// read was attempted, reported to the host so it can trigger future
/// rebuilds on change.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    /// Merged translation mapping per configured locale.
    pub mappings: HashMap<Locale, LocaleMapping>,
    /// All fragment paths read during this pass.
    pub dependencies: BTreeSet<PathBuf>,
}

/// Loads, validates and merges fragment files into one mapping per locale.
#[derive(Debug)]
pub struct FragmentMerger<'a> {
    /// Plugin settings (locales, reference locale, mode).
    config: &'a PluginConfig,
    /// Assigns each fragment file to its owning locale.
    classifier: &'a dyn LocaleClassifier,
    /// Receives duplicate-key, missing-key and parse diagnostics.
    diagnostics: &'a dyn DiagnosticsSink,
}

impl<'a> FragmentMerger<'a> {
    /// Create a merger over the given configuration and collaborators.
    #[must_use]
    pub const fn new(
        config: &'a PluginConfig,
        classifier: &'a dyn LocaleClassifier,
        diagnostics: &'a dyn DiagnosticsSink,
    ) -> Self {
        Self { config, classifier, diagnostics }
    }

    /// Merge the discovered fragment files into fresh per-locale mappings.
    ///
    /// Files are read concurrently but merged in lexicographic path order,
    /// so diagnostics and last-write-wins results do not depend on read
    /// completion order. Per-file failures are reported and skipped; the
    /// pass itself always completes.
    pub async fn merge(&self, fragment_paths: &[PathBuf]) -> MergeOutcome {
        let mut paths: Vec<PathBuf> = fragment_paths.to_vec();
        paths.sort();

        let contents =
            futures::future::join_all(paths.iter().map(tokio::fs::read_to_string)).await;

        let mut mappings: HashMap<Locale, LocaleMapping> = self
            .config
            .locales
            .iter()
            .map(|locale| (locale.clone(), LocaleMapping::new()))
            .collect();
        let mut dependencies = BTreeSet::new();

        for (path, content) in paths.iter().zip(contents) {
            // The read attempt counts as a dependency even when the file is
            // later rejected or belongs to no locale.
            dependencies.insert(path.clone());
            self.merge_file(path, content, &mut mappings);
        }

        if self.config.mode.is_development() {
            self.check_missing_keys(&mappings);
        }

        MergeOutcome { mappings, dependencies }
    }

    /// Merge a single fragment into its locale accumulator.
    fn merge_file(
        &self,
        path: &Path,
        content: std::io::Result<String>,
        mappings: &mut HashMap<Locale, LocaleMapping>,
    ) {
        let parsed =
            content.map_err(|e| e.to_string()).and_then(|text| parse_fragment(&text));
        let fragment = match parsed {
            Ok(fragment) => fragment,
            Err(reason) => {
                tracing::debug!(path = %path.display(), reason, "fragment rejected");
                self.diagnostics.error(&format!("invalid json file {}", path.display()));
                return;
            }
        };

        let Some(locale) = self.classifier.classify(path) else {
            tracing::debug!(path = %path.display(), "no locale matched, skipping");
            return;
        };
        let Some(accumulator) = mappings.get_mut(&locale) else {
            return;
        };

        let duplicates = keyset::intersection(accumulator, &fragment);
        if !duplicates.is_empty() {
            self.diagnostics.warn(&format!(
                "{} has translation key duplicates: {}",
                path.display(),
                duplicates.join(", ")
            ));
        }

        // Last write wins, in deterministic path order.
        for (key, value) in fragment {
            accumulator.insert(key, value);
        }
    }

    /// Warn about keys the reference locale has that another locale lacks.
    fn check_missing_keys(&self, mappings: &HashMap<Locale, LocaleMapping>) {
        let Some(reference) = mappings.get(&self.config.reference_locale) else {
            return;
        };

        for locale in &self.config.locales {
            if locale == &self.config.reference_locale {
                continue;
            }
            let Some(mapping) = mappings.get(locale) else {
                continue;
            };
            let missing = keyset::difference(mapping, reference);
            if !missing.is_empty() {
                self.diagnostics.warn(&format!(
                    "{locale} has translation key missing: {}",
                    missing.join(", ")
                ));
            }
        }
    }
}

/// Parse fragment text as a flat string-keyed JSON object with string values.
fn parse_fragment(text: &str) -> Result<LocaleMapping, String> {
    let fragment: LocaleMapping = serde_json::from_str(text).map_err(|e| e.to_string())?;

    if let Some((key, _)) = fragment.iter().find(|(_, value)| !value.is_string()) {
        return Err(format!("value for '{key}' is not a string"));
    }

    Ok(fragment)
}
