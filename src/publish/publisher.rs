//! Artifact serialization, naming and manifest assembly.

use std::collections::HashMap;
use std::path::Path;

use crate::config::PluginConfig;
use crate::hash::content_hash;
use crate::publish::sink::{
    ArtifactSink,
    PublishError,
};
use crate::types::{
    Locale,
    LocaleMapping,
    Manifest,
};

/// Name of the published manifest file.
const MANIFEST_FILE: &str = "manifest.json";

/// Serializes per-locale mappings and the manifest through a sink.
#[derive(Debug)]
pub struct ArtifactPublisher<'a> {
    /// Plugin settings (locales, paths, mode).
    config: &'a PluginConfig,
}

impl<'a> ArtifactPublisher<'a> {
    /// Create a publisher over the given configuration.
    #[must_use]
    pub const fn new(config: &'a PluginConfig) -> Self {
        Self { config }
    }

    /// Publish one artifact per configured locale plus the manifest.
    ///
    /// Mappings serialize in insertion order; the artifact basename is
    /// `<locale>.dev.json` in development mode and `<locale>.<hash6>.json`
    /// otherwise, so byte-identical content always publishes under the same
    /// name. The manifest records `<manifestBase>/<basename>` per locale —
    /// the public path, independent of where the file physically lands.
    ///
    /// # Errors
    /// Fails when the output directory cannot be cleared or an artifact
    /// cannot be placed.
    pub fn publish(
        &self,
        mappings: &HashMap<Locale, LocaleMapping>,
        sink: &mut dyn ArtifactSink,
    ) -> Result<Manifest, PublishError> {
        clear_output_dir(&self.config.output_dir)?;

        let empty = LocaleMapping::new();
        let mut manifest = Manifest::new();
        for locale in &self.config.locales {
            let mapping = mappings.get(locale).unwrap_or(&empty);
            let content = serde_json::to_string(mapping)?;
            let basename = self.basename(locale, &content);

            manifest.insert(
                locale.clone(),
                serde_json::Value::String(format!("{}/{basename}", self.config.manifest_base)),
            );
            sink.write(&self.config.output_dir.join(&basename), content)?;
        }

        let manifest_content = serde_json::to_string(&manifest)?;
        sink.write(&self.config.output_dir.join(MANIFEST_FILE), manifest_content)?;

        tracing::debug!(locales = manifest.len(), "published locale artifacts and manifest");
        Ok(manifest)
    }

    /// Artifact basename for one locale's serialized content.
    fn basename(&self, locale: &str, content: &str) -> String {
        if self.config.mode.is_development() {
            format!("{locale}.dev.json")
        } else {
            format!("{locale}.{}.json", content_hash(content.as_bytes()))
        }
    }
}

/// Empty the output directory so artifacts of renamed or removed locales
/// never linger from earlier builds.
fn clear_output_dir(dir: &Path) -> Result<(), PublishError> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)
            .map_err(|source| PublishError::Clear { path: dir.to_path_buf(), source })?;
    }
    std::fs::create_dir_all(dir)
        .map_err(|source| PublishError::Clear { path: dir.to_path_buf(), source })
}
