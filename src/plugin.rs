//! Host lifecycle wiring.
//!
//! The plugin reacts to two signals from the host build: "inputs may have
//! changed" (`on_make`) and "outputs are being finalized" (`on_emit`). The
//! host serializes both within one build session, and both take `&mut self`,
//! so rebuild passes never overlap.

use std::collections::{
    BTreeSet,
    HashMap,
    HashSet,
};
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::config::{
    ConfigError,
    PluginConfig,
};
use crate::detect::{
    ChangeDetector,
    TimestampSnapshot,
};
use crate::diagnostics::{
    DiagnosticsSink,
    TracingDiagnostics,
};
use crate::discover::{
    DiscoverError,
    FileLister,
    GlobLister,
};
use crate::merge::{
    FragmentMerger,
    LocaleClassifier,
    PathSegmentClassifier,
};
use crate::publish::{
    ArtifactPublisher,
    PlacementPolicy,
    PublishError,
    RoutedSink,
    StagedSink,
};
use crate::types::EmittedArtifact;

/// Fatal failure of one rebuild pass.
#[derive(Error, Debug)]
pub enum PassError {
    /// Fragment discovery failed; nothing was merged or published.
    #[error(transparent)]
    Discover(#[from] DiscoverError),
    /// Publishing failed after a successful merge.
    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// The merge-and-publish engine, wired to the host build's lifecycle.
#[derive(Debug)]
pub struct I18nBundlePlugin {
    /// Settings supplied at construction.
    config: PluginConfig,
    /// Advisory diagnostics output.
    diagnostics: Arc<dyn DiagnosticsSink>,
    /// Assigns fragment files to locales.
    classifier: Box<dyn LocaleClassifier>,
    /// Discovers fragment files for the entry patterns.
    lister: Box<dyn FileLister>,
    /// Decides whether a pass must re-merge.
    detector: ChangeDetector,
    /// Routes artifacts to staging or directly to disk.
    sink: RoutedSink,
    /// Files read by the most recent successful merge.
    dependencies: BTreeSet<PathBuf>,
}

impl I18nBundlePlugin {
    /// Create a plugin with the default collaborators.
    ///
    /// # Errors
    /// Fails when the configuration does not validate; this surfaces to the
    /// host build as a hard failure.
    pub fn new(config: PluginConfig) -> Result<Self, ConfigError> {
        config.validate().map_err(ConfigError::ValidationErrors)?;

        let classifier = Box::new(PathSegmentClassifier::new(config.locales.clone()));
        let lister = Box::new(GlobLister::new(config.root.clone()));
        let sink = RoutedSink::new(PlacementPolicy::new(config.output_root.clone()));

        Ok(Self {
            diagnostics: Arc::new(TracingDiagnostics),
            classifier,
            lister,
            detector: ChangeDetector::new(),
            sink,
            dependencies: BTreeSet::new(),
            config,
        })
    }

    /// Replace the diagnostics sink.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Replace the locale classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: Box<dyn LocaleClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Replace the file lister.
    #[must_use]
    pub fn with_lister(mut self, lister: Box<dyn FileLister>) -> Self {
        self.lister = lister;
        self
    }

    /// Files read by the most recent successful merge.
    #[must_use]
    pub const fn dependencies(&self) -> &BTreeSet<PathBuf> {
        &self.dependencies
    }

    /// Artifacts staged for the host's emit phase.
    #[must_use]
    pub const fn staged_artifacts(&self) -> &StagedSink {
        self.sink.staged()
    }

    /// Host "make" hook: re-merge and publish when watched inputs changed.
    ///
    /// `timestamps` is the host's file-change map for this pass. When the
    /// detector sees no relevant change the pass completes immediately.
    /// Zero discovered fragments aborts the pass with a warning, leaving the
    /// previous artifacts and dependency set as the last-known-good state.
    ///
    /// # Errors
    /// Discovery and publish failures are fatal to the pass and propagate.
    pub async fn on_make(&mut self, timestamps: &TimestampSnapshot) -> Result<(), PassError> {
        if !self.detector.should_rebuild(timestamps, &self.dependencies) {
            tracing::debug!("inputs unchanged, skipping rebuild");
            return Ok(());
        }

        let files = self.lister.list(&self.config.entry)?;
        if files.is_empty() {
            self.diagnostics.warn(&format!(
                "no valid entry files found for {} -- aborting",
                self.config.entry.join(", ")
            ));
            return Ok(());
        }

        tracing::debug!(files = files.len(), "rebuilding locale bundles");
        let merger =
            FragmentMerger::new(&self.config, self.classifier.as_ref(), self.diagnostics.as_ref());
        let outcome = merger.merge(&files).await;

        let manifest =
            ArtifactPublisher::new(&self.config).publish(&outcome.mappings, &mut self.sink)?;
        self.dependencies = outcome.dependencies;

        tracing::debug!(
            locales = manifest.len(),
            dependencies = self.dependencies.len(),
            "rebuild pass finished"
        );
        Ok(())
    }

    /// Host "emit" hook: report dependencies and hand over staged artifacts.
    ///
    /// The dependency union is additive: entries for files that vanished
    /// since an earlier pass are never removed from the host's view. Staged
    /// artifacts are moved into the host's table and the staging area is
    /// cleared.
    pub fn on_emit(
        &mut self,
        host_dependencies: &mut HashSet<PathBuf>,
        host_assets: &mut HashMap<String, EmittedArtifact>,
    ) {
        host_dependencies.extend(self.dependencies.iter().cloned());

        for (path, artifact) in self.sink.drain_staged() {
            host_assets.insert(path, artifact);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use googletest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::config::BuildMode;
    use crate::test_utils::{
        RecordingDiagnostics,
        test_config,
    };

    fn write_fragment(dir: &TempDir, relative: &str, content: &str) -> PathBuf {
        let path = dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn plugin_with_diagnostics(
        dir: &TempDir,
        mode: BuildMode,
    ) -> (I18nBundlePlugin, Arc<RecordingDiagnostics>) {
        let diagnostics = Arc::new(RecordingDiagnostics::new());
        let plugin = I18nBundlePlugin::new(test_config(dir.path(), mode))
            .unwrap()
            .with_diagnostics(diagnostics.clone());
        (plugin, diagnostics)
    }

    #[rstest]
    fn test_new_rejects_invalid_config() {
        let config = PluginConfig { entry: vec![], ..PluginConfig::default() };

        let result = I18nBundlePlugin::new(config);

        assert_that!(result, err(anything()));
    }

    #[tokio::test]
    async fn test_cold_start_publishes_artifacts() {
        let temp_dir = TempDir::new().unwrap();
        write_fragment(&temp_dir, "app/en.i18n.json", r#"{"hello": "Hello"}"#);
        write_fragment(&temp_dir, "app/zh_cn.i18n.json", r#"{"hello": "你好"}"#);
        let (mut plugin, _) = plugin_with_diagnostics(&temp_dir, BuildMode::Development);

        plugin.on_make(&TimestampSnapshot::new()).await.unwrap();

        let output_dir = temp_dir.path().join("dist/i18n");
        assert_that!(output_dir.join("en.dev.json").exists(), eq(true));
        assert_that!(output_dir.join("zh_cn.dev.json").exists(), eq(true));
        assert_that!(output_dir.join("manifest.json").exists(), eq(true));
        assert_that!(plugin.dependencies().len(), eq(2));
    }

    #[tokio::test]
    async fn test_zero_fragments_warns_and_skips_publish() {
        let temp_dir = TempDir::new().unwrap();
        let (mut plugin, diagnostics) = plugin_with_diagnostics(&temp_dir, BuildMode::Development);

        plugin.on_make(&TimestampSnapshot::new()).await.unwrap();

        let warnings = diagnostics.warnings();
        assert_that!(warnings.len(), eq(1));
        assert_that!(warnings[0], contains_substring("no valid entry files found"));
        assert_that!(temp_dir.path().join("dist/i18n").exists(), eq(false));
        assert_that!(plugin.dependencies().len(), eq(0));
    }

    #[tokio::test]
    async fn test_unchanged_inputs_skip_rebuild() {
        let temp_dir = TempDir::new().unwrap();
        let fragment = write_fragment(&temp_dir, "app/en.i18n.json", r#"{"hello": "Hello"}"#);
        let (mut plugin, _) = plugin_with_diagnostics(&temp_dir, BuildMode::Development);

        let timestamps =
            TimestampSnapshot::from([(fragment, std::time::SystemTime::UNIX_EPOCH)]);
        plugin.on_make(&timestamps).await.unwrap();

        // Remove the published artifacts; a skipped pass must not recreate them.
        fs::remove_dir_all(temp_dir.path().join("dist/i18n")).unwrap();
        plugin.on_make(&timestamps).await.unwrap();

        assert_that!(temp_dir.path().join("dist/i18n").exists(), eq(false));
    }

    #[tokio::test]
    async fn test_on_emit_reports_dependencies_additively() {
        let temp_dir = TempDir::new().unwrap();
        write_fragment(&temp_dir, "app/en.i18n.json", r#"{"hello": "Hello"}"#);
        let (mut plugin, _) = plugin_with_diagnostics(&temp_dir, BuildMode::Development);
        plugin.on_make(&TimestampSnapshot::new()).await.unwrap();

        let stale = PathBuf::from("/stale/fragment.i18n.json");
        let mut host_dependencies = HashSet::from([stale.clone()]);
        let mut host_assets = HashMap::new();
        plugin.on_emit(&mut host_dependencies, &mut host_assets);

        // Stale entries stay; the current dependency is added.
        assert_that!(host_dependencies.contains(&stale), eq(true));
        assert_that!(host_dependencies.len(), eq(2));
    }

    #[tokio::test]
    async fn test_staged_artifacts_flow_to_host_and_clear() {
        let temp_dir = TempDir::new().unwrap();
        write_fragment(&temp_dir, "app/en.i18n.json", r#"{"hello": "Hello"}"#);
        let mut config = test_config(temp_dir.path(), BuildMode::Development);
        config.output_root = Some(temp_dir.path().join("dist"));
        let mut plugin = I18nBundlePlugin::new(config).unwrap();

        plugin.on_make(&TimestampSnapshot::new()).await.unwrap();
        assert_that!(plugin.staged_artifacts().len(), eq(3));
        // Routed into staging: the host writes these, not the plugin.
        assert_that!(temp_dir.path().join("dist/i18n/en.dev.json").exists(), eq(false));

        let mut host_dependencies = HashSet::new();
        let mut host_assets = HashMap::new();
        plugin.on_emit(&mut host_dependencies, &mut host_assets);

        assert_that!(host_assets.len(), eq(3));
        assert_that!(host_assets.contains_key("i18n/en.dev.json"), eq(true));
        assert_that!(host_assets.contains_key("i18n/manifest.json"), eq(true));
        assert_that!(plugin.staged_artifacts().is_empty(), eq(true));
    }
}
