//! Artifact output routing.
//!
//! Artifacts inside the host's managed output root are staged in memory so
//! the host's own output phase writes them (keeping dev-server live-reload
//! semantics); artifacts outside it are written directly to disk.

use std::collections::HashMap;
use std::fmt::Debug;
use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

use crate::types::EmittedArtifact;

/// Failure while producing artifacts. Fatal to the rebuild pass.
#[derive(Error, Debug)]
pub enum PublishError {
    /// The output directory could not be cleared or recreated.
    #[error("Failed to clear output directory {path}: {source}")]
    Clear {
        /// The output directory.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
    /// An artifact could not be written to disk.
    #[error("Failed to write artifact {path}: {source}")]
    Write {
        /// The artifact destination.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
    /// A mapping or the manifest could not be serialized.
    #[error("Failed to serialize artifact: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Receives serialized artifacts from the publisher.
pub trait ArtifactSink: Debug + Send {
    /// Publish one artifact at its absolute destination path.
    ///
    /// # Errors
    /// Fails when the artifact cannot be placed; the pass aborts.
    fn write(&mut self, path: &Path, content: String) -> Result<(), PublishError>;
}

/// Decides which sink receives an artifact.
#[derive(Debug, Clone, Default)]
pub struct PlacementPolicy {
    /// The host's managed output root, when there is one.
    output_root: Option<PathBuf>,
}

impl PlacementPolicy {
    /// Create a policy for the given managed output root.
    #[must_use]
    pub const fn new(output_root: Option<PathBuf>) -> Self {
        Self { output_root }
    }

    /// Relative staging path for artifacts under the managed output root.
    ///
    /// `None` means the artifact lives outside the managed tree and must be
    /// written directly.
    #[must_use]
    pub fn staged_path(&self, path: &Path) -> Option<String> {
        let root = self.output_root.as_ref()?;
        let relative = path.strip_prefix(root).ok()?;
        Some(relative.to_string_lossy().into_owned())
    }
}

/// In-memory sink holding artifacts for the host's emit phase.
#[derive(Debug, Default)]
pub struct StagedSink {
    /// Staged artifacts keyed by relative path.
    artifacts: HashMap<String, EmittedArtifact>,
}

impl StagedSink {
    /// Stage one artifact under its relative path.
    fn stage(&mut self, relative: String, content: String) {
        self.artifacts.insert(relative.clone(), EmittedArtifact::new(relative, content));
    }

    /// Number of artifacts currently staged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Take all staged artifacts, leaving the sink empty.
    pub fn drain(&mut self) -> HashMap<String, EmittedArtifact> {
        std::mem::take(&mut self.artifacts)
    }
}

/// Direct synchronous filesystem sink for destinations outside the managed
/// output tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectSink;

impl ArtifactSink for DirectSink {
    fn write(&mut self, path: &Path, content: String) -> Result<(), PublishError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|source| PublishError::Write { path: path.to_path_buf(), source })?;
        }
        std::fs::write(path, content)
            .map_err(|source| PublishError::Write { path: path.to_path_buf(), source })
    }
}

/// Routes each artifact to the staged or direct sink per the placement
/// policy.
#[derive(Debug, Default)]
pub struct RoutedSink {
    /// Containment rule selecting the destination sink.
    policy: PlacementPolicy,
    /// Artifacts staged for the host's emit phase.
    staged: StagedSink,
    /// Fallback direct writer.
    direct: DirectSink,
}

impl RoutedSink {
    /// Create a routed sink for the given placement policy.
    #[must_use]
    pub fn new(policy: PlacementPolicy) -> Self {
        Self { policy, staged: StagedSink::default(), direct: DirectSink }
    }

    /// View of the staged artifacts.
    #[must_use]
    pub const fn staged(&self) -> &StagedSink {
        &self.staged
    }

    /// Take all staged artifacts, leaving the staging area empty.
    pub fn drain_staged(&mut self) -> HashMap<String, EmittedArtifact> {
        self.staged.drain()
    }
}

impl ArtifactSink for RoutedSink {
    fn write(&mut self, path: &Path, content: String) -> Result<(), PublishError> {
        match self.policy.staged_path(path) {
            Some(relative) => {
                self.staged.stage(relative, content);
                Ok(())
            }
            None => self.direct.write(path, content),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    #[rstest]
    #[case(Some("/dist"), "/dist/i18n/en.dev.json", Some("i18n/en.dev.json"))]
    #[case(Some("/dist"), "/elsewhere/en.dev.json", None)]
    #[case(None, "/dist/i18n/en.dev.json", None)]
    fn test_placement_policy(
        #[case] root: Option<&str>,
        #[case] path: &str,
        #[case] expected: Option<&str>,
    ) {
        let policy = PlacementPolicy::new(root.map(PathBuf::from));

        assert_eq!(policy.staged_path(Path::new(path)).as_deref(), expected);
    }

    #[rstest]
    fn test_routed_sink_stages_inside_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_path_buf();
        let mut sink = RoutedSink::new(PlacementPolicy::new(Some(root.clone())));

        sink.write(&root.join("i18n/en.dev.json"), "{}".to_string()).unwrap();

        assert_that!(sink.staged().len(), eq(1));
        // Staged artifacts never touch the disk.
        assert_that!(root.join("i18n/en.dev.json").exists(), eq(false));
    }

    #[rstest]
    fn test_routed_sink_writes_outside_root() {
        let temp_dir = TempDir::new().unwrap();
        let managed = temp_dir.path().join("managed");
        let outside = temp_dir.path().join("outside/en.dev.json");
        let mut sink = RoutedSink::new(PlacementPolicy::new(Some(managed)));

        sink.write(&outside, r#"{"hello":"Hello"}"#.to_string()).unwrap();

        assert_that!(sink.staged().is_empty(), eq(true));
        assert_that!(
            std::fs::read_to_string(&outside).unwrap(),
            eq(r#"{"hello":"Hello"}"#)
        );
    }

    #[rstest]
    fn test_drain_clears_staged_artifacts() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_path_buf();
        let mut sink = RoutedSink::new(PlacementPolicy::new(Some(root.clone())));
        sink.write(&root.join("en.dev.json"), "{}".to_string()).unwrap();

        let drained = sink.drain_staged();

        assert_that!(drained.len(), eq(1));
        assert_that!(drained.get("en.dev.json").unwrap().size, eq(2));
        assert_that!(sink.staged().is_empty(), eq(true));
    }
}
