//! Fragment file discovery.

use std::fmt::Debug;
use std::path::PathBuf;

use globset::{
    Glob,
    GlobSetBuilder,
};
use ignore::WalkBuilder;
use thiserror::Error;

/// Discovery failure. Fatal to the rebuild pass.
#[derive(Error, Debug)]
pub enum DiscoverError {
    /// One of the configured entry patterns is not a valid glob.
    #[error("Invalid entry pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// The underlying glob error.
        message: String,
    },
    /// The pattern set could not be assembled.
    #[error("Failed to build entry patterns: {0}")]
    Build(String),
}

/// Lists fragment files matching the configured entry patterns.
pub trait FileLister: Debug + Send + Sync {
    /// Returns matching files in lexicographic path order.
    ///
    /// # Errors
    /// Fails when a pattern is invalid; the whole pass aborts in that case.
    fn list(&self, patterns: &[String]) -> Result<Vec<PathBuf>, DiscoverError>;
}

/// Default lister walking a root directory and matching entry globs against
/// paths relative to it.
#[derive(Debug, Clone)]
pub struct GlobLister {
    /// Directory the entry patterns are matched against.
    root: PathBuf,
}

impl GlobLister {
    /// Create a lister rooted at `root`.
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl FileLister for GlobLister {
    fn list(&self, patterns: &[String]) -> Result<Vec<PathBuf>, DiscoverError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| DiscoverError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            builder.add(glob);
        }
        let entry_set = builder.build().map_err(|e| DiscoverError::Build(e.to_string()))?;

        let mut found_files = Vec::new();
        for result in WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .build()
        {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(?err, "Failed to read directory entry");
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();

            let Ok(relative_path) = path.strip_prefix(&self.root) else {
                continue;
            };
            if !entry_set.is_match(relative_path) {
                continue;
            }

            found_files.push(path.to_path_buf());
        }

        // Walk order depends on the filesystem; merge diagnostics must not.
        found_files.sort();

        Ok(found_files)
    }
}
