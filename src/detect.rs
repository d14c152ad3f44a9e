//! Incremental rebuild decision based on file timestamp deltas.

use std::collections::{
    BTreeSet,
    HashMap,
};
use std::path::PathBuf;
use std::time::SystemTime;

/// Last-known modification times, keyed by file path.
///
/// Supplied by the host on every "make" phase; the detector keeps the
/// previous snapshot across passes to compute deltas.
pub type TimestampSnapshot = HashMap<PathBuf, SystemTime>;

/// Decides whether a rebuild pass is needed.
#[derive(Debug)]
pub struct ChangeDetector {
    /// Timestamps observed on the previous invocation.
    previous: TimestampSnapshot,
    /// Fallback timestamp for files never seen before.
    start_time: SystemTime,
}

impl ChangeDetector {
    /// Create a detector anchored at the current process time.
    #[must_use]
    pub fn new() -> Self {
        Self { previous: TimestampSnapshot::new(), start_time: SystemTime::now() }
    }

    /// Returns `true` when the pass must re-merge.
    ///
    /// A file counts as changed when its current timestamp is strictly newer
    /// than its previous one; a missing previous timestamp falls back to the
    /// process start time and a missing current timestamp counts as
    /// infinitely new, so newly appeared and newly removed files are both
    /// changes.
    ///
    /// The rebuild rules, in order:
    /// - no successful merge has declared dependencies yet → rebuild
    ///   (cold start, or every prior pass aborted before publishing);
    /// - the host supplied an empty timestamp map → rebuild (no baseline);
    /// - otherwise rebuild iff at least one changed file is a declared
    ///   dependency, so unrelated churn elsewhere in the host build is
    ///   ignored.
    ///
    /// The retained snapshot is replaced by `current` as a side effect.
    pub fn should_rebuild(
        &mut self,
        current: &TimestampSnapshot,
        dependencies: &BTreeSet<PathBuf>,
    ) -> bool {
        let changed = self.changed_files(current);
        self.previous = current.clone();

        if dependencies.is_empty() {
            tracing::debug!("no known dependencies, rebuilding");
            return true;
        }
        if current.is_empty() {
            tracing::debug!("no timestamps supplied, rebuilding");
            return true;
        }

        let rebuild = changed.iter().any(|path| dependencies.contains(path));
        tracing::debug!(changed = changed.len(), rebuild, "change detection finished");
        rebuild
    }

    /// Files whose effective timestamp advanced since the previous snapshot,
    /// computed over the union of both snapshots' keys.
    fn changed_files(&self, current: &TimestampSnapshot) -> Vec<PathBuf> {
        let mut observed: BTreeSet<&PathBuf> = self.previous.keys().collect();
        observed.extend(current.keys());

        observed
            .into_iter()
            .filter(|path| {
                let previous = self.previous.get(*path).copied().unwrap_or(self.start_time);
                // A file absent from the current snapshot is infinitely new.
                current.get(*path).is_none_or(|timestamp| *timestamp > previous)
            })
            .cloned()
            .collect()
    }
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self::new()
    }
}
