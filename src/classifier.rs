//! Single-pass artifact classification over a project tree.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::patterns::PatternMatcher;

/// VCS internal directories that are never traversed or classified.
const VCS_INTERNALS: &[&str] = &[".git", ".jj", ".svn", ".hg", ".bzr"];

/// The five category buckets produced by one classification pass.
///
/// Each bucket is ordered by traversal (directory entries sorted by name),
/// so repeated scans of an unchanged tree produce identical output.
#[derive(Debug, Default)]
pub struct ArtifactBuckets {
    pub temp_files: Vec<PathBuf>,
    pub cache_dirs: Vec<PathBuf>,
    pub test_artifacts: Vec<PathBuf>,
    pub build_artifacts: Vec<PathBuf>,
    pub log_files: Vec<PathBuf>,
}

impl ArtifactBuckets {
    /// All buckets with their human-readable category labels.
    pub fn categories(&self) -> [(&'static str, &[PathBuf]); 5] {
        [
            ("temp files", self.temp_files.as_slice()),
            ("cache directories", self.cache_dirs.as_slice()),
            ("test artifacts", self.test_artifacts.as_slice()),
            ("build artifacts", self.build_artifacts.as_slice()),
            ("log files", self.log_files.as_slice()),
        ]
    }

    pub fn total(&self) -> usize {
        self.categories().iter().map(|(_, paths)| paths.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Walk the tree under `root` once and bucket every disposable path.
///
/// Essential directories are not descended into. A directory matching a
/// cache or test-artifact pattern becomes a single candidate and traversal
/// is pruned there, so none of its descendants appear in any bucket. Files
/// are tested temp → build → log and take the first matching category.
///
/// A listing failure is fatal: an incomplete scan could under-report
/// artifacts or, worse, miss an essential-file protection.
pub fn identify_artifacts(root: &Path, matcher: &PatternMatcher) -> Result<ArtifactBuckets> {
    let mut buckets = ArtifactBuckets::default();
    scan_dir(root, matcher, &mut buckets)?;
    Ok(buckets)
}

fn scan_dir(dir: &Path, matcher: &PatternMatcher, buckets: &mut ArtifactBuckets) -> Result<()> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("failed to list directory {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("failed to read entries of {}", dir.display()))?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();

        // Use symlink_metadata so symlinks are recognized and skipped rather
        // than followed into their targets
        let metadata = fs::symlink_metadata(&path)
            .with_context(|| format!("failed to stat {}", path.display()))?;
        if metadata.is_symlink() {
            continue;
        }

        if metadata.is_dir() {
            let name = entry.file_name();
            let name = name.to_string_lossy();

            if VCS_INTERNALS.contains(&name.as_ref()) {
                continue;
            }
            if matcher.is_essential(&path) {
                continue;
            }
            if matcher.matches_cache_dir(&name) {
                buckets.cache_dirs.push(path);
                continue;
            }
            if matcher.matches_test_artifact_dir(&name) {
                buckets.test_artifacts.push(path);
                continue;
            }
            scan_dir(&path, matcher, buckets)?;
        } else {
            if matcher.is_essential(&path) {
                continue;
            }
            if matcher.matches_temp(&path) {
                buckets.temp_files.push(path);
            } else if matcher.is_build_artifact(&path) {
                buckets.build_artifacts.push(path);
            } else if matcher.is_log_file(&path) {
                buckets.log_files.push(path);
            }
        }
    }

    Ok(())
}
