//! Deletion with mandatory backups and the append-only session operation log.

use chrono::{DateTime, Utc};
use log::{error, warn};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::backup::{BackupStore, FileBackup};
use crate::classifier::ArtifactBuckets;
use crate::config::CleanupConfig;
use crate::patterns::PatternMatcher;

const MB: u64 = 1024 * 1024;

/// What a logged operation did. Only deletes exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Delete,
}

/// One reversible action taken during a cleanup session.
#[derive(Debug, Clone)]
pub struct CleanupOperation {
    pub kind: OperationKind,
    pub target_path: PathBuf,
    /// Absent when backups were skipped; such operations cannot be rolled back.
    pub backup: Option<FileBackup>,
    pub timestamp: DateTime<Utc>,
}

/// Append-only record of one session's destructive actions.
///
/// Owned by a single cleanup session and replayed in reverse by rollback;
/// never shared across sessions.
#[derive(Debug, Default)]
pub struct OperationLog {
    ops: Vec<CleanupOperation>,
}

impl OperationLog {
    pub fn append(&mut self, op: CleanupOperation) {
        self.ops.push(op);
    }

    pub fn operations(&self) -> &[CleanupOperation] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Drop all entries. Called after a fully successful rollback so the log
    /// cannot be replayed a second time.
    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

/// Aggregate result of one cleanup pass. Immutable once produced.
#[derive(Debug, Clone, Serialize)]
pub struct CleanupReport {
    pub files_removed: u64,
    pub directories_cleaned: u64,
    pub space_freed_bytes: u64,
    pub duration_secs: f64,
    pub issues_encountered: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Executes approved deletions, backing each path up first and recording
/// every delete in the session operation log.
pub struct CleanupExecutor {
    matcher: PatternMatcher,
    backups: BackupStore,
    log: OperationLog,
    skip_backups: bool,
}

impl CleanupExecutor {
    pub fn new(root: &Path, config: &CleanupConfig) -> Self {
        let backup_dir = if config.backup_dir.is_absolute() {
            config.backup_dir.clone()
        } else {
            root.join(&config.backup_dir)
        };
        CleanupExecutor {
            matcher: PatternMatcher::new(root, config),
            backups: BackupStore::new(backup_dir),
            log: OperationLog::default(),
            skip_backups: config.skip_backups,
        }
    }

    pub fn matcher(&self) -> &PatternMatcher {
        &self.matcher
    }

    pub fn log(&self) -> &OperationLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut OperationLog {
        &mut self.log
    }

    /// Backup-then-delete a single path.
    ///
    /// The essential check here is the second of two independent checks; the
    /// classifier already filters protected paths, and this one catches
    /// anything handed to the executor directly. Refusals and failures
    /// return false and append nothing to the log.
    pub fn safe_remove(&mut self, path: &Path) -> bool {
        if self.matcher.is_essential(path) {
            warn!("refusing to remove essential path {}", path.display());
            return false;
        }

        let backup = if self.skip_backups {
            None
        } else {
            match self.backups.backup(path) {
                Some(backup) => Some(backup),
                // No backup means no delete
                None => {
                    warn!("skipping {}: backup could not be taken", path.display());
                    return false;
                }
            }
        };

        let removal = if path.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };
        if let Err(err) = removal {
            error!("failed to remove {}: {}", path.display(), err);
            return false;
        }

        self.log.append(CleanupOperation {
            kind: OperationKind::Delete,
            target_path: path.to_path_buf(),
            backup,
            timestamp: Utc::now(),
        });
        true
    }

    /// Remove every classified artifact and report what happened.
    ///
    /// Per-path failures are collected into the report rather than raised;
    /// a failure on one path never aborts the rest of the batch.
    pub fn cleanup_artifacts(&mut self, buckets: &ArtifactBuckets) -> CleanupReport {
        let started = Instant::now();
        let mut files_removed = 0u64;
        let mut directories_cleaned = 0u64;
        let mut space_freed = 0u64;
        let mut issues = Vec::new();

        for (label, paths) in buckets.categories() {
            let matcher = &self.matcher;
            let (safe, protected): (Vec<&PathBuf>, Vec<&PathBuf>) =
                paths.iter().partition(|p| !matcher.is_essential(p.as_path()));

            // The classifier should never emit essential candidates; finding
            // any here points at a misconfigured pattern list
            if !protected.is_empty() {
                issues.push(format!(
                    "skipped {} essential files in {}",
                    protected.len(),
                    label
                ));
            }

            for path in safe {
                let was_dir = path.is_dir();
                let size = path_size(path);
                if self.safe_remove(path) {
                    if was_dir {
                        directories_cleaned += 1;
                    } else {
                        files_removed += 1;
                    }
                    space_freed += size;
                } else {
                    issues.push(format!("failed to remove {}", path.display()));
                }
            }
        }

        let removed = files_removed + directories_cleaned;
        let recommendations =
            recommendations_for(buckets.total(), removed, space_freed, issues.len());

        CleanupReport {
            files_removed,
            directories_cleaned,
            space_freed_bytes: space_freed,
            duration_secs: started.elapsed().as_secs_f64(),
            issues_encountered: issues,
            recommendations,
        }
    }
}

fn recommendations_for(
    candidates: usize,
    removed: u64,
    space_freed: u64,
    issue_count: usize,
) -> Vec<String> {
    let mut recs = Vec::new();

    if candidates == 0 {
        recs.push(String::from(
            "Project is already optimized - no cleanup artifacts found",
        ));
    } else if space_freed > 100 * MB {
        recs.push(String::from(
            "Significant space was freed - consider running cleanup regularly",
        ));
    } else if space_freed < 10 * MB {
        recs.push(String::from(
            "Low artifact volume - the project is well maintained",
        ));
    }

    if issue_count > 0 {
        recs.push(format!(
            "Review {} issues encountered during cleanup",
            issue_count
        ));
    }
    if removed > 50 {
        recs.push(String::from(
            "High artifact count - consider more frequent cleanup runs",
        ));
    }

    recs
}

/// Size of a path as it sits on disk right now; errors count as zero since
/// this only feeds the space-freed counter.
fn path_size(path: &Path) -> u64 {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_file() => meta.len(),
        Ok(meta) if meta.is_dir() => dir_size(path),
        _ => 0,
    }
}

fn dir_size(path: &Path) -> u64 {
    let mut total = 0u64;

    if let Ok(entries) = fs::read_dir(path) {
        for entry in entries.flatten() {
            let entry_path = entry.path();

            // symlink_metadata so symlink targets are neither followed nor counted
            if let Ok(metadata) = fs::symlink_metadata(&entry_path) {
                if metadata.is_file() {
                    total += metadata.len();
                } else if metadata.is_dir() {
                    total += dir_size(&entry_path);
                }
            }
        }
    }

    total
}
