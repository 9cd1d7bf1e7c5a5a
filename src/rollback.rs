//! Reverse replay of a session's operation log.

use anyhow::{bail, Context, Result};
use log::{error, info, warn};
use std::fs;

use crate::backup::{copy_dir, hash_file, FileBackup};
use crate::executor::{OperationKind, OperationLog};

/// Restores the backups recorded in an operation log, newest first.
pub struct RollbackManager;

impl RollbackManager {
    /// Undo every logged delete by restoring its backup and verifying the
    /// restored content against the recorded hash.
    ///
    /// Returns true only when every operation restored cleanly. Operations
    /// without a backup cannot be undone and count as failures, as do hash
    /// mismatches. A fully successful rollback drains the log, so a second
    /// call is a no-op that leaves the restored files untouched.
    pub fn rollback(log: &mut OperationLog) -> bool {
        let total = log.len();
        let mut failures = 0usize;

        for op in log.operations().iter().rev() {
            match (op.kind, &op.backup) {
                (OperationKind::Delete, Some(backup)) => {
                    if let Err(err) = restore(backup) {
                        error!(
                            "failed to restore {}: {:#}",
                            op.target_path.display(),
                            err
                        );
                        failures += 1;
                    }
                }
                (OperationKind::Delete, None) => {
                    warn!(
                        "cannot roll back {}: no backup was taken",
                        op.target_path.display()
                    );
                    failures += 1;
                }
            }
        }

        if failures == 0 {
            info!("rollback complete: {} operations restored", total);
            log.clear();
            true
        } else {
            error!("rollback finished with {} of {} failures", failures, total);
            false
        }
    }
}

fn restore(backup: &FileBackup) -> Result<()> {
    if let Some(parent) = backup.original_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to recreate {}", parent.display()))?;
    }

    if backup.backup_path.is_dir() {
        // A leftover from an earlier partial restore is replaced wholesale
        // with the backed-up content
        if backup.original_path.exists() {
            fs::remove_dir_all(&backup.original_path).with_context(|| {
                format!("failed to clear {}", backup.original_path.display())
            })?;
        }
        copy_dir(&backup.backup_path, &backup.original_path)?;
    } else {
        fs::copy(&backup.backup_path, &backup.original_path).with_context(|| {
            format!(
                "failed to restore {} to {}",
                backup.backup_path.display(),
                backup.original_path.display()
            )
        })?;

        // Restored content is verified, not assumed
        if let Some(expected) = &backup.content_hash {
            let actual = hash_file(&backup.original_path).with_context(|| {
                format!("failed to hash restored {}", backup.original_path.display())
            })?;
            if actual != *expected {
                bail!(
                    "content hash mismatch after restoring {}",
                    backup.original_path.display()
                );
            }
        }
    }

    Ok(())
}
