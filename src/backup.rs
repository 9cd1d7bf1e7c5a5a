//! Hash-verified backup copies taken before destructive deletes.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fs_extra::dir::CopyOptions;
use log::warn;
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Record of one backup copy. Never mutated after creation.
#[derive(Debug, Clone)]
pub struct FileBackup {
    pub original_path: PathBuf,
    pub backup_path: PathBuf,
    /// SHA-256 of the file content; directories carry no hash.
    pub content_hash: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Copies paths aside into a dedicated backup directory, naming each copy
/// after the original plus a timestamp and sequence number.
pub struct BackupStore {
    backup_dir: PathBuf,
    seq: u64,
}

impl BackupStore {
    pub fn new(backup_dir: PathBuf) -> Self {
        BackupStore { backup_dir, seq: 0 }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Copy `path` aside and return its backup record.
    ///
    /// Any I/O failure is logged and yields `None`; the caller must then
    /// refuse to delete the path (no backup, no delete).
    pub fn backup(&mut self, path: &Path) -> Option<FileBackup> {
        match self.try_backup(path) {
            Ok(backup) => Some(backup),
            Err(err) => {
                warn!("backup failed for {}: {:#}", path.display(), err);
                None
            }
        }
    }

    fn try_backup(&mut self, path: &Path) -> Result<FileBackup> {
        fs::create_dir_all(&self.backup_dir).with_context(|| {
            format!(
                "failed to create backup directory {}",
                self.backup_dir.display()
            )
        })?;

        let timestamp = Utc::now();
        let name = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("unnamed"));
        // The sequence number keeps same-named paths from colliding within
        // one timestamp tick
        self.seq += 1;
        let backup_name = format!("{}.{}.{}", name, timestamp.format("%Y%m%d_%H%M%S"), self.seq);
        let backup_path = self.backup_dir.join(backup_name);

        // Hash before copying so the record reflects the content that existed
        // at the moment the delete was approved
        let content_hash = if path.is_dir() {
            copy_dir(path, &backup_path)?;
            None
        } else {
            let hash = hash_file(path)
                .with_context(|| format!("failed to hash {}", path.display()))?;
            fs::copy(path, &backup_path).with_context(|| {
                format!(
                    "failed to copy {} to {}",
                    path.display(),
                    backup_path.display()
                )
            })?;
            Some(hash)
        };

        Ok(FileBackup {
            original_path: path.to_path_buf(),
            backup_path,
            content_hash,
            timestamp,
        })
    }
}

/// Stream a file through SHA-256 and return the lowercase hex digest.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Recursively copy a directory so the source lands at `dest` itself,
/// regardless of the destination's file name.
pub fn copy_dir(src: &Path, dest: &Path) -> Result<()> {
    let mut options = CopyOptions::new();
    options.copy_inside = true;
    fs_extra::dir::copy(src, dest, &options)
        .with_context(|| format!("failed to copy {} to {}", src.display(), dest.display()))?;
    Ok(())
}
