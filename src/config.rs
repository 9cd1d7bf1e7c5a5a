//! Cleanup configuration and embedded defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

// Embed the default pattern config directly in the binary at compile time
const DEFAULT_CONFIG_TOML: &str = include_str!("../artifacts.toml");

/// Configuration for one cleanup session.
///
/// Pattern lists use glob-like strings: `*.ext` matches a file-name suffix,
/// a bare name matches exactly, and a trailing slash marks a directory
/// pattern. Essential entries may also be project-relative paths.
#[derive(Debug, Clone, Deserialize)]
pub struct CleanupConfig {
    pub temp_file_patterns: Vec<String>,
    pub cache_dir_patterns: Vec<String>,
    pub test_artifact_dirs: Vec<String>,
    pub build_artifact_suffixes: Vec<String>,
    pub log_file_suffixes: Vec<String>,
    /// Allow-list of paths that must never be deleted.
    pub preserve_essential_files: Vec<String>,
    /// Where backups land, resolved against the project root when relative.
    #[serde(default = "default_backup_dir")]
    pub backup_dir: PathBuf,
    /// Opt-in escape hatch: delete without taking backups first.
    /// Without it, a path that cannot be backed up is never deleted.
    #[serde(default)]
    pub skip_backups: bool,
}

fn default_backup_dir() -> PathBuf {
    PathBuf::from("output").join("backups")
}

impl CleanupConfig {
    /// Load the compiled-in default pattern set.
    pub fn load_defaults() -> Result<Self> {
        toml::from_str(DEFAULT_CONFIG_TOML).context("failed to parse embedded artifacts.toml")
    }

    /// Parse a user-supplied config document.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("failed to parse cleanup config")
    }

    /// Read and parse a config file from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&text)
    }
}
