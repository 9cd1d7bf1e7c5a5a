//! Top-level directory layout scoring, validation, and normalization.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Canonical production layout, in creation order.
pub const CANONICAL_DIRS: &[&str] = &[
    "src", "config", "docs", "scripts", "tests", "data", "models",
];

/// Directories that contribute to the completeness score, with their weights.
const SCORE_WEIGHTS: &[(&str, f64)] = &[
    ("src", 0.30),
    ("config", 0.20),
    ("docs", 0.20),
    ("tests", 0.15),
    ("scripts", 0.10),
];

/// Remaining weight, earned by keeping the root tidy.
const LOOSE_FILE_WEIGHT: f64 = 0.05;
const MAX_LOOSE_FILES: usize = 5;

const PASSING_SCORE: f64 = 0.8;

/// Snapshot of the top-level layout with its completeness score.
#[derive(Debug, Clone, Serialize)]
pub struct StructureAnalysis {
    pub directories: Vec<String>,
    pub file_counts: BTreeMap<String, u64>,
    pub loose_root_files: usize,
    pub score: f64,
    pub recommendations: Vec<String>,
}

/// Pass/fail result of checking the layout against the production template.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub validation_passed: bool,
    pub overall_score: f64,
    pub structure_score: f64,
    pub components_checked: usize,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Result of normalizing the layout toward the canonical template.
#[derive(Debug, Clone, Serialize)]
pub struct StructureReport {
    pub directories_reorganized: u64,
    pub improvements: Vec<String>,
    pub validation_passed: bool,
    pub structure_score: f64,
}

/// Inspects and normalizes the top-level directory layout of one project.
pub struct StructureAnalyzer {
    root: PathBuf,
}

impl StructureAnalyzer {
    pub fn new(root: &Path) -> Self {
        StructureAnalyzer {
            root: root.to_path_buf(),
        }
    }

    /// List the top-level non-hidden directories, count their files, and
    /// compute the weighted completeness score.
    pub fn analyze(&self) -> Result<StructureAnalysis> {
        let mut directories = Vec::new();
        let mut loose_root_files = 0usize;

        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("failed to list {}", self.root.display()))?;
        for entry in entries {
            let entry = entry
                .with_context(|| format!("failed to read entry in {}", self.root.display()))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let file_type = entry
                .file_type()
                .with_context(|| format!("failed to stat {}", entry.path().display()))?;
            if file_type.is_dir() {
                directories.push(name);
            } else {
                loose_root_files += 1;
            }
        }
        directories.sort();

        let file_counts: BTreeMap<String, u64> = directories
            .iter()
            .map(|dir| (dir.clone(), count_files(&self.root.join(dir))))
            .collect();

        let score = structure_score(&directories, loose_root_files);

        let mut recommendations = Vec::new();
        for dir in CANONICAL_DIRS {
            if !directories.iter().any(|d| d == dir) {
                recommendations.push(format!("Create a {}/ directory", dir));
            }
        }
        if loose_root_files > MAX_LOOSE_FILES {
            recommendations.push(format!(
                "Move loose root files into subdirectories ({} found, {} allowed)",
                loose_root_files, MAX_LOOSE_FILES
            ));
        }

        Ok(StructureAnalysis {
            directories,
            file_counts,
            loose_root_files,
            score,
            recommendations,
        })
    }

    /// Check the layout against the production template.
    ///
    /// Fails when src, config, or docs is missing, when no tests directory
    /// exists, or when the structure score is below the passing threshold.
    pub fn validate(&self) -> Result<ValidationReport> {
        let analysis = self.analyze()?;
        let mut issues = Vec::new();

        for required in ["src", "config", "docs"] {
            if !analysis.directories.iter().any(|d| d == required) {
                issues.push(format!("missing required directory: {}/", required));
            }
        }
        if !analysis.directories.iter().any(|d| d == "tests") {
            issues.push(String::from("no test directory found"));
        }
        if analysis.score < PASSING_SCORE {
            issues.push(format!(
                "structure score {:.2} is below the {:.1} production threshold",
                analysis.score, PASSING_SCORE
            ));
        }

        let components_checked = 5;
        let overall_score = 1.0 - issues.len() as f64 / components_checked as f64;

        Ok(ValidationReport {
            validation_passed: issues.is_empty(),
            overall_score,
            structure_score: analysis.score,
            components_checked,
            issues,
            recommendations: analysis.recommendations,
        })
    }

    /// Create any missing canonical directories, then re-validate.
    /// Idempotent: a second run creates nothing further.
    pub fn optimize(&self) -> Result<StructureReport> {
        let mut improvements = Vec::new();

        for dir in CANONICAL_DIRS {
            let path = self.root.join(dir);
            if !path.exists() {
                fs::create_dir_all(&path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                improvements.push(format!("created {}/", dir));
            }
        }

        let validation = self.validate()?;

        Ok(StructureReport {
            directories_reorganized: improvements.len() as u64,
            improvements,
            validation_passed: validation.validation_passed,
            structure_score: validation.structure_score,
        })
    }
}

fn structure_score(directories: &[String], loose_root_files: usize) -> f64 {
    let mut score = 0.0;
    for (dir, weight) in SCORE_WEIGHTS {
        if directories.iter().any(|d| d == dir) {
            score += weight;
        }
    }
    if loose_root_files <= MAX_LOOSE_FILES {
        score += LOOSE_FILE_WEIGHT;
    }
    score
}

fn count_files(dir: &Path) -> u64 {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .count() as u64
}
