//! Facade composing classification, cleanup, structure work, and rollback.

use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::classifier::identify_artifacts;
use crate::config::CleanupConfig;
use crate::executor::{CleanupExecutor, CleanupReport};
use crate::rollback::RollbackManager;
use crate::structure::{StructureAnalyzer, StructureReport, ValidationReport};

/// Aggregate of one full cleanup-and-validate pass.
#[derive(Debug, Clone, Serialize)]
pub struct CleanupSummary {
    pub cleanup: CleanupReport,
    pub structure: StructureReport,
    pub validation: ValidationReport,
    /// True when cleanup hit no issues and both validations passed.
    pub overall_success: bool,
}

/// One cleanup session over one project root.
///
/// Owns the executor and with it the session operation log, so independent
/// sessions never share rollback state.
pub struct CleanupManager {
    root: PathBuf,
    executor: CleanupExecutor,
    structure: StructureAnalyzer,
}

impl CleanupManager {
    pub fn new(root: &Path, config: &CleanupConfig) -> Self {
        CleanupManager {
            root: root.to_path_buf(),
            executor: CleanupExecutor::new(root, config),
            structure: StructureAnalyzer::new(root),
        }
    }

    /// Construct a session with the compiled-in default pattern set.
    pub fn with_defaults(root: &Path) -> Result<Self> {
        Ok(Self::new(root, &CleanupConfig::load_defaults()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Classify and remove every disposable artifact under the project root.
    pub fn cleanup_artifacts(&mut self) -> Result<CleanupReport> {
        let buckets = identify_artifacts(&self.root, self.executor.matcher())?;
        Ok(self.executor.cleanup_artifacts(&buckets))
    }

    /// Create missing canonical directories and re-validate the layout.
    pub fn optimize_structure(&self) -> Result<StructureReport> {
        self.structure.optimize()
    }

    /// Check the layout against the production template without changing it.
    pub fn validate_production_readiness(&self) -> Result<ValidationReport> {
        self.structure.validate()
    }

    /// Run cleanup, structure optimization, and validation in sequence.
    pub fn generate_summary(&mut self) -> Result<CleanupSummary> {
        let cleanup = self.cleanup_artifacts()?;
        let structure = self.optimize_structure()?;
        let validation = self.validate_production_readiness()?;
        let overall_success = cleanup.issues_encountered.is_empty()
            && structure.validation_passed
            && validation.validation_passed;

        Ok(CleanupSummary {
            cleanup,
            structure,
            validation,
            overall_success,
        })
    }

    /// Undo every delete performed by this session so far.
    pub fn rollback(&mut self) -> bool {
        RollbackManager::rollback(self.executor.log_mut())
    }

    /// Number of deletions recorded in this session's log.
    pub fn operation_count(&self) -> usize {
        self.executor.log().len()
    }
}
