//! Janitor - Reversible Project-Artifact Cleanup
//!
//! Janitor scans a project tree, classifies files and directories against
//! known artifact patterns (from artifacts.toml), and deletes what matches
//! while an explicit allow-list of essential files is never touched. Every
//! deletion is preceded by a hash-verified backup and recorded in an
//! append-only operation log, so an entire cleanup session can be rolled
//! back and the restored content verified rather than assumed.
//!
//! ## Architecture
//!
//! - Pattern matching (suffix / exact-name / directory patterns) feeds a
//!   single classification pass that prunes traversal into matched
//!   cache and test-artifact directories
//! - Backup-then-delete: a path that cannot be backed up is never deleted
//!   unless backups are explicitly disabled
//! - Rollback replays the session log in reverse and compares SHA-256
//!   digests of restored files against the pre-delete hashes
//! - A separate structure analyzer scores the top-level layout against a
//!   canonical production template and can create missing directories

pub mod backup;
pub mod classifier;
pub mod config;
pub mod executor;
pub mod manager;
pub mod patterns;
pub mod rollback;
pub mod structure;

// Re-export commonly used items
pub use backup::{BackupStore, FileBackup};
pub use classifier::{identify_artifacts, ArtifactBuckets};
pub use config::CleanupConfig;
pub use executor::{
    CleanupExecutor, CleanupOperation, CleanupReport, OperationKind, OperationLog,
};
pub use manager::{CleanupManager, CleanupSummary};
pub use patterns::{PatternKind, PatternMatcher};
pub use rollback::RollbackManager;
pub use structure::{
    StructureAnalysis, StructureAnalyzer, StructureReport, ValidationReport, CANONICAL_DIRS,
};
