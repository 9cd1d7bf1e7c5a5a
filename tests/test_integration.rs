use janitor::{
    identify_artifacts, CleanupConfig, CleanupExecutor, CleanupManager, PatternMatcher,
};
use std::fs;
use tempfile::tempdir;

fn default_config() -> CleanupConfig {
    CleanupConfig::load_defaults().expect("failed to load embedded pattern config")
}

// Scenario: a temp file next to an essential file - only the temp file goes
#[test]
fn test_cleanup_removes_temp_and_preserves_essential() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("temp.tmp"), "scratch").unwrap();
    fs::write(dir.path().join("requirements.txt"), "flask\n").unwrap();

    let mut manager = CleanupManager::with_defaults(dir.path()).unwrap();
    let report = manager.cleanup_artifacts().unwrap();

    assert_eq!(report.files_removed, 1);
    assert_eq!(report.directories_cleaned, 0);
    assert!(!dir.path().join("temp.tmp").exists());
    assert!(dir.path().join("requirements.txt").exists());
}

// Scenario: a cache directory is one candidate, removed as a whole
#[test]
fn test_cache_directory_is_a_single_pruned_candidate() {
    let dir = tempdir().unwrap();
    let cache = dir.path().join("__pycache__");
    fs::create_dir_all(&cache).unwrap();
    fs::write(cache.join("module.bin"), "bytecode").unwrap();
    fs::write(cache.join("leftover.tmp"), "scratch").unwrap();

    let config = default_config();
    let matcher = PatternMatcher::new(dir.path(), &config);
    let buckets = identify_artifacts(dir.path(), &matcher).unwrap();

    // The directory is the only candidate; none of its contents leak into
    // other buckets
    assert_eq!(buckets.total(), 1);
    assert_eq!(buckets.cache_dirs, vec![cache.clone()]);
    assert!(buckets.temp_files.is_empty());

    let mut executor = CleanupExecutor::new(dir.path(), &config);
    let report = executor.cleanup_artifacts(&buckets);
    assert_eq!(report.directories_cleaned, 1);
    assert!(!cache.exists());
}

#[test]
fn test_essential_file_survives_matching_temp_pattern() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("keep.tmp"), "precious").unwrap();
    fs::write(dir.path().join("junk.tmp"), "scratch").unwrap();

    let mut config = default_config();
    config.preserve_essential_files.push("keep.tmp".to_string());
    let mut manager = CleanupManager::new(dir.path(), &config);
    let report = manager.cleanup_artifacts().unwrap();

    assert_eq!(report.files_removed, 1);
    assert!(dir.path().join("keep.tmp").exists());
    assert!(!dir.path().join("junk.tmp").exists());
}

#[test]
fn test_executor_refuses_essential_paths_directly() {
    let dir = tempdir().unwrap();
    let keep = dir.path().join("keep.tmp");
    fs::write(&keep, "precious").unwrap();

    let mut config = default_config();
    config.preserve_essential_files.push("keep.tmp".to_string());
    let mut executor = CleanupExecutor::new(dir.path(), &config);

    // Second line of defense: even a direct removal request is refused
    assert!(!executor.safe_remove(&keep));
    assert!(keep.exists());
    assert!(executor.log().is_empty());
}

#[test]
fn test_rollback_restores_byte_identical_content() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("junk.tmp");
    let content = b"some scratch content worth restoring".to_vec();
    fs::write(&target, &content).unwrap();

    let mut manager = CleanupManager::with_defaults(dir.path()).unwrap();
    let report = manager.cleanup_artifacts().unwrap();
    assert_eq!(report.files_removed, 1);
    assert!(!target.exists());
    assert_eq!(manager.operation_count(), 1);

    assert!(manager.rollback(), "rollback should verify and succeed");
    assert_eq!(fs::read(&target).unwrap(), content);
}

#[test]
fn test_rollback_restores_deleted_cache_directory() {
    let dir = tempdir().unwrap();
    let cache = dir.path().join("__pycache__");
    fs::create_dir_all(&cache).unwrap();
    fs::write(cache.join("module.bin"), "bytecode").unwrap();

    let mut manager = CleanupManager::with_defaults(dir.path()).unwrap();
    let report = manager.cleanup_artifacts().unwrap();
    assert_eq!(report.directories_cleaned, 1);
    assert!(!cache.exists());

    assert!(manager.rollback());
    assert_eq!(fs::read(cache.join("module.bin")).unwrap(), b"bytecode");
}

// Scenario: rollback called twice - the second call must not corrupt anything
#[test]
fn test_second_rollback_is_a_harmless_no_op() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("junk.tmp");
    fs::write(&target, "scratch").unwrap();

    let mut manager = CleanupManager::with_defaults(dir.path()).unwrap();
    manager.cleanup_artifacts().unwrap();

    assert!(manager.rollback());
    assert_eq!(manager.operation_count(), 0, "a successful rollback drains the log");
    assert!(manager.rollback(), "an empty log rolls back trivially");
    assert_eq!(fs::read_to_string(&target).unwrap(), "scratch");
}

#[test]
fn test_cleanup_is_idempotent() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("temp.tmp"), "scratch").unwrap();
    fs::write(dir.path().join("debug.log"), "log line").unwrap();
    let cache = dir.path().join("__pycache__");
    fs::create_dir_all(&cache).unwrap();
    fs::write(cache.join("module.bin"), "bytecode").unwrap();

    let mut manager = CleanupManager::with_defaults(dir.path()).unwrap();
    let first = manager.cleanup_artifacts().unwrap();
    assert_eq!(first.files_removed, 2);
    assert_eq!(first.directories_cleaned, 1);

    let second = manager.cleanup_artifacts().unwrap();
    assert_eq!(second.files_removed, 0);
    assert_eq!(second.directories_cleaned, 0);
    assert!(
        second
            .recommendations
            .iter()
            .any(|rec| rec.contains("already optimized")),
        "unexpected recommendations: {:?}",
        second.recommendations
    );
}

#[test]
fn test_failed_backup_blocks_deletion() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("junk.tmp");
    fs::write(&target, "scratch").unwrap();
    // A regular file where the backup directory should go makes every
    // backup attempt fail
    fs::write(dir.path().join("output"), "in the way").unwrap();

    let config = default_config();
    let mut executor = CleanupExecutor::new(dir.path(), &config);

    assert!(
        !executor.safe_remove(&target),
        "a path that cannot be backed up must not be deleted"
    );
    assert!(target.exists());
    assert!(executor.log().is_empty());
}

#[test]
fn test_tampered_backup_fails_rollback_verification() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("junk.tmp");
    fs::write(&target, "scratch").unwrap();

    let mut manager = CleanupManager::with_defaults(dir.path()).unwrap();
    let report = manager.cleanup_artifacts().unwrap();
    assert_eq!(report.files_removed, 1);

    // Corrupt the backup copy behind the session's back
    let backups = dir.path().join("output").join("backups");
    let backup_file = fs::read_dir(&backups)
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();
    fs::write(&backup_file, "tampered").unwrap();

    assert!(
        !manager.rollback(),
        "a hash mismatch must count as a rollback failure"
    );
    assert_ne!(
        manager.operation_count(),
        0,
        "a failed rollback must not drain the log"
    );
}

#[test]
fn test_operations_without_backups_cannot_be_rolled_back() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("junk.tmp");
    fs::write(&target, "scratch").unwrap();

    let mut config = default_config();
    config.skip_backups = true;
    let mut manager = CleanupManager::new(dir.path(), &config);
    let report = manager.cleanup_artifacts().unwrap();
    assert_eq!(report.files_removed, 1);

    assert!(!manager.rollback(), "nothing to restore from, so rollback fails");
    assert!(!target.exists());
}

#[test]
fn test_summary_aggregates_all_three_reports() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("temp.tmp"), "scratch").unwrap();

    let mut manager = CleanupManager::with_defaults(dir.path()).unwrap();
    let summary = manager.generate_summary().unwrap();

    assert_eq!(summary.cleanup.files_removed, 1);
    // optimize ran as part of the summary, so the canonical layout exists
    assert_eq!(summary.structure.directories_reorganized, 7);
    assert!(summary.validation.validation_passed);
    assert!(summary.overall_success);
}
