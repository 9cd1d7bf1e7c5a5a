use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn setup_test_project() -> tempfile::TempDir {
    let dir = tempdir().unwrap();

    fs::write(dir.path().join("temp.tmp"), "scratch").unwrap();
    fs::write(dir.path().join("requirements.txt"), "flask\n").unwrap();

    fs::create_dir_all(dir.path().join("__pycache__")).unwrap();
    fs::write(dir.path().join("__pycache__/module.pyc"), "bytecode").unwrap();

    dir
}

#[test]
fn test_clean_removes_artifacts_and_reports_counts() {
    let dir = setup_test_project();

    let mut cmd = Command::cargo_bin("janitor").unwrap();
    cmd.arg("clean")
        .arg("-C")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Files removed:       1"))
        .stdout(predicate::str::contains("Directories cleaned: 1"));

    assert!(!dir.path().join("temp.tmp").exists());
    assert!(!dir.path().join("__pycache__").exists());
    assert!(dir.path().join("requirements.txt").exists());
}

#[test]
fn test_clean_json_output_is_machine_readable() {
    let dir = setup_test_project();

    let mut cmd = Command::cargo_bin("janitor").unwrap();
    let output = cmd
        .arg("clean")
        .arg("--json")
        .arg("-C")
        .arg(dir.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["files_removed"], 1);
    assert_eq!(report["directories_cleaned"], 1);
}

#[test]
fn test_validate_fails_on_bare_directory() {
    let dir = tempdir().unwrap();

    let mut cmd = Command::cargo_bin("janitor").unwrap();
    cmd.arg("validate")
        .arg("-C")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("FAILED"))
        .stdout(predicate::str::contains("missing required directory"));
}

#[test]
fn test_optimize_then_validate_passes() {
    let dir = tempdir().unwrap();

    Command::cargo_bin("janitor")
        .unwrap()
        .arg("optimize")
        .arg("-C")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Directories created: 7"));

    Command::cargo_bin("janitor")
        .unwrap()
        .arg("validate")
        .arg("-C")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("PASSED"));
}
