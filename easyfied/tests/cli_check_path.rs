//! CLI tests for `easyfied check-path`.
//!
//! Spawns the binary and verifies exit codes for contained and escaping
//! candidates.

use std::process::Command;

use easyfied::exit_codes;

#[test]
fn contained_candidate_prints_resolved_path() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().canonicalize().expect("canonicalize");

    let output = Command::new(env!("CARGO_BIN_EXE_easyfied"))
        .args(["check-path", "--root"])
        .arg(&root)
        .arg("images/../a.png")
        .output()
        .expect("easyfied check-path");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), root.join("a.png").display().to_string());
}

#[test]
fn escaping_candidate_is_rejected() {
    let temp = tempfile::tempdir().expect("tempdir");

    let status = Command::new(env!("CARGO_BIN_EXE_easyfied"))
        .args(["check-path", "--root"])
        .arg(temp.path())
        .arg("../../etc/passwd")
        .status()
        .expect("easyfied check-path");

    assert_eq!(status.code(), Some(exit_codes::REJECTED));
}

#[test]
fn missing_root_is_invalid() {
    let temp = tempfile::tempdir().expect("tempdir");

    let status = Command::new(env!("CARGO_BIN_EXE_easyfied"))
        .args(["check-path", "--root"])
        .arg(temp.path().join("missing"))
        .arg("a.png")
        .status()
        .expect("easyfied check-path");

    assert_eq!(status.code(), Some(exit_codes::INVALID));
}
