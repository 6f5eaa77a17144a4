//! Integration tests for the swatchextract CLI
//!
//! Exercises argument parsing, the fatal missing-input path, and
//! taxonomy file handling by spawning the real binary.

use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

/// Test helper to get the CLI binary path
fn get_cli_path() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    if path.ends_with("deps") {
        path.pop(); // Remove "deps" directory
    }
    path.push("swatchextract");
    #[cfg(windows)]
    path.set_extension("exe");
    path
}

fn run_cli_command(args: &[&str]) -> std::process::Output {
    Command::new(get_cli_path())
        .args(args)
        .output()
        .expect("failed to spawn swatchextract")
}

#[test]
fn test_cli_help() {
    let output = run_cli_command(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("extract"));
    assert!(stdout.contains("detect"));
}

#[test]
fn test_cli_extract_help_lists_thresholds() {
    let output = run_cli_command(&["extract", "--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--min-side"));
    assert!(stdout.contains("--proximity"));
    assert!(stdout.contains("--taxonomy"));
}

#[test]
fn test_cli_missing_input_exits_nonzero() {
    let temp_dir = tempdir().unwrap();
    let missing = temp_dir.path().join("brochure.pdf");
    let output = run_cli_command(&["extract", missing.to_str().unwrap()]);

    assert!(!output.status.success(), "missing input must be fatal");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("not found"),
        "expected a diagnostic, got: {stderr}"
    );
    // No partial output
    assert!(!temp_dir.path().join("swatches").exists());
}

#[test]
fn test_cli_rejects_malformed_taxonomy() {
    let temp_dir = tempdir().unwrap();
    let taxonomy_path = temp_dir.path().join("taxonomy.json");
    std::fs::write(&taxonomy_path, b"[not json").unwrap();
    let input = temp_dir.path().join("brochure.pdf");
    std::fs::write(&input, b"%PDF-1.7\n%%EOF").unwrap();

    let output = run_cli_command(&[
        "extract",
        input.to_str().unwrap(),
        "--taxonomy",
        taxonomy_path.to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("taxonomy"));
}

#[test]
fn test_cli_missing_subcommand_fails() {
    let output = run_cli_command(&[]);
    assert!(!output.status.success());
}
