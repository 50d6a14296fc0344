//! CLI integration tests for memstack
//!
//! Tests the command-line interface: help/version output, the init
//! scaffolding, and config validation. These shell out through cargo so
//! they exercise the real binary.

use std::fs;
use std::process::Command;
use tempfile::TempDir;

/// Helper to run memstack with arguments
fn run_memstack(args: &[&str], working_dir: Option<&str>) -> std::process::Output {
    let mut cmd = Command::new("cargo");
    cmd.arg("run").arg("--quiet").arg("--").args(args);

    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }

    cmd.output().expect("Failed to execute command")
}

// =============================================================================
// Help and Version
// =============================================================================

#[test]
fn test_help_command() {
    let output = run_memstack(&["--help"], None);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("memstack"));
    assert!(stdout.contains("Usage") || stdout.contains("USAGE"));
    assert!(stdout.contains("init"));
    assert!(stdout.contains("status"));
    assert!(stdout.contains("memory"));
}

#[test]
fn test_version_command() {
    let output = run_memstack(&["--version"], None);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("memstack"));
}

#[test]
fn test_memory_help_lists_operations() {
    let output = run_memstack(&["memory", "--help"], None);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("add"));
    assert!(stdout.contains("search"));
    assert!(stdout.contains("list"));
    assert!(stdout.contains("delete-all"));
}

// =============================================================================
// Init Scaffolding
// =============================================================================

#[test]
fn test_init_scaffolds_stack_files() {
    let dir = TempDir::new().unwrap();
    let dir_path = dir.path().to_str().unwrap();

    let output = run_memstack(&["--no-color", "init", dir_path], None);
    assert!(output.status.success());

    assert!(dir.path().join("memstack.toml").exists());
    assert!(dir.path().join("docker-compose.yml").exists());
    assert!(dir.path().join(".env.example").exists());

    let compose = fs::read_to_string(dir.path().join("docker-compose.yml")).unwrap();
    assert!(compose.contains("\"8001:8000\""));
    assert!(compose.contains("\"7687:7687\""));
    assert!(compose.contains("\"15432:5432\""));
}

#[test]
fn test_init_twice_without_force_keeps_files() {
    let dir = TempDir::new().unwrap();
    let dir_path = dir.path().to_str().unwrap();

    run_memstack(&["--no-color", "init", dir_path], None);
    fs::write(dir.path().join("memstack.toml"), "# edited by hand\n").unwrap();

    let output = run_memstack(&["--no-color", "init", dir_path], None);
    assert!(output.status.success());

    let contents = fs::read_to_string(dir.path().join("memstack.toml")).unwrap();
    assert!(contents.contains("edited by hand"));
}

// =============================================================================
// Config
// =============================================================================

#[test]
fn test_config_validate_on_scaffolded_stack() {
    let dir = TempDir::new().unwrap();
    let dir_path = dir.path().to_str().unwrap();

    run_memstack(&["--no-color", "init", dir_path], None);

    let config_path = dir.path().join("memstack.toml");
    let output = run_memstack(
        &[
            "--no-color",
            "--config",
            config_path.to_str().unwrap(),
            "config",
            "--validate",
        ],
        None,
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("valid"));
}

#[test]
fn test_config_show_redacts_secrets() {
    let dir = TempDir::new().unwrap();
    let dir_path = dir.path().to_str().unwrap();

    run_memstack(&["--no-color", "init", dir_path], None);

    let config_path = dir.path().join("memstack.toml");
    let output = run_memstack(
        &[
            "--no-color",
            "--config",
            config_path.to_str().unwrap(),
            "config",
        ],
        None,
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("<redacted>"));
    assert!(!stdout.contains("mem0graph"));
}

#[test]
fn test_missing_config_file_fails() {
    let output = run_memstack(
        &["--no-color", "--config", "/nonexistent/memstack.toml", "config"],
        None,
    );
    assert!(!output.status.success());
}
