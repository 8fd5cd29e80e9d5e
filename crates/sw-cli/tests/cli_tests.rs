//! Integration tests for the stepwise binary
//!
//! Each test builds a project in a temp dir with a file-backed DuckDB
//! database so state survives between invocations.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Path to the compiled stepwise binary
fn stepwise_bin() -> String {
    env!("CARGO_BIN_EXE_stepwise").to_string()
}

/// Run a `stepwise` command in `project` and return (stdout, stderr, success).
fn run_stepwise(project: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(stepwise_bin())
        .arg("--project-dir")
        .arg(project)
        .args(args)
        .env_remove("STEPWISE_DATABASE")
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute stepwise with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

/// Project with two SQL items in the default layout.
fn sql_project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let migrations = dir.path().join("migrations");
    std::fs::create_dir_all(&migrations).unwrap();
    std::fs::write(
        migrations.join("1_create.sql"),
        "CREATE TABLE users (id INTEGER, name VARCHAR);",
    )
    .unwrap();
    std::fs::write(
        migrations.join("2_seed.sql"),
        "INSERT INTO users VALUES (1, 'ada');",
    )
    .unwrap();
    std::fs::write(migrations.join("migrate.txt"), "1_create.sql\n2_seed.sql\n").unwrap();
    dir
}

// ── Run ────────────────────────────────────────────────────────────────

#[test]
fn test_run_applies_then_is_noop() {
    let project = sql_project();

    let (stdout, stderr, ok) = run_stepwise(project.path(), &["run"]);
    assert!(ok, "first run failed: {stderr}");
    assert!(stdout.contains("Applied 2 steps; version is now 2"), "{stdout}");
    assert!(project.path().join("stepwise.duckdb").exists());

    let (stdout, stderr, ok) = run_stepwise(project.path(), &["run"]);
    assert!(ok, "second run failed: {stderr}");
    assert!(stdout.contains("Nothing to apply; version is 2"), "{stdout}");
}

#[test]
fn test_run_failure_leaves_dirty_state() {
    let project = sql_project();
    std::fs::write(
        project.path().join("migrations/2_seed.sql"),
        "INSERT INTO missing_table VALUES (1);",
    )
    .unwrap();

    let (_, stderr, ok) = run_stepwise(project.path(), &["run"]);
    assert!(!ok);
    assert!(stderr.contains("MG010"), "{stderr}");

    let (stdout, _, ok) = run_stepwise(project.path(), &["status", "-o", "json"]);
    assert!(ok);
    let status: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(status["version"], 2);
    assert_eq!(status["dirty"], true);

    let (_, stderr, ok) = run_stepwise(project.path(), &["run"]);
    assert!(!ok);
    assert!(stderr.contains("MG008"), "{stderr}");
}

#[test]
fn test_run_with_procedure_item_fails_resolution() {
    let project = sql_project();
    std::fs::write(
        project.path().join("migrations/migrate.txt"),
        "1_create.sql\nSeed\n",
    )
    .unwrap();

    let (_, stderr, ok) = run_stepwise(project.path(), &["run"]);
    assert!(!ok);
    assert!(stderr.contains("MG005"), "{stderr}");
}

// ── Status / ls ────────────────────────────────────────────────────────

#[test]
fn test_status_before_first_run() {
    let project = sql_project();

    let (stdout, stderr, ok) = run_stepwise(project.path(), &["status"]);
    assert!(ok, "{stderr}");
    assert!(stdout.contains("does not exist yet"), "{stdout}");
    assert!(stdout.contains("Pending: 2 of 2 items"), "{stdout}");
}

#[test]
fn test_ls_after_run() {
    let project = sql_project();
    run_stepwise(project.path(), &["run"]);
    std::fs::write(
        project.path().join("migrations/migrate.txt"),
        "1_create.sql\n2_seed.sql\n3_more.sql\n",
    )
    .unwrap();

    let (stdout, stderr, ok) = run_stepwise(project.path(), &["ls", "--output", "json"]);
    assert!(ok, "{stderr}");
    let rows: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(rows[0]["state"], "applied");
    assert_eq!(rows[1]["state"], "applied");
    assert_eq!(rows[2]["state"], "pending");
    assert_eq!(rows[2]["identifier"], "3_more.sql");
}

#[test]
fn test_config_file_is_honored() {
    let project = sql_project();
    std::fs::rename(
        project.path().join("migrations"),
        project.path().join("db"),
    )
    .unwrap();
    std::fs::write(
        project.path().join("stepwise.yml"),
        "migrations_dir: db\nstate_table: versions\ndatabase:\n  path: app.duckdb\n",
    )
    .unwrap();

    let (_, stderr, ok) = run_stepwise(project.path(), &["run"]);
    assert!(ok, "{stderr}");
    assert!(project.path().join("app.duckdb").exists());

    let (stdout, _, ok) = run_stepwise(project.path(), &["status", "-o", "json"]);
    assert!(ok);
    let status: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(status["state_table"], "versions");
    assert_eq!(status["version"], 2);
}

#[test]
fn test_unknown_config_key_is_rejected() {
    let project = sql_project();
    std::fs::write(project.path().join("stepwise.yml"), "migration_dir: db\n").unwrap();

    let (_, stderr, ok) = run_stepwise(project.path(), &["status"]);
    assert!(!ok);
    assert!(stderr.contains("C002"), "{stderr}");
}
