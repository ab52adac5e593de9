//! End-to-end runs of the `virtulearn` binary against a temporary store.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn virtulearn(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_virtulearn"))
        .env_remove("VIRTULEARN_DB")
        .env_remove("VIRTULEARN_LOG_DIR")
        .env_remove("VIRTULEARN_LOG_LEVEL")
        .arg("--db")
        .arg(dir.join("data").join("courses.db"))
        .arg("--log-dir")
        .arg(dir.join("logs"))
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn init_creates_store_and_log_dir() {
    let dir = TempDir::new().unwrap();

    let output = virtulearn(dir.path(), &["init"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "Database initialized.");
    assert!(dir.path().join("data").join("courses.db").exists());
    assert!(dir.path().join("logs").is_dir());
}

#[test]
fn data_persists_between_invocations() {
    let dir = TempDir::new().unwrap();

    let added = virtulearn(
        dir.path(),
        &["instructor", "add", "--name", "Ada", "--expertise", "Math"],
    );
    assert!(added.status.success(), "stderr: {}", stderr(&added));

    let listed = virtulearn(dir.path(), &["--json", "instructor", "list"]);
    assert!(listed.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&listed)).unwrap();
    assert_eq!(value[0]["name"], "Ada");
    assert_eq!(value[0]["email"], serde_json::Value::Null);
}

#[test]
fn failures_exit_with_code_and_tag() {
    let dir = TempDir::new().unwrap();

    let output = virtulearn(
        dir.path(),
        &["enrollment", "add", "--student-name", "Sam", "--course-id", "9"],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("error[not_found]: course not found: 9"));
}

#[test]
fn duplicate_name_reports_constraint_violation() {
    let dir = TempDir::new().unwrap();
    let args = ["instructor", "add", "--name", "Ada", "--expertise", "Math"];

    assert!(virtulearn(dir.path(), &args).status.success());
    let output = virtulearn(dir.path(), &args);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("error[constraint_violation]"));
}

#[test]
fn drop_with_yes_then_status_is_empty() {
    let dir = TempDir::new().unwrap();
    assert!(virtulearn(
        dir.path(),
        &["course", "add", "--title", "Calculus", "--duration", "40"],
    )
    .status
    .success());

    let dropped = virtulearn(dir.path(), &["drop", "--yes"]);
    assert!(dropped.status.success(), "stderr: {}", stderr(&dropped));

    let status = virtulearn(dir.path(), &["status"]);
    assert!(stdout(&status).contains("Courses: 0"));
}
