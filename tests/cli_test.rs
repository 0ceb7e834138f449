//! CLI integration tests for the sqlseg binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper: get a Command for the sqlseg binary.
fn sqlseg() -> Command {
    let mut cmd = Command::cargo_bin("sqlseg").expect("binary should exist");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Helper: create a temp directory with the given SQL files.
fn setup_temp_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
    }
    dir
}

// ─── Segmenting files ───

#[test]
fn test_segments_file() {
    let dir = setup_temp_dir(&[("query.sql", "select 1;\nselect 2;\n")]);
    sqlseg()
        .arg("--no-color")
        .arg(dir.path().join("query.sql"))
        .assert()
        .success()
        .stdout(predicate::str::contains("[1] lines 0-0, offsets 0-8"))
        .stdout(predicate::str::contains("[2] lines 1-1, offsets 10-18"))
        .stdout(predicate::str::contains("select 2;"))
        .stderr(predicate::str::contains("1 file(s) processed, 2 statement(s)"));
}

#[test]
fn test_segments_directory() {
    let dir = setup_temp_dir(&[
        ("a.sql", "select 1;"),
        ("nested/b.sql", "select 2; select 3;"),
        ("readme.txt", "not sql;"),
    ]);
    sqlseg()
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("2 file(s) processed, 3 statement(s)"));
}

#[test]
fn test_count_mode() {
    let dir = setup_temp_dir(&[("a.sql", "select 1; select ';'; -- x;\n")]);
    sqlseg()
        .arg("--count")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("a.sql: 3"));
}

#[test]
fn test_quiet_mode_no_summary() {
    let dir = setup_temp_dir(&[("a.sql", "select 1;")]);
    sqlseg()
        .arg("--quiet")
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_exclude_pattern() {
    let dir = setup_temp_dir(&[("a.sql", "select 1;"), ("tmp_b.sql", "select 2;")]);
    sqlseg()
        .arg("--exclude")
        .arg("tmp_*")
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("1 file(s) processed"));
}

#[test]
fn test_json_output() {
    let dir = setup_temp_dir(&[("a.sql", "select 1;\nselect 2")]);
    let output = sqlseg()
        .arg("--output")
        .arg("json")
        .arg(dir.path().join("a.sql"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let statements = &value["results"][0]["statements"];
    assert_eq!(statements.as_array().unwrap().len(), 2);
    assert_eq!(statements[1]["text"], "select 2");
    assert_eq!(statements[1]["startLine"], 1);
    assert_eq!(value["results"][0]["status"], "segmented");
}

#[test]
fn test_count_mode_json() {
    let dir = setup_temp_dir(&[("a.sql", "select 1; select 2;")]);
    let output = sqlseg()
        .args(["--count", "--output", "json"])
        .arg(dir.path().join("a.sql"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["results"][0]["statements"], 2);
    assert_eq!(value["results"][0]["status"], "segmented");
}

#[test]
fn test_stdin_mixed_with_paths_is_rejected() {
    let dir = setup_temp_dir(&[("a.sql", "select 1;")]);
    sqlseg()
        .arg(dir.path().join("a.sql"))
        .arg("-")
        .write_stdin("select 2;")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be combined"))
        .stderr(predicate::str::contains("Read error").not());
}

#[test]
fn test_missing_file_is_error() {
    let dir = TempDir::new().unwrap();
    sqlseg()
        .arg(dir.path().join("missing.sql"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Read error"));
}

// ─── Stdin ───

#[test]
fn test_stdin() {
    sqlseg()
        .arg("--no-color")
        .arg("-")
        .write_stdin("select 1; select 2;")
        .assert()
        .success()
        .stdout(predicate::str::contains("-- - [2] lines 0-0, offsets 10-18"));
}

#[test]
fn test_stdin_empty() {
    sqlseg()
        .arg("--count")
        .arg("-")
        .write_stdin("   \n")
        .assert()
        .success()
        .stdout("-: 0\n");
}

// ─── Cursor resolution ───

#[test]
fn test_line_resolves_statement() {
    sqlseg()
        .arg("--no-color")
        .arg("--line")
        .arg("1")
        .arg("-")
        .write_stdin("select 1;\nselect 2;\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("select 2;"))
        .stdout(predicate::str::contains("select 1;").not());
}

#[test]
fn test_line_between_statements_exits_one() {
    sqlseg()
        .arg("--line")
        .arg("1")
        .arg("-")
        .write_stdin("select 1;\n\nselect 2;\n")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_negative_line_single_statement() {
    sqlseg()
        .arg("--line")
        .arg("-3")
        .arg("--column")
        .arg("7")
        .arg("-")
        .write_stdin("select 1;")
        .assert()
        .success()
        .stdout(predicate::str::contains("select 1;"));
}

#[test]
fn test_offset_resolves_statement() {
    sqlseg()
        .arg("--offset")
        .arg("12")
        .arg("--output")
        .arg("json")
        .arg("-")
        .write_stdin("select 1;\nselect 2;")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"text\": \"select 2;\""));
}

#[test]
fn test_line_with_json_none() {
    sqlseg()
        .args(["--line", "1", "--output", "json", "-"])
        .write_stdin("select 1;\n\nselect 2;")
        .assert()
        .code(1)
        .stdout("null\n");
}

#[test]
fn test_cursor_needs_single_input() {
    let dir = setup_temp_dir(&[("a.sql", "select 1;"), ("b.sql", "select 2;")]);
    sqlseg()
        .arg("--line")
        .arg("0")
        .arg(dir.path().join("a.sql"))
        .arg(dir.path().join("b.sql"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("exactly one input"));
}

#[test]
fn test_line_and_offset_conflict() {
    sqlseg()
        .args(["--line", "0", "--offset", "0", "-"])
        .assert()
        .failure();
}

// ─── Configuration ───

#[test]
fn test_config_file_sets_output() {
    let dir = setup_temp_dir(&[
        ("sqlseg.toml", "output = \"json\"\n"),
        ("a.sql", "select 1;"),
    ]);
    sqlseg()
        .arg(dir.path().join("a.sql"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"startOffset\": 0"));
}

#[test]
fn test_config_found_above_nested_relative_path() {
    let dir = setup_temp_dir(&[
        ("sqlseg.toml", "output = \"json\"\n"),
        ("sub/q.sql", "select 1;"),
    ]);
    sqlseg()
        .current_dir(dir.path())
        .arg("sub/q.sql")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"startOffset\": 0"));
}

#[test]
fn test_explicit_missing_config() {
    let dir = setup_temp_dir(&[("a.sql", "select 1;")]);
    sqlseg()
        .arg("--config")
        .arg(dir.path().join("nope.toml"))
        .arg(dir.path().join("a.sql"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_unknown_config_key() {
    let dir = setup_temp_dir(&[("sqlseg.toml", "line_length = 88\n"), ("a.sql", "select 1;")]);
    sqlseg()
        .arg(dir.path().join("a.sql"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown config option"));
}

// ─── Help / version ───

#[test]
fn test_help() {
    sqlseg()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--line"));
}

#[test]
fn test_no_args_fails() {
    sqlseg().assert().failure();
}
