//! Integration tests for the eir CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const EVENTS: &str = r#"{"event":"scan_start","target":"wp-content/plugins/shop","scan_all_subroutines":false}
{"event":"vulnerability","message":"XSS: $_GET['q'] reaches echo","include_stack":["index.php","search.php"],"call_stack":[{"name":"show_results"},{"name":"main"}]}
{"event":"scan_end","elapsed_ms":42}
"#;

/// Test CLI responds to --help
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("eir").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("replay"));
}

/// Test replay writes the text report with resolved file
#[test]
fn test_replay_writes_report() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("events.jsonl"), EVENTS).unwrap();
    fs::write(
        temp_dir.path().join("functions.json"),
        r#"[{"name":"show_results","file":"search.php"}]"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("eir").unwrap();
    cmd.current_dir(temp_dir.path())
        .args([
            "replay",
            "events.jsonl",
            "--out",
            "report.txt",
            "--functions",
            "functions.json",
            "--no-config",
        ])
        .assert()
        .success();

    let report = fs::read_to_string(temp_dir.path().join("report.txt")).unwrap();
    assert!(report.contains("Target                  : wp-content/plugins/shop\n"));
    assert!(report.contains("Scanning all subroutines: No\n"));
    assert!(report.contains("|> 1\nMessage: XSS: $_GET['q'] reaches echo\n"));
    assert!(report.contains("Include stack:index.php → search.php\n"));
    assert!(report.contains(
        "Call stack: show_results → mainFunction/method: show_results\nIn file: search.php\n<|\n"
    ));
    assert!(report.contains("Time spent: 00:00:00.0420000\n"));
}

/// Test config file supplies the report and structured paths
#[test]
fn test_replay_uses_config() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("events.jsonl"), EVENTS).unwrap();
    fs::write(
        temp_dir.path().join(".eir.toml"),
        "[report]\nfile = \"from-config.txt\"\n[structured]\nfile = \"from-config.jsonl\"\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("eir").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["-q", "replay", "events.jsonl"])
        .assert()
        .success();

    assert!(temp_dir.path().join("from-config.txt").exists());
    let structured = fs::read_to_string(temp_dir.path().join("from-config.jsonl")).unwrap();
    assert_eq!(structured.lines().count(), 3);
}

/// Test malformed event stream fails with line number
#[test]
fn test_replay_rejects_bad_event() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("events.jsonl"), "not json\n").unwrap();

    let mut cmd = Command::cargo_bin("eir").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["replay", "events.jsonl", "--no-config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 1"));
}

/// Test init creates config once
#[test]
fn test_init() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("eir").unwrap();
    cmd.current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created .eir.toml"));
    assert!(temp_dir.path().join(".eir.toml").exists());

    let mut cmd = Command::cargo_bin("eir").unwrap();
    cmd.current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}
