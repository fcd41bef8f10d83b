//! CLI integration tests for `hierlog-verify`.

mod test_utils;

use assert_cmd::Command;
use predicates::prelude::*;
use rstest::rstest;
use tempfile::TempDir;
use test_utils::fixtures::witness;

fn verify() -> Command {
    Command::cargo_bin("hierlog-verify").expect("binary is built")
}

#[rstest]
#[case("simple")]
#[case("ttcc")]
fn scenario_matches_checked_in_witness(#[case] layout: &str) {
    verify()
        .args(["--layout", layout, "--witness"])
        .arg(witness(layout))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ok: "));
}

#[test]
fn output_and_filtered_files_are_kept_when_requested() {
    let dir = TempDir::new().expect("tempdir");
    let output = dir.path().join("raw.log");
    let filtered = dir.path().join("filtered.log");

    verify()
        .args(["--layout", "simple", "--witness"])
        .arg(witness("simple"))
        .arg("--output")
        .arg(&output)
        .arg("--filtered")
        .arg(&filtered)
        .assert()
        .success();

    let raw = std::fs::read_to_string(&output).expect("raw output written");
    assert!(raw.contains("\tat hierlog::scenario::run_minimum(src"));
    let normalised = std::fs::read_to_string(&filtered).expect("filtered output written");
    let expected = std::fs::read_to_string(witness("simple")).expect("witness");
    assert_eq!(normalised, expected);
}

#[test]
fn mismatch_exits_with_one_and_prints_diff() {
    let dir = TempDir::new().expect("tempdir");
    let wrong = dir.path().join("wrong");
    let mut text = std::fs::read_to_string(witness("simple")).expect("witness");
    text = text.replacen("Message 5", "Message five", 1);
    std::fs::write(&wrong, text).expect("write witness");

    verify()
        .args(["--layout", "simple", "--witness"])
        .arg(&wrong)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("line 6:"))
        .stdout(predicate::str::contains("expected: INFO - Message five"))
        .stdout(predicate::str::contains("actual:   INFO - Message 5"));
}

#[test]
fn wrong_layout_does_not_match() {
    verify()
        .args(["--layout", "ttcc", "--witness"])
        .arg(witness("simple"))
        .assert()
        .code(1);
}

#[test]
fn json_report_is_machine_readable() {
    let output = verify()
        .args(["--layout", "simple", "--format", "json", "--witness"])
        .arg(witness("simple"))
        .output()
        .expect("runs");
    assert!(output.status.success());
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(report["mismatches"], serde_json::json!([]));
    assert_eq!(report["expected_lines"], 27);
}

#[test]
fn record_writes_a_fresh_witness() {
    let dir = TempDir::new().expect("tempdir");
    let recorded = dir.path().join("nested").join("ttcc");

    verify()
        .args(["--layout", "ttcc", "--record", "--witness"])
        .arg(&recorded)
        .assert()
        .success()
        .stdout(predicate::str::contains("recorded 27 lines"));

    assert_eq!(
        std::fs::read_to_string(&recorded).expect("recorded"),
        std::fs::read_to_string(witness("ttcc")).expect("witness")
    );
    verify()
        .args(["--layout", "ttcc", "--witness"])
        .arg(&recorded)
        .assert()
        .success();
}

#[test]
fn missing_witness_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    verify()
        .args(["--layout", "simple", "--witness"])
        .arg(dir.path().join("absent"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn unknown_layout_is_rejected_by_argument_parser() {
    verify()
        .args(["--layout", "xml", "--witness", "w"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'xml'"));
}
