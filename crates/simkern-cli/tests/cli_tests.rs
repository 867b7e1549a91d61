//! End-to-end tests for the `simkern` binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn simkern() -> Command {
    let mut cmd = Command::cargo_bin("simkern").unwrap();
    cmd.env_remove("SIMKERN_FORCE_ISA")
        .env_remove("SIMKERN_DISABLED_ISAS")
        .env("RUST_LOG", "warn");
    cmd
}

#[test]
fn test_eval_hamming() {
    simkern()
        .args(["eval", "--metric", "hamming", "ff00", "0000"])
        .assert()
        .success()
        .stdout("8\n");
}

#[test]
fn test_eval_jaccard_empty_sets() {
    simkern()
        .args(["eval", "--metric", "jaccard", "0000", "0000"])
        .assert()
        .success()
        .stdout("0\n");
}

#[test]
fn test_eval_l2sq_with_negative_values() {
    simkern()
        .args(["eval", "--metric", "l2sq", "-1,2,3", "1,2,3"])
        .assert()
        .success()
        .stdout("4\n");
}

#[test]
fn test_eval_length_mismatch_fails() {
    simkern()
        .args(["eval", "--metric", "hamming", "ff00", "ff"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("length mismatch"));
}

#[test]
fn test_eval_unknown_metric_fails() {
    simkern()
        .args(["eval", "--metric", "manhattan", "00", "00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown metric"));
}

#[test]
fn test_caps_json() {
    let output = simkern().args(["caps", "--json"]).output().unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let available = report["available"].as_array().unwrap();
    assert_eq!(available.last().unwrap(), "serial");
    assert_eq!(report["metrics"].as_array().unwrap().len(), 5);
}

#[test]
fn test_caps_with_forced_serial_config() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "force_isa = \"serial\"").unwrap();

    let output = simkern()
        .args(["caps", "--json", "--config"])
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    for metric in report["metrics"].as_array().unwrap() {
        assert_eq!(metric["resolved"], "serial");
    }
}

#[test]
fn test_missing_config_file_fails() {
    simkern()
        .args(["caps", "--config", "/nonexistent/simkern.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_check_passes() {
    simkern()
        .args(["check", "--trials", "4", "--dims", "0,1,33,65,300"])
        .assert()
        .success()
        .stdout(predicate::str::contains("comparisons agree"));
}
