//! lift-cli 端到端测试

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn lift_cli() -> Command {
    Command::cargo_bin("lift-cli").unwrap()
}

#[test]
fn config_show_prints_defaults() {
    lift_cli()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[elevator]"))
        .stdout(predicate::str::contains("elevator_right = 22"));
}

#[test]
fn config_check_rejects_inverted_travel() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("robot.toml");
    fs::write(&path, "[elevator]\nmin_travel_in = 40.0\n").unwrap();

    lift_cli()
        .args(["config", "check", "--file"])
        .arg(&path)
        .assert()
        .failure();
}

#[test]
fn config_check_accepts_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("robot.toml");
    fs::write(&path, "[operator]\narm_manual_deadband = 0.1\n").unwrap();

    lift_cli()
        .args(["config", "check", "--file"])
        .arg(&path)
        .assert()
        .success();
}

#[test]
fn sim_reaches_target_as_json() {
    let output = lift_cli()
        .args(["sim", "--start", "0", "--target", "20", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["at_target"], true);
    assert_eq!(report["speed"], 0.0);
    assert_eq!(report["telemetry"]["Is Elevator in Safe position?"], true);
}

#[test]
fn run_executes_script() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("script.json");
    fs::write(
        &path,
        r#"{
            "name": "down",
            "start_height": 10.0,
            "steps": [
                {"type": "set_height", "target": 5.0},
                {"type": "wait"}
            ]
        }"#,
    )
    .unwrap();

    let output = lift_cli()
        .args(["run", "--json", "--script"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["script_name"], "down");
    let height = result["report"]["height"].as_f64().unwrap();
    assert!(height > 3.2 && height < 6.8);
}

#[test]
fn run_fails_on_missing_script() {
    lift_cli()
        .args(["run", "--script", "/nonexistent/script.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("读取脚本文件失败"));
}

#[test]
fn run_honours_max_wait_ticks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("script.json");
    fs::write(
        &path,
        r#"{
            "name": "slow",
            "steps": [
                {"type": "set_height", "target": 30.0},
                {"type": "wait"}
            ]
        }"#,
    )
    .unwrap();

    lift_cli()
        .args(["run", "--max-wait-ticks", "10", "--script"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("10 个周期内未结束"));

    lift_cli()
        .args(["run", "--script"])
        .arg(&path)
        .assert()
        .success();
}

#[test]
fn sim_rejects_nan_target() {
    lift_cli()
        .args(["sim", "--target", "NaN"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("有限值"));
}
