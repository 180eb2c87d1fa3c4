//! End-to-end tests for the `arbor` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn arbor() -> Command {
    let mut cmd = Command::cargo_bin("arbor").unwrap();
    cmd.env_remove("ARBOR_CONFIG").env_remove("ARBOR_LOG");
    cmd
}

const SINGLE_STEP: &[&str] = &[
    "--spot", "100", "--strike", "100", "--expiration", "1", "--steps", "1", "--rate", "0.05",
    "--vol", "0.2",
];

#[test]
fn single_step_call_price() {
    arbor()
        .args(["price", "--format", "minimal"])
        .args(SINGLE_STEP)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("12.162"));
}

#[test]
fn price_json_carries_root_greeks() {
    let output = arbor()
        .args(["price", "--format", "json"])
        .args(SINGLE_STEP)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["steps"], 1);
    assert_eq!(json["style"], "European");
    let delta = json["delta"].as_f64().unwrap();
    assert!((delta - 0.5498).abs() < 1e-3, "delta {delta}");
    assert_eq!(json["theta"].as_f64().unwrap(), 0.0);
}

#[test]
fn report_has_all_sections() {
    arbor()
        .args(["report", "--side", "put", "--style", "asian", "--payoff", "floating"])
        .args(["--spot", "50", "--strike-ratio", "1.05", "--underlying", "BMW"])
        .args(["--steps", "3", "--vol", "0.2,0.25,0.3"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Calculated Option Price"))
        .stdout(predicate::str::contains("Payoff Type          : Floating"))
        .stdout(predicate::str::contains("Volatilities         : [0.200, 0.250, 0.300]"))
        .stdout(predicate::str::contains("Vega                 : []"));
}

#[test]
fn invalid_models_fail() {
    arbor()
        .args(["price", "--spot", "100", "--strike", "100", "--steps", "0"])
        .assert()
        .failure();

    arbor()
        .args(["price", "--spot", "100", "--strike", "100", "--steps", "3"])
        .args(["--rate", "0.01,0.02"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("comma-separated"));
}

#[test]
fn asian_requires_payoff() {
    arbor()
        .args(["price", "--spot", "100", "--strike", "100", "--style", "asian"])
        .assert()
        .failure();
}

#[test]
fn strict_arbitrage_failure_and_lenient_recovery() {
    let args = [
        "price", "--spot", "100", "--strike", "100", "--steps", "2", "--rate", "0.9", "--vol",
        "0.05",
    ];
    arbor().args(args).assert().failure();
    arbor()
        .args(args)
        .args(["--lenient", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ProbabilityOutOfRange"));
}

#[test]
fn saved_contract_and_model_reprice_identically() {
    let dir = tempfile::tempdir().unwrap();
    let contract = dir.path().join("contract.json");
    let model = dir.path().join("model.json");

    let first = arbor()
        .args(["price", "--format", "minimal", "--style", "american", "--side", "put"])
        .args(["--spot", "100", "--strike", "110", "--steps", "4", "--vol", "0.3"])
        .arg("--save-contract")
        .arg(&contract)
        .arg("--save-model")
        .arg(&model)
        .output()
        .unwrap();
    assert!(first.status.success());
    assert!(std::fs::read_to_string(&model).unwrap().contains(r#""dt": -1.0"#));

    let second = arbor()
        .args(["price", "--format", "minimal"])
        .arg("--contract")
        .arg(&contract)
        .arg("--model")
        .arg(&model)
        .output()
        .unwrap();
    assert!(second.status.success());
    assert_eq!(first.stdout, second.stdout);

    arbor()
        .arg("list")
        .arg(dir.path())
        .args(["--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("contract.json,contract"))
        .stdout(predicate::str::contains("model.json,model"));
}

#[test]
fn tree_exports() {
    arbor()
        .args(["tree", "--format", "json"])
        .args(SINGLE_STEP)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"factors\""))
        .stdout(predicate::str::contains("\"strike\": 100.0"));

    arbor()
        .args(["tree", "--kind", "values"])
        .args(SINGLE_STEP)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("12.162 -> 22.140"))
        .stdout(predicate::str::contains("          0.000"));
}

#[test]
fn model_command_binds_and_saves() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bound.json");

    arbor()
        .args(["model", "--steps", "2", "--rate", "0.05", "--vol", "0.2", "--expiration", "1"])
        .arg("--save")
        .arg(&path)
        .args(["--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"dt\": 0.5"));

    assert!(path.exists());
}

#[test]
fn config_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("arbor.toml");

    arbor()
        .args(["config", "init"])
        .arg(&path)
        .assert()
        .success();
    arbor()
        .args(["config", "init"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    arbor()
        .args(["config", "validate"])
        .arg(&path)
        .assert()
        .success();

    arbor()
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[engine]"))
        .stdout(predicate::str::contains("max_steps = 20"));
}

#[test]
fn config_defaults_drive_the_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("arbor.toml");
    std::fs::write(&path, "[model]\nsteps = 1\nrate = 0.05\nvolatility = 0.2\n").unwrap();

    arbor()
        .arg("--config")
        .arg(&path)
        .args(["price", "--format", "minimal", "--spot", "100", "--strike", "100"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("12.162"));

    std::fs::write(&path, "[engine]\nmax_steps = 30\n").unwrap();
    arbor()
        .args(["config", "validate"])
        .arg(&path)
        .assert()
        .failure();
}
