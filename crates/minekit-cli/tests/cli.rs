//! End-to-end tests of the `minekit` binary.
//!
//! Every test points `MINEKIT_CONFIG` at a temporary file so the user's own
//! configuration is never read or written.

use std::io::Write;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{NamedTempFile, TempDir};

// =============================================================================
// HELPERS
// =============================================================================

fn minekit(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("minekit").unwrap();
    cmd.env("MINEKIT_CONFIG", config_dir.path().join("config.json"))
        .env_remove("RUST_LOG");
    cmd
}

fn cash_flow_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "year,operating_cost,capital_cost,revenue").unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

// =============================================================================
// REGRESS / INTEGRATE / STUDY
// =============================================================================

#[test]
fn test_regress_minimal() {
    let config = TempDir::new().unwrap();

    minekit(&config)
        .args(["regress", "--x", "1,2,3", "--y", "2,4,6", "-f", "minimal"])
        .assert()
        .success()
        .stdout("2.000000 0.000000\n");
}

#[test]
fn test_regress_log_log_json() {
    let config = TempDir::new().unwrap();

    let json = stdout_json(minekit(&config).args([
        "regress",
        "--x",
        "25,50,75,100",
        "--y",
        "18,10,7,6",
        "--log-log",
        "--format",
        "json",
    ]));

    let a = json["a"].as_f64().unwrap();
    let k = json["k"].as_f64().unwrap();
    assert!((a - 0.809_592).abs() < 1e-5);
    assert!((k - 240.294_299).abs() < 1e-3);
}

#[test]
fn test_regress_requires_data() {
    let config = TempDir::new().unwrap();

    minekit(&config)
        .args(["regress"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing required argument"));
}

#[test]
fn test_integrate_benchmark() {
    let config = TempDir::new().unwrap();

    minekit(&config)
        .args(["integrate", "--function", "f1", "--rule", "trapezoidal", "-n", "10", "-f", "minimal"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("3403.529"));
}

#[test]
fn test_integrate_polynomial() {
    let config = TempDir::new().unwrap();

    // Integral of 3x^2 over [0, 2] is 8; Simpson is exact
    minekit(&config)
        .args([
            "integrate", "--function", "poly", "--coeffs", "0,0,3", "-a", "0", "-b", "2", "-n", "2",
            "-f", "minimal",
        ])
        .assert()
        .success()
        .stdout("8.000000\n");
}

#[test]
fn test_integrate_simpson_rejects_odd_count() {
    let config = TempDir::new().unwrap();

    minekit(&config)
        .args(["integrate", "--rule", "simpson", "-n", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("even number of subintervals"));
}

#[test]
fn test_study_csv() {
    let config = TempDir::new().unwrap();

    let output = minekit(&config)
        .args(["study", "--function", "f2", "--rule", "simpson", "--from", "10", "--to", "13", "-f", "csv"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("simpson,10,"));
    assert!(lines[2].starts_with("simpson,12,"));
}

#[test]
fn test_study_json() {
    let config = TempDir::new().unwrap();

    let json = stdout_json(minekit(&config).args([
        "study", "--function", "f2", "--rule", "simpson", "--from", "10", "--to", "13", "-f", "json",
    ]));

    let samples = json.as_array().unwrap();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0]["rule"], "simpson");
    assert_eq!(samples[0]["n"], 10);
    assert!(samples[1]["percent_error"].as_f64().unwrap().abs() < 1e-3);
}

// =============================================================================
// NPV / IRR
// =============================================================================

#[test]
fn test_npv_single_period() {
    let config = TempDir::new().unwrap();
    let file = cash_flow_file(&["1,-,,550"]);

    minekit(&config)
        .args(["npv", "--csv", path_arg(file.path()), "--discount", "10", "-f", "minimal"])
        .assert()
        .success()
        .stdout("500.000000\n");
}

#[test]
fn test_npv_schedule_table() {
    let config = TempDir::new().unwrap();
    let file = cash_flow_file(&["0,,1000,", "1,100,,700", "2,100,,700"]);

    minekit(&config)
        .args(["npv", "--csv", path_arg(file.path()), "--tax", "30", "--discount", "8", "--schedule"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Net Present Value"))
        .stdout(predicate::str::contains("Discounted Cash Flows"));
}

#[test]
fn test_npv_rejects_bad_cell() {
    let config = TempDir::new().unwrap();
    let file = cash_flow_file(&["0,abc,1000,"]);

    minekit(&config)
        .args(["npv", "--csv", path_arg(file.path()), "--discount", "8"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot read"));
}

#[test]
fn test_irr_json() {
    let config = TempDir::new().unwrap();
    let file = cash_flow_file(&["0,,1000,", "1,,,1100"]);

    let json = stdout_json(minekit(&config).args(["irr", "--csv", path_arg(file.path()), "-f", "json"]));

    assert_eq!(json["status"], "converged");
    assert!((json["rate"].as_f64().unwrap() - 10.0).abs() < 0.01);
}

#[test]
fn test_irr_iteration_limit_warns() {
    let config = TempDir::new().unwrap();
    let file = cash_flow_file(&["0,,1000,", "1,,,1100"]);

    minekit(&config)
        .args(["irr", "--csv", path_arg(file.path()), "--max-iterations", "1", "--tolerance", "1e-12"])
        .assert()
        .success()
        .stdout(predicate::str::contains("iteration limit reached"))
        .stderr(predicate::str::contains("did not converge"));
}

#[test]
fn test_irr_without_sign_change_fails() {
    let config = TempDir::new().unwrap();
    let file = cash_flow_file(&["1,,,100", "2,,,100"]);

    minekit(&config)
        .args(["irr", "--csv", path_arg(file.path())])
        .assert()
        .failure()
        .stderr(predicate::str::contains("iterates diverged"));
}

// =============================================================================
// PILLAR
// =============================================================================

#[test]
fn test_pillar_width() {
    let config = TempDir::new().unwrap();

    let output = minekit(&config)
        .args(["pillar", "--sizes", "25,50,75,100", "--strengths", "18,10,7,6", "-f", "minimal"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let width: f64 = String::from_utf8(output.stdout).unwrap().trim().parse().unwrap();
    assert!((width - 67.586_45).abs() < 1e-3);
}

#[test]
fn test_pillar_table_csv() {
    let config = TempDir::new().unwrap();

    minekit(&config)
        .args([
            "pillar", "--sizes", "25,50,75,100", "--strengths", "18,10,7,6", "--table", "--depths",
            "63,363", "--gallery-widths", "3,4.8", "-f", "csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Depth (m),Wg = 3 m,Wg = 4.8 m\n63,21.0298"))
        .stdout(predicate::str::contains("363,"));
}

// =============================================================================
// CONFIG
// =============================================================================

#[test]
fn test_config_set_and_get() {
    let config = TempDir::new().unwrap();

    minekit(&config).args(["config", "set", "depth", "300"]).assert().success();

    minekit(&config)
        .args(["config", "get", "depth", "-f", "minimal"])
        .assert()
        .success()
        .stdout("300\n");
    assert!(config.path().join("config.json").exists());
}

#[test]
fn test_config_rejects_unknown_key_and_bad_value() {
    let config = TempDir::new().unwrap();

    minekit(&config)
        .args(["config", "set", "currency", "USD"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));

    minekit(&config)
        .args(["config", "set", "precision", "many"])
        .assert()
        .failure();
}

#[test]
fn test_config_default_format_and_precision_apply() {
    let config = TempDir::new().unwrap();

    minekit(&config).args(["config", "set", "default_format", "minimal"]).assert().success();
    minekit(&config).args(["config", "set", "precision", "2"]).assert().success();

    minekit(&config)
        .args(["regress", "--x", "1,2,3", "--y", "2,4,6"])
        .assert()
        .success()
        .stdout("2.00 0.00\n");
}

#[test]
fn test_config_reset() {
    let config = TempDir::new().unwrap();

    minekit(&config).args(["config", "set", "depth", "300"]).assert().success();
    minekit(&config).args(["config", "reset", "depth"]).assert().success();

    minekit(&config)
        .args(["config", "get", "depth", "-f", "minimal"])
        .assert()
        .success()
        .stdout("200\n");
}

#[test]
fn test_config_reset_quiet() {
    let config = TempDir::new().unwrap();

    minekit(&config).args(["config", "set", "depth", "300"]).assert().success();
    minekit(&config)
        .args(["config", "reset", "--all", "-q"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_config_repairs_invalid_value() {
    let config = TempDir::new().unwrap();
    let path = config.path().join("config.json");
    std::fs::write(&path, r#"{"precision":"abc"}"#).unwrap();

    minekit(&config).args(["config", "path"]).assert().success();
    minekit(&config)
        .args(["regress", "--x", "1,2,3", "--y", "2,4,6", "-f", "minimal"])
        .assert()
        .success()
        .stdout("2.000000 0.000000\n")
        .stderr(predicate::str::contains("precision has an invalid value"));

    minekit(&config).args(["config", "reset", "--all"]).assert().success();
    minekit(&config)
        .args(["config", "get", "precision", "-f", "minimal"])
        .assert()
        .success()
        .stdout("6\n");
}

#[test]
fn test_config_overwrites_malformed_file() {
    let config = TempDir::new().unwrap();
    let path = config.path().join("config.json");
    std::fs::write(&path, "{not json").unwrap();

    minekit(&config)
        .args(["config", "set", "precision", "4"])
        .assert()
        .success()
        .stderr(predicate::str::contains("ignoring config file"));
    minekit(&config)
        .args(["config", "get", "precision", "-f", "minimal"])
        .assert()
        .success()
        .stdout("4\n");

    std::fs::write(&path, "{not json").unwrap();
    minekit(&config).args(["config", "reset", "--all"]).assert().success();
    let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved, serde_json::json!({}));
}
