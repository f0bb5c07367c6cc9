use std::fs;
use std::process::Command;

use serde_json::Value;

fn readout_sim() -> Command {
    Command::new(env!("CARGO_BIN_EXE_readout-sim"))
}

fn stdout_json(command: &mut Command) -> Value {
    let output = command.output().expect("run readout-sim");
    assert!(
        output.status.success(),
        "readout-sim failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("json output")
}

const RELAXATION: [&str; 6] = [
    "--out-time-excited",
    "5e-3",
    "--out-time-ground",
    "100e-3",
    "--relax-time",
    "10",
];

const CONFIG: &str = "relaxation:
  out_time_excited: 0.005
  out_time_ground: 0.1
  relax_time: 10.0
noise:
  snr: 5.0
  sample_rate: 10000.0
  filter_cutoff: 5000.0
sweep:
  threshold_num: 101
";

#[test]
fn optimal_time_lies_between_tunnel_times() {
    let value = stdout_json(readout_sim().arg("optimal-time").args(RELAXATION));
    let t = value["readout_time"].as_f64().expect("readout_time");
    assert!(t > 5e-3 && t < 100e-3);
    assert_eq!(value["source"], "closed_form");
}

#[test]
fn compose_reports_perfect_readout() {
    let value = stdout_json(readout_sim().args([
        "compose", "--f0-stc", "1", "--f1-stc", "1", "--f0-er", "1", "--f1-er", "1",
    ]));
    assert_eq!(value["f_m"].as_f64(), Some(1.0));
}

#[test]
fn compose_help_describes_each_input() {
    let output = readout_sim()
        .args(["compose", "--help"])
        .output()
        .expect("run readout-sim");
    assert!(output.status.success());
    let help = String::from_utf8_lossy(&output.stdout);
    for line in [
        "STC fidelity of a ground-prepared qubit",
        "STC fidelity of an excited-prepared qubit",
        "stays below the threshold",
        "crosses the threshold",
    ] {
        assert!(help.contains(line), "missing {line:?} in:\n{help}");
    }
}

#[test]
fn er_full_sweep_lists_every_threshold() {
    let value = stdout_json(readout_sim().arg("er").args(RELAXATION).args([
        "--readout-time",
        "1e-3",
        "--snr",
        "5",
        "--sample-rate",
        "10e3",
        "--filter-cutoff",
        "5e3",
        "--threshold-num",
        "51",
        "--full",
    ]));
    assert_eq!(value["thresholds"].as_array().map(Vec::len), Some(51));
}

#[test]
fn invalid_cutoff_fails() {
    let output = readout_sim()
        .arg("er")
        .args(RELAXATION)
        .args([
            "--readout-time",
            "1e-3",
            "--snr",
            "5",
            "--sample-rate",
            "10e3",
            "--filter-cutoff",
            "6e3",
        ])
        .output()
        .expect("run readout-sim");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cutoff-above-nyquist"));
}

#[test]
fn benchmark_writes_report_to_out_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("readout.yaml");
    fs::write(&config, CONFIG).expect("config");
    let out = dir.path().join("run");
    let status = readout_sim()
        .arg("benchmark")
        .arg("--config")
        .arg(&config)
        .arg("--out")
        .arg(&out)
        .status()
        .expect("run readout-sim");
    assert!(status.success());
    let report: Value =
        serde_json::from_slice(&fs::read(out.join("report.json")).expect("report")).expect("json");
    assert_eq!(report["report_hash"].as_str().map(str::len), Some(64));
    assert_eq!(report["sweep"]["thresholds"].as_array().map(Vec::len), Some(101));
}

#[test]
fn scan_prints_best_index() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("readout.yaml");
    fs::write(&config, CONFIG).expect("config");
    let value = stdout_json(
        readout_sim()
            .arg("scan")
            .arg("--config")
            .arg(&config)
            .args(["--from", "1e-3", "--to", "1e-1", "--steps", "5"]),
    );
    assert_eq!(value["reports"].as_array().map(Vec::len), Some(5));
    assert!(value["best_index"].as_u64().expect("index") < 5);
}
