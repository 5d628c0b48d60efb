use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "relsim-rs-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn count_sweep_lines(stdout: &str) -> usize {
    stdout
        .lines()
        .filter(|line| line.starts_with("window_size="))
        .count()
}

#[test]
fn congestion_collapse_prints_one_line_per_window() {
    let dir = unique_temp_dir("collapse");
    let out_json = dir.join("sweep.json");

    let output = Command::new(env!("CARGO_BIN_EXE_congestion_collapse"))
        .args(["--ticks", "500", "--json", out_json.to_str().unwrap()])
        .output()
        .expect("run congestion_collapse");
    assert!(
        output.status.success(),
        "congestion_collapse failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(count_sweep_lines(&stdout), 10, "stdout={stdout}");

    let raw = fs::read_to_string(&out_json).expect("read sweep.json");
    let v: Value = serde_json::from_str(&raw).expect("parse sweep.json");
    let arr = v.as_array().expect("sweep.json must be a JSON array");
    assert_eq!(arr.len(), 10);
    assert_eq!(arr[0]["window_size"], 2);
    assert_eq!(arr[9]["window_size"], 20);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn congestion_collapse_rejects_short_sweep() {
    let output = Command::new(env!("CARGO_BIN_EXE_congestion_collapse"))
        .args(["--windows", "1,2,3"])
        .output()
        .expect("run congestion_collapse");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("at least 10"), "stderr={stderr}");
}

#[test]
fn timeout_sim_prints_ewma_checkpoints() {
    let output = Command::new(env!("CARGO_BIN_EXE_timeout_sim"))
        .args(["short-spike", "-a", "0.125", "-b", "0.25"])
        .output()
        .expect("run timeout_sim");
    assert!(
        output.status.success(),
        "timeout_sim failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Scenario: short-spike"), "stdout={stdout}");
    assert!(stdout.contains("EWMA at step 35:"), "stdout={stdout}");
    assert!(stdout.contains("EWMA at step 90:"), "stdout={stdout}");
    assert!(stdout.contains("ACKs ignored: 2"), "stdout={stdout}");
}

#[test]
fn timeout_sim_rejects_unknown_scenario() {
    let output = Command::new(env!("CARGO_BIN_EXE_timeout_sim"))
        .args(["spiky", "-a", "0.1", "-b", "0.2"])
        .output()
        .expect("run timeout_sim");
    assert!(!output.status.success());
}

#[test]
fn congestion_collapse_validates_overrides() {
    let output = Command::new(env!("CARGO_BIN_EXE_congestion_collapse"))
        .args(["--ticks", "50", "--loss-ratio", "2"])
        .output()
        .expect("run congestion_collapse");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("loss ratio"), "stderr={stderr}");
}

#[test]
fn congestion_collapse_lossy_preset_sweeps_wide_windows() {
    let dir = unique_temp_dir("collapse-lossy");
    let out_json = dir.join("sweep.json");

    let output = Command::new(env!("CARGO_BIN_EXE_congestion_collapse"))
        .args(["--lossy", "--ticks", "300", "--json", out_json.to_str().unwrap()])
        .output()
        .expect("run congestion_collapse");
    assert!(
        output.status.success(),
        "congestion_collapse failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(count_sweep_lines(&stdout), 10, "stdout={stdout}");

    let raw = fs::read_to_string(&out_json).expect("read sweep.json");
    let v: Value = serde_json::from_str(&raw).expect("parse sweep.json");
    let arr = v.as_array().expect("sweep.json must be a JSON array");
    assert_eq!(arr[9]["window_size"], 120);

    let _ = fs::remove_dir_all(&dir);
}
