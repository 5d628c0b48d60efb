use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
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

fn reliability_sim(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_reliability_sim"))
        .args(args)
        .output()
        .expect("run reliability_sim")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn stop_and_wait_reports_max_in_order_sequence() {
    let output = reliability_sim(&["--rtt-min", "10", "--ticks", "100", "stop-and-wait"]);
    assert!(
        output.status.success(),
        "reliability_sim failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let out = stdout(&output);
    assert!(out.contains("protocol: stop-and-wait"), "stdout={out}");
    assert!(out.contains("rtt_min: 10"), "stdout={out}");
    assert_eq!(
        out.lines().last(),
        Some("Maximum in order received sequence number 8")
    );
}

#[test]
fn too_few_ticks_prints_none() {
    let output = reliability_sim(&["--rtt-min", "10", "--ticks", "5", "aimd"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).lines().last(),
        Some("Maximum in order received sequence number None")
    );
}

#[test]
fn invalid_rtt_min_is_rejected() {
    for bad in ["1", "abc", "2.5"] {
        let output = reliability_sim(&["--rtt-min", bad, "--ticks", "10", "stop-and-wait"]);
        assert!(!output.status.success(), "rtt_min={bad} should fail");
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("RTT minimum"), "stderr={stderr}");
    }
}

#[test]
fn invalid_loss_ratio_fails_before_running() {
    let output = reliability_sim(&[
        "--rtt-min",
        "10",
        "--ticks",
        "10",
        "--loss-ratio",
        "1.5",
        "stop-and-wait",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("loss ratio"), "stderr={stderr}");
}

#[test]
fn sliding_window_writes_json_report() {
    let dir = unique_temp_dir("report");
    let report = dir.join("report.json");

    let output = reliability_sim(&[
        "--rtt-min",
        "5",
        "--ticks",
        "300",
        "--seed",
        "17",
        "--loss-ratio",
        "0.1",
        "--report-json",
        report.to_str().unwrap(),
        "sliding-window",
        "--window-size",
        "4",
    ]);
    assert!(
        output.status.success(),
        "reliability_sim failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout(&output).contains("window_size: 4"));

    let raw = fs::read_to_string(&report).expect("read report.json");
    let v: Value = serde_json::from_str(&raw).expect("parse report.json");
    assert_eq!(v["protocol"], "sliding-window");
    assert_eq!(v["config"]["seed"], 17);
    assert_eq!(v["config"]["protocol"]["window_size"], 4);
    let samples = v["samples"].as_array().expect("samples array");
    assert_eq!(samples.len(), 300);
    assert!(samples.iter().all(|s| s["inflight"].as_u64().unwrap() <= 4));

    let events = v["events"].as_array().expect("events array");
    assert_eq!(
        events
            .first()
            .and_then(|e| e.get("kind"))
            .and_then(|k| k.as_str()),
        Some("transmit")
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn print_log_renders_event_table() {
    let output = reliability_sim(&[
        "--rtt-min",
        "3",
        "--ticks",
        "8",
        "--print-log",
        "stop-and-wait",
    ]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Event Type"), "stdout={out}");
    assert!(out.contains("Sequence number: 0"), "stdout={out}");
}
