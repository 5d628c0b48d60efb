//! EWMA 超时估计实验：何时判定消息超时并重试？

use clap::Parser;
use relsim_rs::sim::rtt_scenario::{run_timeout_experiment, RttScenario, DEFAULT_SCENARIO_SEED};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "timeout-sim", about = "EWMA 超时估计器在合成 RTT 序列上的表现")]
struct Args {
    /// short-spike | long-spike | permanent-change | high-variance
    #[arg(default_value = "high-variance")]
    scenario: RttScenario,

    /// 均值的 EWMA 系数
    #[arg(short, long)]
    alpha: f64,

    /// 偏差的 EWMA 系数
    #[arg(short, long)]
    beta: f64,

    /// 超时取均值之上多少倍偏差
    #[arg(short = 'k', long = "standard-deviations-for-timeout", default_value_t = 3.0)]
    k: f64,

    /// high-variance 场景的随机种子
    #[arg(long, default_value_t = DEFAULT_SCENARIO_SEED)]
    seed: u64,

    /// 输出逐步结果 JSON；不填则不生成
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let rtts = args.scenario.rtts(args.seed);
    let samples = run_timeout_experiment(&rtts, args.alpha, args.beta, args.k);

    println!("Scenario: {}", args.scenario);
    println!("Alpha: {}", args.alpha);
    println!("Beta: {}", args.beta);
    for step in [35, 90] {
        if let Some(s) = samples.get(step) {
            println!("EWMA at step {step}: {}", s.mean_estimate);
        }
    }
    let ignored = samples.iter().filter(|s| s.ack_ignored).count();
    let extra: f64 = samples.iter().filter_map(|s| s.extra_wait).sum();
    println!("ACKs ignored: {ignored}");
    println!("Total extra wait: {extra}");

    if let Some(path) = args.json {
        let json = match serde_json::to_string_pretty(&samples) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("serialize samples: {e}");
                return ExitCode::FAILURE;
            }
        };
        if let Err(e) = fs::write(&path, json) {
            eprintln!("write {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
        eprintln!("wrote samples to {}", path.display());
    }
    ExitCode::SUCCESS
}
