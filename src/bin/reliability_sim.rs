//! 可靠性仿真
//!
//! 单主机、单链路、单路径：选择一种发送端协议，运行指定 tick 数，
//! 输出最大按序确认序号。链路容量固定为每 tick 1 个报文。

use clap::{Parser, Subcommand};
use relsim_rs::proto::rto::{DEFAULT_MAX_TIMEOUT, DEFAULT_MIN_TIMEOUT};
use relsim_rs::sim::{
    parse_rtt_min, ProtocolConfig, SimConfig, TimeoutConfig, DEFAULT_QUEUE_LIMIT,
};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "reliability-sim",
    about = "可靠传输仿真：停等 / 滑动窗口 / AIMD（链路容量固定为 1 包/tick）"
)]
struct Args {
    /// 最小往返时延（tick），至少为 2
    #[arg(long, value_parser = parse_rtt_min)]
    rtt_min: u64,

    /// 运行的 tick 数
    #[arg(long)]
    ticks: u64,

    /// 随机丢包的种子；不填则随机选取
    #[arg(long)]
    seed: Option<u64>,

    /// 独立同分布的丢包概率
    #[arg(long, default_value_t = 0.0)]
    loss_ratio: f64,

    /// 链路队列上限（报文数），默认 1M，相当于无限
    #[arg(long, default_value_t = DEFAULT_QUEUE_LIMIT)]
    queue_limit: usize,

    /// 超时估计器的下界（tick）
    #[arg(long, default_value_t = DEFAULT_MIN_TIMEOUT)]
    min_timeout: u64,

    /// 超时估计器的上界（tick）
    #[arg(long, default_value_t = DEFAULT_MAX_TIMEOUT)]
    max_timeout: u64,

    /// 运行结束后打印事件日志表格
    #[arg(long, default_value_t = false)]
    print_log: bool,

    /// 输出 JSON 报告（配置、统计、逐 tick 采样与事件）；不填则不生成
    #[arg(long)]
    report_json: Option<PathBuf>,

    #[command(subcommand)]
    protocol: ProtocolCmd,
}

#[derive(Debug, Subcommand)]
enum ProtocolCmd {
    /// 停等协议
    StopAndWait,
    /// 固定窗口的滑动窗口协议
    SlidingWindow {
        /// 窗口大小（报文数）
        #[arg(long)]
        window_size: usize,
    },
    /// AIMD 拥塞控制
    Aimd,
}

impl From<&ProtocolCmd> for ProtocolConfig {
    fn from(cmd: &ProtocolCmd) -> Self {
        match cmd {
            ProtocolCmd::StopAndWait => ProtocolConfig::StopAndWait,
            ProtocolCmd::SlidingWindow { window_size } => ProtocolConfig::SlidingWindow {
                window_size: *window_size,
            },
            ProtocolCmd::Aimd => ProtocolConfig::Aimd,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();

    let cfg = SimConfig {
        rtt_min: args.rtt_min,
        ticks: args.ticks,
        seed: args.seed.unwrap_or_else(rand::random),
        loss_ratio: args.loss_ratio,
        queue_limit: args.queue_limit,
        timeout: TimeoutConfig {
            min_timeout: Some(args.min_timeout),
            max_timeout: Some(args.max_timeout),
            ..TimeoutConfig::default()
        },
        protocol: ProtocolConfig::from(&args.protocol),
    };

    println!("protocol: {}", cfg.protocol.name());
    println!("rtt_min: {}", cfg.rtt_min);
    println!("ticks: {}", cfg.ticks);
    println!("seed: {}", cfg.seed);
    println!("loss_ratio: {}", cfg.loss_ratio);
    println!("queue_limit: {}", cfg.queue_limit);
    println!("min_timeout: {}", args.min_timeout);
    println!("max_timeout: {}", args.max_timeout);
    if let ProtocolConfig::SlidingWindow { window_size } = cfg.protocol {
        println!("window_size: {window_size}");
    }

    let mut sim = match cfg.build_simulator() {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = sim.run(cfg.ticks) {
        eprintln!("simulation failed: {e}");
        return ExitCode::FAILURE;
    }

    if args.print_log && !sim.context().log().is_empty() {
        println!();
        print!("{}", sim.context().log().render_table());
        println!();
    }

    if let Some(path) = args.report_json {
        let report = sim.report(&cfg);
        let json = match serde_json::to_string_pretty(&report) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("serialize report: {e}");
                return ExitCode::FAILURE;
            }
        };
        if let Err(e) = fs::write(&path, json) {
            eprintln!("write {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
        eprintln!("wrote run report to {}", path.display());
    }

    let max = sim
        .max_in_order_received_sequence_number()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "None".to_string());
    println!("Maximum in order received sequence number {max}");
    ExitCode::SUCCESS
}
