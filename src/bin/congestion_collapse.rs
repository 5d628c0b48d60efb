//! 拥塞崩溃实验
//!
//! 逐个增大滑动窗口，打印每个窗口的吞吐；吞吐先升后降即为拥塞崩溃。

use clap::Parser;
use relsim_rs::sim::sweep::{
    collapse_base_config, congestion_collapse_sweep, default_windows, lossy_collapse_config,
    validate_windows, wide_windows,
};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "congestion-collapse",
    about = "滑动窗口拥塞崩溃扫描（rtt_min=10，超时不截断；默认无丢包，--lossy 为有损有限队列）"
)]
struct Args {
    /// 窗口大小序列（逗号分隔，至少 10 个且非递减）；默认 2,4,...,20
    #[arg(long, value_delimiter = ',')]
    windows: Option<Vec<usize>>,

    /// 有损预设：5% 丢包、队列 20、超时 = 均值 + 1 倍偏差，窗口默认 2..120
    #[arg(long, default_value_t = false)]
    lossy: bool,

    /// 每个窗口运行的 tick 数
    #[arg(long)]
    ticks: Option<u64>,

    /// 随机丢包概率（默认 0）
    #[arg(long)]
    loss_ratio: Option<f64>,

    /// 链路队列上限（报文数）
    #[arg(long)]
    queue_limit: Option<usize>,

    /// 随机丢包的种子
    #[arg(long)]
    seed: Option<u64>,

    /// 输出 JSON 结果；不填则不生成
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
        .with_target(true)
        .init();

    let args = Args::parse();
    let windows = args.windows.unwrap_or_else(|| {
        if args.lossy {
            wide_windows()
        } else {
            default_windows()
        }
    });
    if let Err(e) = validate_windows(&windows) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let mut base = if args.lossy {
        lossy_collapse_config()
    } else {
        collapse_base_config()
    };
    if let Some(ticks) = args.ticks {
        base.ticks = ticks;
    }
    if let Some(loss_ratio) = args.loss_ratio {
        base.loss_ratio = loss_ratio;
    }
    if let Some(queue_limit) = args.queue_limit {
        base.queue_limit = queue_limit;
    }
    if let Some(seed) = args.seed {
        base.seed = seed;
    }

    let points = match congestion_collapse_sweep(&base, &windows) {
        Ok(points) => points,
        Err(e) => {
            eprintln!("sweep failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    for p in &points {
        let max = p
            .max_in_order
            .map(|s| s.to_string())
            .unwrap_or_else(|| "None".to_string());
        println!(
            "window_size={} max_in_order={} throughput={:.4} retransmitted={} timeouts={}",
            p.window_size, max, p.throughput, p.retransmitted, p.timeouts
        );
    }

    if let Some(path) = args.json {
        let json = match serde_json::to_string_pretty(&points) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("serialize sweep: {e}");
                return ExitCode::FAILURE;
            }
        };
        if let Err(e) = fs::write(&path, json) {
            eprintln!("write {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
        eprintln!("wrote sweep results to {}", path.display());
    }
    ExitCode::SUCCESS
}
