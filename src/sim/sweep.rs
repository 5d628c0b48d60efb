//! 拥塞崩溃扫描
//!
//! 在同一条链路上依次增大滑动窗口，测量吞吐（最大按序确认序号 / 运行时长）。
//! 窗口超过带宽时延积后，排队让 RTT 变长、超时变成伪重传，重传占用链路容量，吞吐回落。

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{ProtocolConfig, SimConfig, SimContext, TimeoutConfig};
use crate::error::SimError;
use crate::net::SeqNum;

pub const COLLAPSE_DURATION: u64 = 10_000;
pub const COLLAPSE_RTT_MIN: u64 = 10;
pub const COLLAPSE_SEED: u64 = 1000;
pub const MIN_SWEEP_POINTS: usize = 10;

pub const LOSSY_COLLAPSE_LOSS_RATIO: f64 = 0.05;
pub const LOSSY_COLLAPSE_QUEUE_LIMIT: usize = 20;
pub const LOSSY_COLLAPSE_K: f64 = 1.0;

/// 扫描中的一个点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub window_size: usize,
    pub max_in_order: Option<SeqNum>,
    /// 报文 / tick
    pub throughput: f64,
    pub retransmitted: u64,
    pub timeouts: u64,
}

/// 默认窗口序列：2, 4, ..., 20
pub fn default_windows() -> Vec<usize> {
    (2..=20).step_by(2).collect()
}

/// 拥塞崩溃实验的基准配置：无丢包、无限队列、不截断超时
pub fn collapse_base_config() -> SimConfig {
    SimConfig {
        seed: COLLAPSE_SEED,
        timeout: TimeoutConfig::unbounded(),
        ..SimConfig::new(
            ProtocolConfig::SlidingWindow { window_size: 1 },
            COLLAPSE_RTT_MIN,
            COLLAPSE_DURATION,
        )
    }
}

/// 有损、有限队列下的崩溃实验：5% 丢包，队列 20，超时 = 均值 + 1 倍偏差且不截断。
///
/// 排队时延抖动超过估计的偏差时，仍在队列中的报文被判定超时，
/// 重复副本占用链路容量，窗口越大浪费越多。
pub fn lossy_collapse_config() -> SimConfig {
    SimConfig {
        loss_ratio: LOSSY_COLLAPSE_LOSS_RATIO,
        queue_limit: LOSSY_COLLAPSE_QUEUE_LIMIT,
        timeout: TimeoutConfig {
            k: LOSSY_COLLAPSE_K,
            ..TimeoutConfig::unbounded()
        },
        ..collapse_base_config()
    }
}

/// 跨过带宽时延积、一直到远超队列容量的窗口序列
pub fn wide_windows() -> Vec<usize> {
    vec![2, 4, 6, 8, 10, 20, 40, 60, 90, 120]
}

/// 窗口序列至少 `MIN_SWEEP_POINTS` 个点，且非递减。
pub fn validate_windows(windows: &[usize]) -> Result<(), SimError> {
    if windows.len() < MIN_SWEEP_POINTS {
        return Err(SimError::InvalidSweep(format!(
            "need at least {MIN_SWEEP_POINTS} window sizes, got {}",
            windows.len()
        )));
    }
    if windows.windows(2).any(|w| w[0] > w[1]) {
        return Err(SimError::InvalidSweep(
            "window sizes must be non-decreasing".into(),
        ));
    }
    Ok(())
}

/// 对每个窗口大小用 `base`（协议替换为对应的滑动窗口）运行一次。
pub fn congestion_collapse_sweep(
    base: &SimConfig,
    windows: &[usize],
) -> Result<Vec<SweepPoint>, SimError> {
    let mut points = Vec::with_capacity(windows.len());
    for &window_size in windows {
        let cfg = SimConfig {
            protocol: ProtocolConfig::SlidingWindow { window_size },
            ..base.clone()
        };
        let mut sim = cfg
            .build_simulator()?
            .with_context(SimContext::quiet())
            .with_samples(false);
        sim.run(cfg.ticks)?;

        let max_in_order = sim.max_in_order_received_sequence_number();
        let stats = sim.host().stats();
        let throughput = if cfg.ticks == 0 {
            0.0
        } else {
            max_in_order.unwrap_or(0) as f64 / cfg.ticks as f64
        };
        info!(window_size, ?max_in_order, throughput, "扫描点完成");
        points.push(SweepPoint {
            window_size,
            max_in_order,
            throughput,
            retransmitted: stats.retransmitted,
            timeouts: stats.timeouts,
        });
    }
    Ok(points)
}
