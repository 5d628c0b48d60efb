use serde::{Deserialize, Serialize};

use super::LogEvent;
use crate::net::{LinkStats, SeqNum};
use crate::proto::HostStats;
use crate::sim::{SimConfig, Tick};

/// 每个 tick 结束时的采样（窗口、序号、RTT 估计），供绘图使用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSample {
    pub tick: Tick,
    pub max_in_order: Option<SeqNum>,
    pub window_size: f64,
    pub inflight: usize,
    pub timeout: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_rtt: Option<f64>,
}

/// 一次运行的完整结果（CLI `--report-json` 输出）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub config: SimConfig,
    pub protocol: String,
    pub max_in_order: Option<SeqNum>,
    pub link: LinkStats,
    pub host: HostStats,
    pub samples: Vec<TickSample>,
    pub events: Vec<LogEvent>,
}
