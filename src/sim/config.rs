//! 运行配置
//!
//! 与 CLI 参数一一对应，可序列化进 JSON 报告。所有检查都在构建仿真状态之前完成。

use serde::{Deserialize, Serialize};

use super::simulator::Simulator;
use super::Tick;
use crate::error::SimError;
use crate::net::{DelayBox, Link};
use crate::proto::rto::{
    DEFAULT_ALPHA, DEFAULT_BETA, DEFAULT_K, DEFAULT_MAX_TIMEOUT, DEFAULT_MIN_TIMEOUT,
};
use crate::proto::{
    AimdHost, Host, SlidingWindowHost, StopAndWaitHost, TimeoutBounds, TimeoutCalculator,
};

/// 链路默认队列上限（报文数），实际上等于无限
pub const DEFAULT_QUEUE_LIMIT: usize = 1_000_000;

/// 发送端协议
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProtocolConfig {
    StopAndWait,
    SlidingWindow { window_size: usize },
    Aimd,
}

impl ProtocolConfig {
    pub fn name(&self) -> &'static str {
        match self {
            ProtocolConfig::StopAndWait => "stop-and-wait",
            ProtocolConfig::SlidingWindow { .. } => "sliding-window",
            ProtocolConfig::Aimd => "aimd",
        }
    }
}

/// 超时估计器参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default = "default_beta")]
    pub beta: f64,
    #[serde(default = "default_k")]
    pub k: f64,
    #[serde(default = "default_min_timeout")]
    pub min_timeout: Option<u64>,
    #[serde(default = "default_max_timeout")]
    pub max_timeout: Option<u64>,
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

fn default_beta() -> f64 {
    DEFAULT_BETA
}

fn default_k() -> f64 {
    DEFAULT_K
}

fn default_min_timeout() -> Option<u64> {
    Some(DEFAULT_MIN_TIMEOUT)
}

fn default_max_timeout() -> Option<u64> {
    Some(DEFAULT_MAX_TIMEOUT)
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            beta: DEFAULT_BETA,
            k: DEFAULT_K,
            min_timeout: default_min_timeout(),
            max_timeout: default_max_timeout(),
        }
    }
}

impl TimeoutConfig {
    /// 不截断的估计器（拥塞崩溃实验使用）
    pub fn unbounded() -> Self {
        Self {
            min_timeout: None,
            max_timeout: None,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        for (name, value) in [("alpha", self.alpha), ("beta", self.beta)] {
            if !(value > 0.0 && value < 1.0) {
                return Err(SimError::InvalidGain { name, value });
            }
        }
        if !self.k.is_finite() || self.k < 0.0 {
            return Err(SimError::InvalidK(self.k));
        }
        if let (Some(min), Some(max)) = (self.min_timeout, self.max_timeout) {
            if min > max {
                return Err(SimError::InvertedTimeoutBounds { min, max });
            }
        }
        Ok(())
    }

    pub fn build(&self) -> TimeoutCalculator {
        TimeoutCalculator::new(
            self.alpha,
            self.beta,
            self.k,
            TimeoutBounds::new(self.min_timeout, self.max_timeout),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// 最小往返时延（tick），>= 2；传播时延盒的延迟为 `rtt_min - 1`
    pub rtt_min: Tick,
    /// 运行的 tick 数
    pub ticks: Tick,
    /// 链路随机丢包的种子
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub loss_ratio: f64,
    #[serde(default = "default_queue_limit")]
    pub queue_limit: usize,
    #[serde(default)]
    pub timeout: TimeoutConfig,
    pub protocol: ProtocolConfig,
}

fn default_queue_limit() -> usize {
    DEFAULT_QUEUE_LIMIT
}

impl SimConfig {
    pub fn new(protocol: ProtocolConfig, rtt_min: Tick, ticks: Tick) -> Self {
        Self {
            rtt_min,
            ticks,
            seed: 0,
            loss_ratio: 0.0,
            queue_limit: DEFAULT_QUEUE_LIMIT,
            timeout: TimeoutConfig::default(),
            protocol,
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.rtt_min < 2 {
            return Err(SimError::RttTooSmall(self.rtt_min));
        }
        if !(0.0..=1.0).contains(&self.loss_ratio) {
            return Err(SimError::InvalidLossRatio(self.loss_ratio));
        }
        if self.queue_limit == 0 {
            return Err(SimError::ZeroQueueLimit);
        }
        if let ProtocolConfig::SlidingWindow { window_size: 0 } = self.protocol {
            return Err(SimError::ZeroWindow);
        }
        self.timeout.validate()
    }

    pub fn build_host(&self) -> Result<Box<dyn Host>, SimError> {
        self.validate()?;
        let rto = self.timeout.build();
        let host: Box<dyn Host> = match self.protocol {
            ProtocolConfig::StopAndWait => Box::new(StopAndWaitHost::new(rto)),
            ProtocolConfig::SlidingWindow { window_size } => {
                Box::new(SlidingWindowHost::new(window_size, rto))
            }
            ProtocolConfig::Aimd => Box::new(AimdHost::new(rto)),
        };
        Ok(host)
    }

    /// 校验配置并连接 链路 / 时延盒 / 网卡 / 主机。
    pub fn build_simulator(&self) -> Result<Simulator, SimError> {
        let host = self.build_host()?;
        let link = Link::new(self.loss_ratio, self.queue_limit, self.seed)?;
        let delay_box = DelayBox::new(self.rtt_min - 1);
        Ok(Simulator::new(host, link, delay_box))
    }
}

/// CLI 的 `--rtt-min` 解析：必须是整数且至少为 2。
pub fn parse_rtt_min(raw: &str) -> Result<Tick, SimError> {
    let rtt: Tick = raw
        .trim()
        .parse()
        .map_err(|_| SimError::InvalidRtt(raw.to_string()))?;
    if rtt < 2 {
        return Err(SimError::RttTooSmall(rtt));
    }
    Ok(rtt)
}
