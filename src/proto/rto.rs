//! 重传超时（RTO）估计
//!
//! 用 EWMA 维护 RTT 均值与偏差（Jacobson/Karn 风格）：
//! - `mean' = (1-α)·mean + α·rtt`
//! - `dev'  = (1-β)·dev  + β·|rtt - mean'|`
//! - `timeout = clamp(mean' + k·dev', [min, max])`，任一端为 `None` 表示不截断
//!
//! 第一个样本时偏差无定义，取 `dev = mean / 2`。纯估计器，不感知报文与流水线。

use serde::{Deserialize, Serialize};

pub const DEFAULT_ALPHA: f64 = 0.125;
pub const DEFAULT_BETA: f64 = 0.25;
pub const DEFAULT_K: f64 = 4.0;
pub const DEFAULT_MIN_TIMEOUT: u64 = 100;
pub const DEFAULT_MAX_TIMEOUT: u64 = 10_000;

/// 超时上下界（闭区间）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutBounds {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl TimeoutBounds {
    pub const UNBOUNDED: TimeoutBounds = TimeoutBounds {
        min: None,
        max: None,
    };

    pub fn new(min: Option<u64>, max: Option<u64>) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, timeout: f64) -> f64 {
        let mut t = timeout;
        if let Some(min) = self.min {
            t = t.max(min as f64);
        }
        if let Some(max) = self.max {
            t = t.min(max as f64);
        }
        t
    }
}

#[derive(Debug, Clone)]
pub struct TimeoutCalculator {
    alpha: f64,
    beta: f64,
    k: f64,
    bounds: TimeoutBounds,
    mean: Option<f64>,
    stddev: Option<f64>,
    current: f64,
}

impl Default for TimeoutCalculator {
    fn default() -> Self {
        Self::new(
            DEFAULT_ALPHA,
            DEFAULT_BETA,
            DEFAULT_K,
            TimeoutBounds::new(Some(DEFAULT_MIN_TIMEOUT), Some(DEFAULT_MAX_TIMEOUT)),
        )
    }
}

impl TimeoutCalculator {
    /// 参数合法性由 `SimConfig::validate` 检查；没有样本时超时取下界（无下界时为 1）。
    pub fn new(alpha: f64, beta: f64, k: f64, bounds: TimeoutBounds) -> Self {
        Self {
            alpha,
            beta,
            k,
            bounds,
            mean: None,
            stddev: None,
            current: bounds.min.map(|m| m as f64).unwrap_or(1.0),
        }
    }

    /// 预置初始估计值（例如 `stddev = 0`，跳过首样本的 `mean / 2` 启发式）。
    pub fn with_initial_estimates(mut self, mean: Option<f64>, stddev: Option<f64>) -> Self {
        self.mean = mean;
        self.stddev = stddev;
        self
    }

    pub fn bounds(&self) -> TimeoutBounds {
        self.bounds
    }

    /// 加入一个 RTT 样本并刷新超时。
    pub fn add_data_point(&mut self, rtt: f64) {
        let mean = match self.mean {
            None => rtt,
            Some(old) => (1.0 - self.alpha) * old + self.alpha * rtt,
        };
        let stddev = match self.stddev {
            None => mean / 2.0,
            Some(old) => (1.0 - self.beta) * old + self.beta * (rtt - mean).abs(),
        };
        self.mean = Some(mean);
        self.stddev = Some(stddev);
        self.current = self.bounds.clamp(mean + self.k * stddev);
    }

    /// 当前超时（截断为整数 tick）。
    pub fn timeout(&self) -> u64 {
        self.current as u64
    }

    /// 未截断的超时值
    pub fn raw_timeout(&self) -> f64 {
        self.current
    }

    pub fn mean_estimate(&self) -> Option<f64> {
        self.mean
    }

    pub fn stddev_estimate(&self) -> Option<f64> {
        self.stddev
    }
}
