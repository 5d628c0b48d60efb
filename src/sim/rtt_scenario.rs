//! RTT 估计实验
//!
//! 用合成的 RTT 序列驱动 [`TimeoutCalculator`]，观察 EWMA 均值与超时如何跟随
//! 突发尖峰、持续尖峰、永久变化与高方差噪声。每一步都用“上一步算出的超时”
//! 判断本次 ACK 是否会被当成超时忽略，以及多等了多久。

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::proto::{TimeoutBounds, TimeoutCalculator};

pub const SCENARIO_STEPS: usize = 100;
pub const DEFAULT_SCENARIO_SEED: u64 = 1234;

const HIGH_VARIANCE_SIGMA: f64 = 25.0;
const HIGH_VARIANCE_MIN: f64 = 10.0;
const HIGH_VARIANCE_MAX: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RttScenario {
    /// 100 的基线上出现 2 步的 200
    ShortSpike,
    /// 100 的基线上出现 20 步的 200
    LongSpike,
    /// 第 20 步起从 100 永久变为 200
    PermanentChange,
    /// 高斯随机游走，截断在 [10, 200]
    HighVariance,
}

impl RttScenario {
    pub const ALL: [RttScenario; 4] = [
        RttScenario::ShortSpike,
        RttScenario::LongSpike,
        RttScenario::PermanentChange,
        RttScenario::HighVariance,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RttScenario::ShortSpike => "short-spike",
            RttScenario::LongSpike => "long-spike",
            RttScenario::PermanentChange => "permanent-change",
            RttScenario::HighVariance => "high-variance",
        }
    }

    /// 生成 `SCENARIO_STEPS` 个 RTT 样本；只有 high-variance 使用 `seed`。
    pub fn rtts(&self, seed: u64) -> Vec<f64> {
        let step = |spike: std::ops::Range<usize>| -> Vec<f64> {
            (0..SCENARIO_STEPS)
                .map(|ts| if spike.contains(&ts) { 200.0 } else { 100.0 })
                .collect()
        };
        match self {
            RttScenario::ShortSpike => step(10..12),
            RttScenario::LongSpike => step(10..30),
            RttScenario::PermanentChange => step(20..SCENARIO_STEPS),
            RttScenario::HighVariance => {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut out = Vec::with_capacity(SCENARIO_STEPS);
                let mut previous = 1.0_f64;
                // sigma 为正常数，构造不会失败
                let noise = Normal::new(0.0, HIGH_VARIANCE_SIGMA).ok();
                for _ in 0..SCENARIO_STEPS {
                    out.push(previous);
                    let diff = noise.map(|n| n.sample(&mut rng)).unwrap_or(0.0);
                    previous = (previous + diff).clamp(HIGH_VARIANCE_MIN, HIGH_VARIANCE_MAX);
                }
                out
            }
        }
    }
}

impl fmt::Display for RttScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RttScenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RttScenario::ALL
            .into_iter()
            .find(|sc| sc.name() == s)
            .ok_or_else(|| {
                format!(
                    "unknown scenario {s:?}; expected one of: short-spike, long-spike, permanent-change, high-variance"
                )
            })
    }
}

/// 一步实验结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeoutExperimentSample {
    pub send_time: usize,
    pub rtt: f64,
    pub mean_estimate: f64,
    pub stddev_estimate: f64,
    /// 发送这条消息时生效的超时（上一步的计算结果）
    pub timeout: f64,
    /// ACK 先于超时到达时，超时比实际 RTT 多等的时间；ACK 被忽略时为 `None`
    pub extra_wait: Option<f64>,
    /// RTT 超过生效的超时，ACK 到达前已判定超时
    pub ack_ignored: bool,
}

/// 在给定 RTT 序列上运行估计器（无上下界，初始偏差为 0，首个超时等于首个 RTT）。
pub fn run_timeout_experiment(
    rtts: &[f64],
    alpha: f64,
    beta: f64,
    k: f64,
) -> Vec<TimeoutExperimentSample> {
    let mut calc = TimeoutCalculator::new(alpha, beta, k, TimeoutBounds::UNBOUNDED)
        .with_initial_estimates(None, Some(0.0));
    let mut current_timeout: Option<f64> = None;
    let mut out = Vec::with_capacity(rtts.len());

    for (send_time, &rtt) in rtts.iter().enumerate() {
        let timeout = current_timeout.unwrap_or(rtt);
        let ack_ignored = rtt > timeout;
        let extra_wait = (!ack_ignored).then(|| timeout - rtt);

        calc.add_data_point(rtt);
        out.push(TimeoutExperimentSample {
            send_time,
            rtt,
            mean_estimate: calc.mean_estimate().unwrap_or(rtt),
            stddev_estimate: calc.stddev_estimate().unwrap_or_default(),
            timeout,
            extra_wait,
            ack_ignored,
        });

        current_timeout = Some(calc.timeout() as f64);
    }
    out
}
