//! 错误类型
//!
//! 配置错误在构建仿真之前返回；流水线不变量被破坏（时钟回退、延迟盒晚投递）
//! 属于程序缺陷，由 `Simulator::run` 以 `Err` 形式上报。丢包不是错误。

use thiserror::Error;

use crate::net::SeqNum;
use crate::sim::Tick;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("RTT minimum must be an integer number of ticks (got {0:?})")]
    InvalidRtt(String),

    #[error("RTT minimum must be at least 2 (got {0})")]
    RttTooSmall(u64),

    #[error("loss ratio must be within [0, 1] (got {0})")]
    InvalidLossRatio(f64),

    #[error("queue limit must be at least 1 packet")]
    ZeroQueueLimit,

    #[error("window size must be at least 1 packet")]
    ZeroWindow,

    #[error("min timeout {min} exceeds max timeout {max}")]
    InvertedTimeoutBounds { min: u64, max: u64 },

    #[error("EWMA gain {name} must be within (0, 1) (got {value})")]
    InvalidGain { name: &'static str, value: f64 },

    #[error("timeout multiplier k must be finite and non-negative (got {0})")]
    InvalidK(f64),

    #[error("invalid window sweep: {0}")]
    InvalidSweep(String),

    #[error("clock must move forward: tick {next} is not after {current}")]
    NonMonotonicTick { current: Tick, next: Tick },

    #[error("packet seq={seq} was due at tick {due} but delay box released it at tick {now}")]
    LateDelivery { seq: SeqNum, due: Tick, now: Tick },
}
