//! 传输层可靠性协议
//!
//! 三种发送端（停等、固定滑动窗口、AIMD）共享同一套 tick 处理流程
//! （见 [`window`]），差异只在窗口策略；超时由 [`rto`] 的 EWMA 估计器给出。

use serde::{Deserialize, Serialize};

use crate::net::{NetworkInterface, SeqNum};
use crate::sim::SimContext;

pub mod aimd;
pub mod rto;
pub mod sliding_window;
pub mod stop_and_wait;
pub mod window;

pub use aimd::{Aimd, AimdHost, WindowTransition};
pub use rto::{TimeoutBounds, TimeoutCalculator};
pub use sliding_window::{FixedWindow, SlidingWindowHost};
pub use stop_and_wait::{StopAndWait, StopAndWaitHost};
pub use window::{WindowHost, WindowPolicy};

/// 主机侧统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostStats {
    pub transmitted: u64,
    pub retransmitted: u64,
    pub acks_received: u64,
    pub duplicate_acks: u64,
    pub timeouts: u64,
}

/// 主机：仿真器每个 tick 调用一次 `run_one_tick`，运行结束后调用一次 `shutdown_hook`。
///
/// 主机只能通过 `NetworkInterface::transmit` / `receive_all` 与网络交互。
pub trait Host: std::fmt::Debug {
    fn name(&self) -> &'static str;

    /// 返回最大的按序确认序号；尚无任何确认时返回 `None`。
    fn run_one_tick(&mut self, ctx: &mut SimContext, nic: &mut NetworkInterface)
        -> Option<SeqNum>;

    fn shutdown_hook(&mut self, _ctx: &mut SimContext) {}

    fn window_size(&self) -> f64;
    fn inflight(&self) -> usize;
    fn timeout_calculator(&self) -> &TimeoutCalculator;
    fn stats(&self) -> &HostStats;
}
