//! AIMD 拥塞控制（加性增、乘性减）
//!
//! - 慢启动（直到第一次超时）：窗口按新近按序确认的报文数增长，每个 RTT 约翻倍
//! - 拥塞避免：有按序确认推进的 tick，窗口 +1
//! - 超时：窗口减半（下限 1）并永久退出慢启动；每个 RTT 最多减半一次
//!
//! 窗口增长没有上限（例如接收方通告窗口），只受上述规则约束。

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::window::{WindowHost, WindowPolicy};
use super::TimeoutCalculator;
use crate::sim::{SimContext, Tick};
use crate::viz::EventKind;

pub const INITIAL_WINDOW: f64 = 1.0;
pub const MIN_WINDOW: f64 = 1.0;

/// 一次窗口变化
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowTransition {
    pub tick: Tick,
    pub old: f64,
    pub new: f64,
}

impl WindowTransition {
    pub fn is_shrink(&self) -> bool {
        self.new < self.old
    }
}

#[derive(Debug, Clone)]
pub struct Aimd {
    window: f64,
    slow_start: bool,
    last_shrink_tick: Option<Tick>,
    transitions: Vec<WindowTransition>,
}

impl Default for Aimd {
    fn default() -> Self {
        Self {
            window: INITIAL_WINDOW,
            slow_start: true,
            last_shrink_tick: None,
            transitions: Vec::new(),
        }
    }
}

impl Aimd {
    pub fn in_slow_start(&self) -> bool {
        self.slow_start
    }

    pub fn last_shrink_tick(&self) -> Option<Tick> {
        self.last_shrink_tick
    }

    pub fn transitions(&self) -> &[WindowTransition] {
        &self.transitions
    }

    pub fn shrink_count(&self) -> usize {
        self.transitions.iter().filter(|t| t.is_shrink()).count()
    }

    fn set_window_size(&mut self, new: f64, ctx: &mut SimContext) {
        let old = self.window;
        if new < old {
            ctx.record(EventKind::WindowShrink { old, new });
        } else if new > old {
            ctx.record(EventKind::WindowExpand { old, new });
        } else {
            return;
        }
        self.transitions.push(WindowTransition {
            tick: ctx.now(),
            old,
            new,
        });
        self.window = new;
    }
}

impl WindowPolicy for Aimd {
    fn name(&self) -> &'static str {
        "aimd"
    }

    fn window_size(&self) -> f64 {
        self.window
    }

    fn on_in_order_ack(&mut self, advanced: u64, ctx: &mut SimContext) {
        let new = if self.slow_start {
            self.window + advanced as f64
        } else {
            self.window + 1.0
        };
        self.set_window_size(new, ctx);
    }

    fn on_timeouts(&mut self, timed_out: usize, rto: &TimeoutCalculator, ctx: &mut SimContext) {
        let now = ctx.now();
        // 用平均 RTT 界定“同一个 RTT 内”；还没有样本时退化为当前超时
        let rtt_window = rto
            .mean_estimate()
            .map(|m| m.ceil() as Tick)
            .unwrap_or_else(|| rto.timeout());
        if !self
            .last_shrink_tick
            .is_none_or(|last| now.saturating_sub(last) >= rtt_window)
        {
            debug!(now, timed_out, last_shrink = ?self.last_shrink_tick, rtt_window, "本 RTT 内已减半，忽略");
            return;
        }

        if self.slow_start {
            debug!(now, window = self.window, "首次超时，退出慢启动");
        }
        self.slow_start = false;
        self.last_shrink_tick = Some(now);
        let new = (self.window / 2.0).max(MIN_WINDOW);
        self.set_window_size(new, ctx);
    }

    fn on_shutdown(&mut self, _ctx: &mut SimContext) {
        info!(
            window = self.window,
            slow_start = self.slow_start,
            transitions = self.transitions.len(),
            shrinks = self.shrink_count(),
            "AIMD 窗口统计"
        );
    }
}

pub type AimdHost = WindowHost<Aimd>;

impl AimdHost {
    pub fn new(rto: TimeoutCalculator) -> Self {
        WindowHost::with_policy(Aimd::default(), rto)
    }
}
