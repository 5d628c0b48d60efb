//! 仿真上下文
//!
//! 每次运行创建一个，持有时钟与事件日志；组件在调用时显式拿到它，
//! 不存在跨运行共享的全局状态。

use super::time::{Clock, Tick};
use crate::error::SimError;
use crate::viz::{EventKind, EventLog, LogEvent};
use tracing::trace;

#[derive(Debug, Default)]
pub struct SimContext {
    clock: Clock,
    log: EventLog,
}

impl SimContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// 不记录事件日志的上下文（长时间扫描实验用）。
    pub fn quiet() -> Self {
        Self {
            clock: Clock::new(),
            log: EventLog::disabled(),
        }
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub(crate) fn set_tick(&mut self, tick: Tick) -> Result<(), SimError> {
        self.clock.set_tick(tick)
    }

    /// 当前 tick；时钟尚未启动时视为 0。
    pub fn now(&self) -> Tick {
        self.clock.read_tick().unwrap_or_default()
    }

    /// 追加一条事件（tick 取自当前时钟）。
    pub fn record(&mut self, kind: EventKind) {
        let tick = self.clock.read_tick();
        trace!(?tick, event = kind.label(), "{}", kind.description());
        self.log.push(LogEvent { tick, kind });
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut EventLog {
        &mut self.log
    }

    pub fn into_log(self) -> EventLog {
        self.log
    }
}
