//! 仿真时间与时钟
//!
//! 仿真时间以离散 tick 计；时钟只能严格向前推进。

use crate::error::SimError;

/// 仿真时间（tick）。
pub type Tick = u64;

/// 单调递增的 tick 计数器，是所有时间戳的唯一来源。
///
/// 初始状态早于任何合法 tick（`read_tick()` 返回 `None`）。
#[derive(Debug, Clone, Default)]
pub struct Clock {
    current: Option<Tick>,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// 推进到 `tick`；`tick` 必须严格大于当前值。
    pub fn set_tick(&mut self, tick: Tick) -> Result<(), SimError> {
        if let Some(current) = self.current {
            if tick <= current {
                return Err(SimError::NonMonotonicTick {
                    current,
                    next: tick,
                });
            }
        }
        self.current = Some(tick);
        Ok(())
    }

    pub fn read_tick(&self) -> Option<Tick> {
        self.current
    }
}
