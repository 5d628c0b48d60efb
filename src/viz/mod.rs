//! 仿真事件记录与时间序列（用于离线绘图/回放）
//!
//! 设计目标：
//! - **结构化**：事件带类型与字段，而不是拼接好的文本
//! - **只追加**：核心逻辑只写不读，仿真结束后统一导出
//! - **可导出**：既能渲染成控制台表格，也能序列化为 JSON

mod event_log;
mod types;

pub use event_log::{EventKind, EventLog, LogEvent};
pub use types::{RunReport, TickSample};
