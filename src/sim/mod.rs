//! 仿真核心模块
//!
//! 此模块包含逐 tick 推进的仿真组件：时钟、仿真上下文、仿真器与运行配置，
//! 以及窗口扫描、RTT 估计实验等基于仿真器的辅助流程。

// 子模块声明
mod config;
mod context;
mod simulator;
mod time;

pub mod rtt_scenario;
pub mod sweep;

// 重新导出公共接口
pub use config::{
    parse_rtt_min, ProtocolConfig, SimConfig, TimeoutConfig, DEFAULT_QUEUE_LIMIT,
};
pub use context::SimContext;
pub use simulator::Simulator;
pub use time::{Clock, Tick};
