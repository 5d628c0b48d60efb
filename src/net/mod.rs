//! 网络模拟模块
//!
//! 单条路径上的报文流水线：主机网卡 -> 有损链路 -> 传播时延盒 -> 主机网卡。

// 子模块声明
mod delay_box;
mod link;
mod network_interface;
mod packet;
mod stats;

// 重新导出公共接口
pub use delay_box::DelayBox;
pub use link::Link;
pub use network_interface::NetworkInterface;
pub use packet::{Packet, SeqNum};
pub use stats::LinkStats;
