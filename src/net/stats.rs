//! 统计信息
//!
//! 定义链路统计数据结构。

use serde::{Deserialize, Serialize};

/// 链路统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStats {
    pub enqueued: u64,
    pub overflow_drops: u64,
    pub random_drops: u64,
    pub forwarded: u64,
}
