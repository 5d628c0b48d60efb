//! 数据包类型
//!
//! 报文只携带仿真元数据（序号、时间戳、标志位），没有载荷。

use serde::{Deserialize, Serialize};

use crate::sim::Tick;

/// 报文序号：标识一条逻辑消息，重传时保持不变。
pub type SeqNum = u64;

/// 网络数据包
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    /// 主机发出该报文时的 tick（重传时为重传时刻）
    pub sent_tick: Tick,
    pub sequence_number: SeqNum,
    pub is_retransmission: bool,
    /// 仅由延迟盒在回送时置位
    pub is_ack: bool,
    /// 进入延迟盒的 tick（仅用于时延记账）
    pub arrival_tick: Option<Tick>,
}

impl Packet {
    /// 新消息的首次发送
    pub fn new(sent_tick: Tick, sequence_number: SeqNum) -> Self {
        Self {
            sent_tick,
            sequence_number,
            is_retransmission: false,
            is_ack: false,
            arrival_tick: None,
        }
    }

    /// 同一序号的重传
    pub fn retransmission(sent_tick: Tick, sequence_number: SeqNum) -> Self {
        Self {
            is_retransmission: true,
            ..Self::new(sent_tick, sequence_number)
        }
    }

    /// 延迟盒入队时打上到达时间与 ACK 标志
    pub(crate) fn stamped_as_ack(self, arrival_tick: Tick) -> Self {
        Self {
            is_ack: true,
            arrival_tick: Some(arrival_tick),
            ..self
        }
    }

    /// 报文发出至 `now` 经过的 tick 数
    pub fn age(&self, now: Tick) -> Tick {
        now.saturating_sub(self.sent_tick)
    }
}
