//! 传播时延盒
//!
//! 报文在盒中恰好停留 `prop_delay` 个 tick，出盒时已被标记为 ACK。
//! 它同时代表路径远端与 ACK 的回程：仿真中没有单独的接收方。

use std::collections::VecDeque;

use super::Packet;
use crate::error::SimError;
use crate::sim::{SimContext, Tick};

#[derive(Debug)]
pub struct DelayBox {
    prop_delay: Tick,
    // 按到达时间非递减排列
    held: VecDeque<Packet>,
}

impl DelayBox {
    pub fn new(prop_delay: Tick) -> Self {
        Self {
            prop_delay,
            held: VecDeque::new(),
        }
    }

    pub fn prop_delay(&self) -> Tick {
        self.prop_delay
    }

    pub fn len(&self) -> usize {
        self.held.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// 以当前 tick 打时间戳并标记为 ACK 后暂存。
    pub fn enqueue(&mut self, pkts: impl IntoIterator<Item = Packet>, ctx: &SimContext) {
        let now = ctx.now();
        self.held
            .extend(pkts.into_iter().map(|pkt| pkt.stamped_as_ack(now)));
    }

    /// 释放所有 `arrival_tick + prop_delay == now` 的报文。
    ///
    /// 若发现已经错过投递时刻的报文，说明时钟没有逐 tick 推进，返回错误。
    pub fn dequeue(&mut self, ctx: &SimContext) -> Result<Vec<Packet>, SimError> {
        let now = ctx.now();
        let mut out = Vec::new();
        while let Some(front) = self.held.front() {
            let due = front.arrival_tick.unwrap_or(now).saturating_add(self.prop_delay);
            if due > now {
                break;
            }
            if due < now {
                return Err(SimError::LateDelivery {
                    seq: front.sequence_number,
                    due,
                    now,
                });
            }
            if let Some(pkt) = self.held.pop_front() {
                out.push(pkt);
            }
        }
        Ok(out)
    }
}
