//! 链路类型
//!
//! 容量为每 tick 出队 1 个报文的有界 FIFO，两种丢包：
//! - 队列已满时尾丢弃（容量丢包）
//! - 出队时以 `loss_ratio` 的概率独立随机丢弃

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use super::{LinkStats, Packet};
use crate::error::SimError;
use crate::queue::{DropTailQueue, PacketQueue};
use crate::sim::SimContext;
use crate::viz::EventKind;

/// 网络链路
#[derive(Debug)]
pub struct Link {
    loss_ratio: f64,
    queue: Box<dyn PacketQueue>,
    rng: StdRng,
    stats: LinkStats,
}

impl Link {
    /// 创建新链路；`seed` 决定随机丢包序列。
    ///
    /// `loss_ratio` 必须在 [0, 1] 内（NaN 不合法），队列上限至少为 1。
    pub fn new(loss_ratio: f64, queue_limit: usize, seed: u64) -> Result<Self, SimError> {
        if !(0.0..=1.0).contains(&loss_ratio) {
            return Err(SimError::InvalidLossRatio(loss_ratio));
        }
        if queue_limit == 0 {
            return Err(SimError::ZeroQueueLimit);
        }
        Ok(Self {
            loss_ratio,
            queue: Box::new(DropTailQueue::new(queue_limit)),
            rng: StdRng::seed_from_u64(seed),
            stats: LinkStats::default(),
        })
    }

    pub fn loss_ratio(&self) -> f64 {
        self.loss_ratio
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn queue_limit(&self) -> usize {
        self.queue.capacity()
    }

    pub fn stats(&self) -> &LinkStats {
        &self.stats
    }

    /// 报文入队；队列满时丢弃，之后不会再出现。
    pub fn enqueue(&mut self, pkts: impl IntoIterator<Item = Packet>, ctx: &mut SimContext) {
        for pkt in pkts {
            match self.queue.enqueue(pkt) {
                Ok(()) => self.stats.enqueued += 1,
                Err(dropped) => {
                    self.stats.overflow_drops += 1;
                    trace!(seq = dropped.sequence_number, q_len = self.queue.len(), "队列已满，丢弃");
                    ctx.record(EventKind::BufferOverflow {
                        seq: dropped.sequence_number,
                    });
                }
            }
        }
    }

    /// 每次调用最多出队一个报文；队首报文可能被随机丢弃。
    pub fn dequeue(&mut self, ctx: &mut SimContext) -> Option<Packet> {
        let head = self.queue.dequeue()?;
        if self.loss_ratio > 0.0 && self.rng.gen_bool(self.loss_ratio) {
            self.stats.random_drops += 1;
            trace!(seq = head.sequence_number, "随机丢包");
            ctx.record(EventKind::RandomLoss {
                seq: head.sequence_number,
            });
            return None;
        }
        self.stats.forwarded += 1;
        Some(head)
    }
}
