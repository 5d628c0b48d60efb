//! 窗口式发送端（三种协议共用的 tick 处理流程）
//!
//! 每个 tick 依次：
//! 1. 取出新到达的 ACK，推进 `next_expected`（乱序 ACK 先缓存）
//! 2. 扫描 inflight，对超时报文原序号重传
//! 3. 按策略允许的窗口容量发送新报文
//! 4. 返回 `next_expected - 1`（尚无确认时为 `None`）
//!
//! 协议差异（窗口容量、成功/超时后的窗口调整）由 [`WindowPolicy`] 注入。

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use super::{Host, HostStats, TimeoutCalculator};
use crate::net::{NetworkInterface, Packet, SeqNum};
use crate::sim::{SimContext, Tick};
use crate::viz::EventKind;

/// 窗口策略：决定能有多少报文在途，以及如何随确认/超时调整。
pub trait WindowPolicy: std::fmt::Debug {
    fn name(&self) -> &'static str;

    /// 当前窗口大小（可为小数）
    fn window_size(&self) -> f64;

    /// 允许同时在途的报文数
    fn capacity(&self) -> usize {
        self.window_size().floor() as usize
    }

    /// 本 tick 有 `advanced` (> 0) 个报文新近按序确认
    fn on_in_order_ack(&mut self, _advanced: u64, _ctx: &mut SimContext) {}

    /// 本 tick 有 `timed_out` (> 0) 个 inflight 报文超时
    fn on_timeouts(&mut self, _timed_out: usize, _rto: &TimeoutCalculator, _ctx: &mut SimContext) {}

    fn on_shutdown(&mut self, _ctx: &mut SimContext) {}
}

/// 以某个窗口策略参数化的主机
#[derive(Debug)]
pub struct WindowHost<P: WindowPolicy> {
    policy: P,
    rto: TimeoutCalculator,
    // 最小的尚未按序确认的序号
    next_expected: SeqNum,
    // 最小的从未发送过的序号
    next_seq: SeqNum,
    inflight: BTreeMap<SeqNum, Packet>, // seq -> 最近一次发送
    out_of_order: BTreeSet<SeqNum>,
    stats: HostStats,
}

impl<P: WindowPolicy> WindowHost<P> {
    pub fn with_policy(policy: P, rto: TimeoutCalculator) -> Self {
        Self {
            policy,
            rto,
            next_expected: 0,
            next_seq: 0,
            inflight: BTreeMap::new(),
            out_of_order: BTreeSet::new(),
            stats: HostStats::default(),
        }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn next_expected(&self) -> SeqNum {
        self.next_expected
    }

    pub fn next_seq(&self) -> SeqNum {
        self.next_seq
    }

    pub fn inflight_seqs(&self) -> impl Iterator<Item = SeqNum> + '_ {
        self.inflight.keys().copied()
    }

    pub fn buffered_out_of_order(&self) -> usize {
        self.out_of_order.len()
    }

    /// 最大的按序确认序号（它及之前的序号都已确认）
    pub fn max_in_order(&self) -> Option<SeqNum> {
        self.next_expected.checked_sub(1)
    }

    /// 步骤 1：处理 ACK，返回本 tick 新按序确认的报文数。
    fn process_acks(&mut self, now: Tick, acks: Vec<Packet>, ctx: &mut SimContext) -> u64 {
        for ack in acks {
            let seq = ack.sequence_number;
            self.stats.acks_received += 1;
            if seq < self.next_expected || self.out_of_order.contains(&seq) {
                self.stats.duplicate_acks += 1;
                ctx.record(EventKind::DuplicateAck { seq });
                continue;
            }
            // ACK 回显了对应那次发送的时间戳，RTT 样本没有歧义
            self.rto.add_data_point(ack.age(now) as f64);
            self.inflight.remove(&seq);
            self.out_of_order.insert(seq);
        }

        // 每个 tick 都重新检查缓存，空洞可能已被补上
        let before = self.next_expected;
        while self.out_of_order.remove(&self.next_expected) {
            self.next_expected += 1;
        }
        self.next_expected - before
    }

    /// 步骤 2：对超时报文原序号重传，返回超时个数。
    fn retransmit_expired(
        &mut self,
        now: Tick,
        nic: &mut NetworkInterface,
        ctx: &mut SimContext,
    ) -> usize {
        let timeout = self.rto.timeout();
        // 先取快照再修改 inflight
        let expired: Vec<(SeqNum, Tick)> = self
            .inflight
            .values()
            .filter(|p| p.age(now) > timeout)
            .map(|p| (p.sequence_number, p.age(now)))
            .collect();

        for &(seq, age) in &expired {
            ctx.record(EventKind::Timeout { seq, age, timeout });
            let pkt = Packet::retransmission(now, seq);
            self.inflight.insert(seq, pkt);
            nic.transmit(pkt, ctx);
            self.stats.retransmitted += 1;
        }
        self.stats.timeouts += expired.len() as u64;
        expired.len()
    }

    /// 步骤 3：窗口有空位时发送新序号。
    fn transmit_new(&mut self, now: Tick, nic: &mut NetworkInterface, ctx: &mut SimContext) {
        let avail = self.policy.capacity().saturating_sub(self.inflight.len());
        for _ in 0..avail {
            let seq = self.next_seq;
            self.next_seq += 1;
            let pkt = Packet::new(now, seq);
            self.inflight.insert(seq, pkt);
            nic.transmit(pkt, ctx);
            self.stats.transmitted += 1;
        }
    }
}

impl<P: WindowPolicy> Host for WindowHost<P> {
    fn name(&self) -> &'static str {
        self.policy.name()
    }

    fn run_one_tick(
        &mut self,
        ctx: &mut SimContext,
        nic: &mut NetworkInterface,
    ) -> Option<SeqNum> {
        let now = ctx.now();

        let acks = nic.receive_all(ctx);
        let advanced = self.process_acks(now, acks, ctx);
        if advanced > 0 {
            self.policy.on_in_order_ack(advanced, ctx);
        }

        let timed_out = self.retransmit_expired(now, nic, ctx);
        if timed_out > 0 {
            debug!(now, timed_out, timeout = self.rto.timeout(), "inflight 报文超时");
            self.policy.on_timeouts(timed_out, &self.rto, ctx);
        }

        self.transmit_new(now, nic, ctx);

        self.max_in_order()
    }

    fn shutdown_hook(&mut self, ctx: &mut SimContext) {
        info!(
            protocol = self.policy.name(),
            max_in_order = ?self.max_in_order(),
            next_seq = self.next_seq,
            inflight = self.inflight.len(),
            window = self.policy.window_size(),
            transmitted = self.stats.transmitted,
            retransmitted = self.stats.retransmitted,
            "主机结束"
        );
        self.policy.on_shutdown(ctx);
    }

    fn window_size(&self) -> f64 {
        self.policy.window_size()
    }

    fn inflight(&self) -> usize {
        self.inflight.len()
    }

    fn timeout_calculator(&self) -> &TimeoutCalculator {
        &self.rto
    }

    fn stats(&self) -> &HostStats {
        &self.stats
    }
}
