//! 仿真器
//!
//! 逐 tick 推进整条流水线。每个 tick 的顺序固定：
//! 1. 设置时钟
//! 2. 运行主机（读接收缓冲区，写发送缓冲区）
//! 3. 网卡发送缓冲区 -> 链路
//! 4. 链路 -> 传播时延盒
//! 5. 时延盒 -> 网卡接收缓冲区（下一个 tick 才被主机看到）
//!
//! 主机总是先于本 tick 的链路搬运执行，因此报文不可能在发出的同一个 tick 被确认。

use tracing::{debug, info};

use super::context::SimContext;
use super::time::Tick;
use super::SimConfig;
use crate::error::SimError;
use crate::net::{DelayBox, Link, NetworkInterface, SeqNum};
use crate::proto::Host;
use crate::viz::{RunReport, TickSample};

#[derive(Debug)]
pub struct Simulator {
    ctx: SimContext,
    nic: NetworkInterface,
    host: Box<dyn Host>,
    link: Link,
    delay_box: DelayBox,
    max_in_order: Option<SeqNum>,
    samples: Vec<TickSample>,
    record_samples: bool,
}

impl Simulator {
    pub fn new(host: Box<dyn Host>, link: Link, delay_box: DelayBox) -> Self {
        Self {
            ctx: SimContext::new(),
            nic: NetworkInterface::new(),
            host,
            link,
            delay_box,
            max_in_order: None,
            samples: Vec::new(),
            record_samples: true,
        }
    }

    /// 替换仿真上下文（例如不记日志的 `SimContext::quiet()`）
    pub fn with_context(mut self, ctx: SimContext) -> Self {
        self.ctx = ctx;
        self
    }

    /// 是否逐 tick 记录时间序列
    pub fn with_samples(mut self, enabled: bool) -> Self {
        self.record_samples = enabled;
        self
    }

    pub fn context(&self) -> &SimContext {
        &self.ctx
    }

    pub fn host(&self) -> &dyn Host {
        self.host.as_ref()
    }

    pub fn link(&self) -> &Link {
        &self.link
    }

    pub fn delay_box(&self) -> &DelayBox {
        &self.delay_box
    }

    pub fn network_interface(&self) -> &NetworkInterface {
        &self.nic
    }

    pub fn samples(&self) -> &[TickSample] {
        &self.samples
    }

    /// 主机最近一次 `run_one_tick` 的返回值
    pub fn max_in_order_received_sequence_number(&self) -> Option<SeqNum> {
        self.max_in_order
    }

    /// 执行一个 tick 的流水线步骤（时钟由调用方先行设置）。
    fn run_tick(&mut self) -> Result<(), SimError> {
        self.max_in_order = self.host.run_one_tick(&mut self.ctx, &mut self.nic);

        let host_pkts = self.nic.pull_packets();
        self.link.enqueue(host_pkts, &mut self.ctx);

        let link_pkt = self.link.dequeue(&mut self.ctx);
        self.delay_box.enqueue(link_pkt, &self.ctx);

        let acks = self.delay_box.dequeue(&self.ctx)?;
        self.nic.push_packets(acks);
        Ok(())
    }

    fn sample(&mut self, tick: Tick) {
        if !self.record_samples {
            return;
        }
        let rto = self.host.timeout_calculator();
        self.samples.push(TickSample {
            tick,
            max_in_order: self.max_in_order,
            window_size: self.host.window_size(),
            inflight: self.host.inflight(),
            timeout: rto.timeout(),
            mean_rtt: rto.mean_estimate(),
        });
    }

    /// 依次运行 tick `0 .. duration`，结束后调用一次主机的 `shutdown_hook`。
    #[tracing::instrument(skip(self), fields(protocol = self.host.name()))]
    pub fn run(&mut self, duration: Tick) -> Result<(), SimError> {
        info!("▶️  开始运行仿真");
        for tick in 0..duration {
            self.ctx.set_tick(tick)?;
            self.run_tick()?;
            self.sample(tick);
            debug!(
                tick,
                max_in_order = ?self.max_in_order,
                link_q = self.link.queue_len(),
                delay_box = self.delay_box.len(),
                "tick 完成"
            );
        }
        self.host.shutdown_hook(&mut self.ctx);

        let stats = self.link.stats();
        info!(
            ticks = duration,
            max_in_order = ?self.max_in_order,
            overflow_drops = stats.overflow_drops,
            random_drops = stats.random_drops,
            "✅ 仿真完成"
        );
        Ok(())
    }

    /// 汇总本次运行（配置、统计、时间序列与事件日志）
    pub fn report(&self, config: &SimConfig) -> RunReport {
        RunReport {
            config: config.clone(),
            protocol: self.host.name().to_string(),
            max_in_order: self.max_in_order,
            link: self.link.stats().clone(),
            host: self.host.stats().clone(),
            samples: self.samples.clone(),
            events: self.ctx.log().events().to_vec(),
        }
    }
}
