//! 主机网卡
//!
//! 两个独立的 FIFO 缓冲区：发送缓冲区（egress）和接收缓冲区（ingress）。
//! 主机只使用 `transmit`/`receive_all`；`pull_packets`/`push_packets` 是仿真器的搬运接口。

use super::Packet;
use crate::sim::SimContext;
use crate::viz::EventKind;

#[derive(Debug, Default)]
pub struct NetworkInterface {
    egress: Vec<Packet>,
    ingress: Vec<Packet>,
}

impl NetworkInterface {
    pub fn new() -> Self {
        Self::default()
    }

    /// 把报文放入发送缓冲区，本 tick 内由仿真器送上链路。
    pub fn transmit(&mut self, pkt: Packet, ctx: &mut SimContext) {
        let seq = pkt.sequence_number;
        ctx.record(if pkt.is_retransmission {
            EventKind::Retransmit { seq }
        } else {
            EventKind::Transmit { seq }
        });
        self.egress.push(pkt);
    }

    /// 取出接收缓冲区中的全部报文；调用后缓冲区为空。
    pub fn receive_all(&mut self, ctx: &mut SimContext) -> Vec<Packet> {
        let pkts = std::mem::take(&mut self.ingress);
        for pkt in &pkts {
            ctx.record(EventKind::Receive {
                seq: pkt.sequence_number,
            });
        }
        pkts
    }

    pub fn pending_egress(&self) -> usize {
        self.egress.len()
    }

    pub fn pending_ingress(&self) -> usize {
        self.ingress.len()
    }

    /// 仿真器专用：取走发送缓冲区
    pub(crate) fn pull_packets(&mut self) -> Vec<Packet> {
        std::mem::take(&mut self.egress)
    }

    /// 仿真器专用：向接收缓冲区追加报文
    pub(crate) fn push_packets(&mut self, pkts: impl IntoIterator<Item = Packet>) {
        self.ingress.extend(pkts);
    }
}
