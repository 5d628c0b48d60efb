use serde::{Deserialize, Serialize};

use crate::net::SeqNum;
use crate::sim::Tick;

const TICK_HEAD: &str = "Tick";
const TYPE_HEAD: &str = "Event Type";
const DESC_HEAD: &str = "Event Description";

/// 事件类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    /// 主机发送新报文
    Transmit { seq: SeqNum },
    /// 主机重传超时报文
    Retransmit { seq: SeqNum },
    /// 主机从接收缓冲区取出 ACK
    Receive { seq: SeqNum },
    /// 重复 ACK（已确认或已缓存），被忽略
    DuplicateAck { seq: SeqNum },
    /// 链路队列已满，尾丢弃
    BufferOverflow { seq: SeqNum },
    /// 链路出队时随机丢包
    RandomLoss { seq: SeqNum },
    /// inflight 报文超时
    Timeout { seq: SeqNum, age: Tick, timeout: u64 },
    /// AIMD 窗口缩小
    WindowShrink { old: f64, new: f64 },
    /// AIMD 窗口扩大
    WindowExpand { old: f64, new: f64 },
}

impl EventKind {
    /// `(tick, event_type, description)` 三元组中的 event_type。
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Transmit { .. } => "Transmit",
            EventKind::Retransmit { .. } => "Retransmit",
            EventKind::Receive { .. } => "Receive",
            EventKind::DuplicateAck { .. } => "Duplicate ACK",
            EventKind::BufferOverflow { .. } => "Buffer capacity exceeded",
            EventKind::RandomLoss { .. } => "Randomly dropping data in network",
            EventKind::Timeout { .. } => "Timeout",
            EventKind::WindowShrink { .. } => "Shrinking Window",
            EventKind::WindowExpand { .. } => "Expanding Window",
        }
    }

    pub fn description(&self) -> String {
        match self {
            EventKind::Transmit { seq }
            | EventKind::Retransmit { seq }
            | EventKind::Receive { seq }
            | EventKind::DuplicateAck { seq }
            | EventKind::RandomLoss { seq } => format!("Sequence number: {seq}"),
            EventKind::BufferOverflow { seq } => {
                format!("Dropping packet, Sequence number: {seq}")
            }
            EventKind::Timeout { seq, age, timeout } => {
                format!("Sequence number: {seq}, age: {age}, timeout: {timeout}")
            }
            EventKind::WindowShrink { old, new } | EventKind::WindowExpand { old, new } => {
                format!("Old: {old}, New: {new}")
            }
        }
    }
}

/// 一条日志事件；`tick` 为 `None` 表示时钟启动前记录。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub tick: Option<Tick>,
    #[serde(flatten)]
    pub kind: EventKind,
}

/// 只追加的事件日志（存内存，仿真结束后导出）
#[derive(Debug)]
pub struct EventLog {
    enabled: bool,
    events: Vec<LogEvent>,
}

impl Default for EventLog {
    fn default() -> Self {
        Self {
            enabled: true,
            events: Vec::new(),
        }
    }
}

impl EventLog {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            events: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn push(&mut self, ev: LogEvent) {
        if self.enabled {
            self.events.push(ev);
        }
    }

    pub fn events(&self) -> &[LogEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// 渲染为控制台表格：
    ///
    /// ```text
    /// ------------------------------------------
    /// | Tick | Event Type | Event Description |
    /// |------|------------|-------------------|
    /// |    0 |   Transmit | Sequence number: 0|
    /// ------------------------------------------
    /// ```
    pub fn render_table(&self) -> String {
        let rows: Vec<(String, &'static str, String)> = self
            .events
            .iter()
            .map(|ev| {
                let tick = ev.tick.map(|t| t.to_string()).unwrap_or_else(|| "-".into());
                (tick, ev.kind.label(), ev.kind.description())
            })
            .collect();

        let w_tick = rows.iter().map(|r| r.0.len()).fold(TICK_HEAD.len(), usize::max);
        let w_type = rows.iter().map(|r| r.1.len()).fold(TYPE_HEAD.len(), usize::max);
        let w_desc = rows.iter().map(|r| r.2.len()).fold(DESC_HEAD.len(), usize::max);
        let edge = "-".repeat(w_tick + w_type + w_desc + 10);

        let mut out = String::new();
        out.push_str(&edge);
        out.push('\n');
        out.push_str(&format!(
            "| {TICK_HEAD:<w_tick$} | {TYPE_HEAD:<w_type$} | {DESC_HEAD:<w_desc$} |\n"
        ));
        out.push_str(&format!(
            "|{}|{}|{}|\n",
            "-".repeat(w_tick + 2),
            "-".repeat(w_type + 2),
            "-".repeat(w_desc + 2)
        ));
        for (tick, ty, desc) in &rows {
            out.push_str(&format!("| {tick:>w_tick$} | {ty:>w_type$} | {desc:<w_desc$} |\n"));
        }
        out.push_str(&edge);
        out.push('\n');
        out
    }
}
