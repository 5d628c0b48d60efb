//! 固定大小的滑动窗口：最多 `W` 个报文在途，超时报文逐个独立重传。

use super::window::{WindowHost, WindowPolicy};
use super::TimeoutCalculator;

#[derive(Debug, Clone, Copy)]
pub struct FixedWindow {
    size: usize,
}

impl FixedWindow {
    pub fn new(size: usize) -> Self {
        Self { size }
    }
}

impl WindowPolicy for FixedWindow {
    fn name(&self) -> &'static str {
        "sliding-window"
    }

    fn window_size(&self) -> f64 {
        self.size as f64
    }

    fn capacity(&self) -> usize {
        self.size
    }
}

pub type SlidingWindowHost = WindowHost<FixedWindow>;

impl SlidingWindowHost {
    pub fn new(window_size: usize, rto: TimeoutCalculator) -> Self {
        WindowHost::with_policy(FixedWindow::new(window_size), rto)
    }
}
