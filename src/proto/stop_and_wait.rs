//! 停等协议：窗口固定为 1，在途报文被确认前不发送新报文。

use super::window::{WindowHost, WindowPolicy};
use super::TimeoutCalculator;

#[derive(Debug, Clone, Copy, Default)]
pub struct StopAndWait;

impl WindowPolicy for StopAndWait {
    fn name(&self) -> &'static str {
        "stop-and-wait"
    }

    fn window_size(&self) -> f64 {
        1.0
    }
}

pub type StopAndWaitHost = WindowHost<StopAndWait>;

impl StopAndWaitHost {
    pub fn new(rto: TimeoutCalculator) -> Self {
        WindowHost::with_policy(StopAndWait, rto)
    }
}
