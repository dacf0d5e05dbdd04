use chrono::Utc;
use jewel_core::Timestamp;
use jewel_ports::Clock;

/// Wall clock used by the running hub to stamp received alerts and to
/// anchor confluence lookback windows
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}
