use chrono::{Duration, Utc};
use jewel_core::Timestamp;
use jewel_ports::Clock;
use parking_lot::RwLock;

/// Clock frozen at a settable instant
///
/// Time only changes through [`FixedClock::advance`] or [`FixedClock::set`],
/// which makes record ages and lookback windows reproducible in tests.
#[derive(Debug)]
pub struct FixedClock {
    current: RwLock<Timestamp>,
}

impl FixedClock {
    /// Create a clock frozen at `time`
    pub fn at(time: Timestamp) -> Self {
        FixedClock {
            current: RwLock::new(time),
        }
    }

    /// Create a clock frozen at the current wall time
    pub fn now_frozen() -> Self {
        Self::at(Utc::now())
    }

    pub fn advance(&self, duration: Duration) {
        let mut current = self.current.write();
        *current += duration;
    }

    pub fn set(&self, time: Timestamp) {
        *self.current.write() = time;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.current.read()
    }

    fn name(&self) -> &str {
        "FixedClock"
    }
}
