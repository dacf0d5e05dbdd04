use jewel_core::Timestamp;

/// Port for time abstraction
///
/// Ingestion stamps `received_at` and fills missing event timestamps from
/// this clock; confluence queries derive their lookback window and record
/// ages from it. Production uses wall time, tests use a fixed clock.
pub trait Clock: Send + Sync {
    /// Get the current time according to this clock
    fn now(&self) -> Timestamp;

    /// Get the clock's name/identifier for debugging
    fn name(&self) -> &str {
        "Clock"
    }
}
