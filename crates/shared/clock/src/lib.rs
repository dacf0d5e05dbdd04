//! Jewel Clock Infrastructure
//!
//! Time sources for the signal service:
//!
//! - [`SystemClock`] returns wall-clock time (production)
//! - [`FixedClock`] only moves when told to (deterministic tests)
//!
//! ```ignore
//! use jewel_clock::{Clock, FixedClock};
//! use chrono::Duration;
//!
//! let clock = FixedClock::at(start);
//! clock.advance(Duration::minutes(15));
//! assert_eq!(clock.now(), start + Duration::minutes(15));
//! ```

mod fixed;
mod system;

pub use fixed::FixedClock;
pub use system::SystemClock;

// Re-export the Clock trait for convenience
pub use jewel_ports::Clock;
