//! Jewel Ports
//!
//! Port definitions (traits) for the Jewel signal service.
//! These define the boundaries between the signal engine and infrastructure:
//! where time comes from and where signal records are stored.

mod clock;
mod error;
mod signal_repository;

pub use clock::Clock;
pub use error::{StoreError, StoreResult};
pub use signal_repository::SignalRepository;
