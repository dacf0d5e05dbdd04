//! Jewel Core Domain
//!
//! Pure domain types for the Jewel signal service: oscillator readings,
//! derived signals, persisted signal records and confluence results.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    BbwpClass, ConfluenceResult, DerivedSignal, FibZone, Reading, Recommendation, SignalRecord,
    SignalSide, SignalTier, SignalType, SlopeDirection, TimeframeConfluence,
};
pub use values::{Price, Symbol, Timestamp};
