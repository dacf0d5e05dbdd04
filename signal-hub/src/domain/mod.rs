//! Domain layer
//!
//! Signal entities live in the shared `jewel-core` crate; this module adds the
//! inbound vendor event shape and its lenient field decoding.

mod lenient;
pub mod webhook;

pub use jewel_core::{
    BbwpClass, ConfluenceResult, DerivedSignal, FibZone, Price, Reading, Recommendation,
    SignalRecord, SignalType, SlopeDirection, Symbol, TimeframeConfluence, Timestamp,
};
pub use jewel_ports::Clock;
pub use webhook::{
    BbwpPayload, CompressionPayload, GaussianPayload, JewelPayload, OhlcPayload, SignalPayload,
    SlopePayload, WebhookEvent, parse_event_timestamp,
};
