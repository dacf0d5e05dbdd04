//! Ports used by the hub's use cases
//!
//! The traits live in the shared `jewel-ports` crate so that storage adapters
//! outside this binary can implement them.

pub use jewel_ports::{Clock, SignalRepository, StoreError, StoreResult};
