//! Jewel Signals
//!
//! Pure signal computation, no async and no I/O:
//!
//! - [`derive`] turns one oscillator/volatility [`Reading`](jewel_core::Reading)
//!   into a classified [`DerivedSignal`](jewel_core::DerivedSignal)
//! - [`assess_timeframe`] and [`fuse`] score the latest stored record of each
//!   timeframe and combine them into a [`ConfluenceResult`](jewel_core::ConfluenceResult)
//!
//! All boundaries live in the static tables of [`thresholds`].

pub mod confluence;
pub mod derivation;
pub mod thresholds;

pub use confluence::{
    DEFAULT_LOOKBACK_MINUTES, DEFAULT_TIMEFRAMES, assess_timeframe, fuse, fused_score, recommend,
    timeframe_score,
};
pub use derivation::{Scores, classify, derive, nearest_fib_level};
pub use thresholds::{BandTable, Bound, SidePoints};
