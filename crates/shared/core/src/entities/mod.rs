mod confluence;
mod derived;
mod reading;
mod record;
mod signal_type;
mod zones;

pub use confluence::{ConfluenceResult, Recommendation, SlopeDirection, TimeframeConfluence};
pub use derived::DerivedSignal;
pub use reading::Reading;
pub use record::SignalRecord;
pub use signal_type::{SignalSide, SignalTier, SignalType};
pub use zones::{BbwpClass, FibZone};
