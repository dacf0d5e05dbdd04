use super::{BbwpClass, FibZone, SignalType};
use serde::{Deserialize, Serialize};

/// Result of running the derivation engine over a single reading
///
/// Compression and score fields are `None` when the reading lacked one of
/// the three jewel lines; in that case only the BBWP classification and a
/// passed-through upstream label can be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedSignal {
    pub compression_range: Option<f64>,
    pub compression_center: Option<f64>,
    pub fib_zone: Option<FibZone>,
    pub nearest_fib_level: f64,
    pub buy_score: Option<u8>,
    pub sell_score: Option<u8>,
    pub signal_type: Option<SignalType>,
    pub signal_strength: Option<u8>,
    pub fib_cutting: bool,
    pub bbwp_value: Option<f64>,
    pub bbwp_classification: Option<BbwpClass>,
    pub extreme_compression: bool,
    pub perfect_setup: bool,
}

impl DerivedSignal {
    /// True when the engine had all three lines and computed scores
    pub fn is_scored(&self) -> bool {
        self.buy_score.is_some() && self.sell_score.is_some()
    }
}
