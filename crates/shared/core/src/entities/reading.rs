use super::SignalType;
use serde::{Deserialize, Serialize};

/// Raw oscillator/volatility reading fed to the derivation engine
///
/// The three jewel lines are optional here so that a partial vendor event can
/// still be represented; the engine decides what to do when one is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub fast: Option<f64>,
    pub slow: Option<f64>,
    pub high: Option<f64>,
    pub fib: Option<f64>,
    pub bbwp: Option<f64>,
    pub slope_fast: Option<f64>,
    /// Label computed upstream (e.g. by the charting script)
    pub prior_signal_type: Option<SignalType>,
    pub prior_signal_strength: Option<u8>,
}

impl Reading {
    /// Reading with just the three jewel lines set
    pub fn lines(fast: f64, slow: f64, high: f64) -> Self {
        Reading {
            fast: Some(fast),
            slow: Some(slow),
            high: Some(high),
            ..Default::default()
        }
    }

    pub fn with_fib(mut self, fib: f64) -> Self {
        self.fib = Some(fib);
        self
    }

    pub fn with_bbwp(mut self, bbwp: f64) -> Self {
        self.bbwp = Some(bbwp);
        self
    }

    pub fn with_slope(mut self, slope_fast: f64) -> Self {
        self.slope_fast = Some(slope_fast);
        self
    }

    pub fn with_prior(mut self, signal_type: impl Into<SignalType>, strength: Option<u8>) -> Self {
        self.prior_signal_type = Some(signal_type.into());
        self.prior_signal_strength = strength;
        self
    }

    /// The three jewel lines when all are present and finite
    pub fn jewel_lines(&self) -> Option<[f64; 3]> {
        match (self.fast, self.slow, self.high) {
            (Some(fast), Some(slow), Some(high))
                if fast.is_finite() && slow.is_finite() && high.is_finite() =>
            {
                Some([fast, slow, high])
            }
            _ => None,
        }
    }
}
