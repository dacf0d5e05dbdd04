use serde::{Deserialize, Serialize};
use std::fmt;

/// Zone of the compression center on the 0-100 oscillator scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FibZone {
    #[serde(rename = "Extreme Low")]
    ExtremeLow,
    #[serde(rename = "Low")]
    Low,
    #[serde(rename = "Mid")]
    Mid,
    #[serde(rename = "High")]
    High,
    #[serde(rename = "Extreme High")]
    ExtremeHigh,
}

impl FibZone {
    pub fn label(&self) -> &'static str {
        match self {
            FibZone::ExtremeLow => "Extreme Low",
            FibZone::Low => "Low",
            FibZone::Mid => "Mid",
            FibZone::High => "High",
            FibZone::ExtremeHigh => "Extreme High",
        }
    }
}

impl fmt::Display for FibZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bollinger Band Width Percentile classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BbwpClass {
    #[serde(rename = "Extreme Low")]
    ExtremeLow,
    #[serde(rename = "Low")]
    Low,
    #[serde(rename = "Normal")]
    Normal,
    #[serde(rename = "High")]
    High,
    #[serde(rename = "Extreme High")]
    ExtremeHigh,
}

impl BbwpClass {
    pub fn label(&self) -> &'static str {
        match self {
            BbwpClass::ExtremeLow => "Extreme Low",
            BbwpClass::Low => "Low",
            BbwpClass::Normal => "Normal",
            BbwpClass::High => "High",
            BbwpClass::ExtremeHigh => "Extreme High",
        }
    }
}

impl fmt::Display for BbwpClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
