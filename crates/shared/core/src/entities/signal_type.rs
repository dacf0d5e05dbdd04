use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a freshly classified signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalSide {
    Buy,
    Sell,
}

/// Conviction tier of a freshly classified signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SignalTier {
    Plain,
    Strong,
    Ultra,
    God,
}

impl SignalTier {
    /// Signal strength reported alongside the label (2..=5)
    pub fn strength(&self) -> u8 {
        match self {
            SignalTier::Plain => 2,
            SignalTier::Strong => 3,
            SignalTier::Ultra => 4,
            SignalTier::God => 5,
        }
    }
}

/// Trade signal label
///
/// The eight fresh labels are produced by the derivation engine. Any other
/// label received from upstream is kept verbatim in `External` so it can be
/// passed through and persisted unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SignalType {
    GodBuy,
    UltraBuy,
    StrongBuy,
    Buy,
    Sell,
    StrongSell,
    UltraSell,
    GodSell,
    External(String),
}

impl SignalType {
    /// Build a fresh label from a side and tier
    pub fn fresh(side: SignalSide, tier: SignalTier) -> Self {
        match (side, tier) {
            (SignalSide::Buy, SignalTier::God) => SignalType::GodBuy,
            (SignalSide::Buy, SignalTier::Ultra) => SignalType::UltraBuy,
            (SignalSide::Buy, SignalTier::Strong) => SignalType::StrongBuy,
            (SignalSide::Buy, SignalTier::Plain) => SignalType::Buy,
            (SignalSide::Sell, SignalTier::God) => SignalType::GodSell,
            (SignalSide::Sell, SignalTier::Ultra) => SignalType::UltraSell,
            (SignalSide::Sell, SignalTier::Strong) => SignalType::StrongSell,
            (SignalSide::Sell, SignalTier::Plain) => SignalType::Sell,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SignalType::GodBuy => "GOD_BUY",
            SignalType::UltraBuy => "ULTRA_BUY",
            SignalType::StrongBuy => "STRONG_BUY",
            SignalType::Buy => "BUY",
            SignalType::Sell => "SELL",
            SignalType::StrongSell => "STRONG_SELL",
            SignalType::UltraSell => "ULTRA_SELL",
            SignalType::GodSell => "GOD_SELL",
            SignalType::External(label) => label,
        }
    }

    /// True when the label contains "BUY" (case-sensitive), upstream labels included
    pub fn is_buy(&self) -> bool {
        self.as_str().contains("BUY")
    }
}

impl From<String> for SignalType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "GOD_BUY" => SignalType::GodBuy,
            "ULTRA_BUY" => SignalType::UltraBuy,
            "STRONG_BUY" => SignalType::StrongBuy,
            "BUY" => SignalType::Buy,
            "SELL" => SignalType::Sell,
            "STRONG_SELL" => SignalType::StrongSell,
            "ULTRA_SELL" => SignalType::UltraSell,
            "GOD_SELL" => SignalType::GodSell,
            _ => SignalType::External(value),
        }
    }
}

impl From<&str> for SignalType {
    fn from(value: &str) -> Self {
        SignalType::from(value.to_string())
    }
}

impl From<SignalType> for String {
    fn from(value: SignalType) -> Self {
        match value {
            SignalType::External(label) => label,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
