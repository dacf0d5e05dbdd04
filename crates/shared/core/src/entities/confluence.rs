use super::SignalRecord;
use crate::values::Symbol;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of the fast slope on a stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlopeDirection {
    Bullish,
    Bearish,
    Neutral,
}

/// Recommendation tier derived from the fused confluence score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "STRONG BUY CONFLUENCE")]
    StrongBuy,
    #[serde(rename = "MODERATE CONFLUENCE")]
    Moderate,
    #[serde(rename = "WEAK CONFLUENCE")]
    Weak,
}

impl Recommendation {
    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "STRONG BUY CONFLUENCE",
            Recommendation::Moderate => "MODERATE CONFLUENCE",
            Recommendation::Weak => "WEAK CONFLUENCE",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-timeframe breakdown inside a confluence result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeframeConfluence {
    /// Latest stored record for this timeframe
    pub signal: SignalRecord,
    pub compressed: bool,
    pub extreme_zone: bool,
    pub slope_direction: SlopeDirection,
    pub age_minutes: i64,
    /// Display form of the age, e.g. "12 min ago"
    pub age: String,
    /// Contribution of this timeframe to the fused score (0..=85)
    pub score: u32,
}

/// Multi-timeframe confluence for one symbol. Computed per query, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfluenceResult {
    pub symbol: Symbol,
    /// Active timeframes only, in the order they were requested
    pub timeframes: IndexMap<String, TimeframeConfluence>,
    pub confluence_score: u32,
    pub active_timeframes: usize,
    pub recommendation: Recommendation,
}

impl ConfluenceResult {
    pub fn empty(symbol: impl Into<Symbol>) -> Self {
        ConfluenceResult {
            symbol: symbol.into(),
            timeframes: IndexMap::new(),
            confluence_score: 0,
            active_timeframes: 0,
            recommendation: Recommendation::Weak,
        }
    }
}
