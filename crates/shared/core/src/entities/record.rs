use super::SignalType;
use crate::values::{Price, Symbol, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persisted signal record
///
/// One record per ingested event, keyed logically by
/// (symbol, timeframe, timestamp). Records are append-only: once written
/// they are never mutated. Field names follow the storage column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub id: Uuid,
    pub event_source: String,
    pub symbol: Option<Symbol>,
    pub ticker: Option<String>,
    pub direction: Option<String>,
    pub price: Option<Price>,
    pub timestamp: Timestamp,
    pub timeframe: String,
    pub timeframe_minutes: f64,

    // OHLC
    pub ohlc_open: Option<Price>,
    pub ohlc_high: Option<Price>,
    pub ohlc_low: Option<Price>,
    pub ohlc_close: Option<Price>,
    pub ohlc_volume: Option<Price>,

    // Jewel lines
    pub jewel_fast: Option<f64>,
    pub jewel_slow: Option<f64>,
    pub jewel_high: Option<f64>,
    pub jewel_fib: Option<f64>,

    // BBWP
    pub bbwp_value: Option<f64>,
    pub bbwp_classification: Option<String>,

    // Gaussian filter
    pub gaussian_filter: Option<f64>,
    pub gaussian_price_position: Option<f64>,
    pub gaussian_above_filter: Option<bool>,

    // Compression
    pub compression_total_range: Option<f64>,
    pub compression_center: Option<f64>,
    pub compression_fib_zone: Option<String>,
    pub compression_nearest_fib_level: Option<f64>,
    pub compression_fib_cutting: Option<bool>,
    pub compression_extreme_compression: Option<bool>,
    pub compression_perfect_setup: Option<bool>,

    // Slope
    pub slope_fast: Option<f64>,
    pub slope_slow: Option<f64>,

    // Signal
    pub signal_type: Option<SignalType>,
    pub signal_strength: Option<u8>,
    pub signal_buy_score: Option<u8>,
    pub signal_sell_score: Option<u8>,

    /// Inbound event as received, minus credentials
    pub raw_payload: serde_json::Value,
    pub received_at: Timestamp,
}

impl SignalRecord {
    /// Minimal record for a symbol/timeframe; every optional column empty
    pub fn new(
        symbol: impl Into<Symbol>,
        timeframe: impl Into<String>,
        timeframe_minutes: f64,
        timestamp: Timestamp,
    ) -> Self {
        let symbol = symbol.into();
        SignalRecord {
            id: Uuid::new_v4(),
            event_source: "tradingview".to_string(),
            ticker: Some(symbol.clone()),
            symbol: Some(symbol),
            direction: None,
            price: None,
            timestamp,
            timeframe: timeframe.into(),
            timeframe_minutes,
            ohlc_open: None,
            ohlc_high: None,
            ohlc_low: None,
            ohlc_close: None,
            ohlc_volume: None,
            jewel_fast: None,
            jewel_slow: None,
            jewel_high: None,
            jewel_fib: None,
            bbwp_value: None,
            bbwp_classification: None,
            gaussian_filter: None,
            gaussian_price_position: None,
            gaussian_above_filter: None,
            compression_total_range: None,
            compression_center: None,
            compression_fib_zone: None,
            compression_nearest_fib_level: None,
            compression_fib_cutting: None,
            compression_extreme_compression: None,
            compression_perfect_setup: None,
            slope_fast: None,
            slope_slow: None,
            signal_type: None,
            signal_strength: None,
            signal_buy_score: None,
            signal_sell_score: None,
            raw_payload: serde_json::Value::Null,
            received_at: timestamp,
        }
    }

    pub fn is_perfect_setup(&self) -> bool {
        self.compression_perfect_setup.unwrap_or(false)
    }

    /// True when this record belongs to the given symbol and timeframe
    pub fn matches(&self, symbol: &str, timeframe: &str) -> bool {
        self.symbol.as_deref() == Some(symbol) && self.timeframe == timeframe
    }
}
