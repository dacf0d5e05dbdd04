//! Inbound TradingView alert
//!
//! Every field is optional at this level. Required-field checks belong to the
//! ingestion use case so that it can report which field was missing.

use super::lenient;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use jewel_core::{Reading, SignalType, Timestamp};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OhlcPayload {
    #[serde(default, deserialize_with = "lenient::decimal_opt")]
    pub open: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal_opt")]
    pub high: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal_opt")]
    pub low: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal_opt")]
    pub close: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal_opt")]
    pub volume: Option<Decimal>,
}

/// The three jewel oscillator lines plus the fib line
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JewelPayload {
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub fast: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub slow: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub high: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub fib: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BbwpPayload {
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub value: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub classification: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaussianPayload {
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub filter: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub price_position: Option<f64>,
    #[serde(default, deserialize_with = "lenient::bool_opt")]
    pub above_filter: Option<bool>,
}

/// Compression figures as computed by the charting script
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionPayload {
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub total_range: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub center: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub fib_zone: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub nearest_fib_level: Option<f64>,
    #[serde(default, deserialize_with = "lenient::bool_opt")]
    pub fib_cutting: Option<bool>,
    #[serde(default, deserialize_with = "lenient::bool_opt")]
    pub extreme_compression: Option<bool>,
    #[serde(default, deserialize_with = "lenient::bool_opt")]
    pub perfect_setup: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SlopePayload {
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub fast: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub slow: Option<f64>,
}

/// Label and scores computed upstream
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalPayload {
    #[serde(default, rename = "type", deserialize_with = "lenient::signal_type_opt")]
    pub signal_type: Option<SignalType>,
    #[serde(default, deserialize_with = "lenient::small_uint_opt")]
    pub strength: Option<u8>,
    #[serde(default, deserialize_with = "lenient::score_opt")]
    pub buy_score: Option<u8>,
    #[serde(default, deserialize_with = "lenient::score_opt")]
    pub sell_score: Option<u8>,
}

/// One alert as posted by the charting platform
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub ticker: Option<String>,
    #[serde(
        default,
        rename = "event_source",
        alias = "eventSource",
        deserialize_with = "lenient::string_opt"
    )]
    pub event_source: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub direction: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal_opt")]
    pub price: Option<Decimal>,
    /// Kept raw; resolved by [`parse_event_timestamp`]
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub timeframe: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub timeframe_minutes: Option<f64>,

    #[serde(default, deserialize_with = "lenient::group_opt")]
    pub ohlc: Option<OhlcPayload>,
    #[serde(default, deserialize_with = "lenient::group_opt")]
    pub jewel: Option<JewelPayload>,
    #[serde(default, deserialize_with = "lenient::group_opt")]
    pub bbwp: Option<BbwpPayload>,
    #[serde(default, deserialize_with = "lenient::group_opt")]
    pub gaussian: Option<GaussianPayload>,
    #[serde(default, deserialize_with = "lenient::group_opt")]
    pub compression: Option<CompressionPayload>,
    #[serde(default, deserialize_with = "lenient::group_opt")]
    pub slope: Option<SlopePayload>,
    #[serde(default, deserialize_with = "lenient::group_opt")]
    pub signal: Option<SignalPayload>,
}

impl WebhookEvent {
    /// Derivation input: jewel lines, bbwp, fast slope, and the upstream label
    pub fn reading(&self) -> Reading {
        let jewel = self.jewel.clone().unwrap_or_default();
        let signal = self.signal.clone().unwrap_or_default();
        Reading {
            fast: jewel.fast,
            slow: jewel.slow,
            high: jewel.high,
            fib: jewel.fib,
            bbwp: self.bbwp.as_ref().and_then(|b| b.value),
            slope_fast: self.slope.as_ref().and_then(|s| s.fast),
            prior_signal_type: signal.signal_type,
            prior_signal_strength: signal.strength,
        }
    }

    pub fn upstream_signal_type(&self) -> Option<&SignalType> {
        self.signal.as_ref().and_then(|s| s.signal_type.as_ref())
    }
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn from_millis(ms: f64) -> Option<Timestamp> {
    if !ms.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(ms.round() as i64)
}

fn parse_text(raw: &str) -> Option<Timestamp> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    raw.parse::<f64>().ok().and_then(from_millis)
}

/// Resolve the event time
///
/// A missing, null or empty timestamp means "now" and resolves to
/// `received_at`. Numbers are unix milliseconds. Naive date-times are UTC.
pub fn parse_event_timestamp(
    raw: Option<&Value>,
    received_at: Timestamp,
) -> Result<Timestamp, String> {
    match raw {
        None | Some(Value::Null) => Ok(received_at),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(received_at),
        Some(Value::String(s)) => {
            parse_text(s.trim()).ok_or_else(|| format!("unrecognised timestamp '{}'", s))
        }
        Some(Value::Number(n)) => n
            .as_f64()
            .and_then(from_millis)
            .ok_or_else(|| format!("timestamp {} is out of range", n)),
        Some(other) => Err(format!("timestamp must be a string or number, got {}", other)),
    }
}
