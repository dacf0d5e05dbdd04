use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Price value - uses Decimal for precision (price and OHLC pass-through)
pub type Price = Decimal;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Symbol identifier as sent by the indicator feed (e.g. "BTCUSDT")
pub type Symbol = String;
