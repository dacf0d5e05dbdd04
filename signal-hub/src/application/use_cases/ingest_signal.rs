use crate::application::ports::{Clock, SignalRepository, StoreError};
use crate::domain::{
    DerivedSignal, SignalRecord, SignalType, Timestamp, WebhookEvent, parse_event_timestamp,
};
use jewel_signals::derive;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// Body keys holding credentials; never persisted
const CREDENTIAL_KEYS: [&str; 2] = ["secret", "token"];

const DEFAULT_EVENT_SOURCE: &str = "tradingview";

#[derive(Debug, Clone)]
pub struct IngestSignalCommand {
    /// Decoded JSON body, as received
    pub payload: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngestSignalResult {
    pub id: Uuid,
    pub symbol: Option<String>,
    pub timeframe: String,
    pub signal_type: Option<SignalType>,
    pub perfect_setup: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error(transparent)]
    StorageUnavailable(#[from] StoreError),
}

/// Validates an alert, runs the derivation engine and appends one record
pub struct IngestSignalUseCase<R, C>
where
    R: SignalRepository + ?Sized,
    C: Clock + ?Sized,
{
    repo: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> IngestSignalUseCase<R, C>
where
    R: SignalRepository + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(repo: Arc<R>, clock: Arc<C>) -> Self {
        Self { repo, clock }
    }

    pub async fn execute(
        &self,
        command: IngestSignalCommand,
    ) -> Result<IngestSignalResult, IngestError> {
        let received_at = self.clock.now();

        let Value::Object(mut body) = command.payload else {
            return Err(IngestError::InvalidPayload(
                "body must be a JSON object".to_string(),
            ));
        };

        let event: WebhookEvent = serde_json::from_value(Value::Object(body.clone()))
            .map_err(|e| IngestError::InvalidPayload(e.to_string()))?;

        let timeframe = event.timeframe.clone().ok_or_else(|| {
            IngestError::InvalidPayload("timeframe is required".to_string())
        })?;
        let timeframe_minutes = event
            .timeframe_minutes
            .filter(|minutes| *minutes != 0.0)
            .ok_or_else(|| {
                IngestError::InvalidPayload(
                    "timeframeMinutes must be a non-zero number of minutes".to_string(),
                )
            })?;

        let timestamp = parse_event_timestamp(event.timestamp.as_ref(), received_at)
            .map_err(IngestError::InvalidTimestamp)?;

        info!(
            symbol = event.symbol.as_deref().unwrap_or("-"),
            timeframe = %timeframe,
            timeframe_minutes,
            upstream_signal = event.upstream_signal_type().map(SignalType::as_str),
            "Webhook received"
        );

        let derived = derive(&event.reading());
        debug!(
            buy_score = derived.buy_score,
            sell_score = derived.sell_score,
            compression_range = derived.compression_range,
            "Reading derived"
        );

        for key in CREDENTIAL_KEYS {
            body.remove(key);
        }

        let record = build_record(
            &event,
            &derived,
            timeframe,
            timeframe_minutes,
            timestamp,
            received_at,
            Value::Object(body),
        );

        let symbol = record.symbol.clone();
        let timeframe = record.timeframe.clone();
        let signal_type = record.signal_type.clone();
        let perfect_setup = record.is_perfect_setup();

        let id = self.repo.append(record).await?;

        if perfect_setup {
            info!(
                %id,
                symbol = symbol.as_deref().unwrap_or("-"),
                timeframe = %timeframe,
                "Perfect setup detected"
            );
        }
        info!(%id, "Signal saved");

        Ok(IngestSignalResult {
            id,
            symbol,
            timeframe,
            signal_type,
            perfect_setup,
        })
    }
}

/// Map an alert and its derivation onto the persisted record
///
/// Derived values win. When the reading could not be scored the charting
/// script's own compression figures and scores are kept instead.
pub fn build_record(
    event: &WebhookEvent,
    derived: &DerivedSignal,
    timeframe: String,
    timeframe_minutes: f64,
    timestamp: Timestamp,
    received_at: Timestamp,
    raw_payload: Value,
) -> SignalRecord {
    let ohlc = event.ohlc.clone().unwrap_or_default();
    let jewel = event.jewel.clone().unwrap_or_default();
    let bbwp = event.bbwp.clone().unwrap_or_default();
    let gaussian = event.gaussian.clone().unwrap_or_default();
    let slope = event.slope.clone().unwrap_or_default();
    let signal = event.signal.clone().unwrap_or_default();
    let compression = event.compression.clone().unwrap_or_default();

    let upstream_direction = event.direction.clone().map(SignalType::from);
    let direction = derived
        .signal_type
        .clone()
        .or_else(|| upstream_direction.clone())
        .or_else(|| signal.signal_type.clone());
    let signal_type = derived
        .signal_type
        .clone()
        .or_else(|| signal.signal_type.clone())
        .or(upstream_direction);

    let mut record = SignalRecord {
        id: Uuid::new_v4(),
        event_source: event
            .event_source
            .clone()
            .unwrap_or_else(|| DEFAULT_EVENT_SOURCE.to_string()),
        symbol: event.symbol.clone(),
        ticker: event.ticker.clone().or_else(|| event.symbol.clone()),
        direction: direction.map(String::from),
        price: event.price,
        timestamp,
        timeframe,
        timeframe_minutes,
        ohlc_open: ohlc.open,
        ohlc_high: ohlc.high,
        ohlc_low: ohlc.low,
        ohlc_close: ohlc.close,
        ohlc_volume: ohlc.volume,
        jewel_fast: jewel.fast,
        jewel_slow: jewel.slow,
        jewel_high: jewel.high,
        jewel_fib: jewel.fib,
        bbwp_value: derived.bbwp_value.or(bbwp.value),
        bbwp_classification: derived
            .bbwp_classification
            .map(|class| class.label().to_string())
            .or(bbwp.classification),
        gaussian_filter: gaussian.filter,
        gaussian_price_position: gaussian.price_position,
        gaussian_above_filter: gaussian.above_filter,
        compression_total_range: compression.total_range,
        compression_center: compression.center,
        compression_fib_zone: compression.fib_zone,
        compression_nearest_fib_level: compression.nearest_fib_level,
        compression_fib_cutting: compression.fib_cutting.or(Some(derived.fib_cutting)),
        compression_extreme_compression: compression.extreme_compression,
        compression_perfect_setup: compression.perfect_setup,
        slope_fast: slope.fast,
        slope_slow: slope.slow,
        signal_type,
        signal_strength: derived.signal_strength.or(signal.strength),
        signal_buy_score: derived.buy_score.or(signal.buy_score),
        signal_sell_score: derived.sell_score.or(signal.sell_score),
        raw_payload,
        received_at,
    };

    if derived.is_scored() {
        record.compression_total_range = derived.compression_range;
        record.compression_center = derived.compression_center;
        record.compression_fib_zone = derived.fib_zone.map(|zone| zone.label().to_string());
        record.compression_nearest_fib_level = Some(derived.nearest_fib_level);
        record.compression_fib_cutting = Some(derived.fib_cutting);
        record.compression_extreme_compression = Some(derived.extreme_compression);
        record.compression_perfect_setup = Some(derived.perfect_setup);
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemorySignalRepository;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use jewel_clock::FixedClock;
    use jewel_ports::StoreResult;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn received() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 6, 2, 14, 0, 0).unwrap()
    }

    fn setup() -> (
        Arc<InMemorySignalRepository>,
        IngestSignalUseCase<InMemorySignalRepository, FixedClock>,
    ) {
        let repo = Arc::new(InMemorySignalRepository::new());
        let clock = Arc::new(FixedClock::at(received()));
        let use_case = IngestSignalUseCase::new(Arc::clone(&repo), clock);
        (repo, use_case)
    }

    fn command(payload: Value) -> IngestSignalCommand {
        IngestSignalCommand { payload }
    }

    struct FailingRepository;

    #[async_trait]
    impl SignalRepository for FailingRepository {
        async fn append(&self, _record: SignalRecord) -> StoreResult<Uuid> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn latest(
            &self,
            _symbol: &str,
            _timeframe: &str,
            _since: Timestamp,
        ) -> StoreResult<Option<SignalRecord>> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_ingest_scores_and_persists() {
        let (repo, use_case) = setup();

        let result = use_case
            .execute(command(json!({
                "symbol": "BTCUSDT",
                "timeframe": "15m",
                "timeframeMinutes": 15,
                "timestamp": "2025-06-02T13:45:00Z",
                "price": "97250.5",
                "jewel": { "fast": 30, "slow": 28, "high": 25, "fib": 27 },
                "bbwp": { "value": 15 },
                "slope": { "fast": 0.7 }
            })))
            .await
            .unwrap();

        assert_eq!(result.symbol.as_deref(), Some("BTCUSDT"));
        assert_eq!(result.timeframe, "15m");
        assert_eq!(result.signal_type, Some(SignalType::UltraBuy));
        assert!(!result.perfect_setup);

        let stored = repo.get(result.id).unwrap();
        assert_eq!(stored.timestamp, received() - Duration::minutes(15));
        assert_eq!(stored.received_at, received());
        assert_eq!(stored.price, Some(dec!(97250.5)));
        assert_eq!(stored.compression_total_range, Some(5.0));
        assert_eq!(stored.compression_fib_zone.as_deref(), Some("Low"));
        assert_eq!(stored.compression_fib_cutting, Some(true));
        assert_eq!(stored.compression_extreme_compression, Some(false));
        assert_eq!(stored.signal_buy_score, Some(75));
        assert_eq!(stored.signal_sell_score, Some(40));
        assert_eq!(stored.signal_strength, Some(4));
        assert_eq!(stored.direction.as_deref(), Some("ULTRA_BUY"));
        assert_eq!(stored.bbwp_classification.as_deref(), Some("Extreme Low"));
        assert_eq!(stored.event_source, "tradingview");
        assert_eq!(stored.ticker.as_deref(), Some("BTCUSDT"));
    }

    #[tokio::test]
    async fn test_perfect_setup_is_reported() {
        let (_repo, use_case) = setup();

        let result = use_case
            .execute(command(json!({
                "symbol": "ETHUSDT",
                "timeframe": "2h",
                "timeframeMinutes": "120",
                "jewel": { "fast": 22, "slow": 20, "high": 19 }
            })))
            .await
            .unwrap();

        assert!(result.perfect_setup);
    }

    #[tokio::test]
    async fn test_unscored_reading_keeps_upstream_figures() {
        let (repo, use_case) = setup();

        let result = use_case
            .execute(command(json!({
                "symbol": "SOLUSDT",
                "timeframe": "4h",
                "timeframeMinutes": 240,
                "jewel": { "fast": 30, "high": 25 },
                "compression": {
                    "totalRange": 3.2,
                    "center": 18.5,
                    "fibZone": "Extreme Low",
                    "perfectSetup": true
                },
                "signal": { "type": "STRONG_BUY", "strength": 3, "buyScore": 55, "sellScore": 10 }
            })))
            .await
            .unwrap();

        assert_eq!(result.signal_type, Some(SignalType::StrongBuy));
        assert!(result.perfect_setup);

        let stored = repo.get(result.id).unwrap();
        assert_eq!(stored.compression_total_range, Some(3.2));
        assert_eq!(stored.compression_center, Some(18.5));
        assert_eq!(stored.compression_fib_zone.as_deref(), Some("Extreme Low"));
        assert_eq!(stored.compression_fib_cutting, Some(false));
        assert_eq!(stored.signal_strength, Some(3));
        assert_eq!(stored.signal_buy_score, Some(55));
        assert_eq!(stored.signal_sell_score, Some(10));
    }

    #[tokio::test]
    async fn test_direction_fills_in_missing_label() {
        let (repo, use_case) = setup();

        let result = use_case
            .execute(command(json!({
                "symbol": "BTCUSDT",
                "ticker": "BINANCE:BTCUSDT",
                "event_source": "manual",
                "direction": "LONG",
                "timeframe": "15m",
                "timeframeMinutes": 15
            })))
            .await
            .unwrap();

        assert_eq!(result.signal_type, Some(SignalType::from("LONG")));
        let stored = repo.get(result.id).unwrap();
        assert_eq!(stored.direction.as_deref(), Some("LONG"));
        assert_eq!(stored.ticker.as_deref(), Some("BINANCE:BTCUSDT"));
        assert_eq!(stored.event_source, "manual");
        assert_eq!(stored.timestamp, received());
    }

    #[tokio::test]
    async fn test_credentials_are_not_persisted() {
        let (repo, use_case) = setup();

        let result = use_case
            .execute(command(json!({
                "symbol": "BTCUSDT",
                "timeframe": "15m",
                "timeframeMinutes": 15,
                "secret": "hunter2",
                "token": "hunter2"
            })))
            .await
            .unwrap();

        let stored = repo.get(result.id).unwrap();
        assert!(stored.raw_payload.get("secret").is_none());
        assert!(stored.raw_payload.get("token").is_none());
        assert_eq!(stored.raw_payload["symbol"], "BTCUSDT");
    }

    #[tokio::test]
    async fn test_rejects_non_object_body() {
        let (repo, use_case) = setup();

        for payload in [json!([1, 2]), json!("text"), json!(null)] {
            let err = use_case.execute(command(payload)).await.unwrap_err();
            assert!(matches!(err, IngestError::InvalidPayload(_)));
        }
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_missing_timeframe_fields() {
        let (repo, use_case) = setup();

        for payload in [
            json!({ "symbol": "BTCUSDT", "timeframeMinutes": 15 }),
            json!({ "symbol": "BTCUSDT", "timeframe": "", "timeframeMinutes": 15 }),
            json!({ "symbol": "BTCUSDT", "timeframe": "15m" }),
            json!({ "symbol": "BTCUSDT", "timeframe": "15m", "timeframeMinutes": 0 }),
            json!({ "symbol": "BTCUSDT", "timeframe": "15m", "timeframeMinutes": "fifteen" }),
        ] {
            let err = use_case.execute(command(payload)).await.unwrap_err();
            assert!(matches!(err, IngestError::InvalidPayload(_)), "{err}");
        }
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_bad_timestamp() {
        let (repo, use_case) = setup();

        let err = use_case
            .execute(command(json!({
                "timeframe": "15m",
                "timeframeMinutes": 15,
                "timestamp": "not a date"
            })))
            .await
            .unwrap_err();

        assert!(matches!(err, IngestError::InvalidTimestamp(_)));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let use_case = IngestSignalUseCase::new(
            Arc::new(FailingRepository),
            Arc::new(FixedClock::at(received())),
        );

        let err = use_case
            .execute(command(json!({ "timeframe": "15m", "timeframeMinutes": 15 })))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            IngestError::StorageUnavailable(StoreError::Unavailable(
                "connection refused".to_string()
            ))
        );
    }
}
