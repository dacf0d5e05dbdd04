use crate::application::ports::{Clock, SignalRepository, StoreError, StoreResult};
use crate::domain::{ConfluenceResult, SignalRecord, Timestamp};
use chrono::{DateTime, Duration, Utc};
use futures_util::future::join_all;
use indexmap::IndexMap;
use jewel_signals::{DEFAULT_LOOKBACK_MINUTES, DEFAULT_TIMEFRAMES, assess_timeframe, fuse};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct GetConfluenceQuery {
    pub symbol: String,
    /// Requested timeframe labels, in response order
    pub timeframes: Vec<String>,
    pub lookback_minutes: i64,
}

impl GetConfluenceQuery {
    /// Query over the default timeframes and lookback window
    pub fn new(symbol: impl Into<String>) -> Self {
        GetConfluenceQuery {
            symbol: symbol.into(),
            timeframes: DEFAULT_TIMEFRAMES.iter().map(|tf| tf.to_string()).collect(),
            lookback_minutes: DEFAULT_LOOKBACK_MINUTES,
        }
    }

    pub fn with_timeframes<I, S>(mut self, timeframes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.timeframes = timeframes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_lookback_minutes(mut self, minutes: i64) -> Self {
        self.lookback_minutes = minutes;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfluenceError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error(transparent)]
    StorageUnavailable(#[from] StoreError),
}

/// Reads the latest record per timeframe and fuses them into one score
pub struct GetConfluenceUseCase<R, C>
where
    R: SignalRepository + ?Sized,
    C: Clock + ?Sized,
{
    repo: Arc<R>,
    clock: Arc<C>,
    read_timeout: Option<std::time::Duration>,
}

impl<R, C> GetConfluenceUseCase<R, C>
where
    R: SignalRepository + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(repo: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repo,
            clock,
            read_timeout: None,
        }
    }

    /// Bound each per-timeframe read; a read that overruns counts as inactive
    pub fn with_read_timeout(mut self, timeout: Option<std::time::Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub async fn execute(
        &self,
        query: GetConfluenceQuery,
    ) -> Result<ConfluenceResult, ConfluenceError> {
        let symbol = query.symbol.trim().to_string();
        if symbol.is_empty() {
            return Err(ConfluenceError::InvalidQuery(
                "symbol is required".to_string(),
            ));
        }
        if query.lookback_minutes <= 0 {
            return Err(ConfluenceError::InvalidQuery(
                "lookbackMinutes must be positive".to_string(),
            ));
        }

        let mut timeframes: Vec<String> = Vec::with_capacity(query.timeframes.len());
        for tf in query.timeframes.iter().map(|tf| tf.trim()) {
            if !tf.is_empty() && !timeframes.iter().any(|seen| seen == tf) {
                timeframes.push(tf.to_string());
            }
        }
        if timeframes.is_empty() {
            return Err(ConfluenceError::InvalidQuery(
                "at least one timeframe is required".to_string(),
            ));
        }

        let now = self.clock.now();
        let since = window_start(now, query.lookback_minutes);

        let reads = timeframes
            .iter()
            .map(|tf| self.read_latest(&symbol, tf, since));
        let results = join_all(reads).await;

        let mut active = IndexMap::new();
        for (tf, result) in timeframes.into_iter().zip(results) {
            match result? {
                Some(record) => {
                    active.insert(tf, assess_timeframe(record, now));
                }
                None => debug!(symbol = %symbol, timeframe = %tf, "No recent signal"),
            }
        }

        let result = fuse(symbol, active);
        info!(
            symbol = %result.symbol,
            confluence_score = result.confluence_score,
            active_timeframes = result.active_timeframes,
            recommendation = %result.recommendation,
            "Confluence computed"
        );

        Ok(result)
    }

    async fn read_latest(
        &self,
        symbol: &str,
        timeframe: &str,
        since: Timestamp,
    ) -> StoreResult<Option<SignalRecord>> {
        let read = self.repo.latest(symbol, timeframe, since);
        let Some(limit) = self.read_timeout else {
            return read.await;
        };

        match tokio::time::timeout(limit, read).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    symbol,
                    timeframe,
                    timeout_ms = limit.as_millis() as u64,
                    "Signal read timed out, treating timeframe as inactive"
                );
                Ok(None)
            }
        }
    }
}

/// Start of the lookback window; windows reaching past the earliest
/// representable instant cover every stored record
fn window_start(now: Timestamp, lookback_minutes: i64) -> Timestamp {
    Duration::try_minutes(lookback_minutes)
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Recommendation, SignalType};
    use crate::infrastructure::InMemorySignalRepository;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use jewel_clock::FixedClock;
    use uuid::Uuid;

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 6, 2, 14, 0, 0).unwrap()
    }

    fn record(symbol: &str, timeframe: &str, minutes_ago: i64) -> SignalRecord {
        SignalRecord::new(symbol, timeframe, 15.0, now() - Duration::minutes(minutes_ago))
    }

    fn use_case(
        repo: &Arc<InMemorySignalRepository>,
    ) -> GetConfluenceUseCase<InMemorySignalRepository, FixedClock> {
        GetConfluenceUseCase::new(Arc::clone(repo), Arc::new(FixedClock::at(now())))
    }

    /// Sleeps on every read
    struct SlowRepository {
        inner: InMemorySignalRepository,
        delay: std::time::Duration,
    }

    #[async_trait]
    impl SignalRepository for SlowRepository {
        async fn append(&self, record: SignalRecord) -> StoreResult<Uuid> {
            self.inner.append(record).await
        }

        async fn latest(
            &self,
            symbol: &str,
            timeframe: &str,
            since: Timestamp,
        ) -> StoreResult<Option<SignalRecord>> {
            tokio::time::sleep(self.delay).await;
            self.inner.latest(symbol, timeframe, since).await
        }
    }

    struct FailingRepository;

    #[async_trait]
    impl SignalRepository for FailingRepository {
        async fn append(&self, _record: SignalRecord) -> StoreResult<Uuid> {
            Err(StoreError::Unavailable("timeout".to_string()))
        }

        async fn latest(
            &self,
            _symbol: &str,
            _timeframe: &str,
            _since: Timestamp,
        ) -> StoreResult<Option<SignalRecord>> {
            Err(StoreError::Unavailable("timeout".to_string()))
        }
    }

    #[tokio::test]
    async fn test_two_active_timeframes() {
        let repo = Arc::new(InMemorySignalRepository::new());

        let mut fifteen = record("BTCUSDT", "15m", 3);
        fifteen.compression_total_range = Some(3.0);
        fifteen.compression_center = Some(18.0);
        fifteen.signal_type = Some(SignalType::Buy);
        repo.append(fifteen).await.unwrap();

        let mut two_hour = record("BTCUSDT", "2h", 40);
        two_hour.compression_center = Some(85.0);
        two_hour.slope_fast = Some(2.0);
        two_hour.bbwp_value = Some(25.0);
        repo.append(two_hour).await.unwrap();

        let result = use_case(&repo)
            .execute(GetConfluenceQuery::new("BTCUSDT"))
            .await
            .unwrap();

        assert_eq!(result.active_timeframes, 2);
        assert_eq!(result.confluence_score, 53);
        assert_eq!(result.recommendation, Recommendation::Moderate);
        let labels: Vec<&String> = result.timeframes.keys().collect();
        assert_eq!(labels, ["15m", "2h"]);
        assert_eq!(result.timeframes["2h"].age, "40 min ago");
    }

    #[tokio::test]
    async fn test_huge_lookback_covers_everything() {
        let repo = Arc::new(InMemorySignalRepository::new());
        repo.append(record("BTCUSDT", "4h", 60 * 24 * 365 * 20))
            .await
            .unwrap();

        for lookback in [i64::MAX, 10_000_000_000_000, 525_600_000] {
            let result = use_case(&repo)
                .execute(
                    GetConfluenceQuery::new("BTCUSDT")
                        .with_timeframes(["4h"])
                        .with_lookback_minutes(lookback),
                )
                .await
                .unwrap();
            assert_eq!(result.active_timeframes, 1, "lookback {}", lookback);
        }
    }

    #[test]
    fn test_window_start_clamps_on_overflow() {
        assert_eq!(window_start(now(), 120), now() - Duration::minutes(120));
        assert_eq!(window_start(now(), i64::MAX), DateTime::<Utc>::MIN_UTC);
        assert_eq!(
            window_start(now(), 10_000_000_000_000),
            DateTime::<Utc>::MIN_UTC
        );
    }

    #[tokio::test]
    async fn test_latest_record_wins() {
        let repo = Arc::new(InMemorySignalRepository::new());

        let mut older = record("BTCUSDT", "15m", 30);
        older.signal_type = Some(SignalType::GodBuy);
        repo.append(older).await.unwrap();

        let mut newer = record("BTCUSDT", "15m", 5);
        newer.signal_type = Some(SignalType::Sell);
        repo.append(newer).await.unwrap();

        let result = use_case(&repo)
            .execute(GetConfluenceQuery::new("BTCUSDT").with_timeframes(["15m"]))
            .await
            .unwrap();

        let tf = &result.timeframes["15m"];
        assert_eq!(tf.signal.signal_type, Some(SignalType::Sell));
        assert_eq!(tf.age_minutes, 5);
    }

    #[tokio::test]
    async fn test_records_outside_lookback_are_ignored() {
        let repo = Arc::new(InMemorySignalRepository::new());
        repo.append(record("BTCUSDT", "4h", 121)).await.unwrap();
        repo.append(record("ETHUSDT", "15m", 1)).await.unwrap();

        let result = use_case(&repo)
            .execute(GetConfluenceQuery::new("BTCUSDT"))
            .await
            .unwrap();
        assert_eq!(result, ConfluenceResult::empty("BTCUSDT"));

        let widened = use_case(&repo)
            .execute(GetConfluenceQuery::new("BTCUSDT").with_lookback_minutes(240))
            .await
            .unwrap();
        assert_eq!(widened.active_timeframes, 1);
        assert!(widened.timeframes.contains_key("4h"));
    }

    #[tokio::test]
    async fn test_duplicate_and_blank_timeframes_collapse() {
        let repo = Arc::new(InMemorySignalRepository::new());
        let mut r = record("BTCUSDT", "15m", 1);
        r.bbwp_value = Some(10.0);
        repo.append(r).await.unwrap();

        let result = use_case(&repo)
            .execute(GetConfluenceQuery::new("BTCUSDT").with_timeframes(["15m", " 15m", ""]))
            .await
            .unwrap();

        assert_eq!(result.active_timeframes, 1);
        assert_eq!(result.confluence_score, 10);
    }

    #[tokio::test]
    async fn test_invalid_queries() {
        let repo = Arc::new(InMemorySignalRepository::new());
        let use_case = use_case(&repo);

        for query in [
            GetConfluenceQuery::new("  "),
            GetConfluenceQuery::new("BTCUSDT").with_timeframes(Vec::<String>::new()),
            GetConfluenceQuery::new("BTCUSDT").with_lookback_minutes(0),
        ] {
            let err = use_case.execute(query).await.unwrap_err();
            assert!(matches!(err, ConfluenceError::InvalidQuery(_)));
        }
    }

    #[tokio::test]
    async fn test_storage_error_propagates() {
        let use_case =
            GetConfluenceUseCase::new(Arc::new(FailingRepository), Arc::new(FixedClock::at(now())));

        let err = use_case
            .execute(GetConfluenceQuery::new("BTCUSDT"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfluenceError::StorageUnavailable(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_read_counts_as_inactive() {
        let repo = Arc::new(SlowRepository {
            inner: InMemorySignalRepository::new(),
            delay: std::time::Duration::from_secs(5),
        });
        repo.append(record("BTCUSDT", "15m", 1)).await.unwrap();

        let use_case = GetConfluenceUseCase::new(Arc::clone(&repo), Arc::new(FixedClock::at(now())))
            .with_read_timeout(Some(std::time::Duration::from_millis(100)));

        let result = use_case
            .execute(GetConfluenceQuery::new("BTCUSDT"))
            .await
            .unwrap();
        assert_eq!(result.active_timeframes, 0);

        let patient = GetConfluenceUseCase::new(repo, Arc::new(FixedClock::at(now())))
            .with_read_timeout(Some(std::time::Duration::from_secs(10)));
        let result = patient
            .execute(GetConfluenceQuery::new("BTCUSDT"))
            .await
            .unwrap();
        assert_eq!(result.active_timeframes, 1);
    }
}
