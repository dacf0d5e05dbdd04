use crate::application::ports::{SignalRepository, StoreResult};
use crate::domain::{SignalRecord, Timestamp};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// (symbol, timeframe); records without a symbol are stored under ""
type SeriesKey = (String, String);

/// In-memory signal store
///
/// Records are grouped per symbol/timeframe series in insertion order.
/// Thread-safe via DashMap; suitable for local runs and testing.
pub struct InMemorySignalRepository {
    series: Arc<DashMap<SeriesKey, Vec<SignalRecord>>>,
    /// Index: record id -> series
    by_id: Arc<DashMap<Uuid, SeriesKey>>,
}

impl InMemorySignalRepository {
    pub fn new() -> Self {
        Self {
            series: Arc::new(DashMap::new()),
            by_id: Arc::new(DashMap::new()),
        }
    }

    /// Look up a stored record by id
    pub fn get(&self, id: Uuid) -> Option<SignalRecord> {
        let key = self.by_id.get(&id)?.value().clone();
        self.series
            .get(&key)?
            .iter()
            .find(|record| record.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl Default for InMemorySignalRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemorySignalRepository {
    fn clone(&self) -> Self {
        Self {
            series: Arc::clone(&self.series),
            by_id: Arc::clone(&self.by_id),
        }
    }
}

#[async_trait]
impl SignalRepository for InMemorySignalRepository {
    async fn append(&self, record: SignalRecord) -> StoreResult<Uuid> {
        let id = record.id;
        let key = (
            record.symbol.clone().unwrap_or_default(),
            record.timeframe.clone(),
        );
        self.by_id.insert(id, key.clone());
        self.series.entry(key).or_default().push(record);
        Ok(id)
    }

    async fn latest(
        &self,
        symbol: &str,
        timeframe: &str,
        since: Timestamp,
    ) -> StoreResult<Option<SignalRecord>> {
        let key = (symbol.to_string(), timeframe.to_string());
        let Some(records) = self.series.get(&key) else {
            return Ok(None);
        };

        // Equal timestamps: the later append wins
        let latest = records
            .iter()
            .filter(|record| record.timestamp >= since)
            .fold(None::<&SignalRecord>, |best, record| match best {
                Some(b) if b.timestamp > record.timestamp => Some(b),
                _ => Some(record),
            });

        Ok(latest.cloned())
    }

    fn backend(&self) -> &str {
        "in-memory"
    }
}
