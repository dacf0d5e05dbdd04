use crate::StoreResult;
use async_trait::async_trait;
use jewel_core::{SignalRecord, Timestamp};
use uuid::Uuid;

/// Append-only store of signal records
///
/// This port abstracts the persistence collaborator. Implementations must
/// never mutate a record after `append`; concurrent appends for the same
/// symbol/timeframe are independent.
#[async_trait]
pub trait SignalRepository: Send + Sync {
    /// Append a record, returning its id
    async fn append(&self, record: SignalRecord) -> StoreResult<Uuid>;

    /// Most recent record for symbol/timeframe with `timestamp >= since`
    async fn latest(
        &self,
        symbol: &str,
        timeframe: &str,
        since: Timestamp,
    ) -> StoreResult<Option<SignalRecord>>;

    /// Backend name reported by the health endpoint
    fn backend(&self) -> &str {
        "SignalRepository"
    }
}
