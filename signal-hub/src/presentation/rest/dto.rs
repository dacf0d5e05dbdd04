use crate::application::IngestSignalResult;
use crate::domain::{SignalType, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// GET /health
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: Timestamp,
    pub store_backend: String,
    pub webhook_path: String,
    pub webhook_secret_required: bool,
}

/// Successful ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    pub success: bool,
    pub id: Uuid,
    pub symbol: Option<String>,
    pub timeframe: String,
    #[serde(rename = "type")]
    pub signal_type: Option<SignalType>,
    pub perfect_setup: bool,
}

impl From<IngestSignalResult> for IngestResponse {
    fn from(result: IngestSignalResult) -> Self {
        IngestResponse {
            success: true,
            id: result.id,
            symbol: result.symbol,
            timeframe: result.timeframe,
            signal_type: result.signal_type,
            perfect_setup: result.perfect_setup,
        }
    }
}

/// Query string of GET /api/confluence/{symbol}
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfluenceParams {
    /// Comma-separated timeframe labels, e.g. `15m,2h,4h`
    #[serde(default)]
    pub timeframes: Option<String>,
    #[serde(default)]
    pub lookback_minutes: Option<i64>,
}

impl ConfluenceParams {
    pub fn timeframe_list(&self) -> Option<Vec<String>> {
        self.timeframes
            .as_deref()
            .map(|raw| raw.split(',').map(|tf| tf.trim().to_string()).collect())
    }
}

/// Error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        ErrorResponse {
            error: error.into(),
            message: message.into(),
        }
    }
}
