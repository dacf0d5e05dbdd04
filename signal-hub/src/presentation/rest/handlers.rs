use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::HeaderMap,
};
use serde_json::Value;
use std::sync::Arc;

use crate::application::{
    GetConfluenceQuery, GetConfluenceUseCase, IngestSignalCommand, IngestSignalUseCase,
};
use crate::domain::{Clock, ConfluenceResult};
use crate::presentation::rest::{ApiError, dto::*};

use super::AppState;

/// Header carrying the shared webhook secret
pub const SECRET_HEADER: &str = "x-tradingview-secret";

/// GET /health
pub async fn health<C: Clock>(State(state): State<Arc<AppState<C>>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: state.clock.now(),
        store_backend: state.signal_repo.backend().to_string(),
        webhook_path: state.webhook.path.clone(),
        webhook_secret_required: state.webhook.secret_required(),
    })
}

/// Secret from the header, else the body `secret`, else the body `token`
fn provided_secret<'a>(headers: &'a HeaderMap, body: &'a Value) -> Option<&'a str> {
    headers
        .get(SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .or_else(|| body.get("secret").and_then(Value::as_str))
        .or_else(|| body.get("token").and_then(Value::as_str))
}

/// Compare without short-circuiting on the first differing byte
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}

/// POST /api/webhook/tradingview (path configurable)
///
/// The body is parsed here rather than through the `Json` extractor: the
/// charting platform does not always send a JSON content type.
pub async fn ingest_webhook<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<IngestResponse>, ApiError> {
    let payload: Value =
        serde_json::from_slice(&body).map_err(|e| ApiError::invalid_json(e.to_string()))?;

    if let Some(expected) = state.webhook.secret.as_deref() {
        let authorized = provided_secret(&headers, &payload)
            .is_some_and(|provided| constant_time_eq(provided.as_bytes(), expected.as_bytes()));
        if !authorized {
            tracing::warn!("Webhook rejected: bad or missing secret");
            return Err(ApiError::unauthorized());
        }
    }

    let use_case = IngestSignalUseCase::new(
        Arc::clone(&state.signal_repo),
        Arc::clone(&state.clock),
    );

    let result = use_case.execute(IngestSignalCommand { payload }).await?;
    Ok(Json(result.into()))
}

/// GET /api/confluence/{symbol}
pub async fn confluence<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Path(symbol): Path<String>,
    params: Result<Query<ConfluenceParams>, QueryRejection>,
) -> Result<Json<ConfluenceResult>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::bad_request("Invalid query", e.body_text()))?;

    let query = GetConfluenceQuery::new(symbol)
        .with_timeframes(
            params
                .timeframe_list()
                .unwrap_or_else(|| state.confluence.timeframes.clone()),
        )
        .with_lookback_minutes(
            params
                .lookback_minutes
                .unwrap_or(state.confluence.lookback_minutes),
        );

    let use_case = GetConfluenceUseCase::new(
        Arc::clone(&state.signal_repo),
        Arc::clone(&state.clock),
    )
    .with_read_timeout(state.confluence.read_timeout());

    let result = use_case.execute(query).await?;
    Ok(Json(result))
}

/// Any unmatched route
pub async fn not_found() -> ApiError {
    ApiError::not_found()
}
