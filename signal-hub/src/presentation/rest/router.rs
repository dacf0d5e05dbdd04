use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::application::SignalRepository;
use crate::domain::Clock;
use crate::infrastructure::{ConfluenceConfig, WebhookConfig};

/// Application state shared across handlers
///
/// The store sits behind the port trait so a hosted database adapter can
/// replace the in-memory one without touching the handlers.
pub struct AppState<C: Clock> {
    pub clock: Arc<C>,
    pub signal_repo: Arc<dyn SignalRepository>,
    pub webhook: WebhookConfig,
    pub confluence: ConfluenceConfig,
}

impl<C: Clock> AppState<C> {
    pub fn new(
        clock: Arc<C>,
        signal_repo: Arc<dyn SignalRepository>,
        webhook: WebhookConfig,
        confluence: ConfluenceConfig,
    ) -> Self {
        AppState {
            clock,
            signal_repo,
            webhook,
            confluence,
        }
    }
}

/// Create the REST API router
pub fn create_router<C: Clock + 'static>(state: Arc<AppState<C>>) -> Router {
    let webhook_path = state.webhook.path.clone();

    Router::new()
        .route("/health", get(handlers::health::<C>))
        .route(&webhook_path, post(handlers::ingest_webhook::<C>))
        .route("/api/confluence/{symbol}", get(handlers::confluence::<C>))
        .fallback(handlers::not_found)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
