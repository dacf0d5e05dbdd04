//! Signal Hub
//!
//! Receives Jewel oscillator alerts from TradingView, derives compression and
//! buy/sell scores, stores one record per alert, and answers multi-timeframe
//! confluence queries over the stored records.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture with clear separation of concerns:
//!
//! - **Domain**: Inbound alert shape on top of the shared `jewel-core` entities
//! - **Application**: Use cases (IngestSignal, GetConfluence) and port re-exports
//! - **Infrastructure**: In-memory signal store and configuration loading
//! - **Presentation**: REST API
//!
//! # Example
//!
//! ```ignore
//! use signal_hub::{HubConfig, SignalHub};
//!
//! #[tokio::main]
//! async fn main() {
//!     let hub = SignalHub::new(HubConfig::default());
//!     hub.run().await.unwrap();
//! }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types
pub use domain::{
    Clock, ConfluenceResult, Recommendation, SignalRecord, SignalType, Timestamp, WebhookEvent,
};

pub use infrastructure::{ConfigError, HubConfig, InMemorySignalRepository};

pub use application::{
    ConfluenceError, GetConfluenceQuery, GetConfluenceUseCase, IngestError, IngestSignalCommand,
    IngestSignalResult, IngestSignalUseCase, SignalRepository, StoreError,
};

pub use presentation::{AppState, create_router};

use axum::Router;
use jewel_clock::SystemClock;
use std::sync::Arc;
use tokio::net::TcpListener;

/// The signal hub server
pub struct SignalHub<C: Clock + 'static> {
    pub config: HubConfig,
    pub clock: Arc<C>,
    pub signal_repo: Arc<dyn SignalRepository>,
}

impl<C: Clock + 'static> SignalHub<C> {
    /// Create a hub over the given clock and store
    pub fn with_parts(
        config: HubConfig,
        clock: Arc<C>,
        signal_repo: Arc<dyn SignalRepository>,
    ) -> Self {
        SignalHub {
            config,
            clock,
            signal_repo,
        }
    }

    /// Create the REST API router
    pub fn rest_router(&self) -> Router {
        let state = Arc::new(AppState::new(
            Arc::clone(&self.clock),
            Arc::clone(&self.signal_repo),
            self.config.webhook.clone(),
            self.config.confluence.clone(),
        ));

        create_router(state)
    }

    /// Run the hub server
    pub async fn run(self) -> std::io::Result<()> {
        let addr = self.config.bind_address();

        if !self.config.webhook.secret_required() {
            tracing::warn!(
                "No webhook secret configured; {} accepts unauthenticated alerts",
                self.config.webhook.path
            );
        }

        let router = self.rest_router();
        tracing::info!("Signal hub listening on {}", addr);

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router).await
    }
}

impl SignalHub<SystemClock> {
    /// Create a hub with the wall clock and an in-memory store
    pub fn new(config: HubConfig) -> Self {
        Self::with_parts(
            config,
            Arc::new(SystemClock::new()),
            Arc::new(InMemorySignalRepository::new()),
        )
    }
}
