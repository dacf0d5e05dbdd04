//! Configuration loading for the signal hub
//!
//! Supports a JSON configuration file with:
//! - Server bind address
//! - Webhook route and shared secret
//! - Confluence defaults (timeframes, lookback window, read deadline)
//!
//! Environment variables are applied on top of the file.

use jewel_signals::{DEFAULT_LOOKBACK_MINUTES, DEFAULT_TIMEFRAMES};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Root configuration for the signal hub
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubConfig {
    #[serde(default = "default_hub_name")]
    pub name: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub webhook: WebhookConfig,

    #[serde(default)]
    pub confluence: ConfluenceConfig,
}

fn default_hub_name() -> String {
    "Jewel Signal Hub".to_string()
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            name: default_hub_name(),
            server: ServerConfig::default(),
            webhook: WebhookConfig::default(),
            confluence: ConfluenceConfig::default(),
        }
    }
}

impl HubConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `HOST`, `PORT` and `TRADINGVIEW_WEBHOOK_SECRET` from the process environment
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST").filter(|h| !h.is_empty()) {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT").filter(|p| !p.is_empty()) {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("PORT '{}' is not a port", port)))?;
        }
        if let Some(secret) = lookup("TRADINGVIEW_WEBHOOK_SECRET").filter(|s| !s.is_empty()) {
            self.webhook.secret = Some(secret);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.webhook.path.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "webhook.path '{}' must start with '/'",
                self.webhook.path
            )));
        }
        if self.confluence.timeframes.iter().all(|tf| tf.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "confluence.timeframes must name at least one timeframe".to_string(),
            ));
        }
        if self.confluence.lookback_minutes <= 0 {
            return Err(ConfigError::Invalid(
                "confluence.lookback_minutes must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Ingestion route configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookConfig {
    #[serde(default = "default_webhook_path")]
    pub path: String,
    /// Shared secret; `None` leaves the route open
    #[serde(default)]
    pub secret: Option<String>,
}

fn default_webhook_path() -> String {
    "/api/webhook/tradingview".to_string()
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            path: default_webhook_path(),
            secret: None,
        }
    }
}

impl WebhookConfig {
    pub fn secret_required(&self) -> bool {
        self.secret.is_some()
    }
}

/// Confluence query defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfluenceConfig {
    #[serde(default = "default_timeframes")]
    pub timeframes: Vec<String>,
    #[serde(default = "default_lookback_minutes")]
    pub lookback_minutes: i64,
    /// Per-timeframe read deadline; `None` waits indefinitely
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: Option<u64>,
}

fn default_timeframes() -> Vec<String> {
    DEFAULT_TIMEFRAMES.iter().map(|tf| tf.to_string()).collect()
}

fn default_lookback_minutes() -> i64 {
    DEFAULT_LOOKBACK_MINUTES
}

fn default_read_timeout_ms() -> Option<u64> {
    Some(2000)
}

impl Default for ConfluenceConfig {
    fn default() -> Self {
        Self {
            timeframes: default_timeframes(),
            lookback_minutes: default_lookback_minutes(),
            read_timeout_ms: default_read_timeout_ms(),
        }
    }
}

impl ConfluenceConfig {
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }
}

/// Configuration error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },
    #[error("Failed to parse config: {0}")]
    Parse(String),
    #[error("Invalid config: {0}")]
    Invalid(String),
}
