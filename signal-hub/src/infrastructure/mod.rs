pub mod config;
pub mod repositories;

pub use config::{ConfigError, ConfluenceConfig, HubConfig, ServerConfig, WebhookConfig};
pub use repositories::InMemorySignalRepository;
