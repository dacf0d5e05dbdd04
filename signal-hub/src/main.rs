use anyhow::Context;
use signal_hub::{HubConfig, SignalHub};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_help() {
    eprintln!(
        r#"Signal Hub - Jewel oscillator webhook ingestion and confluence service

USAGE:
    signal-hub [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --help              Print this help message

ENVIRONMENT VARIABLES:
    HOST                          Server host (default: 0.0.0.0)
    PORT                          Server port (default: 3001)
    TRADINGVIEW_WEBHOOK_SECRET    Shared secret required on the webhook route
    LOG_FORMAT                    Set to "json" for JSON log lines
    RUST_LOG                      Log level filter

EXAMPLES:
    # Run with defaults
    signal-hub

    # Run with config file
    signal-hub --config hub.json

    # Require a webhook secret
    TRADINGVIEW_WEBHOOK_SECRET=changeme signal-hub
"#
    );
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "signal_hub=info,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let config = match config_path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            HubConfig::from_file(&path)?
        }
        None => {
            tracing::info!("Using default configuration");
            HubConfig::default()
        }
    };
    let config = config.apply_env()?;

    tracing::info!("Starting {}", config.name);
    tracing::info!("Available endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  POST {}", config.webhook.path);
    tracing::info!(
        "  GET  /api/confluence/{{symbol}}?timeframes={}&lookbackMinutes={}",
        config.confluence.timeframes.join(","),
        config.confluence.lookback_minutes
    );

    SignalHub::new(config)
        .run()
        .await
        .context("signal hub server failed")
}
