use market_watch::events::{EventManager, EventRegistry, ExchangeDirectory, LogNotifier};
use market_watch::gateway_in::{ExchangeManager, load_config, load_default_config};
use market_watch::market_data::MarketDataCache;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const STATUS_INTERVAL: Duration = Duration::from_secs(10);

fn print_help() {
    eprintln!(
        r#"Market Watch - market data cache and price alert engine

USAGE:
    market-watch [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter (default: market_watch=info)

EXAMPLES:
    # Run with the embedded simulator configuration
    market-watch

    # Run with config file
    market-watch --config watch.json
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("market_watch=info".parse()?))
        .init();

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
            load_config(&path)?
        }
        None => {
            tracing::info!("Using embedded default configuration");
            load_default_config()?
        }
    };
    config.validate()?;

    let cache = MarketDataCache::new();

    let mut exchanges = ExchangeManager::new(cache.clone());
    exchanges.initialize(&config);
    tracing::info!("Exchanges: {:?}", exchanges.exchanges());
    exchanges.start_all();

    let notifier = LogNotifier::new(&config.notifications.targets);
    let directory: Arc<dyn ExchangeDirectory> = Arc::new(config.clone());
    let registry = EventRegistry::new(directory, Arc::new(notifier));

    for request in config.events.iter().cloned() {
        if let Err(e) = registry.register_request(request) {
            tracing::warn!("Skipping configured event: {}", e);
        }
    }

    let engine = EventManager::new(registry.clone(), Arc::new(cache.clone()))
        .with_config(config.engine.to_engine_config())
        .spawn();

    let mut status = tokio::time::interval(STATUS_INTERVAL);
    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    tracing::error!("Failed to listen for Ctrl-C: {}", e);
                }
                break;
            }
            _ = status.tick() => {
                let (total, executed) = registry.count();
                tracing::info!(
                    "Events: {} registered, {} executed; cache: {} tickers, {} order books",
                    total,
                    executed,
                    cache.tickers.len(),
                    cache.order_books.len()
                );
            }
        }
    }

    tracing::info!("Shutting down...");
    engine.shutdown();
    engine.join().await;
    exchanges.shutdown().await;

    Ok(())
}
