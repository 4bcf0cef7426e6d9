//! Gateway module for feeding the market data cache from many exchanges.
//!
//! Follows Clean Architecture with four layers:
//! - **Config**: JSON-based configuration for exchanges, engine and events
//! - **Domain**: The `MarketDataSource` capability and its error type
//! - **Application**: Refresh helpers and the `ExchangeManager` pollers
//! - **Infrastructure**: Concrete sources (the random-walk simulator)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Config Layer                            │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │  default_config.json                                     │   │
//! │  │  - Exchanges, pairs and poll intervals                   │   │
//! │  │  - Engine delay, notification targets, startup events    │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                            │                                    │
//! │                            ▼                                    │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                    Application                           │   │
//! │  │  - ExchangeManager (one poller task per exchange)        │   │
//! │  │  - update_* / fetch_* (fetch, upsert, read back)         │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                            │                                    │
//! │                            ▼                                    │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                      Domain                              │   │
//! │  │  - MarketDataSource trait, Instrument, SourceError       │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                            │                                    │
//! │                            ▼                                    │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                   Infrastructure                         │   │
//! │  │  - SimulatedSource (implements MarketDataSource)         │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example Configuration
//!
//! ```json
//! {
//!   "exchanges": [
//!     {
//!       "id": "simulator",
//!       "name": "Exchange Simulator",
//!       "enabled": true,
//!       "poll_interval_ms": 1000,
//!       "pairs": [{ "pair": "BTC-USD", "asset": "spot" }]
//!     }
//!   ],
//!   "engine": { "sleep_delay_ms": 500 }
//! }
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience

// Config layer
pub use config::{
    ConfigError, EngineConfigJson, ExchangeConfig, GatewayConfigFile, NotificationConfig,
    load_config, load_config_from_str, load_default_config,
};

// Domain layer
pub use domain::{Instrument, MarketDataSource, SourceError};

// Application layer
pub use application::{
    ExchangeManager, PollerConfig, RefreshSummary, fetch_order_book, fetch_ticker,
    refresh_source, update_order_book, update_ticker,
};

// Infrastructure layer
pub use infrastructure::{SimulatedSource, SimulatedSourceConfig};
