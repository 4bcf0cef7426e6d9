//! Market data cache with a rule-based alerting engine on top.
//!
//! - [`market_data`]: latest ticker and order book per exchange, pair and asset type
//! - [`gateway_in`]: exchange sources and the pollers that feed the cache
//! - [`events`]: watch conditions and the engine that fires them once

pub mod events;
pub mod gateway_in;
pub mod market_data;

pub use market_data::{LookupError, MarketDataCache, OrderBookStore, TickerStore};
