//! Application Ports - collaborators the event engine depends on
//!
//! - `ExchangeDirectory`: admission control, maps a caller's exchange name to
//!   the id the cache is keyed by
//! - `Notifier`: outbound notification channel for `NOTIFY` actions
//! - `MarketDataReader`: read access to the market data cache
//!
//! Infrastructure provides concrete implementations; tests provide mocks.

use market_core::{AssetType, CurrencyPair, ExchangeId, OrderBook, Ticker};
use thiserror::Error;

use crate::market_data::LookupError;

/// Resolves exchange names against the enabled exchanges in configuration
pub trait ExchangeDirectory: Send + Sync {
    /// Canonical id of an enabled exchange known by `name`, if any
    fn resolve(&self, name: &str) -> Option<ExchangeId>;

    fn is_enabled(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }
}

impl ExchangeDirectory for Vec<ExchangeId> {
    fn resolve(&self, name: &str) -> Option<ExchangeId> {
        let id = ExchangeId::new(name);
        self.iter().find(|known| **known == id).cloned()
    }
}

/// Errors from a notification collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("Unknown notification target: {0}")]
    UnknownTarget(String),

    #[error("Notification channel closed")]
    ChannelClosed,

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Outbound notification sink (SMS, webhook, chat...)
///
/// Delivery is best effort: failures are reported to the caller but never
/// feed back into event state.
pub trait Notifier: Send + Sync {
    /// Check if the target names a configured channel
    fn is_valid_target(&self, target: &str) -> bool;

    /// Deliver a message to a target
    fn push(&self, message: &str, target: &str) -> Result<(), NotifyError>;
}

/// Read access to cached tickers and order books
pub trait MarketDataReader: Send + Sync {
    fn ticker(
        &self,
        exchange: &ExchangeId,
        pair: &CurrencyPair,
        asset: AssetType,
    ) -> Result<Ticker, LookupError>;

    fn order_book(
        &self,
        exchange: &ExchangeId,
        pair: &CurrencyPair,
        asset: AssetType,
    ) -> Result<OrderBook, LookupError>;
}
