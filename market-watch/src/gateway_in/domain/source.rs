use async_trait::async_trait;
use market_core::{AssetType, CurrencyPair, ExchangeId, OrderBook, Ticker};

use super::error::SourceError;
use super::instrument::Instrument;

/// Capability every exchange connector provides
///
/// Connectors only fetch and parse. Writing into the cache is done by the
/// refresh helpers in the application layer, so a connector never holds a
/// store lock across I/O.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Exchange this source talks to
    fn exchange(&self) -> &ExchangeId;

    /// Instruments this source is configured to refresh
    fn pairs(&self) -> Vec<Instrument>;

    async fn fetch_remote_ticker(
        &self,
        pair: &CurrencyPair,
        asset: AssetType,
    ) -> Result<Ticker, SourceError>;

    async fn fetch_remote_order_book(
        &self,
        pair: &CurrencyPair,
        asset: AssetType,
    ) -> Result<OrderBook, SourceError>;
}
