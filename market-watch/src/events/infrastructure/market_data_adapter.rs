//! Market Data Adapter - exposes the cache through the `MarketDataReader` port

use market_core::{AssetType, CurrencyPair, ExchangeId, OrderBook, Ticker};

use crate::events::application::MarketDataReader;
use crate::market_data::{LookupError, MarketDataCache};

impl MarketDataReader for MarketDataCache {
    fn ticker(
        &self,
        exchange: &ExchangeId,
        pair: &CurrencyPair,
        asset: AssetType,
    ) -> Result<Ticker, LookupError> {
        self.tickers.lookup(exchange, pair, asset)
    }

    fn order_book(
        &self,
        exchange: &ExchangeId,
        pair: &CurrencyPair,
        asset: AssetType,
    ) -> Result<OrderBook, LookupError> {
        self.order_books.lookup(exchange, pair, asset)
    }
}
