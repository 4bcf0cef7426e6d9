//! Refresh helpers shared by every connector
//!
//! `update_*` always goes to the exchange, writes the result into the cache
//! and reads it back. `fetch_*` serves from the cache and only goes to the
//! exchange when the cache has nothing for the instrument yet.

use market_core::{AssetType, CurrencyPair, OrderBook, Ticker};
use tracing::{debug, warn};

use crate::gateway_in::domain::{MarketDataSource, SourceError};
use crate::market_data::{MarketDataCache, OrderBookStore, TickerStore};

use super::config::PollerConfig;

/// Fetch a ticker from the exchange and store it
pub async fn update_ticker<S>(
    source: &S,
    store: &TickerStore,
    pair: &CurrencyPair,
    asset: AssetType,
) -> Result<Ticker, SourceError>
where
    S: MarketDataSource + ?Sized,
{
    let ticker = source.fetch_remote_ticker(pair, asset).await?;
    store.upsert(source.exchange(), pair, asset, ticker);
    Ok(store.lookup(source.exchange(), pair, asset)?)
}

/// Fetch an order book from the exchange and store it
pub async fn update_order_book<S>(
    source: &S,
    store: &OrderBookStore,
    pair: &CurrencyPair,
    asset: AssetType,
) -> Result<OrderBook, SourceError>
where
    S: MarketDataSource + ?Sized,
{
    let book = source.fetch_remote_order_book(pair, asset).await?;
    store.upsert(source.exchange(), pair, asset, book);
    Ok(store.lookup(source.exchange(), pair, asset)?)
}

/// Cached ticker, falling back to the exchange when none is stored
pub async fn fetch_ticker<S>(
    source: &S,
    store: &TickerStore,
    pair: &CurrencyPair,
    asset: AssetType,
) -> Result<Ticker, SourceError>
where
    S: MarketDataSource + ?Sized,
{
    match store.lookup(source.exchange(), pair, asset) {
        Ok(ticker) if ticker.has_data() => Ok(ticker),
        Ok(_) => update_ticker(source, store, pair, asset).await,
        Err(e) => {
            debug!("{}: {}, fetching remote ticker", source.exchange(), e);
            update_ticker(source, store, pair, asset).await
        }
    }
}

/// Cached order book, falling back to the exchange when none is stored
pub async fn fetch_order_book<S>(
    source: &S,
    store: &OrderBookStore,
    pair: &CurrencyPair,
    asset: AssetType,
) -> Result<OrderBook, SourceError>
where
    S: MarketDataSource + ?Sized,
{
    match store.lookup(source.exchange(), pair, asset) {
        Ok(book) if !book.is_empty() => Ok(book),
        Ok(_) => update_order_book(source, store, pair, asset).await,
        Err(e) => {
            debug!("{}: {}, fetching remote order book", source.exchange(), e);
            update_order_book(source, store, pair, asset).await
        }
    }
}

/// Outcome of one refresh pass over a source's instruments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub updated: usize,
    pub failed: usize,
}

/// Refresh every instrument of a source once
///
/// A failing instrument is logged and skipped; the rest of the pass goes on.
pub async fn refresh_source<S>(
    source: &S,
    cache: &MarketDataCache,
    config: &PollerConfig,
) -> RefreshSummary
where
    S: MarketDataSource + ?Sized,
{
    let mut summary = RefreshSummary::default();

    for instrument in source.pairs() {
        if config.tickers {
            match update_ticker(source, &cache.tickers, &instrument.pair, instrument.asset).await {
                Ok(_) => summary.updated += 1,
                Err(e) => {
                    warn!("{}: ticker refresh for {} failed: {}", source.exchange(), instrument, e);
                    summary.failed += 1;
                }
            }
        }

        if config.order_books {
            match update_order_book(source, &cache.order_books, &instrument.pair, instrument.asset)
                .await
            {
                Ok(_) => summary.updated += 1,
                Err(e) => {
                    warn!(
                        "{}: order book refresh for {} failed: {}",
                        source.exchange(),
                        instrument,
                        e
                    );
                    summary.failed += 1;
                }
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway_in::domain::Instrument;
    use async_trait::async_trait;
    use market_core::ExchangeId;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticSource {
        exchange: ExchangeId,
        pairs: Vec<Instrument>,
        last: Decimal,
        calls: AtomicUsize,
    }

    impl StaticSource {
        fn new(last: Decimal) -> Self {
            StaticSource {
                exchange: ExchangeId::new("static"),
                pairs: vec![
                    Instrument::spot(CurrencyPair::new("BTC", "USD")),
                    Instrument::spot(CurrencyPair::new("DOGE", "USD")),
                ],
                last,
                calls: AtomicUsize::new(0),
            }
        }

        fn check(&self, pair: &CurrencyPair, asset: AssetType) -> Result<(), SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if pair.base.as_str() == "DOGE" {
                return Err(SourceError::UnsupportedInstrument {
                    exchange: self.exchange.clone(),
                    pair: pair.clone(),
                    asset,
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl MarketDataSource for StaticSource {
        fn exchange(&self) -> &ExchangeId {
            &self.exchange
        }

        fn pairs(&self) -> Vec<Instrument> {
            self.pairs.clone()
        }

        async fn fetch_remote_ticker(
            &self,
            pair: &CurrencyPair,
            asset: AssetType,
        ) -> Result<Ticker, SourceError> {
            self.check(pair, asset)?;
            // Leave pair unset so the store back-fills it
            Ok(Ticker {
                last: self.last,
                ..Default::default()
            })
        }

        async fn fetch_remote_order_book(
            &self,
            pair: &CurrencyPair,
            asset: AssetType,
        ) -> Result<OrderBook, SourceError> {
            self.check(pair, asset)?;
            Ok(OrderBook::new(&self.exchange, pair.clone(), asset)
                .with_bids([(self.last - dec!(1), dec!(2))])
                .with_asks([(self.last + dec!(1), dec!(3))]))
        }
    }

    fn btc_usd() -> CurrencyPair {
        CurrencyPair::new("BTC", "USD")
    }

    #[tokio::test]
    async fn test_update_ticker_stores_and_back_fills() {
        let source = StaticSource::new(dec!(42000));
        let cache = MarketDataCache::new();

        let ticker = update_ticker(&source, &cache.tickers, &btc_usd(), AssetType::Spot)
            .await
            .unwrap();
        assert_eq!(ticker.last, dec!(42000));
        assert_eq!(ticker.pair, btc_usd());
        assert_eq!(ticker.exchange, ExchangeId::new("static"));
        assert!(ticker.last_updated.is_some());
    }

    #[tokio::test]
    async fn test_fetch_ticker_prefers_cache() {
        let source = StaticSource::new(dec!(100));
        let cache = MarketDataCache::new();

        fetch_ticker(&source, &cache.tickers, &btc_usd(), AssetType::Spot)
            .await
            .unwrap();
        fetch_ticker(&source, &cache.tickers, &btc_usd(), AssetType::Spot)
            .await
            .unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        // Unwritten asset slot holds no data, so it goes remote
        fetch_ticker(&source, &cache.tickers, &btc_usd(), AssetType::Futures)
            .await
            .unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetch_order_book() {
        let source = StaticSource::new(dec!(100));
        let cache = MarketDataCache::new();

        let book = fetch_order_book(&source, &cache.order_books, &btc_usd(), AssetType::Spot)
            .await
            .unwrap();
        assert_eq!(book.best_bid().unwrap().price, dec!(99));
        assert_eq!(book.best_ask().unwrap().price, dec!(101));

        fetch_order_book(&source, &cache.order_books, &btc_usd(), AssetType::Spot)
            .await
            .unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_update_propagates_source_error() {
        let source = StaticSource::new(dec!(1));
        let cache = MarketDataCache::new();
        let doge = CurrencyPair::new("DOGE", "USD");

        let result = update_ticker(&source, &cache.tickers, &doge, AssetType::Spot).await;
        assert!(matches!(result, Err(SourceError::UnsupportedInstrument { .. })));
        assert!(cache.tickers.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_source_skips_failures() {
        let source = StaticSource::new(dec!(7));
        let cache = MarketDataCache::new();
        let config = PollerConfig::new("static");

        let summary = refresh_source(&source, &cache, &config).await;
        assert_eq!(summary, RefreshSummary { updated: 2, failed: 2 });
        assert_eq!(cache.tickers.len(), 1);
        assert_eq!(cache.order_books.len(), 1);

        let summary = refresh_source(&source, &cache, &config.clone().tickers_only()).await;
        assert_eq!(summary, RefreshSummary { updated: 1, failed: 1 });
    }
}
