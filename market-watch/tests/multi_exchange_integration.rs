//! Multi-exchange integration tests
//!
//! Tests the market data cache's ability to keep separate snapshots for the
//! same pair on different exchanges, and to stay consistent under many
//! concurrent writers.

use market_core::{AssetType, CurrencyPair, ExchangeId, OrderBook, Ticker};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use market_watch::gateway_in::{
    ExchangeManager, Instrument, PollerConfig, SimulatedSource, SimulatedSourceConfig,
};
use market_watch::market_data::{LookupError, MarketDataCache};

// ============================================================================
// Store Tests
// ============================================================================

#[test]
fn test_same_pair_different_exchanges() {
    let cache = MarketDataCache::new();
    let pair = CurrencyPair::new("BTC", "USDT");

    let binance = ExchangeId::binance();
    let kraken = ExchangeId::kraken();

    let binance_book = OrderBook::new(&binance, pair.clone(), AssetType::Spot)
        .with_bids([(dec!(50000), dec!(1.0))])
        .with_asks([(dec!(50010), dec!(1.5))]);
    let kraken_book = OrderBook::new(&kraken, pair.clone(), AssetType::Spot)
        .with_bids([(dec!(50020), dec!(2.0))]) // Higher bid!
        .with_asks([(dec!(50030), dec!(2.5))]);

    cache
        .order_books
        .upsert(&binance, &pair, AssetType::Spot, binance_book);
    cache
        .order_books
        .upsert(&kraken, &pair, AssetType::Spot, kraken_book);

    let binance_book = cache
        .order_books
        .lookup(&binance, &pair, AssetType::Spot)
        .unwrap();
    let kraken_book = cache
        .order_books
        .lookup(&kraken, &pair, AssetType::Spot)
        .unwrap();

    // Verify prices are different (proving they're separate books)
    assert_eq!(binance_book.best_bid().unwrap().price, dec!(50000));
    assert_eq!(kraken_book.best_bid().unwrap().price, dec!(50020));
    assert_eq!(binance_book.best_ask().unwrap().price, dec!(50010));
    assert_eq!(kraken_book.best_ask().unwrap().price, dec!(50030));

    assert_eq!(cache.order_books.exchanges(), vec![binance, kraken]);
}

#[test]
fn test_ticker_and_book_stores_are_independent() {
    let cache = MarketDataCache::new();
    let exchange = ExchangeId::new("bitstamp");
    let pair = CurrencyPair::new("ETH", "USD");

    let ticker = Ticker::new(&exchange, pair.clone(), AssetType::Spot).with_last(dec!(3000));
    cache.tickers.upsert(&exchange, &pair, AssetType::Spot, ticker);

    assert!(cache.tickers.lookup(&exchange, &pair, AssetType::Spot).is_ok());
    assert_eq!(
        cache.order_books.lookup(&exchange, &pair, AssetType::Spot),
        Err(LookupError::ExchangeNotFound(exchange.clone()))
    );
}

#[test]
fn test_separate_caches_are_isolated() {
    let first = MarketDataCache::new();
    let second = MarketDataCache::new();
    let exchange = ExchangeId::kraken();
    let pair = CurrencyPair::new("BTC", "EUR");

    first.tickers.upsert(
        &exchange,
        &pair,
        AssetType::Spot,
        Ticker::new(&exchange, pair.clone(), AssetType::Spot).with_last(dec!(1)),
    );

    assert_eq!(first.tickers.len(), 1);
    assert!(second.tickers.is_empty());
    assert!(!second.tickers.has_exchange(&exchange));
}

// ============================================================================
// Concurrency Tests
// ============================================================================

const WRITERS: usize = 16;
const PAIRS_PER_WRITER: usize = 40;

fn writer_pair(writer: usize, n: usize) -> CurrencyPair {
    CurrencyPair::new(format!("C{writer}N{n}"), "USD")
}

fn writer_exchange(writer: usize) -> ExchangeId {
    ExchangeId::new(format!("exchange-{}", writer % 4))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_upserts_lose_nothing() {
    let cache = MarketDataCache::new();

    let mut tasks = Vec::new();
    for writer in 0..WRITERS {
        let cache = cache.clone();
        tasks.push(tokio::spawn(async move {
            let exchange = writer_exchange(writer);
            for n in 0..PAIRS_PER_WRITER {
                let pair = writer_pair(writer, n);
                let last = Decimal::from((writer * 1000 + n) as u64);
                for asset in [AssetType::Spot, AssetType::Futures] {
                    let ticker = Ticker::new(&exchange, pair.clone(), asset).with_last(last);
                    cache.tickers.upsert(&exchange, &pair, asset, ticker);
                }
                tokio::task::yield_now().await;
            }
        }));
    }

    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(cache.tickers.len(), WRITERS * PAIRS_PER_WRITER * 2);
    for writer in 0..WRITERS {
        let exchange = writer_exchange(writer);
        for n in 0..PAIRS_PER_WRITER {
            let pair = writer_pair(writer, n);
            let expected = Decimal::from((writer * 1000 + n) as u64);
            for asset in [AssetType::Spot, AssetType::Futures] {
                let ticker = cache.tickers.lookup(&exchange, &pair, asset).unwrap();
                assert_eq!(ticker.last, expected, "{exchange} {pair} {asset}");
                assert_eq!(ticker.pair, pair);
            }
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writers_same_key_last_write_wins() {
    let cache = MarketDataCache::new();
    let exchange = ExchangeId::binance();
    let pair = CurrencyPair::new("BTC", "USDT");

    let mut tasks = Vec::new();
    for writer in 0..WRITERS {
        let cache = cache.clone();
        let exchange = exchange.clone();
        let pair = pair.clone();
        tasks.push(tokio::spawn(async move {
            for n in 0..PAIRS_PER_WRITER {
                let last = Decimal::from((writer * 1000 + n + 1) as u64);
                let ticker = Ticker::new(&exchange, pair.clone(), AssetType::Spot).with_last(last);
                cache.tickers.upsert(&exchange, &pair, AssetType::Spot, ticker);
            }
        }));
    }

    for task in tasks {
        task.await.unwrap();
    }

    // One slot, holding one of the written values
    assert_eq!(cache.tickers.len(), 1);
    let ticker = cache.tickers.lookup(&exchange, &pair, AssetType::Spot).unwrap();
    assert!(ticker.has_data());
    let value = ticker.last;
    assert!((0..WRITERS).any(|w| {
        (0..PAIRS_PER_WRITER).any(|n| Decimal::from((w * 1000 + n + 1) as u64) == value)
    }));
}

// ============================================================================
// Exchange Manager Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_pollers_fill_cache_for_every_exchange() {
    let cache = MarketDataCache::new();
    let mut manager = ExchangeManager::new(cache.clone());
    let pair = CurrencyPair::new("BTC", "USD");

    for (seed, name) in ["alpha", "beta", "gamma"].into_iter().enumerate() {
        let source = SimulatedSource::with_config(
            name,
            vec![Instrument::spot(pair.clone())],
            SimulatedSourceConfig::default().with_seed(seed as u64),
        );
        manager.add_source(
            Arc::new(source),
            PollerConfig::new(name).with_poll_interval(std::time::Duration::from_millis(5)),
        );
    }

    manager.start_all();
    for _ in 0..200 {
        if cache.order_books.exchanges().len() == 3 && cache.tickers.exchanges().len() == 3 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    manager.shutdown().await;

    assert_eq!(cache.tickers.exchanges().len(), 3);
    for exchange in cache.tickers.exchanges() {
        let ticker = cache.tickers.lookup(&exchange, &pair, AssetType::Spot).unwrap();
        assert!(ticker.has_data());
        assert_eq!(cache.tickers.pairs_for_exchange(&exchange), vec![pair.clone()]);
    }
}
