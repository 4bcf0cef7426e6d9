use chrono::Utc;
use market_core::{
    AssetType, CurrencyCode, CurrencyPair, ExchangeId, OrderBook, Ticker, Timestamp,
};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

use super::error::LookupError;

/// Composite cache key: one snapshot per exchange, pair and asset type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarketKey {
    pub exchange: ExchangeId,
    pub pair: CurrencyPair,
    pub asset: AssetType,
}

impl MarketKey {
    pub fn new(exchange: impl Into<ExchangeId>, pair: CurrencyPair, asset: AssetType) -> Self {
        MarketKey {
            exchange: exchange.into(),
            pair,
            asset,
        }
    }
}

impl fmt::Display for MarketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.exchange, self.pair, self.asset)
    }
}

/// A value the market data store can hold
pub trait Snapshot: Clone + Send + Sync + 'static {
    /// Zero value returned when a pair is known but this asset slot was never written
    fn blank(key: &MarketKey) -> Self;

    /// Make the snapshot consistent with the key it is stored under
    fn stamp(&mut self, key: &MarketKey, now: Timestamp);
}

impl Snapshot for Ticker {
    fn blank(key: &MarketKey) -> Self {
        Ticker::new(key.exchange.clone(), key.pair.clone(), key.asset)
    }

    fn stamp(&mut self, key: &MarketKey, now: Timestamp) {
        if self.pair.is_empty() {
            self.pair = key.pair.clone();
        }
        self.exchange = key.exchange.clone();
        self.symbol = key.pair.to_string();
        self.asset = key.asset;
        self.last_updated = Some(now);
    }
}

impl Snapshot for OrderBook {
    fn blank(key: &MarketKey) -> Self {
        OrderBook::new(key.exchange.clone(), key.pair.clone(), key.asset)
    }

    fn stamp(&mut self, key: &MarketKey, now: Timestamp) {
        if self.pair.is_empty() {
            self.pair = key.pair.clone();
        }
        self.exchange = key.exchange.clone();
        self.symbol = key.pair.to_string();
        self.asset = key.asset;
        self.last_updated = Some(now);
    }
}

/// Registry of the latest snapshot per (exchange, pair, asset type)
///
/// Thread-safe, can be cloned and shared across tasks. Clones share the same
/// data; separately constructed stores are fully independent. Every read and
/// write goes through one lock, held only for the map operation itself.
pub struct MarketDataStore<S> {
    inner: Arc<RwLock<StoreState<S>>>,
}

/// Latest ticker per instrument
pub type TickerStore = MarketDataStore<Ticker>;

/// Latest depth snapshot per instrument
pub type OrderBookStore = MarketDataStore<OrderBook>;

struct StoreState<S> {
    snapshots: HashMap<MarketKey, S>,
    /// exchange -> base -> quotes, for lookup error precedence and existence checks
    index: HashMap<ExchangeId, HashMap<CurrencyCode, HashSet<CurrencyCode>>>,
}

impl<S: Snapshot> MarketDataStore<S> {
    pub fn new() -> Self {
        MarketDataStore {
            inner: Arc::new(RwLock::new(StoreState {
                snapshots: HashMap::new(),
                index: HashMap::new(),
            })),
        }
    }

    /// Insert or fully replace the snapshot for a triple
    ///
    /// Sets `last_updated`, takes exchange and asset type from the key and
    /// back-fills the pair when the caller left it unset. Snapshots for an
    /// empty exchange name are dropped.
    pub fn upsert(&self, exchange: &ExchangeId, pair: &CurrencyPair, asset: AssetType, mut snapshot: S) {
        if exchange.is_empty() {
            warn!("Dropping {} snapshot with empty exchange name", pair);
            return;
        }

        let key = MarketKey::new(exchange.clone(), pair.clone(), asset);
        snapshot.stamp(&key, Utc::now());

        let mut state = self.inner.write();
        state
            .index
            .entry(key.exchange.clone())
            .or_default()
            .entry(key.pair.base.clone())
            .or_default()
            .insert(key.pair.quote.clone());
        state.snapshots.insert(key, snapshot);
    }

    /// Fetch the stored snapshot for a triple
    ///
    /// A pair known to the exchange whose asset slot was never written yields
    /// the blank snapshot rather than an error.
    pub fn lookup(
        &self,
        exchange: &ExchangeId,
        pair: &CurrencyPair,
        asset: AssetType,
    ) -> Result<S, LookupError> {
        let state = self.inner.read();

        let bases = state
            .index
            .get(exchange)
            .ok_or_else(|| LookupError::ExchangeNotFound(exchange.clone()))?;

        let quotes = bases
            .get(&pair.base)
            .ok_or_else(|| LookupError::PrimaryCurrencyNotFound {
                exchange: exchange.clone(),
                currency: pair.base.clone(),
            })?;

        if !quotes.contains(&pair.quote) {
            return Err(LookupError::SecondaryCurrencyNotFound {
                exchange: exchange.clone(),
                currency: pair.quote.clone(),
            });
        }

        let key = MarketKey::new(exchange.clone(), pair.clone(), asset);
        Ok(state
            .snapshots
            .get(&key)
            .cloned()
            .unwrap_or_else(|| S::blank(&key)))
    }

    /// Check if the exchange has published anything
    pub fn has_exchange(&self, exchange: &ExchangeId) -> bool {
        self.inner.read().index.contains_key(exchange)
    }

    /// Check if the exchange has any market with this base currency
    pub fn exists(&self, exchange: &ExchangeId, base: &CurrencyCode) -> bool {
        self.inner
            .read()
            .index
            .get(exchange)
            .is_some_and(|bases| bases.contains_key(base))
    }

    /// Check if the exchange has published this pair under any asset type
    pub fn exists_pair(&self, exchange: &ExchangeId, pair: &CurrencyPair) -> bool {
        self.inner
            .read()
            .index
            .get(exchange)
            .and_then(|bases| bases.get(&pair.base))
            .is_some_and(|quotes| quotes.contains(&pair.quote))
    }

    /// List all exchanges with at least one snapshot
    pub fn exchanges(&self) -> Vec<ExchangeId> {
        let mut exchanges: Vec<_> = self.inner.read().index.keys().cloned().collect();
        exchanges.sort();
        exchanges
    }

    /// List all pairs published by a specific exchange
    pub fn pairs_for_exchange(&self, exchange: &ExchangeId) -> Vec<CurrencyPair> {
        let state = self.inner.read();
        let Some(bases) = state.index.get(exchange) else {
            return Vec::new();
        };

        let mut pairs: Vec<_> = bases
            .iter()
            .flat_map(|(base, quotes)| {
                quotes
                    .iter()
                    .map(|quote| CurrencyPair::new(base.clone(), quote.clone()))
            })
            .collect();
        pairs.sort();
        pairs
    }

    /// Number of stored snapshots
    pub fn len(&self) -> usize {
        self.inner.read().snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().snapshots.is_empty()
    }
}

impl<S> Clone for MarketDataStore<S> {
    fn clone(&self) -> Self {
        MarketDataStore {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Snapshot> Default for MarketDataStore<S> {
    fn default() -> Self {
        Self::new()
    }
}
