//! Simulated exchange source
//!
//! A random-walk market for running the watcher without network access.
//! Every ticker fetch moves the price one step; order book fetches build a
//! ladder of levels around the current price.

use async_trait::async_trait;
use market_core::{AssetType, BookItem, CurrencyPair, ExchangeId, OrderBook, Ticker};
use parking_lot::RwLock;
use rand::prelude::*;
use rand_distr::StandardNormal;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::gateway_in::domain::{Instrument, MarketDataSource, SourceError};

/// Configuration for the simulated source
#[derive(Debug, Clone)]
pub struct SimulatedSourceConfig {
    /// Standard deviation of the relative price move per ticker fetch
    pub volatility: f64,
    /// Distance between best bid and best ask, in basis points
    pub spread_bps: f64,
    /// Distance between two consecutive book levels, in basis points
    pub level_step_bps: f64,
    /// Levels per side
    pub depth_levels: usize,
    /// Random seed (for reproducibility)
    pub seed: Option<u64>,
}

impl Default for SimulatedSourceConfig {
    fn default() -> Self {
        Self {
            volatility: 0.002,
            spread_bps: 10.0,
            level_step_bps: 5.0,
            depth_levels: 10,
            seed: None,
        }
    }
}

impl SimulatedSourceConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = volatility.max(0.0);
        self
    }

    pub fn with_depth_levels(mut self, levels: usize) -> Self {
        self.depth_levels = levels;
        self
    }
}

struct SimMarket {
    price: f64,
    high: f64,
    low: f64,
    all_time_high: f64,
    volume: f64,
}

impl SimMarket {
    fn new(price: f64) -> Self {
        SimMarket {
            price,
            high: price,
            low: price,
            all_time_high: price,
            volume: 0.0,
        }
    }
}

struct SimState {
    rng: StdRng,
    markets: HashMap<Instrument, SimMarket>,
}

/// Random-walk market data for a fixed set of instruments
pub struct SimulatedSource {
    exchange: ExchangeId,
    instruments: Vec<Instrument>,
    config: SimulatedSourceConfig,
    state: RwLock<SimState>,
}

impl SimulatedSource {
    /// Create a new simulated source with default configuration
    pub fn new(exchange: impl Into<ExchangeId>, instruments: Vec<Instrument>) -> Self {
        Self::with_config(exchange, instruments, SimulatedSourceConfig::default())
    }

    /// Create with specific configuration
    pub fn with_config(
        exchange: impl Into<ExchangeId>,
        instruments: Vec<Instrument>,
        config: SimulatedSourceConfig,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            exchange: exchange.into(),
            instruments,
            state: RwLock::new(SimState {
                rng,
                markets: HashMap::new(),
            }),
            config,
        }
    }

    /// Current simulated price of an instrument, if it has been touched
    pub fn price(&self, instrument: &Instrument) -> Option<f64> {
        self.state.read().markets.get(instrument).map(|m| m.price)
    }

    fn instrument(&self, pair: &CurrencyPair, asset: AssetType) -> Result<Instrument, SourceError> {
        let instrument = Instrument::new(pair.clone(), asset);
        if self.instruments.contains(&instrument) {
            Ok(instrument)
        } else {
            Err(SourceError::UnsupportedInstrument {
                exchange: self.exchange.clone(),
                pair: pair.clone(),
                asset,
            })
        }
    }

    fn next_ticker(&self, instrument: &Instrument) -> Result<Ticker, SourceError> {
        let mut guard = self.state.write();
        let state = &mut *guard;
        let market = state
            .markets
            .entry(instrument.clone())
            .or_insert_with(|| SimMarket::new(initial_price(instrument)));

        let step: f64 = state.rng.sample(StandardNormal);
        market.price = (market.price * (1.0 + step * self.config.volatility)).max(0.01);
        market.high = market.high.max(market.price);
        market.low = market.low.min(market.price);
        market.all_time_high = market.all_time_high.max(market.price);
        market.volume += state.rng.gen_range(0.0..10.0);

        let half_spread = market.price * self.config.spread_bps / 20_000.0;

        Ok(
            Ticker::new(&self.exchange, instrument.pair.clone(), instrument.asset)
                .with_last(self.decimal(market.price, 2)?)
                .with_bid_ask(
                    self.decimal(market.price - half_spread, 2)?,
                    self.decimal(market.price + half_spread, 2)?,
                )
                .with_range(self.decimal(market.low, 2)?, self.decimal(market.high, 2)?)
                .with_volume(self.decimal(market.volume, 4)?)
                .with_all_time_high(self.decimal(market.all_time_high, 2)?),
        )
    }

    fn next_order_book(&self, instrument: &Instrument) -> Result<OrderBook, SourceError> {
        let mut guard = self.state.write();
        let state = &mut *guard;
        let price = state
            .markets
            .entry(instrument.clone())
            .or_insert_with(|| SimMarket::new(initial_price(instrument)))
            .price;

        let half_spread = price * self.config.spread_bps / 20_000.0;
        let step = price * self.config.level_step_bps / 10_000.0;

        let mut bids = Vec::with_capacity(self.config.depth_levels);
        let mut asks = Vec::with_capacity(self.config.depth_levels);
        for level in 0..self.config.depth_levels {
            let offset = half_spread + step * level as f64;
            let bid_amount = state.rng.gen_range(0.05..5.0);
            let ask_amount = state.rng.gen_range(0.05..5.0);

            bids.push(
                BookItem::new(self.decimal(price - offset, 2)?, self.decimal(bid_amount, 4)?)
                    .with_id(level as i64),
            );
            asks.push(
                BookItem::new(self.decimal(price + offset, 2)?, self.decimal(ask_amount, 4)?)
                    .with_id(level as i64),
            );
        }

        Ok(OrderBook::new(&self.exchange, instrument.pair.clone(), instrument.asset)
            .with_bids(bids)
            .with_asks(asks))
    }

    fn decimal(&self, value: f64, dp: u32) -> Result<Decimal, SourceError> {
        Decimal::from_f64_retain(value)
            .map(|d| d.round_dp(dp))
            .ok_or_else(|| SourceError::Malformed {
                exchange: self.exchange.clone(),
                reason: format!("price out of range: {value}"),
            })
    }
}

/// Starting price for a fresh random walk
fn initial_price(instrument: &Instrument) -> f64 {
    let spot = match instrument.pair.base.as_str() {
        "BTC" | "XBT" => 50_000.0,
        "ETH" => 3_000.0,
        "SOL" => 150.0,
        "XRP" | "ADA" | "DOGE" => 0.5,
        _ => 100.0,
    };

    match instrument.asset {
        AssetType::Futures | AssetType::Perpetual => spot * 1.001,
        _ => spot,
    }
}

#[async_trait]
impl MarketDataSource for SimulatedSource {
    fn exchange(&self) -> &ExchangeId {
        &self.exchange
    }

    fn pairs(&self) -> Vec<Instrument> {
        self.instruments.clone()
    }

    async fn fetch_remote_ticker(
        &self,
        pair: &CurrencyPair,
        asset: AssetType,
    ) -> Result<Ticker, SourceError> {
        let instrument = self.instrument(pair, asset)?;
        self.next_ticker(&instrument)
    }

    async fn fetch_remote_order_book(
        &self,
        pair: &CurrencyPair,
        asset: AssetType,
    ) -> Result<OrderBook, SourceError> {
        let instrument = self.instrument(pair, asset)?;
        self.next_order_book(&instrument)
    }
}
