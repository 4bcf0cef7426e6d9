//! Market data cache shared by every exchange connector and consumer.
//!
//! Two independent stores with identical design: one for tickers, one for
//! order book depth. Each owns its own lock, so reading a ticker and then a
//! book for the "same" instant may observe snapshots taken at different
//! times.
//!
//! ```text
//!  connectors ──upsert──▶ ┌──────────────┐ ◀──lookup── event engine
//!                         │ TickerStore  │
//!                         ├──────────────┤ ◀──lookup── reporting
//!  connectors ──upsert──▶ │OrderBookStore│
//!                         └──────────────┘
//! ```

mod error;
mod store;

pub use error::LookupError;
pub use store::{MarketDataStore, MarketKey, OrderBookStore, Snapshot, TickerStore};

/// Both stores bundled for injection into connectors and the event engine
#[derive(Clone, Default)]
pub struct MarketDataCache {
    pub tickers: TickerStore,
    pub order_books: OrderBookStore,
}

impl MarketDataCache {
    pub fn new() -> Self {
        MarketDataCache {
            tickers: TickerStore::new(),
            order_books: OrderBookStore::new(),
        }
    }
}
