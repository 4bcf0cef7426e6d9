mod config;
mod exchange_manager;
mod refresh;

pub use config::PollerConfig;
pub use exchange_manager::ExchangeManager;
pub use refresh::{
    RefreshSummary, fetch_order_book, fetch_ticker, refresh_source, update_order_book,
    update_ticker,
};
