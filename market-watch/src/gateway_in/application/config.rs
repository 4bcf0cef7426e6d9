use market_core::ExchangeId;
use std::time::Duration;

use crate::gateway_in::config::ExchangeConfig;

/// Configuration for one exchange poller
/// Application-level configuration
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Exchange this poller refreshes
    pub exchange_id: ExchangeId,
    /// Delay between two refresh passes
    pub poll_interval: Duration,
    /// Refresh tickers on each pass
    pub tickers: bool,
    /// Refresh order books on each pass
    pub order_books: bool,
}

impl PollerConfig {
    pub fn new(exchange_id: impl Into<ExchangeId>) -> Self {
        PollerConfig {
            exchange_id: exchange_id.into(),
            poll_interval: Duration::from_millis(1000),
            tickers: true,
            order_books: true,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn tickers_only(mut self) -> Self {
        self.tickers = true;
        self.order_books = false;
        self
    }

    pub fn order_books_only(mut self) -> Self {
        self.tickers = false;
        self.order_books = true;
        self
    }
}

impl From<&ExchangeConfig> for PollerConfig {
    fn from(config: &ExchangeConfig) -> Self {
        PollerConfig::new(config.id.as_str()).with_poll_interval(config.poll_interval())
    }
}
