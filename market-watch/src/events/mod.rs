//! Event Registry and Event Engine
//!
//! Users register watch conditions ("BTC-USD last price on bitstamp >= 50000",
//! "any ask level on kraken worth more than 1M") together with an action.
//! The engine polls the market data cache and runs each action the first
//! time its condition holds.
//!
//! ```text
//!  register ──▶ EventRegistry ◀── scan ── EventManager ── lookup ──▶ MarketDataCache
//!                                             │
//!                                             └── dispatch ──▶ Notifier / log
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{
    EngineConfig, EngineHandle, EventManager, EventRegistry, ExchangeDirectory, MarketDataReader,
    Notifier, NotifyError,
};
pub use domain::{
    Action, BookSide, Condition, ConditionRequest, Event, EventError, EventId, EventRequest, Item,
    NOTIFY_ALL, Operator,
};
pub use infrastructure::{ChannelNotifier, LogNotifier, Notification};
