pub mod entities;
pub mod error;
pub mod value_objects;

// Re-export value objects at crate root for convenience
pub use value_objects::{AssetType, CurrencyCode, CurrencyPair, ExchangeId, Timestamp};

// Re-export entities at crate root
pub use entities::{BookItem, BookTotals, OrderBook, Ticker, TickerField};

pub use error::ParseError;
