mod order_book;
mod ticker;

pub use order_book::{BookItem, BookTotals, OrderBook};
pub use ticker::{Ticker, TickerField};
