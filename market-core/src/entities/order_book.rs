//! Order book depth snapshots
//!
//! Levels are stored exactly as the producer supplied them. Connectors are
//! expected to send bids descending and asks ascending, but nothing here
//! relies on that: best bid/ask are found by scanning.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::value_objects::{AssetType, CurrencyPair, ExchangeId, Timestamp};

/// A single resting price level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookItem {
    pub price: Decimal,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl BookItem {
    pub fn new(price: Decimal, amount: Decimal) -> Self {
        BookItem {
            price,
            amount,
            id: None,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Quote-currency value of the level (amount × price)
    ///
    /// `None` when the product does not fit in a `Decimal`.
    pub fn notional(&self) -> Option<Decimal> {
        self.amount.checked_mul(self.price)
    }
}

impl From<(Decimal, Decimal)> for BookItem {
    fn from((price, amount): (Decimal, Decimal)) -> Self {
        BookItem::new(price, amount)
    }
}

/// Aggregate size of one side of the book
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookTotals {
    /// Sum of level amounts
    pub amount: Decimal,
    /// Sum of amount × price
    pub notional: Decimal,
}

impl BookTotals {
    /// Sums saturate at `Decimal::MAX` / `Decimal::MIN`
    fn of(levels: &[BookItem]) -> Self {
        levels.iter().fold(BookTotals::default(), |acc, level| BookTotals {
            amount: acc.amount.saturating_add(level.amount),
            notional: acc
                .notional
                .saturating_add(level.amount.saturating_mul(level.price)),
        })
    }
}

/// Full depth snapshot for one instrument on one exchange
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    pub exchange: ExchangeId,
    pub pair: CurrencyPair,
    /// Display form of `pair`, filled in by the store
    #[serde(default)]
    pub symbol: String,
    pub asset: AssetType,
    pub bids: Vec<BookItem>,
    pub asks: Vec<BookItem>,
    pub last_updated: Option<Timestamp>,
}

impl OrderBook {
    pub fn new(exchange: impl Into<ExchangeId>, pair: CurrencyPair, asset: AssetType) -> Self {
        OrderBook {
            exchange: exchange.into(),
            symbol: pair.to_string(),
            pair,
            asset,
            ..Default::default()
        }
    }

    pub fn with_bids(mut self, bids: impl IntoIterator<Item = impl Into<BookItem>>) -> Self {
        self.bids = bids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_asks(mut self, asks: impl IntoIterator<Item = impl Into<BookItem>>) -> Self {
        self.asks = asks.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    pub fn total_bids(&self) -> BookTotals {
        BookTotals::of(&self.bids)
    }

    pub fn total_asks(&self) -> BookTotals {
        BookTotals::of(&self.asks)
    }

    /// Highest bid price level
    pub fn best_bid(&self) -> Option<&BookItem> {
        self.bids.iter().max_by_key(|level| level.price)
    }

    /// Lowest ask price level
    pub fn best_ask(&self) -> Option<&BookItem> {
        self.asks.iter().min_by_key(|level| level.price)
    }

    pub fn mid_price(&self) -> Option<Decimal> {
        let bid = self.best_bid()?.price;
        let ask = self.best_ask()?.price;
        Some((bid + ask) / Decimal::TWO)
    }

    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()?.price - self.best_bid()?.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn book() -> OrderBook {
        OrderBook::new("kraken", CurrencyPair::new("ETH", "USD"), AssetType::Spot)
            .with_bids([(dec!(3000), dec!(2)), (dec!(2999), dec!(5))])
            .with_asks([(dec!(3002), dec!(1)), (dec!(3001), dec!(4))])
    }

    #[test]
    fn test_totals() {
        let book = book();

        let bids = book.total_bids();
        assert_eq!(bids.amount, dec!(7));
        assert_eq!(bids.notional, dec!(20995));

        let asks = book.total_asks();
        assert_eq!(asks.amount, dec!(5));
        assert_eq!(asks.notional, dec!(15006));
    }

    #[test]
    fn test_best_levels_ignore_ordering() {
        let book = book();
        assert_eq!(book.best_bid().unwrap().price, dec!(3000));
        assert_eq!(book.best_ask().unwrap().price, dec!(3001));
        assert_eq!(book.spread(), Some(dec!(1)));
        assert_eq!(book.mid_price(), Some(dec!(3000.5)));
    }

    #[test]
    fn test_empty_book() {
        let book = OrderBook::default();
        assert!(book.is_empty());
        assert_eq!(book.total_bids(), BookTotals::default());
        assert!(book.mid_price().is_none());
    }

    #[test]
    fn test_level_notional_and_id() {
        let level = BookItem::new(dec!(10), dec!(5)).with_id(42);
        assert_eq!(level.notional(), Some(dec!(50)));
        assert_eq!(level.id, Some(42));
    }

    #[test]
    fn test_huge_levels_do_not_panic() {
        let huge = BookItem::new(Decimal::MAX, dec!(2));
        assert_eq!(huge.notional(), None);

        let book = OrderBook::new("kraken", CurrencyPair::new("ETH", "USD"), AssetType::Spot)
            .with_asks([huge, BookItem::new(dec!(1), Decimal::MAX)]);
        let asks = book.total_asks();
        assert_eq!(asks.amount, Decimal::MAX);
        assert_eq!(asks.notional, Decimal::MAX);
    }
}
