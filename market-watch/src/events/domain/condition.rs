//! Comparison predicates evaluated against cached market data

use market_core::{BookItem, OrderBook};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::EventError;

/// Comparison operator between an observed value and a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operator {
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Equal,
}

impl Operator {
    pub const ALL: [Operator; 5] = [
        Operator::GreaterThan,
        Operator::GreaterThanOrEqual,
        Operator::LessThan,
        Operator::LessThanOrEqual,
        Operator::Equal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::Equal => "==",
        }
    }

    /// Apply `actual <op> threshold`
    pub fn evaluate(&self, actual: Decimal, threshold: Decimal) -> bool {
        match self {
            Operator::GreaterThan => actual > threshold,
            Operator::GreaterThanOrEqual => actual >= threshold,
            Operator::LessThan => actual < threshold,
            Operator::LessThanOrEqual => actual <= threshold,
            Operator::Equal => actual == threshold,
        }
    }
}

impl FromStr for Operator {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == trimmed)
            .ok_or_else(|| EventError::InvalidCondition(s.to_string()))
    }
}

impl TryFrom<String> for Operator {
    type Error = EventError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side of the book a level was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookSide {
    Bid,
    Ask,
}

impl fmt::Display for BookSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookSide::Bid => f.write_str("bid"),
            BookSide::Ask => f.write_str("ask"),
        }
    }
}

/// Threshold parameters of an event
///
/// `price` is compared against the ticker's last price; `orderbook_amount`
/// against the notional (amount × price) of individual book levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub operator: Operator,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub orderbook_amount: Decimal,
    #[serde(default)]
    pub check_bids: bool,
    #[serde(default)]
    pub check_bids_and_asks: bool,
}

impl Condition {
    /// Price condition against the last traded price
    pub fn price(operator: Operator, price: Decimal) -> Self {
        Condition {
            operator,
            price,
            orderbook_amount: Decimal::ZERO,
            check_bids: false,
            check_bids_and_asks: false,
        }
    }

    /// Depth condition against per-level notional, asks only unless widened
    pub fn order_book(operator: Operator, orderbook_amount: Decimal) -> Self {
        Condition {
            operator,
            price: Decimal::ZERO,
            orderbook_amount,
            check_bids: false,
            check_bids_and_asks: false,
        }
    }

    /// Check bids only
    pub fn bids_only(mut self) -> Self {
        self.check_bids = true;
        self.check_bids_and_asks = false;
        self
    }

    /// Check both sides of the book
    pub fn both_sides(mut self) -> Self {
        self.check_bids_and_asks = true;
        self
    }

    pub fn checks_bids(&self) -> bool {
        self.check_bids || self.check_bids_and_asks
    }

    /// Asks are checked whenever bids are not exclusively selected
    pub fn checks_asks(&self) -> bool {
        !self.check_bids || self.check_bids_and_asks
    }

    pub fn matches_price(&self, last: Decimal) -> bool {
        self.operator.evaluate(last, self.price)
    }

    /// First level on a checked side whose notional satisfies the operator
    ///
    /// Returns the level with its notional. Levels whose notional overflows
    /// never match.
    pub fn matching_level<'a>(
        &self,
        book: &'a OrderBook,
    ) -> Option<(BookSide, &'a BookItem, Decimal)> {
        let bids = book
            .bids
            .iter()
            .filter(|_| self.checks_bids())
            .map(|level| (BookSide::Bid, level));
        let asks = book
            .asks
            .iter()
            .filter(|_| self.checks_asks())
            .map(|level| (BookSide::Ask, level));

        bids.chain(asks).find_map(|(side, level)| {
            let notional = level.notional()?;
            self.operator
                .evaluate(notional, self.orderbook_amount)
                .then_some((side, level, notional))
        })
    }
}
