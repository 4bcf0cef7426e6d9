use market_core::{AssetType, CurrencyPair, ExchangeId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use super::action::Action;
use super::condition::Condition;
use super::error::EventError;

/// Registry-assigned event identifier, never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(u64);

impl EventId {
    pub const fn new(id: u64) -> Self {
        EventId(id)
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of market data an event watches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Item {
    Price,
    #[serde(rename = "ORDERBOOK")]
    OrderBook,
}

impl FromStr for Item {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PRICE" => Ok(Item::Price),
            "ORDERBOOK" => Ok(Item::OrderBook),
            _ => Err(EventError::InvalidItem(s.to_string())),
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Price => f.write_str("PRICE"),
            Item::OrderBook => f.write_str("ORDERBOOK"),
        }
    }
}

/// A watch condition plus the action to run the first time it holds
///
/// Everything except the executed flag is fixed at registration. The flag
/// moves from pending to executed once and never back.
#[derive(Debug)]
pub struct Event {
    pub id: EventId,
    pub exchange: ExchangeId,
    pub item: Item,
    pub condition: Condition,
    pub pair: CurrencyPair,
    pub asset: AssetType,
    pub action: Action,
    executed: AtomicBool,
}

impl Event {
    pub(crate) fn new(
        id: EventId,
        exchange: ExchangeId,
        item: Item,
        condition: Condition,
        pair: CurrencyPair,
        asset: AssetType,
        action: Action,
    ) -> Self {
        Event {
            id,
            exchange,
            item,
            condition,
            pair,
            asset,
            action,
            executed: AtomicBool::new(false),
        }
    }

    pub fn is_executed(&self) -> bool {
        self.executed.load(Ordering::Acquire)
    }

    /// Claim the pending -> executed transition
    ///
    /// Returns true for exactly one caller; every later call returns false.
    pub(crate) fn mark_executed(&self) -> bool {
        self.executed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Threshold relevant to this event's item
    pub fn threshold(&self) -> Decimal {
        match self.item {
            Item::Price => self.condition.price,
            Item::OrderBook => self.condition.orderbook_amount,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "If the {} [{}] {} on {} is {} {}",
            self.pair.symbol(),
            self.asset,
            self.item,
            self.exchange,
            self.condition.operator,
            self.threshold(),
        )?;

        if self.item == Item::OrderBook {
            let sides = match (self.condition.checks_bids(), self.condition.checks_asks()) {
                (true, true) => "bids and asks",
                (true, false) => "bids",
                _ => "asks",
            };
            write!(f, " on any level of {sides}")?;
        }

        write!(f, " then {}.", self.action)
    }
}

/// Threshold parameters as received from a front-end, operator unparsed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionRequest {
    pub operator: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub orderbook_amount: Decimal,
    #[serde(default)]
    pub check_bids: bool,
    #[serde(default)]
    pub check_bids_and_asks: bool,
}

/// Untyped registration request (configuration files, RPC front-ends)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRequest {
    pub exchange: String,
    pub item: String,
    pub condition: ConditionRequest,
    pub pair: CurrencyPair,
    #[serde(default)]
    pub asset: AssetType,
    pub action: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::domain::condition::Operator;
    use rust_decimal_macros::dec;

    fn event(item: Item, condition: Condition) -> Event {
        Event::new(
            EventId::new(3),
            ExchangeId::new("Bitstamp"),
            item,
            condition,
            CurrencyPair::new("BTC", "USD"),
            AssetType::Spot,
            Action::ConsolePrint,
        )
    }

    #[test]
    fn test_item_parse() {
        assert_eq!("price".parse::<Item>().unwrap(), Item::Price);
        assert_eq!("OrderBook".parse::<Item>().unwrap(), Item::OrderBook);
        assert_eq!(
            "TRADES".parse::<Item>(),
            Err(EventError::InvalidItem("TRADES".to_string()))
        );
    }

    #[test]
    fn test_mark_executed_once() {
        let event = event(Item::Price, Condition::price(Operator::GreaterThan, dec!(1)));
        assert!(!event.is_executed());
        assert!(event.mark_executed());
        assert!(event.is_executed());
        assert!(!event.mark_executed());
        assert!(event.is_executed());
    }

    #[test]
    fn test_price_description() {
        let event = event(Item::Price, Condition::price(Operator::GreaterThanOrEqual, dec!(50000)));
        assert_eq!(
            event.to_string(),
            "If the BTCUSD [spot] PRICE on bitstamp is >= 50000 then CONSOLE_PRINT."
        );
    }

    #[test]
    fn test_order_book_description() {
        let condition = Condition::order_book(Operator::LessThan, dec!(10)).bids_only();
        let event = event(Item::OrderBook, condition);
        assert_eq!(
            event.to_string(),
            "If the BTCUSD [spot] ORDERBOOK on bitstamp is < 10 on any level of bids then CONSOLE_PRINT."
        );
    }

    #[test]
    fn test_request_deserialize_defaults() {
        let json = r#"{
            "exchange": "Binance",
            "item": "ORDERBOOK",
            "condition": { "operator": ">", "orderbook_amount": "1000", "check_bids": true },
            "pair": "ETH-USDT",
            "action": "NOTIFY,ALL"
        }"#;

        let request: EventRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.asset, AssetType::Spot);
        assert_eq!(request.condition.orderbook_amount, dec!(1000));
        assert!(request.condition.check_bids);
        assert!(!request.condition.check_bids_and_asks);
        assert_eq!(request.pair, CurrencyPair::new("ETH", "USDT"));
    }
}
