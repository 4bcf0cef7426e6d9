use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;
use crate::value_objects::{AssetType, CurrencyPair, ExchangeId, Timestamp};

/// Latest market summary for one instrument on one exchange
///
/// A ticker is always replaced as a whole; there is no field-level merge.
/// `last_updated` is owned by the store and is overwritten on every upsert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub exchange: ExchangeId,
    pub pair: CurrencyPair,
    /// Display form of `pair`, filled in by the store
    #[serde(default)]
    pub symbol: String,
    pub asset: AssetType,
    pub last: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub bid: Decimal,
    pub ask: Decimal,
    pub volume: Decimal,
    pub all_time_high: Decimal,
    pub last_updated: Option<Timestamp>,
}

impl Ticker {
    pub fn new(exchange: impl Into<ExchangeId>, pair: CurrencyPair, asset: AssetType) -> Self {
        Ticker {
            exchange: exchange.into(),
            symbol: pair.to_string(),
            pair,
            asset,
            ..Default::default()
        }
    }

    pub fn with_last(mut self, last: Decimal) -> Self {
        self.last = last;
        self
    }

    pub fn with_bid_ask(mut self, bid: Decimal, ask: Decimal) -> Self {
        self.bid = bid;
        self.ask = ask;
        self
    }

    pub fn with_range(mut self, low: Decimal, high: Decimal) -> Self {
        self.low = low;
        self.high = high;
        self
    }

    pub fn with_volume(mut self, volume: Decimal) -> Self {
        self.volume = volume;
        self
    }

    pub fn with_all_time_high(mut self, ath: Decimal) -> Self {
        self.all_time_high = ath;
        self
    }

    /// A zero last price means nothing has been published yet
    pub fn has_data(&self) -> bool {
        !self.last.is_zero()
    }

    /// Read a single price field by name
    pub fn field(&self, field: TickerField) -> Decimal {
        match field {
            TickerField::Last => self.last,
            TickerField::High => self.high,
            TickerField::Low => self.low,
            TickerField::Bid => self.bid,
            TickerField::Ask => self.ask,
            TickerField::Volume => self.volume,
            TickerField::AllTimeHigh => self.all_time_high,
        }
    }
}

/// Named price fields of a ticker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickerField {
    Last,
    High,
    Low,
    Bid,
    Ask,
    Volume,
    AllTimeHigh,
}

impl FromStr for TickerField {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "last" => Ok(TickerField::Last),
            "high" => Ok(TickerField::High),
            "low" => Ok(TickerField::Low),
            "bid" => Ok(TickerField::Bid),
            "ask" => Ok(TickerField::Ask),
            "volume" => Ok(TickerField::Volume),
            "ath" => Ok(TickerField::AllTimeHigh),
            _ => Err(ParseError::UnknownTickerField(s.to_string())),
        }
    }
}

impl fmt::Display for TickerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TickerField::Last => "last",
            TickerField::High => "high",
            TickerField::Low => "low",
            TickerField::Bid => "bid",
            TickerField::Ask => "ask",
            TickerField::Volume => "volume",
            TickerField::AllTimeHigh => "ath",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn btc_usd() -> Ticker {
        Ticker::new("Gemini", CurrencyPair::new("btc", "usd"), AssetType::Spot)
            .with_last(dec!(50000.5))
            .with_bid_ask(dec!(50000), dec!(50001))
            .with_range(dec!(49000), dec!(51000))
            .with_volume(dec!(1234.5))
            .with_all_time_high(dec!(69000))
    }

    #[test]
    fn test_new_fills_identity() {
        let ticker = btc_usd();
        assert_eq!(ticker.exchange.as_str(), "gemini");
        assert_eq!(ticker.symbol, "BTC-USD");
        assert!(ticker.last_updated.is_none());
        assert!(ticker.has_data());
    }

    #[test]
    fn test_field_lookup_by_name() {
        let ticker = btc_usd();
        let field = |name: &str| ticker.field(name.parse().unwrap());

        assert_eq!(field("LAST"), dec!(50000.5));
        assert_eq!(field("bid"), dec!(50000));
        assert_eq!(field("ask"), dec!(50001));
        assert_eq!(field("low"), dec!(49000));
        assert_eq!(field("high"), dec!(51000));
        assert_eq!(field("volume"), dec!(1234.5));
        assert_eq!(field("ath"), dec!(69000));
        assert!("open".parse::<TickerField>().is_err());
    }

    #[test]
    fn test_default_has_no_data() {
        assert!(!Ticker::default().has_data());
    }
}
