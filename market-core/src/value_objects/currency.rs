//! Currency codes and base/quote pairs
//!
//! Both are normalized to upper case on construction, so `btc-usd` and
//! `BTC-USD` compare equal and hash to the same key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Separators accepted when parsing a pair string
const PAIR_SEPARATORS: [char; 3] = ['-', '/', '_'];

/// A single currency leg (e.g. `BTC`)
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Build a code without validation. Input is trimmed and upper-cased.
    pub fn new(code: impl Into<String>) -> Self {
        CurrencyCode(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for CurrencyCode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = CurrencyCode::new(s);
        if code.is_empty() || !code.0.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ParseError::InvalidCurrency(s.to_string()));
        }
        Ok(code)
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        CurrencyCode::new(s)
    }
}

impl From<String> for CurrencyCode {
    fn from(s: String) -> Self {
        CurrencyCode::new(s)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

/// A traded base/quote combination (e.g. `BTC-USD`)
///
/// The default value has empty legs and stands for "not set"; the market
/// data stores back-fill it from the lookup key on upsert.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyPair {
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
}

impl CurrencyPair {
    pub fn new(base: impl Into<CurrencyCode>, quote: impl Into<CurrencyCode>) -> Self {
        CurrencyPair {
            base: base.into(),
            quote: quote.into(),
        }
    }

    /// True when neither leg has been set
    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.quote.is_empty()
    }

    /// Exchange-style concatenated symbol (e.g. `BTCUSD`)
    pub fn symbol(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }
}

impl FromStr for CurrencyPair {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidPair(s.to_string());

        let (base, quote) = s.trim().split_once(PAIR_SEPARATORS).ok_or_else(invalid)?;
        let base: CurrencyCode = base.parse().map_err(|_| invalid())?;
        let quote: CurrencyCode = quote.parse().map_err(|_| invalid())?;

        Ok(CurrencyPair { base, quote })
    }
}

impl TryFrom<String> for CurrencyPair {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s.is_empty() {
            return Ok(CurrencyPair::default());
        }
        s.parse()
    }
}

impl From<CurrencyPair> for String {
    fn from(pair: CurrencyPair) -> Self {
        if pair.is_empty() {
            String::new()
        } else {
            pair.to_string()
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.base, self.quote)
    }
}
