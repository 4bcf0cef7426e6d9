use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an exchange, normalized to lower case
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ExchangeId(String);

impl ExchangeId {
    pub fn new(id: impl Into<String>) -> Self {
        ExchangeId(id.into().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ExchangeId {
    fn from(s: &str) -> Self {
        ExchangeId::new(s)
    }
}

impl From<String> for ExchangeId {
    fn from(s: String) -> Self {
        ExchangeId::new(s)
    }
}

impl From<&ExchangeId> for ExchangeId {
    fn from(id: &ExchangeId) -> Self {
        id.clone()
    }
}

impl From<ExchangeId> for String {
    fn from(id: ExchangeId) -> Self {
        id.0
    }
}

/// Well-known exchange identifiers
impl ExchangeId {
    pub fn binance() -> Self {
        ExchangeId::new("binance")
    }

    pub fn kraken() -> Self {
        ExchangeId::new("kraken")
    }

    pub fn simulator() -> Self {
        ExchangeId::new("simulator")
    }
}
