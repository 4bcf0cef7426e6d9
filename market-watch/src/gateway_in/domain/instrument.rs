use market_core::{AssetType, CurrencyPair};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A tradeable pair within one market segment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instrument {
    pub pair: CurrencyPair,
    #[serde(default)]
    pub asset: AssetType,
}

impl Instrument {
    pub fn new(pair: CurrencyPair, asset: AssetType) -> Self {
        Instrument { pair, asset }
    }

    pub fn spot(pair: CurrencyPair) -> Self {
        Instrument::new(pair, AssetType::Spot)
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.pair, self.asset)
    }
}
