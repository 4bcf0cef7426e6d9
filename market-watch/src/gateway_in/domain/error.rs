use market_core::{AssetType, CurrencyPair, ExchangeId};
use thiserror::Error;

use crate::market_data::LookupError;

/// Failures reported by an exchange connector
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("{exchange} does not list {pair} [{asset}]")]
    UnsupportedInstrument {
        exchange: ExchangeId,
        pair: CurrencyPair,
        asset: AssetType,
    },

    #[error("{exchange} unavailable: {reason}")]
    Unavailable { exchange: ExchangeId, reason: String },

    #[error("Malformed response from {exchange}: {reason}")]
    Malformed { exchange: ExchangeId, reason: String },

    #[error(transparent)]
    Lookup(#[from] LookupError),
}
