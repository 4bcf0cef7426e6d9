//! Error types for the market-core crate

use thiserror::Error;

/// Failures turning user or wire input into identifier types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid currency code: {0:?}")]
    InvalidCurrency(String),

    #[error("Invalid currency pair: {0:?}")]
    InvalidPair(String),

    #[error("Unknown asset type: {0:?}")]
    UnknownAssetType(String),

    #[error("Unknown ticker field: {0:?}")]
    UnknownTickerField(String),
}
