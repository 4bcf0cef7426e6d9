use market_core::{CurrencyCode, ExchangeId};
use thiserror::Error;

/// Reasons a cache lookup can miss
///
/// These are expected while connectors are still warming up; callers treat
/// them as "no data yet" and try again later.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("No market data for exchange {0}")]
    ExchangeNotFound(ExchangeId),

    #[error("Primary currency {currency} not found on {exchange}")]
    PrimaryCurrencyNotFound {
        exchange: ExchangeId,
        currency: CurrencyCode,
    },

    #[error("Secondary currency {currency} not found on {exchange}")]
    SecondaryCurrencyNotFound {
        exchange: ExchangeId,
        currency: CurrencyCode,
    },
}
