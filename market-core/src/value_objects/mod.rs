mod asset_type;
mod currency;
mod exchange;

pub use asset_type::AssetType;
pub use currency::{CurrencyCode, CurrencyPair};
pub use exchange::ExchangeId;

pub type Timestamp = chrono::DateTime<chrono::Utc>;
