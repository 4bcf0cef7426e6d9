mod error;
mod instrument;
mod source;

pub use error::SourceError;
pub use instrument::Instrument;
pub use source::MarketDataSource;
