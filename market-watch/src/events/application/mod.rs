//! Application Layer - registration and evaluation use cases
//!
//! The registry and the engine depend only on the ports declared here;
//! infrastructure supplies the concrete notifier and market data reader.

mod engine;
mod ports;
mod registry;

pub use engine::{EngineConfig, EngineHandle, EventManager};
pub use ports::{ExchangeDirectory, MarketDataReader, Notifier, NotifyError};
pub use registry::EventRegistry;
