//! Infrastructure Layer - concrete port implementations

mod market_data_adapter;
mod notifiers;

pub use notifiers::{ChannelNotifier, LogNotifier, Notification};
