use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::events::EventRequest;
use crate::gateway_in::domain::Instrument;

/// Root configuration for the market watcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfigFile {
    pub exchanges: Vec<ExchangeConfig>,
    #[serde(default)]
    pub engine: EngineConfigJson,
    #[serde(default)]
    pub notifications: NotificationConfig,
    /// Events registered at startup
    #[serde(default)]
    pub events: Vec<EventRequest>,
}

/// Configuration for a single exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Unique identifier for the exchange (e.g., "binance", "kraken")
    pub id: String,
    /// Display name
    pub name: String,
    /// Whether this exchange is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Delay between two refreshes of every pair
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Instruments to keep in the cache
    #[serde(default)]
    pub pairs: Vec<Instrument>,
}

impl ExchangeConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Match on id or display name, ignoring case
    pub fn matches(&self, name: &str) -> bool {
        let name = name.trim();
        self.id.eq_ignore_ascii_case(name) || self.name.eq_ignore_ascii_case(name)
    }
}

/// Event engine configuration (JSON representation)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfigJson {
    #[serde(default = "default_sleep_delay")]
    pub sleep_delay_ms: u64,
    #[serde(default)]
    pub verbose: bool,
}

impl Default for EngineConfigJson {
    fn default() -> Self {
        EngineConfigJson {
            sleep_delay_ms: default_sleep_delay(),
            verbose: false,
        }
    }
}

impl EngineConfigJson {
    /// Convert to application-layer EngineConfig
    pub fn to_engine_config(&self) -> crate::events::EngineConfig {
        crate::events::EngineConfig {
            sleep_delay: Duration::from_millis(self.sleep_delay_ms),
            verbose: self.verbose,
        }
    }
}

/// Named notification channels events may target with `NOTIFY,<target>`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub targets: Vec<String>,
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_poll_interval() -> u64 {
    1000
}

fn default_sleep_delay() -> u64 {
    500
}
