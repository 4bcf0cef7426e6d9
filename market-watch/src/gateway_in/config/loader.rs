use market_core::ExchangeId;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use super::types::{ExchangeConfig, GatewayConfigFile};
use crate::events::ExchangeDirectory;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("No enabled exchanges in config")]
    NoEnabledExchanges,
    #[error("Exchange entry with empty id")]
    EmptyExchangeId,
    #[error("Duplicate exchange id: {0}")]
    DuplicateExchange(String),
    #[error("Exchange {0} has a zero poll interval")]
    ZeroPollInterval(String),
    #[error("Engine sleep delay must be greater than zero")]
    ZeroSleepDelay,
}

/// Load configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<GatewayConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: GatewayConfigFile = serde_json::from_str(&content)?;
    Ok(config)
}

/// Load configuration from a JSON string
pub fn load_config_from_str(json: &str) -> Result<GatewayConfigFile, ConfigError> {
    let config: GatewayConfigFile = serde_json::from_str(json)?;
    Ok(config)
}

/// Load the default embedded configuration
pub fn load_default_config() -> Result<GatewayConfigFile, ConfigError> {
    let default_config = include_str!("default_config.json");
    load_config_from_str(default_config)
}

impl GatewayConfigFile {
    /// Get only enabled exchanges
    pub fn enabled_exchanges(&self) -> Vec<&ExchangeConfig> {
        self.exchanges.iter().filter(|e| e.enabled).collect()
    }

    /// Get a specific exchange by id or name
    pub fn get_exchange(&self, id: &str) -> Option<&ExchangeConfig> {
        self.exchanges.iter().find(|e| e.matches(id))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for exchange in &self.exchanges {
            let id = ExchangeId::new(&exchange.id);
            if id.is_empty() {
                return Err(ConfigError::EmptyExchangeId);
            }
            if !seen.insert(id) {
                return Err(ConfigError::DuplicateExchange(exchange.id.clone()));
            }
            if exchange.poll_interval_ms == 0 {
                return Err(ConfigError::ZeroPollInterval(exchange.id.clone()));
            }
        }

        if self.engine.sleep_delay_ms == 0 {
            return Err(ConfigError::ZeroSleepDelay);
        }

        if self.enabled_exchanges().is_empty() {
            return Err(ConfigError::NoEnabledExchanges);
        }
        Ok(())
    }
}

impl ExchangeDirectory for GatewayConfigFile {
    /// Accepts the id or display name; always answers with the id
    fn resolve(&self, name: &str) -> Option<ExchangeId> {
        self.exchanges
            .iter()
            .find(|e| e.enabled && e.matches(name))
            .map(|e| ExchangeId::new(&e.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_config() {
        let config = load_default_config().unwrap();
        assert!(!config.exchanges.is_empty());
        assert!(config.validate().is_ok());
        assert!(!config.events.is_empty());
    }

    #[test]
    fn test_enabled_exchanges() {
        let config = load_default_config().unwrap();
        let enabled = config.enabled_exchanges();
        assert!(enabled.iter().any(|e| e.id == "simulator"));
        assert!(enabled.iter().all(|e| e.id != "kraken"));
    }

    #[test]
    fn test_get_exchange() {
        let config = load_default_config().unwrap();
        let simulator = config.get_exchange("Simulator");
        assert!(simulator.is_some());
        assert_eq!(simulator.unwrap().name, "Exchange Simulator");
    }

    #[test]
    fn test_exchange_directory() {
        let config = load_default_config().unwrap();
        assert_eq!(config.resolve("simulator"), Some(ExchangeId::simulator()));
        assert_eq!(
            config.resolve("Exchange Simulator"),
            Some(ExchangeId::simulator())
        );
        assert!(!config.is_enabled("kraken"));
        assert!(!config.is_enabled("binance"));
    }

    #[test]
    fn test_validate_rejects_bad_configs() {
        let none_enabled = load_config_from_str(
            r#"{ "exchanges": [{ "id": "kraken", "name": "Kraken", "enabled": false }] }"#,
        )
        .unwrap();
        assert!(matches!(
            none_enabled.validate(),
            Err(ConfigError::NoEnabledExchanges)
        ));

        let duplicate = load_config_from_str(
            r#"{ "exchanges": [
                { "id": "kraken", "name": "Kraken" },
                { "id": "KRAKEN", "name": "Kraken 2" }
            ] }"#,
        )
        .unwrap();
        assert!(matches!(
            duplicate.validate(),
            Err(ConfigError::DuplicateExchange(_))
        ));

        let empty = load_config_from_str(r#"{ "exchanges": [{ "id": " ", "name": "?" }] }"#).unwrap();
        assert!(matches!(empty.validate(), Err(ConfigError::EmptyExchangeId)));
    }

    #[test]
    fn test_validate_rejects_zero_intervals() {
        let zero_poll = load_config_from_str(
            r#"{ "exchanges": [{ "id": "kraken", "name": "Kraken", "poll_interval_ms": 0 }] }"#,
        )
        .unwrap();
        assert!(matches!(
            zero_poll.validate(),
            Err(ConfigError::ZeroPollInterval(id)) if id == "kraken"
        ));

        let zero_sleep = load_config_from_str(
            r#"{
                "exchanges": [{ "id": "kraken", "name": "Kraken" }],
                "engine": { "sleep_delay_ms": 0 }
            }"#,
        )
        .unwrap();
        assert!(matches!(zero_sleep.validate(), Err(ConfigError::ZeroSleepDelay)));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            load_config_from_str("{ not json"),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            load_config("/nonexistent/market-watch.json"),
            Err(ConfigError::IoError(_))
        ));
    }
}
