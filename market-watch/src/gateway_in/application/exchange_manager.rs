use market_core::ExchangeId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::gateway_in::config::GatewayConfigFile;
use crate::gateway_in::domain::MarketDataSource;
use crate::gateway_in::infrastructure::SimulatedSource;
use crate::market_data::MarketDataCache;

use super::config::PollerConfig;
use super::refresh::{RefreshSummary, refresh_source};

/// Drives many exchange sources into one shared cache
///
/// Each registered source gets its own polling task. Tasks only share the
/// cache, so a slow or failing exchange never holds up the others.
pub struct ExchangeManager {
    cache: MarketDataCache,
    sources: HashMap<ExchangeId, SourceEntry>,
    shutdown_tx: watch::Sender<bool>,
}

struct SourceEntry {
    source: Arc<dyn MarketDataSource>,
    config: PollerConfig,
    task: Option<JoinHandle<()>>,
}

impl ExchangeManager {
    /// Create a manager writing into the given cache
    pub fn new(cache: MarketDataCache) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        ExchangeManager {
            cache,
            sources: HashMap::new(),
            shutdown_tx,
        }
    }

    /// Register a simulated source for every enabled exchange in the config
    pub fn initialize(&mut self, config: &GatewayConfigFile) {
        for exchange_config in config.enabled_exchanges() {
            let source =
                SimulatedSource::new(exchange_config.id.as_str(), exchange_config.pairs.clone());
            self.add_source(Arc::new(source), PollerConfig::from(exchange_config));
        }
    }

    /// Register a source; replaces any source already registered for its exchange
    pub fn add_source(&mut self, source: Arc<dyn MarketDataSource>, config: PollerConfig) {
        let exchange_id = source.exchange().clone();
        if exchange_id != config.exchange_id {
            warn!(
                "Poller config for {} attached to source {}",
                config.exchange_id, exchange_id
            );
        }

        let previous = self.sources.insert(
            exchange_id.clone(),
            SourceEntry {
                source,
                config,
                task: None,
            },
        );

        if let Some(task) = previous.and_then(|entry| entry.task) {
            task.abort();
        }
        debug!("Registered source for {}", exchange_id);
    }

    /// Spawn a polling task for every source not already running
    pub fn start_all(&mut self) {
        for (exchange_id, entry) in self.sources.iter_mut() {
            if entry.task.as_ref().is_some_and(|task| !task.is_finished()) {
                continue;
            }

            let source = Arc::clone(&entry.source);
            let config = entry.config.clone();
            let cache = self.cache.clone();
            let mut shutdown_rx = self.shutdown_tx.subscribe();

            info!(
                "Starting poller for {} ({} instruments, {}ms interval)",
                exchange_id,
                source.pairs().len(),
                config.poll_interval.as_millis()
            );

            entry.task = Some(tokio::spawn(async move {
                let mut passes: u64 = 0;

                loop {
                    if *shutdown_rx.borrow() {
                        break;
                    }

                    let summary = refresh_source(source.as_ref(), &cache, &config).await;
                    passes += 1;
                    if summary.failed > 0 {
                        debug!(
                            "{}: pass {} updated {}, failed {}",
                            config.exchange_id, passes, summary.updated, summary.failed
                        );
                    }

                    tokio::select! {
                        biased;

                        changed = shutdown_rx.changed() => {
                            if changed.is_err() || *shutdown_rx.borrow() {
                                break;
                            }
                        }

                        _ = tokio::time::sleep(config.poll_interval) => {}
                    }
                }

                info!("Poller for {} stopped after {} passes", config.exchange_id, passes);
            }));
        }
    }

    /// Run one refresh pass over every source, without spawning
    pub async fn refresh_all(&self) -> RefreshSummary {
        let mut total = RefreshSummary::default();
        for entry in self.sources.values() {
            let summary = refresh_source(entry.source.as_ref(), &self.cache, &entry.config).await;
            total.updated += summary.updated;
            total.failed += summary.failed;
        }
        total
    }

    /// Stop every polling task and wait for them to finish
    pub async fn shutdown(&mut self) {
        self.shutdown_tx.send_replace(true);

        for (exchange_id, entry) in self.sources.iter_mut() {
            if let Some(task) = entry.task.take()
                && let Err(e) = task.await
            {
                warn!("Poller for {} failed: {}", exchange_id, e);
            }
        }

        // Allow a later start_all
        self.shutdown_tx.send_replace(false);
    }

    /// Get the shared cache
    pub fn cache(&self) -> &MarketDataCache {
        &self.cache
    }

    /// Get list of registered exchange ids
    pub fn exchanges(&self) -> Vec<ExchangeId> {
        let mut exchanges: Vec<_> = self.sources.keys().cloned().collect();
        exchanges.sort();
        exchanges
    }

    /// Get list of exchanges with a live polling task
    pub fn running_exchanges(&self) -> Vec<ExchangeId> {
        let mut running: Vec<_> = self
            .sources
            .iter()
            .filter(|(_, e)| e.task.as_ref().is_some_and(|task| !task.is_finished()))
            .map(|(id, _)| id.clone())
            .collect();
        running.sort();
        running
    }
}

impl Drop for ExchangeManager {
    fn drop(&mut self) {
        for entry in self.sources.values() {
            if let Some(task) = &entry.task {
                task.abort();
            }
        }
    }
}
