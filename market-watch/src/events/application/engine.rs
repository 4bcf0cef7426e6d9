//! Event Engine - scans pending events and fires their actions
//!
//! A single control loop runs `tick()` on a fixed delay. Each tick is a full
//! registry scan with no suspension points; the sleep between ticks is the
//! only place the loop yields.
//!
//! Per event the state machine is Pending -> Triggered. The engine claims
//! the transition on the event itself before dispatching, so an action runs
//! at most once even if several scans overlap.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::ports::MarketDataReader;
use super::registry::EventRegistry;
use crate::events::domain::{Action, Event, Item, NOTIFY_ALL};

/// Configuration for the event engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Delay between two registry scans
    pub sleep_delay: Duration,
    /// Log lookup failures and non-matching evaluations
    pub verbose: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sleep_delay: Duration::from_millis(500),
            verbose: false,
        }
    }
}

/// Evaluates registered events against cached market data
pub struct EventManager<M> {
    registry: EventRegistry,
    market: Arc<M>,
    config: EngineConfig,
}

impl<M: MarketDataReader + 'static> EventManager<M> {
    pub fn new(registry: EventRegistry, market: Arc<M>) -> Self {
        Self {
            registry,
            market,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_sleep_delay(mut self, delay: Duration) -> Self {
        self.config.sleep_delay = delay;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &EventRegistry {
        &self.registry
    }

    /// Run one full scan of pending events
    ///
    /// Returns how many events were triggered by this scan.
    pub fn tick(&self) -> usize {
        let mut triggered = 0;

        for event in self.registry.pending() {
            let Some(detail) = self.evaluate(&event) else {
                continue;
            };

            if !event.mark_executed() {
                continue;
            }

            self.dispatch(&event, &detail);
            triggered += 1;
        }

        triggered
    }

    /// Check an event's condition, returning a short description of the match
    fn evaluate(&self, event: &Event) -> Option<String> {
        match event.item {
            Item::Price => {
                let ticker = match self.market.ticker(&event.exchange, &event.pair, event.asset) {
                    Ok(ticker) => ticker,
                    Err(e) => {
                        if self.config.verbose {
                            debug!("Event {}: ticker not available: {}", event.id, e);
                        }
                        return None;
                    }
                };

                // Zero last price means the slot exists but holds no data yet
                if !ticker.has_data() {
                    return None;
                }

                event
                    .condition
                    .matches_price(ticker.last)
                    .then(|| format!("last price {}", ticker.last))
            }
            Item::OrderBook => {
                let book =
                    match self.market.order_book(&event.exchange, &event.pair, event.asset) {
                        Ok(book) => book,
                        Err(e) => {
                            if self.config.verbose {
                                debug!("Event {}: order book not available: {}", event.id, e);
                            }
                            return None;
                        }
                    };

                event
                    .condition
                    .matching_level(&book)
                    .map(|(side, level, notional)| {
                        format!(
                            "{} level {} x {} = {}",
                            side, level.price, level.amount, notional
                        )
                    })
            }
        }
    }

    fn dispatch(&self, event: &Event, detail: &str) {
        let description = event.to_string();
        info!("Event {} triggered ({}): {}", event.id, detail, description);

        match &event.action {
            Action::Notify { target } if target == NOTIFY_ALL => {
                if let Err(e) = self.registry.notifier().push(&description, target) {
                    warn!("Event {}: notification failed: {}", event.id, e);
                }
            }
            Action::Notify { target } => {
                info!("Event {}: notify {} -> {}", event.id, target, description);
            }
            Action::ConsolePrint => {
                info!("{}", description);
            }
            Action::Test => {
                debug!("Event {}: test action", event.id);
            }
        }
    }

    /// Start the control loop on the tokio runtime
    ///
    /// Scans are skipped while there is nothing pending.
    pub fn spawn(self) -> EngineHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let delay = self.config.sleep_delay;

        info!(
            "Starting event engine with {}ms sleep delay",
            delay.as_millis()
        );

        let handle = tokio::spawn(async move {
            let mut total_triggered = 0usize;

            loop {
                let (total, executed) = self.registry.count();
                if total > executed {
                    total_triggered += self.tick();
                }

                tokio::select! {
                    biased;

                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }

                    _ = tokio::time::sleep(delay) => {}
                }
            }

            info!(
                "Event engine stopped after triggering {} events",
                total_triggered
            );
        });

        EngineHandle {
            shutdown_tx,
            handle: Some(handle),
        }
    }
}

/// Handle to a running engine loop
pub struct EngineHandle {
    shutdown_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl EngineHandle {
    /// Signal the loop to stop after the current tick
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Wait for the loop to finish
    pub async fn join(mut self) {
        if let Some(handle) = self.handle.take()
            && let Err(e) = handle.await
        {
            warn!("Event engine task failed: {}", e);
        }
    }
}
