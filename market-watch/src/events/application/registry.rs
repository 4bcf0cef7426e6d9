//! Event Registry - the list of watch conditions and their execution status
//!
//! Registration validates everything up front so the engine never sees a
//! malformed event. Ids come from a counter that only moves forward, so a
//! removal can never cause two events to share an id.

use market_core::{AssetType, CurrencyPair};
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

use super::ports::{ExchangeDirectory, Notifier};
use crate::events::domain::{
    Action, Condition, ConditionRequest, Event, EventError, EventId, EventRequest, Item,
    NOTIFY_ALL, Operator,
};

struct RegistryInner {
    events: RwLock<Vec<Arc<Event>>>,
    next_id: AtomicU64,
    exchanges: Arc<dyn ExchangeDirectory>,
    notifier: Arc<dyn Notifier>,
}

/// Shared handle to the event list
///
/// Cloning is cheap; all clones see the same events.
#[derive(Clone)]
pub struct EventRegistry {
    inner: Arc<RegistryInner>,
}

impl EventRegistry {
    pub fn new(exchanges: Arc<dyn ExchangeDirectory>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                events: RwLock::new(Vec::new()),
                next_id: AtomicU64::new(0),
                exchanges,
                notifier,
            }),
        }
    }

    /// Validate and append a new pending event
    ///
    /// Checks run in a fixed order: exchange, item, operator, threshold,
    /// action. The first failure is returned and nothing is stored.
    pub fn register(
        &self,
        exchange: &str,
        item: &str,
        condition: ConditionRequest,
        pair: CurrencyPair,
        asset: AssetType,
        action: &str,
    ) -> Result<EventId, EventError> {
        let exchange_id = self
            .inner
            .exchanges
            .resolve(exchange)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| EventError::ExchangeDisabled(exchange.to_string()))?;

        let item: Item = item.parse()?;
        let operator: Operator = condition.operator.parse()?;

        match item {
            Item::Price if condition.price.is_zero() => {
                return Err(EventError::InvalidCondition(format!(
                    "{item} requires a non-zero price"
                )));
            }
            Item::OrderBook if condition.orderbook_amount.is_zero() => {
                return Err(EventError::InvalidAction(format!(
                    "{item} requires a non-zero orderbook amount"
                )));
            }
            _ => {}
        }

        let action: Action = action.parse()?;
        if let Some(target) = action.notify_target()
            && target != NOTIFY_ALL
            && !self.inner.notifier.is_valid_target(target)
        {
            return Err(EventError::InvalidAction(action.to_string()));
        }

        let condition = Condition {
            operator,
            price: condition.price,
            orderbook_amount: condition.orderbook_amount,
            check_bids: condition.check_bids,
            check_bids_and_asks: condition.check_bids_and_asks,
        };

        let id = EventId::new(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let event = Event::new(id, exchange_id, item, condition, pair, asset, action);
        info!("Registered event {}: {}", id, event);

        self.inner.events.write().push(Arc::new(event));
        Ok(id)
    }

    /// Register from an untyped request
    pub fn register_request(&self, request: EventRequest) -> Result<EventId, EventError> {
        self.register(
            &request.exchange,
            &request.item,
            request.condition,
            request.pair,
            request.asset,
            &request.action,
        )
    }

    /// Remove the first event with the given id
    pub fn remove(&self, id: EventId) -> bool {
        let mut events = self.inner.events.write();
        match events.iter().position(|event| event.id == id) {
            Some(index) => {
                events.remove(index);
                debug!("Removed event {}", id);
                true
            }
            None => false,
        }
    }

    /// (total, executed)
    pub fn count(&self) -> (usize, usize) {
        let events = self.inner.events.read();
        let executed = events.iter().filter(|event| event.is_executed()).count();
        (events.len(), executed)
    }

    pub fn get(&self, id: EventId) -> Option<Arc<Event>> {
        self.inner
            .events
            .read()
            .iter()
            .find(|event| event.id == id)
            .cloned()
    }

    /// Snapshot of every registered event, in registration order
    pub fn events(&self) -> Vec<Arc<Event>> {
        self.inner.events.read().clone()
    }

    /// Snapshot of events still waiting for their condition
    pub fn pending(&self) -> Vec<Arc<Event>> {
        self.inner
            .events
            .read()
            .iter()
            .filter(|event| !event.is_executed())
            .cloned()
            .collect()
    }

    pub(crate) fn notifier(&self) -> Arc<dyn Notifier> {
        self.inner.notifier.clone()
    }
}
