mod action;
mod condition;
mod error;
mod event;

pub use action::{Action, NOTIFY_ALL};
pub use condition::{BookSide, Condition, Operator};
pub use error::EventError;
pub use event::{ConditionRequest, Event, EventId, EventRequest, Item};
