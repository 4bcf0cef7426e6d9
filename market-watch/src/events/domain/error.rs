use thiserror::Error;

/// Reasons an event is refused at registration time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Desired exchange is disabled: {0}")]
    ExchangeDisabled(String),

    #[error("Invalid item: {0}")]
    InvalidItem(String),

    #[error("Invalid conditional option: {0}")]
    InvalidCondition(String),

    #[error("Invalid action: {0}")]
    InvalidAction(String),
}
