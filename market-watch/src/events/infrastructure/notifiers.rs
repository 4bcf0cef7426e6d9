//! Notifier adapters
//!
//! - `LogNotifier`: writes notifications to the tracing log
//! - `ChannelNotifier`: forwards notifications over a tokio channel, for
//!   delivery workers or tests that need to observe what was pushed

use chrono::Utc;
use market_core::Timestamp;
use std::collections::HashSet;
use tokio::sync::mpsc;
use tracing::info;

use crate::events::application::{Notifier, NotifyError};
use crate::events::domain::NOTIFY_ALL;

fn normalize_targets<I, T>(targets: I) -> HashSet<String>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    targets
        .into_iter()
        .map(|t| t.as_ref().trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn is_known(targets: &HashSet<String>, target: &str) -> bool {
    let target = target.trim().to_uppercase();
    target == NOTIFY_ALL || targets.contains(&target)
}

/// Logs every notification at info level
#[derive(Debug, Clone, Default)]
pub struct LogNotifier {
    targets: HashSet<String>,
}

impl LogNotifier {
    pub fn new<I, T>(targets: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        Self {
            targets: normalize_targets(targets),
        }
    }
}

impl Notifier for LogNotifier {
    fn is_valid_target(&self, target: &str) -> bool {
        is_known(&self.targets, target)
    }

    fn push(&self, message: &str, target: &str) -> Result<(), NotifyError> {
        if !self.is_valid_target(target) {
            return Err(NotifyError::UnknownTarget(target.to_string()));
        }
        info!(target = %target, "NOTIFY: {}", message);
        Ok(())
    }
}

/// A pushed notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub target: String,
    pub message: String,
    pub at: Timestamp,
}

/// Sends notifications to an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    targets: HashSet<String>,
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    /// Create the notifier and the receiving end of its channel
    pub fn new<I, T>(targets: I) -> (Self, mpsc::UnboundedReceiver<Notification>)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let notifier = Self {
            targets: normalize_targets(targets),
            tx,
        };
        (notifier, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn is_valid_target(&self, target: &str) -> bool {
        is_known(&self.targets, target)
    }

    fn push(&self, message: &str, target: &str) -> Result<(), NotifyError> {
        if !self.is_valid_target(target) {
            return Err(NotifyError::UnknownTarget(target.to_string()));
        }

        self.tx
            .send(Notification {
                target: target.to_string(),
                message: message.to_string(),
                at: Utc::now(),
            })
            .map_err(|_| NotifyError::ChannelClosed)
    }
}
