use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::EventError;

/// Notification target that fans out to every configured channel
pub const NOTIFY_ALL: &str = "ALL";

const CONSOLE_PRINT: &str = "CONSOLE_PRINT";
const ACTION_TEST: &str = "ACTION_TEST";
const NOTIFY: &str = "NOTIFY";
const SMS: &str = "SMS";

/// What to do once an event's condition is met
///
/// Parsed from case-insensitive tokens: `CONSOLE_PRINT`, `ACTION_TEST`, or
/// the compound `NOTIFY,<target>` (`SMS,<target>` is accepted too).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Action {
    ConsolePrint,
    Test,
    Notify { target: String },
}

impl Action {
    pub fn notify(target: impl Into<String>) -> Self {
        Action::Notify {
            target: target.into().trim().to_uppercase(),
        }
    }

    /// Target of a notify action
    pub fn notify_target(&self) -> Option<&str> {
        match self {
            Action::Notify { target } => Some(target),
            _ => None,
        }
    }
}

impl FromStr for Action {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EventError::InvalidAction(s.to_string());
        let token = s.trim().to_uppercase();

        if let Some((kind, target)) = token.split_once(',') {
            let target = target.trim();
            if !matches!(kind.trim(), NOTIFY | SMS) || target.is_empty() {
                return Err(invalid());
            }
            return Ok(Action::notify(target));
        }

        match token.as_str() {
            CONSOLE_PRINT => Ok(Action::ConsolePrint),
            ACTION_TEST => Ok(Action::Test),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Action {
    type Error = EventError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        action.to_string()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::ConsolePrint => f.write_str(CONSOLE_PRINT),
            Action::Test => f.write_str(ACTION_TEST),
            Action::Notify { target } => write!(f, "{NOTIFY},{target}"),
        }
    }
}
