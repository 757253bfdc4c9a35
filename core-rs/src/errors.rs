//! Error types for the antenna switch remote control
//!
//! Failures talking to the switch fall in three tiers:
//! - `Connection`: the switch could not be reached at all
//! - `Protocol`: the switch answered, but with an HTTP error or a payload we cannot read
//! - `Application`: the switch answered cleanly and reported an error of its own

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwitchError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("HTTP error: {0}")]
    Protocol(String),

    #[error("Switch error: {0}")]
    Application(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Interrupted before the switch answered")]
    Interrupted,
}

/// Failure tier of a transport error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    Connection,
    Protocol,
    Application,
}

impl SwitchError {
    /// Tier of this error, or `None` for errors that never come from the transport
    pub fn failure_class(&self) -> Option<FailureClass> {
        match self {
            SwitchError::Connection(_) => Some(FailureClass::Connection),
            SwitchError::Protocol(_) => Some(FailureClass::Protocol),
            SwitchError::Application(_) => Some(FailureClass::Application),
            _ => None,
        }
    }

    /// Only an unreachable switch is worth waiting for
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SwitchError::Connection(_))
    }

    /// Message meant for the status line
    ///
    /// Application errors carry the switch's own text; the other tiers get a
    /// short fixed notice.
    pub fn notice(&self) -> String {
        match self {
            SwitchError::Connection(_) => "Connection Error".to_string(),
            SwitchError::Protocol(_) => "HTTP Error".to_string(),
            SwitchError::Application(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for SwitchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            SwitchError::Connection(err.to_string())
        } else if err.is_status() {
            SwitchError::Protocol(err.to_string())
        } else if err.is_decode() {
            SwitchError::Protocol(format!("Unreadable payload: {}", err))
        } else if err.is_request() {
            // DNS failures and resets surface as request errors
            SwitchError::Connection(err.to_string())
        } else {
            SwitchError::Protocol(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, SwitchError>;
