//! Transport trait for the antenna switch
//!
//! Defines the interface the poll loop and command dispatcher use to talk to
//! the switch. Implementations include:
//! - HttpTransport (the switch's JSON API over HTTP)
//! - scripted fakes in tests

use async_trait::async_trait;
use std::time::Duration;

use crate::errors::Result;
use crate::port::SwitchSnapshot;

/// Outcome of a select command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub ok: bool,
    pub message: String,
}

impl CommandResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Switch transport trait
///
/// Both calls fail with one of the three transport tiers of
/// [`SwitchError`](crate::errors::SwitchError): `Connection`, `Protocol`,
/// `Application`. Implementations never retry; retry policy belongs to the
/// poll loop.
#[async_trait]
pub trait SwitchTransport: Send + Sync {
    /// Read the state of every port
    ///
    /// # Arguments
    ///
    /// * `timeout` - Upper bound for the whole request, `None` for the transport default
    async fn list_ports(&self, timeout: Option<Duration>) -> Result<SwitchSnapshot>;

    /// Ask the switch to route the radio to port `index`
    ///
    /// Returns `Ok` only when the switch answered `status: "OK"`; the result
    /// carries the switch's message.
    async fn select_port(&self, index: u32) -> Result<CommandResult>;
}
