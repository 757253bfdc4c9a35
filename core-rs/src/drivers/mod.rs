//! Drivers module for talking to the switch
//!
//! Provides the abstract transport interface (SwitchTransport trait) and its
//! HTTP implementation.

mod http;
mod traits;

pub use http::{parse_select_reply, HttpTransport, DEFAULT_COMMAND_TIMEOUT};
pub use traits::{CommandResult, SwitchTransport};
