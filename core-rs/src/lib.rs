//! # aswitch core - remote control for the wireless antenna switch
//!
//! The switch exposes a small JSON API over HTTP. This crate polls it, keeps
//! the port buttons in step with what the switch reports, and sends a select
//! command when a port button is pressed.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────┐  UiEvent   ┌──────────────────────────┐
//!   │  Presenter   │ ─────────▶ │ PollLoop                 │
//!   │ (console,    │ ◀───────── │  ├─ SwitchState          │
//!   │  headless)   │  PortView  │  └─ CommandDispatcher    │
//!   └──────────────┘            └────────────┬─────────────┘
//!                                            │ SwitchTransport
//!                                            ▼
//!                               GET /api/v1/ports
//!                               GET /api/v1/select/{index}
//! ```

pub mod config;
pub mod daemon;
pub mod drivers;
pub mod errors;
pub mod port;
pub mod presenter;

pub use config::{SwitchConfig, DEFAULT_BASE_URL};
pub use daemon::{Cadence, CommandDispatcher, PollLoop, PollState};
pub use drivers::{CommandResult, HttpTransport, SwitchTransport};
pub use errors::{FailureClass, SwitchError};
pub use port::{Port, PortView, Reconciliation, SwitchSnapshot, SwitchState};
pub use presenter::{ConsolePresenter, LogPresenter, Presenter, UiEvent};

/// Version of the remote control
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
