//! Presentation layer seam
//!
//! The poll loop renders through a [`Presenter`] and receives user intents as
//! [`UiEvent`]s on a channel. Implementations:
//! - ConsolePresenter: port table on a terminal, line-based input
//! - LogPresenter: headless, everything goes to the log

mod console;
mod headless;

pub use console::{parse_command, spawn_stdin_reader, ConsolePresenter};
pub use headless::LogPresenter;

use std::time::Duration;

use crate::port::PortView;

/// User intent forwarded to the poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// The button of port `index` was pressed
    PortClicked(u32),
    /// The user asked to quit
    Quit,
}

/// Renders switch state and status messages
pub trait Presenter: Send {
    /// Show the full port projection
    fn render_ports(&mut self, ports: &[PortView]);

    /// Show a status message
    ///
    /// `duration` of `None` keeps the message until the next one replaces it.
    fn show_transient_message(&mut self, text: &str, duration: Option<Duration>);
}
