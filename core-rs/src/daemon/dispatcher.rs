// CommandDispatcher - turns a port button press into a select command
//
// Success: optimistic exclusive selection + the switch's message for a while.
// Failure: state untouched, message kept on the status line until replaced.
// Errors never leave the dispatcher.

use std::time::Duration;
use tracing::{info, warn};

use crate::drivers::{CommandResult, SwitchTransport};
use crate::errors::SwitchError;
use crate::port::SwitchState;
use crate::presenter::Presenter;

#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    success_notice: Duration,
}

impl CommandDispatcher {
    pub fn new(success_notice: Duration) -> Self {
        Self { success_notice }
    }

    /// Select port `index` on the switch
    ///
    /// Pressing the button of the port already selected simply repeats the
    /// command. An index outside the switch's port set is refused locally.
    pub async fn dispatch<T, P>(
        &self,
        transport: &T,
        state: &mut SwitchState,
        presenter: &mut P,
        index: u32,
    ) -> CommandResult
    where
        T: SwitchTransport + ?Sized,
        P: Presenter + ?Sized,
    {
        if !state.contains(index) {
            let message = format!("Unknown port {}", index);
            warn!("{}", message);
            presenter.show_transient_message(&message, None);
            return CommandResult::failure(message);
        }

        match transport.select_port(index).await {
            Ok(reply) => {
                let message = if reply.message.is_empty() {
                    format!("{} selected", state.label(index).unwrap_or_default())
                } else {
                    reply.message
                };
                info!("{}", message);

                let diff = state.apply_selection(index);
                if !diff.is_empty() {
                    presenter.render_ports(&diff.views);
                }
                presenter.show_transient_message(&message, Some(self.success_notice));
                CommandResult::success(message)
            }
            Err(e) => {
                let message = match e {
                    SwitchError::Application(msg) => msg,
                    other => other.to_string(),
                };
                warn!("{}", message);
                presenter.show_transient_message(&message, None);
                CommandResult::failure(message)
            }
        }
    }
}
