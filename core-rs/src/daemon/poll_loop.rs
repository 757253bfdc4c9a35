// PollLoop - keeps the presentation in step with the switch
//
// States:
//   Initializing -> Polling(Fast) -> Polling(Steady) -> Stopped
//
// - Initializing: read the ports once. Unreachable switch: wait and retry
//   forever. Any other failure aborts startup.
// - Polling(Fast): first poll shortly after startup for a quick refresh.
// - Polling(Steady): the first poll widens the interval for good; failures
//   become status notices and polling goes on.
// - Stopped: quit requested; the loop has returned and no tick is pending.
//
// One task owns the state. Ticks and UI events are multiplexed with
// tokio::select!, so a command and a poll only interleave between handlers and
// the next deadline is set after the previous tick returns.

use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::dispatcher::CommandDispatcher;
use crate::config::SwitchConfig;
use crate::drivers::{CommandResult, SwitchTransport};
use crate::errors::{FailureClass, Result, SwitchError};
use crate::port::SwitchState;
use crate::presenter::{Presenter, UiEvent};

/// Poll cadence while polling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    Fast,
    Steady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Initializing,
    Polling(Cadence),
    Stopped,
}

pub struct PollLoop<T, P> {
    transport: T,
    presenter: P,
    config: SwitchConfig,
    dispatcher: CommandDispatcher,
    state: PollState,
    switch: Option<SwitchState>,
    startup_retries: u32,
    polls: u64,
}

impl<T: SwitchTransport, P: Presenter> PollLoop<T, P> {
    pub fn new(transport: T, presenter: P, config: SwitchConfig) -> Self {
        let dispatcher = CommandDispatcher::new(config.success_notice());
        Self {
            transport,
            presenter,
            config,
            dispatcher,
            state: PollState::Initializing,
            switch: None,
            startup_retries: 0,
            polls: 0,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    /// Switch state, available once initialization succeeded
    pub fn switch(&self) -> Option<&SwitchState> {
        self.switch.as_ref()
    }

    /// Waited retries during initialization
    pub fn startup_retries(&self) -> u32 {
        self.startup_retries
    }

    /// Steady-state polls issued so far
    pub fn polls(&self) -> u64 {
        self.polls
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Interval until the next tick in the current state
    pub fn interval(&self) -> Duration {
        match self.state {
            PollState::Polling(Cadence::Fast) => self.config.fast_interval(),
            _ => self.config.steady_interval(),
        }
    }

    /// Read the switch configuration, waiting for the switch to come up
    ///
    /// # Errors
    /// - `Protocol` / `Application`: the switch answered with an error, fatal
    /// - `Interrupted`: quit requested while waiting for the switch
    pub async fn initialize(&mut self, events: &mut UnboundedReceiver<UiEvent>) -> Result<()> {
        self.state = PollState::Initializing;

        let snapshot = loop {
            match self.transport.list_ports(Some(self.config.startup_timeout())).await {
                Ok(snapshot) => break snapshot,
                Err(e) if e.is_recoverable() => {
                    error!("{}", e);
                    info!("Waiting for the switch to be turned on");
                    tokio::select! {
                        biased;
                        _ = wait_for_quit(events) => {
                            self.stop();
                            return Err(SwitchError::Interrupted);
                        }
                        _ = tokio::time::sleep(self.config.retry_delay()) => {
                            self.startup_retries += 1;
                        }
                    }
                }
                // Reported once by the caller
                Err(e) => return Err(e),
            }
        };

        info!("Connected...");
        info!("Reading switch configuration...");
        for port in snapshot.iter() {
            let status = if port.selected { "Selected" } else { "Ready" };
            info!("Port: \"{}\" {}", port.label, status);
        }
        info!("{} Ports found", snapshot.len());
        if snapshot.is_empty() {
            warn!("The switch reported no ports");
        }

        let switch = SwitchState::new(&snapshot);
        self.presenter.render_ports(&switch.views());
        self.presenter
            .show_transient_message("Initialization...", Some(self.config.notice()));
        self.switch = Some(switch);
        self.state = PollState::Polling(Cadence::Fast);
        Ok(())
    }

    /// Run until the user quits
    ///
    /// Initializes first when needed. Returns once the loop is `Stopped`;
    /// the pending tick is dropped with the loop.
    pub async fn run(&mut self, mut events: UnboundedReceiver<UiEvent>) -> Result<()> {
        if self.state == PollState::Initializing {
            self.initialize(&mut events).await?;
        }
        if self.state == PollState::Stopped {
            return Ok(());
        }

        let mut deadline = Instant::now() + self.interval();
        loop {
            tokio::select! {
                biased;
                event = events.recv() => match event {
                    Some(UiEvent::PortClicked(index)) => {
                        self.dispatch(index).await;
                    }
                    Some(UiEvent::Quit) | None => break,
                },
                _ = tokio::time::sleep_until(deadline) => {
                    self.tick().await;
                    deadline = Instant::now() + self.interval();
                }
            }
        }

        self.stop();
        Ok(())
    }

    /// One poll of the switch
    pub async fn tick(&mut self) {
        if self.state == PollState::Polling(Cadence::Fast) {
            self.state = PollState::Polling(Cadence::Steady);
            debug!("Poll interval widened to {:?}", self.config.steady_interval());
        }
        self.polls += 1;

        match self.transport.list_ports(Some(self.config.poll_timeout())).await {
            Ok(snapshot) => {
                if let Some(switch) = self.switch.as_mut() {
                    let diff = switch.apply_snapshot(&snapshot);
                    if !diff.is_empty() {
                        self.presenter.render_ports(&diff.views);
                    }
                }
            }
            Err(e) => {
                match e.failure_class() {
                    Some(FailureClass::Connection) => debug!("{}", e),
                    _ => error!("{}", e),
                }
                self.presenter
                    .show_transient_message(&e.notice(), Some(self.config.notice()));
            }
        }
    }

    /// Handle a port button press
    pub async fn dispatch(&mut self, index: u32) -> CommandResult {
        match self.switch.as_mut() {
            Some(switch) => {
                self.dispatcher
                    .dispatch(&self.transport, switch, &mut self.presenter, index)
                    .await
            }
            None => {
                warn!("Port {} pressed before the switch was read", index);
                CommandResult::failure("Switch not initialized")
            }
        }
    }

    fn stop(&mut self) {
        self.state = PollState::Stopped;
        info!("bye bye");
    }
}

/// Resolve when the user quits or every event sender is gone
async fn wait_for_quit(events: &mut UnboundedReceiver<UiEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            UiEvent::Quit => return,
            UiEvent::PortClicked(index) => {
                debug!("Ignoring port {} pressed during initialization", index)
            }
        }
    }
}
