use std::time::Duration;
use tracing::info;

use super::Presenter;
use crate::port::PortView;

/// Headless presenter, writes every update to the log
#[derive(Debug, Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn render_ports(&mut self, ports: &[PortView]) {
        for port in ports {
            let status = if port.highlighted { "Selected" } else { "Ready" };
            info!("Port: \"{}\" {}", port.label, status);
        }
    }

    fn show_transient_message(&mut self, text: &str, _duration: Option<Duration>) {
        info!("{}", text);
    }
}
