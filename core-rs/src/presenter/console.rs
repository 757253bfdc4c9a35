//! Terminal presenter
//!
//! Draws the port table on stdout and reads commands from stdin:
//! - a port number selects that port
//! - `q` / `quit` leaves the program

use chrono::Local;
use colored::Colorize;
use std::io::{BufRead, Write};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use super::{Presenter, UiEvent};
use crate::port::PortView;

struct Notice {
    text: String,
    expires: Option<Instant>,
}

impl Notice {
    fn is_active(&self) -> bool {
        self.expires.map(|t| Instant::now() < t).unwrap_or(true)
    }
}

/// Port table on a terminal
pub struct ConsolePresenter<W: Write + Send = std::io::Stdout> {
    title: String,
    out: W,
    notice: Option<Notice>,
}

impl ConsolePresenter<std::io::Stdout> {
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_writer(title, std::io::stdout())
    }
}

impl<W: Write + Send> ConsolePresenter<W> {
    pub fn with_writer(title: impl Into<String>, out: W) -> Self {
        Self {
            title: title.into(),
            out,
            notice: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            warn!("Cannot write to terminal: {}", e);
        }
    }
}

fn format_port(port: &PortView) -> String {
    let label = format!(" {} ", port.label);
    if port.highlighted {
        format!("  [{}] {}\n", port.index, label.white().on_blue().bold())
    } else {
        format!("  [{}] {}\n", port.index, label)
    }
}

impl<W: Write + Send> Presenter for ConsolePresenter<W> {
    fn render_ports(&mut self, ports: &[PortView]) {
        let mut screen = format!("\n{}\n", self.title.bold());
        for port in ports {
            screen.push_str(&format_port(port));
        }
        if let Some(notice) = self.notice.as_ref().filter(|n| n.is_active()) {
            screen.push_str(&format!("  {}\n", notice.text.yellow()));
        }
        screen.push_str("Port number to select, q to quit > ");
        self.emit(&screen);
    }

    fn show_transient_message(&mut self, text: &str, duration: Option<Duration>) {
        let stamp = Local::now().format("%H:%M:%S");
        self.emit(&format!("\n[{}] {}\n", stamp, text.yellow()));
        self.notice = Some(Notice {
            text: text.to_string(),
            expires: duration.map(|d| Instant::now() + d),
        });
    }
}

/// Turn one line of terminal input into an event
///
/// # Example
/// ```
/// use aswitch_core::presenter::{parse_command, UiEvent};
///
/// assert_eq!(parse_command(" 2 "), Some(UiEvent::PortClicked(2)));
/// assert_eq!(parse_command("q"), Some(UiEvent::Quit));
/// assert_eq!(parse_command("hello"), None);
/// ```
pub fn parse_command(line: &str) -> Option<UiEvent> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => Some(UiEvent::Quit),
        other => other.parse().ok().map(UiEvent::PortClicked),
    }
}

/// Forward stdin commands to the poll loop until EOF or quit
///
/// Reads on a dedicated thread with blocking IO so a pending read never holds
/// up runtime shutdown.
pub fn spawn_stdin_reader(events: UnboundedSender<UiEvent>) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!("Cannot read terminal input: {}", e);
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Some(event) => {
                        if events.send(event).is_err() || event == UiEvent::Quit {
                            return;
                        }
                    }
                    None => debug!("Ignoring input '{}'", line.trim()),
                }
            }
            // EOF or read error
            let _ = events.send(UiEvent::Quit);
        })
}
