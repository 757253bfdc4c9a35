//! HttpTransport for the antenna switch JSON API
//!
//! Endpoints:
//! - `GET {base}/api/v1/ports` - state of every port
//! - `GET {base}/api/v1/select/{index}` - route the radio to one port

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::{debug, error};

use super::traits::{CommandResult, SwitchTransport};
use crate::errors::{Result, SwitchError};
use crate::port::SwitchSnapshot;

/// Default bound for a select command
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP transport talking to one switch
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
    command_timeout: Option<Duration>,
}

impl HttpTransport {
    /// Create new HttpTransport
    ///
    /// # Errors
    ///
    /// `Config` when `base_url` is not an absolute http(s) URL.
    ///
    /// # Example
    ///
    /// ```
    /// use aswitch_core::drivers::HttpTransport;
    ///
    /// let transport = HttpTransport::new("http://aswitch.home:8088").unwrap();
    /// assert_eq!(transport.ports_url(), "http://aswitch.home:8088/api/v1/ports");
    /// ```
    pub fn new(base_url: &str) -> Result<Self> {
        let parsed = reqwest::Url::parse(base_url)
            .map_err(|e| SwitchError::Config(format!("Invalid switch URL '{}': {}", base_url, e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(SwitchError::Config(format!(
                "Unsupported scheme '{}' in switch URL",
                parsed.scheme()
            )));
        }

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| SwitchError::Config(format!("Cannot build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            command_timeout: Some(DEFAULT_COMMAND_TIMEOUT),
        })
    }

    /// Bound select commands by `timeout` (`None` waits as long as the OS does)
    pub fn with_command_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn ports_url(&self) -> String {
        format!("{}/api/v1/ports", self.base_url)
    }

    pub fn select_url(&self, index: u32) -> String {
        format!("{}/api/v1/select/{}", self.base_url, index)
    }

    async fn get_json(&self, url: &str, timeout: Option<Duration>) -> Result<JsonValue> {
        debug!("GET {}", url);
        let mut request = self.client.get(url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SwitchError::Protocol(format!("{} for url ({})", status, url)));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| SwitchError::Protocol(format!("Invalid JSON from {}: {}", url, e)))
    }
}

/// Interpret the body of GET /api/v1/select/{index}
pub fn parse_select_reply(body: &JsonValue) -> Result<CommandResult> {
    let status = body
        .get("status")
        .and_then(|s| s.as_str())
        .ok_or_else(|| SwitchError::Protocol(format!("Select reply without status: {}", body)))?;
    let msg = body.get("msg").and_then(|m| m.as_str()).unwrap_or_default();

    if status == "OK" {
        Ok(CommandResult::success(msg))
    } else if msg.is_empty() {
        Err(SwitchError::Application(format!("Switch answered {}", status)))
    } else {
        Err(SwitchError::Application(msg.to_string()))
    }
}

#[async_trait]
impl SwitchTransport for HttpTransport {
    async fn list_ports(&self, timeout: Option<Duration>) -> Result<SwitchSnapshot> {
        let body = self.get_json(&self.ports_url(), timeout).await?;
        SwitchSnapshot::from_json(body)
    }

    async fn select_port(&self, index: u32) -> Result<CommandResult> {
        let body = self.get_json(&self.select_url(index), self.command_timeout).await?;
        let reply = parse_select_reply(&body);
        if let Err(SwitchError::Application(msg)) = &reply {
            error!("{}", msg);
        }
        reply
    }
}
