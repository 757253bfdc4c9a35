/**
 * config.rs
 * Remote control settings, optionally read from a YAML file
 *
 * Format (every key optional):
 * ```yaml
 * baseUrl: http://aswitch.home:8088
 * title: W6BSD Antenna Switch
 * startupTimeoutMs: 2000
 * pollTimeoutMs: 2000
 * commandTimeoutMs: 5000
 * retryDelayMs: 10000
 * fastIntervalMs: 100
 * steadyIntervalMs: 5000
 * noticeMs: 2000
 * successNoticeMs: 5000
 * ```
 */

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::errors::{Result, SwitchError};

/// Switch address used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://aswitch.home:8088";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SwitchConfig {
    pub base_url: String,
    pub title: String,
    /// Bound for the startup connectivity check
    pub startup_timeout_ms: u64,
    /// Bound for each steady-state poll
    pub poll_timeout_ms: u64,
    /// Bound for a select command
    pub command_timeout_ms: u64,
    /// Wait between startup attempts while the switch is unreachable
    pub retry_delay_ms: u64,
    /// Delay before the first poll
    pub fast_interval_ms: u64,
    /// Poll cadence after the first poll
    pub steady_interval_ms: u64,
    /// Display time of error notices
    pub notice_ms: u64,
    /// Display time of a successful selection message
    pub success_notice_ms: u64,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            title: "Antenna Switch".to_string(),
            startup_timeout_ms: 2000,
            poll_timeout_ms: 2000,
            command_timeout_ms: 5000,
            retry_delay_ms: 10_000,
            fast_interval_ms: 100,
            steady_interval_ms: 5000,
            notice_ms: 2000,
            success_notice_ms: 5000,
        }
    }
}

impl SwitchConfig {
    /// Load settings from a YAML file, missing keys take their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SwitchError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: SwitchConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Replace the base URL, used for the `--url` flag
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Reject settings the poll loop cannot run with
    pub fn validate(&self) -> Result<()> {
        reqwest::Url::parse(&self.base_url).map_err(|e| {
            SwitchError::Config(format!("Invalid switch URL '{}': {}", self.base_url, e))
        })?;

        let intervals = [
            ("retryDelayMs", self.retry_delay_ms),
            ("fastIntervalMs", self.fast_interval_ms),
            ("steadyIntervalMs", self.steady_interval_ms),
            ("startupTimeoutMs", self.startup_timeout_ms),
            ("pollTimeoutMs", self.poll_timeout_ms),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(SwitchError::Config(format!("{} must be greater than 0", name)));
            }
        }
        Ok(())
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_millis(self.startup_timeout_ms)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }

    /// `None` when set to 0: wait for the switch as long as the OS does
    pub fn command_timeout(&self) -> Option<Duration> {
        match self.command_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn fast_interval(&self) -> Duration {
        Duration::from_millis(self.fast_interval_ms)
    }

    pub fn steady_interval(&self) -> Duration {
        Duration::from_millis(self.steady_interval_ms)
    }

    pub fn notice(&self) -> Duration {
        Duration::from_millis(self.notice_ms)
    }

    pub fn success_notice(&self) -> Duration {
        Duration::from_millis(self.success_notice_ms)
    }
}
