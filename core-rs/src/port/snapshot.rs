/**
 * snapshot.rs
 * Port and SwitchSnapshot - the switch's reported state at one poll instant
 *
 * Wire format of GET /api/v1/ports:
 * ```json
 * {
 *   "0": {"label": "ANT1", "status": 1},
 *   "1": {"label": "ANT2", "status": 0}
 * }
 * ```
 *
 * `status == 1` means selected; any other value means not selected.
 * A switch in trouble may answer `{"status": "ERROR", "msg": "..."}` instead.
 */

use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

use crate::errors::{Result, SwitchError};

/// One antenna connection point on the switch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    pub index: u32,
    pub label: String,
    pub selected: bool,
}

impl Port {
    pub fn new(index: u32, label: impl Into<String>, selected: bool) -> Self {
        Self {
            index,
            label: label.into(),
            selected,
        }
    }
}

/// Entry of the ports listing as sent by the switch
#[derive(Debug, Deserialize)]
struct PortEntry {
    label: String,
    #[serde(default)]
    status: JsonValue,
}

/// Full reported state of all ports, keyed and ordered by port index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwitchSnapshot {
    ports: BTreeMap<u32, Port>,
}

impl SwitchSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from ports, later duplicates win
    pub fn from_ports<I: IntoIterator<Item = Port>>(ports: I) -> Self {
        Self {
            ports: ports.into_iter().map(|p| (p.index, p)).collect(),
        }
    }

    /// Parse the body of GET /api/v1/ports
    ///
    /// # Errors
    /// - `Application` when the switch answered `{"status": "ERROR", "msg": ...}`
    /// - `Protocol` when the payload is not a map of index to `{label, status}`
    ///
    /// # Example
    /// ```
    /// use aswitch_core::SwitchSnapshot;
    ///
    /// let body = serde_json::json!({"0": {"label": "ANT1", "status": 1}});
    /// let snapshot = SwitchSnapshot::from_json(body).unwrap();
    /// assert!(snapshot.get(0).unwrap().selected);
    /// ```
    pub fn from_json(body: JsonValue) -> Result<Self> {
        let map = match body {
            JsonValue::Object(map) => map,
            other => {
                return Err(SwitchError::Protocol(format!(
                    "Expected a port map, got: {}",
                    other
                )))
            }
        };

        if let Some(JsonValue::String(status)) = map.get("status") {
            if status == "ERROR" {
                let msg = map
                    .get("msg")
                    .and_then(|m| m.as_str())
                    .unwrap_or("unknown switch error");
                return Err(SwitchError::Application(msg.to_string()));
            }
        }

        let mut ports = BTreeMap::new();
        for (key, value) in map {
            let index: u32 = key.trim().parse().map_err(|_| {
                SwitchError::Protocol(format!("Invalid port index '{}'", key))
            })?;
            let entry: PortEntry = serde_json::from_value(value).map_err(|e| {
                SwitchError::Protocol(format!("Invalid entry for port {}: {}", index, e))
            })?;
            let selected = entry.status.as_i64() == Some(1);
            ports.insert(index, Port::new(index, entry.label, selected));
        }

        Ok(Self { ports })
    }

    pub fn get(&self, index: u32) -> Option<&Port> {
        self.ports.get(&index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Port> {
        self.ports.values()
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Indexes reported as selected, in port order
    pub fn selected(&self) -> Vec<u32> {
        self.ports
            .values()
            .filter(|p| p.selected)
            .map(|p| p.index)
            .collect()
    }
}
