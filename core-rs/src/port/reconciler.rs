/**
 * reconciler.rs
 * Switch state reconciler
 *
 * Holds the fixed port set discovered at startup and the last known selection.
 * Every poll result or successful select command goes through here and comes
 * out as the list of port affordances that changed:
 * - selected port: disabled + highlighted
 * - any other port: enabled + plain
 *
 * The remote is trusted verbatim: zero or several selected ports are shown as
 * reported.
 */

use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::snapshot::{Port, SwitchSnapshot};

/// Read-only projection of a port for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortView {
    pub index: u32,
    pub label: String,
    pub enabled: bool,
    pub highlighted: bool,
}

impl PortView {
    fn of(port: &Port) -> Self {
        Self {
            index: port.index,
            label: port.label.clone(),
            enabled: !port.selected,
            highlighted: port.selected,
        }
    }
}

/// Outcome of one reconciliation step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Ports whose affordances changed, in port order
    pub changed: Vec<PortView>,
    /// Every port after the change
    pub views: Vec<PortView>,
}

impl Reconciliation {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Authoritative switch state, owned by the poll loop
#[derive(Debug, Clone)]
pub struct SwitchState {
    ports: BTreeMap<u32, Port>,
}

impl SwitchState {
    /// Fix the port set from the startup listing
    pub fn new(initial: &SwitchSnapshot) -> Self {
        Self {
            ports: initial.iter().map(|p| (p.index, p.clone())).collect(),
        }
    }

    pub fn contains(&self, index: u32) -> bool {
        self.ports.contains_key(&index)
    }

    pub fn label(&self, index: u32) -> Option<&str> {
        self.ports.get(&index).map(|p| p.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Currently selected indexes
    pub fn selected(&self) -> Vec<u32> {
        self.ports
            .values()
            .filter(|p| p.selected)
            .map(|p| p.index)
            .collect()
    }

    /// Full projection, in port order
    pub fn views(&self) -> Vec<PortView> {
        self.ports.values().map(PortView::of).collect()
    }

    /// Apply a freshly polled snapshot
    ///
    /// Ports outside the startup set are ignored; known ports the switch did
    /// not report keep their previous state.
    pub fn apply_snapshot(&mut self, snapshot: &SwitchSnapshot) -> Reconciliation {
        let reported = snapshot.selected();
        if reported.len() > 1 {
            warn!("Switch reports {} selected ports: {:?}", reported.len(), reported);
        }

        let mut changed = Vec::new();
        for remote in snapshot.iter() {
            match self.ports.get_mut(&remote.index) {
                Some(port) => {
                    if port.selected != remote.selected {
                        port.selected = remote.selected;
                        changed.push(PortView::of(port));
                    }
                }
                None => {
                    warn!(
                        "Ignoring unknown port {} (\"{}\") reported by the switch",
                        remote.index, remote.label
                    );
                }
            }
        }

        if !changed.is_empty() {
            debug!("Poll changed {} port(s)", changed.len());
        }
        Reconciliation {
            changed,
            views: self.views(),
        }
    }

    /// Optimistic update after a successful select command
    ///
    /// `index` becomes the only selected port without waiting for the next poll.
    pub fn apply_selection(&mut self, index: u32) -> Reconciliation {
        let mut changed = Vec::new();
        for port in self.ports.values_mut() {
            let selected = port.index == index;
            if port.selected != selected {
                port.selected = selected;
                changed.push(PortView::of(port));
            }
        }
        Reconciliation {
            changed,
            views: self.views(),
        }
    }
}
