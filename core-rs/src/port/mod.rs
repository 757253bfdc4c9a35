/**
 * port module
 * Switch port model and the state reconciler that projects it for display
 */

pub mod reconciler;
pub mod snapshot;

pub use reconciler::{PortView, Reconciliation, SwitchState};
pub use snapshot::{Port, SwitchSnapshot};
