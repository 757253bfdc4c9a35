// Daemon Module - the long-running side of the remote control
//
// PollLoop owns the switch state and drives both the periodic poll and the
// commands coming from the presentation layer; CommandDispatcher handles one
// port selection.

pub mod dispatcher;
pub mod poll_loop;

pub use dispatcher::CommandDispatcher;
pub use poll_loop::{Cadence, PollLoop, PollState};
