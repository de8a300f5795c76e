#![deny(missing_docs)]
//! Native stand-ins for the browser runtime.
//!
//! [`ManualClock`] replaces `setTimeout` with virtual time, [`LoopbackBridge`]
//! replaces `window.ipc` with an in-memory listener table, and
//! [`SimulatedHost`] answers calls the way the desktop host does.

mod clock;
mod host;
mod loopback;

pub use clock::ManualClock;
pub use host::{HostScript, SimulatedHost};
pub use loopback::LoopbackBridge;
