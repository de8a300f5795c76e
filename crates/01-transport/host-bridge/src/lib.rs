#![deny(missing_docs)]
//! Access to the host bridge.
//!
//! The host hands the page two primitives: `emit(channel, args)` and
//! `on(channel, callback)`. [`HostBridge`] models them; [`ChannelAdapter`]
//! layers typed calls on top and degrades to a diagnostic when no bridge was
//! injected (for example when the shell is opened in a plain browser tab).

mod adapter;
mod bridge;
mod error;

pub use adapter::{ChannelAdapter, Dispatch};
pub use bridge::{Callback, HostBridge};
pub use error::{BridgeError, BridgeResult};
