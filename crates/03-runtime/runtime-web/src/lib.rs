#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(missing_docs, unused_macros, dead_code)
)]
#![cfg(target_arch = "wasm32")]
#![deny(missing_docs)]
//! Browser runtime for the exam shell.
//!
//! Supplies the wasm32 implementations of the seams the driver layer is
//! generic over: [`WindowBridge`] for [`host_bridge::HostBridge`],
//! [`BrowserTimer`] for [`correlator::Timer`], plus the console logger and
//! the DOM lockdown installer.

mod bridge;
mod dom_lockdown;
mod logger;
mod timer;

pub use bridge::{from_js, to_js, WindowBridge};
pub use dom_lockdown::install_lockdown;
pub use logger::{init_logger, ConsoleLogger};
pub use timer::BrowserTimer;
