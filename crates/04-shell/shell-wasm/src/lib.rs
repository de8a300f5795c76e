//! Top-level wasm module for the exam shell.
//!
//! The page calls `shell_init` once, then drives the host through the
//! `shell_*` exports. Everything except the exports themselves is plain Rust
//! and tested natively.

#![allow(missing_docs)]

mod error;
mod options;
mod payload;

pub use error::{ShellError, ShellResult};
pub use options::ShellOptions;
pub use payload::{event_payload, stats_payload};

#[cfg(target_arch = "wasm32")]
mod exports;

#[cfg(target_arch = "wasm32")]
pub use exports::*;
