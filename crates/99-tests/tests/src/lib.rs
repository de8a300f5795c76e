//! Cross-crate test suite for the exam shell.

#[cfg(all(test, not(target_arch = "wasm32")))]
mod harness;

#[cfg(all(test, not(target_arch = "wasm32")))]
mod scenarios;

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_session;

#[cfg(target_arch = "wasm32")]
mod wasm;
