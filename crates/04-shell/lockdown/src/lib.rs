#![deny(missing_docs)]
//! Which browser affordances the exam page suppresses.
//!
//! This crate only classifies input; `runtime-web` wires the result to
//! capturing DOM listeners that call `preventDefault`.

mod chord;
mod gesture;
mod policy;

pub use chord::{Guard, KeyChord};
pub use gesture::PointerGesture;
pub use policy::LockdownPolicy;

use std::time::Duration;

/// Stylesheet injected into the page head.
pub const LOCKDOWN_CSS: &str = "html, body {
  user-select: none;
  -webkit-user-select: none;
  -moz-user-select: none;
  -ms-user-select: none;
  touch-action: manipulation;
  overscroll-behavior: none;
}";

/// Content of the injected `<meta name="viewport">` tag.
pub const VIEWPORT_CONTENT: &str =
    "width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=no";

/// `autocomplete` value that keeps password managers away from an input.
pub const PASSWORD_AUTOCOMPLETE: &str = "new-password";

/// How long password inputs stay `readonly` after hardening.
pub const PASSWORD_READONLY_GRACE: Duration = Duration::from_millis(100);
