use std::time::Duration;

use futures::future::LocalBoxFuture;

/// Source of one-shot delays on the shell's event loop.
///
/// The delay starts when [`Timer::sleep`] is called, not when the returned
/// future is first polled.
pub trait Timer {
    /// Future that completes once `duration` has elapsed.
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}
