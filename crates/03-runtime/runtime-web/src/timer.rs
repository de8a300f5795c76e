use std::time::Duration;

use correlator::Timer;
use futures::future::{FutureExt, LocalBoxFuture};
use gloo_timers::future::TimeoutFuture;

/// Longest delay `setTimeout` honours; larger values fire immediately.
const MAX_DELAY_MS: u32 = i32::MAX as u32;

/// [`Timer`] backed by `setTimeout`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTimer;

impl Timer for BrowserTimer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        TimeoutFuture::new(delay_ms(duration)).boxed_local()
    }
}

fn delay_ms(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).map_or(MAX_DELAY_MS, |millis| millis.min(MAX_DELAY_MS))
}
