use std::cell::{Cell, RefCell};
use std::time::Duration;

use correlator::Timer;
use futures::channel::oneshot;
use futures::future::{FutureExt, LocalBoxFuture};

struct Sleeper {
    deadline: Duration,
    wake: oneshot::Sender<()>,
}

/// Virtual clock. Time only moves when [`ManualClock::advance`] is called.
#[derive(Default)]
pub struct ManualClock {
    now: Cell<Duration>,
    sleepers: RefCell<Vec<Sleeper>>,
}

impl ManualClock {
    /// Clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the clock was created.
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Moves time forward by `by` and fires every sleeper now due.
    ///
    /// Sleepers are woken, not polled; the caller still has to drive its
    /// executor for their futures to observe the wake-up.
    pub fn advance(&self, by: Duration) {
        let now = self.now.get() + by;
        self.now.set(now);
        let due: Vec<Sleeper> = {
            let mut sleepers = self.sleepers.borrow_mut();
            let (due, rest) = sleepers.drain(..).partition(|s| s.deadline <= now);
            *sleepers = rest;
            due
        };
        for sleeper in due {
            let _ = sleeper.wake.send(());
        }
    }

    /// [`ManualClock::advance`] in milliseconds.
    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    /// Sleepers that have not fired yet, including abandoned ones.
    pub fn pending_sleepers(&self) -> usize {
        self.sleepers.borrow().len()
    }
}

impl Timer for ManualClock {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        let (wake, fired) = oneshot::channel();
        self.sleepers.borrow_mut().push(Sleeper {
            deadline: self.now.get() + duration,
            wake,
        });
        fired.map(|_| ()).boxed_local()
    }
}
