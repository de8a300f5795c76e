//! In-crate doubles for the bridge and the event-loop timer.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use futures::channel::oneshot;
use futures::future::{FutureExt, LocalBoxFuture};
use host_bridge::{Callback, HostBridge};
use ipc_schema::{Args, InboundEvent};

use crate::Timer;

#[derive(Default)]
pub(crate) struct TestBridge {
    emitted: RefCell<Vec<String>>,
    listeners: RefCell<HashMap<String, Vec<Rc<dyn Fn(Args)>>>>,
}

impl TestBridge {
    pub(crate) fn deliver(&self, event: &InboundEvent) {
        let args = event.to_args().expect("encode event");
        let callbacks = self
            .listeners
            .borrow()
            .get(event.channel().name())
            .cloned()
            .unwrap_or_default();
        for callback in callbacks {
            callback(args.clone());
        }
    }

    pub(crate) fn listener_count(&self, channel: &str) -> usize {
        self.listeners.borrow().get(channel).map_or(0, Vec::len)
    }

    pub(crate) fn emitted(&self) -> Vec<String> {
        self.emitted.borrow().clone()
    }
}

impl HostBridge for TestBridge {
    fn on(&self, channel: &str, callback: Callback) {
        self.listeners
            .borrow_mut()
            .entry(channel.to_owned())
            .or_default()
            .push(Rc::from(callback));
    }

    fn emit(&self, channel: &str, _args: Args) {
        self.emitted.borrow_mut().push(channel.to_owned());
    }
}

/// Virtual clock; sleepers fire only when the test advances time.
#[derive(Default)]
pub(crate) struct TestClock {
    now: Cell<Duration>,
    sleepers: RefCell<Vec<(Duration, oneshot::Sender<()>)>>,
}

impl TestClock {
    pub(crate) fn advance(&self, by: Duration) {
        let now = self.now.get() + by;
        self.now.set(now);
        let due: Vec<_> = {
            let mut sleepers = self.sleepers.borrow_mut();
            let (due, rest) = sleepers.drain(..).partition(|(deadline, _)| *deadline <= now);
            *sleepers = rest;
            due
        };
        for (_, sender) in due {
            let _ = sender.send(());
        }
    }

    pub(crate) fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Timer for TestClock {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        let (sender, receiver) = oneshot::channel();
        self.sleepers
            .borrow_mut()
            .push((self.now.get() + duration, sender));
        receiver.map(|_| ()).boxed_local()
    }
}
