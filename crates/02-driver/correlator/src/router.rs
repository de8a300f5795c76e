//! Per-channel reply routing for [`ListenerPolicy::Route`](crate::ListenerPolicy::Route).

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::{Rc, Weak};

use host_bridge::ChannelAdapter;
use ipc_schema::{InboundChannel, InboundEvent};
use log::debug;

use crate::correlator::StatsCell;

/// Attempts to settle a waiter with an event. Returns `true` when the
/// waiter took the event.
pub(crate) type Deliver = Box<dyn Fn(&InboundEvent) -> bool>;

struct Waiter {
    token: u64,
    deliver: Deliver,
}

/// Holds one FIFO of waiters per reply channel and a single bridge
/// listener feeding it.
pub(crate) struct ReplyRouter {
    adapter: ChannelAdapter,
    stats: Rc<StatsCell>,
    queues: RefCell<HashMap<InboundChannel, VecDeque<Waiter>>>,
    subscribed: RefCell<HashSet<InboundChannel>>,
}

impl ReplyRouter {
    pub(crate) fn new(adapter: ChannelAdapter, stats: Rc<StatsCell>) -> Rc<Self> {
        Rc::new(Self {
            adapter,
            stats,
            queues: RefCell::new(HashMap::new()),
            subscribed: RefCell::new(HashSet::new()),
        })
    }

    /// Queues a waiter behind every earlier waiter on `channel`.
    pub(crate) fn enqueue(self: &Rc<Self>, channel: InboundChannel, token: u64, deliver: Deliver) {
        self.ensure_subscribed(channel);
        self.queues
            .borrow_mut()
            .entry(channel)
            .or_default()
            .push_back(Waiter { token, deliver });
    }

    /// Removes the waiter with `token`, if it is still queued.
    pub(crate) fn withdraw(&self, channel: InboundChannel, token: u64) {
        if let Some(queue) = self.queues.borrow_mut().get_mut(&channel) {
            queue.retain(|waiter| waiter.token != token);
        }
    }

    /// Number of waiters queued on `channel`.
    pub(crate) fn waiting(&self, channel: InboundChannel) -> usize {
        self.queues.borrow().get(&channel).map_or(0, VecDeque::len)
    }

    fn ensure_subscribed(self: &Rc<Self>, channel: InboundChannel) {
        if !self.subscribed.borrow_mut().insert(channel) {
            return;
        }
        let router: Weak<Self> = Rc::downgrade(self);
        self.adapter.on(channel, move |event| {
            if let Some(router) = router.upgrade() {
                router.dispatch(event);
            }
        });
    }

    /// Hands `event` to the oldest waiter that takes it. Waiters that
    /// decline (already settled or abandoned) are discarded on the way.
    fn dispatch(&self, event: InboundEvent) {
        let channel = event.channel();
        loop {
            // Release the queue borrow before delivering.
            let next = self
                .queues
                .borrow_mut()
                .get_mut(&channel)
                .and_then(VecDeque::pop_front);
            let Some(waiter) = next else {
                self.stats.update(|stats| stats.unsolicited_events += 1);
                debug!("no request waiting on {channel}; event dropped");
                return;
            };
            if (waiter.deliver)(&event) {
                return;
            }
            debug!("skipping stale waiter #{} on {channel}", waiter.token);
        }
    }
}
