//! The request/response race between a reply event and a timer.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use futures::future::{self, Either, FutureExt, LocalBoxFuture};
use host_bridge::ChannelAdapter;
use ipc_schema::{InboundChannel, InboundEvent};
use log::{debug, warn};

use crate::router::{Deliver, ReplyRouter};
use crate::{
    CorrelatorConfig, Exchange, ListenerPolicy, PendingOperation, SettledBy, Settlement, Timer,
};

/// Counters describing correlator traffic since construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CorrelatorStats {
    /// Requests started.
    pub issued: u64,
    /// Requests settled by their reply.
    pub settled_by_event: u64,
    /// Requests settled by the timer.
    pub settled_by_timeout: u64,
    /// Replies that reached an already-settled request.
    pub late_events: u64,
    /// Replies that arrived with no request waiting.
    pub unsolicited_events: u64,
}

#[derive(Default)]
pub(crate) struct StatsCell(Cell<CorrelatorStats>);

impl StatsCell {
    pub(crate) fn update(&self, f: impl FnOnce(&mut CorrelatorStats)) {
        let mut stats = self.0.get();
        f(&mut stats);
        self.0.set(stats);
    }

    pub(crate) fn snapshot(&self) -> CorrelatorStats {
        self.0.get()
    }
}

struct CorrelatorInner {
    adapter: ChannelAdapter,
    timer: Rc<dyn Timer>,
    config: CorrelatorConfig,
    router: Rc<ReplyRouter>,
    stats: Rc<StatsCell>,
    next_token: Cell<u64>,
}

/// Turns [`Exchange`]s into awaitable, bounded-latency operations.
#[derive(Clone)]
pub struct Correlator {
    inner: Rc<CorrelatorInner>,
}

impl Correlator {
    /// Creates a correlator that emits through `adapter` and arms `timer`.
    pub fn new(adapter: ChannelAdapter, timer: Rc<dyn Timer>, config: CorrelatorConfig) -> Self {
        let stats = Rc::new(StatsCell::default());
        let router = ReplyRouter::new(adapter.clone(), Rc::clone(&stats));
        Self {
            inner: Rc::new(CorrelatorInner {
                adapter,
                timer,
                config,
                router,
                stats,
                next_token: Cell::new(0),
            }),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> CorrelatorConfig {
        self.inner.config
    }

    /// Traffic counters.
    pub fn stats(&self) -> CorrelatorStats {
        self.inner.stats.snapshot()
    }

    /// Requests waiting for a reply on `channel` (route policy only).
    pub fn waiting(&self, channel: InboundChannel) -> usize {
        self.inner.router.waiting(channel)
    }

    /// Starts `exchange` and returns a future for its settlement.
    ///
    /// The reply listener is attached, the call emitted and the timer armed
    /// before this returns. The future never fails: it yields the reply or
    /// the exchange's timeout sentinel.
    pub fn request<E>(&self, exchange: E) -> LocalBoxFuture<'static, Settlement<E::Output>>
    where
        E: Exchange + 'static,
        E::Output: 'static,
    {
        let inner = &self.inner;
        let exchange = Rc::new(exchange);
        let (pending, completion) = PendingOperation::new();
        let channel = exchange.reply_channel();
        let token = inner.next_token.get();
        inner.next_token.set(token + 1);
        inner.stats.update(|stats| stats.issued += 1);

        let guard = match inner.config.policy {
            ListenerPolicy::Route => {
                let deliver = route_delivery(&exchange, &pending, &inner.stats, token);
                inner.router.enqueue(channel, token, deliver);
                Some(WaiterGuard {
                    router: Rc::downgrade(&inner.router),
                    channel,
                    token,
                })
            }
            ListenerPolicy::Accumulate => {
                attach_listener(&inner.adapter, &exchange, &pending, &inner.stats, token);
                None
            }
        };

        inner.adapter.emit(&exchange.request());
        let sleep = inner.timer.sleep(inner.config.timeout);
        debug!("{} #{token} sent; waiting on {channel}", exchange.label());

        let stats = Rc::clone(&inner.stats);
        async move {
            let _guard = guard;
            match future::select(completion, sleep).await {
                Either::Left((Some(settlement), _)) => settlement,
                Either::Left((None, _)) => timeout_settlement(&*exchange),
                Either::Right(((), completion)) => {
                    if pending.settle(exchange.timed_out(), SettledBy::Timeout) {
                        stats.update(|stats| stats.settled_by_timeout += 1);
                        warn!("{} #{token} timed out", exchange.label());
                    }
                    completion
                        .await
                        .unwrap_or_else(|| timeout_settlement(&*exchange))
                }
            }
        }
        .boxed_local()
    }
}

fn timeout_settlement<E: Exchange + ?Sized>(exchange: &E) -> Settlement<E::Output> {
    Settlement {
        value: exchange.timed_out(),
        via: SettledBy::Timeout,
    }
}

fn route_delivery<E>(
    exchange: &Rc<E>,
    pending: &PendingOperation<E::Output>,
    stats: &Rc<StatsCell>,
    token: u64,
) -> Deliver
where
    E: Exchange + 'static,
    E::Output: 'static,
{
    let exchange = Rc::clone(exchange);
    let pending = pending.clone();
    let stats = Rc::clone(stats);
    Box::new(move |event: &InboundEvent| {
        if pending.is_abandoned() {
            return false;
        }
        let Some(value) = exchange.accept(event) else {
            return false;
        };
        let settled = pending.settle(value, SettledBy::Event);
        if settled {
            stats.update(|stats| stats.settled_by_event += 1);
            debug!("{} #{token} answered", exchange.label());
        }
        settled
    })
}

fn attach_listener<E>(
    adapter: &ChannelAdapter,
    exchange: &Rc<E>,
    pending: &PendingOperation<E::Output>,
    stats: &Rc<StatsCell>,
    token: u64,
) where
    E: Exchange + 'static,
    E::Output: 'static,
{
    let exchange = Rc::clone(exchange);
    let pending = pending.clone();
    let stats = Rc::clone(stats);
    adapter.on(exchange.reply_channel(), move |event| {
        let Some(value) = exchange.accept(&event) else {
            return;
        };
        if pending.settle(value, SettledBy::Event) {
            stats.update(|stats| stats.settled_by_event += 1);
            debug!("{} #{token} answered", exchange.label());
        } else {
            stats.update(|stats| stats.late_events += 1);
        }
    });
}

/// Withdraws a routed waiter when its request finishes or is dropped.
struct WaiterGuard {
    router: Weak<ReplyRouter>,
    channel: InboundChannel,
    token: u64,
}

impl Drop for WaiterGuard {
    fn drop(&mut self) {
        if let Some(router) = self.router.upgrade() {
            router.withdraw(self.channel, self.token);
        }
    }
}
