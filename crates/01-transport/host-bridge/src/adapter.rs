//! Fail-soft channel adapter.

use std::cell::Cell;
use std::rc::Rc;

use ipc_schema::{Args, InboundChannel, InboundEvent, OutboundCall};
use log::{error, trace, warn};

use crate::{BridgeError, BridgeResult, Callback, HostBridge};

/// Outcome of a fail-soft adapter operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Handed to the host bridge. Says nothing about delivery.
    Forwarded,
    /// No bridge present; a diagnostic was reported instead.
    Unavailable,
}

impl Dispatch {
    /// Whether the operation reached the bridge.
    pub fn is_forwarded(self) -> bool {
        matches!(self, Dispatch::Forwarded)
    }
}

struct AdapterInner {
    bridge: Option<Rc<dyn HostBridge>>,
    unavailable_reports: Cell<u64>,
    listeners: Cell<u64>,
}

/// Uniform access to the host bridge.
///
/// Cloning is cheap; clones share the bridge and the diagnostic counters.
#[derive(Clone)]
pub struct ChannelAdapter {
    inner: Rc<AdapterInner>,
}

impl ChannelAdapter {
    /// Adapter over an injected bridge, or a detached adapter when `None`.
    pub fn new(bridge: Option<Rc<dyn HostBridge>>) -> Self {
        Self {
            inner: Rc::new(AdapterInner {
                bridge,
                unavailable_reports: Cell::new(0),
                listeners: Cell::new(0),
            }),
        }
    }

    /// Adapter over `bridge`.
    pub fn attached(bridge: Rc<dyn HostBridge>) -> Self {
        Self::new(Some(bridge))
    }

    /// Adapter with no bridge; every operation reports a diagnostic.
    pub fn detached() -> Self {
        Self::new(None)
    }

    /// Whether a host bridge is present.
    pub fn is_available(&self) -> bool {
        self.inner.bridge.is_some()
    }

    /// Number of diagnostics reported because the bridge was absent.
    pub fn unavailable_reports(&self) -> u64 {
        self.inner.unavailable_reports.get()
    }

    /// Number of listeners this adapter has registered with the bridge.
    pub fn registered_listeners(&self) -> u64 {
        self.inner.listeners.get()
    }

    /// Sends `call` to the host.
    pub fn emit(&self, call: &OutboundCall) -> Dispatch {
        self.emit_raw(call.channel().name(), call.args())
    }

    /// Sends `call`, returning an error instead of a diagnostic when the
    /// bridge is absent.
    pub fn try_emit(&self, call: &OutboundCall) -> BridgeResult<()> {
        let channel = call.channel().name();
        let bridge = self.bridge_or_err(channel)?;
        trace!("emit {channel}");
        bridge.emit(channel, call.args());
        Ok(())
    }

    /// Sends an untyped call.
    pub fn emit_raw(&self, channel: &str, args: Args) -> Dispatch {
        match &self.inner.bridge {
            Some(bridge) => {
                trace!("emit {channel} ({} args)", args.len());
                bridge.emit(channel, args);
                Dispatch::Forwarded
            }
            None => self.report_unavailable(channel),
        }
    }

    /// Subscribes `handler` to every decoded event on `channel`.
    ///
    /// Payloads that do not decode are logged and dropped. The subscription
    /// cannot be removed.
    pub fn on<F>(&self, channel: InboundChannel, handler: F) -> Dispatch
    where
        F: Fn(InboundEvent) + 'static,
    {
        match &self.inner.bridge {
            Some(bridge) => {
                self.register(bridge.as_ref(), channel.name(), decoding(channel, handler));
                Dispatch::Forwarded
            }
            None => self.report_unavailable(channel.name()),
        }
    }

    /// Subscribes `handler`, returning an error when the bridge is absent.
    pub fn try_on<F>(&self, channel: InboundChannel, handler: F) -> BridgeResult<()>
    where
        F: Fn(InboundEvent) + 'static,
    {
        let bridge = self.bridge_or_err(channel.name())?;
        self.register(bridge.as_ref(), channel.name(), decoding(channel, handler));
        Ok(())
    }

    /// Subscribes an untyped callback.
    pub fn on_raw(&self, channel: &str, callback: Callback) -> Dispatch {
        match &self.inner.bridge {
            Some(bridge) => {
                self.register(bridge.as_ref(), channel, callback);
                Dispatch::Forwarded
            }
            None => self.report_unavailable(channel),
        }
    }

    fn register(&self, bridge: &dyn HostBridge, channel: &str, callback: Callback) {
        let count = self.inner.listeners.get() + 1;
        self.inner.listeners.set(count);
        trace!("listen {channel} (listener #{count})");
        bridge.on(channel, callback);
    }

    fn bridge_or_err(&self, channel: &str) -> BridgeResult<&Rc<dyn HostBridge>> {
        self.inner.bridge.as_ref().ok_or_else(|| BridgeError::Unavailable {
            channel: channel.to_owned(),
        })
    }

    fn report_unavailable(&self, channel: &str) -> Dispatch {
        let reports = &self.inner.unavailable_reports;
        reports.set(reports.get() + 1);
        error!("host bridge unavailable, probably running in a plain browser; dropped `{channel}`");
        Dispatch::Unavailable
    }
}

fn decoding<F>(channel: InboundChannel, handler: F) -> Callback
where
    F: Fn(InboundEvent) + 'static,
{
    Box::new(move |args: Args| match InboundEvent::decode(channel, &args) {
        Ok(event) => handler(event),
        Err(err) => warn!("dropping malformed event: {err}"),
    })
}
