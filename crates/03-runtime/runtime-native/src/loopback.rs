use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use host_bridge::{Callback, HostBridge};
use ipc_schema::{Args, InboundEvent, SchemaResult};
use log::trace;

/// In-memory bridge: records emitted calls and fires registered listeners
/// on demand.
///
/// Like the real bridge, listeners are kept forever and every listener for
/// a channel sees every event on it.
#[derive(Default)]
pub struct LoopbackBridge {
    emitted: RefCell<Vec<(String, Args)>>,
    listeners: RefCell<HashMap<String, Vec<Rc<dyn Fn(Args)>>>>,
}

impl LoopbackBridge {
    /// Empty bridge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires `event` at every listener on its channel.
    pub fn deliver(&self, event: &InboundEvent) -> SchemaResult<usize> {
        Ok(self.deliver_raw(event.channel().name(), event.to_args()?))
    }

    /// Fires raw `args` at every listener on `channel`. Returns how many
    /// listeners were invoked.
    pub fn deliver_raw(&self, channel: &str, args: Args) -> usize {
        // Listeners may register more listeners while running.
        let callbacks = self
            .listeners
            .borrow()
            .get(channel)
            .cloned()
            .unwrap_or_default();
        trace!("loopback deliver {channel} to {} listeners", callbacks.len());
        for callback in &callbacks {
            callback(args.clone());
        }
        callbacks.len()
    }

    /// Listeners currently registered on `channel`.
    pub fn listener_count(&self, channel: &str) -> usize {
        self.listeners.borrow().get(channel).map_or(0, Vec::len)
    }

    /// Listeners across every channel.
    pub fn total_listeners(&self) -> usize {
        self.listeners.borrow().values().map(Vec::len).sum()
    }

    /// Drains the calls emitted so far.
    pub fn take_emitted(&self) -> Vec<(String, Args)> {
        std::mem::take(&mut *self.emitted.borrow_mut())
    }

    /// Channel names emitted so far, oldest first.
    pub fn emitted_channels(&self) -> Vec<String> {
        self.emitted
            .borrow()
            .iter()
            .map(|(channel, _)| channel.clone())
            .collect()
    }
}

impl HostBridge for LoopbackBridge {
    fn on(&self, channel: &str, callback: Callback) {
        self.listeners
            .borrow_mut()
            .entry(channel.to_owned())
            .or_default()
            .push(Rc::from(callback));
    }

    fn emit(&self, channel: &str, args: Args) {
        self.emitted.borrow_mut().push((channel.to_owned(), args));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipc_schema::CheckResult;
    use serde_json::json;
    use std::cell::Cell;

    #[test]
    fn every_listener_sees_every_event() {
        let bridge = LoopbackBridge::new();
        let hits = Rc::new(Cell::new(0));
        for _ in 0..3 {
            let hits = hits.clone();
            bridge.on(
                "browserCheckResult",
                Box::new(move |_| hits.set(hits.get() + 1)),
            );
        }

        let delivered = bridge
            .deliver(&InboundEvent::BrowserCheckResult(CheckResult::passed()))
            .unwrap();

        assert_eq!(delivered, 3);
        assert_eq!(hits.get(), 3);
        assert_eq!(bridge.listener_count("browserCheckResult"), 3);
        assert_eq!(bridge.deliver_raw("systemCheckResult", vec![]), 0);
    }

    #[test]
    fn emitted_calls_are_recorded_in_order() {
        let bridge = LoopbackBridge::new();
        bridge.emit("login", vec![json!("alice"), json!("pw")]);
        bridge.emit("checkBrowser", vec![]);

        assert_eq!(bridge.emitted_channels(), vec!["login", "checkBrowser"]);
        let drained = bridge.take_emitted();
        assert_eq!(drained[0].1, vec![json!("alice"), json!("pw")]);
        assert!(bridge.take_emitted().is_empty());
    }
}
