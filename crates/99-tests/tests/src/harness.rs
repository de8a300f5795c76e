use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use correlator::{Correlator, CorrelatorConfig, IpcService, ListenerPolicy};
use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use host_bridge::{ChannelAdapter, HostBridge};
use runtime_native::{LoopbackBridge, ManualClock};

/// Result slot filled when a spawned future completes.
pub type Slot<T> = Rc<RefCell<Option<T>>>;

/// Executor plus virtual clock.
pub struct Rig {
    pub pool: LocalPool,
    pub clock: Rc<ManualClock>,
}

impl Rig {
    pub fn new() -> Self {
        Self {
            pool: LocalPool::new(),
            clock: Rc::new(ManualClock::new()),
        }
    }

    pub fn spawn<T: 'static>(&self, future: impl Future<Output = T> + 'static) -> Slot<T> {
        let slot: Slot<T> = Rc::new(RefCell::new(None));
        let sink = slot.clone();
        self.pool
            .spawner()
            .spawn_local(async move { *sink.borrow_mut() = Some(future.await) })
            .expect("spawn");
        slot
    }

    pub fn settle(&mut self) {
        self.pool.run_until_stalled();
    }

    pub fn advance_ms(&mut self, ms: u64) {
        self.clock.advance_ms(ms);
        self.settle();
    }

    pub fn correlator(&self, bridge: Option<Rc<dyn HostBridge>>, policy: ListenerPolicy) -> Correlator {
        Correlator::new(
            ChannelAdapter::new(bridge),
            self.clock.clone(),
            CorrelatorConfig::default().with_policy(policy),
        )
    }

    pub fn service(&self, bridge: Rc<dyn HostBridge>) -> IpcService {
        IpcService::new(Some(bridge), self.clock.clone(), CorrelatorConfig::default())
    }
}

pub fn loopback() -> (Rc<LoopbackBridge>, Rc<dyn HostBridge>) {
    let bridge = Rc::new(LoopbackBridge::new());
    let dynamic: Rc<dyn HostBridge> = bridge.clone();
    (bridge, dynamic)
}
