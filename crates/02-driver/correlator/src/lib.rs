#![deny(missing_docs)]
//! Request/response correlation on top of the host bridge.
//!
//! The host only offers fire-and-forget calls and named events. An
//! [`Exchange`] pairs one outbound call with the event that answers it; the
//! [`Correlator`] turns that pair into a future that settles exactly once,
//! with the reply or with a timeout sentinel, whichever comes first.
//! [`IpcService`] is the typed surface the UI talks to.

mod config;
mod correlator;
mod exchange;
mod pending;
mod router;
mod service;
mod timer;

#[cfg(test)]
mod testing;

pub use config::{CorrelatorConfig, ListenerPolicy, DEFAULT_TIMEOUT};
pub use correlator::{Correlator, CorrelatorStats};
pub use exchange::{
    CheckKind, DeviceInfoExchange, Exchange, LoginExchange, UsbDevicesExchange,
};
pub use pending::{Completion, OperationState, PendingOperation, SettledBy, Settlement};
pub use service::IpcService;
pub use timer::Timer;
