#![deny(missing_docs)]
//! Wire vocabulary shared by the shell and the host bridge.
//!
//! The host multiplexes every call and event over one channel keyed by a
//! string name. Arguments travel positionally as JSON values; this crate
//! fixes the set of names, the arity of each, and the records they carry.

mod call;
mod channel;
mod error;
mod event;
mod records;

pub use call::OutboundCall;
pub use channel::{InboundChannel, OutboundChannel};
pub use error::{SchemaError, SchemaResult};
pub use event::InboundEvent;
pub use records::{
    CheckResult, DeviceInfo, DeviceInfoReport, DiskInfo, ExamInfo, GpuInfo, LoginResult,
    MotherboardInfo, NetworkInfo, ProcessInfo, SystemInfo, UsbDevice, UsbDevicesReport,
};

/// Positional argument list as carried by the bridge.
pub type Args = Vec<serde_json::Value>;
