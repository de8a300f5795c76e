//! JSON shapes handed back to page callbacks.

use correlator::CorrelatorStats;
use ipc_schema::InboundEvent;
use serde_json::{json, Value};

use crate::{ShellError, ShellResult};

/// Payload for an event forwarded through `shell_on`.
///
/// Single-argument events pass their argument through; `loginResult`,
/// `usbDevicesResult` and `deviceInfoResult` are folded into one record.
pub fn event_payload(event: &InboundEvent) -> ShellResult<Value> {
    let value = match event {
        InboundEvent::SystemInfo(text)
        | InboundEvent::BrowserVisit(text)
        | InboundEvent::WebsiteVisit(text) => Ok(Value::String(text.clone())),
        InboundEvent::LoginResult(result) => serde_json::to_value(result),
        InboundEvent::ProcessInfo(list) => serde_json::to_value(list),
        InboundEvent::SystemCheckResult(result)
        | InboundEvent::ScreenshotCheckResult(result)
        | InboundEvent::BrowserCheckResult(result) => serde_json::to_value(result),
        InboundEvent::UsbDevicesResult(report) => serde_json::to_value(report),
        InboundEvent::UsbDevicesChanged(devices) => serde_json::to_value(devices),
        InboundEvent::DeviceInfoResult(report) => serde_json::to_value(report),
    };
    value.map_err(ShellError::Encode)
}

/// Correlator counters for `shell_stats`.
pub fn stats_payload(stats: &CorrelatorStats, unavailable_reports: u64) -> Value {
    json!({
        "issued": stats.issued,
        "settledByEvent": stats.settled_by_event,
        "settledByTimeout": stats.settled_by_timeout,
        "lateEvents": stats.late_events,
        "unsolicitedEvents": stats.unsolicited_events,
        "unavailableReports": unavailable_reports,
    })
}
