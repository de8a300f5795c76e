//! Inbound events and the positional-argument codec.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::records::null_as_default;
use crate::{
    Args, CheckResult, DeviceInfo, DeviceInfoReport, ExamInfo, InboundChannel, LoginResult,
    ProcessInfo, SchemaError, SchemaResult, UsbDevice, UsbDevicesReport,
};

/// A typed event delivered by the host.
#[derive(Clone, Debug, PartialEq)]
pub enum InboundEvent {
    /// `systemInfo(info)`
    SystemInfo(String),
    /// `loginResult(success, examInfo, message?)`
    LoginResult(LoginResult),
    /// `browserVisit(url)`
    BrowserVisit(String),
    /// `websiteVisit(domain)`
    WebsiteVisit(String),
    /// `processInfo(processList)`
    ProcessInfo(Vec<ProcessInfo>),
    /// `systemCheckResult(result)`
    SystemCheckResult(CheckResult),
    /// `screenshotCheckResult(result)`
    ScreenshotCheckResult(CheckResult),
    /// `browserCheckResult(result)`
    BrowserCheckResult(CheckResult),
    /// `usbDevicesResult(devices, error)`
    UsbDevicesResult(UsbDevicesReport),
    /// `usbDevicesChanged(devices)`
    UsbDevicesChanged(Vec<UsbDevice>),
    /// `deviceInfoResult(deviceInfo, error)`
    DeviceInfoResult(DeviceInfoReport),
}

impl InboundEvent {
    /// Channel the event travels on.
    pub fn channel(&self) -> InboundChannel {
        match self {
            InboundEvent::SystemInfo(_) => InboundChannel::SystemInfo,
            InboundEvent::LoginResult(_) => InboundChannel::LoginResult,
            InboundEvent::BrowserVisit(_) => InboundChannel::BrowserVisit,
            InboundEvent::WebsiteVisit(_) => InboundChannel::WebsiteVisit,
            InboundEvent::ProcessInfo(_) => InboundChannel::ProcessInfo,
            InboundEvent::SystemCheckResult(_) => InboundChannel::SystemCheckResult,
            InboundEvent::ScreenshotCheckResult(_) => InboundChannel::ScreenshotCheckResult,
            InboundEvent::BrowserCheckResult(_) => InboundChannel::BrowserCheckResult,
            InboundEvent::UsbDevicesResult(_) => InboundChannel::UsbDevicesResult,
            InboundEvent::UsbDevicesChanged(_) => InboundChannel::UsbDevicesChanged,
            InboundEvent::DeviceInfoResult(_) => InboundChannel::DeviceInfoResult,
        }
    }

    /// Decodes the positional arguments delivered on `channel`.
    pub fn decode(channel: InboundChannel, args: &[Value]) -> SchemaResult<Self> {
        let name = channel.name();
        Ok(match channel {
            InboundChannel::SystemInfo => InboundEvent::SystemInfo(string_arg(name, args, 0)?),
            InboundChannel::LoginResult => InboundEvent::LoginResult(LoginResult {
                success: arg(name, args, 0)?,
                exam_info: optional_arg::<ExamInfo>(name, args, 1)?,
                message: optional_arg::<String>(name, args, 2)?.filter(|msg| !msg.is_empty()),
            }),
            InboundChannel::BrowserVisit => InboundEvent::BrowserVisit(string_arg(name, args, 0)?),
            InboundChannel::WebsiteVisit => InboundEvent::WebsiteVisit(string_arg(name, args, 0)?),
            InboundChannel::ProcessInfo => InboundEvent::ProcessInfo(list_arg(name, args, 0)?),
            InboundChannel::SystemCheckResult => InboundEvent::SystemCheckResult(arg(name, args, 0)?),
            InboundChannel::ScreenshotCheckResult => {
                InboundEvent::ScreenshotCheckResult(arg(name, args, 0)?)
            }
            InboundChannel::BrowserCheckResult => {
                InboundEvent::BrowserCheckResult(arg(name, args, 0)?)
            }
            InboundChannel::UsbDevicesResult => InboundEvent::UsbDevicesResult(UsbDevicesReport {
                devices: list_arg(name, args, 0)?,
                error: optional_arg::<String>(name, args, 1)?.filter(|err| !err.is_empty()),
            }),
            InboundChannel::UsbDevicesChanged => {
                InboundEvent::UsbDevicesChanged(list_arg(name, args, 0)?)
            }
            InboundChannel::DeviceInfoResult => InboundEvent::DeviceInfoResult(DeviceInfoReport {
                device_info: optional_arg::<DeviceInfo>(name, args, 0)?,
                error: optional_arg::<String>(name, args, 1)?.filter(|err| !err.is_empty()),
            }),
        })
    }

    /// Decodes an event from its raw channel name.
    pub fn decode_named(channel: &str, args: &[Value]) -> SchemaResult<Self> {
        let channel = InboundChannel::from_name(channel)
            .ok_or_else(|| SchemaError::UnknownChannel(channel.to_owned()))?;
        Self::decode(channel, args)
    }

    /// Positional arguments in wire order, as the host would emit them.
    pub fn to_args(&self) -> SchemaResult<Args> {
        let name = self.channel().name();
        Ok(match self {
            InboundEvent::SystemInfo(text)
            | InboundEvent::BrowserVisit(text)
            | InboundEvent::WebsiteVisit(text) => vec![Value::String(text.clone())],
            InboundEvent::LoginResult(result) => vec![
                Value::Bool(result.success),
                encode(name, &result.exam_info)?,
                Value::String(result.message.clone().unwrap_or_default()),
            ],
            InboundEvent::ProcessInfo(list) => vec![encode(name, list)?],
            InboundEvent::SystemCheckResult(result)
            | InboundEvent::ScreenshotCheckResult(result)
            | InboundEvent::BrowserCheckResult(result) => vec![encode(name, result)?],
            InboundEvent::UsbDevicesResult(report) => vec![
                encode(name, &report.devices)?,
                Value::String(report.error.clone().unwrap_or_default()),
            ],
            InboundEvent::UsbDevicesChanged(devices) => vec![encode(name, devices)?],
            InboundEvent::DeviceInfoResult(report) => vec![
                encode(name, &report.device_info)?,
                Value::String(report.error.clone().unwrap_or_default()),
            ],
        })
    }
}

/// Argument at `index`, treating `null` the same as absent.
pub(crate) fn required<'a>(
    channel: &'static str,
    args: &'a [Value],
    index: usize,
) -> SchemaResult<&'a Value> {
    args.get(index)
        .filter(|value| !value.is_null())
        .ok_or(SchemaError::MissingArgument { channel, index })
}

pub(crate) fn arg<T: DeserializeOwned>(
    channel: &'static str,
    args: &[Value],
    index: usize,
) -> SchemaResult<T> {
    let value = required(channel, args, index)?;
    T::deserialize(value).map_err(|source| SchemaError::InvalidPayload {
        channel,
        index,
        source,
    })
}

pub(crate) fn string_arg(
    channel: &'static str,
    args: &[Value],
    index: usize,
) -> SchemaResult<String> {
    arg(channel, args, index)
}

fn optional_arg<T: DeserializeOwned>(
    channel: &'static str,
    args: &[Value],
    index: usize,
) -> SchemaResult<Option<T>> {
    match required(channel, args, index) {
        Ok(_) => arg(channel, args, index).map(Some),
        Err(_) => Ok(None),
    }
}

/// A list argument; `null` or absent decodes as empty.
fn list_arg<T: DeserializeOwned>(
    channel: &'static str,
    args: &[Value],
    index: usize,
) -> SchemaResult<Vec<T>> {
    match args.get(index) {
        Some(value) => null_as_default(value).map_err(|source| SchemaError::InvalidPayload {
            channel,
            index,
            source,
        }),
        None => Ok(Vec::new()),
    }
}

fn encode<T: Serialize>(channel: &'static str, value: &T) -> SchemaResult<Value> {
    serde_json::to_value(value).map_err(|source| SchemaError::Encode { channel, source })
}
