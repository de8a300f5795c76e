//! Outbound calls and their positional arguments.

use serde_json::Value;

use crate::event::{required, string_arg};
use crate::{Args, OutboundChannel, SchemaError, SchemaResult};

/// A fire-and-forget call from the shell to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutboundCall {
    /// `load()`
    Load,
    /// `login(username, password)`
    Login {
        /// Account name.
        username: String,
        /// Plain-text password; the host forwards it over TLS.
        password: String,
    },
    /// `openBrowser()`
    OpenBrowser,
    /// Legacy `openBrowser(url)` used by older hosts.
    OpenBrowserAt {
        /// Initial page for the embedded browser.
        url: String,
    },
    /// `logout()`
    Logout,
    /// `checkSystemInfo()`
    CheckSystemInfo,
    /// `checkScreenshot()`
    CheckScreenshot,
    /// `checkBrowser()`
    CheckBrowser,
    /// `getUSBDevices()`
    GetUsbDevices,
    /// `getDeviceInfo()`
    GetDeviceInfo,
}

impl OutboundCall {
    /// Channel this call is sent on.
    pub fn channel(&self) -> OutboundChannel {
        match self {
            OutboundCall::Load => OutboundChannel::Load,
            OutboundCall::Login { .. } => OutboundChannel::Login,
            OutboundCall::OpenBrowser | OutboundCall::OpenBrowserAt { .. } => {
                OutboundChannel::OpenBrowser
            }
            OutboundCall::Logout => OutboundChannel::Logout,
            OutboundCall::CheckSystemInfo => OutboundChannel::CheckSystemInfo,
            OutboundCall::CheckScreenshot => OutboundChannel::CheckScreenshot,
            OutboundCall::CheckBrowser => OutboundChannel::CheckBrowser,
            OutboundCall::GetUsbDevices => OutboundChannel::GetUsbDevices,
            OutboundCall::GetDeviceInfo => OutboundChannel::GetDeviceInfo,
        }
    }

    /// Positional arguments in wire order.
    pub fn args(&self) -> Args {
        match self {
            OutboundCall::Login { username, password } => vec![
                Value::String(username.clone()),
                Value::String(password.clone()),
            ],
            OutboundCall::OpenBrowserAt { url } => vec![Value::String(url.clone())],
            _ => Vec::new(),
        }
    }

    /// Rebuilds a call from its wire form, as a host would see it.
    pub fn decode(channel: &str, args: &[Value]) -> SchemaResult<Self> {
        let channel = OutboundChannel::from_name(channel)
            .ok_or_else(|| SchemaError::UnknownChannel(channel.to_owned()))?;
        let name = channel.name();
        Ok(match channel {
            OutboundChannel::Load => OutboundCall::Load,
            OutboundChannel::Login => OutboundCall::Login {
                username: string_arg(name, args, 0)?,
                password: string_arg(name, args, 1)?,
            },
            OutboundChannel::OpenBrowser => match required(name, args, 0) {
                Ok(_) => OutboundCall::OpenBrowserAt {
                    url: string_arg(name, args, 0)?,
                },
                Err(_) => OutboundCall::OpenBrowser,
            },
            OutboundChannel::Logout => OutboundCall::Logout,
            OutboundChannel::CheckSystemInfo => OutboundCall::CheckSystemInfo,
            OutboundChannel::CheckScreenshot => OutboundCall::CheckScreenshot,
            OutboundChannel::CheckBrowser => OutboundCall::CheckBrowser,
            OutboundChannel::GetUsbDevices => OutboundCall::GetUsbDevices,
            OutboundChannel::GetDeviceInfo => OutboundCall::GetDeviceInfo,
        })
    }
}
