//! Fixed channel-name vocabulary.

use std::fmt;
use std::str::FromStr;

use crate::SchemaError;

/// Channels the shell emits towards the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutboundChannel {
    /// Page finished loading; host answers with `systemInfo`.
    Load,
    /// Credential submission.
    Login,
    /// Open the embedded exam browser.
    OpenBrowser,
    /// End the session.
    Logout,
    /// Run the system-info diagnostic.
    CheckSystemInfo,
    /// Run the screenshot-capability diagnostic.
    CheckScreenshot,
    /// Run the browser-capability diagnostic.
    CheckBrowser,
    /// Enumerate attached USB devices.
    GetUsbDevices,
    /// Collect the machine's hardware inventory.
    GetDeviceInfo,
}

impl OutboundChannel {
    /// Every outbound channel, in declaration order.
    pub const ALL: [OutboundChannel; 9] = [
        OutboundChannel::Load,
        OutboundChannel::Login,
        OutboundChannel::OpenBrowser,
        OutboundChannel::Logout,
        OutboundChannel::CheckSystemInfo,
        OutboundChannel::CheckScreenshot,
        OutboundChannel::CheckBrowser,
        OutboundChannel::GetUsbDevices,
        OutboundChannel::GetDeviceInfo,
    ];

    /// Wire name of the channel.
    pub const fn name(self) -> &'static str {
        match self {
            OutboundChannel::Load => "load",
            OutboundChannel::Login => "login",
            OutboundChannel::OpenBrowser => "openBrowser",
            OutboundChannel::Logout => "logout",
            OutboundChannel::CheckSystemInfo => "checkSystemInfo",
            OutboundChannel::CheckScreenshot => "checkScreenshot",
            OutboundChannel::CheckBrowser => "checkBrowser",
            OutboundChannel::GetUsbDevices => "getUSBDevices",
            OutboundChannel::GetDeviceInfo => "getDeviceInfo",
        }
    }

    /// Looks a channel up by wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|channel| channel.name() == name)
    }
}

impl fmt::Display for OutboundChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutboundChannel {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| SchemaError::UnknownChannel(s.to_owned()))
    }
}

/// Channels the host delivers to the shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InboundChannel {
    /// Free-form operating system summary.
    SystemInfo,
    /// Outcome of a `login` call.
    LoginResult,
    /// URL loaded by the embedded browser.
    BrowserVisit,
    /// Domain observed by the host's traffic monitor.
    WebsiteVisit,
    /// Periodic process sample.
    ProcessInfo,
    /// Reply to `checkSystemInfo`.
    SystemCheckResult,
    /// Reply to `checkScreenshot`.
    ScreenshotCheckResult,
    /// Reply to `checkBrowser`.
    BrowserCheckResult,
    /// Reply to `getUSBDevices`.
    UsbDevicesResult,
    /// Unsolicited change in the attached USB device set.
    UsbDevicesChanged,
    /// Reply to `getDeviceInfo`.
    DeviceInfoResult,
}

impl InboundChannel {
    /// Every inbound channel, in declaration order.
    pub const ALL: [InboundChannel; 11] = [
        InboundChannel::SystemInfo,
        InboundChannel::LoginResult,
        InboundChannel::BrowserVisit,
        InboundChannel::WebsiteVisit,
        InboundChannel::ProcessInfo,
        InboundChannel::SystemCheckResult,
        InboundChannel::ScreenshotCheckResult,
        InboundChannel::BrowserCheckResult,
        InboundChannel::UsbDevicesResult,
        InboundChannel::UsbDevicesChanged,
        InboundChannel::DeviceInfoResult,
    ];

    /// Wire name of the channel.
    pub const fn name(self) -> &'static str {
        match self {
            InboundChannel::SystemInfo => "systemInfo",
            InboundChannel::LoginResult => "loginResult",
            InboundChannel::BrowserVisit => "browserVisit",
            InboundChannel::WebsiteVisit => "websiteVisit",
            InboundChannel::ProcessInfo => "processInfo",
            InboundChannel::SystemCheckResult => "systemCheckResult",
            InboundChannel::ScreenshotCheckResult => "screenshotCheckResult",
            InboundChannel::BrowserCheckResult => "browserCheckResult",
            InboundChannel::UsbDevicesResult => "usbDevicesResult",
            InboundChannel::UsbDevicesChanged => "usbDevicesChanged",
            InboundChannel::DeviceInfoResult => "deviceInfoResult",
        }
    }

    /// Looks a channel up by wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|channel| channel.name() == name)
    }
}

impl fmt::Display for InboundChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InboundChannel {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| SchemaError::UnknownChannel(s.to_owned()))
    }
}
