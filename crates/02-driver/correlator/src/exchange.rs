//! Call/reply pairings the correlator knows how to await.

use ipc_schema::{
    CheckResult, DeviceInfoReport, InboundChannel, InboundEvent, LoginResult, OutboundCall,
    UsbDevicesReport,
};

/// One outbound call paired with the inbound event that answers it.
pub trait Exchange {
    /// Value the awaited operation resolves with.
    type Output;

    /// Short name used in logs.
    fn label(&self) -> &'static str;

    /// Call emitted to start the exchange.
    fn request(&self) -> OutboundCall;

    /// Channel the reply arrives on.
    fn reply_channel(&self) -> InboundChannel;

    /// Extracts the reply from an event on [`Exchange::reply_channel`].
    fn accept(&self, event: &InboundEvent) -> Option<Self::Output>;

    /// Sentinel used when no reply arrives in time.
    fn timed_out(&self) -> Self::Output;
}

/// The three bounded-latency diagnostic checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CheckKind {
    /// `checkSystemInfo` ↔ `systemCheckResult`
    SystemInfo,
    /// `checkScreenshot` ↔ `screenshotCheckResult`
    Screenshot,
    /// `checkBrowser` ↔ `browserCheckResult`
    Browser,
}

impl CheckKind {
    /// Every check, in the order the UI runs them.
    pub const ALL: [CheckKind; 3] = [CheckKind::SystemInfo, CheckKind::Screenshot, CheckKind::Browser];

    /// Message carried by the timeout sentinel.
    pub const fn timeout_message(self) -> &'static str {
        match self {
            CheckKind::SystemInfo => "System check timed out, please retry",
            CheckKind::Screenshot => "Screenshot check timed out, please retry",
            CheckKind::Browser => "Browser check timed out, please retry",
        }
    }
}

impl Exchange for CheckKind {
    type Output = CheckResult;

    fn label(&self) -> &'static str {
        match self {
            CheckKind::SystemInfo => "system check",
            CheckKind::Screenshot => "screenshot check",
            CheckKind::Browser => "browser check",
        }
    }

    fn request(&self) -> OutboundCall {
        match self {
            CheckKind::SystemInfo => OutboundCall::CheckSystemInfo,
            CheckKind::Screenshot => OutboundCall::CheckScreenshot,
            CheckKind::Browser => OutboundCall::CheckBrowser,
        }
    }

    fn reply_channel(&self) -> InboundChannel {
        match self {
            CheckKind::SystemInfo => InboundChannel::SystemCheckResult,
            CheckKind::Screenshot => InboundChannel::ScreenshotCheckResult,
            CheckKind::Browser => InboundChannel::BrowserCheckResult,
        }
    }

    fn accept(&self, event: &InboundEvent) -> Option<CheckResult> {
        match (self, event) {
            (CheckKind::SystemInfo, InboundEvent::SystemCheckResult(result))
            | (CheckKind::Screenshot, InboundEvent::ScreenshotCheckResult(result))
            | (CheckKind::Browser, InboundEvent::BrowserCheckResult(result)) => Some(result.clone()),
            _ => None,
        }
    }

    fn timed_out(&self) -> CheckResult {
        CheckResult::failed(self.timeout_message())
    }
}

/// `login(username, password)` ↔ `loginResult`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginExchange {
    /// Account name.
    pub username: String,
    /// Password.
    pub password: String,
}

impl LoginExchange {
    /// Message carried by the timeout sentinel.
    pub const TIMEOUT_MESSAGE: &'static str = "Login timed out, please retry";
}

impl Exchange for LoginExchange {
    type Output = LoginResult;

    fn label(&self) -> &'static str {
        "login"
    }

    fn request(&self) -> OutboundCall {
        OutboundCall::Login {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }

    fn reply_channel(&self) -> InboundChannel {
        InboundChannel::LoginResult
    }

    fn accept(&self, event: &InboundEvent) -> Option<LoginResult> {
        match event {
            InboundEvent::LoginResult(result) => Some(result.clone()),
            _ => None,
        }
    }

    fn timed_out(&self) -> LoginResult {
        LoginResult::failed(Self::TIMEOUT_MESSAGE)
    }
}

/// `getUSBDevices()` ↔ `usbDevicesResult`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UsbDevicesExchange;

impl UsbDevicesExchange {
    /// Error carried by the timeout sentinel.
    pub const TIMEOUT_MESSAGE: &'static str = "USB device query timed out, please retry";
}

impl Exchange for UsbDevicesExchange {
    type Output = UsbDevicesReport;

    fn label(&self) -> &'static str {
        "usb device query"
    }

    fn request(&self) -> OutboundCall {
        OutboundCall::GetUsbDevices
    }

    fn reply_channel(&self) -> InboundChannel {
        InboundChannel::UsbDevicesResult
    }

    fn accept(&self, event: &InboundEvent) -> Option<UsbDevicesReport> {
        match event {
            InboundEvent::UsbDevicesResult(report) => Some(report.clone()),
            _ => None,
        }
    }

    fn timed_out(&self) -> UsbDevicesReport {
        UsbDevicesReport::failed(Self::TIMEOUT_MESSAGE)
    }
}

/// `getDeviceInfo()` ↔ `deviceInfoResult`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeviceInfoExchange;

impl DeviceInfoExchange {
    /// Error carried by the timeout sentinel.
    pub const TIMEOUT_MESSAGE: &'static str = "Device information query timed out, please retry";
}

impl Exchange for DeviceInfoExchange {
    type Output = DeviceInfoReport;

    fn label(&self) -> &'static str {
        "device info query"
    }

    fn request(&self) -> OutboundCall {
        OutboundCall::GetDeviceInfo
    }

    fn reply_channel(&self) -> InboundChannel {
        InboundChannel::DeviceInfoResult
    }

    fn accept(&self, event: &InboundEvent) -> Option<DeviceInfoReport> {
        match event {
            InboundEvent::DeviceInfoResult(report) => Some(report.clone()),
            _ => None,
        }
    }

    fn timed_out(&self) -> DeviceInfoReport {
        DeviceInfoReport::failed(Self::TIMEOUT_MESSAGE)
    }
}
