//! Typed call/event surface consumed by the UI.

use std::future::Future;
use std::rc::Rc;

use futures::FutureExt;
use host_bridge::{ChannelAdapter, Dispatch, HostBridge};
use ipc_schema::{
    CheckResult, DeviceInfoReport, InboundChannel, InboundEvent, LoginResult, OutboundCall,
    ProcessInfo, UsbDevice, UsbDevicesReport,
};

use crate::{
    CheckKind, Correlator, CorrelatorConfig, DeviceInfoExchange, LoginExchange, Settlement, Timer,
    UsbDevicesExchange,
};

/// Shell-side IPC service.
///
/// Fire-and-forget calls go straight through the [`ChannelAdapter`];
/// the `*_async` variants are correlated with their reply event and always
/// resolve, either with the host's answer or with a timeout sentinel.
#[derive(Clone)]
pub struct IpcService {
    adapter: ChannelAdapter,
    correlator: Correlator,
}

impl IpcService {
    /// Builds the service over an optional host bridge.
    pub fn new(
        bridge: Option<Rc<dyn HostBridge>>,
        timer: Rc<dyn Timer>,
        config: CorrelatorConfig,
    ) -> Self {
        let adapter = ChannelAdapter::new(bridge);
        let correlator = Correlator::new(adapter.clone(), timer, config);
        Self {
            adapter,
            correlator,
        }
    }

    /// Underlying channel adapter.
    pub fn adapter(&self) -> &ChannelAdapter {
        &self.adapter
    }

    /// Underlying correlator.
    pub fn correlator(&self) -> &Correlator {
        &self.correlator
    }

    /// Sends an arbitrary outbound call.
    pub fn emit(&self, call: OutboundCall) -> Dispatch {
        self.adapter.emit(&call)
    }

    /// Subscribes to every event on `channel`.
    pub fn on<F>(&self, channel: InboundChannel, handler: F) -> Dispatch
    where
        F: Fn(InboundEvent) + 'static,
    {
        self.adapter.on(channel, handler)
    }

    /// Asks the host for its system information.
    pub fn load(&self) -> Dispatch {
        self.emit(OutboundCall::Load)
    }

    /// Submits credentials; the verdict arrives on `loginResult`.
    pub fn login(&self, username: &str, password: &str) -> Dispatch {
        self.emit(OutboundCall::Login {
            username: username.to_owned(),
            password: password.to_owned(),
        })
    }

    /// Opens the locked exam browser.
    pub fn open_browser(&self) -> Dispatch {
        self.emit(OutboundCall::OpenBrowser)
    }

    /// Legacy form for hosts that expect the start URL.
    pub fn open_browser_at(&self, url: &str) -> Dispatch {
        self.emit(OutboundCall::OpenBrowserAt {
            url: url.to_owned(),
        })
    }

    /// Ends the session.
    pub fn logout(&self) -> Dispatch {
        self.emit(OutboundCall::Logout)
    }

    /// Starts the system check without awaiting it.
    pub fn check_system_info(&self) -> Dispatch {
        self.emit(OutboundCall::CheckSystemInfo)
    }

    /// Starts the screenshot check without awaiting it.
    pub fn check_screenshot(&self) -> Dispatch {
        self.emit(OutboundCall::CheckScreenshot)
    }

    /// Starts the browser check without awaiting it.
    pub fn check_browser(&self) -> Dispatch {
        self.emit(OutboundCall::CheckBrowser)
    }

    /// Requests a USB device report without awaiting it.
    pub fn get_usb_devices(&self) -> Dispatch {
        self.emit(OutboundCall::GetUsbDevices)
    }

    /// Requests the hardware inventory without awaiting it.
    pub fn get_device_info(&self) -> Dispatch {
        self.emit(OutboundCall::GetDeviceInfo)
    }

    /// Runs `kind` and resolves with its result.
    pub fn check_async(&self, kind: CheckKind) -> impl Future<Output = CheckResult> + 'static {
        self.correlator.request(kind).map(Settlement::into_value)
    }

    /// System check.
    pub fn check_system_info_async(&self) -> impl Future<Output = CheckResult> + 'static {
        self.check_async(CheckKind::SystemInfo)
    }

    /// Screenshot check.
    pub fn check_screenshot_async(&self) -> impl Future<Output = CheckResult> + 'static {
        self.check_async(CheckKind::Screenshot)
    }

    /// Browser check.
    pub fn check_browser_async(&self) -> impl Future<Output = CheckResult> + 'static {
        self.check_async(CheckKind::Browser)
    }

    /// Logs in and resolves with the host's verdict.
    pub fn login_async(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = LoginResult> + 'static {
        let exchange = LoginExchange {
            username: username.to_owned(),
            password: password.to_owned(),
        };
        self.correlator.request(exchange).map(Settlement::into_value)
    }

    /// Enumerates USB devices attached to the exam machine.
    pub fn usb_devices_async(&self) -> impl Future<Output = UsbDevicesReport> + 'static {
        self.correlator
            .request(UsbDevicesExchange)
            .map(Settlement::into_value)
    }

    /// Collects the machine's hardware inventory.
    pub fn device_info_async(&self) -> impl Future<Output = DeviceInfoReport> + 'static {
        self.correlator
            .request(DeviceInfoExchange)
            .map(Settlement::into_value)
    }

    /// Handles `systemInfo` pushes.
    pub fn on_system_info<F>(&self, handler: F) -> Dispatch
    where
        F: Fn(String) + 'static,
    {
        self.on(InboundChannel::SystemInfo, move |event| {
            if let InboundEvent::SystemInfo(info) = event {
                handler(info);
            }
        })
    }

    /// Handles every `loginResult`, including ones nobody awaits.
    pub fn on_login_result<F>(&self, handler: F) -> Dispatch
    where
        F: Fn(LoginResult) + 'static,
    {
        self.on(InboundChannel::LoginResult, move |event| {
            if let InboundEvent::LoginResult(result) = event {
                handler(result);
            }
        })
    }

    /// Handles `browserVisit` pushes.
    pub fn on_browser_visit<F>(&self, handler: F) -> Dispatch
    where
        F: Fn(String) + 'static,
    {
        self.on(InboundChannel::BrowserVisit, move |event| {
            if let InboundEvent::BrowserVisit(url) = event {
                handler(url);
            }
        })
    }

    /// Handles `websiteVisit` pushes (domain only).
    pub fn on_website_visit<F>(&self, handler: F) -> Dispatch
    where
        F: Fn(String) + 'static,
    {
        self.on(InboundChannel::WebsiteVisit, move |event| {
            if let InboundEvent::WebsiteVisit(domain) = event {
                handler(domain);
            }
        })
    }

    /// Handles process list snapshots.
    pub fn on_process_info<F>(&self, handler: F) -> Dispatch
    where
        F: Fn(Vec<ProcessInfo>) + 'static,
    {
        self.on(InboundChannel::ProcessInfo, move |event| {
            if let InboundEvent::ProcessInfo(list) = event {
                handler(list);
            }
        })
    }

    /// Handles hot-plug updates.
    pub fn on_usb_devices_changed<F>(&self, handler: F) -> Dispatch
    where
        F: Fn(Vec<UsbDevice>) + 'static,
    {
        self.on(InboundChannel::UsbDevicesChanged, move |event| {
            if let InboundEvent::UsbDevicesChanged(devices) = event {
                handler(devices);
            }
        })
    }
}
