use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use host_bridge::{Callback, HostBridge};
use ipc_schema::{
    Args, CheckResult, DeviceInfo, DeviceInfoReport, ExamInfo, InboundEvent, LoginResult,
    OutboundCall, OutboundChannel, SchemaResult, SystemInfo, UsbDevice, UsbDevicesReport,
};
use log::{debug, warn};

use crate::LoopbackBridge;

/// How a [`SimulatedHost`] answers calls.
#[derive(Clone, Debug)]
pub struct HostScript {
    /// Password accepted for every account. `None` accepts anything.
    pub password: Option<String>,
    /// Exam handed out on successful login.
    pub exam: ExamInfo,
    /// Machine summary sent, as JSON text, in answer to `load`.
    pub system_info: SystemInfo,
    /// Devices reported by `getUSBDevices`.
    pub devices: Vec<UsbDevice>,
    /// Inventory reported by `getDeviceInfo`.
    pub inventory: DeviceInfo,
    /// Calls that fail with the given message.
    pub failures: HashMap<OutboundChannel, String>,
    /// Calls the host swallows without answering.
    pub silent: HashSet<OutboundChannel>,
}

impl Default for HostScript {
    fn default() -> Self {
        Self {
            password: None,
            exam: ExamInfo {
                exam_id: "EX-2023-001".into(),
                title: "Computer skills assessment".into(),
                start_time: "2023-05-01 09:00:00".into(),
                end_time: "2023-05-01 11:00:00".into(),
                duration: 120,
                student_name: String::new(),
            },
            system_info: SystemInfo {
                cpu: "Intel(R) Core(TM) i5-8250U".into(),
                memory: "8 GB".into(),
                os: "windows".into(),
                version: "10.0.19045".into(),
            },
            devices: Vec::new(),
            inventory: DeviceInfo {
                hostname: "EXAM-PC-07".into(),
                os: "windows".into(),
                platform: "Microsoft Windows 10 Pro".into(),
                kernel_arch: "x86_64".into(),
                cpu_model: "Intel(R) Core(TM) i5-8250U".into(),
                cpu_cores: 8,
                mem_total: 8 << 30,
                ..DeviceInfo::default()
            },
            failures: HashMap::new(),
            silent: HashSet::new(),
        }
    }
}

impl HostScript {
    /// Never answer `channel`.
    pub fn silence(mut self, channel: OutboundChannel) -> Self {
        self.silent.insert(channel);
        self
    }

    /// Answer `channel` with a failure carrying `message`.
    pub fn fail(mut self, channel: OutboundChannel, message: impl Into<String>) -> Self {
        self.failures.insert(channel, message.into());
        self
    }

    /// Only accept `password`.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Report `devices` on enumeration.
    pub fn with_devices(mut self, devices: Vec<UsbDevice>) -> Self {
        self.devices = devices;
        self
    }
}

/// Scripted stand-in for the desktop host.
///
/// Implements [`HostBridge`] from the page's side: emitted calls are decoded
/// and answered according to a [`HostScript`]. Answers are queued rather than
/// fired synchronously, so tests decide when the host "responds" by calling
/// [`SimulatedHost::flush`].
pub struct SimulatedHost {
    bridge: LoopbackBridge,
    script: RefCell<HostScript>,
    outbox: RefCell<VecDeque<InboundEvent>>,
    signed_in: RefCell<Option<String>>,
    browser_opened: Cell<bool>,
    rejected: Cell<u64>,
}

impl SimulatedHost {
    /// Host following `script`.
    pub fn new(script: HostScript) -> Rc<Self> {
        Rc::new(Self {
            bridge: LoopbackBridge::new(),
            script: RefCell::new(script),
            outbox: RefCell::new(VecDeque::new()),
            signed_in: RefCell::new(None),
            browser_opened: Cell::new(false),
            rejected: Cell::new(0),
        })
    }

    /// Listener side of the host, for inspection.
    pub fn bridge(&self) -> &LoopbackBridge {
        &self.bridge
    }

    /// Replies waiting to be delivered.
    pub fn queued(&self) -> usize {
        self.outbox.borrow().len()
    }

    /// Delivers every queued reply, oldest first. Returns how many were sent.
    pub fn flush(&self) -> SchemaResult<usize> {
        let mut sent = 0;
        while let Some(event) = self.pop() {
            self.bridge.deliver(&event)?;
            sent += 1;
        }
        Ok(sent)
    }

    /// Queues an unsolicited event, as the host's monitors do.
    pub fn push(&self, event: InboundEvent) {
        self.outbox.borrow_mut().push_back(event);
    }

    /// Account currently signed in.
    pub fn signed_in(&self) -> Option<String> {
        self.signed_in.borrow().clone()
    }

    /// Whether `openBrowser` has been received.
    pub fn browser_opened(&self) -> bool {
        self.browser_opened.get()
    }

    /// Calls that could not be decoded.
    pub fn rejected_calls(&self) -> u64 {
        self.rejected.get()
    }

    fn pop(&self) -> Option<InboundEvent> {
        self.outbox.borrow_mut().pop_front()
    }

    fn handle(&self, call: OutboundCall) {
        let channel = call.channel();
        let script = self.script.borrow();
        if script.silent.contains(&channel) {
            debug!("simulated host ignoring {channel}");
            return;
        }
        let failure = script.failures.get(&channel).cloned();
        let reply = match call {
            OutboundCall::Load => match serde_json::to_string(&script.system_info) {
                Ok(text) => Some(InboundEvent::SystemInfo(text)),
                Err(err) => {
                    warn!("simulated host could not encode system info: {err}");
                    None
                }
            },
            OutboundCall::Login { username, password } => {
                Some(InboundEvent::LoginResult(self.login(&script, username, password, failure)))
            }
            OutboundCall::OpenBrowser | OutboundCall::OpenBrowserAt { .. } => {
                self.browser_opened.set(true);
                None
            }
            OutboundCall::Logout => {
                self.signed_in.borrow_mut().take();
                None
            }
            OutboundCall::CheckSystemInfo => Some(InboundEvent::SystemCheckResult(check(failure))),
            OutboundCall::CheckScreenshot => {
                Some(InboundEvent::ScreenshotCheckResult(check(failure)))
            }
            OutboundCall::CheckBrowser => Some(InboundEvent::BrowserCheckResult(check(failure))),
            OutboundCall::GetUsbDevices => Some(InboundEvent::UsbDevicesResult(match failure {
                Some(error) => UsbDevicesReport::failed(error),
                None => UsbDevicesReport {
                    devices: script.devices.clone(),
                    error: None,
                },
            })),
            OutboundCall::GetDeviceInfo => Some(InboundEvent::DeviceInfoResult(match failure {
                Some(error) => DeviceInfoReport::failed(error),
                None => DeviceInfoReport {
                    device_info: Some(script.inventory.clone()),
                    error: None,
                },
            })),
        };
        if let Some(reply) = reply {
            self.push(reply);
        }
    }

    fn login(
        &self,
        script: &HostScript,
        username: String,
        password: String,
        failure: Option<String>,
    ) -> LoginResult {
        if let Some(message) = failure {
            return LoginResult::failed(message);
        }
        if username.is_empty() {
            return LoginResult::failed("Username must not be empty");
        }
        if script.password.as_ref().is_some_and(|expected| *expected != password) {
            return LoginResult::failed("Invalid username or password");
        }
        let exam = ExamInfo {
            student_name: username.clone(),
            ..script.exam.clone()
        };
        *self.signed_in.borrow_mut() = Some(username);
        LoginResult {
            success: true,
            exam_info: Some(exam),
            message: None,
        }
    }
}

fn check(failure: Option<String>) -> CheckResult {
    failure.map_or_else(CheckResult::passed, CheckResult::failed)
}

impl HostBridge for SimulatedHost {
    fn on(&self, channel: &str, callback: Callback) {
        self.bridge.on(channel, callback);
    }

    fn emit(&self, channel: &str, args: Args) {
        match OutboundCall::decode(channel, &args) {
            Ok(call) => {
                self.bridge.emit(channel, args);
                self.handle(call);
            }
            Err(err) => {
                self.rejected.set(self.rejected.get() + 1);
                warn!("simulated host rejected call: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipc_schema::InboundChannel;
    use serde_json::json;

    fn capture(host: &SimulatedHost, channel: InboundChannel) -> Rc<RefCell<Vec<Args>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        host.on(channel.name(), Box::new(move |args| sink.borrow_mut().push(args)));
        seen
    }

    #[test]
    fn login_replies_are_queued_until_flushed() {
        let host = SimulatedHost::new(HostScript::default());
        let seen = capture(&host, InboundChannel::LoginResult);

        host.emit("login", vec![json!("alice"), json!("pw")]);
        assert_eq!(host.queued(), 1);
        assert!(seen.borrow().is_empty());

        assert_eq!(host.flush().unwrap(), 1);
        let args = seen.borrow()[0].clone();
        let InboundEvent::LoginResult(result) =
            InboundEvent::decode(InboundChannel::LoginResult, &args).unwrap()
        else {
            panic!("expected a login result");
        };
        assert!(result.success);
        assert_eq!(result.exam_info.unwrap().student_name, "alice");
        assert_eq!(host.signed_in().as_deref(), Some("alice"));
    }

    #[test]
    fn wrong_password_sends_null_exam_info() {
        let host = SimulatedHost::new(HostScript::default().with_password("secret"));
        let seen = capture(&host, InboundChannel::LoginResult);

        host.emit("login", vec![json!("alice"), json!("guess")]);
        host.flush().unwrap();

        let args = seen.borrow()[0].clone();
        assert_eq!(args[0], json!(false));
        assert_eq!(args[1], json!(null));
        assert_eq!(host.signed_in(), None);
    }

    #[test]
    fn silenced_and_failing_checks() {
        let script = HostScript::default()
            .silence(OutboundChannel::CheckScreenshot)
            .fail(OutboundChannel::CheckBrowser, "no browser engine");
        let host = SimulatedHost::new(script);
        let browser = capture(&host, InboundChannel::BrowserCheckResult);

        host.emit("checkScreenshot", vec![]);
        assert_eq!(host.queued(), 0);

        host.emit("checkBrowser", vec![]);
        host.flush().unwrap();
        assert_eq!(
            browser.borrow()[0],
            vec![json!({ "success": false, "message": "no browser engine" })]
        );
    }

    #[test]
    fn unknown_calls_are_rejected_not_recorded() {
        let host = SimulatedHost::new(HostScript::default());
        host.emit("getScreenLock", vec![]);
        assert_eq!(host.rejected_calls(), 1);
        assert!(host.bridge().emitted_channels().is_empty());
    }

    #[test]
    fn device_info_reply_carries_inventory_or_failure() {
        let host = SimulatedHost::new(HostScript::default());
        let seen = capture(&host, InboundChannel::DeviceInfoResult);
        host.emit("getDeviceInfo", vec![]);
        host.flush().unwrap();
        let args = seen.borrow()[0].clone();
        assert_eq!(args[0]["hostname"], json!("EXAM-PC-07"));
        assert_eq!(args[1], json!(""));

        let host = SimulatedHost::new(
            HostScript::default().fail(OutboundChannel::GetDeviceInfo, "WMI unavailable"),
        );
        let seen = capture(&host, InboundChannel::DeviceInfoResult);
        host.emit("getDeviceInfo", vec![]);
        host.flush().unwrap();
        assert_eq!(
            seen.borrow()[0],
            vec![json!(null), json!("WMI unavailable")]
        );
    }

    #[test]
    fn open_browser_and_logout_are_fire_and_forget() {
        let host = SimulatedHost::new(HostScript::default());
        host.emit("login", vec![json!("bob"), json!("pw")]);
        host.emit("openBrowser", vec![]);
        host.emit("logout", vec![]);

        assert!(host.browser_opened());
        assert_eq!(host.signed_in(), None);
        assert_eq!(host.queued(), 1);
    }
}
