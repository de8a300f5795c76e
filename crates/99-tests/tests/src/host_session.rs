//! Full exam-session flows against the scripted host.

use std::cell::RefCell;
use std::rc::Rc;

use host_bridge::HostBridge;
use ipc_schema::{InboundChannel, InboundEvent, OutboundChannel, ProcessInfo, SystemInfo, UsbDevice};
use runtime_native::{HostScript, SimulatedHost};
use shell_wasm::{event_payload, ShellOptions};

use crate::harness::Rig;

fn usb_stick() -> UsbDevice {
    UsbDevice {
        name: "SanDisk Ultra".into(),
        kind: "USB Mass Storage".into(),
        manufacturer: "SanDisk".into(),
        is_storage: true,
        drive_letters: vec!["E:".into()],
    }
}

#[test]
fn login_checks_and_logout() {
    let mut rig = Rig::new();
    let host = SimulatedHost::new(HostScript::default().with_password("secret"));
    let service = rig.service(host.clone() as Rc<dyn HostBridge>);

    let system_info = Rc::new(RefCell::new(Vec::new()));
    let sink = system_info.clone();
    service.on_system_info(move |info| sink.borrow_mut().push(info));
    service.load();
    host.flush().unwrap();
    let summary: SystemInfo = serde_json::from_str(&system_info.borrow()[0]).unwrap();
    assert_eq!(summary.os, "windows");

    let rejected = rig.spawn(service.login_async("alice", "guess"));
    host.flush().unwrap();
    rig.settle();
    let rejected = rejected.borrow_mut().take().expect("login answered");
    assert!(!rejected.success);
    assert!(rejected.exam_info.is_none());

    let accepted = rig.spawn(service.login_async("alice", "secret"));
    host.flush().unwrap();
    rig.settle();
    let accepted = accepted.borrow_mut().take().expect("login answered");
    assert!(accepted.success);
    assert_eq!(accepted.exam_info.expect("exam").student_name, "alice");

    let checks = [
        rig.spawn(service.check_system_info_async()),
        rig.spawn(service.check_screenshot_async()),
        rig.spawn(service.check_browser_async()),
    ];
    host.flush().unwrap();
    rig.settle();
    for check in &checks {
        assert!(check.borrow().as_ref().is_some_and(|result| result.success));
    }

    service.open_browser();
    service.logout();
    assert!(host.browser_opened());
    assert_eq!(host.signed_in(), None);
    assert_eq!(service.correlator().stats().settled_by_timeout, 0);
}

#[test]
fn silent_host_check_times_out_while_others_succeed() {
    let mut rig = Rig::new();
    let host = SimulatedHost::new(HostScript::default().silence(OutboundChannel::CheckBrowser));
    let service = rig.service(host.clone() as Rc<dyn HostBridge>);

    let system = rig.spawn(service.check_system_info_async());
    let browser = rig.spawn(service.check_browser_async());
    host.flush().unwrap();
    rig.settle();
    assert!(system.borrow().as_ref().is_some_and(|result| result.success));
    assert!(browser.borrow().is_none());

    rig.advance_ms(5_000);
    let browser = browser.borrow_mut().take().expect("timed out");
    assert!(!browser.success);
    assert_eq!(browser.display_message(), "Browser check timed out, please retry");
}

#[test]
fn usb_report_and_hotplug_updates() {
    let mut rig = Rig::new();
    let host = SimulatedHost::new(HostScript::default().with_devices(vec![usb_stick()]));
    let service = rig.service(host.clone() as Rc<dyn HostBridge>);

    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = changes.clone();
    service.on_usb_devices_changed(move |devices| sink.borrow_mut().push(devices));

    let report = rig.spawn(service.usb_devices_async());
    host.flush().unwrap();
    rig.settle();
    let report = report.borrow_mut().take().expect("report");
    assert!(report.has_storage());
    assert_eq!(report.error, None);

    host.push(InboundEvent::UsbDevicesChanged(Vec::new()));
    host.flush().unwrap();
    assert_eq!(*changes.borrow(), vec![Vec::<UsbDevice>::new()]);
}

#[test]
fn device_inventory_is_collected_or_reported_as_failed() {
    let mut rig = Rig::new();
    let host = SimulatedHost::new(HostScript::default());
    let service = rig.service(host.clone() as Rc<dyn HostBridge>);

    let inventory = rig.spawn(service.device_info_async());
    host.flush().unwrap();
    rig.settle();
    let inventory = inventory.borrow_mut().take().expect("inventory");
    assert!(inventory.is_ok());
    assert_eq!(inventory.device_info.expect("device").os, "windows");

    let host = SimulatedHost::new(
        HostScript::default().fail(OutboundChannel::GetDeviceInfo, "WMI unavailable"),
    );
    let service = rig.service(host.clone() as Rc<dyn HostBridge>);
    let failed = rig.spawn(service.device_info_async());
    host.flush().unwrap();
    rig.settle();
    let failed = failed.borrow_mut().take().expect("failure reported");
    assert!(failed.device_info.is_none());
    assert_eq!(failed.error.as_deref(), Some("WMI unavailable"));
}

#[test]
fn monitor_events_reach_page_callbacks_as_json() {
    let rig = Rig::new();
    let host = SimulatedHost::new(HostScript::default());
    let service = rig.service(host.clone() as Rc<dyn HostBridge>);

    let forwarded = Rc::new(RefCell::new(Vec::new()));
    let sink = forwarded.clone();
    service.on(InboundChannel::ProcessInfo, move |event| {
        sink.borrow_mut().push(event_payload(&event).unwrap())
    });

    host.push(InboundEvent::ProcessInfo(vec![ProcessInfo {
        pid: 4242,
        name: "chrome.exe".into(),
        memory: 512,
        cpu: 3.5,
    }]));
    host.flush().unwrap();

    assert_eq!(
        *forwarded.borrow(),
        vec![serde_json::json!([
            { "pid": 4242, "name": "chrome.exe", "memory": 512, "cpu": 3.5 }
        ])]
    );
}

#[test]
fn page_options_drive_the_correlator() {
    let mut rig = Rig::new();
    let options = ShellOptions::from_json(serde_json::json!({ "timeoutMs": 1000 })).unwrap();
    let host = SimulatedHost::new(HostScript::default().silence(OutboundChannel::CheckSystemInfo));
    let service = correlator::IpcService::new(
        Some(host.clone() as Rc<dyn HostBridge>),
        rig.clock.clone(),
        options.correlator_config(),
    );

    let check = rig.spawn(service.check_system_info_async());
    rig.advance_ms(999);
    assert!(check.borrow().is_none());
    rig.advance_ms(1);
    assert!(check.borrow().as_ref().is_some_and(|result| !result.success));
}
