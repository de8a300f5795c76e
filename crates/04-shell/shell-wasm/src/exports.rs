//! Page-facing exports (wasm32 only).

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use correlator::IpcService;
use host_bridge::HostBridge;
use ipc_schema::InboundChannel;
use js_sys::{Function, Promise};
use log::{info, warn, LevelFilter};
use runtime_web::{from_js, init_logger, install_lockdown, to_js, BrowserTimer, WindowBridge};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::{event_payload, stats_payload, ShellError, ShellOptions};

thread_local! {
    static SHELL: RefCell<Option<IpcService>> = RefCell::new(None);
}

impl From<ShellError> for JsValue {
    fn from(err: ShellError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

fn with_shell<F, R>(f: F) -> Result<R, JsValue>
where
    F: FnOnce(&IpcService) -> R,
{
    SHELL.with(|shell| {
        let shell = shell.borrow();
        let service = shell.as_ref().ok_or(ShellError::NotInitialized)?;
        Ok(f(service))
    })
}

fn resolve_json<Fut, T>(future: Fut) -> Promise
where
    Fut: Future<Output = T> + 'static,
    T: Serialize,
{
    future_to_promise(async move {
        let value = serde_json::to_value(future.await).map_err(ShellError::Encode)?;
        to_js(&value)
    })
}

#[wasm_bindgen(start)]
pub fn shell_start() {
    // A second logger can only come from the embedding page; keep theirs.
    if init_logger(LevelFilter::Info).is_err() {
        warn!("logger already installed");
    }
}

/// Builds the shell. Returns whether the host bridge was found.
#[wasm_bindgen]
pub fn shell_init(options: JsValue) -> Result<bool, JsValue> {
    let options = ShellOptions::from_json(from_js(&options))?;
    log::set_max_level(options.level_filter()?);

    let bridge = WindowBridge::detect().map(|bridge| Rc::new(bridge) as Rc<dyn HostBridge>);
    if bridge.is_none() {
        warn!("window.ipc not found; host calls will be dropped");
    }
    let service = IpcService::new(bridge, Rc::new(BrowserTimer), options.correlator_config());
    let available = service.adapter().is_available();

    install_lockdown(options.lockdown)?;
    SHELL.with(|shell| *shell.borrow_mut() = Some(service));
    info!("shell ready: {options:?}");
    Ok(available)
}

#[wasm_bindgen]
pub fn shell_load() -> Result<bool, JsValue> {
    with_shell(|shell| shell.load().is_forwarded())
}

#[wasm_bindgen]
pub fn shell_login(username: &str, password: &str) -> Result<bool, JsValue> {
    with_shell(|shell| shell.login(username, password).is_forwarded())
}

#[wasm_bindgen]
pub fn shell_login_async(username: &str, password: &str) -> Result<Promise, JsValue> {
    with_shell(|shell| resolve_json(shell.login_async(username, password)))
}

#[wasm_bindgen]
pub fn shell_open_browser(url: Option<String>) -> Result<bool, JsValue> {
    with_shell(|shell| match url {
        Some(url) => shell.open_browser_at(&url).is_forwarded(),
        None => shell.open_browser().is_forwarded(),
    })
}

#[wasm_bindgen]
pub fn shell_logout() -> Result<bool, JsValue> {
    with_shell(|shell| shell.logout().is_forwarded())
}

#[wasm_bindgen]
pub fn shell_check_system_info() -> Result<bool, JsValue> {
    with_shell(|shell| shell.check_system_info().is_forwarded())
}

#[wasm_bindgen]
pub fn shell_check_screenshot() -> Result<bool, JsValue> {
    with_shell(|shell| shell.check_screenshot().is_forwarded())
}

#[wasm_bindgen]
pub fn shell_check_browser() -> Result<bool, JsValue> {
    with_shell(|shell| shell.check_browser().is_forwarded())
}

#[wasm_bindgen]
pub fn shell_get_usb_devices() -> Result<bool, JsValue> {
    with_shell(|shell| shell.get_usb_devices().is_forwarded())
}

#[wasm_bindgen]
pub fn shell_get_device_info() -> Result<bool, JsValue> {
    with_shell(|shell| shell.get_device_info().is_forwarded())
}

/// Resolves with `{ success, message? }`; never rejects once initialised.
#[wasm_bindgen]
pub fn shell_check_system_info_async() -> Result<Promise, JsValue> {
    with_shell(|shell| resolve_json(shell.check_system_info_async()))
}

#[wasm_bindgen]
pub fn shell_check_screenshot_async() -> Result<Promise, JsValue> {
    with_shell(|shell| resolve_json(shell.check_screenshot_async()))
}

#[wasm_bindgen]
pub fn shell_check_browser_async() -> Result<Promise, JsValue> {
    with_shell(|shell| resolve_json(shell.check_browser_async()))
}

#[wasm_bindgen]
pub fn shell_usb_devices_async() -> Result<Promise, JsValue> {
    with_shell(|shell| resolve_json(shell.usb_devices_async()))
}

#[wasm_bindgen]
pub fn shell_device_info_async() -> Result<Promise, JsValue> {
    with_shell(|shell| resolve_json(shell.device_info_async()))
}

/// Forwards every event on `channel` to `callback` as a JSON value.
#[wasm_bindgen]
pub fn shell_on(channel: &str, callback: Function) -> Result<bool, JsValue> {
    let channel = InboundChannel::from_name(channel)
        .ok_or_else(|| ipc_schema::SchemaError::UnknownChannel(channel.to_owned()))
        .map_err(ShellError::from)?;
    with_shell(move |shell| {
        shell
            .on(channel, move |event| {
                let payload = event_payload(&event).map_err(JsValue::from).and_then(|v| to_js(&v));
                let delivered = payload.and_then(|payload| callback.call1(&JsValue::NULL, &payload));
                if let Err(err) = delivered {
                    warn!("{channel} handler failed: {err:?}");
                }
            })
            .is_forwarded()
    })
}

#[wasm_bindgen]
pub fn shell_stats() -> Result<JsValue, JsValue> {
    let stats = with_shell(|shell| {
        stats_payload(
            &shell.correlator().stats(),
            shell.adapter().unavailable_reports(),
        )
    })?;
    to_js(&stats)
}
