//! Browser smoke tests for the shell build.

use std::rc::Rc;
use std::time::Duration;

use correlator::{CorrelatorConfig, DeviceInfoExchange, IpcService};
use runtime_web::{from_js, to_js, BrowserTimer};
use serde_json::json;
use shell_wasm::ShellOptions;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn wasm_smoke_test() {
    let options = ShellOptions::from_json(serde_json::Value::Null).expect("default options");
    assert_eq!(options.correlator_config(), CorrelatorConfig::default());
}

#[wasm_bindgen_test]
async fn detached_shell_resolves_checks_by_timeout() {
    let service = IpcService::new(
        None,
        Rc::new(BrowserTimer),
        CorrelatorConfig::default().with_timeout(Duration::from_millis(10)),
    );

    let result = service.check_screenshot_async().await;

    assert!(!result.success);
    assert_eq!(service.adapter().unavailable_reports(), 2);
}

#[wasm_bindgen_test]
async fn page_exports_cover_fire_and_forget_and_awaitable_calls() {
    let options = to_js(&json!({ "timeoutMs": 10 })).expect("options");
    // No window.ipc in the test page.
    assert!(!shell_wasm::shell_init(options.clone()).expect("init"));
    assert!(!shell_wasm::shell_init(options).expect("re-init"));

    assert!(!shell_wasm::shell_check_system_info().expect("check"));
    assert!(!shell_wasm::shell_check_screenshot().expect("check"));
    assert!(!shell_wasm::shell_check_browser().expect("check"));
    assert!(!shell_wasm::shell_get_usb_devices().expect("usb"));
    assert!(!shell_wasm::shell_get_device_info().expect("device info"));

    let promise = shell_wasm::shell_device_info_async().expect("promise");
    let report = from_js(&JsFuture::from(promise).await.expect("resolves"));
    assert_eq!(report["deviceInfo"], json!(null));
    assert_eq!(report["error"], json!(DeviceInfoExchange::TIMEOUT_MESSAGE));

    let promise = shell_wasm::shell_check_browser_async().expect("promise");
    let result = from_js(&JsFuture::from(promise).await.expect("resolves"));
    assert_eq!(result["success"], json!(false));
}
