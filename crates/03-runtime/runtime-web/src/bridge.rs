use host_bridge::{Callback, HostBridge};
use ipc_schema::Args;
use js_sys::{Array, Function, Object, Reflect, JSON};
use log::{error, warn};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Collects a variadic JS call into one array argument.
const GATHER_ARGS: &str = "return function() { handler(Array.prototype.slice.call(arguments)); };";

/// The `window.ipc` object injected by the desktop host.
pub struct WindowBridge {
    ipc: Object,
}

impl WindowBridge {
    /// Looks up `window.ipc`. `None` in a plain browser tab.
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let ipc = Reflect::get(&window, &JsValue::from_str("ipc")).ok()?;
        if !ipc.is_object() {
            return None;
        }
        Some(Self {
            ipc: ipc.unchecked_into(),
        })
    }

    /// Wraps an explicit bridge object, e.g. a test double.
    pub fn from_object(ipc: Object) -> Self {
        Self { ipc }
    }

    fn method(&self, name: &str) -> Result<Function, JsValue> {
        Reflect::get(&self.ipc, &JsValue::from_str(name))?
            .dyn_into::<Function>()
            .map_err(|_| JsValue::from_str(&format!("window.ipc.{name} is not a function")))
    }

    fn try_on(&self, channel: &str, callback: Callback) -> Result<(), JsValue> {
        let on = self.method("on")?;
        let handler = Closure::wrap(Box::new(move |raw: Array| {
            let args: Args = raw.iter().map(|value| from_js(&value)).collect();
            callback(args);
        }) as Box<dyn FnMut(Array)>);
        let gather = Function::new_with_args("handler", GATHER_ARGS);
        let listener = gather.call1(&JsValue::NULL, handler.as_ref())?;
        on.call2(&self.ipc, &JsValue::from_str(channel), &listener)?;
        // The host offers no way to unsubscribe; the listener lives as long
        // as the page.
        handler.forget();
        Ok(())
    }

    /// The host takes `emit(channel, args)` with the arguments as one array.
    fn try_emit(&self, channel: &str, args: &Args) -> Result<(), JsValue> {
        let emit = self.method("emit")?;
        let packed = Array::new();
        for arg in args {
            packed.push(&to_js(arg)?);
        }
        emit.call2(&self.ipc, &JsValue::from_str(channel), &packed)?;
        Ok(())
    }
}

impl HostBridge for WindowBridge {
    fn on(&self, channel: &str, callback: Callback) {
        if let Err(err) = self.try_on(channel, callback) {
            error!("failed to listen on {channel}: {err:?}");
        }
    }

    fn emit(&self, channel: &str, args: Args) {
        if let Err(err) = self.try_emit(channel, &args) {
            error!("failed to emit {channel}: {err:?}");
        }
    }
}

/// Converts a JS value to JSON. `undefined` and unserialisable values map
/// to `null`.
pub fn from_js(value: &JsValue) -> Value {
    if value.is_undefined() || value.is_null() {
        return Value::Null;
    }
    let text = match JSON::stringify(value) {
        Ok(text) => String::from(text),
        Err(err) => {
            warn!("value is not JSON-serialisable: {err:?}");
            return Value::Null;
        }
    };
    serde_json::from_str(&text).unwrap_or_else(|err| {
        warn!("host sent unparsable JSON: {err}");
        Value::Null
    })
}

/// Converts JSON to a JS value.
pub fn to_js(value: &Value) -> Result<JsValue, JsValue> {
    let text =
        serde_json::to_string(value).map_err(|err| JsValue::from_str(&err.to_string()))?;
    JSON::parse(&text)
}
