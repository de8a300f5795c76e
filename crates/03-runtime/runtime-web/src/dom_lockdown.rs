//! Wires [`LockdownPolicy`] to capturing DOM listeners.

use std::cell::Cell;

use gloo_timers::callback::Timeout;
use js_sys::Array;
use lockdown::{
    KeyChord, LockdownPolicy, PointerGesture, LOCKDOWN_CSS, PASSWORD_AUTOCOMPLETE,
    PASSWORD_READONLY_GRACE, VIEWPORT_CONTENT,
};
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, KeyboardEvent, MouseEvent,
    MutationObserver, MutationObserverInit, MutationRecord,
};

thread_local! {
    static INSTALLED: Cell<bool> = const { Cell::new(false) };
}

/// Installs every lockdown measure `policy` enables on the current page.
///
/// Listeners are registered in the capture phase and never removed, so only
/// the first call per page takes effect. Returns whether this call installed
/// anything.
pub fn install_lockdown(policy: LockdownPolicy) -> Result<bool, JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    if INSTALLED.with(|installed| installed.replace(true)) {
        warn!("lockdown already installed; ignoring {policy:?}");
        return Ok(false);
    }

    if policy.needs_key_listener() {
        listen(&document, "keydown", move |event: Event| {
            if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
                if policy.blocks_key(&chord(key)) {
                    debug!("blocked shortcut {}", key.key());
                    event.prevent_default();
                }
            }
        })?;
    }

    for kind in PointerGesture::EVENT_TYPES {
        // Wheel only blocks when zooming, so ask with the zoom flag set.
        let reachable = PointerGesture::from_event_type(kind, true)
            .is_some_and(|gesture| policy.blocks_gesture(gesture));
        if !reachable {
            continue;
        }
        listen(&document, kind, move |event: Event| {
            let zoom = event
                .dyn_ref::<MouseEvent>()
                .is_some_and(|mouse| mouse.ctrl_key() || mouse.meta_key());
            let blocked = PointerGesture::from_event_type(&event.type_(), zoom)
                .is_some_and(|gesture| policy.blocks_gesture(gesture));
            if blocked {
                event.prevent_default();
            }
        })?;
    }

    if policy.browser_shortcuts {
        inject_head(&document)?;
    }
    if policy.password_manager {
        harden_password_fields(&document)?;
    }
    info!("lockdown installed: {policy:?}");
    Ok(true)
}

fn chord(event: &KeyboardEvent) -> KeyChord {
    KeyChord {
        key: event.key(),
        ctrl: event.ctrl_key(),
        shift: event.shift_key(),
        alt: event.alt_key(),
        meta: event.meta_key(),
    }
}

fn listen<F>(document: &Document, kind: &str, handler: F) -> Result<(), JsValue>
where
    F: Fn(Event) + 'static,
{
    let options = AddEventListenerOptions::new();
    options.set_capture(true);
    options.set_passive(false);
    let closure = Closure::wrap(Box::new(handler) as Box<dyn Fn(Event)>);
    document.add_event_listener_with_callback_and_add_event_listener_options(
        kind,
        closure.as_ref().unchecked_ref(),
        &options,
    )?;
    closure.forget();
    Ok(())
}

fn inject_head(document: &Document) -> Result<(), JsValue> {
    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("document has no <head>"))?;

    let style = document.create_element("style")?;
    style.set_text_content(Some(LOCKDOWN_CSS));
    head.append_child(&style)?;

    let viewport = document.create_element("meta")?;
    viewport.set_attribute("name", "viewport")?;
    viewport.set_attribute("content", VIEWPORT_CONTENT)?;
    head.append_child(&viewport)?;
    Ok(())
}

fn harden_password_fields(document: &Document) -> Result<(), JsValue> {
    if document.ready_state() == "loading" {
        let target = document.clone();
        let on_ready = Closure::once(move || {
            if let Err(err) = apply_password_attributes(&target) {
                log::warn!("password hardening failed: {err:?}");
            }
        });
        document.add_event_listener_with_callback(
            "DOMContentLoaded",
            on_ready.as_ref().unchecked_ref(),
        )?;
        on_ready.forget();
    } else {
        apply_password_attributes(document)?;
    }

    let target = document.clone();
    let on_mutation = Closure::wrap(Box::new(move |records: Array, _: MutationObserver| {
        let added = records.iter().any(|record| {
            record
                .dyn_into::<MutationRecord>()
                .is_ok_and(|record| record.type_() == "childList" && record.added_nodes().length() > 0)
        });
        if added {
            if let Err(err) = apply_password_attributes(&target) {
                log::warn!("password hardening failed: {err:?}");
            }
        }
    }) as Box<dyn FnMut(Array, MutationObserver)>);
    let observer = MutationObserver::new(on_mutation.as_ref().unchecked_ref())?;
    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    if let Some(root) = document.document_element() {
        observer.observe_with_options(&root, &init)?;
    }
    on_mutation.forget();
    Ok(())
}

fn apply_password_attributes(document: &Document) -> Result<(), JsValue> {
    let inputs = document.query_selector_all("input[type=\"password\"]")?;
    for index in 0..inputs.length() {
        let Some(input) = inputs.item(index).and_then(|node| node.dyn_into::<Element>().ok())
        else {
            continue;
        };
        input.set_attribute("autocomplete", PASSWORD_AUTOCOMPLETE)?;
        input.set_attribute("readonly", "readonly")?;
        let grace = u32::try_from(PASSWORD_READONLY_GRACE.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(grace, move || {
            let _ = input.remove_attribute("readonly");
        })
        .forget();
    }

    let forms = document.query_selector_all("form")?;
    for index in 0..forms.length() {
        if let Some(form) = forms.item(index).and_then(|node| node.dyn_into::<Element>().ok()) {
            form.set_attribute("autocomplete", "off")?;
        }
    }
    Ok(())
}
