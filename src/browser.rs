//! Browser backend: web-sys [`Page`], event wiring, and JS exports.
//!
//! SYSTEM CONTEXT
//! ==============
//! The controller lives in a thread-local slot. Document-level listeners
//! forward events into it and apply the returned [`Outcome`] once the slot is
//! released, so a programmatic click can re-enter the listeners safely.
//!
//! Exports keep the names inline page markup already calls: `showMessage`,
//! `confirmDelete`, `setLoading`. Besides the module exports, `start` puts
//! each of them on `window` so `onclick="return confirmDelete()"` resolves.

use std::cell::RefCell;
use std::collections::HashMap;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::WasmClosure;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlButtonElement, HtmlElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement, KeyboardEvent, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};

use crate::config::{CONFIG_ATTR, PageConfig};
use crate::controller::PageController;
use crate::notice::Severity;
use crate::page::{FileInfo, KeyPress, Modifiers, Outcome, Page, Selector, TimerId};

thread_local! {
    static CONTROLLER: RefCell<Option<PageController<BrowserPage>>> = const { RefCell::new(None) };
}

/// Log a failed DOM call and carry on.
fn check<T>(what: &str, result: Result<T, JsValue>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("{what} failed: {err:?}");
            None
        }
    }
}

fn element_list(list: &web_sys::NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_ref::<Element>().cloned())
        .collect()
}

/// The live document behind a [`PageController`].
pub struct BrowserPage {
    window: Window,
    document: Document,
    timeouts: HashMap<TimerId, Timeout>,
}

impl BrowserPage {
    #[must_use]
    pub fn new(window: Window, document: Document) -> Self {
        Self { window, document, timeouts: HashMap::new() }
    }

    /// Drop the handle of a timer that has fired.
    fn release_timer(&mut self, id: TimerId) {
        drop(self.timeouts.remove(&id));
    }
}

impl Page for BrowserPage {
    type Node = Element;

    fn query(&self, selector: &Selector<'_>) -> Option<Element> {
        if let Selector::Id(id) = selector {
            return self.document.get_element_by_id(id);
        }
        check("querySelector", self.document.query_selector(&selector.css())).flatten()
    }

    fn query_all(&self, selector: &Selector<'_>) -> Vec<Element> {
        check("querySelectorAll", self.document.query_selector_all(&selector.css()))
            .map(|list| element_list(&list))
            .unwrap_or_default()
    }

    fn query_within(&self, root: &Element, selector: &Selector<'_>) -> Vec<Element> {
        check("querySelectorAll", root.query_selector_all(&selector.css()))
            .map(|list| element_list(&list))
            .unwrap_or_default()
    }

    fn closest(&self, node: &Element, selector: &Selector<'_>) -> Option<Element> {
        check("closest", node.closest(&selector.css())).flatten()
    }

    fn head(&self) -> Option<Element> {
        self.document.head().map(Element::from)
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn path_name(&self) -> String {
        check("location.pathname", self.window.location().pathname()).unwrap_or_default()
    }

    fn create_element(&mut self, tag: &str) -> Option<Element> {
        check("createElement", self.document.create_element(tag))
    }

    fn append_child(&mut self, parent: &Element, child: &Element) {
        check("appendChild", parent.append_child(child));
    }

    fn append_text(&mut self, parent: &Element, text: &str) {
        let node = self.document.create_text_node(text);
        check("appendChild", parent.append_child(&node));
    }

    fn insert_after(&mut self, anchor: &Element, node: &Element) {
        check("insertAdjacentElement", anchor.insert_adjacent_element("afterend", node));
    }

    fn remove(&mut self, node: &Element) {
        node.remove();
    }

    fn is_attached(&self, node: &Element) -> bool {
        node.is_connected()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        check("setAttribute", node.set_attribute(name, value));
    }

    fn remove_attribute(&mut self, node: &Element, name: &str) {
        check("removeAttribute", node.remove_attribute(name));
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&mut self, node: &Element, class: &str) {
        check("classList.add", node.class_list().add_1(class));
    }

    fn remove_class(&mut self, node: &Element, class: &str) {
        check("classList.remove", node.class_list().remove_1(class));
    }

    fn style(&self, node: &Element, property: &str) -> String {
        node.dyn_ref::<HtmlElement>()
            .and_then(|el| check("style.getPropertyValue", el.style().get_property_value(property)))
            .unwrap_or_default()
    }

    fn set_style(&mut self, node: &Element, property: &str, value: &str) {
        if let Some(el) = node.dyn_ref::<HtmlElement>() {
            check("style.setProperty", el.style().set_property(property, value));
        }
    }

    fn inner_html(&self, node: &Element) -> String {
        node.inner_html()
    }

    fn set_inner_html(&mut self, node: &Element, html: &str) {
        node.set_inner_html(html);
    }

    fn value(&self, node: &Element) -> String {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(area) = node.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else {
            String::new()
        }
    }

    fn set_value(&mut self, node: &Element, value: &str) {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(area) = node.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        } else if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        }
    }

    fn set_disabled(&mut self, node: &Element, disabled: bool) {
        if let Some(button) = node.dyn_ref::<HtmlButtonElement>() {
            button.set_disabled(disabled);
        } else if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.set_disabled(disabled);
        } else if disabled {
            check("setAttribute", node.set_attribute("disabled", ""));
        } else {
            check("removeAttribute", node.remove_attribute("disabled"));
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn selected_file(&self, node: &Element) -> Option<FileInfo> {
        let file = node.dyn_ref::<HtmlInputElement>()?.files()?.get(0)?;
        Some(FileInfo { name: file.name(), size: file.size().max(0.0) as u64, mime: file.type_() })
    }

    fn scroll_into_view(&mut self, node: &Element) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        node.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn confirm(&mut self, message: &str) -> bool {
        check("confirm", self.window.confirm_with_message(message)).unwrap_or(false)
    }

    fn set_timeout(&mut self, id: TimerId, delay_ms: u32) {
        let timeout = Timeout::new(delay_ms, move || fire_timer(id));
        self.timeouts.insert(id, timeout);
    }

    fn clear_timeout(&mut self, id: TimerId) {
        if let Some(timeout) = self.timeouts.remove(&id) {
            drop(timeout.cancel());
        }
    }
}

// =============================================================
// Controller slot
// =============================================================

/// Run `f` against the installed controller.
///
/// Returns `None` before `start` ran, or when an event arrives while another
/// handler still holds the controller.
fn with_controller<R>(f: impl FnOnce(&mut PageController<BrowserPage>) -> R) -> Option<R> {
    CONTROLLER.with(|slot| {
        let Ok(mut guard) = slot.try_borrow_mut() else {
            log::warn!("page controller busy; event dropped");
            return None;
        };
        guard.as_mut().map(f)
    })
}

fn fire_timer(id: TimerId) {
    with_controller(|c| {
        c.page_mut().release_timer(id);
        c.on_timer(id);
    });
}

fn target_element(event: &Event) -> Option<Element> {
    event.target().and_then(|t| t.dyn_ref::<Element>().cloned())
}

fn key_press(event: &KeyboardEvent) -> KeyPress {
    KeyPress::new(
        event.key(),
        Modifiers { shift: event.shift_key(), ctrl: event.ctrl_key(), alt: event.alt_key(), meta: event.meta_key() },
    )
}

/// Apply a handler's outcome after the controller has been released.
fn apply(event: &Event, outcome: Option<Outcome<Element>>) {
    let Some(outcome) = outcome else {
        return;
    };
    if outcome.prevent_default {
        event.prevent_default();
    }
    if let Some(el) = outcome.activate.as_ref().and_then(|n| n.dyn_ref::<HtmlElement>()) {
        el.click();
    }
}

/// Attach `handler` for the lifetime of the page.
fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    check(event, target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()));
    closure.forget();
}

/// Publish `closure` as `window[name]` for the lifetime of the page.
fn expose<T: ?Sized + WasmClosure>(window: &Window, name: &str, closure: Closure<T>) {
    check(name, js_sys::Reflect::set(window, &JsValue::from_str(name), closure.as_ref()));
    closure.forget();
}

fn expose_globals(window: &Window) {
    expose(
        window,
        "showMessage",
        Closure::<dyn Fn(String, Option<String>)>::new(|message: String, severity: Option<String>| {
            show_message(&message, severity);
        }),
    );
    expose(
        window,
        "confirmDelete",
        Closure::<dyn Fn(Option<String>) -> bool>::new(|message: Option<String>| confirm_delete(message)),
    );
    expose(
        window,
        "setLoading",
        Closure::<dyn Fn(Element, bool)>::new(|element: Element, is_loading: bool| {
            set_loading(&element, is_loading);
        }),
    );
}

fn install_listeners(window: &Window, document: &Document) {
    listen(document, "submit", |event| {
        let Some(form) = target_element(&event) else {
            return;
        };
        let outcome = with_controller(|c| c.on_submit(&form));
        apply(&event, outcome);
    });

    listen(document, "input", |event| {
        if let Some(target) = target_element(&event) {
            with_controller(|c| c.on_input(&target));
        }
    });

    listen(document, "change", |event| {
        if let Some(target) = target_element(&event) {
            with_controller(|c| c.on_change(&target));
        }
    });

    listen(document, "click", |event| {
        let Some(target) = target_element(&event) else {
            return;
        };
        let outcome = with_controller(|c| c.on_click(&target));
        apply(&event, outcome);
    });

    listen(window, "keydown", |event| {
        let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        let press = key_press(key);
        let outcome = with_controller(|c| c.on_keydown(&press));
        apply(&event, outcome);
    });
}

// =============================================================
// Exports
// =============================================================

/// Module entry point: build the controller and wire the page.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
    }

    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        log::warn!("no document; page behavior disabled");
        return;
    };

    let raw = document.document_element().and_then(|html| html.get_attribute(CONFIG_ATTR));
    let config = PageConfig::resolve(raw.as_deref());
    let page = BrowserPage::new(window.clone(), document.clone());
    CONTROLLER.with(|slot| *slot.borrow_mut() = Some(PageController::new(page, config)));

    install_listeners(&window, &document);
    expose_globals(&window);

    if document.ready_state() == "loading" {
        listen(&document, "DOMContentLoaded", |_| {
            with_controller(PageController::on_ready);
        });
    } else {
        with_controller(PageController::on_ready);
    }
}

/// Show a self-dismissing notification. Unknown severities show as info.
#[wasm_bindgen(js_name = showMessage)]
pub fn show_message(message: &str, severity: Option<String>) {
    let severity = severity.as_deref().map_or(Severity::Info, Severity::from_label);
    with_controller(|c| c.show_message(message, severity));
}

/// Ask the user to confirm a deletion; `message` replaces the default prompt.
#[wasm_bindgen(js_name = confirmDelete)]
pub fn confirm_delete(message: Option<String>) -> bool {
    with_controller(|c| c.confirm_delete(message.as_deref())).unwrap_or(false)
}

/// Toggle the busy state of `element`.
#[wasm_bindgen(js_name = setLoading)]
pub fn set_loading(element: &Element, is_loading: bool) {
    if let Some(Err(err)) = with_controller(|c| c.set_loading(element, is_loading)) {
        log::warn!("setLoading: {err}");
    }
}
