//! WASM bindings: StretchText over the live browser DOM.
//!
//! ```js
//! import init, { install } from "./stretchtext.js";
//! await init();
//! install();
//! ```

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, DocumentReadyState, Element, EventTarget, HtmlElement};

use crate::config::{Config, ListenerMode};
use crate::controller::StretchText;
use crate::dom::attribute_selector_source;
use crate::event::{EventKind, InputEvent};
use crate::host::{Display, HostDocument};
use crate::scheduler::{FrameScheduler, PendingToggle};

type Controller = Rc<RefCell<StretchText<WebDocument, AnimationFrame>>>;

/// Initialize panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // A second init (e.g. module re-evaluated) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_writer(ConsoleWriter::default)
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .try_init();
}

/// Set up StretchText with the default markup contract.
#[wasm_bindgen]
pub fn install() -> Result<(), JsValue> {
    install_config(Config::default())
}

/// Set up StretchText with a JSON configuration, e.g.
/// `installWithConfig(JSON.stringify({ titleWhenOpen: "Hide", listeners: "delegated" }))`.
#[wasm_bindgen(js_name = installWithConfig)]
pub fn install_with_config(config_json: &str) -> Result<(), JsValue> {
    let config = Config::from_json(config_json).map_err(to_js)?;
    install_config(config)
}

fn install_config(config: Config) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let scheduler = AnimationFrame::new(window.clone(), config.frame_interval_ms);
    let controller: Controller = Rc::new(RefCell::new(StretchText::with_config(
        WebDocument::new(document.clone()),
        scheduler,
        config,
    )));

    if document.ready_state() == DocumentReadyState::Complete {
        return ready(&controller);
    }

    let on_load = {
        let controller = controller.clone();
        Closure::<dyn FnMut()>::new(move || {
            if let Err(err) = ready(&controller) {
                web_sys::console::error_1(&err);
            }
        })
    };
    window.add_event_listener_with_callback("load", on_load.as_ref().unchecked_ref())?;
    on_load.forget();
    Ok(())
}

/// Document-ready: discover summaries and wire listeners.
fn ready(controller: &Controller) -> Result<(), JsValue> {
    if controller.borrow().is_initialized() {
        return Ok(());
    }
    controller.borrow_mut().setup();
    let mode = controller.borrow().config().listeners;

    match mode {
        ListenerMode::PerElement => {
            // Discovery lists an element with both markers twice; the registry
            // holds it once, and each closure is a distinct listener.
            let registered: Vec<(Element, Vec<EventKind>)> = {
                let st = controller.borrow();
                st.listeners()
                    .iter()
                    .map(|(el, kinds)| (el.clone(), kinds.to_vec()))
                    .collect()
            };
            for (element, kinds) in &registered {
                for kind in kinds {
                    listen(element, kind, controller, false)?;
                }
            }
        }
        ListenerMode::Delegated => {
            let document = controller.borrow().document().document.clone();
            for kind in EventKind::LISTENED {
                listen(&document, &kind, controller, true)?;
            }
        }
    }
    Ok(())
}

fn listen(
    target: &EventTarget,
    kind: &EventKind,
    controller: &Controller,
    delegated: bool,
) -> Result<(), JsValue> {
    let controller = controller.clone();
    let handler = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        // Per-element listeners answer for the element they sit on; the
        // delegated listener starts from wherever the event landed.
        let origin = if delegated {
            event.target()
        } else {
            event.current_target()
        };
        let Some(element) = origin.and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };

        let mut input = InputEvent::new(EventKind::from_type(&event.type_()), element);
        controller.borrow_mut().handle_event(&mut input);
        if input.default_prevented() {
            event.prevent_default();
        }
    });

    // touchstart on the document defaults to passive, which ignores preventDefault.
    let options = AddEventListenerOptions::new();
    options.set_passive(false);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        kind.as_type(),
        handler.as_ref().unchecked_ref(),
        &options,
    )?;
    handler.forget();
    Ok(())
}

fn to_js(err: crate::Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// [`HostDocument`] over `web_sys::Document`.
#[derive(Debug, Clone)]
pub struct WebDocument {
    document: web_sys::Document,
}

impl WebDocument {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }
}

impl HostDocument for WebDocument {
    type Element = Element;

    fn elements_with_attribute(&self, name: &str, value: &str) -> Vec<Element> {
        let Ok(selector) = attribute_selector_source(name, value) else {
            return Vec::new();
        };
        let Ok(nodes) = self.document.query_selector_all(&selector) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn elements_with_class(&self, class: &str) -> Vec<Element> {
        let collection = self.document.get_elements_by_class_name(class);
        (0..collection.length())
            .filter_map(|i| collection.item(i))
            .collect()
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn next_element_sibling(&self, element: &Element) -> Option<Element> {
        element.next_element_sibling()
    }

    fn parent_element(&self, element: &Element) -> Option<Element> {
        element.parent_element()
    }

    fn local_name(&self, element: &Element) -> String {
        element.local_name().to_ascii_lowercase()
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn has_attribute(&self, element: &Element, name: &str) -> bool {
        element.has_attribute(name)
    }

    fn set_attribute(&mut self, element: &Element, name: &str, value: &str) {
        if let Err(err) = element.set_attribute(name, value) {
            tracing::warn!(target: "stretchtext", "setAttribute({name}) failed: {err:?}");
        }
    }

    fn has_class(&self, element: &Element, class: &str) -> bool {
        element.class_list().contains(class)
    }

    fn toggle_class(&mut self, element: &Element, class: &str) -> bool {
        match element.class_list().toggle(class) {
            Ok(present) => present,
            Err(err) => {
                tracing::warn!(target: "stretchtext", "classList.toggle({class}) failed: {err:?}");
                element.class_list().contains(class)
            }
        }
    }

    fn display(&self, element: &Element) -> Option<Display> {
        let element = element.dyn_ref::<HtmlElement>()?;
        let value = element.style().get_property_value("display").ok()?;
        Display::from_css(&value)
    }

    fn set_display(&mut self, element: &Element, display: Display) {
        let Some(element) = element.dyn_ref::<HtmlElement>() else {
            return;
        };
        if let Err(err) = element.style().set_property("display", display.as_css()) {
            tracing::warn!(target: "stretchtext", "style.display failed: {err:?}");
        }
    }
}

/// Phase 2 on the next animation frame, or after one frame interval when
/// `requestAnimationFrame` is unavailable.
pub struct AnimationFrame {
    window: web_sys::Window,
    fallback_ms: f64,
}

impl AnimationFrame {
    pub fn new(window: web_sys::Window, fallback_ms: f64) -> Self {
        Self {
            window,
            fallback_ms,
        }
    }
}

impl FrameScheduler<WebDocument> for AnimationFrame {
    fn schedule(
        &mut self,
        doc: &mut WebDocument,
        config: &Config,
        toggle: PendingToggle<Element>,
    ) {
        let mut doc = doc.clone();
        let config = config.clone();
        let callback = Closure::once_into_js(move || {
            toggle.complete(&mut doc, &config);
        });
        let callback: &js_sys::Function = callback.unchecked_ref();

        if self.window.request_animation_frame(callback).is_ok() {
            return;
        }
        if let Err(err) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback,
                self.fallback_ms.round() as i32,
            )
        {
            tracing::warn!(target: "stretchtext", "could not schedule frame: {err:?}");
        }
    }
}

/// `io::Write` sink that sends each formatted tracing event to `console.warn`.
#[derive(Default)]
struct ConsoleWriter {
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.buf);
        web_sys::console::warn_1(&JsValue::from_str(line.trim_end()));
    }
}
