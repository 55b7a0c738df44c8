//! DOM listener plumbing for the globe surface.

use runtime::{EventKind, InputEvent, ListenerTarget};
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Event, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

pub type DomCallback = Closure<dyn FnMut(Event)>;

/// Canvas plus window, the two places the viewer listens on.
pub struct DomTarget {
    window: Window,
    canvas: HtmlCanvasElement,
}

impl DomTarget {
    pub fn new(window: Window, canvas: HtmlCanvasElement) -> Self {
        Self { window, canvas }
    }

    fn target(&self, kind: EventKind) -> &web_sys::EventTarget {
        match kind.target() {
            ListenerTarget::Surface => self.canvas.as_ref(),
            ListenerTarget::Window => self.window.as_ref(),
        }
    }
}

/// Pointer position relative to the canvas' top-left corner.
fn surface_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    (
        f64::from(ev.client_x()) - rect.left(),
        f64::from(ev.client_y()) - rect.top(),
    )
}

/// Inner size of the browser window in CSS pixels.
pub fn viewport_size(window: &Window) -> (f64, f64) {
    let width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    (width, height)
}

fn to_input(
    kind: EventKind,
    window: &Window,
    canvas: &HtmlCanvasElement,
    ev: &Event,
) -> Option<InputEvent> {
    match kind {
        EventKind::PointerDown => {
            let (x, y) = surface_point(canvas, ev.dyn_ref::<MouseEvent>()?);
            Some(InputEvent::PointerDown { x, y })
        }
        EventKind::PointerMove => {
            let (x, y) = surface_point(canvas, ev.dyn_ref::<MouseEvent>()?);
            Some(InputEvent::PointerMove { x, y })
        }
        EventKind::PointerUp => Some(InputEvent::PointerUp),
        EventKind::Wheel => {
            let wheel = ev.dyn_ref::<WheelEvent>()?;
            wheel.prevent_default();
            Some(InputEvent::Wheel {
                delta_y: wheel.delta_y(),
            })
        }
        EventKind::Resize => {
            let (width, height) = viewport_size(window);
            Some(InputEvent::Resize { width, height })
        }
    }
}

impl runtime::EventTarget for DomTarget {
    type Handle = DomCallback;
    type Error = JsValue;

    fn attach(&mut self, kind: EventKind) -> Result<DomCallback, JsValue> {
        let window = self.window.clone();
        let canvas = self.canvas.clone();
        let callback = Closure::wrap(Box::new(move |ev: Event| {
            if let Some(input) = to_input(kind, &window, &canvas, &ev) {
                crate::dispatch(input);
            }
        }) as Box<dyn FnMut(Event)>);

        let target = self.target(kind);
        if kind == EventKind::Wheel {
            // Non-passive so the page does not scroll while zooming.
            let opts = AddEventListenerOptions::new();
            opts.set_passive(false);
            target.add_event_listener_with_callback_and_add_event_listener_options(
                kind.dom_name(),
                callback.as_ref().unchecked_ref(),
                &opts,
            )?;
        } else {
            target.add_event_listener_with_callback(
                kind.dom_name(),
                callback.as_ref().unchecked_ref(),
            )?;
        }
        Ok(callback)
    }

    fn detach(&mut self, kind: EventKind, handle: DomCallback) -> Result<(), JsValue> {
        self.target(kind)
            .remove_event_listener_with_callback(kind.dom_name(), handle.as_ref().unchecked_ref())
    }
}
