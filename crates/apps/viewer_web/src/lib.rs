use console_error_panic_hook::set_once;
use gloo_net::http::Request;
use std::cell::{Cell, RefCell};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use formats::FeatureCollection;
use foundation::CanvasSize;
use render::{GlobeStyle, ViewerConfig, draw_globe};
use runtime::{EventQueue, GLOBE_EVENTS, InputEvent, ListenerSet};
use scene::{Globe, ShapeSet};

mod canvas;
mod dom;

use dom::{DomTarget, viewport_size};

struct Viewer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    globe: Globe,
    style: GlobeStyle,
    listeners: ListenerSet<DomTarget>,
    queue: EventQueue,
    // An animation frame is already scheduled to flush `queue`.
    frame_pending: bool,
}

thread_local! {
    static STATE: RefCell<Option<Viewer>> = const { RefCell::new(None) };
    // Bumped on every mount so a fetch from an earlier mount is ignored.
    static GENERATION: Cell<u64> = const { Cell::new(0) };
}

fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Canvas backing-store size in whole pixels.
fn canvas_pixels(size: CanvasSize) -> (u32, u32) {
    (size.width.floor() as u32, size.height.floor() as u32)
}

fn apply_canvas_size(viewer: &Viewer) {
    let (w, h) = canvas_pixels(viewer.globe.canvas());
    if viewer.canvas.width() != w {
        viewer.canvas.set_width(w);
    }
    if viewer.canvas.height() != h {
        viewer.canvas.set_height(h);
    }
}

fn apply_cursor(viewer: &Viewer) {
    let _ = viewer
        .canvas
        .style()
        .set_property("cursor", viewer.globe.cursor().css());
}

fn redraw(viewer: &Viewer) {
    let frame = draw_globe(&viewer.globe, &viewer.style);
    if let Err(err) = canvas::replay(&viewer.ctx, &frame) {
        log(&format!("globe draw error: {:?}", err));
    }
}

/// Queue one input event for the mounted viewer. Events are applied on the
/// next animation frame, so a burst of pointer moves costs one redraw.
pub(crate) fn dispatch(event: InputEvent) {
    let schedule = STATE.with(|state| {
        let mut state = state.borrow_mut();
        let Some(viewer) = state.as_mut() else {
            return false;
        };
        viewer.queue.push(event);
        !std::mem::replace(&mut viewer.frame_pending, true)
    });
    if schedule {
        if let Err(err) = request_flush() {
            log(&format!("animation frame unavailable: {:?}", err));
            flush();
        }
    }
}

fn request_flush() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let callback = Closure::once_into_js(flush);
    window.request_animation_frame(callback.unchecked_ref())?;
    Ok(())
}

/// Apply every queued event, then redraw at most once.
fn flush() {
    STATE.with(|state| {
        let mut state = state.borrow_mut();
        let Some(viewer) = state.as_mut() else {
            return;
        };
        viewer.frame_pending = false;
        let needs = viewer.globe.drain(&mut viewer.queue);
        apply_canvas_size(viewer);
        apply_cursor(viewer);
        if needs.is_needed() {
            redraw(viewer);
        }
    });
}

async fn fetch_boundaries(url: &str, object: &str) -> Result<FeatureCollection, JsValue> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!("HTTP {}", resp.status())));
    }
    let text = resp
        .text()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    formats::load_boundaries(&text, object).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Mount the globe on the canvas with the given id, using default settings.
#[wasm_bindgen]
pub fn mount(canvas_id: &str) -> Result<(), JsValue> {
    mount_inner(canvas_id, ViewerConfig::default())
}

/// Mount with a JSON `ViewerConfig`; omitted fields take their defaults.
#[wasm_bindgen]
pub fn mount_with_config(canvas_id: &str, config_json: &str) -> Result<(), JsValue> {
    let config =
        ViewerConfig::from_json_str(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    mount_inner(canvas_id, config)
}

fn mount_inner(canvas_id: &str, config: ViewerConfig) -> Result<(), JsValue> {
    unmount();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("missing canvas #{canvas_id}")))?
        .dyn_into::<HtmlCanvasElement>()?;
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()?;

    let (vw, vh) = viewport_size(&window);
    let globe = Globe::for_viewport(config.controls, config.sizing, vw, vh);

    let mut listeners = ListenerSet::new(DomTarget::new(window, canvas.clone()));
    listeners.attach_all(&GLOBE_EVENTS)?;

    let viewer = Viewer {
        canvas,
        ctx,
        globe,
        style: config.style,
        listeners,
        queue: EventQueue::new(),
        frame_pending: false,
    };
    apply_canvas_size(&viewer);
    apply_cursor(&viewer);
    redraw(&viewer);
    STATE.with(|state| *state.borrow_mut() = Some(viewer));

    let generation = GENERATION.with(|g| {
        g.set(g.get() + 1);
        g.get()
    });
    let url = config.data.url;
    let object = config.data.object;
    spawn_local(async move {
        match fetch_boundaries(&url, &object).await {
            Ok(collection) => {
                let shapes = ShapeSet::from_features(&collection);
                STATE.with(|state| {
                    if GENERATION.with(Cell::get) != generation {
                        return;
                    }
                    if let Some(viewer) = state.borrow_mut().as_mut() {
                        if viewer.globe.set_shapes(shapes).is_needed() {
                            redraw(viewer);
                        }
                    }
                });
            }
            Err(err) => log(&format!("boundary load error ({url}): {:?}", err)),
        }
    });
    Ok(())
}

/// Detach every listener and drop the viewer state.
#[wasm_bindgen]
pub fn unmount() {
    let viewer = STATE.with(|state| state.borrow_mut().take());
    if let Some(mut viewer) = viewer {
        viewer.listeners.detach_all();
        let _ = viewer.canvas.style().remove_property("cursor");
    }
    GENERATION.with(|g| g.set(g.get() + 1));
}

/// Name of the country under the pointer, if any.
#[wasm_bindgen]
pub fn hovered_country_name() -> Option<String> {
    STATE.with(|state| {
        state
            .borrow()
            .as_ref()
            .and_then(|v| v.globe.hovered_shape())
            .and_then(|shape| shape.name())
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::canvas_pixels;
    use foundation::CanvasSize;

    #[test]
    fn canvas_pixels_truncate() {
        assert_eq!(canvas_pixels(CanvasSize::new(744.6, 744.6)), (744, 744));
        assert_eq!(canvas_pixels(CanvasSize::new(-3.0, 10.0)), (0, 10));
    }
}
