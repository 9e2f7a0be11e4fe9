use wasm_bindgen::JsCast;
use web_sys as web;

use crate::constants::{INTERACTIVE_SELECTOR, REDUCED_MOTION_QUERY};
use crate::input;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn element_by_id<T: JsCast>(document: &web::Document, id: &str) -> anyhow::Result<T> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("missing #{id}"))?
        .dyn_into::<T>()
        .map_err(|e| anyhow::anyhow!("#{id} has the wrong element type: {:?}", e))
}

/// CSS size of the canvas and the device pixel ratio.
pub fn canvas_css_size(canvas: &web::HtmlCanvasElement) -> (f64, f64, f64) {
    let dpr = web::window().map_or(1.0, |w| w.device_pixel_ratio());
    let rect = canvas.get_bounding_client_rect();
    (rect.width(), rect.height(), dpr)
}

/// Matches the backing store to CSS size * devicePixelRatio. Returns the
/// logical size and the ratio so callers can reapply their scale transform.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> (f32, f32, f64) {
    let (css_w, css_h, dpr) = canvas_css_size(canvas);
    let (w_px, h_px) = input::backing_size(css_w, css_h, dpr);
    if canvas.width() != w_px {
        canvas.set_width(w_px);
    }
    if canvas.height() != h_px {
        canvas.set_height(h_px);
    }
    (css_w as f32, css_h as f32, dpr)
}

/// Viewport-sized canvas: logical size is the window's inner size.
pub fn sync_fullscreen_canvas(canvas: &web::HtmlCanvasElement) -> (f32, f32, f64) {
    let Some(window) = web::window() else {
        return (0.0, 0.0, 1.0);
    };
    let css_w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let css_h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let dpr = window.device_pixel_ratio();
    let (w_px, h_px) = input::backing_size(css_w, css_h, dpr);
    canvas.set_width(w_px);
    canvas.set_height(h_px);
    _ = canvas
        .style()
        .set_property("width", &format!("{css_w}px"));
    _ = canvas
        .style()
        .set_property("height", &format!("{css_h}px"));
    (css_w as f32, css_h as f32, dpr)
}

pub fn reduced_motion_query() -> Option<web::MediaQueryList> {
    web::window()?.match_media(REDUCED_MOTION_QUERY).ok().flatten()
}

/// True when the event target sits inside a link, button or form control.
pub fn is_interactive_target(target: Option<web::EventTarget>) -> bool {
    target
        .and_then(|t| t.dyn_into::<web::Element>().ok())
        .and_then(|el| el.closest(INTERACTIVE_SELECTOR).ok().flatten())
        .is_some()
}

pub fn set_style(el: &web::HtmlElement, name: &str, value: &str) {
    if let Err(e) = el.style().set_property(name, value) {
        log::debug!("style {name} not applied: {:?}", e);
    }
}
