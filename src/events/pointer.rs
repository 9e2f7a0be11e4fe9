use glam::Vec2;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use web_sys as web;

use crate::input;
use crate::keyboard3d::KeyboardView;
use crate::listener::EventListener;

type ViewRef = Weak<RefCell<KeyboardView>>;

#[inline]
fn canvas_point(ev: &web::MouseEvent) -> Vec2 {
    Vec2::new(ev.offset_x() as f32, ev.offset_y() as f32)
}

/// Pointer handling for the keyboard canvas: hover picking, click presses,
/// drag-to-orbit and wheel zoom.
pub(crate) fn wire_input_handlers(
    canvas: &web::HtmlCanvasElement,
    view: &Rc<RefCell<KeyboardView>>,
) -> anyhow::Result<Vec<EventListener>> {
    let weak = Rc::downgrade(view);
    Ok(vec![
        wire_pointermove(canvas, weak.clone())?,
        wire_pointerdown(canvas, weak.clone())?,
        wire_pointerup(canvas, weak.clone())?,
        wire_pointerleave(canvas, weak.clone())?,
        wire_wheel(canvas, weak)?,
    ])
}

fn wire_pointermove(canvas: &web::HtmlCanvasElement, weak: ViewRef) -> anyhow::Result<EventListener> {
    EventListener::typed::<web::PointerEvent>(canvas, "pointermove", move |ev| {
        let Some(view) = weak.upgrade() else {
            return;
        };
        let mut v = view.borrow_mut();
        let at = canvas_point(&ev);
        let delta = v.drag.drag_to(at);
        if v.drag.is_rotating() {
            let (d_azimuth, d_polar) = input::orbit_delta(delta);
            v.orbit.rotate(d_azimuth, d_polar);
        } else if let Some((origin, dir)) = v.ray_at(at.x, at.y) {
            v.keyboard.hover_ray(origin, dir);
        }
        v.refresh_cursor();
    })
}

fn wire_pointerdown(canvas: &web::HtmlCanvasElement, weak: ViewRef) -> anyhow::Result<EventListener> {
    let target = canvas.clone();
    EventListener::typed::<web::PointerEvent>(canvas, "pointerdown", move |ev| {
        let Some(view) = weak.upgrade() else {
            return;
        };
        view.borrow_mut().drag.begin(canvas_point(&ev));
        _ = target.set_pointer_capture(ev.pointer_id());
    })
}

fn wire_pointerup(canvas: &web::HtmlCanvasElement, weak: ViewRef) -> anyhow::Result<EventListener> {
    let target = canvas.clone();
    EventListener::typed::<web::PointerEvent>(canvas, "pointerup", move |ev| {
        let Some(view) = weak.upgrade() else {
            return;
        };
        _ = target.release_pointer_capture(ev.pointer_id());
        let mut v = view.borrow_mut();
        if v.drag.end() {
            let at = canvas_point(&ev);
            if let Some((origin, dir)) = v.ray_at(at.x, at.y) {
                if let Some(i) = v.keyboard.click_ray(origin, dir) {
                    log::debug!("[click] keycap {}", i);
                }
            }
        }
        v.refresh_cursor();
    })
}

fn wire_pointerleave(canvas: &web::HtmlCanvasElement, weak: ViewRef) -> anyhow::Result<EventListener> {
    EventListener::new(canvas, "pointerleave", move |_| {
        if let Some(view) = weak.upgrade() {
            let mut v = view.borrow_mut();
            if !v.drag.active {
                v.keyboard.pointer_left();
            }
            v.refresh_cursor();
        }
    })
}

fn wire_wheel(canvas: &web::HtmlCanvasElement, weak: ViewRef) -> anyhow::Result<EventListener> {
    EventListener::typed::<web::WheelEvent>(canvas, "wheel", move |ev| {
        if let Some(view) = weak.upgrade() {
            view.borrow_mut()
                .orbit
                .zoom(input::wheel_zoom_factor(ev.delta_y()));
            ev.prevent_default();
        }
    })
}
