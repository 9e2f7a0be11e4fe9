//! Browser host for the custom cursor: moves `#cursor-dot` and
//! `#cursor-follower` to the spring positions every frame.

use folio_core::{CursorFrame, CursorState};
use glam::Vec2;
use instant::Instant;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use web_sys as web;

use crate::dom::{self, set_style};
use crate::frame::FrameLoop;
use crate::listener::EventListener;

struct View {
    state: CursorState,
    dot: web::HtmlElement,
    follower: web::HtmlElement,
    frames: FrameLoop,
    last: Instant,
}

impl View {
    fn apply(&self, frame: &CursorFrame) {
        let opacity = if frame.visible { "1" } else { "0" };
        set_style(
            &self.dot,
            "transform",
            &format!(
                "translate3d({:.2}px, {:.2}px, 0) translate(-50%, -50%) scale({:.3})",
                frame.dot.x, frame.dot.y, frame.dot_scale
            ),
        );
        set_style(&self.dot, "opacity", opacity);

        let size = format!("{:.2}px", frame.follower_size);
        set_style(
            &self.follower,
            "transform",
            &format!(
                "translate3d({:.2}px, {:.2}px, 0) translate(-50%, -50%)",
                frame.follower.x, frame.follower.y
            ),
        );
        set_style(&self.follower, "width", &size);
        set_style(&self.follower, "height", &size);
        set_style(&self.follower, "border-color", &frame.ring_color.to_css());
        set_style(&self.follower, "opacity", opacity);
    }
}

pub struct CursorMount {
    view: Rc<RefCell<View>>,
    _listeners: Vec<EventListener>,
}

impl CursorMount {
    pub fn mount(dot: web::HtmlElement, follower: web::HtmlElement) -> anyhow::Result<Self> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| anyhow::anyhow!("no document"))?;

        let view = Rc::new(RefCell::new(View {
            state: CursorState::default(),
            dot,
            follower,
            frames: FrameLoop::detached(),
            last: Instant::now(),
        }));
        {
            let v = view.borrow();
            v.apply(&v.state.frame());
        }

        let weak = Rc::downgrade(&view);
        view.borrow_mut().frames.bind(move || tick(&weak));
        view.borrow_mut().frames.request();

        let mut listeners = Vec::with_capacity(3);

        let weak = Rc::downgrade(&view);
        listeners.push(EventListener::typed::<web::PointerEvent>(
            &window,
            "pointermove",
            move |ev| {
                let Some(view) = weak.upgrade() else {
                    return;
                };
                let at = Vec2::new(ev.client_x() as f32, ev.client_y() as f32);
                let interactive = dom::is_interactive_target(ev.target());
                view.borrow_mut().state.pointer_moved(at, interactive);
            },
        )?);

        let weak = Rc::downgrade(&view);
        listeners.push(EventListener::new(&document, "mouseleave", move |_| {
            if let Some(view) = weak.upgrade() {
                view.borrow_mut().state.pointer_left();
            }
        })?);

        let weak = Rc::downgrade(&view);
        listeners.push(EventListener::new(&document, "mouseenter", move |_| {
            if let Some(view) = weak.upgrade() {
                view.borrow_mut().state.pointer_entered();
            }
        })?);

        log::info!("cursor mounted");
        Ok(Self {
            view,
            _listeners: listeners,
        })
    }
}

impl Drop for CursorMount {
    fn drop(&mut self) {
        if let Ok(mut v) = self.view.try_borrow_mut() {
            v.frames.cancel();
            set_style(&v.dot, "opacity", "0");
            set_style(&v.follower, "opacity", "0");
        }
        log::info!("cursor unmounted");
    }
}

fn tick(view: &Weak<RefCell<View>>) {
    let Some(view) = view.upgrade() else {
        return;
    };
    let Ok(mut v) = view.try_borrow_mut() else {
        return;
    };
    let now = Instant::now();
    let dt = now.duration_since(v.last).as_secs_f32();
    v.last = now;
    v.state.update(dt);
    let frame = v.state.frame();
    v.apply(&frame);
    v.frames.request();
}
