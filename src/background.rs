//! Browser host for the particle background canvas.

use folio_core::{FieldConfig, ParticleBackground, Viewport};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use web_sys as web;

use crate::canvas2d::CanvasPainter;
use crate::dom;
use crate::frame::FrameLoop;
use crate::listener::EventListener;

struct View {
    runner: ParticleBackground<FrameLoop>,
    painter: CanvasPainter,
    canvas: web::HtmlCanvasElement,
}

impl View {
    fn sync_size(&mut self) -> Viewport {
        let (w, h, dpr) = dom::sync_fullscreen_canvas(&self.canvas);
        self.painter.resize(w, h, dpr);
        Viewport::new(w, h)
    }
}

/// A mounted particle background. Dropping it stops the frame loop and
/// removes every listener it installed.
pub struct BackgroundMount {
    view: Rc<RefCell<View>>,
    _listeners: Vec<EventListener>,
}

impl BackgroundMount {
    pub fn mount(canvas: web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| anyhow::anyhow!("no document"))?;

        let painter = CanvasPainter::new(&canvas)?;
        let runner = ParticleBackground::new(
            FieldConfig::default(),
            FrameLoop::detached(),
            StdRng::from_entropy(),
        );
        let view = Rc::new(RefCell::new(View {
            runner,
            painter,
            canvas,
        }));

        let weak = Rc::downgrade(&view);
        view.borrow_mut()
            .runner
            .scheduler_mut()
            .bind(move || tick(&weak));

        let query = dom::reduced_motion_query();
        let reduced = query.as_ref().is_some_and(|q| q.matches());
        {
            let mut v = view.borrow_mut();
            let viewport = v.sync_size();
            let View {
                runner, painter, ..
            } = &mut *v;
            runner.mount(viewport, reduced, painter);
        }

        let mut listeners = Vec::with_capacity(4);

        let weak = Rc::downgrade(&view);
        listeners.push(EventListener::new(&window, "resize", move |_| {
            let Some(view) = weak.upgrade() else {
                return;
            };
            let mut v = view.borrow_mut();
            let viewport = v.sync_size();
            let View {
                runner, painter, ..
            } = &mut *v;
            runner.resize(viewport, painter);
        })?);

        let weak = Rc::downgrade(&view);
        listeners.push(EventListener::typed::<web::PointerEvent>(
            &window,
            "pointermove",
            move |ev| {
                if let Some(view) = weak.upgrade() {
                    view.borrow_mut()
                        .runner
                        .pointer_moved(ev.client_x() as f32, ev.client_y() as f32);
                }
            },
        )?);

        let weak = Rc::downgrade(&view);
        listeners.push(EventListener::new(&document, "mouseleave", move |_| {
            if let Some(view) = weak.upgrade() {
                view.borrow_mut().runner.pointer_left();
            }
        })?);

        if let Some(query) = query {
            let weak = Rc::downgrade(&view);
            listeners.push(EventListener::typed::<web::MediaQueryListEvent>(
                &query,
                "change",
                move |ev| {
                    let Some(view) = weak.upgrade() else {
                        return;
                    };
                    let mut v = view.borrow_mut();
                    let View {
                        runner, painter, ..
                    } = &mut *v;
                    runner.set_reduced_motion(ev.matches(), painter);
                },
            )?);
        }

        Ok(Self {
            view,
            _listeners: listeners,
        })
    }
}

impl Drop for BackgroundMount {
    fn drop(&mut self) {
        if let Ok(mut v) = self.view.try_borrow_mut() {
            v.runner.unmount();
        }
    }
}

fn tick(view: &Weak<RefCell<View>>) {
    let Some(view) = view.upgrade() else {
        return;
    };
    let Ok(mut v) = view.try_borrow_mut() else {
        return;
    };
    let View {
        runner, painter, ..
    } = &mut *v;
    runner.frame(painter);
}
