//! Browser host for the snow overlay.

use folio_core::{render_snow, SnowConfig, SnowField, Viewport};
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
    snow: Option<SnowField>,
    painter: CanvasPainter,
    canvas: web::HtmlCanvasElement,
    frames: FrameLoop,
    rng: StdRng,
}

impl View {
    fn sync_size(&mut self) -> Viewport {
        let (w, h, dpr) = dom::sync_fullscreen_canvas(&self.canvas);
        self.painter.resize(w, h, dpr);
        Viewport::new(w, h)
    }

    /// Creates the field on the first non-empty viewport, resizes it after.
    fn apply_viewport(&mut self, viewport: Viewport) {
        match self.snow.as_mut() {
            Some(snow) => snow.resize(viewport),
            None => match SnowField::new(SnowConfig::default(), viewport, &mut self.rng) {
                Ok(snow) => {
                    self.snow = Some(snow);
                    self.frames.request();
                }
                Err(e) => log::info!("snow deferred: {e}"),
            },
        }
    }
}

pub struct SnowMount {
    view: Rc<RefCell<View>>,
    _resize: EventListener,
}

impl SnowMount {
    pub fn mount(canvas: web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let view = Rc::new(RefCell::new(View {
            snow: None,
            painter: CanvasPainter::new(&canvas)?,
            canvas,
            frames: FrameLoop::detached(),
            rng: StdRng::from_entropy(),
        }));

        let weak = Rc::downgrade(&view);
        view.borrow_mut().frames.bind(move || tick(&weak));
        {
            let mut v = view.borrow_mut();
            let viewport = v.sync_size();
            v.apply_viewport(viewport);
        }

        let weak = Rc::downgrade(&view);
        let resize = EventListener::new(&window, "resize", move |_| {
            if let Some(view) = weak.upgrade() {
                let mut v = view.borrow_mut();
                let viewport = v.sync_size();
                v.apply_viewport(viewport);
            }
        })?;
        log::info!("snow mounted");
        Ok(Self {
            view,
            _resize: resize,
        })
    }
}

impl Drop for SnowMount {
    fn drop(&mut self) {
        if let Ok(mut v) = self.view.try_borrow_mut() {
            v.frames.cancel();
            v.snow = None;
        }
        log::info!("snow unmounted");
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
        snow,
        painter,
        frames,
        rng,
        ..
    } = &mut *v;
    let Some(snow) = snow.as_mut() else {
        return;
    };
    snow.step(rng);
    render_snow(painter, snow);
    frames.request();
}
