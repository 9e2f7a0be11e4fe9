//! Browser host for the 3D skills keyboard.

use folio_core::texture::LabelCache;
use folio_core::{describe_keyboard, Keyboard, OrbitCamera, SKILLS};
use glam::{Vec2, Vec3};
use instant::Instant;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use web_sys as web;

use crate::atlas::{AtlasLayout, LabelAtlas};
use crate::constants::{ATLAS_CELL_PX, ATLAS_COLS, ATLAS_ROWS};
use crate::dom::{self, set_style};
use crate::events;
use crate::frame::FrameLoop;
use crate::input::{self, DragState};
use crate::listener::EventListener;
use crate::render::GpuState;

pub(crate) struct KeyboardView {
    pub(crate) keyboard: Keyboard,
    pub(crate) orbit: OrbitCamera,
    pub(crate) drag: DragState,
    pub(crate) canvas: web::HtmlCanvasElement,
    /// CSS size of the canvas, refreshed on resize.
    pub(crate) css_size: Vec2,
    gpu: GpuState,
    atlas: LabelAtlas,
    frames: FrameLoop,
    last: Instant,
}

impl KeyboardView {
    /// World ray under a point given in canvas CSS pixels.
    pub(crate) fn ray_at(&self, x: f32, y: f32) -> Option<(Vec3, Vec3)> {
        let ndc = input::css_to_ndc(x, y, self.css_size.x, self.css_size.y)?;
        let aspect = self.css_size.x / self.css_size.y;
        Some(self.orbit.camera().ray(ndc, aspect))
    }

    pub(crate) fn sync_size(&mut self) {
        let (w, h, _) = dom::sync_canvas_backing_size(&self.canvas);
        self.css_size = Vec2::new(w, h);
        self.gpu
            .resize_if_needed(self.canvas.width(), self.canvas.height());
    }

    /// Cursor style for the canvas: grabbing while orbiting, pointer over keycaps.
    pub(crate) fn refresh_cursor(&self) {
        let style = if self.drag.is_rotating() {
            "grabbing"
        } else if self.keyboard.wants_pointer_cursor() {
            "pointer"
        } else {
            "grab"
        };
        set_style(&self.canvas, "cursor", style);
    }

    fn frame(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        self.keyboard.update(dt);

        let scene = describe_keyboard(&self.keyboard, &self.orbit);
        match self.gpu.render(&scene, &self.atlas) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("keyboard surface lost; reconfiguring");
                self.sync_size();
            }
            Err(e) => log::error!("keyboard render error: {:?}", e),
        }
    }
}

pub struct KeyboardMount {
    view: Rc<RefCell<KeyboardView>>,
    _listeners: Vec<EventListener>,
}

impl KeyboardMount {
    pub async fn mount(canvas: web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let (w, h, _) = dom::sync_canvas_backing_size(&canvas);

        let layout = AtlasLayout {
            cols: ATLAS_COLS,
            rows: ATLAS_ROWS,
            cell: ATLAS_CELL_PX,
        };
        // labels are only needed until the atlas is uploaded
        let mut labels = LabelCache::new(ATLAS_CELL_PX);
        let mut atlas = LabelAtlas::build(&SKILLS, &mut labels, layout);
        log::info!(
            "label atlas: {} labels from {} rasterisations",
            atlas.len(),
            labels.builds()
        );
        labels.dispose();

        let pixels = atlas.take_pixels();
        let gpu = GpuState::new(&canvas, &atlas, pixels).await?;
        let view = Rc::new(RefCell::new(KeyboardView {
            keyboard: Keyboard::new(&SKILLS),
            orbit: OrbitCamera::default(),
            drag: DragState::default(),
            canvas: canvas.clone(),
            css_size: Vec2::new(w, h),
            gpu,
            atlas,
            frames: FrameLoop::detached(),
            last: Instant::now(),
        }));

        let weak = Rc::downgrade(&view);
        view.borrow_mut().frames.bind(move || tick(&weak));
        view.borrow_mut().refresh_cursor();
        view.borrow_mut().frames.request();

        let mut listeners = Vec::new();
        let weak = Rc::downgrade(&view);
        listeners.push(EventListener::new(&window, "resize", move |_| {
            if let Some(view) = weak.upgrade() {
                view.borrow_mut().sync_size();
            }
        })?);
        listeners.extend(events::keyboard::wire_key_handlers(&window, &view)?);
        listeners.extend(events::pointer::wire_input_handlers(&canvas, &view)?);

        log::info!("skills keyboard mounted");
        Ok(Self {
            view,
            _listeners: listeners,
        })
    }
}

impl Drop for KeyboardMount {
    fn drop(&mut self) {
        if let Ok(mut v) = self.view.try_borrow_mut() {
            v.frames.cancel();
        }
        log::info!("skills keyboard unmounted");
    }
}

fn tick(view: &Weak<RefCell<KeyboardView>>) {
    let Some(view) = view.upgrade() else {
        return;
    };
    let Ok(mut v) = view.try_borrow_mut() else {
        return;
    };
    v.frame();
    v.frames.request();
}
