//! Frame-driven runner for the particle background.
//!
//! [`ParticleBackground`] owns the pool, the pointer state and the
//! reduced-motion switch, and decides when the host should schedule another
//! frame. With reduced motion it draws one static frame and never asks for
//! another one.

use rand::rngs::StdRng;

use crate::field::{FieldConfig, ParticleField, Viewport};
use crate::paint::{render_field, render_static, Painter};
use crate::pointer::PointerState;

/// Host frame driver (requestAnimationFrame, a winit redraw request, ...).
pub trait FrameScheduler {
    /// Schedules one call to [`ParticleBackground::frame`].
    fn request_frame(&mut self);
    /// Drops any pending request.
    fn cancel(&mut self);
}

/// Scheduler that only counts calls.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CountingScheduler {
    pub requests: usize,
    pub cancels: usize,
    pub pending: bool,
}

impl FrameScheduler for CountingScheduler {
    fn request_frame(&mut self) {
        self.requests += 1;
        self.pending = true;
    }

    fn cancel(&mut self) {
        self.cancels += 1;
        self.pending = false;
    }
}

pub struct ParticleBackground<S: FrameScheduler> {
    config: FieldConfig,
    field: Option<ParticleField>,
    pointer: PointerState,
    viewport: Viewport,
    reduced_motion: bool,
    mounted: bool,
    scheduler: S,
    rng: StdRng,
}

impl<S: FrameScheduler> ParticleBackground<S> {
    pub fn new(config: FieldConfig, scheduler: S, rng: StdRng) -> Self {
        Self {
            config,
            field: None,
            pointer: PointerState::new(),
            viewport: Viewport::new(0.0, 0.0),
            reduced_motion: false,
            mounted: false,
            scheduler,
            rng,
        }
    }

    pub fn field(&self) -> Option<&ParticleField> {
        self.field.as_ref()
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Allocates the pool and starts the matching code path. An empty
    /// viewport defers initialisation until the first non-empty resize.
    pub fn mount<P: Painter + ?Sized>(
        &mut self,
        viewport: Viewport,
        reduced_motion: bool,
        painter: &mut P,
    ) {
        self.mounted = true;
        self.viewport = viewport;
        self.reduced_motion = reduced_motion;
        log::info!(
            "particle background mounted ({}x{}, reduced motion: {})",
            viewport.width,
            viewport.height,
            reduced_motion
        );
        self.rebuild(painter);
    }

    /// Cancels the frame driver and releases the pool.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.scheduler.cancel();
        self.field = None;
        self.mounted = false;
        log::info!("particle background unmounted");
    }

    /// One scheduled frame: step, draw, schedule the next one.
    pub fn frame<P: Painter + ?Sized>(&mut self, painter: &mut P) {
        if !self.mounted || self.reduced_motion {
            return;
        }
        let Some(field) = self.field.as_mut() else {
            return;
        };
        field.tick(&self.pointer);
        render_field(painter, field, &self.pointer);
        self.scheduler.request_frame();
    }

    pub fn resize<P: Painter + ?Sized>(&mut self, viewport: Viewport, painter: &mut P) {
        self.viewport = viewport;
        if !self.mounted {
            return;
        }
        match self.field.as_mut() {
            None => self.rebuild(painter),
            Some(field) => {
                field.resize(viewport);
                // the canvas was cleared by the resize; the static path has no next frame
                if self.reduced_motion {
                    render_static(painter, field);
                }
            }
        }
    }

    /// Applies a runtime change of the reduced-motion preference.
    pub fn set_reduced_motion<P: Painter + ?Sized>(&mut self, reduced: bool, painter: &mut P) {
        if reduced == self.reduced_motion {
            return;
        }
        log::info!("reduced motion preference changed to {reduced}");
        self.reduced_motion = reduced;
        if self.mounted {
            self.scheduler.cancel();
            self.rebuild(painter);
        }
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer.moved(x, y);
    }

    pub fn pointer_left(&mut self) {
        self.pointer.left();
    }

    fn rebuild<P: Painter + ?Sized>(&mut self, painter: &mut P) {
        match ParticleField::initialize(
            self.config.clone(),
            self.viewport,
            self.reduced_motion,
            &mut self.rng,
        ) {
            Ok(field) => self.field = Some(field),
            Err(e) => {
                log::info!("particle background deferred: {e}");
                self.field = None;
                return;
            }
        }
        if self.reduced_motion {
            if let Some(field) = &self.field {
                render_static(painter, field);
            }
        } else {
            self.frame(painter);
        }
    }
}
