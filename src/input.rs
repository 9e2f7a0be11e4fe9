use glam::Vec2;

use crate::constants::{CLICK_SLOP_PX, ORBIT_RADIANS_PER_PX, ORBIT_WHEEL_ZOOM_PER_PX};

/// Backing-store size for a canvas of `css` logical size at `dpr`.
#[inline]
pub fn backing_size(css_width: f64, css_height: f64, dpr: f64) -> (u32, u32) {
    let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    let w = (css_width.max(0.0) * dpr).round() as u32;
    let h = (css_height.max(0.0) * dpr).round() as u32;
    (w.max(1), h.max(1))
}

/// Normalised device coordinates (y up) of a point inside a `width` x `height`
/// element. None while the element has no area.
#[inline]
pub fn css_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Option<Vec2> {
    if !(width > 0.0 && height > 0.0) {
        return None;
    }
    Some(Vec2::new(2.0 * x / width - 1.0, 1.0 - 2.0 * y / height))
}

/// Pointer drag on the keyboard canvas. Short drags are clicks.
#[derive(Default, Clone, Copy, Debug)]
pub struct DragState {
    pub active: bool,
    pub last: Vec2,
    pub travelled: f32,
}

impl DragState {
    pub fn begin(&mut self, at: Vec2) {
        self.active = true;
        self.last = at;
        self.travelled = 0.0;
    }

    /// Movement since the previous sample, zero when not dragging.
    pub fn drag_to(&mut self, at: Vec2) -> Vec2 {
        if !self.active {
            return Vec2::ZERO;
        }
        let delta = at - self.last;
        self.last = at;
        self.travelled += delta.length();
        delta
    }

    /// Ends the drag; true when it never left the click slop.
    pub fn end(&mut self) -> bool {
        let was_click = self.active && self.travelled < CLICK_SLOP_PX;
        self.active = false;
        was_click
    }

    pub fn is_rotating(&self) -> bool {
        self.active && self.travelled >= CLICK_SLOP_PX
    }
}

/// Azimuth and polar deltas (radians) for a drag of `delta` CSS pixels.
#[inline]
pub fn orbit_delta(delta: Vec2) -> (f32, f32) {
    (delta.x * ORBIT_RADIANS_PER_PX, delta.y * ORBIT_RADIANS_PER_PX)
}

/// Distance factor for a wheel event; positive deltas zoom out.
#[inline]
pub fn wheel_zoom_factor(delta_y: f64) -> f32 {
    if !delta_y.is_finite() {
        return 1.0;
    }
    (delta_y as f32 * ORBIT_WHEEL_ZOOM_PER_PX).exp()
}
