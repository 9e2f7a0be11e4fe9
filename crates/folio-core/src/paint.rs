//! 2D drawing surface and the frame renderers for the particle field.
//!
//! The browser canvas, the CPU [`Pixmap`](crate::raster::Pixmap) and the
//! [`RecordingPainter`] used by tests all implement [`Painter`]; coordinates
//! are logical pixels.

use glam::Vec2;
use smallvec::{smallvec, SmallVec};

use crate::color::{Rgba, AURORA};
use crate::constants::*;
use crate::field::ParticleField;
use crate::particle::Particle;
use crate::pointer::PointerState;
use crate::proximity::{edge_segment, edges};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient in [0, 1].
    pub offset: f32,
    pub color: Rgba,
}

impl GradientStop {
    pub const fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

pub type GradientStops = SmallVec<[GradientStop; 4]>;

/// Samples a sorted stop list at `t`, holding the end colors outside it.
pub fn sample_stops(stops: &[GradientStop], t: f32) -> Rgba {
    let (first, last) = match (stops.first(), stops.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return Rgba::TRANSPARENT,
    };
    if t <= first.offset {
        return first.color;
    }
    if t >= last.offset {
        return last.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let local = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
            return a.color.lerp(b.color, local);
        }
    }
    last.color
}

pub trait Painter {
    /// Clears the whole surface to transparent.
    fn clear(&mut self);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Disc of `radius` filled with a radial gradient from the center outwards.
    fn fill_radial(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]);

    /// Axis-aligned rectangle.
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba);

    /// Line whose color blends from `from_color` at `from` to `to_color` at `to`.
    fn stroke_gradient_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        from_color: Rgba,
        to_color: Rgba,
        width: f32,
    );
}

/// Glow stops for a particle: opacity at the center, half at mid radius, none at the rim.
pub fn particle_glow_stops(p: &Particle) -> GradientStops {
    smallvec![
        GradientStop::new(0.0, p.color.with_alpha(p.opacity)),
        GradientStop::new(0.5, p.color.with_alpha(p.opacity * 0.5)),
        GradientStop::new(1.0, p.color.with_alpha(0.0)),
    ]
}

/// Stops for the aurora glow that follows the pointer.
pub fn pointer_glow_stops() -> GradientStops {
    smallvec![
        GradientStop::new(0.0, AURORA[0].with_alpha(0.1)),
        GradientStop::new(0.5, AURORA[1].with_alpha(0.05)),
        GradientStop::new(1.0, Rgba::TRANSPARENT),
    ]
}

fn paint_pointer_glow<P: Painter + ?Sized>(painter: &mut P, pointer: &PointerState) {
    if let Some(at) = pointer.glow_position() {
        painter.fill_radial(at, POINTER_GLOW_RADIUS, &pointer_glow_stops());
    }
}

fn paint_particle<P: Painter + ?Sized>(painter: &mut P, p: &Particle) {
    if !(p.radius > 0.0) || !p.position.is_finite() {
        return;
    }
    // glow first so the core sits on top
    painter.fill_radial(p.position, p.radius * GLOW_SCALE, &particle_glow_stops(p));
    painter.fill_circle(
        p.position,
        p.radius,
        p.color.with_alpha(p.opacity + CORE_OPACITY_BOOST),
    );
}

/// Draws one animated frame from the field's current (already stepped) state.
pub fn render_field<P: Painter + ?Sized>(
    painter: &mut P,
    field: &ParticleField,
    pointer: &PointerState,
) {
    painter.clear();
    paint_pointer_glow(painter, pointer);

    let particles = field.particles();
    for p in particles {
        paint_particle(painter, p);
    }

    let cfg = field.config();
    for edge in edges(particles, cfg.connection_distance, cfg.edge_max_opacity) {
        let (from, to) = edge_segment(particles, &edge);
        painter.stroke_gradient_line(
            from,
            to,
            particles[edge.a].color.with_alpha(edge.opacity),
            particles[edge.b].color.with_alpha(edge.opacity),
            EDGE_WIDTH,
        );
    }
}

/// Draws the single reduced-motion frame: plain dots, no glow or edges.
pub fn render_static<P: Painter + ?Sized>(painter: &mut P, field: &ParticleField) {
    painter.clear();
    for p in field.particles() {
        painter.fill_circle(p.position, p.base_radius, p.color.with_alpha(p.opacity));
    }
}

/// One primitive captured by [`RecordingPainter`].
#[derive(Clone, Debug, PartialEq)]
pub enum PaintOp {
    Clear,
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
    Radial {
        center: Vec2,
        radius: f32,
        stops: Vec<GradientStop>,
    },
    Rect {
        origin: Vec2,
        size: Vec2,
        color: Rgba,
    },
    Line {
        from: Vec2,
        to: Vec2,
        from_color: Rgba,
        to_color: Rgba,
        width: f32,
    },
}

/// Painter that records primitives instead of drawing them.
#[derive(Clone, Debug, Default)]
pub struct RecordingPainter {
    pub ops: Vec<PaintOp>,
}

impl RecordingPainter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, PaintOp::Line { .. }))
            .count()
    }

    pub fn circles(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, PaintOp::Circle { .. }))
            .count()
    }

    pub fn radials(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, PaintOp::Radial { .. }))
            .count()
    }
}

impl Painter for RecordingPainter {
    fn clear(&mut self) {
        self.ops.push(PaintOp::Clear);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.ops.push(PaintOp::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_radial(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]) {
        self.ops.push(PaintOp::Radial {
            center,
            radius,
            stops: stops.to_vec(),
        });
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        self.ops.push(PaintOp::Rect {
            origin,
            size,
            color,
        });
    }

    fn stroke_gradient_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        from_color: Rgba,
        to_color: Rgba,
        width: f32,
    ) {
        self.ops.push(PaintOp::Line {
            from,
            to,
            from_color,
            to_color,
            width,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldConfig, Viewport};

    fn field(positions: &[(f32, f32)]) -> ParticleField {
        let particles = positions
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                let mut p = Particle::at(Vec2::new(x, y));
                p.color = AURORA[i % AURORA.len()];
                p
            })
            .collect();
        ParticleField::from_particles(FieldConfig::default(), Viewport::new(800.0, 600.0), particles)
            .unwrap()
    }

    #[test]
    fn stops_interpolate_between_neighbours() {
        let stops = [
            GradientStop::new(0.0, Rgba::new(0.0, 0.0, 0.0, 1.0)),
            GradientStop::new(1.0, Rgba::new(1.0, 1.0, 1.0, 1.0)),
        ];
        assert_eq!(sample_stops(&stops, -1.0), stops[0].color);
        assert_eq!(sample_stops(&stops, 2.0), stops[1].color);
        assert!((sample_stops(&stops, 0.25).r - 0.25).abs() < 1e-6);
        assert_eq!(sample_stops(&[], 0.5), Rgba::TRANSPARENT);
    }

    #[test]
    fn glow_is_painted_before_core() {
        let f = field(&[(100.0, 100.0)]);
        let mut rec = RecordingPainter::new();
        render_field(&mut rec, &f, &PointerState::new());
        assert!(matches!(rec.ops[0], PaintOp::Clear));
        assert!(matches!(rec.ops[1], PaintOp::Radial { .. }));
        assert!(matches!(rec.ops[2], PaintOp::Circle { .. }));
        if let PaintOp::Radial { radius, .. } = rec.ops[1] {
            assert!((radius - 3.0).abs() < 1e-6);
        }
    }

    #[test]
    fn edge_colors_come_from_each_endpoint() {
        let f = field(&[(0.0, 0.0), (90.0, 0.0)]);
        let mut rec = RecordingPainter::new();
        render_field(&mut rec, &f, &PointerState::new());
        let line = rec
            .ops
            .iter()
            .find_map(|op| match op {
                PaintOp::Line {
                    from_color,
                    to_color,
                    ..
                } => Some((*from_color, *to_color)),
                _ => None,
            })
            .unwrap();
        assert_eq!(line.0, AURORA[0].with_alpha(0.2));
        assert_eq!(line.1, AURORA[1].with_alpha(0.2));
    }

    #[test]
    fn pointer_glow_only_with_positive_coordinates() {
        let f = field(&[]);
        let mut pointer = PointerState::new();
        let mut rec = RecordingPainter::new();
        render_field(&mut rec, &f, &pointer);
        assert_eq!(rec.radials(), 0);

        pointer.moved(300.0, 200.0);
        let mut rec = RecordingPainter::new();
        render_field(&mut rec, &f, &pointer);
        assert_eq!(rec.radials(), 1);
    }

    #[test]
    fn static_frame_is_dots_only() {
        let f = field(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
        let mut rec = RecordingPainter::new();
        render_static(&mut rec, &f);
        assert_eq!(rec.circles(), 3);
        assert_eq!(rec.lines(), 0);
        assert_eq!(rec.radials(), 0);
    }
}
