//! A single particle of the background field.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

use crate::color::{Rgba, AURORA};
use crate::constants::*;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// Logical (CSS) pixel position.
    pub position: Vec2,
    /// Fixed drift added every frame; set once at creation.
    pub velocity: Vec2,
    /// Rendered radius, recomputed every frame from `base_radius`.
    pub radius: f32,
    pub base_radius: f32,
    pub opacity: f32,
    /// Palette template; the particle's alpha is carried in `opacity`.
    pub color: Rgba,
    /// Desynchronises the float and pulse oscillations, in [0, 2π).
    pub phase_offset: f32,
}

impl Particle {
    /// Random particle somewhere inside a `width` x `height` viewport.
    ///
    /// Callers must have checked that both dimensions are positive.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, width: f32, height: f32) -> Self {
        let base_radius = BASE_RADIUS_MIN + rng.gen::<f32>() * BASE_RADIUS_SPAN;
        Self {
            position: Vec2::new(rng.gen::<f32>() * width, rng.gen::<f32>() * height),
            velocity: Vec2::new(
                (rng.gen::<f32>() - 0.5) * 2.0 * DRIFT_MAX,
                (rng.gen::<f32>() - 0.5) * 2.0 * DRIFT_MAX,
            ),
            radius: base_radius,
            base_radius,
            opacity: OPACITY_MIN + rng.gen::<f32>() * OPACITY_SPAN,
            color: AURORA[rng.gen_range(0..AURORA.len())],
            phase_offset: rng.gen::<f32>() * TAU,
        }
    }

    /// A motionless particle, handy for tests and for replaying known layouts.
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            radius: BASE_RADIUS_MIN,
            base_radius: BASE_RADIUS_MIN,
            opacity: OPACITY_MIN,
            color: AURORA[0],
            phase_offset: 0.0,
        }
    }

    /// Ambient float displacement for the given global phase.
    pub fn float_offset(&self, phase: f32, amplitude: f32) -> Vec2 {
        let t = phase + self.phase_offset;
        Vec2::new(t.sin(), t.cos()) * amplitude
    }

    /// Cosmetic pulse: `base_radius * (1 + amplitude * sin(rate * phase + offset))`.
    pub fn pulsed_radius(&self, phase: f32, amplitude: f32) -> f32 {
        self.base_radius * (1.0 + amplitude * (PULSE_RATE * phase + self.phase_offset).sin())
    }
}
