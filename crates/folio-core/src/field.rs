//! Particle simulation engine: a fixed pool of drifting particles with
//! ambient float, toroidal soft wrap, pointer attraction and radius pulsing.
//!
//! The pool is allocated once in [`ParticleField::initialize`] and mutated in
//! place by [`ParticleField::step`]; it is never reallocated while animating.

use glam::Vec2;
use rand::Rng;

use crate::constants::*;
use crate::error::FolioError;
use crate::particle::Particle;
use crate::pointer::PointerState;

/// Logical size of the surface the field lives on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True while the host has not laid the surface out yet.
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }

    pub fn validate(self) -> Result<Self, FolioError> {
        if self.is_empty() {
            return Err(FolioError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}

/// Tuning knobs for the particle field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
    pub count: usize,
    pub reduced_count: usize,
    pub phase_step: f32,
    pub float_amplitude: f32,
    pub wrap_margin: f32,
    pub influence_radius: f32,
    pub attraction_gain: f32,
    pub pulse_amplitude: f32,
    pub connection_distance: f32,
    pub edge_max_opacity: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            count: PARTICLE_COUNT,
            reduced_count: REDUCED_PARTICLE_COUNT,
            phase_step: PHASE_STEP,
            float_amplitude: FLOAT_AMPLITUDE,
            wrap_margin: WRAP_MARGIN,
            influence_radius: INFLUENCE_RADIUS,
            attraction_gain: ATTRACTION_GAIN,
            pulse_amplitude: PULSE_AMPLITUDE,
            connection_distance: CONNECTION_DISTANCE,
            edge_max_opacity: EDGE_MAX_OPACITY,
        }
    }
}

impl FieldConfig {
    pub fn pool_size(&self, reduced_motion: bool) -> usize {
        if reduced_motion {
            self.reduced_count
        } else {
            self.count
        }
    }
}

/// Position nudge toward the pointer for a particle at `position`.
///
/// Zero outside `(0, radius)`. Inside, the nudge points at the pointer with
/// length `force * gain * radius`, `force = (radius - d) / radius`, so it
/// strictly shrinks with distance. Only position is touched, never velocity,
/// so the pull stops the moment the pointer moves out of range.
pub fn attraction_delta(position: Vec2, pointer: Vec2, radius: f32, gain: f32) -> Vec2 {
    let offset = pointer - position;
    let distance = offset.length();
    if !(distance > 0.0 && distance < radius) {
        return Vec2::ZERO;
    }
    let force = (radius - distance) / radius;
    offset / distance * force * gain * radius
}

/// Re-enters a coordinate from the opposite side once it is more than
/// `margin` past either edge of `[0, extent]`.
pub fn wrap_coordinate(value: f32, extent: f32, margin: f32) -> f32 {
    if value < -margin {
        extent + margin
    } else if value > extent + margin {
        -margin
    } else {
        value
    }
}

#[derive(Clone, Debug)]
pub struct ParticleField {
    config: FieldConfig,
    viewport: Viewport,
    particles: Vec<Particle>,
    phase: f32,
    reduced_motion: bool,
}

impl ParticleField {
    /// Builds the pool for `viewport`.
    ///
    /// Fails with [`FolioError::InvalidDimensions`] when the surface has no
    /// area yet; callers defer and retry on the next resize.
    pub fn initialize<R: Rng + ?Sized>(
        config: FieldConfig,
        viewport: Viewport,
        reduced_motion: bool,
        rng: &mut R,
    ) -> Result<Self, FolioError> {
        let viewport = viewport.validate()?;
        let count = config.pool_size(reduced_motion);
        let particles = (0..count)
            .map(|_| Particle::random(rng, viewport.width, viewport.height))
            .collect();
        Ok(Self {
            config,
            viewport,
            particles,
            phase: 0.0,
            reduced_motion,
        })
    }

    /// Wraps an existing set of particles, e.g. a recorded layout.
    pub fn from_particles(
        config: FieldConfig,
        viewport: Viewport,
        particles: Vec<Particle>,
    ) -> Result<Self, FolioError> {
        let viewport = viewport.validate()?;
        Ok(Self {
            config,
            viewport,
            particles,
            phase: 0.0,
            reduced_motion: false,
        })
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Updates the wrap bounds. Particles keep their positions; anything now
    /// far outside re-enters on the next step. Empty sizes are ignored.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport.is_empty() {
            log::debug!(
                "ignoring empty resize {}x{}",
                viewport.width,
                viewport.height
            );
            return;
        }
        self.viewport = viewport;
    }

    /// Advances the field by the configured phase step.
    pub fn tick(&mut self, pointer: &PointerState) {
        self.step(pointer, self.config.phase_step);
    }

    /// Advances every particle by one frame, in place.
    pub fn step(&mut self, pointer: &PointerState, dt_phase: f32) {
        self.phase += dt_phase;
        let phase = self.phase;
        let cfg = &self.config;
        let Viewport { width, height } = self.viewport;
        let pointer = pointer.position();

        for p in &mut self.particles {
            let float = p.float_offset(phase, cfg.float_amplitude);
            p.position += p.velocity + float;

            p.position.x = wrap_coordinate(p.position.x, width, cfg.wrap_margin);
            p.position.y = wrap_coordinate(p.position.y, height, cfg.wrap_margin);

            if let Some(target) = pointer {
                p.position += attraction_delta(
                    p.position,
                    target,
                    cfg.influence_radius,
                    cfg.attraction_gain,
                );
            }

            p.radius = p.pulsed_radius(phase, cfg.pulse_amplitude);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn still_config() -> FieldConfig {
        FieldConfig {
            float_amplitude: 0.0,
            ..FieldConfig::default()
        }
    }

    #[test]
    fn zero_viewport_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = ParticleField::initialize(
            FieldConfig::default(),
            Viewport::new(0.0, 600.0),
            false,
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, FolioError::InvalidDimensions { .. }));
    }

    #[test]
    fn pool_size_follows_reduced_motion() {
        let mut rng = StdRng::seed_from_u64(2);
        let vp = Viewport::new(1280.0, 720.0);
        let full = ParticleField::initialize(FieldConfig::default(), vp, false, &mut rng).unwrap();
        let reduced = ParticleField::initialize(FieldConfig::default(), vp, true, &mut rng).unwrap();
        assert_eq!(full.len(), 60);
        assert_eq!(reduced.len(), 30);
        assert!(reduced.reduced_motion());
    }

    #[test]
    fn wraps_to_opposite_edge_on_each_side() {
        assert_eq!(wrap_coordinate(851.0, 800.0, 50.0), -50.0);
        assert_eq!(wrap_coordinate(-51.0, 800.0, 50.0), 850.0);
        assert_eq!(wrap_coordinate(850.0, 800.0, 50.0), 850.0);
        assert_eq!(wrap_coordinate(-50.0, 800.0, 50.0), -50.0);
    }

    #[test]
    fn drift_is_applied_every_step() {
        let mut p = Particle::at(Vec2::new(100.0, 100.0));
        p.velocity = Vec2::new(0.1, -0.1);
        let mut field =
            ParticleField::from_particles(still_config(), Viewport::new(400.0, 400.0), vec![p])
                .unwrap();
        let pointer = PointerState::new();
        for _ in 0..10 {
            field.step(&pointer, 0.01);
        }
        let pos = field.particles()[0].position;
        assert!((pos.x - 101.0).abs() < 1e-3 && (pos.y - 99.0).abs() < 1e-3);
    }

    #[test]
    fn attraction_pulls_toward_pointer_only_in_range() {
        let d = attraction_delta(Vec2::ZERO, Vec2::new(75.0, 0.0), 150.0, 0.02);
        // force = 0.5, peak step = 150 * 0.02 = 3
        assert!((d.x - 1.5).abs() < 1e-6 && d.y == 0.0);
        let near = attraction_delta(Vec2::ZERO, Vec2::new(0.0, -10.0), 150.0, 0.02);
        assert!(near.y < 0.0 && near.length() > d.length());
        assert_eq!(
            attraction_delta(Vec2::ZERO, Vec2::new(151.0, 0.0), 150.0, 0.02),
            Vec2::ZERO
        );
        assert_eq!(
            attraction_delta(Vec2::new(3.0, 4.0), Vec2::new(3.0, 4.0), 150.0, 0.02),
            Vec2::ZERO
        );
    }

    #[test]
    fn pointer_away_leaves_positions_to_drift_only() {
        let p = Particle::at(Vec2::new(200.0, 200.0));
        let mut field =
            ParticleField::from_particles(still_config(), Viewport::new(400.0, 400.0), vec![p])
                .unwrap();
        field.step(&PointerState::new(), 0.01);
        assert_eq!(field.particles()[0].position, Vec2::new(200.0, 200.0));
    }

    #[test]
    fn radius_pulses_from_base() {
        let mut p = Particle::at(Vec2::new(10.0, 10.0));
        p.base_radius = 2.0;
        let mut field =
            ParticleField::from_particles(still_config(), Viewport::new(400.0, 400.0), vec![p])
                .unwrap();
        field.step(&PointerState::new(), std::f32::consts::FRAC_PI_4);
        // sin(2 * π/4) = 1
        assert!((field.particles()[0].radius - 2.6).abs() < 1e-5);
    }

    #[test]
    fn empty_resize_keeps_previous_bounds() {
        let mut field = ParticleField::from_particles(
            FieldConfig::default(),
            Viewport::new(400.0, 300.0),
            Vec::new(),
        )
        .unwrap();
        field.resize(Viewport::new(0.0, 0.0));
        assert_eq!(field.viewport(), Viewport::new(400.0, 300.0));
        field.resize(Viewport::new(640.0, 480.0));
        assert_eq!(field.viewport(), Viewport::new(640.0, 480.0));
    }

    #[test]
    fn zero_count_pool_steps_without_work() {
        let mut rng = StdRng::seed_from_u64(3);
        let cfg = FieldConfig {
            count: 0,
            ..FieldConfig::default()
        };
        let mut field =
            ParticleField::initialize(cfg, Viewport::new(100.0, 100.0), false, &mut rng).unwrap();
        field.tick(&PointerState::new());
        assert!(field.is_empty());
    }
}
