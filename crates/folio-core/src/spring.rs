//! Damped harmonic oscillator shared by every spring-driven value (keycaps,
//! cursor dot and ring).
//!
//! Integration is semi-implicit Euler in fixed substeps of at most
//! [`SPRING_MAX_SUBSTEP_SEC`], which keeps stiff springs stable at any frame
//! rate. Frame gaps longer than [`SPRING_MAX_FRAME_SEC`] are clamped.

use glam::Vec2;

use crate::constants::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    pub const fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Critically damped spring: `damping = 2 * sqrt(stiffness * mass)`.
    pub fn critical(stiffness: f32, mass: f32) -> Self {
        Self::new(stiffness, 2.0 * (stiffness * mass).sqrt(), mass)
    }

    /// `damping / (2 * sqrt(stiffness * mass))`; 1.0 is critical.
    pub fn damping_ratio(&self) -> f32 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    fn acceleration(&self, displacement: f32, velocity: f32) -> f32 {
        (-self.stiffness * displacement - self.damping * velocity) / self.mass
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::critical(KEYCAP_STIFFNESS, KEYCAP_MASS)
    }
}

fn substeps(dt: f32) -> (u32, f32) {
    let dt = dt.clamp(0.0, SPRING_MAX_FRAME_SEC);
    if dt == 0.0 {
        return (0, 0.0);
    }
    let n = (dt / SPRING_MAX_SUBSTEP_SEC).ceil().max(1.0) as u32;
    (n, dt / n as f32)
}

/// Scalar spring chasing a target.
#[derive(Clone, Debug, PartialEq)]
pub struct Spring {
    pub config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    /// A spring at rest on `value`.
    pub fn new(value: f32, config: SpringConfig) -> Self {
        Self {
            config,
            value,
            velocity: 0.0,
            target: value,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_target(&mut self, target: f32) {
        if target.is_finite() {
            self.target = target;
        }
    }

    /// Jumps to `value` and stops.
    pub fn snap(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    pub fn is_at_rest(&self) -> bool {
        self.value == self.target && self.velocity == 0.0
    }

    /// Advances by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if self.is_at_rest() {
            return;
        }
        let (n, h) = substeps(dt);
        for _ in 0..n {
            let a = self
                .config
                .acceleration(self.value - self.target, self.velocity);
            self.velocity += a * h;
            self.value += self.velocity * h;
        }
        if (self.value - self.target).abs() < SPRING_REST_EPSILON
            && self.velocity.abs() < SPRING_REST_EPSILON
        {
            self.snap(self.target);
        }
    }
}

/// Two-dimensional spring; both axes share one config.
#[derive(Clone, Debug, PartialEq)]
pub struct SpringVec2 {
    pub config: SpringConfig,
    value: Vec2,
    velocity: Vec2,
    target: Vec2,
}

impl SpringVec2 {
    pub fn new(value: Vec2, config: SpringConfig) -> Self {
        Self {
            config,
            value,
            velocity: Vec2::ZERO,
            target: value,
        }
    }

    pub fn value(&self) -> Vec2 {
        self.value
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn set_target(&mut self, target: Vec2) {
        if target.is_finite() {
            self.target = target;
        }
    }

    pub fn snap(&mut self, value: Vec2) {
        self.value = value;
        self.target = value;
        self.velocity = Vec2::ZERO;
    }

    pub fn update(&mut self, dt: f32) {
        if self.value == self.target && self.velocity == Vec2::ZERO {
            return;
        }
        let (n, h) = substeps(dt);
        let SpringConfig {
            stiffness,
            damping,
            mass,
        } = self.config;
        for _ in 0..n {
            let a = (-(self.value - self.target) * stiffness - self.velocity * damping) / mass;
            self.velocity += a * h;
            self.value += self.velocity * h;
        }
        if self.value.distance(self.target) < SPRING_REST_EPSILON
            && self.velocity.length() < SPRING_REST_EPSILON
        {
            self.snap(self.target);
        }
    }
}
