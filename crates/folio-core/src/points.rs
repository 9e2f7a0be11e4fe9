//! Small cloud of glowing points drifting around the skills keyboard.
//!
//! Points keep a local position; the whole cloud turns slowly around +Y and
//! each point bobs vertically on its own phase. Rates are expressed per
//! 60 Hz frame and scaled by `dt` so the motion does not depend on the
//! display's refresh rate.

use glam::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::color::Rgba;
use crate::constants::{
    FLOATING_POINT_BOB, FLOATING_POINT_COUNT, FLOATING_POINT_OPACITY, FLOATING_POINT_SEED,
    FLOATING_POINT_SIZE, FLOATING_POINT_SPIN, REFERENCE_FRAME_RATE,
};

/// Blue, purple and cyan accents.
pub const ACCENT_COLORS: [Rgba; 3] = [
    Rgba::new(0.38, 0.51, 0.98, 1.0),
    Rgba::new(0.55, 0.36, 0.96, 1.0),
    Rgba::new(0.22, 0.71, 0.83, 1.0),
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatingPoint {
    /// Position in the cloud's own frame, before rotation.
    pub local: Vec3,
    pub color: Rgba,
}

/// One camera-facing sprite of the scene, in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointSprite {
    pub position: Vec3,
    pub color: Rgba,
    pub size: f32,
    pub opacity: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FloatingPoints {
    points: Vec<FloatingPoint>,
    rotation_y: f32,
    elapsed: f32,
}

impl Default for FloatingPoints {
    fn default() -> Self {
        Self::seeded(FLOATING_POINT_COUNT, FLOATING_POINT_SEED)
    }
}

impl FloatingPoints {
    /// Scatters `count` points over x ∈ [-7.5, 7.5), y ∈ [-2, 6), z ∈ [-5, 5),
    /// each tinted with one of the accent colors.
    pub fn seeded(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let points = (0..count)
            .map(|_| FloatingPoint {
                local: Vec3::new(
                    (rng.gen::<f32>() - 0.5) * 15.0,
                    rng.gen::<f32>() * 8.0 - 2.0,
                    (rng.gen::<f32>() - 0.5) * 10.0,
                ),
                color: ACCENT_COLORS[rng.gen_range(0..ACCENT_COLORS.len())],
            })
            .collect();
        Self::from_points(points)
    }

    pub fn from_points(points: Vec<FloatingPoint>) -> Self {
        Self {
            points,
            rotation_y: 0.0,
            elapsed: 0.0,
        }
    }

    pub fn points(&self) -> &[FloatingPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advances the clock by `dt` seconds, then bobs every point by
    /// `sin(t + i) · BOB` and turns the cloud by `SPIN`, both per frame.
    pub fn advance(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        let frames = dt * REFERENCE_FRAME_RATE;
        self.elapsed += dt;
        self.rotation_y += FLOATING_POINT_SPIN * frames;
        let t = self.elapsed;
        for (i, p) in self.points.iter_mut().enumerate() {
            p.local.y += (t + i as f32).sin() * FLOATING_POINT_BOB * frames;
        }
    }

    pub fn world_position(&self, point: &FloatingPoint) -> Vec3 {
        Quat::from_rotation_y(self.rotation_y) * point.local
    }

    pub fn sprites(&self) -> impl Iterator<Item = PointSprite> + '_ {
        self.points.iter().map(|p| PointSprite {
            position: self.world_position(p),
            color: p.color,
            size: FLOATING_POINT_SIZE,
            opacity: FLOATING_POINT_OPACITY,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_layout() {
        let a = FloatingPoints::seeded(20, 7);
        let b = FloatingPoints::seeded(20, 7);
        assert_eq!(a, b);
        assert_eq!(a.len(), 20);
        for p in a.points() {
            assert!((-7.5..7.5).contains(&p.local.x));
            assert!((-2.0..6.0).contains(&p.local.y));
            assert!((-5.0..5.0).contains(&p.local.z));
            assert!(ACCENT_COLORS.contains(&p.color));
        }
    }

    #[test]
    fn one_frame_bobs_each_point_and_turns_the_cloud() {
        let mut cloud = FloatingPoints::seeded(5, 3);
        let before: Vec<f32> = cloud.points().iter().map(|p| p.local.y).collect();
        let dt = 1.0 / REFERENCE_FRAME_RATE;
        cloud.advance(dt);

        assert!((cloud.rotation_y() - FLOATING_POINT_SPIN).abs() < 1e-9);
        for (i, (p, y0)) in cloud.points().iter().zip(&before).enumerate() {
            let expected = (dt + i as f32).sin() * FLOATING_POINT_BOB;
            assert!((p.local.y - y0 - expected).abs() < 1e-5, "point {i}");
        }
    }

    #[test]
    fn motion_scales_with_frame_time() {
        let mut fast = FloatingPoints::seeded(1, 9);
        let mut slow = fast.clone();
        for _ in 0..4 {
            fast.advance(1.0 / 120.0);
        }
        slow.advance(1.0 / 30.0);
        assert!((fast.rotation_y() - slow.rotation_y()).abs() < 1e-7);
        assert!((fast.rotation_y() - 2.0 * FLOATING_POINT_SPIN).abs() < 1e-7);
    }

    #[test]
    fn negative_dt_is_ignored() {
        let mut cloud = FloatingPoints::seeded(4, 1);
        let before = cloud.clone();
        cloud.advance(-1.0);
        assert_eq!(cloud, before);
    }

    #[test]
    fn sprites_follow_the_rotation() {
        let mut cloud = FloatingPoints::from_points(vec![FloatingPoint {
            local: Vec3::X,
            color: ACCENT_COLORS[0],
        }]);
        cloud.rotation_y = std::f32::consts::FRAC_PI_2;
        let s = cloud.sprites().next().unwrap();
        assert!(s.position.distance(Vec3::new(0.0, 0.0, -1.0)) < 1e-4, "{:?}", s.position);
        assert_eq!(s.size, FLOATING_POINT_SIZE);
        assert_eq!(s.opacity, FLOATING_POINT_OPACITY);
    }
}
