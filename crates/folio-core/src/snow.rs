//! Falling snow overlay.

use glam::Vec2;
use rand::Rng;
use std::ops::Range;

use crate::color::{Rgba, SNOW_BLUE};
use crate::constants::*;
use crate::error::FolioError;
use crate::field::Viewport;
use crate::paint::{GradientStop, Painter};

const SPARKLE_GLOW: Rgba = Rgba::new(139.0 / 255.0, 92.0 / 255.0, 246.0 / 255.0, 0.8);

#[derive(Clone, Debug, PartialEq)]
pub struct SnowConfig {
    pub count: usize,
    pub radius: Range<f32>,
    pub speed: Range<f32>,
    pub opacity: Range<f32>,
    pub sway: Range<f32>,
    pub sway_speed: Range<f32>,
    pub respawn_y: f32,
    pub sparkle_chance: f64,
    /// Flakes at or below this radius never sparkle.
    pub sparkle_min_radius: f32,
}

impl Default for SnowConfig {
    fn default() -> Self {
        Self {
            count: SNOWFLAKE_COUNT,
            radius: 1.0..4.0,
            speed: 0.5..1.5,
            opacity: 0.2..0.8,
            sway: -1.0..1.0,
            sway_speed: 0.01..0.03,
            respawn_y: SNOW_RESPAWN_Y,
            sparkle_chance: SNOW_SPARKLE_CHANCE,
            sparkle_min_radius: 2.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Snowflake {
    pub position: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub opacity: f32,
    pub sway: f32,
    pub sway_speed: f32,
    /// Whether this frame draws a sparkle; rolled in [`SnowField::step`].
    pub sparkle: bool,
}

fn sample<R: Rng + ?Sized>(rng: &mut R, range: &Range<f32>) -> f32 {
    range.start + rng.gen::<f32>() * (range.end - range.start)
}

#[derive(Clone, Debug)]
pub struct SnowField {
    config: SnowConfig,
    viewport: Viewport,
    flakes: Vec<Snowflake>,
}

impl SnowField {
    pub fn new<R: Rng + ?Sized>(
        config: SnowConfig,
        viewport: Viewport,
        rng: &mut R,
    ) -> Result<Self, FolioError> {
        let viewport = viewport.validate()?;
        let flakes = (0..config.count)
            .map(|_| Snowflake {
                position: Vec2::new(
                    rng.gen::<f32>() * viewport.width,
                    rng.gen::<f32>() * viewport.height,
                ),
                radius: sample(rng, &config.radius),
                speed: sample(rng, &config.speed),
                opacity: sample(rng, &config.opacity),
                sway: sample(rng, &config.sway),
                sway_speed: sample(rng, &config.sway_speed),
                sparkle: false,
            })
            .collect();
        Ok(Self {
            config,
            viewport,
            flakes,
        })
    }

    pub fn flakes(&self) -> &[Snowflake] {
        &self.flakes
    }

    pub fn flakes_mut(&mut self) -> &mut [Snowflake] {
        &mut self.flakes
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if !viewport.is_empty() {
            self.viewport = viewport;
        }
    }

    /// One frame of fall, sway, respawn and horizontal wrap.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let Viewport { width, height } = self.viewport;
        let cfg = &self.config;
        for f in &mut self.flakes {
            f.position.y += f.speed;
            f.position.x += (f.position.y * f.sway_speed).sin() * f.sway;

            if f.position.y > height {
                f.position.y = cfg.respawn_y;
                f.position.x = rng.gen::<f32>() * width;
            }
            if f.position.x > width {
                f.position.x = 0.0;
            } else if f.position.x < 0.0 {
                f.position.x = width;
            }

            f.sparkle = f.radius > cfg.sparkle_min_radius && rng.gen_bool(cfg.sparkle_chance);
        }
    }
}

/// Paints every flake: a disc shading from white to pale blue, plus a small
/// bright square with a violet halo when the flake sparkles.
pub fn render_snow<P: Painter + ?Sized>(painter: &mut P, snow: &SnowField) {
    painter.clear();
    for f in snow.flakes() {
        // the gradient spans 2r but only the inner disc of radius r is filled
        let stops = [
            GradientStop::new(0.0, Rgba::WHITE.with_alpha(f.opacity)),
            GradientStop::new(1.0, SNOW_BLUE.with_alpha(f.opacity * 0.6)),
        ];
        painter.fill_radial(f.position, f.radius, &stops);

        if f.sparkle {
            let halo = [
                GradientStop::new(0.0, SPARKLE_GLOW),
                GradientStop::new(1.0, SPARKLE_GLOW.with_alpha(0.0)),
            ];
            painter.fill_radial(f.position, 5.0, &halo);
            painter.fill_rect(
                f.position - Vec2::ONE,
                Vec2::splat(2.0),
                Rgba::WHITE.with_alpha(f.opacity),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{PaintOp, RecordingPainter};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field(rng: &mut StdRng) -> SnowField {
        SnowField::new(SnowConfig::default(), Viewport::new(400.0, 300.0), rng).unwrap()
    }

    #[test]
    fn flakes_start_inside_their_ranges() {
        let mut rng = StdRng::seed_from_u64(11);
        let snow = field(&mut rng);
        assert_eq!(snow.flakes().len(), 100);
        for f in snow.flakes() {
            assert!((1.0..4.0).contains(&f.radius));
            assert!((0.5..1.5).contains(&f.speed));
            assert!((0.2..0.8).contains(&f.opacity));
            assert!((-1.0..1.0).contains(&f.sway));
            assert!((0.01..0.03).contains(&f.sway_speed));
        }
    }

    #[test]
    fn flake_below_bottom_respawns_above_top() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut snow = field(&mut rng);
        snow.flakes_mut()[0].position = Vec2::new(100.0, 299.9);
        snow.flakes_mut()[0].speed = 1.0;
        snow.step(&mut rng);
        let f = &snow.flakes()[0];
        assert_eq!(f.position.y, SNOW_RESPAWN_Y);
        assert!((0.0..=400.0).contains(&f.position.x));
    }

    #[test]
    fn horizontal_wrap() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut snow = field(&mut rng);
        {
            let f = &mut snow.flakes_mut()[0];
            f.position = Vec2::new(400.5, 10.0);
            f.sway = 0.0;
        }
        {
            let f = &mut snow.flakes_mut()[1];
            f.position = Vec2::new(-0.5, 10.0);
            f.sway = 0.0;
        }
        snow.step(&mut rng);
        assert_eq!(snow.flakes()[0].position.x, 0.0);
        assert_eq!(snow.flakes()[1].position.x, 400.0);
    }

    #[test]
    fn small_flakes_never_sparkle() {
        let mut rng = StdRng::seed_from_u64(14);
        let cfg = SnowConfig {
            radius: 1.0..2.0,
            sparkle_chance: 1.0,
            ..SnowConfig::default()
        };
        let mut snow = SnowField::new(cfg, Viewport::new(100.0, 100.0), &mut rng).unwrap();
        snow.step(&mut rng);
        assert!(snow.flakes().iter().all(|f| !f.sparkle));
    }

    #[test]
    fn sparkles_draw_halo_and_square() {
        let mut rng = StdRng::seed_from_u64(15);
        let cfg = SnowConfig {
            count: 1,
            radius: 3.0..3.5,
            sparkle_chance: 1.0,
            ..SnowConfig::default()
        };
        let mut snow = SnowField::new(cfg, Viewport::new(100.0, 100.0), &mut rng).unwrap();
        snow.step(&mut rng);
        let mut rec = RecordingPainter::new();
        render_snow(&mut rec, &snow);
        assert_eq!(rec.radials(), 2);
        assert!(rec.ops.iter().any(|op| matches!(op, PaintOp::Rect { .. })));
    }
}
