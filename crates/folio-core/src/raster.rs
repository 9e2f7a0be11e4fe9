//! CPU raster surface.
//!
//! Pixels are premultiplied RGBA floats composited with source-over. Shapes
//! are anti-aliased by analytic coverage: discs and lines from the distance
//! to their edge, polygons by a non-zero winding scanline with four vertical
//! subsamples per row and exact horizontal span coverage.

use glam::Vec2;
use image::{Rgba as ImagePixel, RgbaImage};

use crate::color::Rgba;
use crate::error::FolioError;
use crate::paint::{sample_stops, GradientStop, Painter};

const MAX_EDGE: u32 = 8192;
const SUBSAMPLES: usize = 4;

#[derive(Clone, Debug)]
pub struct Pixmap {
    width: u32,
    height: u32,
    /// Logical-to-pixel scale applied to every drawing call (device pixel ratio).
    scale: f32,
    data: Vec<[f32; 4]>,
}

impl Pixmap {
    pub fn new(width: u32, height: u32) -> Result<Self, FolioError> {
        if width == 0 || height == 0 || width > MAX_EDGE || height > MAX_EDGE {
            return Err(FolioError::InvalidDimensions {
                width: width as f32,
                height: height as f32,
            });
        }
        Ok(Self {
            width,
            height,
            scale: 1.0,
            data: vec![[0.0; 4]; (width * height) as usize],
        })
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.set_scale(scale);
        self
    }

    pub fn set_scale(&mut self, scale: f32) {
        if scale.is_finite() && scale > 0.0 {
            self.scale = scale;
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Straight-alpha color of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let [r, g, b, a] = self.data[(y * self.width + x) as usize];
        if a <= 0.0 {
            return Some(Rgba::TRANSPARENT);
        }
        Some(Rgba::new(r / a, g / a, b / a, a))
    }

    /// True if no pixel has any coverage.
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|p| p[3] <= 0.0)
    }

    /// Converts to a straight-alpha 8-bit image.
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let c = self.pixel(x, y).unwrap_or(Rgba::TRANSPARENT);
            ImagePixel(c.to_rgba8())
        })
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgba, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let a = (color.a * coverage).clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let dst = &mut self.data[(y as u64 * self.width as u64 + x as u64) as usize];
        let keep = 1.0 - a;
        dst[0] = color.r * a + dst[0] * keep;
        dst[1] = color.g * a + dst[1] * keep;
        dst[2] = color.b * a + dst[2] * keep;
        dst[3] = a + dst[3] * keep;
    }

    /// Pixel bounds of a logical-space box, clipped to the surface.
    fn pixel_bounds(&self, min: Vec2, max: Vec2) -> Option<(i64, i64, i64, i64)> {
        let x0 = (min.x.floor() as i64).max(0);
        let y0 = (min.y.floor() as i64).max(0);
        let x1 = (max.x.ceil() as i64).min(self.width as i64);
        let y1 = (max.y.ceil() as i64).min(self.height as i64);
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    /// Shared body for flat and gradient discs; `color_at` receives the
    /// normalised distance from the center.
    fn fill_disc(&mut self, center: Vec2, radius: f32, color_at: impl Fn(f32) -> Rgba) {
        let center = center * self.scale;
        let radius = radius * self.scale;
        if !(radius > 0.0) || !center.is_finite() {
            return;
        }
        let reach = Vec2::splat(radius + 1.0);
        let Some((x0, y0, x1, y1)) = self.pixel_bounds(center - reach, center + reach) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(center);
                let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color_at((d / radius).min(1.0)), coverage);
                }
            }
        }
    }

    /// Fills polygons (closed implicitly) using the non-zero winding rule.
    pub fn fill_polygons(&mut self, contours: &[Vec<Vec2>], color: Rgba) {
        let scale = self.scale;
        let mut edges: Vec<(Vec2, Vec2)> = Vec::new();
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for contour in contours {
            if contour.len() < 3 {
                continue;
            }
            for (i, &a) in contour.iter().enumerate() {
                let b = contour[(i + 1) % contour.len()];
                let (a, b) = (a * scale, b * scale);
                if !(a.is_finite() && b.is_finite()) {
                    continue;
                }
                min = min.min(a.min(b));
                max = max.max(a.max(b));
                if a.y != b.y {
                    edges.push((a, b));
                }
            }
        }
        let Some((x0, y0, x1, y1)) = self.pixel_bounds(min, max) else {
            return;
        };

        let span_width = (x1 - x0) as usize;
        let mut coverage = vec![0.0f32; span_width];
        let mut crossings: Vec<(f32, i32)> = Vec::new();
        let weight = 1.0 / SUBSAMPLES as f32;

        for y in y0..y1 {
            coverage.iter_mut().for_each(|c| *c = 0.0);
            for s in 0..SUBSAMPLES {
                let sy = y as f32 + (s as f32 + 0.5) * weight;
                crossings.clear();
                for &(a, b) in &edges {
                    let (top, bottom, dir) = if a.y < b.y { (a, b, 1) } else { (b, a, -1) };
                    if sy < top.y || sy >= bottom.y {
                        continue;
                    }
                    let t = (sy - top.y) / (bottom.y - top.y);
                    crossings.push((top.x + (bottom.x - top.x) * t, dir));
                }
                crossings.sort_by(|l, r| l.0.total_cmp(&r.0));

                let mut winding = 0;
                let mut start = 0.0;
                for &(x, dir) in &crossings {
                    let was_inside = winding != 0;
                    winding += dir;
                    let is_inside = winding != 0;
                    if !was_inside && is_inside {
                        start = x;
                    } else if was_inside && !is_inside {
                        accumulate_span(&mut coverage, x0, start, x, weight);
                    }
                }
            }
            for (i, &c) in coverage.iter().enumerate() {
                if c > 0.0 {
                    self.blend(x0 + i as i64, y, color, c.min(1.0));
                }
            }
        }
    }
}

/// Adds the horizontal overlap of `[from, to)` with each pixel of the row.
fn accumulate_span(row: &mut [f32], origin: i64, from: f32, to: f32, weight: f32) {
    let from = from - origin as f32;
    let to = to - origin as f32;
    let len = row.len() as f32;
    let (from, to) = (from.clamp(0.0, len), to.clamp(0.0, len));
    if to <= from {
        return;
    }
    let first = from.floor() as usize;
    let last = (to.ceil() as usize).min(row.len());
    for (px, cell) in row.iter_mut().enumerate().take(last).skip(first) {
        let left = (px as f32).max(from);
        let right = (px as f32 + 1.0).min(to);
        if right > left {
            *cell += (right - left) * weight;
        }
    }
}

impl Painter for Pixmap {
    fn clear(&mut self) {
        self.data.iter_mut().for_each(|p| *p = [0.0; 4]);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.fill_disc(center, radius, |_| color);
    }

    fn fill_radial(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]) {
        self.fill_disc(center, radius, |t| sample_stops(stops, t));
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        let min = origin * self.scale;
        let max = (origin + size) * self.scale;
        let Some((x0, y0, x1, y1)) = self.pixel_bounds(min, max) else {
            return;
        };
        for y in y0..y1 {
            let cover_y = ((y + 1) as f32).min(max.y) - (y as f32).max(min.y);
            for x in x0..x1 {
                let cover_x = ((x + 1) as f32).min(max.x) - (x as f32).max(min.x);
                self.blend(x, y, color, (cover_x * cover_y).clamp(0.0, 1.0));
            }
        }
    }

    fn stroke_gradient_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        from_color: Rgba,
        to_color: Rgba,
        width: f32,
    ) {
        let a = from * self.scale;
        let b = to * self.scale;
        let half = (width * self.scale * 0.5).max(0.5);
        if !(a.is_finite() && b.is_finite()) {
            return;
        }
        let reach = Vec2::splat(half + 1.0);
        let Some((x0, y0, x1, y1)) = self.pixel_bounds(a.min(b) - reach, a.max(b) + reach) else {
            return;
        };
        let ab = b - a;
        let len_sq = ab.length_squared();
        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let t = if len_sq > 0.0 {
                    ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let d = p.distance(a + ab * t);
                let coverage = (half + 0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, from_color.lerp(to_color, t), coverage);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_sized_surfaces() {
        assert!(Pixmap::new(0, 10).is_err());
        assert!(Pixmap::new(10, 0).is_err());
        assert!(Pixmap::new(1, 1).is_ok());
    }

    #[test]
    fn opaque_circle_covers_center_not_corner() {
        let mut pm = Pixmap::new(20, 20).unwrap();
        pm.fill_circle(Vec2::new(10.0, 10.0), 5.0, Rgba::WHITE);
        assert_eq!(pm.pixel(10, 10).unwrap(), Rgba::WHITE);
        assert_eq!(pm.pixel(0, 0).unwrap(), Rgba::TRANSPARENT);
    }

    #[test]
    fn source_over_accumulates_alpha() {
        let mut pm = Pixmap::new(4, 4).unwrap();
        let half = Rgba::WHITE.with_alpha(0.5);
        pm.fill_rect(Vec2::ZERO, Vec2::splat(4.0), half);
        pm.fill_rect(Vec2::ZERO, Vec2::splat(4.0), half);
        let a = pm.pixel(1, 1).unwrap().a;
        assert!((a - 0.75).abs() < 1e-6);
    }

    #[test]
    fn gradient_line_blends_along_its_length() {
        let mut pm = Pixmap::new(100, 3).unwrap();
        let red = Rgba::new(1.0, 0.0, 0.0, 1.0);
        let blue = Rgba::new(0.0, 0.0, 1.0, 1.0);
        pm.stroke_gradient_line(Vec2::new(0.0, 1.5), Vec2::new(100.0, 1.5), red, blue, 1.0);
        let left = pm.pixel(2, 1).unwrap();
        let right = pm.pixel(97, 1).unwrap();
        let middle = pm.pixel(50, 1).unwrap();
        assert!(left.r > 0.9 && left.b < 0.1);
        assert!(right.b > 0.9 && right.r < 0.1);
        assert!((middle.r - middle.b).abs() < 0.05);
    }

    #[test]
    fn polygon_fill_covers_interior_with_partial_edges() {
        let mut pm = Pixmap::new(10, 10).unwrap();
        let square = vec![
            Vec2::new(2.5, 2.0),
            Vec2::new(7.5, 2.0),
            Vec2::new(7.5, 8.0),
            Vec2::new(2.5, 8.0),
        ];
        pm.fill_polygons(&[square], Rgba::BLACK);
        assert!((pm.pixel(5, 5).unwrap().a - 1.0).abs() < 1e-6);
        assert!((pm.pixel(2, 5).unwrap().a - 0.5).abs() < 1e-6);
        assert_eq!(pm.pixel(0, 5).unwrap().a, 0.0);
        assert_eq!(pm.pixel(5, 9).unwrap().a, 0.0);
    }

    #[test]
    fn non_zero_rule_keeps_same_direction_overlap_filled() {
        let mut pm = Pixmap::new(10, 10).unwrap();
        let outer = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        // reversed winding punches a hole
        let hole = vec![
            Vec2::new(3.0, 3.0),
            Vec2::new(3.0, 7.0),
            Vec2::new(7.0, 7.0),
            Vec2::new(7.0, 3.0),
        ];
        pm.fill_polygons(&[outer, hole], Rgba::WHITE);
        assert_eq!(pm.pixel(5, 5).unwrap().a, 0.0);
        assert!((pm.pixel(1, 1).unwrap().a - 1.0).abs() < 1e-6);
    }

    #[test]
    fn scale_maps_logical_to_device_pixels() {
        let mut pm = Pixmap::new(20, 20).unwrap().with_scale(2.0);
        pm.fill_rect(Vec2::new(5.0, 5.0), Vec2::new(1.0, 1.0), Rgba::WHITE);
        assert!((pm.pixel(11, 11).unwrap().a - 1.0).abs() < 1e-6);
        assert_eq!(pm.pixel(5, 5).unwrap().a, 0.0);
    }

    #[test]
    fn converts_to_straight_alpha_image() {
        let mut pm = Pixmap::new(2, 2).unwrap();
        pm.fill_rect(Vec2::ZERO, Vec2::splat(2.0), Rgba::new(1.0, 0.0, 0.0, 0.5));
        let img = pm.to_image();
        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 128]);
    }
}
