use folio_core::paint::{GradientStop, Painter};
use folio_core::Rgba;
use glam::Vec2;
use std::f64::consts::TAU;
use wasm_bindgen::JsCast;
use web_sys as web;

/// [`Painter`] over a 2D canvas context. Coordinates are CSS pixels; the
/// device pixel ratio is folded into the context transform by [`resize`](Self::resize).
pub struct CanvasPainter {
    ctx: web::CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasPainter {
    pub fn new(canvas: &web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| anyhow::anyhow!("getContext('2d') failed: {:?}", e))?
            .ok_or_else(|| anyhow::anyhow!("2D canvas context unavailable"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        Ok(Self {
            ctx,
            width: 0.0,
            height: 0.0,
        })
    }

    /// Records the logical size and reapplies the DPR scale. Must follow every
    /// backing-store resize, which resets the context state.
    pub fn resize(&mut self, width: f32, height: f32, dpr: f64) {
        self.width = width as f64;
        self.height = height as f64;
        if let Err(e) = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0) {
            log::warn!("canvas transform not applied: {:?}", e);
        }
    }

    fn radial(&self, center: Vec2, radius: f32, stops: &[GradientStop]) -> Option<web::CanvasGradient> {
        let (x, y, r) = (center.x as f64, center.y as f64, radius as f64);
        let gradient = self.ctx.create_radial_gradient(x, y, 0.0, x, y, r).ok()?;
        for stop in stops {
            _ = gradient.add_color_stop(stop.offset.clamp(0.0, 1.0), &stop.color.to_css());
        }
        Some(gradient)
    }

    fn disc(&self, center: Vec2, radius: f32) -> bool {
        self.ctx.begin_path();
        self.ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
            .is_ok()
    }
}

impl Painter for CanvasPainter {
    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if !(radius > 0.0) || !self.disc(center, radius) {
            return;
        }
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn fill_radial(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]) {
        if !(radius > 0.0) {
            return;
        }
        let Some(gradient) = self.radial(center, radius, stops) else {
            return;
        };
        if self.disc(center, radius) {
            self.ctx.set_fill_style_canvas_gradient(&gradient);
            self.ctx.fill();
        }
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
    }

    fn stroke_gradient_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        from_color: Rgba,
        to_color: Rgba,
        width: f32,
    ) {
        let gradient = self.ctx.create_linear_gradient(
            from.x as f64,
            from.y as f64,
            to.x as f64,
            to.y as f64,
        );
        _ = gradient.add_color_stop(0.0, &from_color.to_css());
        _ = gradient.add_color_stop(1.0, &to_color.to_css());
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.set_stroke_style_canvas_gradient(&gradient);
        self.ctx.set_line_width(width as f64);
        self.ctx.stroke();
    }
}
