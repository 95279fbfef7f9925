//! Canvas 2D backend

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::Surface;
use crate::color::Color;

/// A canvas sized once at creation
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    pub size: Vec2,
}

impl CanvasSurface {
    /// Resize `canvas` to `size` and grab its 2D context
    pub fn new(canvas: &HtmlCanvasElement, size: Vec2) -> Result<Self, JsValue> {
        canvas.set_width(size.x as u32);
        canvas.set_height(size.y as u32);
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { ctx, size })
    }

    /// Opaque black, used before the first session starts
    pub fn clear(&mut self) {
        self.ctx.set_fill_style_str("#000");
        self.ctx
            .fill_rect(0.0, 0.0, self.size.x as f64, self.size.y as f64);
    }
}

impl Surface for CanvasSurface {
    fn fade(&mut self, alpha: f32) {
        self.ctx
            .set_fill_style_str(&format!("rgba(0, 0, 0, {alpha})"));
        self.ctx
            .fill_rect(0.0, 0.0, self.size.x as f64, self.size.y as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.ctx.begin_path();
        // Only fails for negative radii
        if self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
            .is_err()
        {
            log::warn!("Skipped circle with radius {radius}");
            return;
        }
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }
}
