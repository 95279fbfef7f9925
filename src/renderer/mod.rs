//! Drawing surfaces
//!
//! The simulation only ever fades the whole frame and fills circles, so a
//! surface is those two operations. The browser draws to a Canvas 2D context;
//! headless runs use [`NullSurface`].

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

use glam::Vec2;

use crate::color::Color;

/// Target of per-frame drawing
pub trait Surface {
    /// Paint translucent black over the whole surface (motion trails)
    fn fade(&mut self, alpha: f32);

    /// Fill a circle
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
}

/// Surface that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn fade(&mut self, _alpha: f32) {}

    fn fill_circle(&mut self, _center: Vec2, _radius: f32, _color: Color) {}
}
