//! Orb Shooter - a browser arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, input, collisions)
//! - `renderer`: Drawing surface abstraction and the Canvas 2D backend
//! - `tuning`: Data-driven game balance
//! - `ui`: Overlay/HUD text for each session phase

pub mod color;
pub mod renderer;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use color::Color;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Canvas size caps (pixels)
    pub const CANVAS_MAX_WIDTH: f32 = 1280.0;
    pub const CANVAS_MAX_HEIGHT: f32 = 720.0;

    /// Share of the viewport the canvas may take
    pub const CANVAS_WIDTH_FRACTION: f32 = 0.95;
    pub const CANVAS_HEIGHT_FRACTION: f32 = 0.85;

    /// Frame rate assumed by headless runs (display refresh in the browser)
    pub const HEADLESS_FPS: u32 = 60;
}

/// Canvas size for a given viewport, fixed for the rest of the page's life
pub fn canvas_size(viewport_w: f32, viewport_h: f32) -> Vec2 {
    use consts::*;
    Vec2::new(
        (viewport_w * CANVAS_WIDTH_FRACTION).min(CANVAS_MAX_WIDTH),
        (viewport_h * CANVAS_HEIGHT_FRACTION).min(CANVAS_MAX_HEIGHT),
    )
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Velocity of magnitude `speed` pointing from `from` toward `to`.
///
/// Coincident points give angle 0, i.e. straight along +x.
#[inline]
pub fn aim(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    let d = to - from;
    polar_to_cartesian(speed, d.y.atan2(d.x))
}
