//! Circle-circle contact tests

use glam::Vec2;

/// Gap between two circle edges (negative when overlapping)
#[inline]
pub fn circle_gap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> f32 {
    a.distance(b) - a_radius - b_radius
}

/// Two circles count as touching once their gap drops below `epsilon`.
///
/// With a positive epsilon, entities collide slightly before geometric
/// contact, which absorbs per-frame movement overshoot.
#[inline]
pub fn circles_touch(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32, epsilon: f32) -> bool {
    circle_gap(a, a_radius, b, b_radius) < epsilon
}
