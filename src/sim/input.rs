//! Input handling: held movement keys and click-to-shoot

use glam::Vec2;

use super::state::{GameState, Projectile};
use crate::aim;

/// A movement key the game listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKey {
    Up,
    Left,
    Down,
    Right,
}

impl MoveKey {
    /// Map a DOM `KeyboardEvent.key` value; anything else is ignored
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "w" => Some(MoveKey::Up),
            "a" => Some(MoveKey::Left),
            "s" => Some(MoveKey::Down),
            "d" => Some(MoveKey::Right),
            _ => None,
        }
    }
}

/// Held-key state read by every frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub left: bool,
    pub down: bool,
    pub right: bool,
}

impl TickInput {
    pub fn set(&mut self, key: MoveKey, held: bool) {
        match key {
            MoveKey::Up => self.up = held,
            MoveKey::Left => self.left = held,
            MoveKey::Down => self.down = held,
            MoveKey::Right => self.right = held,
        }
    }

    /// Key event by DOM name. Returns whether the key is one we track.
    pub fn handle_key(&mut self, key: &str, held: bool) -> bool {
        match MoveKey::from_key(key) {
            Some(k) => {
                self.set(k, held);
                true
            }
            None => false,
        }
    }

    /// Unnormalized direction: each held key contributes one axis step
    pub fn direction(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.up {
            dir.y -= 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir
    }
}

/// Fire a projectile from the player toward `target` (canvas coordinates).
///
/// Returns the new projectile's id, or `None` when no session is running.
pub fn fire_at(state: &mut GameState, target: Vec2) -> Option<u32> {
    if !state.is_running() {
        return None;
    }
    let id = state.next_entity_id();
    let origin = state.player.pos;
    state.projectiles.push(Projectile {
        id,
        pos: origin,
        radius: state.tuning.projectile_radius,
        color: state.tuning.projectile_color,
        vel: aim(origin, target, state.tuning.projectile_speed),
    });
    Some(id)
}
