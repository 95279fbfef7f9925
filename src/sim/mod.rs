//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One call to `tick` per displayed frame
//! - Seeded RNG only
//! - Drawing goes through the `Surface` trait, never a platform type

pub mod collision;
pub mod input;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{circle_gap, circles_touch};
pub use input::{MoveKey, TickInput, fire_at};
pub use spawn::{spawn_enemy, spawn_point};
pub use state::{Enemy, GameEvent, GamePhase, GameState, Player, Projectile};
pub use tick::{frame, tick};
