//! Enemy spawning
//!
//! The spawner runs on its own wall-clock interval, independent of the frame
//! loop. Each call places one enemy just beyond a random canvas edge, aimed
//! at wherever the player is right now.

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, GameState};
use crate::aim;
use crate::color::Color;

/// Position just outside one canvas edge for a circle of `radius`
pub fn spawn_point<R: Rng + ?Sized>(rng: &mut R, bounds: Vec2, radius: f32) -> Vec2 {
    if rng.random_bool(0.5) {
        // Left or right edge
        let x = if rng.random_bool(0.5) { -radius } else { bounds.x + radius };
        Vec2::new(x, rng.random_range(0.0..bounds.y))
    } else {
        // Top or bottom edge
        let y = if rng.random_bool(0.5) { -radius } else { bounds.y + radius };
        Vec2::new(rng.random_range(0.0..bounds.x), y)
    }
}

/// Spawn one enemy. Returns its id, or `None` when no session is running.
pub fn spawn_enemy(state: &mut GameState) -> Option<u32> {
    if !state.is_running() {
        return None;
    }

    let bounds = state.bounds;
    let target = state.player.pos;
    let tuning = state.tuning.clone();

    let rng = state.rng();
    let radius = rng.random_range(tuning.enemy_radius_range());
    let pos = spawn_point(rng, bounds, radius);
    let hue = rng.random_range(0.0..360.0);

    let id = state.next_entity_id();
    let enemy = Enemy {
        id,
        pos,
        radius,
        color: Color::hsl(hue, tuning.enemy_saturation, tuning.enemy_lightness),
        vel: aim(pos, target, tuning.enemy_speed),
    };
    log::debug!("Spawned enemy {} r={:.1} at ({:.0}, {:.0})", id, radius, pos.x, pos.y);
    state.enemies.push(enemy);
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn running_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Vec2::new(800.0, 600.0), Tuning::default());
        state.start();
        state
    }

    /// Outside the canvas on exactly one axis
    fn outside_on_one_axis(pos: Vec2, bounds: Vec2) -> bool {
        let out_x = pos.x < 0.0 || pos.x > bounds.x;
        let out_y = pos.y < 0.0 || pos.y > bounds.y;
        out_x != out_y
    }

    #[test]
    fn test_spawn_requires_running() {
        let mut state = GameState::new(1, Vec2::new(800.0, 600.0), Tuning::default());
        assert_eq!(spawn_enemy(&mut state), None);
        state.start();
        assert!(spawn_enemy(&mut state).is_some());
        state.stop();
        assert_eq!(spawn_enemy(&mut state), None);
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_enemy_aims_at_player_at_spawn() {
        let mut state = running_state(42);
        spawn_enemy(&mut state);
        let enemy = state.enemies[0].clone();

        assert!((enemy.vel.length() - 0.8).abs() < 1e-5);
        let to_player = (state.player.pos - enemy.pos).normalize();
        assert!(enemy.vel.normalize().dot(to_player) > 0.9999);
        assert!(matches!(enemy.color, Color::Hsl { s, l, .. } if s == 50.0 && l == 50.0));
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let mut a = running_state(99);
        let mut b = running_state(99);
        for _ in 0..10 {
            spawn_enemy(&mut a);
            spawn_enemy(&mut b);
        }
        for (ea, eb) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(ea.pos, eb.pos);
            assert_eq!(ea.radius, eb.radius);
        }
    }

    proptest! {
        #[test]
        fn prop_spawn_radius_and_position(seed in any::<u64>(), count in 1usize..40) {
            let mut state = running_state(seed);
            for _ in 0..count {
                spawn_enemy(&mut state);
            }
            prop_assert_eq!(state.enemies.len(), count);
            for enemy in &state.enemies {
                prop_assert!(enemy.radius >= 10.0 && enemy.radius < 30.0);
                prop_assert!(enemy.pos.is_finite());
                prop_assert!(outside_on_one_axis(enemy.pos, state.bounds));
            }
        }

        #[test]
        fn prop_spawn_point_hugs_an_edge(
            seed in any::<u64>(),
            w in 50.0f32..2000.0,
            h in 50.0f32..2000.0,
            radius in 1.0f32..40.0,
        ) {
            use rand::SeedableRng;
            let mut rng = rand_pcg::Pcg32::seed_from_u64(seed);
            let bounds = Vec2::new(w, h);
            let p = spawn_point(&mut rng, bounds, radius);
            prop_assert!(outside_on_one_axis(p, bounds));
            let on_edge = p.x == -radius || p.x == w + radius || p.y == -radius || p.y == h + radius;
            prop_assert!(on_edge);
        }
    }
}
