//! Per-frame simulation step
//!
//! One call per displayed frame. Entities are drawn at their current position
//! and then advanced, so a frame shows where things were before it moved them.

use super::collision::circles_touch;
use super::input::TickInput;
use super::state::{GameEvent, GameState};
use crate::renderer::{NullSurface, Surface};

/// Advance one frame without drawing
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    frame(state, input, &mut NullSurface)
}

/// Advance one frame, drawing onto `surface` as entities are visited.
///
/// Does nothing unless the session is running. A player hit ends the frame
/// immediately: nothing else is scored, moved or removed afterwards.
pub fn frame<S: Surface + ?Sized>(
    state: &mut GameState,
    input: &TickInput,
    surface: &mut S,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !state.is_running() {
        return events;
    }
    state.time_ticks += 1;

    let epsilon = state.tuning.contact_epsilon;
    let bounds = state.bounds;

    surface.fade(state.tuning.trail_alpha);

    state.player.step(input.direction(), bounds);
    state.player.draw(surface);

    // Reverse order so removal never skips an element
    for i in (0..state.projectiles.len()).rev() {
        let projectile = &mut state.projectiles[i];
        projectile.update(surface);
        if projectile.is_offscreen(bounds) {
            state.projectiles.remove(i);
        }
    }

    for e in (0..state.enemies.len()).rev() {
        state.enemies[e].update(surface);
        let enemy = &state.enemies[e];

        if circles_touch(state.player.pos, state.player.radius, enemy.pos, enemy.radius, epsilon) {
            state.stop();
            events.push(GameEvent::GameOver {
                final_score: state.score,
            });
            return events;
        }

        // First projectile to touch wins; the enemy is gone after that
        let hit = (0..state.projectiles.len()).rev().find(|&p| {
            let projectile = &state.projectiles[p];
            circles_touch(projectile.pos, projectile.radius, enemy.pos, enemy.radius, epsilon)
        });
        if let Some(p) = hit {
            let points = state.tuning.points_per_kill;
            let enemy = state.enemies.remove(e);
            let projectile = state.projectiles.remove(p);
            state.score += points;
            log::debug!("Enemy {} destroyed by projectile {} (+{})", enemy.id, projectile.id, points);
            events.push(GameEvent::EnemyDestroyed {
                enemy_id: enemy.id,
                projectile_id: projectile.id,
                points,
            });
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use proptest::prelude::*;

    use super::*;
    use crate::color::Color;
    use crate::sim::state::{Enemy, GamePhase, Projectile};
    use crate::sim::{fire_at, spawn_enemy};
    use crate::tuning::Tuning;

    fn running_state() -> GameState {
        let mut state = GameState::new(12345, Vec2::new(800.0, 600.0), Tuning::default());
        state.start();
        state
    }

    fn push_enemy(state: &mut GameState, pos: Vec2, radius: f32, vel: Vec2) -> u32 {
        let id = state.next_entity_id();
        state.enemies.push(Enemy {
            id,
            pos,
            radius,
            color: Color::hsl(0.0, 50.0, 50.0),
            vel,
        });
        id
    }

    fn push_projectile(state: &mut GameState, pos: Vec2, vel: Vec2) -> u32 {
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            id,
            pos,
            radius: 5.0,
            color: Color::WHITE,
            vel,
        });
        id
    }

    /// Records draw calls in order
    #[derive(Default)]
    struct Recorder {
        fades: Vec<f32>,
        circles: Vec<(Vec2, f32)>,
    }

    impl Surface for Recorder {
        fn fade(&mut self, alpha: f32) {
            self.fades.push(alpha);
        }

        fn fill_circle(&mut self, center: Vec2, radius: f32, _color: Color) {
            self.circles.push((center, radius));
        }
    }

    #[test]
    fn test_idle_ticks_change_nothing() {
        let mut state = running_state();
        let start = state.player.pos;
        for _ in 0..5 {
            assert!(tick(&mut state, &TickInput::default()).is_empty());
        }
        assert_eq!(state.score, 0);
        assert_eq!(state.player.pos, start);
        assert_eq!(state.time_ticks, 5);
    }

    #[test]
    fn test_not_running_is_noop() {
        let mut state = GameState::new(1, Vec2::new(800.0, 600.0), Tuning::default());
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.player.pos, Vec2::new(400.0, 300.0));
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_hold_right_moves_speed_per_tick() {
        let mut state = running_state();
        let x0 = state.player.pos.x;
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..20 {
            tick(&mut state, &input);
        }
        assert_eq!(state.player.pos.x, x0 + 5.0 * 20.0);
        assert_eq!(state.player.pos.y, 300.0);
    }

    #[test]
    fn test_player_stops_at_border() {
        let mut state = running_state();
        let input = TickInput {
            up: true,
            left: true,
            ..Default::default()
        };
        for _ in 0..200 {
            tick(&mut state, &input);
        }
        assert_eq!(state.player.pos, Vec2::splat(15.0));
    }

    #[test]
    fn test_draw_order_and_positions() {
        let mut state = running_state();
        push_projectile(&mut state, Vec2::new(100.0, 100.0), Vec2::new(7.0, 0.0));
        push_enemy(&mut state, Vec2::new(700.0, 500.0), 20.0, Vec2::new(0.0, 0.8));

        let mut recorder = Recorder::default();
        frame(&mut state, &TickInput::default(), &mut recorder);

        assert_eq!(recorder.fades, vec![0.1]);
        // Player, then projectile, then enemy, each at its pre-move position
        assert_eq!(recorder.circles[0], (Vec2::new(400.0, 300.0), 15.0));
        assert_eq!(recorder.circles[1], (Vec2::new(100.0, 100.0), 5.0));
        assert_eq!(recorder.circles[2], (Vec2::new(700.0, 500.0), 20.0));
        assert_eq!(state.projectiles[0].pos, Vec2::new(107.0, 100.0));
        assert!((state.enemies[0].pos - Vec2::new(700.0, 500.8)).length() < 1e-4);
    }

    #[test]
    fn test_offscreen_projectiles_culled() {
        let mut state = running_state();
        let keep = push_projectile(&mut state, Vec2::new(400.0, 100.0), Vec2::new(0.0, -7.0));
        push_projectile(&mut state, Vec2::new(798.0, 50.0), Vec2::new(7.0, 0.0));
        push_projectile(&mut state, Vec2::new(2.0, 50.0), Vec2::new(-7.0, 0.0));

        // Right: 805 - 5 = 800, left: -5 + 5 = 0, both still touching an edge
        tick(&mut state, &TickInput::default());
        assert_eq!(state.projectiles.len(), 3);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].id, keep);
    }

    #[test]
    fn test_projectile_kills_enemy() {
        let mut state = running_state();
        let enemy = push_enemy(&mut state, Vec2::new(600.0, 100.0), 20.0, Vec2::ZERO);
        let shot = push_projectile(&mut state, Vec2::new(570.0, 100.0), Vec2::new(7.0, 0.0));

        // Gap after move: 23 - 20 - 5 = -2
        let events = tick(&mut state, &TickInput::default());
        assert_eq!(
            events,
            vec![GameEvent::EnemyDestroyed {
                enemy_id: enemy,
                projectile_id: shot,
                points: 100,
            }]
        );
        assert_eq!(state.score, 100);
        assert!(state.enemies.is_empty());
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_first_hit_wins() {
        let mut state = running_state();
        push_enemy(&mut state, Vec2::new(600.0, 100.0), 20.0, Vec2::ZERO);
        let first = push_projectile(&mut state, Vec2::new(600.0, 120.0), Vec2::ZERO);
        let last = push_projectile(&mut state, Vec2::new(600.0, 80.0), Vec2::ZERO);

        let events = tick(&mut state, &TickInput::default());
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            GameEvent::EnemyDestroyed { projectile_id, .. } if projectile_id == last
        ));
        assert_eq!(state.score, 100);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].id, first);
    }

    #[test]
    fn test_one_projectile_per_enemy() {
        let mut state = running_state();
        push_enemy(&mut state, Vec2::new(600.0, 100.0), 20.0, Vec2::ZERO);
        push_enemy(&mut state, Vec2::new(200.0, 100.0), 20.0, Vec2::ZERO);
        push_projectile(&mut state, Vec2::new(600.0, 100.0), Vec2::ZERO);
        push_projectile(&mut state, Vec2::new(200.0, 100.0), Vec2::ZERO);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 200);
        assert!(state.enemies.is_empty());
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_coincident_centers_end_game() {
        let mut state = running_state();
        let center = state.player.pos;
        push_enemy(&mut state, center, 10.0, Vec2::ZERO);
        state.score = 700;

        let events = tick(&mut state, &TickInput::default());
        assert_eq!(events, vec![GameEvent::GameOver { final_score: 700 }]);
        assert_eq!(state.phase, GamePhase::Stopped);
    }

    #[test]
    fn test_game_over_freezes_state() {
        let mut state = running_state();
        push_enemy(&mut state, Vec2::new(100.0, 100.0), 20.0, Vec2::ZERO);
        push_projectile(&mut state, Vec2::new(100.0, 100.0), Vec2::ZERO);
        // Visited first, gap 30 - 15 - 15 = 0
        push_enemy(&mut state, Vec2::new(430.0, 300.0), 15.0, Vec2::ZERO);

        let events = tick(&mut state, &TickInput::default());
        assert_eq!(events, vec![GameEvent::GameOver { final_score: 0 }]);
        // The other enemy was not checked against the projectile
        assert_eq!(state.score, 0);
        assert_eq!(state.enemies.len(), 2);
        assert_eq!(state.projectiles.len(), 1);

        // Stopped sessions ignore ticks, spawns and clicks
        let ticks = state.time_ticks;
        assert!(tick(&mut state, &TickInput::default()).is_empty());
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(spawn_enemy(&mut state), None);
        assert_eq!(fire_at(&mut state, Vec2::ZERO), None);
        assert_eq!(state.enemies.len(), 2);
    }

    #[test]
    fn test_enemy_drifts_without_reaiming() {
        let mut state = running_state();
        spawn_enemy(&mut state);
        let vel = state.enemies[0].vel;
        let input = TickInput {
            down: true,
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut state, &input);
        }
        if let Some(enemy) = state.enemies.first() {
            assert_eq!(enemy.vel, vel);
        }
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut state = running_state();
        let center = state.player.pos;
        push_enemy(&mut state, center, 10.0, Vec2::ZERO);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Stopped);

        state.start();
        assert!(state.enemies.is_empty());
        assert!(tick(&mut state, &TickInput::default()).is_empty());
        assert!(state.is_running());
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>())
            .prop_map(|(up, left, down, right)| TickInput { up, left, down, right })
    }

    proptest! {
        #[test]
        fn prop_player_stays_inside(inputs in prop::collection::vec(arb_input(), 1..300)) {
            let mut state = running_state();
            for input in &inputs {
                tick(&mut state, input);
                let p = &state.player;
                prop_assert!(p.pos.x >= p.radius && p.pos.x <= state.bounds.x - p.radius);
                prop_assert!(p.pos.y >= p.radius && p.pos.y <= state.bounds.y - p.radius);
            }
        }

        #[test]
        fn prop_score_counts_kills(seed in any::<u64>(), frames in 1usize..600) {
            let mut state = GameState::new(seed, Vec2::new(800.0, 600.0), Tuning::default());
            state.start();
            let mut kills = 0u64;
            for f in 0..frames {
                if f % 60 == 0 {
                    spawn_enemy(&mut state);
                }
                if f % 15 == 0 {
                    if let Some(target) = state.enemies.first().map(|e| e.pos) {
                        fire_at(&mut state, target);
                    }
                }
                for event in tick(&mut state, &TickInput::default()) {
                    if let GameEvent::EnemyDestroyed { points, .. } = event {
                        prop_assert_eq!(points, 100);
                        kills += 1;
                    }
                }
                if !state.is_running() {
                    break;
                }
            }
            prop_assert_eq!(state.score, kills * 100);
            for enemy in &state.enemies {
                prop_assert!(enemy.radius > 0.0 && enemy.pos.is_finite());
            }
        }
    }
}
