//! Game state and core simulation types
//!
//! One `GameState` owns everything a session mutates: the player, both entity
//! collections, the score, the lifecycle phase and the spawn RNG.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::color::Color;
use crate::renderer::Surface;
use crate::tuning::Tuning;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Page loaded, no session started yet
    Idle,
    /// Loop and spawner active
    Running,
    /// Player was hit; waiting for restart
    Stopped,
}

/// Something a frame wants the outside world to know about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    EnemyDestroyed {
        enemy_id: u32,
        projectile_id: u32,
        points: u64,
    },
    GameOver {
        final_score: u64,
    },
}

/// The player-controlled circle
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Color,
    /// Pixels moved per frame per held key
    pub speed: f32,
}

impl Player {
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos,
            radius: tuning.player_radius,
            color: tuning.player_color,
            speed: tuning.player_speed,
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.fill_circle(self.pos, self.radius, self.color);
    }

    /// Move by `dir * speed`, keeping the whole circle inside `bounds`
    pub fn step(&mut self, dir: Vec2, bounds: Vec2) {
        let min = Vec2::splat(self.radius);
        let max = (bounds - min).max(min);
        self.pos = (self.pos + dir * self.speed).clamp(min, max);
    }
}

/// A shot fired by the player
#[derive(Debug, Clone, Serialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub color: Color,
    pub vel: Vec2,
}

impl Projectile {
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.fill_circle(self.pos, self.radius, self.color);
    }

    /// Draw at the current position, then advance one frame
    pub fn update<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.draw(surface);
        self.pos += self.vel;
    }

    /// Entirely outside the canvas on some side
    pub fn is_offscreen(&self, bounds: Vec2) -> bool {
        self.pos.x + self.radius < 0.0
            || self.pos.x - self.radius > bounds.x
            || self.pos.y + self.radius < 0.0
            || self.pos.y - self.radius > bounds.y
    }
}

/// A drifting orb; its velocity is fixed at spawn
#[derive(Debug, Clone, Serialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub color: Color,
    pub vel: Vec2,
}

impl Enemy {
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.fill_circle(self.pos, self.radius, self.color);
    }

    /// Draw at the current position, then advance one frame
    pub fn update<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.draw(surface);
        self.pos += self.vel;
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub tuning: Tuning,
    /// Canvas size, fixed for the life of the page
    pub bounds: Vec2,
    pub phase: GamePhase,
    pub score: u64,
    pub player: Player,
    /// Draw order is insertion order
    pub projectiles: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    /// Frames run in the current session
    pub time_ticks: u64,
    next_id: u32,
}

impl GameState {
    /// Idle state with the player parked at the canvas center
    pub fn new(seed: u64, bounds: Vec2, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(bounds / 2.0, &tuning),
            tuning,
            bounds,
            phase: GamePhase::Idle,
            score: 0,
            projectiles: Vec::new(),
            enemies: Vec::new(),
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Begin a fresh session from any phase
    pub fn start(&mut self) {
        self.player = Player::new(self.bounds / 2.0, &self.tuning);
        self.projectiles.clear();
        self.enemies.clear();
        self.score = 0;
        self.time_ticks = 0;
        self.phase = GamePhase::Running;
        log::info!("Session started (seed {}, canvas {}x{})", self.seed, self.bounds.x, self.bounds.y);
    }

    /// End the session. Returns false if it was not running.
    pub fn stop(&mut self) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        self.phase = GamePhase::Stopped;
        log::info!("Game over - final score {}", self.score);
        true
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }
}
