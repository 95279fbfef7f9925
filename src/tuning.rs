//! Data-driven game balance
//!
//! Defaults are the shipped values. A page may embed a JSON document to
//! override any subset of them; unknown or malformed documents fall back to
//! the defaults with a warning.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Gameplay tuning, all distances in canvas pixels and speeds in pixels/frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player_radius: f32,
    pub player_speed: f32,
    pub player_color: Color,

    pub projectile_radius: f32,
    pub projectile_speed: f32,
    pub projectile_color: Color,

    /// Lower bound inclusive, upper bound exclusive
    pub enemy_radius_min: f32,
    pub enemy_radius_max: f32,
    pub enemy_speed: f32,
    pub enemy_saturation: f32,
    pub enemy_lightness: f32,

    /// Wall-clock spawn period
    pub spawn_interval_ms: u32,
    pub points_per_kill: u64,

    /// Circles touch once their gap drops below this
    pub contact_epsilon: f32,
    /// Alpha of the black fade painted over each frame
    pub trail_alpha: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_radius: 15.0,
            player_speed: 5.0,
            player_color: Color::CYAN,

            projectile_radius: 5.0,
            projectile_speed: 7.0,
            projectile_color: Color::WHITE,

            enemy_radius_min: 10.0,
            enemy_radius_max: 30.0,
            enemy_speed: 0.8,
            enemy_saturation: 50.0,
            enemy_lightness: 50.0,

            spawn_interval_ms: 1000,
            points_per_kill: 100,

            contact_epsilon: 1.0,
            trail_alpha: 0.1,
        }
    }
}

/// Why a tuning document was rejected
#[derive(Debug)]
pub enum TuningError {
    Parse(serde_json::Error),
    Invalid(&'static str),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "malformed tuning JSON: {e}"),
            TuningError::Invalid(what) => write!(f, "invalid tuning: {what}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(e) => Some(e),
            TuningError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

impl Tuning {
    /// Parse and validate an override document
    pub fn parse(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Tuning from an optional override document, defaults on any problem
    pub fn load(json: Option<&str>) -> Self {
        let Some(json) = json.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::default();
        };
        match Self::parse(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("{e}; using default tuning");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.player_radius) || !positive(self.projectile_radius) {
            return Err(TuningError::Invalid("radii must be positive"));
        }
        if !positive(self.enemy_radius_min) || !(self.enemy_radius_max > self.enemy_radius_min) {
            return Err(TuningError::Invalid("enemy radius range must be positive and non-empty"));
        }
        if !positive(self.player_speed) || !positive(self.projectile_speed) || !positive(self.enemy_speed) {
            return Err(TuningError::Invalid("speeds must be positive"));
        }
        if self.spawn_interval_ms == 0 {
            return Err(TuningError::Invalid("spawn interval must be non-zero"));
        }
        if !(0.0..=1.0).contains(&self.trail_alpha) {
            return Err(TuningError::Invalid("trail alpha must be within [0, 1]"));
        }
        Ok(())
    }

    pub fn enemy_radius_range(&self) -> Range<f32> {
        self.enemy_radius_min..self.enemy_radius_max
    }
}
