//! Time-gated enemy and meteor spawning

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Enemy, Meteor};
use crate::tuning::Tuning;

/// Creates enemies and meteors at fixed intervals along the top edge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    pub enemy_interval_ms: f64,
    pub meteor_interval_ms: f64,
    entity_size: f32,
    oscillation_speed: f32,
    oscillation_chance: f64,
    meteor_max_drift: f32,
    last_enemy_spawn: Option<f64>,
    last_meteor_spawn: Option<f64>,
}

impl Spawner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            enemy_interval_ms: tuning.enemy_spawn_interval_ms,
            meteor_interval_ms: tuning.meteor_spawn_interval_ms(),
            entity_size: tuning.entity_size,
            oscillation_speed: tuning.enemy_oscillation_speed,
            oscillation_chance: tuning.enemy_oscillation_chance,
            meteor_max_drift: tuning.meteor_max_drift,
            last_enemy_spawn: None,
            last_meteor_spawn: None,
        }
    }

    /// Forget spawn history; the next attempts succeed immediately
    pub fn reset(&mut self) {
        self.last_enemy_spawn = None;
        self.last_meteor_spawn = None;
    }

    pub fn last_enemy_spawn(&self) -> Option<f64> {
        self.last_enemy_spawn
    }

    pub fn last_meteor_spawn(&self) -> Option<f64> {
        self.last_meteor_spawn
    }

    /// Spawn an enemy if the enemy interval has elapsed
    pub fn try_spawn_enemy<R: Rng + ?Sized>(
        &mut self,
        now: f64,
        canvas_width: f32,
        enemy_speed: f32,
        rng: &mut R,
    ) -> Option<Enemy> {
        if !interval_elapsed(self.last_enemy_spawn, now, self.enemy_interval_ms) {
            return None;
        }

        let x = random_x(rng, canvas_width, self.entity_size);
        let oscillation = if rng.random_bool(self.oscillation_chance) {
            self.oscillation_speed
        } else {
            0.0
        };
        let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };

        let mut enemy = Enemy::new(
            Vec2::new(x, 0.0),
            self.entity_size,
            enemy_speed,
            oscillation,
            direction,
        );
        enemy.hue = rng.random::<f32>() * 360.0;

        self.last_enemy_spawn = Some(now);
        log::debug!("Enemy spawned at x={:.1} (oscillation {})", x, oscillation);
        Some(enemy)
    }

    /// Spawn a meteor if the (longer) meteor interval has elapsed
    pub fn try_spawn_meteor<R: Rng + ?Sized>(
        &mut self,
        now: f64,
        canvas_width: f32,
        speed: f32,
        rng: &mut R,
    ) -> Option<Meteor> {
        if !interval_elapsed(self.last_meteor_spawn, now, self.meteor_interval_ms) {
            return None;
        }

        let x = random_x(rng, canvas_width, self.entity_size);
        let drift = if self.meteor_max_drift > 0.0 {
            rng.random_range(-self.meteor_max_drift..=self.meteor_max_drift)
        } else {
            0.0
        };

        self.last_meteor_spawn = Some(now);
        log::debug!("Meteor spawned at x={:.1} (drift {:.2})", x, drift);
        Some(Meteor::new(Vec2::new(x, 0.0), self.entity_size, speed, drift))
    }
}

fn interval_elapsed(last: Option<f64>, now: f64, interval: f64) -> bool {
    last.map(|t| now - t >= interval).unwrap_or(true)
}

/// Uniform x in `[0, canvas_width - size]` (0 when the canvas is too narrow)
fn random_x<R: Rng + ?Sized>(rng: &mut R, canvas_width: f32, size: f32) -> f32 {
    let max_x = canvas_width - size;
    if max_x > 0.0 {
        rng.random_range(0.0..=max_x)
    } else {
        0.0
    }
}
