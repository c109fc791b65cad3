//! Game balance tuning
//!
//! Persisted separately from high scores in the key/value store. Missing or
//! malformed data falls back to the defaults in `consts`.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::{KeyValueStore, StorageError};

/// All balance numbers the simulation reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub player_size: f32,
    pub player_speed: f32,
    /// Minimum time between player shots (ms)
    pub player_shoot_cooldown_ms: f64,
    pub player_start_offset_y: f32,
    pub player_bullet_speed: f32,
    pub player_bullet_width: f32,
    pub player_bullet_height: f32,

    // === Enemies & meteors ===
    pub entity_size: f32,
    pub enemy_spawn_interval_ms: f64,
    pub meteor_interval_factor: f64,
    pub enemy_oscillation_speed: f32,
    /// Probability that a fresh enemy bounces between the canvas edges
    pub enemy_oscillation_chance: f64,
    pub meteor_max_drift: f32,
    pub enemy_bullet_width: f32,
    pub enemy_bullet_height: f32,

    // === Enemy fire ===
    pub enemy_volley_cooldown_ms: f64,
    pub enemy_fire_chance: f64,

    // === Difficulty ===
    pub base_enemy_speed: f32,
    pub base_enemy_bullet_speed: f32,
    pub difficulty_step: f32,
    pub difficulty_score_threshold: u64,

    // === Presentation ===
    pub star_count: usize,
    pub game_over_message_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_size: PLAYER_SIZE,
            player_speed: PLAYER_SPEED,
            player_shoot_cooldown_ms: PLAYER_SHOOT_COOLDOWN_MS,
            player_start_offset_y: PLAYER_START_OFFSET_Y,
            player_bullet_speed: PLAYER_BULLET_SPEED,
            player_bullet_width: PLAYER_BULLET_WIDTH,
            player_bullet_height: PLAYER_BULLET_HEIGHT,

            entity_size: ENTITY_SIZE,
            enemy_spawn_interval_ms: ENEMY_SPAWN_INTERVAL_MS,
            meteor_interval_factor: METEOR_INTERVAL_FACTOR,
            enemy_oscillation_speed: ENEMY_OSCILLATION_SPEED,
            enemy_oscillation_chance: ENEMY_OSCILLATION_CHANCE,
            meteor_max_drift: METEOR_MAX_DRIFT,
            enemy_bullet_width: ENEMY_BULLET_WIDTH,
            enemy_bullet_height: ENEMY_BULLET_HEIGHT,

            enemy_volley_cooldown_ms: ENEMY_VOLLEY_COOLDOWN_MS,
            enemy_fire_chance: ENEMY_FIRE_CHANCE,

            base_enemy_speed: BASE_ENEMY_SPEED,
            base_enemy_bullet_speed: BASE_ENEMY_BULLET_SPEED,
            difficulty_step: DIFFICULTY_STEP,
            difficulty_score_threshold: DIFFICULTY_SCORE_THRESHOLD,

            star_count: STAR_COUNT,
            game_over_message_ms: GAME_OVER_MESSAGE_MS,
        }
    }
}

impl Tuning {
    /// Store key
    pub const STORAGE_KEY: &'static str = "tuning";

    /// Replace nonsensical values with their defaults
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        fn positive_f32(value: &mut f32, fallback: f32) {
            if !value.is_finite() || *value <= 0.0 {
                *value = fallback;
            }
        }
        fn non_negative_f32(value: &mut f32, fallback: f32) {
            if !value.is_finite() || *value < 0.0 {
                *value = fallback;
            }
        }
        fn non_negative_f64(value: &mut f64, fallback: f64) {
            if !value.is_finite() || *value < 0.0 {
                *value = fallback;
            }
        }
        fn probability(value: &mut f64, fallback: f64) {
            if !(0.0..=1.0).contains(value) {
                *value = fallback;
            }
        }

        positive_f32(&mut self.player_size, defaults.player_size);
        positive_f32(&mut self.player_speed, defaults.player_speed);
        non_negative_f64(&mut self.player_shoot_cooldown_ms, defaults.player_shoot_cooldown_ms);
        non_negative_f32(&mut self.player_start_offset_y, defaults.player_start_offset_y);
        positive_f32(&mut self.player_bullet_speed, defaults.player_bullet_speed);
        positive_f32(&mut self.player_bullet_width, defaults.player_bullet_width);
        positive_f32(&mut self.player_bullet_height, defaults.player_bullet_height);

        positive_f32(&mut self.entity_size, defaults.entity_size);
        non_negative_f64(&mut self.enemy_spawn_interval_ms, defaults.enemy_spawn_interval_ms);
        non_negative_f64(&mut self.meteor_interval_factor, defaults.meteor_interval_factor);
        non_negative_f32(&mut self.enemy_oscillation_speed, defaults.enemy_oscillation_speed);
        probability(&mut self.enemy_oscillation_chance, defaults.enemy_oscillation_chance);
        non_negative_f32(&mut self.meteor_max_drift, defaults.meteor_max_drift);
        positive_f32(&mut self.enemy_bullet_width, defaults.enemy_bullet_width);
        positive_f32(&mut self.enemy_bullet_height, defaults.enemy_bullet_height);

        non_negative_f64(&mut self.enemy_volley_cooldown_ms, defaults.enemy_volley_cooldown_ms);
        probability(&mut self.enemy_fire_chance, defaults.enemy_fire_chance);

        positive_f32(&mut self.base_enemy_speed, defaults.base_enemy_speed);
        positive_f32(&mut self.base_enemy_bullet_speed, defaults.base_enemy_bullet_speed);
        non_negative_f32(&mut self.difficulty_step, defaults.difficulty_step);
        if self.difficulty_score_threshold == 0 {
            self.difficulty_score_threshold = defaults.difficulty_score_threshold;
        }

        non_negative_f64(&mut self.game_over_message_ms, defaults.game_over_message_ms);
        self
    }

    /// Meteor spawn interval derived from the enemy interval
    pub fn meteor_spawn_interval_ms(&self) -> f64 {
        self.enemy_spawn_interval_ms * self.meteor_interval_factor
    }

    /// Load tuning from the store, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Tuning>(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from store");
                    return tuning.validated();
                }
                Err(e) => log::warn!("Discarding malformed tuning: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not read tuning: {}", e),
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Save tuning to the store
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(self).map_err(|e| StorageError::Serialize(e.to_string()))?;
        store.set_item(Self::STORAGE_KEY, &json)?;
        log::info!("Tuning saved");
        Ok(())
    }
}
