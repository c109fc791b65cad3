//! Sky Raider - a single-screen arcade shooter
//!
//! Core modules:
//! - `sim`: Per-frame simulation (entities, collisions, spawning, difficulty)
//! - `session`: Session lifecycle, game-over flow and render snapshots
//! - `highscores`: Top-5 leaderboard
//! - `persistence`: Key/value storage backends (LocalStorage on web, files on native)
//! - `platform`: Keyboard to action mapping
//! - `renderer`: Renderer seam, HUD text and the Canvas2D renderer
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScoreEntry, HighScores};
pub use session::{FrameSnapshot, GameSession, PendingHighScore};
pub use tuning::Tuning;

/// Game configuration constants (defaults for `Tuning`)
pub mod consts {
    /// Canvas size used by the native demo host
    pub const DEFAULT_CANVAS_WIDTH: f32 = 800.0;
    pub const DEFAULT_CANVAS_HEIGHT: f32 = 600.0;

    /// Player ship
    pub const PLAYER_SIZE: f32 = 50.0;
    pub const PLAYER_SPEED: f32 = 10.0;
    pub const PLAYER_SHOOT_COOLDOWN_MS: f64 = 200.0;
    /// Distance from the canvas bottom to the ship's top edge at start
    pub const PLAYER_START_OFFSET_Y: f32 = 100.0;

    /// Bullets
    pub const PLAYER_BULLET_SPEED: f32 = 5.0;
    pub const PLAYER_BULLET_WIDTH: f32 = 5.0;
    pub const PLAYER_BULLET_HEIGHT: f32 = 5.0;
    pub const ENEMY_BULLET_WIDTH: f32 = 5.0;
    pub const ENEMY_BULLET_HEIGHT: f32 = 10.0;

    /// Enemies and meteors
    pub const ENTITY_SIZE: f32 = 50.0;
    pub const ENEMY_SPAWN_INTERVAL_MS: f64 = 2000.0;
    /// Meteors spawn less often than enemies
    pub const METEOR_INTERVAL_FACTOR: f64 = 1.5;
    pub const ENEMY_OSCILLATION_SPEED: f32 = 2.0;
    pub const ENEMY_OSCILLATION_CHANCE: f64 = 0.5;
    pub const METEOR_MAX_DRIFT: f32 = 1.0;

    /// Shared enemy volley timer
    pub const ENEMY_VOLLEY_COOLDOWN_MS: f64 = 1000.0;
    pub const ENEMY_FIRE_CHANCE: f64 = 0.8;

    /// Difficulty ramp
    pub const BASE_ENEMY_SPEED: f32 = 3.0;
    pub const BASE_ENEMY_BULLET_SPEED: f32 = 4.0;
    pub const DIFFICULTY_STEP: f32 = 0.01;
    pub const DIFFICULTY_SCORE_THRESHOLD: u64 = 100;

    /// Points per kill
    pub const ENEMY_KILL_SCORE: u64 = 10;
    pub const METEOR_KILL_SCORE: u64 = 5;

    /// Background
    pub const STAR_COUNT: usize = 100;

    /// Game-over message stays up this long before the high-score table
    pub const GAME_OVER_MESSAGE_MS: f64 = 2000.0;
}

/// Clamp `value` into `[min, max]`, collapsing to `min` when the span is empty
/// (e.g. a canvas narrower than the entity).
#[inline]
pub fn clamp_to_span(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}
