//! Game state and core simulation types
//!
//! Everything a tick mutates lives in `GameState`. Entities share the `Entity`
//! contract: a bounding rect, a velocity, a one-tick `advance` and an alive check.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyController;
use super::rect::Rect;
use super::spawner::Spawner;
use crate::clamp_to_span;
use crate::tuning::Tuning;

/// Canvas size supplied by the host each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasBounds {
    pub width: f32,
    pub height: f32,
}

impl CanvasBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Player was hit; simulation frozen until restart
    GameOver,
}

/// What hit the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerHit {
    EnemyBullet,
    Enemy,
    Meteor,
}

/// Notable things that happened during a tick (drained by the host)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PlayerFired,
    EnemyFired,
    EnemySpawned,
    MeteorSpawned,
    EnemyDestroyed { points: u64 },
    MeteorDestroyed { points: u64 },
    /// A player bullet and an enemy bullet annihilated each other
    BulletsCancelled,
    DifficultyRaised {
        enemy_speed: f32,
        enemy_bullet_speed: f32,
    },
    GameOver { score: u64, cause: PlayerHit },
}

/// Shared entity contract
pub trait Entity {
    /// Bounding box used for collisions
    fn rect(&self) -> Rect;

    /// Displacement per tick
    fn velocity(&self) -> Vec2;

    /// Move one tick
    fn advance(&mut self, bounds: CanvasBounds);

    /// False once the entity has left the play area for good
    fn is_alive(&self, bounds: CanvasBounds) -> bool;
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal pixels per tick
    pub speed: f32,
    pub shoot_cooldown_ms: f64,
    /// Timestamp of the last shot (None = never fired)
    last_shot: Option<f64>,
}

impl Player {
    pub fn new(tuning: &Tuning, bounds: CanvasBounds) -> Self {
        let size = Vec2::splat(tuning.player_size);
        Self {
            pos: Self::start_position(tuning, bounds),
            size,
            speed: tuning.player_speed,
            shoot_cooldown_ms: tuning.player_shoot_cooldown_ms,
            last_shot: None,
        }
    }

    /// Bottom-center of the canvas
    pub fn start_position(tuning: &Tuning, bounds: CanvasBounds) -> Vec2 {
        Vec2::new(
            bounds.width / 2.0 - tuning.player_size / 2.0,
            bounds.height - tuning.player_start_offset_y,
        )
    }

    /// Put the ship back at its start position with guns ready
    pub fn reset(&mut self, tuning: &Tuning, bounds: CanvasBounds) {
        *self = Self::new(tuning, bounds);
    }

    /// Move by `direction * speed` (direction in -1..=1), staying on the canvas
    pub fn move_horizontal(&mut self, direction: f32, bounds: CanvasBounds) {
        self.pos.x = clamp_to_span(
            self.pos.x + direction * self.speed,
            0.0,
            bounds.width - self.size.x,
        );
    }

    /// Cooldown elapsed since the last shot
    pub fn can_shoot(&self, now: f64) -> bool {
        self.last_shot
            .map(|t| now - t >= self.shoot_cooldown_ms)
            .unwrap_or(true)
    }

    /// Fire from the top-center if the cooldown allows, starting a new cooldown
    pub fn shoot(&mut self, now: f64, tuning: &Tuning) -> Option<Bullet> {
        if !self.can_shoot(now) {
            return None;
        }
        self.last_shot = Some(now);
        Some(Bullet::player(self.rect().top_center(), tuning))
    }
}

impl Entity for Player {
    fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    fn velocity(&self) -> Vec2 {
        Vec2::ZERO
    }

    /// The ship only moves on input; this just re-clamps after a resize
    fn advance(&mut self, bounds: CanvasBounds) {
        self.move_horizontal(0.0, bounds);
    }

    fn is_alive(&self, _bounds: CanvasBounds) -> bool {
        true
    }
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// A projectile; travels straight up (player) or down (enemy)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub owner: BulletOwner,
}

impl Bullet {
    /// Player bullet centred on `muzzle` (top-center of the ship)
    pub fn player(muzzle: Vec2, tuning: &Tuning) -> Self {
        let size = Vec2::new(tuning.player_bullet_width, tuning.player_bullet_height);
        Self {
            pos: Vec2::new(muzzle.x - size.x / 2.0, muzzle.y),
            size,
            vel: Vec2::new(0.0, -tuning.player_bullet_speed),
            owner: BulletOwner::Player,
        }
    }

    /// Enemy bullet centred on `muzzle` (bottom-center of the enemy)
    pub fn enemy(muzzle: Vec2, speed: f32, tuning: &Tuning) -> Self {
        let size = Vec2::new(tuning.enemy_bullet_width, tuning.enemy_bullet_height);
        Self {
            pos: Vec2::new(muzzle.x - size.x / 2.0, muzzle.y),
            size,
            vel: Vec2::new(0.0, speed.abs()),
            owner: BulletOwner::Enemy,
        }
    }

    /// Enemy bullets follow the current difficulty
    pub fn set_speed(&mut self, speed: f32) {
        self.vel.y = match self.owner {
            BulletOwner::Player => -speed.abs(),
            BulletOwner::Enemy => speed.abs(),
        };
    }
}

impl Entity for Bullet {
    fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    fn velocity(&self) -> Vec2 {
        self.vel
    }

    fn advance(&mut self, _bounds: CanvasBounds) {
        self.pos += self.vel;
    }

    fn is_alive(&self, bounds: CanvasBounds) -> bool {
        match self.owner {
            BulletOwner::Player => self.pos.y >= 0.0,
            BulletOwner::Enemy => self.pos.y <= bounds.height,
        }
    }
}

/// A descending enemy ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical pixels per tick
    pub speed: f32,
    /// Horizontal pixels per tick (0 = no sideways motion)
    pub oscillation_speed: f32,
    /// +1 right, -1 left
    pub direction: f32,
    /// Eligible to take part in volleys
    pub can_shoot: bool,
    /// Hue in degrees, cosmetic only
    pub hue: f32,
}

impl Enemy {
    pub fn new(pos: Vec2, size: f32, speed: f32, oscillation_speed: f32, direction: f32) -> Self {
        Self {
            pos,
            size: Vec2::splat(size),
            speed,
            oscillation_speed,
            direction: if direction < 0.0 { -1.0 } else { 1.0 },
            can_shoot: true,
            hue: 0.0,
        }
    }

    pub fn oscillates(&self) -> bool {
        self.oscillation_speed != 0.0
    }

    /// Bullet from the bottom-center
    pub fn shoot(&self, bullet_speed: f32, tuning: &Tuning) -> Bullet {
        Bullet::enemy(self.rect().bottom_center(), bullet_speed, tuning)
    }
}

impl Entity for Enemy {
    fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    fn velocity(&self) -> Vec2 {
        Vec2::new(self.oscillation_speed * self.direction, self.speed)
    }

    fn advance(&mut self, bounds: CanvasBounds) {
        self.pos.y += self.speed;

        if self.oscillates() {
            self.pos.x += self.oscillation_speed * self.direction;
            // Only turn around when heading into an edge
            let at_left = self.pos.x <= 0.0 && self.direction < 0.0;
            let at_right = self.pos.x + self.size.x >= bounds.width && self.direction > 0.0;
            if at_left || at_right {
                self.direction = -self.direction;
            }
        }
    }

    fn is_alive(&self, bounds: CanvasBounds) -> bool {
        self.pos.y <= bounds.height
    }
}

/// A drifting rock; free to leave through either side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meteor {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
}

impl Meteor {
    pub fn new(pos: Vec2, size: f32, speed: f32, drift: f32) -> Self {
        Self {
            pos,
            size: Vec2::splat(size),
            vel: Vec2::new(drift, speed),
        }
    }
}

impl Entity for Meteor {
    fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    fn velocity(&self) -> Vec2 {
        self.vel
    }

    fn advance(&mut self, _bounds: CanvasBounds) {
        self.pos += self.vel;
    }

    fn is_alive(&self, bounds: CanvasBounds) -> bool {
        self.pos.y <= bounds.height
            && self.pos.x + self.size.x >= 0.0
            && self.pos.x <= bounds.width
    }
}

/// Background star (no gameplay effect)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    /// Centre
    pub pos: Vec2,
    /// Radius
    pub size: f32,
    pub speed: f32,
}

impl Star {
    /// Random star somewhere on the canvas
    pub fn random<R: Rng + ?Sized>(rng: &mut R, bounds: CanvasBounds) -> Self {
        Self {
            pos: Vec2::new(
                rng.random::<f32>() * bounds.width,
                rng.random::<f32>() * bounds.height,
            ),
            size: rng.random::<f32>() * 2.0 + 1.0,
            speed: rng.random::<f32>() * 2.0 + 1.0,
        }
    }
}

impl Entity for Star {
    fn rect(&self) -> Rect {
        Rect::new(
            self.pos.x - self.size,
            self.pos.y - self.size,
            self.size * 2.0,
            self.size * 2.0,
        )
    }

    fn velocity(&self) -> Vec2 {
        Vec2::new(0.0, self.speed)
    }

    /// Falls, wrapping back to the top
    fn advance(&mut self, bounds: CanvasBounds) {
        self.pos.y += self.speed;
        if self.pos.y > bounds.height {
            self.pos.y = 0.0;
        }
    }

    fn is_alive(&self, _bounds: CanvasBounds) -> bool {
        true
    }
}

/// Complete world state for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Balance numbers this state was built with
    pub tuning: Tuning,
    /// Current phase
    pub phase: GamePhase,
    /// Score (only ever increases within a run)
    pub score: u64,
    /// Simulation tick counter (running ticks only)
    pub time_ticks: u64,
    pub player: Player,
    /// Player bullets
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub meteors: Vec<Meteor>,
    /// Background stars (survive restarts)
    pub stars: Vec<Star>,
    pub spawner: Spawner,
    pub difficulty: DifficultyController,
    /// Shared enemy volley timer (None = never fired)
    pub last_enemy_shot: Option<f64>,
    /// Events produced since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh running world with a random starfield
    pub fn new<R: Rng + ?Sized>(tuning: Tuning, bounds: CanvasBounds, rng: &mut R) -> Self {
        let tuning = tuning.validated();
        let stars = (0..tuning.star_count)
            .map(|_| Star::random(rng, bounds))
            .collect();

        Self {
            phase: GamePhase::Running,
            score: 0,
            time_ticks: 0,
            player: Player::new(&tuning, bounds),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            enemies: Vec::new(),
            meteors: Vec::new(),
            stars,
            spawner: Spawner::new(&tuning),
            difficulty: DifficultyController::new(&tuning),
            last_enemy_shot: None,
            events: Vec::new(),
            tuning,
        }
    }

    /// Reset everything transient; stars persist
    pub fn restart(&mut self, bounds: CanvasBounds) {
        self.score = 0;
        self.time_ticks = 0;
        self.bullets.clear();
        self.enemy_bullets.clear();
        self.enemies.clear();
        self.meteors.clear();
        self.player.reset(&self.tuning, bounds);
        self.spawner.reset();
        self.difficulty.reset();
        self.last_enemy_shot = None;
        self.events.clear();
        self.phase = GamePhase::Running;
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Enter GameOver (idempotent: only the first call records an event)
    pub fn trigger_game_over(&mut self, cause: PlayerHit) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver {
            score: self.score,
            cause,
        });
        log::info!("Game over ({:?}), final score {}", cause, self.score);
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
