//! Per-frame simulation tick
//!
//! Speeds are in pixels per tick, so the game runs at the host's frame rate.
//! Cooldowns and spawn intervals are wall-clock deadlines checked against `now`.

use rand::Rng;

use super::collision::resolve_collisions;
use super::state::{CanvasBounds, Entity, GameEvent, GamePhase, GameState};
use crate::consts::{ENEMY_KILL_SCORE, METEOR_KILL_SCORE};

/// Input snapshot for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Move left (held)
    pub left: bool,
    /// Move right (held)
    pub right: bool,
    /// Fire (held; rate limited by the ship's cooldown)
    pub shoot: bool,
    /// Confirm / restart (edge triggered by the host)
    pub confirm: bool,
}

impl TickInput {
    /// -1, 0 or +1
    pub fn horizontal(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Advance the game state by one frame
///
/// `now` is a millisecond timestamp from the host clock. Does nothing once the
/// game is over; the session decides when to restart.
pub fn tick<R: Rng + ?Sized>(
    state: &mut GameState,
    input: &TickInput,
    now: f64,
    bounds: CanvasBounds,
    rng: &mut R,
) {
    if state.phase != GamePhase::Running {
        return;
    }

    state.time_ticks += 1;
    let tuning = state.tuning.clone();

    // Player movement
    state.player.move_horizontal(input.horizontal(), bounds);

    // Player fire
    if input.shoot {
        if let Some(bullet) = state.player.shoot(now, &tuning) {
            state.bullets.push(bullet);
            state.events.push(GameEvent::PlayerFired);
        }
    }

    // Advance everything
    let speeds = state.difficulty.current();
    state.player.advance(bounds);
    for bullet in &mut state.bullets {
        bullet.advance(bounds);
    }
    for bullet in &mut state.enemy_bullets {
        bullet.set_speed(speeds.enemy_bullet_speed);
        bullet.advance(bounds);
    }
    for enemy in &mut state.enemies {
        enemy.speed = speeds.enemy_speed;
        enemy.advance(bounds);
    }
    for meteor in &mut state.meteors {
        meteor.advance(bounds);
    }
    for star in &mut state.stars {
        star.advance(bounds);
    }

    // Enemy volley: one shared timer, first successful roll fires
    let volley_ready = state
        .last_enemy_shot
        .map(|t| now - t >= tuning.enemy_volley_cooldown_ms)
        .unwrap_or(true);
    if volley_ready {
        for enemy in state.enemies.iter().filter(|e| e.can_shoot) {
            if rng.random_bool(tuning.enemy_fire_chance) {
                state
                    .enemy_bullets
                    .push(enemy.shoot(speeds.enemy_bullet_speed, &tuning));
                state.last_enemy_shot = Some(now);
                state.events.push(GameEvent::EnemyFired);
                break;
            }
        }
    }

    // Cull whatever left the play area
    state.bullets.retain(|b| b.is_alive(bounds));
    state.enemy_bullets.retain(|b| b.is_alive(bounds));
    state.enemies.retain(|e| e.is_alive(bounds));
    state.meteors.retain(|m| m.is_alive(bounds));

    // Collisions
    let report = resolve_collisions(state);
    for _ in 0..report.enemies_destroyed {
        state.score += ENEMY_KILL_SCORE;
        state.events.push(GameEvent::EnemyDestroyed {
            points: ENEMY_KILL_SCORE,
        });
    }
    for _ in 0..report.meteors_destroyed {
        state.score += METEOR_KILL_SCORE;
        state.events.push(GameEvent::MeteorDestroyed {
            points: METEOR_KILL_SCORE,
        });
    }
    for _ in 0..report.bullets_cancelled {
        state.events.push(GameEvent::BulletsCancelled);
    }
    if let Some(cause) = report.player_hit {
        state.trigger_game_over(cause);
        return;
    }

    // Spawning
    if let Some(enemy) = state
        .spawner
        .try_spawn_enemy(now, bounds.width, speeds.enemy_speed, rng)
    {
        state.enemies.push(enemy);
        state.events.push(GameEvent::EnemySpawned);
    }
    if let Some(meteor) = state
        .spawner
        .try_spawn_meteor(now, bounds.width, speeds.enemy_speed, rng)
    {
        state.meteors.push(meteor);
        state.events.push(GameEvent::MeteorSpawned);
    }

    // Difficulty
    let before = state.difficulty.current();
    let after = state.difficulty.adjust(state.score);
    if after != before {
        state.events.push(GameEvent::DifficultyRaised {
            enemy_speed: after.enemy_speed,
            enemy_bullet_speed: after.enemy_bullet_speed,
        });
    }
}
