//! Simulation module
//!
//! All gameplay logic lives here. It stays free of rendering and platform code:
//! - Time comes in as a millisecond timestamp from the host
//! - Randomness comes in as an injected RNG
//! - Movement is per tick (one tick per animation frame)

pub mod autopilot;
pub mod collision;
pub mod difficulty;
pub mod rect;
pub mod spawner;
pub mod state;
pub mod tick;

pub use autopilot::demo_input;
pub use collision::{CollisionReport, intersects, resolve_collisions};
pub use difficulty::{DifficultyController, DifficultyLevel};
pub use rect::Rect;
pub use spawner::Spawner;
pub use state::{
    Bullet, BulletOwner, CanvasBounds, Enemy, Entity, GameEvent, GamePhase, GameState, Meteor,
    Player, PlayerHit, Star,
};
pub use tick::{TickInput, tick};
