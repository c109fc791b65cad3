//! Demo autopilot
//!
//! Produces a `TickInput` from the current world: sidestep anything falling
//! into the ship's lane, otherwise line up under the lowest enemy. Fires every
//! frame and lets the cooldown do the rate limiting.

use super::rect::Rect;
use super::state::{CanvasBounds, Entity, GameState};
use super::tick::TickInput;

/// How far above the ship threats are considered
const LOOKAHEAD: f32 = 250.0;
/// Extra clearance around the ship's lane
const LANE_MARGIN: f32 = 10.0;

/// Input for one demo frame
pub fn demo_input(state: &GameState, bounds: CanvasBounds) -> TickInput {
    let ship = state.player.rect();
    let lane = ship.inflate(LANE_MARGIN);

    let threats = state
        .enemy_bullets
        .iter()
        .map(Entity::rect)
        .chain(state.enemies.iter().map(Entity::rect))
        .chain(state.meteors.iter().map(Entity::rect));

    let nearest = threats
        .filter(|r| r.overlaps_x(&lane))
        .filter(|r| r.bottom() > ship.y - LOOKAHEAD && r.y < ship.bottom())
        .max_by(|a, b| a.bottom().total_cmp(&b.bottom()));

    let mut input = TickInput {
        shoot: true,
        ..Default::default()
    };

    if let Some(threat) = nearest {
        let go_right = dodge_right(&ship, &threat, bounds);
        input.right = go_right;
        input.left = !go_right;
        return input;
    }

    let target = state
        .enemies
        .iter()
        .map(Entity::rect)
        .max_by(|a, b| a.y.total_cmp(&b.y));
    if let Some(target) = target {
        let dx = target.center().x - ship.center().x;
        if dx.abs() > state.player.speed {
            input.right = dx > 0.0;
            input.left = dx < 0.0;
        }
    }

    input
}

/// Pick the escape direction away from `threat`, turning back at the walls
fn dodge_right(ship: &Rect, threat: &Rect, bounds: CanvasBounds) -> bool {
    let away_right = threat.center().x <= ship.center().x;
    let room_right = bounds.width - ship.right();
    let room_left = ship.x;
    if away_right && room_right < ship.width {
        false
    } else if !away_right && room_left < ship.width {
        true
    } else {
        away_right
    }
}
