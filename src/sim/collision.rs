//! Collision detection and resolution
//!
//! Everything is an axis-aligned box, so detection is a single overlap test.
//! Resolution runs the passes in a fixed order and defers removals until a pass
//! group is done, so an entity consumed once is never tested again in the same
//! tick.

use super::rect::Rect;
use super::state::{Entity, GameState, PlayerHit};

/// Strict AABB overlap (touching edges don't count)
#[inline]
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

/// Result of running every collision pass for one tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Player bullet × enemy hits
    pub enemies_destroyed: u32,
    /// Player bullet × meteor hits
    pub meteors_destroyed: u32,
    /// Player bullet × enemy bullet hits
    pub bullets_cancelled: u32,
    /// First thing found touching the player, if any
    pub player_hit: Option<PlayerHit>,
}

/// Pair every unconsumed `a` with the first unconsumed `b` it overlaps.
///
/// Marks both sides consumed and returns the number of pairs.
fn consume_pairs<A: Entity, B: Entity>(
    a: &[A],
    a_consumed: &mut [bool],
    b: &[B],
    b_consumed: &mut [bool],
) -> u32 {
    let mut hits = 0;
    for (i, first) in a.iter().enumerate() {
        if a_consumed[i] {
            continue;
        }
        let first_rect = first.rect();
        let target = b
            .iter()
            .enumerate()
            .find(|(j, second)| !b_consumed[*j] && intersects(&first_rect, &second.rect()));
        if let Some((j, _)) = target {
            a_consumed[i] = true;
            b_consumed[j] = true;
            hits += 1;
        }
    }
    hits
}

/// Drop every element whose flag is set
fn remove_consumed<T>(items: &mut Vec<T>, consumed: &[bool]) {
    let mut flags = consumed.iter();
    items.retain(|_| !flags.next().copied().unwrap_or(false));
}

/// Does anything in `items` overlap `target`?
fn any_hits<T: Entity>(items: &[T], target: &Rect) -> bool {
    items.iter().any(|item| intersects(&item.rect(), target))
}

/// Run the collision passes in order:
///
/// 1. player bullets × enemies
/// 2. player bullets × meteors
/// 3. player bullets × enemy bullets
/// 4. enemy bullets × player
/// 5. enemies × player
/// 6. meteors × player
///
/// Passes 1-3 remove what they hit; 4-6 stop at the first player hit. Score and
/// phase are left to the caller.
pub fn resolve_collisions(state: &mut GameState) -> CollisionReport {
    let mut report = CollisionReport::default();
    if state.bullets.is_empty()
        && state.enemy_bullets.is_empty()
        && state.enemies.is_empty()
        && state.meteors.is_empty()
    {
        return report;
    }

    let mut bullet_consumed = vec![false; state.bullets.len()];
    let mut enemy_consumed = vec![false; state.enemies.len()];
    let mut meteor_consumed = vec![false; state.meteors.len()];
    let mut enemy_bullet_consumed = vec![false; state.enemy_bullets.len()];

    report.enemies_destroyed = consume_pairs(
        &state.bullets,
        &mut bullet_consumed,
        &state.enemies,
        &mut enemy_consumed,
    );
    report.meteors_destroyed = consume_pairs(
        &state.bullets,
        &mut bullet_consumed,
        &state.meteors,
        &mut meteor_consumed,
    );
    report.bullets_cancelled = consume_pairs(
        &state.bullets,
        &mut bullet_consumed,
        &state.enemy_bullets,
        &mut enemy_bullet_consumed,
    );

    remove_consumed(&mut state.bullets, &bullet_consumed);
    remove_consumed(&mut state.enemies, &enemy_consumed);
    remove_consumed(&mut state.meteors, &meteor_consumed);
    remove_consumed(&mut state.enemy_bullets, &enemy_bullet_consumed);

    let player = state.player.rect();
    report.player_hit = if any_hits(&state.enemy_bullets, &player) {
        Some(PlayerHit::EnemyBullet)
    } else if any_hits(&state.enemies, &player) {
        Some(PlayerHit::Enemy)
    } else if any_hits(&state.meteors, &player) {
        Some(PlayerHit::Meteor)
    } else {
        None
    };

    report
}
