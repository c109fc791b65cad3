//! End-to-end session flows against an in-memory store

use glam::Vec2;
use sky_raider::persistence::{KeyValueStore, MemoryStore};
use sky_raider::sim::{
    Bullet, CanvasBounds, Enemy, Entity, GameEvent, GamePhase, Meteor, PlayerHit, TickInput,
    demo_input,
};
use sky_raider::{GameSession, HighScoreEntry, HighScores, PendingHighScore, Tuning};

const BOUNDS: CanvasBounds = CanvasBounds {
    width: 800.0,
    height: 600.0,
};

fn seeded_table() -> MemoryStore {
    let mut store = MemoryStore::new();
    let table = HighScores::from_entries(
        [("A", 500), ("B", 400), ("C", 300), ("D", 200), ("E", 100)]
            .into_iter()
            .map(|(name, score)| HighScoreEntry {
                name: name.to_string(),
                score,
            })
            .collect(),
    );
    table.save(&mut store).unwrap();
    store
}

/// Put an enemy bullet just above the ship; it lands on the next tick
fn enemy_bullet_on_ship(session: &mut GameSession<MemoryStore>) {
    let ship = session.state().player.rect();
    let tuning = session.state().tuning.clone();
    session.state_mut().enemy_bullets.push(Bullet::enemy(
        Vec2::new(ship.center().x, ship.y - 5.0),
        4.0,
        &tuning,
    ));
}

fn names(table: &HighScores) -> Vec<&str> {
    table.entries.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn enemy_bullet_ends_run_and_freezes_world() {
    let mut session = GameSession::new(MemoryStore::new(), BOUNDS, 1);
    enemy_bullet_on_ship(&mut session);

    let events = session.tick(0.0, &TickInput::default(), BOUNDS);
    assert!(events.contains(&GameEvent::GameOver {
        score: 0,
        cause: PlayerHit::EnemyBullet
    }));
    assert_eq!(session.phase(), GamePhase::GameOver);

    let ticks = session.state().time_ticks;
    let ship = session.state().player.rect();
    let enemies: Vec<_> = session.state().enemies.iter().map(|e| e.pos).collect();
    let input = TickInput {
        left: true,
        shoot: true,
        ..Default::default()
    };
    for i in 1..=30 {
        let events = session.tick(i as f64 * 16.0, &input, BOUNDS);
        assert!(events.is_empty());
    }
    assert_eq!(session.state().time_ticks, ticks);
    assert_eq!(session.state().player.rect(), ship);
    let after: Vec<_> = session.state().enemies.iter().map(|e| e.pos).collect();
    assert_eq!(after, enemies);
    assert!(session.state().bullets.is_empty());
}

#[test]
fn qualifying_score_is_inserted_in_rank_order() {
    let mut session = GameSession::new(seeded_table(), BOUNDS, 2);
    session.state_mut().score = 250;
    enemy_bullet_on_ship(&mut session);
    session.tick(0.0, &TickInput::default(), BOUNDS);

    assert_eq!(
        session.pending_high_score(),
        Some(PendingHighScore { score: 250, rank: 4 })
    );
    assert_eq!(session.submit_name("F"), Some(4));
    assert_eq!(names(session.high_scores()), vec!["A", "B", "C", "F", "D"]);

    let stored = HighScores::load(session.store());
    assert_eq!(names(&stored), vec!["A", "B", "C", "F", "D"]);
    let scores: Vec<u64> = stored.entries.iter().map(|e| e.score).collect();
    assert_eq!(scores, vec![500, 400, 300, 250, 200]);
}

#[test]
fn low_score_on_full_table_is_not_prompted() {
    let mut session = GameSession::new(seeded_table(), BOUNDS, 3);
    session.state_mut().score = 100;
    enemy_bullet_on_ship(&mut session);
    session.tick(0.0, &TickInput::default(), BOUNDS);

    assert_eq!(session.phase(), GamePhase::GameOver);
    assert_eq!(session.pending_high_score(), None);
    assert_eq!(session.high_scores().len(), 5);
}

#[test]
fn blank_name_discards_entry() {
    let mut session = GameSession::new(seeded_table(), BOUNDS, 4);
    session.state_mut().score = 900;
    enemy_bullet_on_ship(&mut session);
    session.tick(0.0, &TickInput::default(), BOUNDS);

    assert!(session.pending_high_score().is_some());
    assert_eq!(session.submit_name(" \t "), None);
    let stored = HighScores::load(session.store());
    assert_eq!(names(&stored), vec!["A", "B", "C", "D", "E"]);
}

#[test]
fn malformed_table_is_treated_as_empty() {
    let mut store = MemoryStore::new();
    store.set_item(HighScores::STORAGE_KEY, "{not json").unwrap();
    let mut session = GameSession::new(store, BOUNDS, 5);
    assert!(session.high_scores().is_empty());

    session.state_mut().score = 5;
    enemy_bullet_on_ship(&mut session);
    session.tick(0.0, &TickInput::default(), BOUNDS);
    assert_eq!(
        session.pending_high_score(),
        Some(PendingHighScore { score: 5, rank: 1 })
    );
}

#[test]
fn confirm_restarts_with_clean_state() {
    let mut session = GameSession::new(MemoryStore::new(), BOUNDS, 6);
    let stars: Vec<_> = session.state().stars.iter().map(|s| s.pos).collect();

    let tuning = session.state().tuning.clone();
    {
        let state = session.state_mut();
        state.score = 140;
        state.player.pos.x = 20.0;
        // Rams the ship without firing first
        let mut enemy = Enemy::new(Vec2::new(20.0, 495.0), 50.0, 3.0, 0.0, 1.0);
        enemy.can_shoot = false;
        state.enemies.push(enemy);
        state
            .meteors
            .push(Meteor::new(Vec2::new(600.0, 10.0), 50.0, 3.0, 0.0));
        state
            .bullets
            .push(Bullet::player(Vec2::new(700.0, 300.0), &tuning));
        // Fired just before the crash; cooldown still running
        assert!(state.player.shoot(0.0, &tuning).is_some());
        assert!(!state.player.can_shoot(116.0));
    }
    let events = session.tick(0.0, &TickInput::default(), BOUNDS);
    assert!(events.contains(&GameEvent::GameOver {
        score: 140,
        cause: PlayerHit::Enemy
    }));
    session.submit_name("Pilot");

    let confirm = TickInput {
        confirm: true,
        ..Default::default()
    };
    session.tick(100.0, &confirm, BOUNDS);

    let state = session.state();
    assert_eq!(state.phase, GamePhase::Running);
    assert_eq!(state.score, 0);
    assert!(state.bullets.is_empty());
    assert!(state.enemy_bullets.is_empty());
    assert!(state.enemies.is_empty());
    assert!(state.meteors.is_empty());
    assert_eq!(state.player.pos, Vec2::new(375.0, 500.0));
    assert_eq!(state.last_enemy_shot, None);
    let after: Vec<_> = state.stars.iter().map(|s| s.pos).collect();
    assert_eq!(after.len(), stars.len());

    // First tick after the restart spawns and fires straight away
    let fire = TickInput {
        shoot: true,
        ..Default::default()
    };
    let events = session.tick(116.0, &fire, BOUNDS);
    assert!(events.contains(&GameEvent::EnemySpawned));
    assert!(events.contains(&GameEvent::MeteorSpawned));
    assert!(events.contains(&GameEvent::PlayerFired));
    assert_eq!(session.state().bullets.len(), 1);
}

#[test]
fn difficulty_rises_once_at_threshold() {
    let mut session = GameSession::new(MemoryStore::new(), BOUNDS, 7);
    session.state_mut().score = 100;

    let mut raised = 0;
    for i in 0..30 {
        let events = session.tick(i as f64 * 16.0, &TickInput::default(), BOUNDS);
        raised += events
            .iter()
            .filter(|e| matches!(e, GameEvent::DifficultyRaised { .. }))
            .count();
        if session.phase() == GamePhase::GameOver {
            break;
        }
    }
    assert_eq!(raised, 1);
    let level = session.state().difficulty.current();
    assert!((level.enemy_speed - 3.01).abs() < 1e-6);
    assert!((level.enemy_bullet_speed - 4.01).abs() < 1e-6);
}

#[test]
fn meteor_leaving_left_edge_is_removed() {
    let tuning = Tuning {
        star_count: 0,
        ..Tuning::default()
    };
    let mut session = GameSession::with_tuning(MemoryStore::new(), tuning, BOUNDS, 8);
    // Keep the spawner quiet after the first tick
    session.tick(0.0, &TickInput::default(), BOUNDS);
    {
        let state = session.state_mut();
        state.meteors.clear();
        state.enemies.clear();
        state.enemy_bullets.clear();
        state
            .meteors
            .push(Meteor::new(Vec2::new(-10.0, 100.0), 50.0, 1.0, -1.0));
    }

    let mut gone_at = None;
    for i in 1..=60 {
        session.tick(i as f64, &TickInput::default(), BOUNDS);
        let state = session.state();
        match state.meteors.first() {
            Some(m) => assert!(m.rect().right() >= 0.0),
            None => {
                gone_at = Some(i);
                break;
            }
        }
    }
    // x goes -10 -> -51 after 41 ticks
    assert_eq!(gone_at, Some(41));
}

#[test]
fn autopilot_session_keeps_invariants() {
    let mut session = GameSession::new(MemoryStore::new(), BOUNDS, 99);
    let mut now = 0.0;
    let mut last_score = 0;
    for _ in 0..5_000 {
        let input = demo_input(session.state(), BOUNDS);
        session.tick(now, &input, BOUNDS);
        now += 1000.0 / 60.0;

        let score = session.score();
        assert!(score >= last_score);
        assert_eq!((score - last_score) % 5, 0);
        last_score = score;

        if session.phase() == GamePhase::GameOver {
            break;
        }
    }
}
