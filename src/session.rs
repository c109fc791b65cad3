//! Game session
//!
//! Owns the world, the RNG and the high-score store, and is driven once per
//! animation frame by the host. Game over is where the session does its extra
//! work: it reloads the table, asks for a name when the score qualifies, and
//! schedules the table display a little after the game-over message.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::highscores::HighScores;
use crate::persistence::{KeyValueStore, StorageError};
use crate::renderer::Renderer;
use crate::sim::{CanvasBounds, GameEvent, GamePhase, GameState, TickInput, tick};
use crate::tuning::Tuning;

/// A finished run that earned a place on the table and is waiting for a name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingHighScore {
    pub score: u64,
    /// 1-indexed position the score would take
    pub rank: usize,
}

/// Read-only view handed to renderers each frame
#[derive(Debug, Clone, Copy)]
pub struct FrameSnapshot<'a> {
    pub state: &'a GameState,
    pub bounds: CanvasBounds,
    pub high_scores: &'a HighScores,
    /// Name prompt still open
    pub pending: Option<PendingHighScore>,
    /// The game-over message has been up long enough; show the table
    pub show_high_scores: bool,
}

impl FrameSnapshot<'_> {
    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }
}

pub struct GameSession<S: KeyValueStore> {
    state: GameState,
    rng: Pcg32,
    store: S,
    high_scores: HighScores,
    pending: Option<PendingHighScore>,
    /// When the high-score table should appear (set on game over)
    high_scores_at: Option<f64>,
    last_now: f64,
    bounds: CanvasBounds,
}

impl<S: KeyValueStore> GameSession<S> {
    /// New running session with tuning and high scores read from `store`
    pub fn new(store: S, bounds: CanvasBounds, seed: u64) -> Self {
        let tuning = Tuning::load(&store);
        Self::with_tuning(store, tuning, bounds, seed)
    }

    /// New running session with explicit tuning
    pub fn with_tuning(store: S, tuning: Tuning, bounds: CanvasBounds, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = GameState::new(tuning, bounds, &mut rng);
        let high_scores = HighScores::load(&store);
        log::info!(
            "Session created (seed {}, {}x{})",
            seed,
            bounds.width,
            bounds.height
        );
        Self {
            state,
            rng,
            store,
            high_scores,
            pending: None,
            high_scores_at: None,
            last_now: 0.0,
            bounds,
        }
    }

    /// Enter Running from a clean slate
    pub fn start(&mut self) {
        self.reset_run();
        log::info!("Game started");
    }

    /// Back to Running with score, entities, timers and difficulty reset
    pub fn restart(&mut self) {
        self.reset_run();
        log::info!("Game restarted");
    }

    fn reset_run(&mut self) {
        self.state.restart(self.bounds);
        self.pending = None;
        self.high_scores_at = None;
    }

    /// Run one frame and return the events it produced
    ///
    /// While the game is over the world stays frozen; `confirm` restarts it
    /// unless a name is still being asked for.
    pub fn tick(&mut self, now: f64, input: &TickInput, bounds: CanvasBounds) -> Vec<GameEvent> {
        self.bounds = bounds;
        self.last_now = now;

        if self.state.phase == GamePhase::GameOver {
            if input.confirm && self.pending.is_none() {
                self.restart();
            }
            return Vec::new();
        }

        tick(&mut self.state, input, now, bounds, &mut self.rng);
        let events = self.state.drain_events();
        for event in &events {
            if let GameEvent::GameOver { score, .. } = *event {
                self.on_game_over(score, now);
            }
        }
        events
    }

    fn on_game_over(&mut self, score: u64, now: f64) {
        self.high_scores = HighScores::load(&self.store);
        self.high_scores_at = Some(now + self.state.tuning.game_over_message_ms);

        if score == 0 {
            return;
        }
        if let Some(rank) = self.high_scores.potential_rank(score) {
            log::info!("Score {} qualifies for rank {}", score, rank);
            self.pending = Some(PendingHighScore { score, rank });
        }
    }

    /// Name prompt waiting for an answer
    pub fn pending_high_score(&self) -> Option<PendingHighScore> {
        self.pending
    }

    /// Answer the name prompt
    ///
    /// Inserts and persists the pending score; returns the rank it took. A
    /// blank name closes the prompt without touching the table.
    pub fn submit_name(&mut self, name: &str) -> Option<usize> {
        let pending = self.pending.take()?;
        let Some(rank) = self.high_scores.add_score(name, pending.score) else {
            log::info!("High score entry skipped (blank name)");
            return None;
        };
        if let Err(e) = self.high_scores.save(&mut self.store) {
            log::warn!("Could not save high scores: {}", e);
        }
        Some(rank)
    }

    /// Close the name prompt without recording anything
    pub fn cancel_name_entry(&mut self) {
        if self.pending.take().is_some() {
            log::info!("High score entry cancelled");
        }
    }

    /// Wipe the leaderboard, in memory and in the store
    pub fn clear_high_scores(&mut self) -> Result<(), StorageError> {
        HighScores::clear(&mut self.store)?;
        self.high_scores = HighScores::new();
        Ok(())
    }

    pub fn snapshot(&self) -> FrameSnapshot<'_> {
        let show_high_scores = self.state.phase == GamePhase::GameOver
            && self.high_scores_at.is_some_and(|at| self.last_now >= at);
        FrameSnapshot {
            state: &self.state,
            bounds: self.bounds,
            high_scores: &self.high_scores,
            pending: self.pending,
            show_high_scores,
        }
    }

    /// Hand the current frame to a renderer
    pub fn render(&self, renderer: &mut dyn Renderer) {
        renderer.draw(&self.snapshot());
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct world access for hosts and tests
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn bounds(&self) -> CanvasBounds {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::{Bullet, Enemy, Entity, Meteor, PlayerHit};
    use glam::Vec2;

    const BOUNDS: CanvasBounds = CanvasBounds {
        width: 800.0,
        height: 600.0,
    };

    fn session_with(store: MemoryStore) -> GameSession<MemoryStore> {
        GameSession::new(store, BOUNDS, 17)
    }

    /// Drop a meteor on the ship so the next tick ends the run
    fn doom(session: &mut GameSession<MemoryStore>) {
        let ship = session.state().player.rect();
        session
            .state_mut()
            .meteors
            .push(Meteor::new(Vec2::new(ship.x, ship.y), 50.0, 0.0, 0.0));
    }

    #[test]
    fn test_zero_score_game_over_skips_prompt() {
        let mut session = session_with(MemoryStore::new());
        doom(&mut session);
        let events = session.tick(0.0, &TickInput::default(), BOUNDS);
        assert!(events.contains(&GameEvent::GameOver {
            score: 0,
            cause: PlayerHit::Meteor
        }));
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert_eq!(session.pending_high_score(), None);
    }

    #[test]
    fn test_qualifying_score_prompts_and_saves() {
        let mut session = session_with(MemoryStore::new());
        session.state_mut().score = 40;
        doom(&mut session);
        session.tick(0.0, &TickInput::default(), BOUNDS);

        assert_eq!(
            session.pending_high_score(),
            Some(PendingHighScore { score: 40, rank: 1 })
        );
        assert_eq!(session.submit_name("  Ace  "), Some(1));
        assert_eq!(session.pending_high_score(), None);
        assert_eq!(session.high_scores().entries[0].name, "Ace");

        let stored = HighScores::load(session.store());
        assert_eq!(stored.top_score(), Some(40));
    }

    #[test]
    fn test_blank_name_leaves_table_alone() {
        let mut session = session_with(MemoryStore::new());
        session.state_mut().score = 40;
        doom(&mut session);
        session.tick(0.0, &TickInput::default(), BOUNDS);

        assert_eq!(session.submit_name("   "), None);
        assert_eq!(session.pending_high_score(), None);
        assert!(session.high_scores().is_empty());
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_confirm_waits_for_name() {
        let mut session = session_with(MemoryStore::new());
        session.state_mut().score = 40;
        doom(&mut session);
        session.tick(0.0, &TickInput::default(), BOUNDS);

        let confirm = TickInput {
            confirm: true,
            ..Default::default()
        };
        session.tick(16.0, &confirm, BOUNDS);
        assert_eq!(session.phase(), GamePhase::GameOver);

        session.cancel_name_entry();
        session.tick(32.0, &confirm, BOUNDS);
        assert_eq!(session.phase(), GamePhase::Running);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_high_scores_shown_after_delay() {
        let mut session = session_with(MemoryStore::new());
        doom(&mut session);
        session.tick(1000.0, &TickInput::default(), BOUNDS);
        assert!(!session.snapshot().show_high_scores);

        session.tick(2999.0, &TickInput::default(), BOUNDS);
        assert!(!session.snapshot().show_high_scores);
        session.tick(3000.0, &TickInput::default(), BOUNDS);
        assert!(session.snapshot().show_high_scores);

        session.restart();
        assert!(!session.snapshot().show_high_scores);
    }

    #[test]
    fn test_restart_resets_run() {
        let mut session = session_with(MemoryStore::new());
        let tuning = session.state().tuning.clone();
        let star = session.state().stars[0].pos;
        {
            let state = session.state_mut();
            state.score = 120;
            state.player.pos.x = 0.0;
            state
                .enemies
                .push(Enemy::new(Vec2::new(10.0, 10.0), 50.0, 3.0, 0.0, 1.0));
            state
                .enemy_bullets
                .push(Bullet::enemy(Vec2::new(300.0, 10.0), 4.0, &tuning));
            state.difficulty.adjust(100);
        }

        session.restart();
        let state = session.state();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert!(state.enemies.is_empty() && state.enemy_bullets.is_empty());
        assert_eq!(state.player.pos, Vec2::new(375.0, 500.0));
        assert_eq!(state.difficulty.current().enemy_speed, 3.0);
        assert_eq!(state.spawner.last_enemy_spawn(), None);
        assert_eq!(state.stars[0].pos, star);
    }

    #[test]
    fn test_clear_high_scores_empties_store() {
        let mut session = session_with(MemoryStore::new());
        session.state_mut().score = 40;
        doom(&mut session);
        session.tick(0.0, &TickInput::default(), BOUNDS);
        session.submit_name("Ace");
        assert!(!session.store().is_empty());

        session.clear_high_scores().unwrap();
        assert!(session.high_scores().is_empty());
        assert!(session.store().is_empty());
        assert!(HighScores::load(session.store()).is_empty());
    }

    #[test]
    fn test_tuning_loaded_from_store() {
        let mut store = MemoryStore::new();
        let tuning = Tuning {
            player_speed: 4.0,
            ..Tuning::default()
        };
        tuning.save(&mut store).unwrap();

        let session = session_with(store);
        assert_eq!(session.state().player.speed, 4.0);
    }
}
