//! Score-driven difficulty ramp
//!
//! Each time the score lands on a new positive multiple of the threshold, enemy
//! and enemy-bullet speeds go up by a fixed step. Speeds never go down and have
//! no cap.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Speeds applied to enemies and their bullets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyLevel {
    pub enemy_speed: f32,
    pub enemy_bullet_speed: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyController {
    base: DifficultyLevel,
    current: DifficultyLevel,
    step: f32,
    threshold: u64,
    /// Score at which the last increment was applied
    last_applied_score: Option<u64>,
}

impl DifficultyController {
    pub fn new(tuning: &Tuning) -> Self {
        let base = DifficultyLevel {
            enemy_speed: tuning.base_enemy_speed,
            enemy_bullet_speed: tuning.base_enemy_bullet_speed,
        };
        Self {
            base,
            current: base,
            step: tuning.difficulty_step,
            threshold: tuning.difficulty_score_threshold.max(1),
            last_applied_score: None,
        }
    }

    /// Back to base speeds
    pub fn reset(&mut self) {
        self.current = self.base;
        self.last_applied_score = None;
    }

    pub fn current(&self) -> DifficultyLevel {
        self.current
    }

    /// Would `adjust(score)` raise the speeds?
    pub fn should_raise(&self, score: u64) -> bool {
        score > 0 && score % self.threshold == 0 && self.last_applied_score != Some(score)
    }

    /// Call once per tick with the current score
    pub fn adjust(&mut self, score: u64) -> DifficultyLevel {
        if self.should_raise(score) {
            self.current.enemy_speed += self.step;
            self.current.enemy_bullet_speed += self.step;
            self.last_applied_score = Some(score);
            log::debug!(
                "Difficulty raised at score {}: enemy {:.2}, bullets {:.2}",
                score,
                self.current.enemy_speed,
                self.current.enemy_bullet_speed
            );
        }
        self.current
    }
}
