//! HUD text layout

use super::Renderer;
use crate::highscores::HighScoreEntry;
use crate::session::{FrameSnapshot, PendingHighScore};
use crate::sim::GamePhase;

pub const SCORE_FONT_PX: f32 = 24.0;
pub const TITLE_FONT_PX: f32 = 48.0;

pub const TEXT_COLOR: &str = "white";
pub const GAME_OVER_COLOR: &str = "red";

/// One line of HUD text, positioned by its baseline start
#[derive(Debug, Clone, PartialEq)]
pub struct HudLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_px: f32,
    pub color: &'static str,
}

impl HudLine {
    fn new(text: String, x: f32, y: f32, font_px: f32, color: &'static str) -> Self {
        Self {
            text,
            x,
            y,
            font_px,
            color,
        }
    }
}

pub fn score_text(score: u64) -> String {
    format!("Score: {}", score)
}

pub fn game_over_hint(score: u64) -> String {
    format!("Score: {}. Press Enter to restart", score)
}

pub fn high_score_line(index: usize, entry: &HighScoreEntry) -> String {
    format!("{}. {}: {}", index + 1, entry.name, entry.score)
}

pub fn name_prompt(pending: &PendingHighScore) -> String {
    format!(
        "New high score ({}, rank {})! Enter your name",
        pending.score, pending.rank
    )
}

/// Every text line for this frame, in draw order
pub fn hud_lines(frame: &FrameSnapshot<'_>) -> Vec<HudLine> {
    let (w, h) = (frame.bounds.width, frame.bounds.height);
    let mut lines = vec![HudLine::new(
        score_text(frame.score()),
        10.0,
        30.0,
        SCORE_FONT_PX,
        TEXT_COLOR,
    )];

    if frame.phase() != GamePhase::GameOver {
        return lines;
    }

    lines.push(HudLine::new(
        "GAME OVER".to_string(),
        w / 2.0 - 150.0,
        h / 2.0,
        TITLE_FONT_PX,
        GAME_OVER_COLOR,
    ));
    lines.push(HudLine::new(
        game_over_hint(frame.score()),
        w / 2.0 - 150.0,
        h / 2.0 + 50.0,
        SCORE_FONT_PX,
        TEXT_COLOR,
    ));
    if let Some(pending) = &frame.pending {
        lines.push(HudLine::new(
            name_prompt(pending),
            w / 2.0 - 150.0,
            h / 2.0 + 90.0,
            SCORE_FONT_PX,
            TEXT_COLOR,
        ));
    }

    if frame.show_high_scores {
        lines.push(HudLine::new(
            "Top 5 Scores:".to_string(),
            w / 2.0 - 100.0,
            50.0,
            SCORE_FONT_PX,
            TEXT_COLOR,
        ));
        for (i, entry) in frame.high_scores.entries.iter().enumerate() {
            lines.push(HudLine::new(
                high_score_line(i, entry),
                w / 2.0 - 100.0,
                80.0 + i as f32 * 50.0,
                SCORE_FONT_PX,
                TEXT_COLOR,
            ));
        }
    }

    lines
}

/// Keeps the HUD text of the last frame; used by the headless host
#[derive(Debug, Default)]
pub struct TextRenderer {
    pub lines: Vec<String>,
    pub frames: u64,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for TextRenderer {
    fn draw(&mut self, frame: &FrameSnapshot<'_>) {
        self.frames += 1;
        self.lines = hud_lines(frame).into_iter().map(|line| line.text).collect();
    }
}
