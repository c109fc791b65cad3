//! Keyboard state
//!
//! Hosts feed raw key names (DOM `KeyboardEvent.key` values) in as they
//! arrive; the game loop takes one `TickInput` snapshot per frame. Movement and
//! fire are held states, confirm is latched until the next snapshot so a quick
//! tap between frames isn't lost.

use crate::sim::TickInput;

/// Game actions bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Left,
    Right,
    Shoot,
    Confirm,
}

impl Action {
    /// Map a DOM key name to an action
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Action::Left),
            "ArrowRight" | "d" | "D" => Some(Action::Right),
            " " | "Spacebar" => Some(Action::Shoot),
            "Enter" => Some(Action::Confirm),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    left: bool,
    right: bool,
    shoot: bool,
    confirm: bool,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key is bound (so the host can suppress scrolling)
    pub fn key_down(&mut self, key: &str) -> bool {
        let Some(action) = Action::from_key(key) else {
            return false;
        };
        match action {
            Action::Left => self.left = true,
            Action::Right => self.right = true,
            Action::Shoot => self.shoot = true,
            Action::Confirm => self.confirm = true,
        }
        true
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        let Some(action) = Action::from_key(key) else {
            return false;
        };
        match action {
            Action::Left => self.left = false,
            Action::Right => self.right = false,
            Action::Shoot => self.shoot = false,
            // Latched until taken
            Action::Confirm => {}
        }
        true
    }

    /// Release everything (e.g. on window blur)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Snapshot for this frame; clears the confirm latch
    pub fn take_input(&mut self) -> TickInput {
        let input = TickInput {
            left: self.left,
            right: self.right,
            shoot: self.shoot,
            confirm: self.confirm,
        };
        self.confirm = false;
        input
    }
}
