//! Rendering module
//!
//! The session hands a `FrameSnapshot` to a `Renderer` once per frame. HUD text
//! layout is shared between the Canvas2D renderer (web) and the text renderer
//! used by the native demo.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod hud;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use hud::{HudLine, TextRenderer, hud_lines};

use crate::session::FrameSnapshot;

/// Draws a frame; never feeds anything back into the simulation
pub trait Renderer {
    fn draw(&mut self, frame: &FrameSnapshot<'_>);
}
