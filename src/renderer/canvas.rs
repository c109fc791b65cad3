//! Canvas2D renderer (web)

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::Renderer;
use super::hud::hud_lines;
use crate::session::FrameSnapshot;
use crate::sim::{Entity, Rect};

const PLAYER_BULLET_COLOR: &str = "red";
const ENEMY_BULLET_COLOR: &str = "yellow";
const METEOR_COLOR: &str = "grey";
const STAR_COLOR: &str = "white";

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    fn draw_frame(&self, frame: &FrameSnapshot<'_>) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let state = frame.state;
        ctx.clear_rect(
            0.0,
            0.0,
            frame.bounds.width as f64,
            frame.bounds.height as f64,
        );

        ctx.set_fill_style_str(STAR_COLOR);
        for star in &state.stars {
            ctx.begin_path();
            ctx.arc(
                star.pos.x as f64,
                star.pos.y as f64,
                star.size as f64,
                0.0,
                PI * 2.0,
            )?;
            ctx.fill();
        }

        // Ship: upward triangle with a blue to purple gradient
        let ship = state.player.rect();
        let gradient = ctx.create_linear_gradient(
            ship.x as f64,
            ship.y as f64,
            ship.x as f64,
            ship.bottom() as f64,
        );
        gradient.add_color_stop(0.0, "blue")?;
        gradient.add_color_stop(1.0, "purple")?;
        ctx.set_fill_style_canvas_gradient(&gradient);
        self.triangle(&ship);

        ctx.set_fill_style_str(PLAYER_BULLET_COLOR);
        for bullet in &state.bullets {
            self.fill_rect(&bullet.rect());
        }
        ctx.set_fill_style_str(ENEMY_BULLET_COLOR);
        for bullet in &state.enemy_bullets {
            self.fill_rect(&bullet.rect());
        }

        for enemy in &state.enemies {
            ctx.set_fill_style_str(&format!("hsl({:.0}, 100%, 50%)", enemy.hue));
            self.fill_rect(&enemy.rect());
        }

        ctx.set_fill_style_str(METEOR_COLOR);
        for meteor in &state.meteors {
            self.triangle(&meteor.rect());
        }

        for line in hud_lines(frame) {
            ctx.set_fill_style_str(line.color);
            ctx.set_font(&format!("{}px Arial", line.font_px));
            ctx.fill_text(&line.text, line.x as f64, line.y as f64)?;
        }

        Ok(())
    }

    fn fill_rect(&self, rect: &Rect) {
        self.ctx.fill_rect(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        );
    }

    /// Triangle filling `rect`, apex at the top-center
    fn triangle(&self, rect: &Rect) {
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(rect.x as f64, rect.bottom() as f64);
        ctx.line_to(rect.center().x as f64, rect.y as f64);
        ctx.line_to(rect.right() as f64, rect.bottom() as f64);
        ctx.close_path();
        ctx.fill();
    }
}

impl Renderer for CanvasRenderer {
    fn draw(&mut self, frame: &FrameSnapshot<'_>) {
        if let Err(e) = self.draw_frame(frame) {
            log::warn!("Render error: {:?}", e);
        }
    }
}
