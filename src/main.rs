//! Sky Raider entry point
//!
//! Web: canvas + keyboard + requestAnimationFrame loop.
//! Native: headless autopilot demo that records its score in the data dir.
//! Set `SKY_RAIDER_RESET_SCORES` to wipe the table before the run.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use sky_raider::GameSession;
    use sky_raider::persistence::LocalStorageStore;
    use sky_raider::platform::KeyboardState;
    use sky_raider::renderer::CanvasRenderer;
    use sky_raider::sim::{CanvasBounds, GameEvent};

    /// Game instance holding all state
    struct Game {
        session: GameSession<LocalStorageStore>,
        renderer: CanvasRenderer,
        canvas: HtmlCanvasElement,
        keys: KeyboardState,
        /// Ask for a name once the game-over frame has been drawn
        prompt_due: bool,
    }

    impl Game {
        /// Match the canvas to the window; returns the new bounds
        fn sync_canvas_size(&self) -> CanvasBounds {
            if let Some(window) = web_sys::window() {
                let w = window.inner_width().ok().and_then(|v| v.as_f64());
                let h = window.inner_height().ok().and_then(|v| v.as_f64());
                if let (Some(w), Some(h)) = (w, h) {
                    if self.canvas.width() != w as u32 || self.canvas.height() != h as u32 {
                        self.canvas.set_width(w as u32);
                        self.canvas.set_height(h as u32);
                        log::debug!("Canvas resized to {}x{}", w, h);
                    }
                }
            }
            CanvasBounds::new(self.canvas.width() as f32, self.canvas.height() as f32)
        }

        fn frame(&mut self, time: f64) {
            if self.prompt_due {
                self.prompt_due = false;
                self.ask_for_name();
            }

            let bounds = self.sync_canvas_size();
            let input = self.keys.take_input();
            let events = self.session.tick(time, &input, bounds);
            if events
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { .. }))
            {
                self.keys.clear();
                self.prompt_due = self.session.pending_high_score().is_some();
            }
            self.session.render(&mut self.renderer);
        }

        fn ask_for_name(&mut self) {
            let Some(pending) = self.session.pending_high_score() else {
                return;
            };
            let message = format!(
                "New high score: {}! Rank {}. Enter your name:",
                pending.score, pending.rank
            );
            let answer = web_sys::window()
                .and_then(|w| w.prompt_with_message(&message).ok())
                .flatten();
            match answer {
                Some(name) => {
                    if let Some(rank) = self.session.submit_name(&name) {
                        log::info!("High score recorded at rank {}", rank);
                    }
                }
                None => self.session.cancel_name_entry(),
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Sky Raider starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let store = LocalStorageStore::open().map_err(|e| JsValue::from_str(&e.to_string()))?;
        let bounds = CanvasBounds::new(canvas.width() as f32, canvas.height() as f32);
        let seed = js_sys::Date::now() as u64;

        let mut game = Game {
            session: GameSession::new(store, bounds, seed),
            renderer: CanvasRenderer::new(ctx),
            canvas,
            keys: KeyboardState::new(),
            prompt_due: false,
        };
        game.session.start();
        let game = Rc::new(RefCell::new(game));

        setup_input_handlers(&window, game.clone())?;

        request_animation_frame(game);
        log::info!("Sky Raider running (seed {})", seed);
        Ok(())
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().keys.key_down(&event.key()) {
                    event.prevent_default();
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().keys.key_up(&event.key()) {
                    event.prevent_default();
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Window blur: drop held keys so the ship doesn't keep drifting
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().keys.clear();
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Failed to start: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::time::{SystemTime, UNIX_EPOCH};

    use sky_raider::GameSession;
    use sky_raider::consts::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
    use sky_raider::persistence::{FileStore, StorageError};
    use sky_raider::renderer::TextRenderer;
    use sky_raider::sim::{CanvasBounds, GameEvent, TickInput, demo_input};

    const DEFAULT_DATA_DIR: &str = ".sky-raider";
    /// Ten minutes at 60 fps
    const DEFAULT_FRAMES: u64 = 36_000;
    const FRAME_MS: f64 = 1000.0 / 60.0;
    const DEMO_NAME: &str = "AUTOPILOT";

    pub fn run() -> Result<(), StorageError> {
        let dir =
            std::env::var("SKY_RAIDER_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
        let frames = std::env::var("SKY_RAIDER_DEMO_FRAMES")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_FRAMES);
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let store = FileStore::open(&dir)?;
        log::info!("Data directory: {}", store.dir().display());

        let bounds = CanvasBounds::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT);
        let mut session = GameSession::new(store, bounds, seed);
        if std::env::var_os("SKY_RAIDER_RESET_SCORES").is_some() {
            session.clear_high_scores()?;
        }
        let mut renderer = TextRenderer::new();
        session.start();

        let mut now = 0.0;
        for _ in 0..frames {
            let input = demo_input(session.state(), bounds);
            let events = session.tick(now, &input, bounds);
            session.render(&mut renderer);
            now += FRAME_MS;
            if events
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { .. }))
            {
                break;
            }
        }

        if let Some(pending) = session.pending_high_score() {
            log::info!("Demo score {} made the table", pending.score);
            session.submit_name(DEMO_NAME);
        }

        // Let the game-over message run its course so the table is shown
        now += session.state().tuning.game_over_message_ms;
        session.tick(now, &TickInput::default(), bounds);
        session.render(&mut renderer);

        log::info!(
            "Demo finished after {} frames ({} ticks)",
            renderer.frames,
            session.state().time_ticks
        );
        for line in &renderer.lines {
            println!("{}", line);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Sky Raider (native demo) starting...");

    if let Err(e) = demo::run() {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
