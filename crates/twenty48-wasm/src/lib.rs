//! WebAssembly 2048 game drawn on a canvas
//!
//! The best score, leaderboard, player name and the running game are kept
//! in `window.localStorage`, so a reload picks up where the player left off.

use log::LevelFilter;
use twenty48_core::StorageError;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, KeyboardEvent};

mod console;
mod game;
mod render;
mod storage;
mod theme;

// WASM tests require wasm-pack test to run
#[cfg(all(test, target_arch = "wasm32"))]
mod tests;

pub use game::{GameState, ScreenState};
pub use storage::BrowserStore;
pub use theme::Theme;

// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    console::init(LevelFilter::Info);
}

fn to_js_error(err: StorageError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// The main WASM game controller
#[wasm_bindgen]
pub struct Twenty48Game {
    state: GameState,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    theme: Theme,
    cell_size: f64,
    font_size: f64,
    width: u32,
    height: u32,
    dpr: f64, // Device pixel ratio for crisp rendering
}

#[wasm_bindgen]
impl Twenty48Game {
    /// Create a game attached to a canvas element, resuming any saved game
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<Twenty48Game, JsValue> {
        let document = web_sys::window()
            .ok_or("No window")?
            .document()
            .ok_or("No document")?;

        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("Canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        let ctx = canvas
            .get_context("2d")?
            .ok_or("Failed to get 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let mut state = GameState::new(Box::new(BrowserStore::new()));
        if state.resume_saved() {
            log::info!("resumed saved game");
        }

        let mut game = Twenty48Game {
            state,
            canvas,
            ctx,
            theme: Theme::dark(),
            cell_size: 100.0,
            font_size: 36.0,
            width: 0,
            height: 0,
            dpr: 1.0,
        };

        game.resize(800, 560);
        Ok(game)
    }

    /// Handle keyboard input; returns true when the key was used
    #[wasm_bindgen]
    pub fn handle_key(&mut self, event: &KeyboardEvent) -> bool {
        if event.ctrl_key() || event.meta_key() || event.alt_key() {
            return false;
        }

        let handled = self.state.handle_key(&event.key());
        if handled {
            event.prevent_default();
            self.state.save();
        }

        self.render();
        handled
    }

    /// Handle a touch swipe from its start and end points
    #[wasm_bindgen]
    pub fn handle_swipe(&mut self, start_x: f64, start_y: f64, end_x: f64, end_y: f64) -> bool {
        let handled = self.state.handle_swipe(start_x, start_y, end_x, end_y);
        if handled {
            self.state.save();
            self.render();
        }
        handled
    }

    /// Update timers (call from requestAnimationFrame)
    #[wasm_bindgen]
    pub fn tick(&mut self) {
        self.state.tick();
        self.render();
    }

    /// Start a new game
    #[wasm_bindgen]
    pub fn new_game(&mut self) {
        self.state.restart();
        self.state.save();
        self.render();
    }

    /// Undo the last move or shuffle
    #[wasm_bindgen]
    pub fn undo(&mut self) -> bool {
        let undone = self.state.undo();
        self.state.save();
        self.render();
        undone
    }

    /// Shuffle the tiles and add one
    #[wasm_bindgen]
    pub fn shuffle(&mut self) -> bool {
        let shuffled = self.state.shuffle();
        self.state.save();
        self.render();
        shuffled
    }

    /// Show a hint and return it as a JS object, or null when stuck
    #[wasm_bindgen]
    pub fn request_hint(&mut self) -> JsValue {
        let hint = self
            .state
            .request_hint()
            .and_then(|hint| serde_wasm_bindgen::to_value(hint).ok())
            .unwrap_or(JsValue::NULL);
        self.render();
        hint
    }

    /// Set the name recorded on the leaderboard
    #[wasm_bindgen]
    pub fn set_player_name(&mut self, name: &str) {
        self.state.set_player_name(name);
        self.render();
    }

    #[wasm_bindgen]
    pub fn player_name(&self) -> String {
        self.state.session().player_name().to_string()
    }

    /// Set the color theme
    #[wasm_bindgen]
    pub fn set_theme(&mut self, theme_name: &str) {
        self.theme = Theme::by_name(theme_name);
        self.render();
    }

    #[wasm_bindgen]
    pub fn score(&self) -> u32 {
        self.state.session().game().score()
    }

    #[wasm_bindgen]
    pub fn best_score(&self) -> u32 {
        self.state.session().best_score()
    }

    /// "playing", "win" or "lose"
    #[wasm_bindgen]
    pub fn status(&self) -> String {
        match self.state.session().game().status().outcome() {
            None => "playing".to_string(),
            Some(outcome) => format!("{:?}", outcome).to_lowercase(),
        }
    }

    #[wasm_bindgen]
    pub fn can_undo(&self) -> bool {
        self.state.session().game().can_undo()
    }

    /// Board values in row-major order, 0 for empty cells
    #[wasm_bindgen]
    pub fn get_board(&self) -> Vec<u32> {
        self.state.session().game().grid().to_vec()
    }

    /// Leaderboard as an array of `{name, score}` objects
    #[wasm_bindgen]
    pub fn get_leaderboard(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.state.session().leaderboard())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Get current game state as JSON
    #[wasm_bindgen]
    pub fn get_state_json(&self) -> String {
        serde_json::to_string(&self.state.to_serializable()).unwrap_or_default()
    }

    /// Load game state from JSON
    #[wasm_bindgen]
    pub fn load_state_json(&mut self, json: &str) -> bool {
        match serde_json::from_str(json) {
            Ok(state) => {
                if !self.state.load_serializable(state) {
                    return false;
                }
                self.state.save();
                self.render();
                true
            }
            Err(err) => {
                log::warn!("rejected game state: {}", err);
                false
            }
        }
    }

    /// Write the running game to local storage now
    #[wasm_bindgen]
    pub fn save(&self) -> Result<(), JsValue> {
        self.state.session().save_game().map_err(to_js_error)
    }

    /// Resize the game canvas
    #[wasm_bindgen]
    pub fn resize(&mut self, width: u32, height: u32) {
        // Minimum sizes
        let width = width.max(480);
        let height = height.max(400);

        self.width = width;
        self.height = height;

        // Update dpr in case it changed (e.g., moving to different monitor)
        self.dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);

        // Set actual canvas resolution (scaled by dpr for crisp rendering)
        self.canvas.set_width((width as f64 * self.dpr) as u32);
        self.canvas.set_height((height as f64 * self.dpr) as u32);

        // Set CSS display size (logical pixels)
        let html_element: &HtmlElement = self.canvas.as_ref();
        let style = html_element.style();
        let _ = style.set_property("width", &format!("{}px", width));
        let _ = style.set_property("height", &format!("{}px", height));

        // Reset and scale context to account for dpr
        let _ = self.ctx.reset_transform();
        let _ = self.ctx.scale(self.dpr, self.dpr);

        // The board is square; leave room for the info panel on the right
        let max_board_height = (height as f64 - 80.0).max(240.0);
        let max_board_width = (width as f64 * 0.6).max(240.0);
        let cell_by_height = max_board_height / 4.6;
        let cell_by_width = max_board_width / 4.6;
        self.cell_size = cell_by_height.min(cell_by_width).clamp(50.0, 120.0);

        self.font_size = (self.cell_size * 0.36).clamp(16.0, 40.0);

        self.render();
    }

    #[wasm_bindgen]
    pub fn get_width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen]
    pub fn get_height(&self) -> u32 {
        self.height
    }

    /// Render the game to canvas
    fn render(&self) {
        render::render_game(
            &self.ctx,
            &self.state,
            &self.theme,
            self.width,
            self.height,
            self.cell_size,
            self.font_size,
        );
    }
}
