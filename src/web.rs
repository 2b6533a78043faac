//! Browser bindings
//!
//! The page owns the canvas and the requestAnimationFrame loop; it forwards
//! pointer input here in game coordinates and draws from `snapshot_json`.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::ai::Difficulty;
use crate::game::Game;
use crate::progress::LocalStorage;
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger already initialized: {e}").into());
    }
    log::info!("Waterbomb Duel starting...");
}

fn browser_seed() -> u64 {
    let now = js_sys::Date::now() as u64;
    let noise = (js_sys::Math::random() * u32::MAX as f64) as u64;
    now ^ (noise << 20)
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game<LocalStorage>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        Self {
            game: Game::new(LocalStorage::new(), browser_seed()),
        }
    }

    /// Build a game with balance overrides from a JSON object
    pub fn with_tuning(json: &str) -> Result<WebGame, JsValue> {
        let tuning = Tuning::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            game: Game::with_tuning(LocalStorage::new(), browser_seed(), tuning),
        })
    }

    /// Start a match at difficulty `level` (1..=5); false if unknown or locked
    pub fn start_game(&mut self, level: u8) -> bool {
        match Difficulty::from_level(level) {
            Some(difficulty) => self.game.start_game(difficulty),
            None => {
                log::warn!("Unknown difficulty level {level}");
                false
            }
        }
    }

    pub fn restart(&mut self) -> bool {
        self.game.restart()
    }

    pub fn return_to_menu(&mut self) {
        self.game.return_to_menu();
    }

    pub fn advance_tutorial(&mut self) -> bool {
        self.game.advance_tutorial()
    }

    /// Frame callback; `dt` in seconds
    pub fn update(&mut self, dt: f32) {
        self.game.update(dt);
    }

    pub fn start_aim(&mut self, x: f32, y: f32) -> bool {
        self.game.start_aim(Vec2::new(x, y))
    }

    pub fn update_aim(&mut self, x: f32, y: f32) -> bool {
        self.game.update_aim(Vec2::new(x, y))
    }

    pub fn fire(&mut self, x: f32, y: f32) -> bool {
        self.game.fire(Vec2::new(x, y))
    }

    pub fn defend(&mut self, x: f32, y: f32) -> bool {
        self.game.defend(Vec2::new(x, y))
    }

    pub fn unlocked_level(&self) -> u8 {
        self.game.progress().unlocked_level
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        self.game
            .snapshot_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}
