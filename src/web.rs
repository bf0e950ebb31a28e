//! Browser bindings
//!
//! JavaScript owns the canvas, the key bindings and `requestAnimationFrame`; it drives a
//! `WebGame` and draws from the JSON snapshots and events it hands back.

use wasm_bindgen::prelude::*;

use crate::audio::WebAudio;
use crate::game::{Control, Game};
use crate::persistence::SaveStore;
use crate::platform::{FrameToken, LocalStorageStore};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Pixel Shooter (wasm) starting...");
}

/// A play session for JavaScript
#[wasm_bindgen]
pub struct WebGame {
    game: Game<WebAudio, LocalStorageStore>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64) -> WebGame {
        let store = LocalStorageStore::new();
        // Audio needs the stored volume before the session loads the rest
        let settings = store.load().map(|s| s.settings).unwrap_or_default();
        let audio = WebAudio::new(&settings);
        WebGame {
            game: Game::new(seed as u64, audio, store),
        }
    }

    /// Arm the frame loop; pass the token to every `frame` call
    pub fn start(&mut self) -> f64 {
        self.game.start().0 as f64
    }

    /// Run one frame and return its events as JSON
    pub fn frame(&mut self, token: f64, now_ms: f64) -> String {
        let events = self.game.frame(FrameToken(token as u64), now_ms);
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::warn!("Failed to encode events: {}", e);
            "[]".to_string()
        })
    }

    /// Whether the token from the last `start`/`reset`/resume is still live
    pub fn running(&self) -> bool {
        self.game.is_running()
    }

    /// Held control changed; unknown names are ignored
    pub fn set_held(&mut self, control: &str, down: bool) {
        match Control::from_name(control) {
            Some(control) => self.game.set_held(control, down),
            None => log::debug!("Unknown control '{}'", control),
        }
    }

    pub fn press_bomb(&mut self) {
        self.game.press_bomb();
    }

    /// Toggle pause; returns the new frame token on resume
    pub fn press_pause(&mut self) -> Option<f64> {
        self.game.press_pause().map(|t| t.0 as f64)
    }

    pub fn reset(&mut self) -> f64 {
        self.game.reset().0 as f64
    }

    pub fn shutdown(&mut self) {
        self.game.shutdown();
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.game.set_sound_enabled(enabled);
    }

    pub fn set_master_volume(&mut self, vol: f32) {
        self.game.set_master_volume(vol);
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.game.set_sfx_volume(vol);
    }

    /// Resume audio after a user gesture
    pub fn resume_audio(&self) {
        self.game.audio().resume();
    }

    /// Full game state as JSON, for drawing
    pub fn snapshot(&self) -> String {
        serde_json::to_string(self.game.state()).unwrap_or_else(|e| {
            log::warn!("Failed to encode snapshot: {}", e);
            "null".to_string()
        })
    }

    /// Save data (high score, leaderboard, settings) as JSON
    pub fn save_data(&self) -> String {
        serde_json::to_string(self.game.save_data()).unwrap_or_else(|e| {
            log::warn!("Failed to encode save data: {}", e);
            "null".to_string()
        })
    }
}
