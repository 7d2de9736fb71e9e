//! Browser bindings
//!
//! The page drives the session from `requestAnimationFrame`, passing the
//! frame timestamp to [`WasmSession::frame`], and reads snapshots back as
//! JSON. Totals persist to LocalStorage when it is available.

use std::time::Duration;

use wasm_bindgen::prelude::*;

use crate::persistence::{HighScoreRecord, LocalStorageStore, MemoryStore};
use crate::session::{Command, Session};
use crate::settings::GameSettings;
use crate::sim::SessionPhase;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }
}

#[wasm_bindgen]
pub struct WasmSession {
    session: Session,
}

#[wasm_bindgen]
impl WasmSession {
    /// `settings_json` overrides the stored settings when given
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: Option<String>) -> WasmSession {
        let session = match LocalStorageStore::open() {
            Ok(store) => {
                let settings = settings_json
                    .as_deref()
                    .and_then(parse_settings)
                    .unwrap_or_else(|| GameSettings::load(&store));
                Session::new(settings).with_gateway(store)
            }
            Err(e) => {
                log::warn!("LocalStorage unavailable ({}), totals will not persist", e);
                let settings = settings_json
                    .as_deref()
                    .and_then(parse_settings)
                    .unwrap_or_default();
                Session::new(settings).with_gateway(MemoryStore::new())
            }
        };
        WasmSession { session }
    }

    pub fn start(&mut self) {
        self.session.start();
    }

    /// "left", "right", "jump" or "pause"; returns false for anything else
    pub fn command(&mut self, name: &str) -> bool {
        let command = match name {
            "left" => Command::MoveLeft,
            "right" => Command::MoveRight,
            "jump" => Command::Jump,
            "pause" => Command::TogglePause,
            _ => return false,
        };
        self.session.command(command);
        true
    }

    /// Feed a frame timestamp (ms); returns the number of events raised
    pub fn frame(&mut self, now_ms: f64) -> usize {
        let now = Duration::from_secs_f64(now_ms.max(0.0) / 1000.0);
        self.session.advance(now).len()
    }

    pub fn back_to_menu(&mut self) {
        self.session.back_to_menu();
    }

    /// False before `start` and after `back_to_menu`
    pub fn is_active(&self) -> bool {
        self.session.is_active()
    }

    pub fn is_game_over(&self) -> bool {
        self.session.phase() == SessionPhase::GameOver
    }

    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&*self.session.snapshot()).unwrap_or_default()
    }

    pub fn results_json(&self) -> String {
        serde_json::to_string(&self.session.results()).unwrap_or_default()
    }

    /// Lifetime totals for the menu screen
    pub fn record_json(&self) -> String {
        let record = self
            .session
            .gateway()
            .map(HighScoreRecord::load)
            .unwrap_or_default();
        serde_json::to_string(&record).unwrap_or_default()
    }
}

fn parse_settings(json: &str) -> Option<GameSettings> {
    match serde_json::from_str::<GameSettings>(json) {
        Ok(settings) => Some(settings),
        Err(e) => {
            log::warn!("Ignoring malformed settings: {}", e);
            None
        }
    }
}
