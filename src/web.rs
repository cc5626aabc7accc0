//! Browser bindings
//!
//! `WebArcade` wraps a LocalStorage-backed hub for the JS front end. The page
//! owns the timers and the DOM: it calls `tick` on `tickIntervalMs`, `advance`
//! from its animation frame, and renders the JSON handed to its callbacks.

use wasm_bindgen::prelude::*;

use crate::audio::AudioManager;
use crate::feedback::{FeedbackEvent, PresentationSink};
use crate::games::snake::Direction;
use crate::hub::{Hub, SessionView};
use crate::persistence::LocalStorage;

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Neon Arcade starting...");
}

/// Forwards hub output to JS callbacks and the audio manager
struct JsSink<'a> {
    audio: &'a AudioManager,
    sound_enabled: bool,
    on_event: Option<&'a js_sys::Function>,
    on_render: Option<&'a js_sys::Function>,
}

impl JsSink<'_> {
    fn call(callback: Option<&js_sys::Function>, payload: serde_json::Result<String>) {
        let Some(callback) = callback else { return };
        match payload {
            Ok(json) => {
                if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                    log::warn!("Callback failed: {:?}", e);
                }
            }
            Err(e) => log::warn!("Could not serialize payload: {}", e),
        }
    }
}

impl PresentationSink for JsSink<'_> {
    fn render(&mut self, view: &SessionView) {
        Self::call(self.on_render, serde_json::to_string(view));
    }

    fn on_event(&mut self, event: &FeedbackEvent) {
        if self.sound_enabled {
            if let Some(cue) = event.cue() {
                self.audio.play(cue);
            }
        }
        let payload = serde_json::to_value(event).map(|mut json| {
            json["celebrate"] = event.celebrates().into();
            json.to_string()
        });
        Self::call(self.on_event, payload);
    }
}

#[wasm_bindgen]
pub struct WebArcade {
    hub: Hub<LocalStorage>,
    audio: AudioManager,
    on_event: Option<js_sys::Function>,
    on_render: Option<js_sys::Function>,
}

impl Default for WebArcade {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl WebArcade {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebArcade {
        let seed = js_sys::Date::now() as u64;
        let hub = Hub::new(LocalStorage, seed);
        if !hub.scores().is_persistent() {
            log::warn!("LocalStorage unavailable, scores last for this visit only");
        }
        let mut audio = AudioManager::new();
        audio.set_volume(hub.settings().effective_volume());
        WebArcade {
            hub,
            audio,
            on_event: None,
            on_render: None,
        }
    }

    /// `callback(json)` for every feedback event
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&mut self, callback: js_sys::Function) {
        self.on_event = Some(callback);
    }

    /// `callback(json)` with the current view after each flush
    #[wasm_bindgen(js_name = onRender)]
    pub fn on_render(&mut self, callback: js_sys::Function) {
        self.on_render = Some(callback);
    }

    pub fn launch(&mut self, game: &str) -> Result<(), JsError> {
        self.audio.resume();
        self.hub.launch_by_name(game)?;
        self.flush();
        Ok(())
    }

    #[wasm_bindgen(js_name = goHome)]
    pub fn go_home(&mut self) {
        self.hub.go_home();
        self.flush();
    }

    pub fn restart(&mut self) {
        self.hub.restart();
        self.flush();
    }

    pub fn start(&mut self) {
        self.audio.resume();
        self.hub.start();
        self.flush();
    }

    pub fn tick(&mut self) {
        self.hub.tick();
        self.flush();
    }

    pub fn advance(&mut self, dt_ms: f64) {
        self.hub.advance(dt_ms.max(0.0) as u64);
        self.flush();
    }

    /// Current fixed-step interval, or undefined for turn-based games
    #[wasm_bindgen(js_name = tickIntervalMs)]
    pub fn tick_interval_ms(&self) -> Option<u32> {
        self.hub.tick_interval_ms()
    }

    /// `KeyboardEvent.key`; returns true when the page should preventDefault
    pub fn key(&mut self, key: &str) -> bool {
        let used = self.hub.handle_key(key);
        if used {
            self.flush();
        }
        used
    }

    pub fn steer(&mut self, direction: &str) {
        if let Some(dir) = Direction::from_str(direction) {
            self.hub.steer(dir);
        }
    }

    pub fn swipe(&mut self, dx: f32, dy: f32) {
        self.hub.swipe(dx, dy);
    }

    #[wasm_bindgen(js_name = togglePause)]
    pub fn toggle_pause(&mut self) {
        self.hub.toggle_pause();
        self.flush();
    }

    pub fn flap(&mut self) {
        self.audio.resume();
        self.hub.flap();
        self.flush();
    }

    /// Tic-Tac-Toe click; false when the move was refused
    #[wasm_bindgen(js_name = playCell)]
    pub fn play_cell(&mut self, cell: u32) -> bool {
        let accepted = match self.hub.play_cell(cell as usize) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("Move refused: {}", e);
                false
            }
        };
        self.flush();
        accepted
    }

    pub fn reveal(&mut self, slot: u32) {
        self.hub.reveal(slot as usize);
        self.flush();
    }

    pub fn hint(&mut self) -> bool {
        let shown = self.hub.hint();
        self.flush();
        shown
    }

    /// `theme`, `snake_speed`, `tictactoe_mode`, `tictactoe_difficulty`, `memory_difficulty`
    #[wasm_bindgen(js_name = setOption)]
    pub fn set_option(&mut self, key: &str, value: &str) -> Result<(), JsError> {
        self.hub.set_option(key, value)?;
        self.flush();
        Ok(())
    }

    #[wasm_bindgen(js_name = setSound)]
    pub fn set_sound(&mut self, enabled: bool) {
        self.hub.settings_mut().sound_enabled = enabled;
        self.audio.set_volume(self.hub.settings().effective_volume());
    }

    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&mut self, volume: f32) {
        self.hub.settings_mut().set_volume(volume);
        self.audio.set_volume(self.hub.settings().effective_volume());
    }

    pub fn theme(&self) -> String {
        self.hub.settings().theme.as_str().to_string()
    }

    /// Current view as JSON
    pub fn snapshot(&self) -> Result<String, JsError> {
        Ok(self.hub.view_json()?)
    }

    /// Deliver queued events and render
    pub fn flush(&mut self) {
        let mut sink = JsSink {
            audio: &self.audio,
            sound_enabled: self.hub.settings().sound_enabled,
            on_event: self.on_event.as_ref(),
            on_render: self.on_render.as_ref(),
        };
        self.hub.flush(&mut sink);
    }
}
