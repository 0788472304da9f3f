//! Browser bridge
//!
//! Exposes a `Session` to JavaScript. The page owns the
//! `requestAnimationFrame` loop, the canvas, sprites and sounds; it calls
//! `step()` once per frame and draws from `snapshot()`.

use wasm_bindgen::prelude::*;

use super::input::{InputMapper, KeyCode};
use crate::config::SessionConfig;
use crate::error::SimError;
use crate::sim::{Command, Session};

fn to_js(err: SimError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen]
pub struct WebSession {
    session: Session,
    input: InputMapper,
}

#[wasm_bindgen]
impl WebSession {
    /// `config_json` may be empty for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WebSession, JsValue> {
        let config = if config_json.trim().is_empty() {
            SessionConfig::default()
        } else {
            SessionConfig::from_json(config_json).map_err(to_js)?
        };
        Ok(Self {
            session: Session::new(config),
            input: InputMapper::new(),
        })
    }

    /// Match the canvas to the window (`innerWidth`, `innerHeight`,
    /// `devicePixelRatio`); call before `start`. Returns `[width, height]`.
    pub fn fit_viewport(
        &mut self,
        viewport_w: f32,
        viewport_h: f32,
        pixel_ratio: f32,
    ) -> Result<Vec<f32>, JsValue> {
        let canvas = self
            .session
            .fit_viewport(viewport_w, viewport_h, pixel_ratio)
            .map_err(to_js)?;
        Ok(vec![canvas.width, canvas.height])
    }

    /// Start the tier picked in the level dialog
    pub fn start(&mut self, tier: &str) -> Result<(), JsValue> {
        self.session.select_level(tier).map_err(to_js)
    }

    pub fn restart(&mut self) -> Result<(), JsValue> {
        self.session.restart().map_err(to_js)
    }

    pub fn main_menu(&mut self) {
        self.session.main_menu();
    }

    /// Rejected commands (launch mid-flight, pause before launch) are ignored
    pub fn key_down(&mut self, code: KeyCode) {
        if let Some(command) = self.input.key_down(code) {
            self.dispatch(command);
        }
    }

    pub fn key_up(&mut self, code: KeyCode) {
        if let Some(command) = self.input.key_up(code) {
            self.dispatch(command);
        }
    }

    /// Outcome name, or "idle" when no frame was simulated (paused, ended)
    pub fn step(&mut self) -> String {
        match self.session.step() {
            Ok(outcome) => outcome.as_str().to_string(),
            Err(_) => "idle".to_string(),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.session.is_paused()
    }

    pub fn score(&self) -> u32 {
        self.session.score()
    }

    /// Render state as JSON
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.snapshot()).map_err(|e| to_js(e.into()))
    }

    /// Sound/effect events since the last call, as JSON
    pub fn drain_events(&mut self) -> Result<String, JsValue> {
        let events = self.session.drain_events();
        serde_json::to_string(&events).map_err(|e| to_js(e.into()))
    }
}

impl WebSession {
    fn dispatch(&mut self, command: Command) {
        if let Err(err) = self.session.apply(command) {
            log::debug!("Ignored {:?}: {}", command, err);
        }
    }
}
