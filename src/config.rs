//! Session configuration
//!
//! Canvas size and RNG seed, fixed for the lifetime of a session. Loaded from
//! JSON by drivers that want something other than the defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// Drawing surface dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
        }
    }
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Shrink the canvas height to match the viewport's aspect ratio.
    ///
    /// Width always fully fits; height follows the physical viewport
    /// proportions, rounded down and capped at the configured height.
    pub fn fit_to_viewport(&self, viewport_w: f32, viewport_h: f32, pixel_ratio: f32) -> Self {
        let real_w = viewport_w * pixel_ratio;
        let real_h = viewport_h * pixel_ratio;
        if !(real_w > 0.0 && real_h > 0.0) {
            return *self;
        }
        let height = (self.width * real_h / real_w).floor().min(self.height);
        Self {
            width: self.width,
            height,
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let finite = self.width.is_finite() && self.height.is_finite();
        if !(finite && self.width > 0.0 && self.height > 0.0) {
            return Err(SimError::Config(format!(
                "canvas must be positive and finite, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Everything a session needs besides the chosen tier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub canvas: Canvas,
    /// Launch-angle RNG seed
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            seed: DEFAULT_SEED,
        }
    }
}

impl SessionConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.canvas.validate()?;
        log::info!(
            "Loaded session config: canvas {}x{}, seed {}",
            config.canvas.width,
            config.canvas.height,
            config.seed
        );
        Ok(config)
    }
}
