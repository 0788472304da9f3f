//! Arkanoid - single-screen ball-and-paddle breakout
//!
//! Core modules:
//! - `sim`: Deterministic frame simulation (entities, collisions, session state)
//! - `config`: Session configuration and canvas sizing
//! - `platform`: Input mapping and the browser bridge
//! - `error`: Rejected commands and bad configuration

pub mod config;
pub mod error;
pub mod platform;
pub mod sim;

pub use config::{Canvas, SessionConfig};
pub use error::SimError;
pub use sim::{FrameOutcome, Phase, Session, Tier};

/// Game configuration constants
pub mod consts {
    /// Default canvas dimensions
    pub const CANVAS_WIDTH: f32 = 1280.0;
    pub const CANVAS_HEIGHT: f32 = 720.0;

    /// Ball sprite frame size
    pub const BALL_SIZE: f32 = 40.0;
    /// Ball spawn offsets (from horizontal center / bottom edge)
    pub const BALL_OFFSET_X: f32 = 20.0;
    pub const BALL_OFFSET_Y: f32 = 85.0;

    /// Paddle sprite size
    pub const PADDLE_WIDTH: f32 = 251.0;
    pub const PADDLE_HEIGHT: f32 = 41.0;
    /// Paddle spawn offsets (from horizontal center / bottom edge)
    pub const PADDLE_OFFSET_X: f32 = 125.0;
    pub const PADDLE_OFFSET_Y: f32 = 45.0;
    /// Paddle speed for tiers that don't override it
    pub const DEFAULT_PADDLE_SPEED: f32 = 6.0;

    /// Block sprite size and grid stride (2px gutters)
    pub const BLOCK_WIDTH: f32 = 112.0;
    pub const BLOCK_HEIGHT: f32 = 40.0;
    pub const BLOCK_STRIDE_X: f32 = 114.0;
    pub const BLOCK_STRIDE_Y: f32 = 42.0;

    /// Seed used when none is configured
    pub const DEFAULT_SEED: u64 = 0x5EED;
}
