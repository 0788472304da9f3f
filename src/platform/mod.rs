//! Platform abstraction layer
//!
//! Everything between a real device and the simulation:
//! - Input: key codes to session commands
//! - Web: browser frame driver bridge (wasm32 only)

pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{InputMapper, KeyCode};
