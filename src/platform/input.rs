//! Keyboard mapping
//!
//! Key codes follow the browser's legacy `KeyboardEvent.keyCode` values, which
//! is what the web page hands us. Releasing any key stops the paddle.

use crate::sim::{Command, Direction};

/// Raw key code as reported by the browser
pub type KeyCode = u32;

pub const KEY_SPACE: KeyCode = 32;
pub const KEY_LEFT: KeyCode = 37;
pub const KEY_RIGHT: KeyCode = 39;
pub const KEY_P: KeyCode = 80;

/// Turns key events into session commands
#[derive(Debug, Clone, Default)]
pub struct InputMapper {
    /// Keys currently down, so auto-repeat doesn't re-toggle pause
    held: Vec<KeyCode>,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, code: KeyCode) -> Option<Command> {
        let repeat = self.held.contains(&code);
        if !repeat {
            self.held.push(code);
        }
        match code {
            KEY_SPACE => Some(Command::Launch),
            KEY_LEFT => Some(Command::Steer(Direction::Left)),
            KEY_RIGHT => Some(Command::Steer(Direction::Right)),
            KEY_P if !repeat => Some(Command::TogglePause),
            _ => None,
        }
    }

    pub fn key_up(&mut self, code: KeyCode) -> Option<Command> {
        self.held.retain(|&held| held != code);
        Some(Command::Steer(Direction::None))
    }
}
