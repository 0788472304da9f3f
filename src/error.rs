//! Error taxonomy for the simulation core
//!
//! Nothing here is fatal: a rejected call leaves the session untouched and the
//! driver's frame loop keeps going.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::Phase;

/// Commands that can be rejected by the session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Start,
    Launch,
    TogglePause,
    Step,
    Restart,
    Resize,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::Launch => "launch",
            Action::TogglePause => "toggle pause",
            Action::Step => "step",
            Action::Restart => "restart",
            Action::Resize => "resize",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Level selection that doesn't name a known tier
    #[error("unrecognized difficulty tier `{0}`")]
    InvalidTier(String),

    /// Command not accepted in the current phase
    #[error("cannot {} while {phase:?}", .action.as_str())]
    InvalidTransition { action: Action, phase: Phase },

    /// Malformed or unusable session configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SimError {
    pub(crate) fn transition(action: Action, phase: Phase) -> Self {
        SimError::InvalidTransition { action, phase }
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Config(err.to_string())
    }
}
