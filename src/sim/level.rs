//! Difficulty tiers and the numeric parameters they resolve to

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_PADDLE_SPEED;
use crate::error::SimError;

/// Named difficulty preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    Beginner,
    Gamer,
    Professional,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Beginner, Tier::Gamer, Tier::Professional];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Beginner => "beginner",
            Tier::Gamer => "gamer",
            Tier::Professional => "professional",
        }
    }

    /// Grid size and speeds for this tier
    pub fn config(&self) -> LevelConfig {
        match self {
            Tier::Beginner => LevelConfig::new(*self, 4, 8, 4.0, DEFAULT_PADDLE_SPEED),
            Tier::Gamer => LevelConfig::new(*self, 5, 10, 6.0, DEFAULT_PADDLE_SPEED),
            Tier::Professional => LevelConfig::new(*self, 7, 11, 8.0, 8.0),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Tier::Beginner),
            "gamer" => Ok(Tier::Gamer),
            "professional" => Ok(Tier::Professional),
            _ => Err(SimError::InvalidTier(s.to_string())),
        }
    }
}

/// Numeric parameters of a level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub tier: Tier,
    pub rows: u32,
    pub columns: u32,
    pub ball_speed: f32,
    pub paddle_speed: f32,
}

impl LevelConfig {
    fn new(tier: Tier, rows: u32, columns: u32, ball_speed: f32, paddle_speed: f32) -> Self {
        Self {
            tier,
            rows,
            columns,
            ball_speed,
            paddle_speed,
        }
    }

    pub fn total_blocks(&self) -> u32 {
        self.rows * self.columns
    }
}

/// Resolve a tier name (as sent by the level picker) to its parameters
pub fn configure_level(name: &str) -> Result<LevelConfig, SimError> {
    let tier: Tier = name.parse()?;
    Ok(tier.config())
}
