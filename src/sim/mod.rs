//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per driver frame, no timers or self-scheduling
//! - Seeded RNG only
//! - Stable iteration order (row-major blocks)
//! - No rendering or platform dependencies

pub mod aabb;
pub mod autopilot;
pub mod collision;
pub mod level;
pub mod session;
pub mod state;
pub mod tick;

pub use aabb::Aabb;
pub use collision::{
    Wall, collide, resolve_ball_blocks, resolve_ball_paddle, resolve_ball_walls,
    resolve_paddle_walls,
};
pub use level::{LevelConfig, Tier, configure_level};
pub use session::{Command, GameEvent, Phase, Session, Snapshot};
pub use state::{Ball, BallState, Block, BlockGrid, Direction, EntityId, Paddle};
pub use tick::{FrameOutcome, step};
