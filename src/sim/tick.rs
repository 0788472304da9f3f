//! Per-frame simulation step
//!
//! The driver calls this once per animation frame. All collision responses
//! for the frame are worked out against the pre-move positions first; only
//! then do the paddle and ball commit their moves.

use serde::{Deserialize, Serialize};

use super::collision::{
    Wall, resolve_ball_blocks, resolve_ball_paddle, resolve_ball_walls, resolve_paddle_walls,
};
use super::session::{GameEvent, Phase, Session};
use crate::error::{Action, SimError};

/// What a frame produced, for the driver to act on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameOutcome {
    Continue,
    /// Blocks destroyed this frame (game goes on)
    BlockDestroyed(u32),
    Won,
    Lost,
}

impl FrameOutcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FrameOutcome::Won | FrameOutcome::Lost)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FrameOutcome::Continue => "continue",
            FrameOutcome::BlockDestroyed(_) => "block_destroyed",
            FrameOutcome::Won => "won",
            FrameOutcome::Lost => "lost",
        }
    }
}

/// Advance the session by one frame
pub fn step(session: &mut Session) -> Result<FrameOutcome, SimError> {
    match session.phase {
        Phase::Docked => {
            step_docked(session);
            Ok(FrameOutcome::Continue)
        }
        Phase::InPlay => Ok(step_in_play(session)),
        _ => Err(session.reject(Action::Step)),
    }
}

/// Only the paddle moves; the ball rides along
fn step_docked(session: &mut Session) {
    session.frame += 1;
    session.paddle.steer();
    resolve_paddle_walls(&mut session.paddle, &session.canvas);
    session.paddle.advance(&mut session.ball);
}

fn step_in_play(session: &mut Session) -> FrameOutcome {
    session.frame += 1;
    session.paddle.steer();

    let hits = resolve_ball_blocks(&mut session.ball, &mut session.blocks);
    for &index in &hits {
        session.score += 1;
        session.events.push(GameEvent::BlockHit { index });
        log::debug!(
            "Frame {}: block {} destroyed, score {}",
            session.frame,
            index,
            session.score
        );
    }

    if session.score >= session.total_blocks() {
        session.phase = Phase::Won;
        session.events.push(GameEvent::Victory);
        log::info!("You win! Score {}", session.score);
        return FrameOutcome::Won;
    }

    if resolve_ball_paddle(&mut session.ball, &session.paddle) {
        session.events.push(GameEvent::PaddleBump);
        log::debug!(
            "Frame {}: paddle bounce, velocity {}",
            session.frame,
            session.ball.vel
        );
    }

    resolve_paddle_walls(&mut session.paddle, &session.canvas);

    match resolve_ball_walls(&mut session.ball, &session.canvas) {
        Some(Wall::Bottom) => {
            session.phase = Phase::Lost;
            session.events.push(GameEvent::Fail);
            log::info!("Ball lost at frame {}, score {}", session.frame, session.score);
            return FrameOutcome::Lost;
        }
        Some(wall) => log::debug!("Frame {}: {:?} wall bounce", session.frame, wall),
        None => {}
    }

    session.paddle.advance(&mut session.ball);
    session.ball.advance();

    if hits.is_empty() {
        FrameOutcome::Continue
    } else {
        FrameOutcome::BlockDestroyed(hits.len() as u32)
    }
}
