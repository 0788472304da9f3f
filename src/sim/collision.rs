//! Collision detection and response
//!
//! Discrete, one sample per frame: every test looks at where the ball *will*
//! be once its current velocity is applied, and resolution rewrites that
//! velocity before anything moves. A ball fast enough to cross a block in one
//! frame can tunnel through it; that is the accepted cost of not sweeping.

use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::state::{Ball, BlockGrid, Paddle};
use crate::config::Canvas;

/// Canvas edge touched by the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wall {
    Left,
    Right,
    Top,
    /// Not a bounce: the ball is lost
    Bottom,
}

/// Does the ball's projected box overlap `target`?
#[inline]
pub fn collide(ball: &Ball, target: &Aabb) -> bool {
    ball.projected().overlaps(target)
}

/// Knock out every active block the ball is about to hit.
///
/// Blocks are visited in row-major order and each hit flips `dy` on its own,
/// so later blocks are tested against the already-flipped velocity and two
/// hits in one frame cancel out. Returns the indices destroyed this frame.
pub fn resolve_ball_blocks(ball: &mut Ball, grid: &mut BlockGrid) -> Vec<usize> {
    let mut hits = Vec::new();
    for (index, block) in grid.iter_mut().enumerate() {
        if !block.is_active() || !collide(ball, block.bounds()) {
            continue;
        }
        ball.vel.y = -ball.vel.y;
        if block.destroy() {
            hits.push(index);
        }
    }
    hits
}

/// Bounce off the paddle, steering by where the ball touched it.
///
/// Only a descending ball bounces, so a ball still climbing out of the
/// paddle after a bounce can't be caught twice. Returns true on a bounce.
pub fn resolve_ball_paddle(ball: &mut Ball, paddle: &Paddle) -> bool {
    if ball.vel.y <= 0.0 || !collide(ball, &paddle.bounds()) {
        return false;
    }

    // Paddle momentum shifts the contact point
    if paddle.dx != 0.0 {
        ball.pos.x += paddle.dx;
    }

    ball.vel.y = -ball.speed;
    let touch_x = ball.pos.x + ball.size.x / 2.0;
    ball.vel.x = ball.speed * paddle.touch_offset(touch_x);
    true
}

/// Bounce off the left, right and top edges; report the bottom.
///
/// Edges are checked in that order and only the first match is resolved.
pub fn resolve_ball_walls(ball: &mut Ball, canvas: &Canvas) -> Option<Wall> {
    let next = ball.projected();

    if next.left() < 0.0 {
        ball.pos.x = 0.0;
        ball.vel.x = ball.speed;
        Some(Wall::Left)
    } else if next.right() > canvas.width {
        ball.pos.x = canvas.width - ball.size.x;
        ball.vel.x = -ball.speed;
        Some(Wall::Right)
    } else if next.top() < 0.0 {
        ball.pos.y = 0.0;
        ball.vel.y = ball.speed;
        Some(Wall::Top)
    } else if next.bottom() > canvas.height {
        Some(Wall::Bottom)
    } else {
        None
    }
}

/// Hard stop at the canvas sides. Returns true if the paddle was stopped.
pub fn resolve_paddle_walls(paddle: &mut Paddle, canvas: &Canvas) -> bool {
    let next = paddle.projected();
    if next.left() < 0.0 || next.right() > canvas.width {
        paddle.dx = 0.0;
        return true;
    }
    false
}
