//! Demo mode - the computer steers the paddle
//!
//! Tracks the ball's center with a small dead zone so the paddle doesn't
//! jitter around a ball that's already lined up. While the ball falls it
//! leads the target slightly off-center, so bounces aren't all vertical.

use super::session::Session;
use super::state::Direction;

/// Fraction of the paddle width the ball may drift before the paddle reacts
const DEAD_ZONE: f32 = 0.25;
/// Offset (fraction of paddle width) to hit the ball off-center
const LEAD: f32 = 0.15;

/// Direction the paddle should move this frame
pub fn steer(session: &Session) -> Direction {
    let ball = session.ball();
    let paddle = session.paddle();
    let width = paddle.size.x;

    let mut target = ball.bounds().center().x;
    if ball.vel.y > 0.0 {
        // Meet the ball on the side it's coming from to send it back across.
        // A vertical ball counts as drifting right (0.0.signum() is 1.0).
        target -= ball.vel.x.signum() * width * LEAD;
    }

    let center = paddle.bounds().center().x;
    let dead_zone = width * DEAD_ZONE / 2.0;
    if target < center - dead_zone {
        Direction::Left
    } else if target > center + dead_zone {
        Direction::Right
    } else {
        Direction::None
    }
}
