//! Entity model: ball, paddle and the block grid
//!
//! Plain value types. The paddle never holds the ball itself while docked,
//! only its `EntityId`; whoever owns both passes the ball in when the paddle
//! moves.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use crate::config::Canvas;
use crate::consts::*;

/// Stable identifier for a spawned entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Commanded paddle direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    #[default]
    None,
}

impl Direction {
    #[inline]
    pub fn sign(&self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
            Direction::None => 0.0,
        }
    }
}

/// Ball state - riding the paddle or free-moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    /// Rigidly attached to the paddle, no velocity of its own
    Docked,
    Free,
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: EntityId,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Per-frame displacement
    pub vel: Vec2,
    /// Magnitude used for every reflection
    pub speed: f32,
    pub state: BallState,
}

impl Ball {
    /// Spawn a docked ball at `pos`
    pub fn new(id: EntityId, pos: Vec2, speed: f32) -> Self {
        Self {
            id,
            pos,
            size: Vec2::splat(BALL_SIZE),
            vel: Vec2::ZERO,
            speed,
            state: BallState::Docked,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Where the ball will be after this frame's velocity is applied
    pub fn projected(&self) -> Aabb {
        self.bounds().translated(self.vel)
    }

    pub fn is_docked(&self) -> bool {
        self.state == BallState::Docked
    }

    /// Launch from the dock: straight up at `speed`, with a random integer
    /// sideways component in `[-speed, speed]`.
    ///
    /// Returns false (and does nothing) when the ball is already free.
    pub fn launch<R: Rng>(&mut self, rng: &mut R) -> bool {
        if !self.is_docked() {
            return false;
        }
        let spread = self.speed.round() as i32;
        let dx = rng.random_range(-spread..=spread);
        self.vel = Vec2::new(dx as f32, -self.speed);
        self.state = BallState::Free;
        true
    }

    /// Commit this frame's (already resolved) velocity
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    /// Horizontal displacement this frame: -speed, 0 or +speed
    pub dx: f32,
    /// Last commanded direction (held until changed)
    pub direction: Direction,
    /// Ball riding the paddle, if any
    pub docked: Option<EntityId>,
}

impl Paddle {
    pub fn new(pos: Vec2, speed: f32) -> Self {
        Self {
            pos,
            size: Vec2::new(PADDLE_WIDTH, PADDLE_HEIGHT),
            speed,
            dx: 0.0,
            direction: Direction::None,
            docked: None,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb {
            pos: self.pos,
            size: self.size,
        }
    }

    pub fn projected(&self) -> Aabb {
        self.bounds().translated(Vec2::new(self.dx, 0.0))
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
        self.steer();
    }

    /// Re-derive `dx` from the held direction (undoes last frame's wall stop)
    pub fn steer(&mut self) {
        self.dx = self.direction.sign() * self.speed;
    }

    /// Take ownership of the ball's motion
    pub fn dock(&mut self, ball: &mut Ball) {
        ball.state = BallState::Docked;
        ball.vel = Vec2::ZERO;
        self.docked = Some(ball.id);
    }

    /// Hand motion back to the docked ball, if there is one
    pub fn release(&mut self) -> Option<EntityId> {
        self.docked.take()
    }

    /// Move by `dx`; a docked ball moves with it
    pub fn advance(&mut self, ball: &mut Ball) {
        if self.dx == 0.0 {
            return;
        }
        self.pos.x += self.dx;
        if self.docked == Some(ball.id) {
            ball.pos.x += self.dx;
        }
    }

    /// Normalized horizontal contact point: -1 at the left edge, 0 at the
    /// center, +1 at the right edge. Clamped for contacts past the corners.
    pub fn touch_offset(&self, x: f32) -> f32 {
        let width = self.size.x;
        let diff = (self.pos.x + width) - x;
        let offset = width - diff;
        // A ball can overlap the paddle with its center past a corner; unclamped
        // that would bounce it sideways faster than its speed.
        (2.0 * offset / width - 1.0).clamp(-1.0, 1.0)
    }
}

/// A destructible block. Geometry is fixed at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    bounds: Aabb,
    active: bool,
}

impl Block {
    pub fn new(bounds: Aabb) -> Self {
        Self {
            bounds,
            active: true,
        }
    }

    #[inline]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Deactivate for good. Returns whether this call did it.
    pub(crate) fn destroy(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }
}

/// Row-major grid of blocks, centered on the canvas
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockGrid {
    rows: u32,
    columns: u32,
    blocks: Vec<Block>,
}

impl BlockGrid {
    pub fn build(rows: u32, columns: u32, canvas: &Canvas) -> Self {
        let left = (canvas.width - BLOCK_STRIDE_X * columns as f32) / 2.0;
        let top = (canvas.height - BLOCK_STRIDE_Y * rows as f32) / 2.0;

        let mut blocks = Vec::with_capacity((rows * columns) as usize);
        for row in 0..rows {
            for column in 0..columns {
                blocks.push(Block::new(Aabb::new(
                    BLOCK_STRIDE_X * column as f32 + left,
                    BLOCK_STRIDE_Y * row as f32 + top,
                    BLOCK_WIDTH,
                    BLOCK_HEIGHT,
                )));
            }
        }

        Self {
            rows,
            columns,
            blocks,
        }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| b.is_active())
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Block> {
        self.blocks.iter_mut()
    }

    pub fn active_count(&self) -> usize {
        self.iter_active().count()
    }

    pub fn destroyed_count(&self) -> usize {
        self.len() - self.active_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn docked_pair() -> (Paddle, Ball) {
        let mut paddle = Paddle::new(Vec2::new(515.0, 675.0), 6.0);
        let mut ball = Ball::new(EntityId(1), Vec2::new(620.0, 635.0), 4.0);
        paddle.dock(&mut ball);
        (paddle, ball)
    }

    #[test]
    fn test_launch_from_dock() {
        let mut rng = Pcg32::seed_from_u64(12345);
        for _ in 0..50 {
            let (_, mut ball) = docked_pair();
            assert!(ball.launch(&mut rng));
            assert_eq!(ball.vel.y, -4.0);
            assert!((-4.0..=4.0).contains(&ball.vel.x));
            assert_eq!(ball.vel.x.fract(), 0.0);
            assert_eq!(ball.state, BallState::Free);
        }
    }

    #[test]
    fn test_launch_is_seeded() {
        let (_, mut a) = docked_pair();
        let (_, mut b) = docked_pair();
        a.launch(&mut Pcg32::seed_from_u64(7));
        b.launch(&mut Pcg32::seed_from_u64(7));
        assert_eq!(a.vel, b.vel);
    }

    #[test]
    fn test_launch_free_ball_is_noop() {
        let mut rng = Pcg32::seed_from_u64(1);
        let (_, mut ball) = docked_pair();
        ball.launch(&mut rng);
        let vel = ball.vel;
        assert!(!ball.launch(&mut rng));
        assert_eq!(ball.vel, vel);
    }

    #[test]
    fn test_paddle_carries_docked_ball() {
        let (mut paddle, mut ball) = docked_pair();
        paddle.set_direction(Direction::Right);
        paddle.advance(&mut ball);
        assert_eq!(paddle.pos.x, 521.0);
        assert_eq!(ball.pos.x, 626.0);
        assert_eq!(ball.pos.y, 635.0);

        // Once released, the ball stays put
        assert_eq!(paddle.release(), Some(ball.id));
        paddle.advance(&mut ball);
        assert_eq!(paddle.pos.x, 527.0);
        assert_eq!(ball.pos.x, 626.0);
    }

    #[test]
    fn test_direction_sets_dx() {
        let (mut paddle, _) = docked_pair();
        paddle.set_direction(Direction::Left);
        assert_eq!(paddle.dx, -6.0);
        paddle.set_direction(Direction::None);
        assert_eq!(paddle.dx, 0.0);
        paddle.set_direction(Direction::Right);
        paddle.dx = 0.0;
        paddle.steer();
        assert_eq!(paddle.dx, 6.0);
    }

    #[test]
    fn test_touch_offset() {
        let (paddle, _) = docked_pair();
        assert_eq!(paddle.touch_offset(515.0), -1.0);
        assert_eq!(paddle.touch_offset(515.0 + 251.0), 1.0);
        assert_eq!(paddle.touch_offset(515.0 + 125.5), 0.0);
        assert_eq!(paddle.touch_offset(400.0), -1.0);
        assert!(paddle.touch_offset(600.0) < 0.0);
        assert!(paddle.touch_offset(700.0) > 0.0);
    }

    #[test]
    fn test_grid_layout() {
        let grid = BlockGrid::build(4, 8, &Canvas::new(1280.0, 720.0));
        assert_eq!(grid.len(), 32);
        assert_eq!(grid.active_count(), 32);

        // Centered: (1280 - 114 * 8) / 2 = 184, (720 - 42 * 4) / 2 = 276
        let first = grid.get(0).unwrap().bounds();
        assert_eq!(*first, Aabb::new(184.0, 276.0, 112.0, 40.0));

        // Row-major: index 8 starts the second row
        let second_row = grid.get(8).unwrap().bounds();
        assert_eq!(second_row.pos, Vec2::new(184.0, 318.0));
        let last = grid.get(31).unwrap().bounds();
        assert_eq!(last.pos, Vec2::new(184.0 + 114.0 * 7.0, 276.0 + 42.0 * 3.0));
    }

    #[test]
    fn test_block_destroy_once() {
        let mut block = Block::new(Aabb::new(0.0, 0.0, 112.0, 40.0));
        assert!(block.destroy());
        assert!(!block.destroy());
        assert!(!block.is_active());
    }
}
