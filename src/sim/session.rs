//! Session state machine
//!
//! A `Session` owns everything one game needs: the chosen level, score,
//! entities, block grid and the launch RNG. Nothing is global, so any number
//! of sessions can coexist (tests lean on this).
//!
//! ```text
//! SelectingLevel -> Docked -> InPlay <-> Paused
//!                               |-> Won
//!                               `-> Lost
//! ```

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::level::{LevelConfig, Tier, configure_level};
use super::state::{Ball, BlockGrid, Direction, EntityId, Paddle};
use super::tick::{self, FrameOutcome};
use crate::config::{Canvas, SessionConfig};
use crate::consts::*;
use crate::error::{Action, SimError};

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No tier chosen yet
    SelectingLevel,
    /// Ball on the paddle, waiting for launch
    Docked,
    InPlay,
    Paused,
    /// Every block destroyed
    Won,
    /// Ball fell past the bottom edge
    Lost,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Won | Phase::Lost)
    }
}

/// Things that happened during a frame, for audio and effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball bounced off the paddle
    PaddleBump,
    /// Block at this grid index was destroyed
    BlockHit { index: usize },
    Victory,
    Fail,
}

impl GameEvent {
    /// Sound cue the presentation layer plays for this event
    pub fn sound(&self) -> &'static str {
        match self {
            GameEvent::PaddleBump => "bump",
            GameEvent::BlockHit { .. } => "hit",
            GameEvent::Victory => "victory",
            GameEvent::Fail => "fail",
        }
    }
}

/// Discrete player commands, already decoded from whatever input device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Steer(Direction),
    Launch,
    TogglePause,
}

/// Read-only view for a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub level: Option<Tier>,
    pub score: u32,
    pub total_blocks: u32,
    pub ball: Aabb,
    pub paddle: Aabb,
    /// Active blocks only, row-major
    pub blocks: Vec<Aabb>,
}

/// One game, from level selection to win or loss
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) canvas: Canvas,
    pub(crate) rng: Pcg32,
    pub(crate) phase: Phase,
    pub(crate) level: Option<LevelConfig>,
    pub(crate) score: u32,
    pub(crate) ball: Ball,
    pub(crate) paddle: Paddle,
    pub(crate) blocks: BlockGrid,
    pub(crate) events: Vec<GameEvent>,
    /// Frames simulated in the current attempt
    pub(crate) frame: u64,
    next_id: u32,
}

impl Session {
    /// Create a session waiting for a level choice
    pub fn new(config: SessionConfig) -> Self {
        let canvas = config.canvas;
        let mut session = Self {
            canvas,
            rng: Pcg32::seed_from_u64(config.seed),
            phase: Phase::SelectingLevel,
            level: None,
            score: 0,
            ball: Ball::new(EntityId(0), Vec2::ZERO, 0.0),
            paddle: Paddle::new(Vec2::ZERO, DEFAULT_PADDLE_SPEED),
            blocks: BlockGrid::default(),
            events: Vec::new(),
            frame: 0,
            next_id: 1,
        };
        session.place_entities(0.0, DEFAULT_PADDLE_SPEED);
        session
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Fresh paddle and docked ball at their spawn points
    fn place_entities(&mut self, ball_speed: f32, paddle_speed: f32) {
        let Canvas { width, height } = self.canvas;
        let id = self.next_entity_id();
        self.ball = Ball::new(
            id,
            Vec2::new(width / 2.0 - BALL_OFFSET_X, height - BALL_OFFSET_Y),
            ball_speed,
        );
        self.paddle = Paddle::new(
            Vec2::new(width / 2.0 - PADDLE_OFFSET_X, height - PADDLE_OFFSET_Y),
            paddle_speed,
        );
        self.paddle.dock(&mut self.ball);
    }

    /// Check the level's grid and the paddle fit on this canvas
    fn check_layout(&self, level: &LevelConfig) -> Result<(), SimError> {
        self.canvas.validate()?;
        let Canvas { width, height } = self.canvas;
        let grid_w = BLOCK_STRIDE_X * level.columns as f32;
        let grid_h = BLOCK_STRIDE_Y * level.rows as f32;
        if grid_w > width || grid_h > height || PADDLE_WIDTH > width || BALL_OFFSET_Y > height {
            return Err(SimError::Config(format!(
                "{} level ({}x{} blocks) does not fit a {}x{} canvas",
                level.tier, level.rows, level.columns, width, height
            )));
        }
        Ok(())
    }

    /// (Re)build the board for `level` and dock the ball
    fn begin_attempt(&mut self, level: LevelConfig) {
        self.blocks = BlockGrid::build(level.rows, level.columns, &self.canvas);
        self.place_entities(level.ball_speed, level.paddle_speed);
        self.level = Some(level);
        self.score = 0;
        self.frame = 0;
        self.events.clear();
        self.phase = Phase::Docked;
    }

    /// Start a level: `SelectingLevel -> Docked`
    pub fn start(&mut self, level: LevelConfig) -> Result<(), SimError> {
        if self.phase != Phase::SelectingLevel {
            return Err(self.reject(Action::Start));
        }
        self.check_layout(&level)?;
        self.begin_attempt(level);
        log::info!(
            "Started {} level: {}x{} blocks, ball speed {}, paddle speed {}",
            level.tier,
            level.rows,
            level.columns,
            level.ball_speed,
            level.paddle_speed
        );
        Ok(())
    }

    /// Size the canvas to the player's viewport before a level starts.
    ///
    /// The canvas is fixed once a level is running, so this is only
    /// accepted while selecting a level.
    pub fn fit_viewport(
        &mut self,
        viewport_w: f32,
        viewport_h: f32,
        pixel_ratio: f32,
    ) -> Result<Canvas, SimError> {
        if self.phase != Phase::SelectingLevel {
            return Err(self.reject(Action::Resize));
        }
        let canvas = self.canvas.fit_to_viewport(viewport_w, viewport_h, pixel_ratio);
        canvas.validate()?;
        self.canvas = canvas;
        self.place_entities(0.0, DEFAULT_PADDLE_SPEED);
        log::info!("Canvas fitted to viewport: {}x{}", canvas.width, canvas.height);
        Ok(canvas)
    }

    /// Start by tier name, as the level picker reports it
    pub fn select_level(&mut self, name: &str) -> Result<(), SimError> {
        let level = configure_level(name)?;
        self.start(level)
    }

    /// Same tier again from a clean board
    pub fn restart(&mut self) -> Result<(), SimError> {
        let level = match self.level {
            Some(level) => level,
            None => return Err(self.reject(Action::Restart)),
        };
        self.begin_attempt(level);
        log::info!("Restarted {} level", level.tier);
        Ok(())
    }

    /// Drop the level and go back to choosing one
    pub fn main_menu(&mut self) {
        self.level = None;
        self.score = 0;
        self.frame = 0;
        self.blocks = BlockGrid::default();
        self.events.clear();
        self.place_entities(0.0, DEFAULT_PADDLE_SPEED);
        self.phase = Phase::SelectingLevel;
        log::info!("Returned to level selection");
    }

    /// Latest direction wins; takes effect on the next step
    pub fn set_paddle_direction(&mut self, direction: Direction) {
        self.paddle.set_direction(direction);
    }

    /// Release the docked ball: `Docked -> InPlay`
    pub fn launch_ball(&mut self) -> Result<(), SimError> {
        if self.phase != Phase::Docked {
            return Err(self.reject(Action::Launch));
        }
        if self.paddle.release() == Some(self.ball.id) {
            self.ball.launch(&mut self.rng);
        }
        self.phase = Phase::InPlay;
        log::debug!("Ball launched with velocity {}", self.ball.vel);
        Ok(())
    }

    /// `InPlay <-> Paused`
    pub fn toggle_pause(&mut self) -> Result<(), SimError> {
        let next = match self.phase {
            Phase::InPlay => Phase::Paused,
            Phase::Paused => Phase::InPlay,
            _ => return Err(self.reject(Action::TogglePause)),
        };
        self.phase = next;
        log::info!("Game {}", if self.is_paused() { "paused" } else { "resumed" });
        Ok(())
    }

    pub fn apply(&mut self, command: Command) -> Result<(), SimError> {
        match command {
            Command::Steer(direction) => {
                self.set_paddle_direction(direction);
                Ok(())
            }
            Command::Launch => self.launch_ball(),
            Command::TogglePause => self.toggle_pause(),
        }
    }

    /// Advance one frame. Rejected unless the ball is docked or in play.
    pub fn step(&mut self) -> Result<FrameOutcome, SimError> {
        tick::step(self)
    }

    pub(crate) fn reject(&self, action: Action) -> SimError {
        // Drivers keep calling step() while paused or finished
        if action == Action::Step {
            log::debug!("Rejected {} while {:?}", action.as_str(), self.phase);
        } else {
            log::warn!("Rejected {} while {:?}", action.as_str(), self.phase);
        }
        SimError::transition(action, self.phase)
    }

    pub(crate) fn total_blocks(&self) -> u32 {
        self.blocks.len() as u32
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn level(&self) -> Option<&LevelConfig> {
        self.level.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn paddle(&self) -> &Paddle {
        &self.paddle
    }

    pub fn blocks(&self) -> &BlockGrid {
        &self.blocks
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Frames are being simulated (ball docked or in play)
    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Docked | Phase::InPlay)
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            level: self.level.map(|l| l.tier),
            score: self.score,
            total_blocks: self.total_blocks(),
            ball: self.ball.bounds(),
            paddle: self.paddle.bounds(),
            blocks: self.blocks.iter_active().map(|b| *b.bounds()).collect(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(tier: Tier) -> Session {
        let mut session = Session::new(SessionConfig::with_seed(42));
        session.start(tier.config()).unwrap();
        session
    }

    #[test]
    fn test_new_session_waits_for_level() {
        let session = Session::default();
        assert_eq!(session.phase(), Phase::SelectingLevel);
        assert!(session.level().is_none());
        assert!(session.blocks().is_empty());
        assert!(!session.is_running());
        assert!(!session.is_paused());
    }

    #[test]
    fn test_start_builds_board() {
        let session = started(Tier::Beginner);
        assert_eq!(session.phase(), Phase::Docked);
        assert_eq!(session.score(), 0);
        assert_eq!(session.blocks().active_count(), 32);

        // Ball centered above the paddle and docked to it
        assert_eq!(session.ball().pos, Vec2::new(620.0, 635.0));
        assert_eq!(session.paddle().pos, Vec2::new(515.0, 675.0));
        assert_eq!(session.paddle().docked, Some(session.ball().id));
        assert!(session.ball().is_docked());
        assert_eq!(session.ball().vel, Vec2::ZERO);
        assert_eq!(session.ball().speed, 4.0);
    }

    #[test]
    fn test_select_level_by_name() {
        let mut session = Session::default();
        assert_eq!(
            session.select_level("wizard"),
            Err(SimError::InvalidTier("wizard".into()))
        );
        assert_eq!(session.phase(), Phase::SelectingLevel);

        session.select_level("professional").unwrap();
        assert_eq!(session.blocks().len(), 77);
        assert_eq!(session.paddle().speed, 8.0);

        // Can't start twice
        assert!(matches!(
            session.select_level("gamer"),
            Err(SimError::InvalidTransition {
                action: Action::Start,
                ..
            })
        ));
    }

    #[test]
    fn test_start_rejects_small_canvas() {
        let config = SessionConfig {
            canvas: Canvas::new(1000.0, 600.0),
            ..SessionConfig::default()
        };
        let mut session = Session::new(config);
        assert!(matches!(
            session.start(Tier::Professional.config()),
            Err(SimError::Config(_))
        ));
        assert_eq!(session.phase(), Phase::SelectingLevel);
        // 8 columns fit in 1000px
        session.start(Tier::Beginner.config()).unwrap();
    }

    #[test]
    fn test_start_rejects_non_finite_canvas() {
        for canvas in [
            Canvas::new(f32::NAN, 720.0),
            Canvas::new(f32::INFINITY, 720.0),
            Canvas::new(1280.0, f32::NAN),
        ] {
            let mut session = Session::new(SessionConfig {
                canvas,
                ..SessionConfig::default()
            });
            assert!(matches!(
                session.start(Tier::Beginner.config()),
                Err(SimError::Config(_))
            ));
            assert_eq!(session.phase(), Phase::SelectingLevel);
            assert!(session.blocks().is_empty());
        }
    }

    #[test]
    fn test_fit_viewport_before_start() {
        let mut session = Session::default();
        // 1280 * 500 / 1600 = 400
        let canvas = session.fit_viewport(1600.0, 500.0, 2.0).unwrap();
        assert_eq!(canvas, Canvas::new(1280.0, 400.0));
        assert_eq!(*session.canvas(), canvas);
        assert_eq!(session.paddle().pos, Vec2::new(515.0, 355.0));

        session.select_level("beginner").unwrap();
        // Grid centered on the fitted canvas: (400 - 42 * 4) / 2 = 116
        assert_eq!(session.blocks().get(0).unwrap().bounds().top(), 116.0);

        // Canvas is fixed once the level runs
        assert!(matches!(
            session.fit_viewport(800.0, 800.0, 1.0),
            Err(SimError::InvalidTransition {
                action: Action::Resize,
                ..
            })
        ));
        assert_eq!(*session.canvas(), canvas);
    }

    #[test]
    fn test_launch_only_when_docked() {
        let mut session = Session::default();
        assert!(session.launch_ball().is_err());

        let mut session = started(Tier::Gamer);
        session.launch_ball().unwrap();
        assert_eq!(session.phase(), Phase::InPlay);
        assert!(session.paddle().docked.is_none());
        assert_eq!(session.ball().vel.y, -6.0);
        assert!(session.ball().vel.x.abs() <= 6.0);

        let vel = session.ball().vel;
        assert_eq!(
            session.launch_ball(),
            Err(SimError::InvalidTransition {
                action: Action::Launch,
                phase: Phase::InPlay
            })
        );
        assert_eq!(session.ball().vel, vel);
    }

    #[test]
    fn test_pause_toggle() {
        let mut session = started(Tier::Beginner);
        // Nothing to pause before launch
        assert!(session.toggle_pause().is_err());
        assert_eq!(session.phase(), Phase::Docked);

        session.launch_ball().unwrap();
        session.toggle_pause().unwrap();
        assert!(session.is_paused());
        assert!(!session.is_running());
        session.toggle_pause().unwrap();
        assert!(session.is_running());
        assert!(!session.is_paused());
    }

    #[test]
    fn test_restart_keeps_tier() {
        let mut session = started(Tier::Gamer);
        let first_ball = session.ball().id;
        session.launch_ball().unwrap();
        session.score = 3;

        session.restart().unwrap();
        assert_eq!(session.phase(), Phase::Docked);
        assert_eq!(session.level().map(|l| l.tier), Some(Tier::Gamer));
        assert_eq!(session.score(), 0);
        assert_eq!(session.blocks().active_count(), 50);
        assert_ne!(session.ball().id, first_ball);
        assert_eq!(session.paddle().docked, Some(session.ball().id));
    }

    #[test]
    fn test_main_menu_clears_tier() {
        let mut session = started(Tier::Gamer);
        session.main_menu();
        assert_eq!(session.phase(), Phase::SelectingLevel);
        assert!(session.level().is_none());
        assert!(session.restart().is_err());
        session.select_level("beginner").unwrap();
        assert_eq!(session.blocks().len(), 32);
    }

    #[test]
    fn test_apply_commands() {
        let mut session = started(Tier::Beginner);
        session.apply(Command::Steer(Direction::Left)).unwrap();
        assert_eq!(session.paddle().dx, -6.0);
        session.apply(Command::Launch).unwrap();
        session.apply(Command::TogglePause).unwrap();
        assert_eq!(session.phase(), Phase::Paused);
    }

    #[test]
    fn test_snapshot() {
        let session = started(Tier::Beginner);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, Phase::Docked);
        assert_eq!(snapshot.level, Some(Tier::Beginner));
        assert_eq!(snapshot.total_blocks, 32);
        assert_eq!(snapshot.blocks.len(), 32);
        assert_eq!(snapshot.ball, Aabb::new(620.0, 635.0, 40.0, 40.0));

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut a = started(Tier::Beginner);
        let b = started(Tier::Beginner);
        a.launch_ball().unwrap();
        assert_eq!(b.phase(), Phase::Docked);
        assert!(b.ball().is_docked());
    }
}
