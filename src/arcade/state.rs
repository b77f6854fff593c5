//! Arcade session state and core simulation types
//!
//! A session is a self-contained value: the driver owns it, feeds it input
//! and ticks, and replaces it wholesale on restart.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::level::{LevelSpec, generate_bricks};
use crate::consts::*;

/// Which arcade game the session plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArcadeMode {
    /// Brick grid, levels, special bricks
    Breakout,
    /// Single ball, no bricks, every return scores
    Pong,
}

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArcadeStatus {
    /// Active gameplay
    Playing,
    /// Level cleared, next level waiting to start
    LevelTransition,
    /// Run ended
    GameOver,
}

/// Tolerance for "still at launch height"
const LAUNCH_EPSILON: f32 = 0.001;

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Velocity in pixels per tick
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            radius: BALL_RADIUS,
        }
    }

    /// True until the ball has moved off the launch line
    pub fn at_launch_height(&self, launch_y: f32) -> bool {
        (self.pos.y - launch_y).abs() <= LAUNCH_EPSILON
    }
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub center_x: f32,
    pub width: f32,
    /// Vertical centre line, fixed for the session
    pub y: f32,
}

impl Paddle {
    pub fn new(center_x: f32, width: f32, y: f32) -> Self {
        Self { center_x, width, y }
    }

    pub fn left(&self) -> f32 {
        self.center_x - self.width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.center_x + self.width / 2.0
    }

    /// Move the paddle centre to `x`, keeping the paddle inside the playfield.
    /// Non-finite targets are dropped.
    pub fn move_to(&mut self, x: f32, field_width: f32) {
        if !x.is_finite() {
            return;
        }
        let half = self.width / 2.0;
        self.center_x = if self.width >= field_width {
            field_width / 2.0
        } else {
            x.clamp(half, field_width - half)
        };
    }
}

/// Brick types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrickKind {
    #[default]
    Normal,
    /// Ends the run when hit
    Bomb,
    /// Duplicates every live ball when hit
    MultiBall,
}

/// A brick cell in the row-major grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub center: Vec2,
    pub size: Vec2,
    pub kind: BrickKind,
    /// Inactive bricks never collide or score
    pub active: bool,
}

impl Brick {
    pub fn new(center: Vec2, size: Vec2, kind: BrickKind) -> Self {
        Self {
            center,
            size,
            kind,
            active: true,
        }
    }
}

/// Playfield geometry and brick odds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    pub width: f32,
    pub height: f32,
    /// Probability that a generated brick is a Bomb
    pub bomb_chance: f32,
    /// Probability that a generated brick is a MultiBall
    pub multiball_chance: f32,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
            bomb_chance: 0.1,
            multiball_chance: 0.1,
        }
    }
}

impl ArcadeConfig {
    /// Vertical centre line of the paddle
    pub fn paddle_y(&self) -> f32 {
        self.height - PADDLE_BOTTOM_OFFSET
    }

    /// Where Breakout balls spawn
    pub fn launch_point(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.paddle_y() - BALL_LAUNCH_OFFSET)
    }
}

/// Complete arcade state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArcadeSession {
    pub mode: ArcadeMode,
    pub config: ArcadeConfig,
    /// Live balls, in spawn order
    pub balls: Vec<Ball>,
    pub paddle: Paddle,
    /// Row-major brick grid (empty in Pong)
    pub bricks: Vec<Brick>,
    pub score: u64,
    /// Current level, starting at 1
    pub level: u32,
    pub status: ArcadeStatus,
    /// Ticks left in the level transition
    pub transition_ticks: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl ArcadeSession {
    /// Create a session for `mode`; Breakout draws its first brick grid from `rng`
    pub fn new<R: Rng + ?Sized>(mode: ArcadeMode, config: ArcadeConfig, rng: &mut R) -> Self {
        let spec = LevelSpec::for_level(1);
        let paddle = Paddle::new(config.width / 2.0, spec.paddle_width, config.paddle_y());
        let mut session = Self {
            mode,
            config,
            balls: Vec::new(),
            paddle,
            bricks: Vec::new(),
            score: 0,
            level: 1,
            status: ArcadeStatus::Playing,
            transition_ticks: 0,
            time_ticks: 0,
        };

        match mode {
            ArcadeMode::Breakout => session.start_level(1, rng),
            ArcadeMode::Pong => {
                let center = Vec2::new(session.config.width / 2.0, session.config.height / 2.0);
                session
                    .balls
                    .push(Ball::new(center, Vec2::new(BALL_SPEED, BALL_SPEED)));
            }
        }

        session
    }

    /// Bricks still in play
    pub fn active_bricks(&self) -> usize {
        self.bricks.iter().filter(|b| b.active).count()
    }

    /// Continuous input channel: move the paddle, clamped to the playfield.
    ///
    /// In Breakout the first ball rides along while it sits on the launch line.
    pub fn set_paddle_target(&mut self, x: f32) {
        self.paddle.move_to(x, self.config.width);

        if self.mode == ArcadeMode::Breakout {
            let launch_y = self.config.launch_point().y;
            if let Some(ball) = self.balls.first_mut() {
                if ball.at_launch_height(launch_y) {
                    ball.pos.x = self.paddle.center_x;
                }
            }
        }
    }

    /// Reset balls, paddle and bricks for `level`
    pub(crate) fn start_level<R: Rng + ?Sized>(&mut self, level: u32, rng: &mut R) {
        let spec = LevelSpec::for_level(level);
        self.level = level;
        self.bricks = generate_bricks(level, &self.config, rng);
        self.paddle = Paddle::new(self.config.width / 2.0, spec.paddle_width, self.config.paddle_y());
        self.balls.clear();
        self.balls.push(self.serve_ball());
    }

    /// Fresh ball at the launch point heading up and to the right
    fn serve_ball(&self) -> Ball {
        Ball::new(
            self.config.launch_point(),
            Vec2::new(BALL_SPEED, -BALL_SPEED),
        )
    }
}
