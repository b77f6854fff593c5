//! Pocket Arcade - simulation cores for a handful of casual mini-games
//!
//! Core modules:
//! - `arcade`: Fixed-tick ball/paddle/brick physics (Breakout and Pong)
//! - `match3`: Tile grid with match detection, cascades and stalemate rules
//! - `memory`: Card-pair matching
//! - `audio`: Event to sound-cue routing for an external audio backend
//! - `scheduler`: Virtual-clock delays requested by the cores
//! - `settings`: Data-driven configuration
//!
//! Every core is a plain value mutated by explicit operations that return the
//! events they produced. Rendering, input devices and timers live outside.

pub mod arcade;
pub mod audio;
pub mod match3;
pub mod memory;
pub mod scheduler;
pub mod settings;

pub use settings::Settings;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate for the arcade core
    pub const TICK_HZ: u32 = 100;
    /// Position integration scale per tick (velocities are in pixels per tick)
    pub const TICK_SCALE: f32 = 1.0;

    /// Default playfield (portrait phone, points)
    pub const PLAYFIELD_WIDTH: f32 = 390.0;
    pub const PLAYFIELD_HEIGHT: f32 = 844.0;

    /// Paddle sits this far above the bottom edge
    pub const PADDLE_BOTTOM_OFFSET: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 10.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 5.0;
    /// Launch point is this far above the paddle
    pub const BALL_LAUNCH_OFFSET: f32 = 20.0;
    /// Per-axis launch speed (pixels per tick)
    pub const BALL_SPEED: f32 = 2.0;
    /// Horizontal speed range for balls spawned by a MultiBall brick
    pub const MULTIBALL_MAX_VX: f32 = 3.0;

    /// Brick layout
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_GAP: f32 = 5.0;
    pub const BRICK_ORIGIN_X: f32 = 30.0;
    pub const BRICK_ORIGIN_Y: f32 = 50.0;

    /// Ticks spent in the level transition (2 seconds)
    pub const LEVEL_TRANSITION_TICKS: u32 = 2 * TICK_HZ;

    /// Scoring
    pub const BRICK_SCORE: u64 = 10;
    pub const PONG_RETURN_SCORE: u64 = 1;
    pub const MATCH_SCORE: u64 = 30;
    pub const CHAIN_SCORE: u64 = 10;
    pub const MATCH_LEVEL_UP_BONUS: u64 = 50;
    pub const PAIR_SCORE: u64 = 10;
    pub const MEMORY_LEVEL_UP_BONUS: u64 = 50;
}

/// Why a discrete input was not applied.
///
/// Bad input is inert: the cores report it instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// Coordinate or index outside the board
    OutOfRange,
    /// Tile is already part of the pending selection
    AlreadySelected,
    /// Tile is an empty placeholder
    EmptyCell,
    /// Card is already face up in the current pair
    AlreadyFlipped,
    /// Card was matched earlier
    AlreadyMatched,
    /// Session is over
    NotPlaying,
}

/// Deterministic RNG for drivers and tests
pub fn seeded_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}
