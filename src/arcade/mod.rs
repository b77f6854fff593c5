//! Arcade physics core (Breakout and Pong)
//!
//! Deterministic given its inputs:
//! - Fixed tick only, no wall-clock time
//! - Randomness only through the injected source
//! - Stable iteration order (balls and bricks in vector order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod level;
pub mod state;
pub mod tick;

pub use level::{LEVELS, LevelSpec, generate_bricks};
pub use state::{ArcadeConfig, ArcadeMode, ArcadeSession, ArcadeStatus, Ball, Brick, BrickKind, Paddle};
pub use tick::{ArcadeEvent, TickInput, advance};
