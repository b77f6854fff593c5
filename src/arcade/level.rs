//! Breakout level generation
//!
//! Geometry comes from a small per-level table; brick kinds are drawn
//! independently per brick from the session's random source.

use glam::Vec2;
use rand::Rng;

use super::state::{ArcadeConfig, Brick, BrickKind};
use crate::consts::*;

/// Level-indexed layout constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelSpec {
    pub brick_width: f32,
    pub rows: u32,
    pub paddle_width: f32,
}

/// Level 1 and level 2; later levels reuse the last entry
pub const LEVELS: [LevelSpec; 2] = [
    LevelSpec {
        brick_width: 50.0,
        rows: 2,
        paddle_width: 100.0,
    },
    LevelSpec {
        brick_width: 30.0,
        rows: 5,
        paddle_width: 70.0,
    },
];

impl LevelSpec {
    pub fn for_level(level: u32) -> LevelSpec {
        let index = level.saturating_sub(1) as usize;
        LEVELS[index.min(LEVELS.len() - 1)]
    }

    /// Number of brick columns that fit in `field_width` (at least one)
    pub fn columns(&self, field_width: f32) -> u32 {
        let pitch = self.brick_width + BRICK_GAP;
        let usable = field_width - BRICK_ORIGIN_X - self.brick_width / 2.0;
        // Negative space saturates to 0 in the cast
        (usable / pitch).floor() as u32 + 1
    }
}

/// Generate the row-major brick grid for `level`
pub fn generate_bricks<R: Rng + ?Sized>(level: u32, config: &ArcadeConfig, rng: &mut R) -> Vec<Brick> {
    let spec = LevelSpec::for_level(level);
    let cols = spec.columns(config.width);
    let size = Vec2::new(spec.brick_width, BRICK_HEIGHT);

    let mut bricks = Vec::with_capacity((cols * spec.rows) as usize);
    for row in 0..spec.rows {
        for col in 0..cols {
            let center = Vec2::new(
                BRICK_ORIGIN_X + col as f32 * (spec.brick_width + BRICK_GAP),
                BRICK_ORIGIN_Y + row as f32 * (BRICK_HEIGHT + BRICK_GAP),
            );
            bricks.push(Brick::new(center, size, draw_brick_kind(config, rng)));
        }
    }

    let specials = bricks.iter().filter(|b| b.kind != BrickKind::Normal).count();
    log::info!(
        "Level {}: {}x{} bricks, {} special, paddle width {}",
        level,
        cols,
        spec.rows,
        specials,
        spec.paddle_width
    );

    bricks
}

/// Weighted draw: Bomb, then MultiBall, otherwise Normal
pub fn draw_brick_kind<R: Rng + ?Sized>(config: &ArcadeConfig, rng: &mut R) -> BrickKind {
    let roll: f32 = rng.random();
    if roll < config.bomb_chance {
        BrickKind::Bomb
    } else if roll < config.bomb_chance + config.multiball_chance {
        BrickKind::MultiBall
    } else {
        BrickKind::Normal
    }
}
