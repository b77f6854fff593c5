//! Match-three core
//!
//! Pure grid logic plus the session rules layered on top. No timers: the
//! level overlay is requested through a [`crate::scheduler::PendingDelay`].

pub mod engine;
pub mod grid;

#[cfg(test)]
pub(crate) mod test_rng;

pub use engine::{MAX_CASCADE_PASSES, MatchConfig, MatchEvent, MatchSession, MatchStatus, level_grid};
pub use grid::{Coord, Grid, Tile, TileKind};
