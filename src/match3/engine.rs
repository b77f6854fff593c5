//! Match-three rules: selection, cascades, levels and stalemate
//!
//! The player picks three tiles anywhere on the board. Three of a kind are
//! cleared and the board settles: runs are scanned and cleared together,
//! columns compact, empties refill, and the loop repeats until a scan comes
//! back clean.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::grid::{Coord, Grid, Tile, TileKind};
use crate::IgnoreReason;
use crate::consts::{CHAIN_SCORE, MATCH_LEVEL_UP_BONUS, MATCH_SCORE};
use crate::scheduler::{DelayReason, LEVEL_OVERLAY_MS, PendingDelay};

/// Upper bound on scan/compact/refill passes in one settle
pub const MAX_CASCADE_PASSES: u32 = 64;

/// Tiles needed for one selection
pub const SELECTION_SIZE: usize = 3;

/// The tutorial board: one row, two triples
const LEVEL_ONE_TILES: [TileKind; 6] = [
    TileKind::Red,
    TileKind::Red,
    TileKind::Red,
    TileKind::Green,
    TileKind::Green,
    TileKind::Green,
];

/// Board dimensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Columns on the level 2 board
    pub cols: usize,
    /// Rows on a fresh level 2 board
    pub start_rows: usize,
    /// Stalled boards grow up to this many rows, then the game ends
    pub max_rows: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            cols: 6,
            start_rows: 2,
            max_rows: 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    Playing,
    /// Just promoted; the next selection (or `resume`) continues play
    LevelUp,
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEvent {
    Selected { coord: Coord },
    Ignored { coord: Coord, reason: IgnoreReason },
    /// Third pick shared a kind; the three tiles were cleared
    SelectionMatched { coords: [Coord; SELECTION_SIZE] },
    /// Third pick did not match; selection dropped
    SelectionRejected,
    /// A settle pass cleared runs. Pass 0 is the direct match, later passes are chains.
    RunsCleared { pass: u32, tiles: usize, points: u64 },
    Refilled { tiles: usize },
    /// A stalled board gained a row
    GridGrew { rows: usize },
    LevelUp { level: u32 },
    DelayRequested(PendingDelay),
    GameOver,
}

/// Complete match-three state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSession {
    pub config: MatchConfig,
    pub grid: Grid,
    pub score: u64,
    /// 1 (tutorial row) or 2 (full board)
    pub level: u32,
    pub status: MatchStatus,
    /// Pending picks, at most two between calls
    pub selection: Vec<Coord>,
}

impl MatchSession {
    /// New game at level 1
    pub fn new<R: Rng + ?Sized>(config: MatchConfig, rng: &mut R) -> Self {
        let grid = level_grid(1, &config, rng);
        Self::with_grid(config, grid, 1)
    }

    /// Session over an explicit board
    pub fn with_grid(config: MatchConfig, grid: Grid, level: u32) -> Self {
        Self {
            config,
            grid,
            score: 0,
            level,
            status: MatchStatus::Playing,
            selection: Vec::with_capacity(SELECTION_SIZE),
        }
    }

    /// Leave the level-up state. Returns false if there was nothing to leave.
    pub fn resume(&mut self) -> bool {
        if self.status == MatchStatus::LevelUp {
            self.status = MatchStatus::Playing;
            true
        } else {
            false
        }
    }

    /// Discrete input channel: pick the tile at `coord`
    pub fn select<R: Rng + ?Sized>(&mut self, coord: Coord, rng: &mut R) -> Vec<MatchEvent> {
        let mut events = Vec::new();

        let rejection = match self.grid.get(coord) {
            _ if self.status == MatchStatus::GameOver => Some(IgnoreReason::NotPlaying),
            None => Some(IgnoreReason::OutOfRange),
            Some(None) => Some(IgnoreReason::EmptyCell),
            Some(Some(_)) if self.selection.contains(&coord) => Some(IgnoreReason::AlreadySelected),
            Some(Some(_)) => None,
        };
        if let Some(reason) = rejection {
            log::debug!("Ignoring selection {:?}: {:?}", coord, reason);
            events.push(MatchEvent::Ignored { coord, reason });
            return events;
        }

        self.resume();
        self.selection.push(coord);
        events.push(MatchEvent::Selected { coord });

        if self.selection.len() < SELECTION_SIZE {
            return events;
        }

        let picks = [self.selection[0], self.selection[1], self.selection[2]];
        self.selection.clear();

        let kinds: Vec<Tile> = picks.iter().map(|c| self.grid.get(*c).flatten()).collect();
        if kinds.iter().all(|k| *k == kinds[0]) {
            self.grid.clear(&picks);
            self.score += MATCH_SCORE;
            events.push(MatchEvent::SelectionMatched { coords: picks });
            events.extend(self.settle(rng));
        } else {
            events.push(MatchEvent::SelectionRejected);
        }

        events
    }

    /// Cascade the board to a fixed point, then apply level rules
    pub fn settle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<MatchEvent> {
        let mut events = Vec::new();
        if self.status == MatchStatus::GameOver {
            return events;
        }
        self.cascade(rng, &mut events);
        self.check_progress(rng, &mut events);
        events
    }

    /// Scan, clear, compact and refill until nothing matches.
    ///
    /// The tutorial level never refills, so its board only empties.
    fn cascade<R: Rng + ?Sized>(&mut self, rng: &mut R, events: &mut Vec<MatchEvent>) {
        let refill = self.level >= 2;
        let mut pass = 0u32;

        loop {
            if pass >= MAX_CASCADE_PASSES {
                log::warn!("Cascade stopped after {} passes", pass);
                break;
            }

            let runs = self.grid.find_runs();
            if runs.is_empty() && (!refill || !self.grid.has_empty()) {
                self.grid.compact();
                break;
            }

            if !runs.is_empty() {
                let points = if pass == 0 { MATCH_SCORE } else { CHAIN_SCORE };
                self.grid.clear(&runs);
                self.score += points;
                events.push(MatchEvent::RunsCleared {
                    pass,
                    tiles: runs.len(),
                    points,
                });
            }

            self.grid.compact();
            if refill {
                let tiles = self.grid.refill(rng);
                if tiles > 0 {
                    events.push(MatchEvent::Refilled { tiles });
                }
            }
            pass += 1;
        }

        if pass > 1 {
            log::debug!("Cascade settled after {} passes, score {}", pass, self.score);
        }
    }

    /// Level completion and stalemate handling
    fn check_progress<R: Rng + ?Sized>(&mut self, rng: &mut R, events: &mut Vec<MatchEvent>) {
        if self.level == 1 {
            if self.grid.is_cleared() {
                self.level_up(rng, events);
            }
            return;
        }

        while !self.grid.can_match() {
            if self.grid.rows() >= self.config.max_rows {
                self.status = MatchStatus::GameOver;
                events.push(MatchEvent::GameOver);
                log::info!("Board stalled at {} rows, game over (score {})", self.grid.rows(), self.score);
                return;
            }
            self.grid.grow_top(rng);
            events.push(MatchEvent::GridGrew {
                rows: self.grid.rows(),
            });
            log::debug!("Board stalled, grew to {} rows", self.grid.rows());
        }
    }

    fn level_up<R: Rng + ?Sized>(&mut self, rng: &mut R, events: &mut Vec<MatchEvent>) {
        self.level = 2;
        self.score += MATCH_LEVEL_UP_BONUS;
        self.grid = level_grid(self.level, &self.config, rng);
        self.selection.clear();
        self.status = MatchStatus::LevelUp;

        events.push(MatchEvent::LevelUp { level: self.level });
        events.push(MatchEvent::DelayRequested(PendingDelay {
            after_ms: LEVEL_OVERLAY_MS,
            reason: DelayReason::DismissLevelOverlay { level: self.level },
        }));
        log::info!("Match-three level {} (score {})", self.level, self.score);
    }
}

/// Fresh board for `level`
pub fn level_grid<R: Rng + ?Sized>(level: u32, config: &MatchConfig, rng: &mut R) -> Grid {
    if level <= 1 {
        let mut tiles = LEVEL_ONE_TILES;
        tiles.shuffle(rng);
        let row: Vec<Tile> = tiles.into_iter().map(Some).collect();
        Grid::from_rows(vec![row]).unwrap_or_else(|| Grid::new(1, LEVEL_ONE_TILES.len()))
    } else {
        Grid::random_run_free(config.start_rows, config.cols, rng)
    }
}
