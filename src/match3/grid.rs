//! Tile grid for the match-three engine
//!
//! Row-major storage, row 0 at the top. Gravity pulls tiles toward higher
//! row indices. Coordinates outside the grid are rejected by lookup rather
//! than panicking.

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tile colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
}

impl TileKind {
    pub const ALL: [TileKind; 5] = [
        TileKind::Red,
        TileKind::Blue,
        TileKind::Green,
        TileKind::Yellow,
        TileKind::Purple,
    ];

    /// Uniformly random kind
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len() as u32) as usize]
    }

    /// Uniformly random kind, avoiding `banned`
    fn random_except<R: Rng + ?Sized>(rng: &mut R, banned: &[TileKind]) -> Self {
        let choices: Vec<TileKind> = Self::ALL
            .iter()
            .copied()
            .filter(|k| !banned.contains(k))
            .collect();
        choices[rng.random_range(0..choices.len() as u32) as usize]
    }
}

/// A grid cell: `None` is the transient empty placeholder awaiting refill
pub type Tile = Option<TileKind>;

/// Grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Rows x cols matrix of tiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Tile>,
}

impl Grid {
    /// All-empty grid
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    /// Build from explicit rows. Returns `None` for ragged input.
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        Some(Self {
            rows: rows.len(),
            cols,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Random grid with no pre-existing runs of three
    pub fn random_run_free<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
        let mut grid = Self::new(rows, cols);
        for row in 0..rows {
            for col in 0..cols {
                let mut banned = Vec::with_capacity(2);
                if col >= 2 {
                    if let Some(kind) = grid.pair_kind(Coord::new(row, col - 1), Coord::new(row, col - 2)) {
                        banned.push(kind);
                    }
                }
                if row >= 2 {
                    if let Some(kind) = grid.pair_kind(Coord::new(row - 1, col), Coord::new(row - 2, col)) {
                        banned.push(kind);
                    }
                }
                grid.set(Coord::new(row, col), Some(TileKind::random_except(rng, &banned)));
            }
        }
        grid
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Tiles of one row, for rendering
    pub fn row(&self, row: usize) -> Option<&[Tile]> {
        if row >= self.rows {
            return None;
        }
        Some(&self.cells[row * self.cols..(row + 1) * self.cols])
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    #[inline]
    fn index(&self, coord: Coord) -> Option<usize> {
        self.contains(coord).then(|| coord.row * self.cols + coord.col)
    }

    /// Tile at `coord`, or `None` if out of bounds
    pub fn get(&self, coord: Coord) -> Option<Tile> {
        self.index(coord).map(|i| self.cells[i])
    }

    /// Set tile at `coord`. Returns false if out of bounds.
    pub fn set(&mut self, coord: Coord, tile: Tile) -> bool {
        match self.index(coord) {
            Some(i) => {
                self.cells[i] = tile;
                true
            }
            None => false,
        }
    }

    /// Kind shared by both cells, if they are filled and equal
    fn pair_kind(&self, a: Coord, b: Coord) -> Option<TileKind> {
        match (self.get(a).flatten(), self.get(b).flatten()) {
            (Some(x), Some(y)) if x == y => Some(x),
            _ => None,
        }
    }

    /// Every cell is empty
    pub fn is_cleared(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    pub fn has_empty(&self) -> bool {
        self.cells.iter().any(Option::is_none)
    }

    /// All coordinates belonging to a horizontal or vertical run of three or
    /// more identical filled tiles. Runs are detected on the unmodified grid,
    /// so overlapping runs are reported together.
    pub fn find_runs(&self) -> BTreeSet<Coord> {
        let mut matched = BTreeSet::new();

        for row in 0..self.rows {
            self.collect_runs((0..self.cols).map(|col| Coord::new(row, col)), &mut matched);
        }
        for col in 0..self.cols {
            self.collect_runs((0..self.rows).map(|row| Coord::new(row, col)), &mut matched);
        }

        matched
    }

    /// Scan one line of cells for runs
    fn collect_runs(&self, line: impl Iterator<Item = Coord>, matched: &mut BTreeSet<Coord>) {
        let mut run: Vec<Coord> = Vec::new();
        let mut run_kind: Tile = None;

        for coord in line {
            let tile = self.get(coord).flatten();
            if tile.is_some() && tile == run_kind {
                run.push(coord);
                continue;
            }
            if run.len() >= 3 {
                matched.extend(run.iter().copied());
            }
            run.clear();
            run.push(coord);
            run_kind = tile;
        }
        if run.len() >= 3 {
            matched.extend(run);
        }
    }

    /// Mark every coordinate empty
    pub fn clear<'a>(&mut self, coords: impl IntoIterator<Item = &'a Coord>) {
        for coord in coords {
            self.set(*coord, None);
        }
    }

    /// Let tiles fall: per column, filled tiles keep their order and settle at
    /// the bottom, empties collect at the top.
    pub fn compact(&mut self) {
        for col in 0..self.cols {
            let mut write = self.rows;
            for row in (0..self.rows).rev() {
                let tile = self.cells[row * self.cols + col];
                if tile.is_some() {
                    write -= 1;
                    self.cells[row * self.cols + col] = None;
                    self.cells[write * self.cols + col] = tile;
                }
            }
        }
    }

    /// Fill every empty cell with a random kind, row-major. Returns the count.
    pub fn refill<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let mut filled = 0;
        for cell in self.cells.iter_mut().filter(|c| c.is_none()) {
            *cell = Some(TileKind::random(rng));
            filled += 1;
        }
        filled
    }

    /// Whether any legal selection (three tiles of one kind) exists
    pub fn can_match(&self) -> bool {
        TileKind::ALL
            .iter()
            .any(|kind| self.cells.iter().filter(|c| **c == Some(*kind)).count() >= 3)
    }

    /// Insert a new random row at the top without creating runs
    pub fn grow_top<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut row: Vec<Tile> = Vec::with_capacity(self.cols);
        for col in 0..self.cols {
            let mut banned = Vec::with_capacity(2);
            if col >= 2 {
                if let (Some(a), Some(b)) = (row[col - 1], row[col - 2]) {
                    if a == b {
                        banned.push(a);
                    }
                }
            }
            // The current rows 0 and 1 will sit directly below the new row
            if let Some(kind) = self.pair_kind(Coord::new(0, col), Coord::new(1, col)) {
                banned.push(kind);
            }
            row.push(Some(TileKind::random_except(rng, &banned)));
        }

        self.cells.splice(0..0, row);
        self.rows += 1;
    }
}
