//! The 4x4 board and the slide/merge rules that transform it.
//!
//! Every direction is handled the same way: each row or column is read in
//! the order tiles travel (so the destination edge is always index 0),
//! reduced with [`reduce_line`], and written back through the same
//! positions.

use crate::types::{Direction, Outcome, Position, CELL_COUNT, MAX_TILE, SIZE, WIN_TILE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row or column, ordered toward the edge tiles slide to
pub type Line = [u32; SIZE];

/// Result of reducing a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineReduction {
    pub line: Line,
    pub gain: u32,
}

/// Result of sliding the whole grid in one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlideResult {
    /// Whether any line changed
    pub moved: bool,
    /// Sum of merged tile values across all lines
    pub gain: u32,
}

/// Slide a line toward index 0 and merge equal neighbours.
///
/// A tile merges at most once: after a merge the scan continues past the
/// merged cell, so `[2, 2, 2, 2]` becomes `[4, 4, 0, 0]`.
pub fn reduce_line(line: Line) -> LineReduction {
    let mut tiles: Vec<u32> = line.iter().copied().filter(|&v| v != 0).collect();
    let mut gain = 0;

    let mut i = 0;
    while i + 1 < tiles.len() {
        if tiles[i] == tiles[i + 1] {
            tiles[i] *= 2;
            gain += tiles[i];
            tiles.remove(i + 1);
        }
        i += 1;
    }

    let mut reduced = [0; SIZE];
    reduced[..tiles.len()].copy_from_slice(&tiles);
    LineReduction {
        line: reduced,
        gain,
    }
}

/// Positions of line `index` for `direction`, in travel order
pub fn line_positions(direction: Direction, index: usize) -> [Position; SIZE] {
    std::array::from_fn(|k| {
        let along = if direction.is_reversed() { SIZE - 1 - k } else { k };
        if direction.is_horizontal() {
            Position::new(index, along)
        } else {
            Position::new(along, index)
        }
    })
}

/// The 4x4 board. `0` marks an empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Grid {
    cells: [[u32; SIZE]; SIZE],
}

impl Grid {
    /// An empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from explicit rows
    pub fn from_rows(rows: [[u32; SIZE]; SIZE]) -> Self {
        Self { cells: rows }
    }

    /// Build a board from 16 row-major values, if there are exactly 16
    pub fn from_slice(values: &[u32]) -> Option<Self> {
        if values.len() != CELL_COUNT {
            return None;
        }
        let mut grid = Self::new();
        for (index, &value) in values.iter().enumerate() {
            grid.set(Position::from_index(index), value);
        }
        Some(grid)
    }

    pub fn rows(&self) -> &[[u32; SIZE]; SIZE] {
        &self.cells
    }

    /// Row-major copy of all 16 cells
    pub fn to_vec(&self) -> Vec<u32> {
        self.cells.iter().flatten().copied().collect()
    }

    pub fn get(&self, pos: Position) -> u32 {
        self.cells[pos.row][pos.col]
    }

    pub fn set(&mut self, pos: Position, value: u32) {
        self.cells[pos.row][pos.col] = value;
    }

    pub fn clear(&mut self) {
        self.cells = [[0; SIZE]; SIZE];
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.get(pos) == 0
    }

    /// Empty positions in row-major order
    pub fn empty_cells(&self) -> Vec<Position> {
        Position::all().filter(|&p| self.is_empty_at(p)).collect()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&v| v == 0).count()
    }

    pub fn tile_count(&self) -> usize {
        CELL_COUNT - self.empty_count()
    }

    /// Non-zero tile values in row-major order
    pub fn tiles(&self) -> Vec<u32> {
        self.cells.iter().flatten().copied().filter(|&v| v != 0).collect()
    }

    pub fn contains(&self, value: u32) -> bool {
        self.cells.iter().flatten().any(|&v| v == value)
    }

    pub fn max_tile(&self) -> u32 {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Sum of all tile values
    pub fn total(&self) -> u32 {
        self.cells.iter().flatten().sum()
    }

    /// Whether every cell is empty or a power of two from 2 up to
    /// [`MAX_TILE`]. Boards read from storage must pass this before play.
    pub fn is_valid(&self) -> bool {
        self.cells
            .iter()
            .flatten()
            .all(|&v| v == 0 || (v >= 2 && v <= MAX_TILE && v.is_power_of_two()))
    }

    /// Whether two orthogonally adjacent cells hold the same non-zero value
    pub fn has_adjacent_pair(&self) -> bool {
        for row in 0..SIZE {
            for col in 0..SIZE {
                let value = self.cells[row][col];
                if value == 0 {
                    continue;
                }
                if col + 1 < SIZE && self.cells[row][col + 1] == value {
                    return true;
                }
                if row + 1 < SIZE && self.cells[row + 1][col] == value {
                    return true;
                }
            }
        }
        false
    }

    /// Read line `index` for `direction` in travel order
    pub fn line(&self, direction: Direction, index: usize) -> Line {
        line_positions(direction, index).map(|p| self.get(p))
    }

    fn set_line(&mut self, direction: Direction, index: usize, line: Line) {
        for (pos, value) in line_positions(direction, index).into_iter().zip(line) {
            self.set(pos, value);
        }
    }

    /// Slide every line in `direction`, merging equal neighbours.
    ///
    /// Only the board changes; callers own scoring and spawning.
    pub fn slide(&mut self, direction: Direction) -> SlideResult {
        let mut result = SlideResult::default();
        for index in 0..SIZE {
            let before = self.line(direction, index);
            let reduced = reduce_line(before);
            if reduced.line != before {
                result.moved = true;
            }
            result.gain += reduced.gain;
            self.set_line(direction, index, reduced.line);
        }
        result
    }

    /// Evaluate a slide on a copy, leaving this board untouched
    pub fn preview(&self, direction: Direction) -> (Grid, SlideResult) {
        let mut scratch = *self;
        let result = scratch.slide(direction);
        (scratch, result)
    }

    /// Whether the board still has room to play (an empty cell or a mergeable pair)
    pub fn can_move(&self) -> bool {
        self.empty_count() > 0 || self.has_adjacent_pair()
    }

    /// Terminal check: a 2048 tile wins outright, otherwise a board with no
    /// empty cell and no equal neighbours loses.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.contains(WIN_TILE) {
            Some(Outcome::Win)
        } else if self.can_move() {
            None
        } else {
            Some(Outcome::Lose)
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let cells: Vec<String> = row
                .iter()
                .map(|&v| {
                    if v == 0 {
                        format!("{:>5}", ".")
                    } else {
                        format!("{:>5}", v)
                    }
                })
                .collect();
            writeln!(f, "{}", cells.join(""))?;
        }
        Ok(())
    }
}
