//! One-ply move advisor.
//!
//! Every direction is slid on a scratch copy of the board; the direction
//! with the largest immediate score gain wins, ties going to the earlier
//! direction in `Direction::ALL`.

use crate::grid::{line_positions, Grid};
use crate::types::{Direction, Position, SIZE};
use serde::{Deserialize, Serialize};

/// Evaluation of a single direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionEval {
    pub direction: Direction,
    pub moved: bool,
    pub gain: u32,
}

/// A pair of tiles that would merge, ordered (destination, source)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergePair {
    pub into: Position,
    pub from: Position,
}

/// A suggested move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub direction: Direction,
    /// Score the move would earn
    pub gain: u32,
    /// Tiles that would merge, for highlighting
    pub merges: Vec<MergePair>,
}

impl Hint {
    /// Short human-readable description
    pub fn explanation(&self) -> String {
        if self.gain > 0 {
            format!(
                "Move {} {} to merge {} pair{} for +{}",
                self.direction,
                self.direction.arrow(),
                self.merges.len(),
                if self.merges.len() == 1 { "" } else { "s" },
                self.gain
            )
        } else {
            format!(
                "No merges available. Move {} {} to reposition",
                self.direction,
                self.direction.arrow()
            )
        }
    }
}

/// Evaluate all four directions without touching `grid`
pub fn evaluate(grid: &Grid) -> [DirectionEval; 4] {
    Direction::ALL.map(|direction| {
        let (_, result) = grid.preview(direction);
        DirectionEval {
            direction,
            moved: result.moved,
            gain: result.gain,
        }
    })
}

/// Pick the best direction, or `None` when no direction changes the board
pub fn best_move(grid: &Grid) -> Option<Hint> {
    let mut best: Option<DirectionEval> = None;
    for eval in evaluate(grid) {
        if !eval.moved {
            continue;
        }
        match best {
            Some(current) if eval.gain <= current.gain => {}
            _ => best = Some(eval),
        }
    }

    best.map(|eval| Hint {
        direction: eval.direction,
        gain: eval.gain,
        merges: merge_pairs(grid, eval.direction),
    })
}

/// Tiles that would merge when sliding `grid` toward `direction`.
///
/// Along each line, a tile pairs with the nearest non-empty tile behind it
/// in travel order if the values match. A merged pair is consumed, and a
/// mismatched tile is never skipped over.
pub fn merge_pairs(grid: &Grid, direction: Direction) -> Vec<MergePair> {
    let mut pairs = Vec::new();
    for index in 0..SIZE {
        let occupied: Vec<Position> = line_positions(direction, index)
            .into_iter()
            .filter(|&p| !grid.is_empty_at(p))
            .collect();

        let mut i = 0;
        while i + 1 < occupied.len() {
            let (into, from) = (occupied[i], occupied[i + 1]);
            if grid.get(into) == grid.get(from) {
                pairs.push(MergePair { into, from });
                i += 2;
            } else {
                i += 1;
            }
        }
    }
    pairs
}
