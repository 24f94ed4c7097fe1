use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of the board
pub const SIZE: usize = 4;

/// Total number of cells on the board
pub const CELL_COUNT: usize = SIZE * SIZE;

/// Reaching this tile wins the game
pub const WIN_TILE: u32 = 2048;

/// Largest tile a 4x4 board can hold (2^17)
pub const MAX_TILE: u32 = 1 << 17;

/// Upper bound on any score reachable on a 4x4 board
pub const MAX_SCORE: u32 = 4_000_000;

/// A cell position on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row-major index into a flat 16-cell array
    pub fn index(&self) -> usize {
        self.row * SIZE + self.col
    }

    pub fn from_index(index: usize) -> Self {
        Self::new(index / SIZE, index % SIZE)
    }

    /// Iterate over every position in row-major order
    pub fn all() -> impl Iterator<Item = Position> {
        (0..CELL_COUNT).map(Position::from_index)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}c{}", self.row + 1, self.col + 1)
    }
}

/// Direction tiles slide in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Enumeration order used for hint tie-breaking
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Map a browser/terminal key name to a direction
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "Left" | "a" | "h" => Some(Direction::Left),
            "ArrowRight" | "Right" | "d" | "l" => Some(Direction::Right),
            "ArrowUp" | "Up" | "w" | "k" => Some(Direction::Up),
            "ArrowDown" | "Down" | "s" | "j" => Some(Direction::Down),
            _ => None,
        }
    }

    /// Resolve a swipe from its start-minus-end deltas.
    ///
    /// The dominant axis wins; a swipe toward the left has a positive x
    /// delta because the finger ends left of where it started.
    pub fn from_swipe(delta_x: f64, delta_y: f64) -> Option<Self> {
        if delta_x == 0.0 && delta_y == 0.0 {
            return None;
        }
        if delta_x.abs() > delta_y.abs() {
            if delta_x > 0.0 {
                Some(Direction::Left)
            } else {
                Some(Direction::Right)
            }
        } else if delta_y > 0.0 {
            Some(Direction::Up)
        } else {
            Some(Direction::Down)
        }
    }

    /// Whether this direction operates on rows (as opposed to columns)
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Whether lines are reversed before reduction
    pub fn is_reversed(&self) -> bool {
        matches!(self, Direction::Right | Direction::Down)
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Left => "←",
            Direction::Right => "→",
            Direction::Up => "↑",
            Direction::Down => "↓",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        };
        write!(f, "{}", name)
    }
}

/// Terminal result of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Lose,
}

impl Outcome {
    /// Text shown to the player when the game ends
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::Win => "You win! 🎉",
            Outcome::Lose => "Game Over!",
        }
    }
}

/// Lifecycle state of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    Playing,
    Over(Outcome),
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        matches!(self, GameStatus::Over(_))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            GameStatus::Playing => None,
            GameStatus::Over(outcome) => Some(*outcome),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_index_roundtrip() {
        for index in 0..CELL_COUNT {
            assert_eq!(Position::from_index(index).index(), index);
        }
        assert_eq!(Position::new(2, 3).index(), 11);
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Direction::from_key("ArrowUp"), Some(Direction::Up));
        assert_eq!(Direction::from_key("ArrowDown"), Some(Direction::Down));
        assert_eq!(Direction::from_key("ArrowLeft"), Some(Direction::Left));
        assert_eq!(Direction::from_key("ArrowRight"), Some(Direction::Right));
        assert_eq!(Direction::from_key("Enter"), None);
    }

    #[test]
    fn test_swipe_mapping() {
        // Finger moved from x=200 to x=50: start - end is positive
        assert_eq!(Direction::from_swipe(150.0, 10.0), Some(Direction::Left));
        assert_eq!(Direction::from_swipe(-150.0, 10.0), Some(Direction::Right));
        assert_eq!(Direction::from_swipe(5.0, 80.0), Some(Direction::Up));
        assert_eq!(Direction::from_swipe(5.0, -80.0), Some(Direction::Down));
        assert_eq!(Direction::from_swipe(0.0, 0.0), None);
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(Outcome::Lose.message(), "Game Over!");
        assert!(Outcome::Win.message().starts_with("You win"));
        assert!(GameStatus::Over(Outcome::Win).is_over());
        assert_eq!(GameStatus::Playing.outcome(), None);
    }
}
