//! Core 2048 engine
//!
//! The board, the slide/merge rules, seeded tile spawning, single-level
//! undo, shuffling, a one-ply hint advisor and a small persisted profile
//! (best score, leaderboard, player name). Rendering and input belong to
//! the front-end crates.

pub mod error;
pub mod game;
pub mod grid;
pub mod hint;
pub mod leaderboard;
pub mod rng;
pub mod session;
pub mod storage;
pub mod types;

pub use error::{StorageError, StorageResult};
pub use game::{Game, MoveResult, ShuffleResult, Snapshot};
pub use grid::{reduce_line, Grid, LineReduction, SlideResult};
pub use hint::{Hint, MergePair};
pub use leaderboard::{Leaderboard, LeaderboardEntry, DEFAULT_PLAYER_NAME};
pub use rng::GameRng;
pub use session::{MoveReport, Session};
pub use storage::{KeyValueStore, MemoryStore, Profile};
pub use types::{Direction, GameStatus, Outcome, Position, MAX_SCORE, MAX_TILE, SIZE, WIN_TILE};
