//! A game bound to a persisted profile.
//!
//! The session is what front ends drive: it forwards directives to the
//! [`Game`], keeps the best score current, records finished games on the
//! leaderboard exactly once, and writes every change through to storage.

use crate::error::{StorageError, StorageResult};
use crate::game::{Game, MoveResult, ShuffleResult, Snapshot};
use crate::hint::Hint;
use crate::leaderboard::{normalize_name, Leaderboard};
use crate::rng::GameRng;
use crate::storage::{KeyValueStore, Profile, SAVED_GAME_KEY};
use crate::types::{Direction, Outcome};

/// Everything a front end needs to render after a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport {
    pub result: MoveResult,
    /// Whether this move raised the best score
    pub new_best: bool,
    /// Leaderboard rank earned when this move ended the game
    pub rank: Option<usize>,
}

impl MoveReport {
    pub fn moved(&self) -> bool {
        self.result.moved
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.result.outcome
    }
}

/// A running game plus the persisted profile it reports to
pub struct Session<S: KeyValueStore> {
    game: Game,
    profile: Profile,
    store: S,
    /// Whether the current game has reached the leaderboard
    recorded: bool,
}

impl<S: KeyValueStore> std::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("game", &self.game)
            .field("profile", &self.profile)
            .field("store", &self.store.backend_name())
            .field("recorded", &self.recorded)
            .finish()
    }
}

impl<S: KeyValueStore> Session<S> {
    /// Load the profile from `store` and start a fresh game
    pub fn new(store: S) -> Self {
        Self::with_game(store, Game::new())
    }

    /// Load the profile from `store` and start a reproducible game
    pub fn with_seed(store: S, seed: u64) -> Self {
        Self::with_game(store, Game::with_seed(seed))
    }

    /// Load the profile from `store` around an existing game
    pub fn with_game(store: S, game: Game) -> Self {
        let profile = Profile::load(&store);
        log::debug!(
            "loaded profile from {} (best {}, {} leaderboard entries)",
            store.backend_name(),
            profile.best_score,
            profile.leaderboard.len()
        );
        let mut session = Self {
            game,
            profile,
            store,
            recorded: false,
        };
        session.refresh_best();
        session
    }

    /// Move in `direction`, updating best score and leaderboard as needed
    pub fn move_tiles(&mut self, direction: Direction) -> MoveReport {
        let result = self.game.move_tiles(direction);
        if !result.moved {
            return MoveReport {
                result,
                new_best: false,
                rank: None,
            };
        }

        let new_best = self.refresh_best();
        let rank = match result.outcome {
            Some(outcome) => self.record_outcome(outcome),
            None => None,
        };

        MoveReport {
            result,
            new_best,
            rank,
        }
    }

    /// Undo the last move or shuffle; false when there is no history
    pub fn undo(&mut self) -> bool {
        let undone = self.game.undo();
        if undone {
            self.refresh_best();
        }
        undone
    }

    /// Start a new game, keeping the profile
    pub fn restart(&mut self) {
        self.game.restart();
        self.recorded = false;
        self.refresh_best();
    }

    pub fn shuffle(&mut self) -> ShuffleResult {
        self.game.shuffle()
    }

    /// Suggested move, or `None` when nothing can move
    pub fn request_hint(&self) -> Option<Hint> {
        self.game.hint()
    }

    /// Change and persist the player name. Blank names become the default.
    pub fn set_player_name(&mut self, name: &str) {
        self.profile.player_name = normalize_name(name);
        if let Err(err) = self.profile.save_player_name(&self.store) {
            log::warn!("could not save player name: {}", err);
        }
    }

    /// Persist the running game so it can be resumed later
    pub fn save_game(&self) -> StorageResult<()> {
        let json = serde_json::to_string(&self.game.snapshot()).map_err(|e| {
            StorageError::Serialize {
                key: SAVED_GAME_KEY.to_string(),
                reason: e.to_string(),
            }
        })?;
        self.store.set(SAVED_GAME_KEY, &json)
    }

    /// Resume a previously saved game. Returns false if none was stored or
    /// it could not be read or is invalid; the current game is kept then.
    pub fn load_game(&mut self) -> bool {
        let Some(json) = self.store.get(SAVED_GAME_KEY) else {
            return false;
        };
        match serde_json::from_str::<Snapshot>(&json) {
            Ok(snapshot) => self.resume(snapshot),
            Err(err) => {
                log::warn!("ignoring unreadable saved game: {}", err);
                false
            }
        }
    }

    /// Replace the running game with `snapshot`. Undo history is not
    /// carried over and spawns use a fresh random source.
    ///
    /// Returns false and keeps the current game when the snapshot fails
    /// [`Snapshot::is_valid`].
    pub fn resume(&mut self, snapshot: Snapshot) -> bool {
        if !snapshot.is_valid() {
            log::warn!("ignoring invalid saved game (score {})", snapshot.score);
            return false;
        }
        self.game = Game::from_snapshot(snapshot, GameRng::from_entropy());
        // A game saved after it ended was already recorded
        self.recorded = self.game.is_over();
        self.refresh_best();
        true
    }

    /// Raise and persist the best score if the current score beats it
    fn refresh_best(&mut self) -> bool {
        if self.game.score() <= self.profile.best_score {
            return false;
        }
        self.profile.best_score = self.game.score();
        if let Err(err) = self.profile.save_best_score(&self.store) {
            log::warn!("could not save best score: {}", err);
        }
        true
    }

    /// Put the finished game on the leaderboard, once per game.
    ///
    /// Undoing a loss and losing again is the same game, so it does not
    /// add a second entry. [`Session::restart`] clears the flag.
    fn record_outcome(&mut self, outcome: Outcome) -> Option<usize> {
        if self.recorded {
            return None;
        }
        self.recorded = true;

        let rank = self
            .profile
            .leaderboard
            .record(&self.profile.player_name, self.game.score());
        log::info!(
            "{} finished ({:?}) with {} points, rank {:?}",
            self.profile.player_name,
            outcome,
            self.game.score(),
            rank
        );
        if let Err(err) = self.profile.save_leaderboard(&self.store) {
            log::warn!("could not save leaderboard: {}", err);
        }
        rank
    }

    // Getters
    pub fn game(&self) -> &Game {
        &self.game
    }
    pub fn profile(&self) -> &Profile {
        &self.profile
    }
    pub fn best_score(&self) -> u32 {
        self.profile.best_score
    }
    pub fn leaderboard(&self) -> &Leaderboard {
        &self.profile.leaderboard
    }
    pub fn player_name(&self) -> &str {
        &self.profile.player_name
    }
    pub fn store(&self) -> &S {
        &self.store
    }
    pub fn is_recorded(&self) -> bool {
        self.recorded
    }
}
