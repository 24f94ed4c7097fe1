//! Persisted player profile over a flat key-value store.
//!
//! Three independent slots are kept: the best score, the leaderboard and
//! the player name. The browser front end maps them onto `localStorage`,
//! the terminal front end onto a JSON file, and tests onto [`MemoryStore`].

use crate::error::{StorageError, StorageResult};
use crate::leaderboard::{normalize_name, Leaderboard};
use std::cell::RefCell;
use std::collections::HashMap;

pub const BEST_SCORE_KEY: &str = "bestScore";
pub const LEADERBOARD_KEY: &str = "leaderboard";
pub const PLAYER_NAME_KEY: &str = "playerName";
/// Running game saved by the front ends, outside the profile
pub const SAVED_GAME_KEY: &str = "savedGame";

/// A string key-value store
pub trait KeyValueStore {
    /// Read a value; `None` when absent or unreadable
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Backend name for display
    fn backend_name(&self) -> &'static str;
}

// ==================== In-memory Backend ====================

/// In-memory store for tests and for sessions that should not persist
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RefCell<HashMap<String, String>>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail
    pub fn read_only() -> Self {
        Self {
            data: RefCell::new(HashMap::new()),
            read_only: true,
        }
    }

    /// Pre-populate a key
    pub fn with(self, key: &str, value: &str) -> Self {
        self.data
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.data.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.read_only {
            return Err(StorageError::Unavailable("memory store is read-only".into()));
        }
        self.data
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "Memory"
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}

// ==================== Profile ====================

/// Everything persisted between sessions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub best_score: u32,
    pub leaderboard: Leaderboard,
    pub player_name: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            best_score: 0,
            leaderboard: Leaderboard::new(),
            player_name: normalize_name(""),
        }
    }
}

impl Profile {
    /// Load all slots, substituting defaults for anything missing or malformed
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let best_score = store
            .get(BEST_SCORE_KEY)
            .map(|raw| parse_score(&raw))
            .unwrap_or(0);
        let leaderboard = store
            .get(LEADERBOARD_KEY)
            .map(|raw| Leaderboard::from_json(&raw))
            .unwrap_or_default();
        let player_name = normalize_name(&store.get(PLAYER_NAME_KEY).unwrap_or_default());

        Self {
            best_score,
            leaderboard,
            player_name,
        }
    }

    pub fn save_best_score(&self, store: &dyn KeyValueStore) -> StorageResult<()> {
        store.set(BEST_SCORE_KEY, &self.best_score.to_string())
    }

    pub fn save_leaderboard(&self, store: &dyn KeyValueStore) -> StorageResult<()> {
        let json = self
            .leaderboard
            .to_json()
            .map_err(|e| StorageError::Serialize {
                key: LEADERBOARD_KEY.to_string(),
                reason: e.to_string(),
            })?;
        store.set(LEADERBOARD_KEY, &json)
    }

    pub fn save_player_name(&self, store: &dyn KeyValueStore) -> StorageResult<()> {
        store.set(PLAYER_NAME_KEY, &self.player_name)
    }
}

/// Parse a stored score leniently: leading digits count, anything else is 0
fn parse_score(raw: &str) -> u32 {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let store = MemoryStore::new();
        let profile = Profile::load(&store);
        assert_eq!(profile, Profile::default());
        assert_eq!(profile.player_name, "Player");
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let store = MemoryStore::new()
            .with(BEST_SCORE_KEY, "lots")
            .with(LEADERBOARD_KEY, "[{broken")
            .with(PLAYER_NAME_KEY, "   ");
        let profile = Profile::load(&store);
        assert_eq!(profile.best_score, 0);
        assert!(profile.leaderboard.is_empty());
        assert_eq!(profile.player_name, "Player");
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("1234"), 1234);
        assert_eq!(parse_score(" 56 "), 56);
        assert_eq!(parse_score("78px"), 78);
        assert_eq!(parse_score("-5"), 0);
        assert_eq!(parse_score(""), 0);
    }

    #[test]
    fn test_save_and_reload() {
        let store = MemoryStore::new();
        let mut profile = Profile::load(&store);
        profile.best_score = 4096;
        profile.player_name = "Ada".to_string();
        profile.leaderboard.record("Ada", 4096);

        profile.save_best_score(&store).unwrap();
        profile.save_leaderboard(&store).unwrap();
        profile.save_player_name(&store).unwrap();
        assert_eq!(store.len(), 3);

        assert_eq!(Profile::load(&store), profile);
    }

    #[test]
    fn test_read_only_store_reports_error() {
        let store = MemoryStore::read_only();
        let profile = Profile::default();
        let err = profile.save_best_score(&store).unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));
        assert!(store.is_empty());
    }
}
