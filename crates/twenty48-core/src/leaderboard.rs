//! Local top-score table

use serde::{Deserialize, Serialize};

/// Number of entries kept
pub const MAX_ENTRIES: usize = 3;

/// Name used when the player has not chosen one
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
}

/// Best finished games, highest score first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse stored JSON. Anything malformed yields an empty board.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Vec<LeaderboardEntry>>(json) {
            Ok(mut entries) => {
                entries.sort_by(|a, b| b.score.cmp(&a.score));
                entries.truncate(MAX_ENTRIES);
                Self { entries }
            }
            Err(err) => {
                log::debug!("ignoring malformed leaderboard: {}", err);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.entries)
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `score` would earn a place on the board
    pub fn qualifies(&self, score: u32) -> bool {
        self.entries.len() < MAX_ENTRIES
            || self.entries.last().is_some_and(|e| score > e.score)
    }

    /// Insert a finished game, returning its 1-based rank if it was kept.
    ///
    /// Equal scores keep insertion order, so an older entry stays
    /// ahead of a newer one with the same score.
    pub fn record(&mut self, name: &str, score: u32) -> Option<usize> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.score < score)
            .unwrap_or(self.entries.len());

        self.entries.insert(
            pos,
            LeaderboardEntry {
                name: normalize_name(name),
                score,
            },
        );
        self.entries.truncate(MAX_ENTRIES);

        (pos < MAX_ENTRIES).then_some(pos + 1)
    }
}

/// Trim a player name, substituting the default when nothing is left
pub fn normalize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        DEFAULT_PLAYER_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_top_three_descending() {
        let mut board = Leaderboard::new();
        assert_eq!(board.record("ann", 100), Some(1));
        assert_eq!(board.record("bob", 300), Some(1));
        assert_eq!(board.record("cat", 200), Some(2));
        assert_eq!(board.record("dan", 50), None);
        assert_eq!(board.record("eve", 250), Some(2));

        let scores: Vec<u32> = board.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![300, 250, 200]);
        assert_eq!(board.len(), MAX_ENTRIES);
    }

    #[test]
    fn test_ties_keep_older_entry_first() {
        let mut board = Leaderboard::new();
        board.record("first", 500);
        assert_eq!(board.record("second", 500), Some(2));
        assert_eq!(board.entries()[0].name, "first");
    }

    #[test]
    fn test_blank_name_defaults() {
        let mut board = Leaderboard::new();
        board.record("   ", 10);
        assert_eq!(board.entries()[0].name, DEFAULT_PLAYER_NAME);
        assert_eq!(normalize_name("  Zoë "), "Zoë");
    }

    #[test]
    fn test_json_roundtrip_and_malformed() {
        let mut board = Leaderboard::new();
        board.record("ann", 1024);
        board.record("bob", 512);
        let json = board.to_json().unwrap();
        assert_eq!(json, r#"[{"name":"ann","score":1024},{"name":"bob","score":512}]"#);
        assert_eq!(Leaderboard::from_json(&json), board);

        assert!(Leaderboard::from_json("not json").is_empty());
        assert!(Leaderboard::from_json(r#"{"name":"x"}"#).is_empty());
        assert!(Leaderboard::from_json(r#"[{"name":"x","score":-4}]"#).is_empty());
    }

    #[test]
    fn test_from_json_sorts_and_truncates() {
        let json = r#"[{"name":"a","score":1},{"name":"b","score":9},{"name":"c","score":5},{"name":"d","score":7}]"#;
        let board = Leaderboard::from_json(json);
        let names: Vec<&str> = board.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "d", "c"]);
    }

    #[test]
    fn test_qualifies() {
        let mut board = Leaderboard::new();
        assert!(board.qualifies(0));
        board.record("a", 30);
        board.record("b", 20);
        board.record("c", 10);
        assert!(board.qualifies(11));
        assert!(!board.qualifies(10));
    }
}
