//! Game state management for the browser front end

use serde::{Deserialize, Serialize};
use twenty48_core::{Direction, Hint, KeyValueStore, MoveReport, Outcome, Session, Snapshot};

/// Ticks a message stays up (~3 seconds at 30fps)
pub const MESSAGE_TICKS: u32 = 90;

/// Ticks a hint stays up (~5 seconds at 30fps)
pub const HINT_TICKS: u32 = 150;

/// Swipes shorter than this many pixels on both axes are ignored
pub const MIN_SWIPE: f64 = 10.0;

/// Session type the browser front end drives
pub type WebSession = Session<Box<dyn KeyValueStore>>;

/// Screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenState {
    Playing,
    Win,
    Lose,
    Leaderboard,
}

impl ScreenState {
    fn for_outcome(outcome: Option<Outcome>) -> Self {
        match outcome {
            Some(Outcome::Win) => ScreenState::Win,
            Some(Outcome::Lose) => ScreenState::Lose,
            None => ScreenState::Playing,
        }
    }
}

/// Serializable game state for save/load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableState {
    #[serde(flatten)]
    pub snapshot: Snapshot,
    pub player_name: String,
}

/// The game state
pub struct GameState {
    session: WebSession,
    screen: ScreenState,
    /// Current message to display
    message: Option<String>,
    /// Message timer (ticks remaining)
    message_timer: u32,
    /// Current hint
    hint: Option<Hint>,
    hint_timer: u32,
    /// Rank earned by the game that just ended
    last_rank: Option<usize>,
    /// Animation frame counter
    frame: u32,
}

impl GameState {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self::with_session(Session::new(store))
    }

    pub fn with_session(session: WebSession) -> Self {
        let screen = ScreenState::for_outcome(session.game().status().outcome());
        Self {
            session,
            screen,
            message: None,
            message_timer: 0,
            hint: None,
            hint_timer: 0,
            last_rank: None,
            frame: 0,
        }
    }

    pub fn tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);

        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }

        if self.hint_timer > 0 {
            self.hint_timer -= 1;
            if self.hint_timer == 0 {
                self.hint = None;
            }
        }
    }

    /// Handle keyboard input, returns true if the key was used
    pub fn handle_key(&mut self, key: &str) -> bool {
        match self.screen {
            ScreenState::Win | ScreenState::Lose => self.handle_endgame_key(key),
            ScreenState::Leaderboard => self.handle_leaderboard_key(key),
            ScreenState::Playing => self.handle_playing_key(key),
        }
    }

    fn handle_endgame_key(&mut self, key: &str) -> bool {
        match key {
            "n" | "Enter" | " " => self.restart(),
            "u" => {
                self.undo();
            }
            "b" => self.screen = ScreenState::Leaderboard,
            _ => return false,
        }
        true
    }

    fn handle_leaderboard_key(&mut self, key: &str) -> bool {
        match key {
            "Escape" | "Enter" | "b" => {
                self.screen = ScreenState::for_outcome(self.session.game().status().outcome());
                true
            }
            _ => false,
        }
    }

    fn handle_playing_key(&mut self, key: &str) -> bool {
        if let Some(direction) = Direction::from_key(key) {
            self.move_tiles(direction);
            return true;
        }

        match key {
            "u" => {
                self.undo();
            }
            "n" => self.restart(),
            "x" => {
                self.shuffle();
            }
            "?" => {
                self.request_hint();
            }
            "b" => self.screen = ScreenState::Leaderboard,
            "Escape" => self.clear_hint(),
            _ => return false,
        }
        true
    }

    /// Resolve a swipe from its start and end points
    pub fn handle_swipe(&mut self, start_x: f64, start_y: f64, end_x: f64, end_y: f64) -> bool {
        if self.screen != ScreenState::Playing {
            return false;
        }
        let (dx, dy) = (start_x - end_x, start_y - end_y);
        if dx.abs() < MIN_SWIPE && dy.abs() < MIN_SWIPE {
            return false;
        }
        match Direction::from_swipe(dx, dy) {
            Some(direction) => {
                self.move_tiles(direction);
                true
            }
            None => false,
        }
    }

    pub fn move_tiles(&mut self, direction: Direction) -> MoveReport {
        self.clear_hint();
        let report = self.session.move_tiles(direction);
        if let Some(outcome) = report.outcome() {
            self.last_rank = report.rank;
            self.screen = ScreenState::for_outcome(Some(outcome));
            self.show_message(outcome.message());
        }
        report
    }

    pub fn undo(&mut self) -> bool {
        if self.session.undo() {
            self.clear_hint();
            self.screen = ScreenState::Playing;
            self.show_message("Undo");
            true
        } else {
            self.show_message("Nothing to undo");
            false
        }
    }

    pub fn restart(&mut self) {
        self.session.restart();
        self.clear_hint();
        self.last_rank = None;
        self.screen = ScreenState::Playing;
        self.show_message("New game");
    }

    pub fn shuffle(&mut self) -> bool {
        let shuffled = self.session.shuffle().shuffled;
        if shuffled {
            self.clear_hint();
            self.show_message("Shuffled");
        }
        shuffled
    }

    /// Show a hint, replacing any pending one
    pub fn request_hint(&mut self) -> Option<&Hint> {
        match self.session.request_hint() {
            Some(hint) => {
                self.hint = Some(hint);
                self.hint_timer = HINT_TICKS;
            }
            None => {
                self.clear_hint();
                self.show_message("No moves available");
            }
        }
        self.hint.as_ref()
    }

    fn clear_hint(&mut self) {
        self.hint = None;
        self.hint_timer = 0;
    }

    pub fn set_player_name(&mut self, name: &str) {
        self.session.set_player_name(name);
    }

    /// Persist the running game, logging failures
    pub fn save(&self) {
        if let Err(err) = self.session.save_game() {
            log::warn!("could not save game: {}", err);
        }
    }

    /// Pick up the game stored by a previous visit
    pub fn resume_saved(&mut self) -> bool {
        let resumed = self.session.load_game();
        if resumed {
            self.screen = ScreenState::for_outcome(self.session.game().status().outcome());
        }
        resumed
    }

    fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = MESSAGE_TICKS;
    }

    // Getters
    pub fn session(&self) -> &WebSession {
        &self.session
    }
    pub fn screen(&self) -> ScreenState {
        self.screen
    }
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
    pub fn hint(&self) -> Option<&Hint> {
        self.hint.as_ref()
    }
    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Convert to serializable format
    pub fn to_serializable(&self) -> SerializableState {
        SerializableState {
            snapshot: self.session.game().snapshot(),
            player_name: self.session.player_name().to_string(),
        }
    }

    /// Replace the running game with a serialized one. An invalid board or
    /// score leaves the current game and player untouched.
    pub fn load_serializable(&mut self, state: SerializableState) -> bool {
        if !self.session.resume(state.snapshot) {
            return false;
        }
        self.session.set_player_name(&state.player_name);
        self.clear_hint();
        self.last_rank = None;
        self.screen = ScreenState::for_outcome(self.session.game().status().outcome());
        true
    }
}
