use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;
use twenty48_core::{Direction, Hint, KeyValueStore, MoveReport, Outcome, Session};

/// Ticks a message stays on screen (~3 seconds at 100ms poll)
pub const MESSAGE_TICKS: u32 = 30;

/// Ticks a hint stays on screen (~5 seconds)
pub const HINT_TICKS: u32 = 50;

/// Longest player name accepted in the name prompt
pub const MAX_NAME_LEN: usize = 16;

/// Session type the terminal front end drives
pub type TuiSession = Session<Box<dyn KeyValueStore>>;

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// Current screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Normal gameplay
    Playing,
    /// Board with the win/lose overlay
    GameOver(Outcome),
    /// Top scores
    Leaderboard,
    /// Typing a new player name
    NameEntry,
}

/// The main application state
pub struct App {
    pub session: TuiSession,
    pub theme: Theme,
    /// Current hint to display
    pub hint: Option<Hint>,
    hint_timer: u32,
    /// Message to display
    pub message: Option<String>,
    message_timer: u32,
    pub screen_state: ScreenState,
    /// Name being typed on the name screen
    pub name_input: String,
    /// Leaderboard rank earned by the game that just ended
    pub last_rank: Option<usize>,
}

impl App {
    pub fn new(session: TuiSession, theme: Theme) -> Self {
        let screen_state = match session.game().status().outcome() {
            Some(outcome) => ScreenState::GameOver(outcome),
            None => ScreenState::Playing,
        };
        Self {
            session,
            theme,
            hint: None,
            hint_timer: 0,
            message: None,
            message_timer: 0,
            screen_state,
            name_input: String::new(),
            last_rank: None,
        }
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(100)
    }

    /// Update timers (called every tick)
    pub fn tick(&mut self) {
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

    /// Show a temporary message
    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = MESSAGE_TICKS;
    }

    /// Show a hint, replacing any pending one
    fn show_hint(&mut self, hint: Hint) {
        self.hint = Some(hint);
        self.hint_timer = HINT_TICKS;
    }

    fn clear_hint(&mut self) {
        self.hint = None;
        self.hint_timer = 0;
    }

    /// Screen to return to from the leaderboard or name prompt
    fn resume_screen(&self) -> ScreenState {
        match self.session.game().status().outcome() {
            Some(outcome) => ScreenState::GameOver(outcome),
            None => ScreenState::Playing,
        }
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        // Ctrl+C quits from any screen, saving like `q`
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return self.quit();
        }

        match self.screen_state {
            ScreenState::Playing => self.handle_game_key(key),
            ScreenState::GameOver(_) => self.handle_endgame_key(key),
            ScreenState::Leaderboard => self.handle_leaderboard_key(key),
            ScreenState::NameEntry => self.handle_name_key(key),
        }
    }

    fn handle_game_key(&mut self, key: KeyEvent) -> AppAction {
        if let Some(direction) = key_direction(key.code) {
            self.apply_move(direction);
            return AppAction::Continue;
        }

        match key.code {
            KeyCode::Char('q') => return self.quit(),
            KeyCode::Char('u') => self.undo(),
            KeyCode::Char('n') => self.restart(),
            KeyCode::Char('x') => self.shuffle(),
            KeyCode::Char('?') => match self.session.request_hint() {
                Some(hint) => self.show_hint(hint),
                None => self.show_message("No moves available"),
            },
            KeyCode::Char('b') => self.screen_state = ScreenState::Leaderboard,
            KeyCode::Char('p') => self.open_name_entry(),
            KeyCode::Char('t') => self.cycle_theme(),
            KeyCode::Esc => self.clear_hint(),
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_endgame_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => return self.quit(),
            KeyCode::Char('n') | KeyCode::Enter | KeyCode::Char(' ') => self.restart(),
            KeyCode::Char('u') => self.undo(),
            KeyCode::Char('b') => self.screen_state = ScreenState::Leaderboard,
            KeyCode::Char('p') => self.open_name_entry(),
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_leaderboard_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => return self.quit(),
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('b') => {
                self.screen_state = self.resume_screen();
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_name_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Enter => {
                self.session.set_player_name(&self.name_input);
                let msg = format!("Playing as {}", self.session.player_name());
                self.show_message(&msg);
                self.screen_state = self.resume_screen();
            }
            KeyCode::Esc => self.screen_state = self.resume_screen(),
            KeyCode::Backspace => {
                self.name_input.pop();
            }
            KeyCode::Char(c) if !c.is_control() => {
                if self.name_input.chars().count() < MAX_NAME_LEN {
                    self.name_input.push(c);
                }
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn apply_move(&mut self, direction: Direction) {
        self.clear_hint();
        let report = self.session.move_tiles(direction);
        self.after_move(report);
    }

    fn after_move(&mut self, report: MoveReport) {
        if !report.moved() {
            return;
        }
        if let Some(outcome) = report.outcome() {
            self.last_rank = report.rank;
            self.screen_state = ScreenState::GameOver(outcome);
        } else if report.new_best && self.message.is_none() {
            self.show_message("New best score!");
        }
    }

    fn undo(&mut self) {
        if self.session.undo() {
            self.clear_hint();
            self.screen_state = ScreenState::Playing;
            self.show_message("Undo");
        } else {
            self.show_message("Nothing to undo");
        }
    }

    fn restart(&mut self) {
        self.session.restart();
        self.clear_hint();
        self.last_rank = None;
        self.screen_state = ScreenState::Playing;
        self.show_message("New game");
    }

    fn shuffle(&mut self) {
        if self.session.shuffle().shuffled {
            self.clear_hint();
            self.show_message("Shuffled");
        }
    }

    fn open_name_entry(&mut self) {
        self.name_input = self.session.player_name().to_string();
        self.screen_state = ScreenState::NameEntry;
    }

    fn cycle_theme(&mut self) {
        self.theme = self.theme.name.next().theme();
        let msg = format!("Theme: {:?}", self.theme.name);
        self.show_message(&msg);
    }

    /// Save the running game and leave
    fn quit(&mut self) -> AppAction {
        if let Err(err) = self.session.save_game() {
            log::warn!("could not save game on exit: {}", err);
        }
        AppAction::Quit
    }
}

/// Direction bound to a key, if any
pub fn key_direction(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        KeyCode::Up => Some(Direction::Up),
        KeyCode::Down => Some(Direction::Down),
        KeyCode::Char(c) => Direction::from_key(c.encode_utf8(&mut [0; 4])),
        _ => None,
    }
}
