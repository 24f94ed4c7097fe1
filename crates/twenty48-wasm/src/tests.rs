//! Tests for the browser game state

use crate::game::{GameState, ScreenState, SerializableState, HINT_TICKS, MESSAGE_TICKS};
use crate::storage::BrowserStore;
use crate::theme::Theme;
use twenty48_core::storage::{LEADERBOARD_KEY, SAVED_GAME_KEY};
use twenty48_core::{
    Direction, Game, GameRng, Grid, KeyValueStore, MemoryStore, Outcome, Position, Session,
};
use wasm_bindgen_test::*;

fn state_with(rows: [[u32; 4]; 4], score: u32) -> GameState {
    let game = Game::from_grid(Grid::from_rows(rows), score, GameRng::new(9));
    let store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
    GameState::with_session(Session::with_game(store, game))
}

const ONE_MERGE_FROM_LOSS: [[u32; 4]; 4] = [
    [8, 16, 32, 0],
    [64, 128, 256, 512],
    [2, 4, 8, 16],
    [4, 2, 4, 2],
];

#[wasm_bindgen_test]
fn test_new_game_state() {
    let state = GameState::new(Box::new(MemoryStore::new()));
    assert_eq!(state.screen(), ScreenState::Playing);
    assert_eq!(state.session().game().grid().tile_count(), 2);
    assert_eq!(state.session().game().score(), 0);
    assert!(state.message().is_none());
    assert!(state.hint().is_none());
}

#[wasm_bindgen_test]
fn test_arrow_keys_move() {
    let mut state = state_with([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]], 0);
    assert!(state.handle_key("ArrowLeft"));
    assert_eq!(state.session().game().score(), 4);
    assert!(!state.handle_key("F5"));
}

#[wasm_bindgen_test]
fn test_swipe_direction() {
    let mut state = state_with([[0, 0, 2, 2], [0; 4], [0; 4], [0; 4]], 0);

    // Finger moved from right to left
    assert!(state.handle_swipe(300.0, 100.0, 100.0, 110.0));
    assert_eq!(state.session().game().grid().get(Position::new(0, 0)), 4);

    // Taps are not swipes
    assert!(!state.handle_swipe(50.0, 50.0, 52.0, 49.0));
}

#[wasm_bindgen_test]
fn test_loss_screen_and_undo() {
    let mut state = state_with(ONE_MERGE_FROM_LOSS, 200);
    state.move_tiles(Direction::Right);
    assert_eq!(state.screen(), ScreenState::Lose);
    assert_eq!(state.message(), Some(Outcome::Lose.message()));
    assert_eq!(state.last_rank(), Some(1));
    assert!(state.session().store().get(LEADERBOARD_KEY).is_some());

    // Moves are ignored on the end screen
    assert!(!state.handle_key("ArrowLeft"));

    assert!(state.handle_key("u"));
    assert_eq!(state.screen(), ScreenState::Playing);
}

#[wasm_bindgen_test]
fn test_win_screen() {
    let mut state = state_with([[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]], 0);
    state.handle_key("a");
    assert_eq!(state.screen(), ScreenState::Win);
    assert_eq!(state.message(), Some("You win! 🎉"));

    assert!(state.handle_key("Enter"));
    assert_eq!(state.screen(), ScreenState::Playing);
    assert_eq!(state.session().game().score(), 0);
}

#[wasm_bindgen_test]
fn test_hint_and_timers() {
    let mut state = state_with([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]], 0);
    assert_eq!(state.request_hint().map(|h| h.direction), Some(Direction::Left));

    for _ in 0..HINT_TICKS {
        state.tick();
    }
    assert!(state.hint().is_none());

    state.handle_key("u");
    assert_eq!(state.message(), Some("Nothing to undo"));
    for _ in 0..MESSAGE_TICKS {
        state.tick();
    }
    assert!(state.message().is_none());
}

#[wasm_bindgen_test]
fn test_no_hint_when_stuck() {
    let mut state = state_with(
        [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]],
        0,
    );
    assert_eq!(state.screen(), ScreenState::Lose);
    assert!(state.request_hint().is_none());
    assert_eq!(state.message(), Some("No moves available"));
}

#[wasm_bindgen_test]
fn test_leaderboard_screen() {
    let mut state = state_with([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]], 0);
    assert!(state.handle_key("b"));
    assert_eq!(state.screen(), ScreenState::Leaderboard);
    assert!(state.handle_key("Escape"));
    assert_eq!(state.screen(), ScreenState::Playing);
}

#[wasm_bindgen_test]
fn test_serializable_roundtrip() {
    let mut state = state_with([[8, 8, 0, 0], [0; 4], [0; 4], [0; 4]], 40);
    state.set_player_name("Ada");
    let saved = state.to_serializable();
    let json = serde_json::to_string(&saved).unwrap();

    let mut other = GameState::new(Box::new(MemoryStore::new()));
    let parsed: SerializableState = serde_json::from_str(&json).unwrap();
    assert!(other.load_serializable(parsed));
    assert_eq!(other.session().game().snapshot(), saved.snapshot);
    assert_eq!(other.session().player_name(), "Ada");
    assert_eq!(other.session().best_score(), 40);
}

#[wasm_bindgen_test]
fn test_invalid_state_is_rejected() {
    let mut state = state_with([[8, 8, 0, 0], [0; 4], [0; 4], [0; 4]], 40);
    let before = state.session().game().snapshot();

    for json in [
        r#"{"grid":{"cells":[[3,3,0,0],[0,0,0,0],[0,0,0,0],[0,0,0,0]]},"score":0,"player_name":"Eve"}"#,
        r#"{"grid":{"cells":[[2147483648,2147483648,0,0],[0,0,0,0],[0,0,0,0],[0,0,0,0]]},"score":0,"player_name":"Eve"}"#,
        r#"{"grid":{"cells":[[2,0,0,0],[0,0,0,0],[0,0,0,0],[0,0,0,0]]},"score":4294967295,"player_name":"Eve"}"#,
    ] {
        let parsed: SerializableState = serde_json::from_str(json).unwrap();
        assert!(!state.load_serializable(parsed));
    }
    assert_eq!(state.session().game().snapshot(), before);
    assert_eq!(state.session().player_name(), "Player");
}

#[wasm_bindgen_test]
fn test_save_and_resume() {
    let mut state = state_with([[4, 4, 0, 0], [0; 4], [0; 4], [0; 4]], 0);
    state.move_tiles(Direction::Left);
    state.save();
    let json = state.session().store().get(SAVED_GAME_KEY).unwrap();

    let mut resumed = GameState::new(Box::new(MemoryStore::new().with(SAVED_GAME_KEY, &json)));
    assert!(resumed.resume_saved());
    assert_eq!(resumed.session().game().score(), 8);
}

#[wasm_bindgen_test]
fn test_theme_lookup() {
    assert_eq!(Theme::by_name("light").background, Theme::light().background);
    assert_eq!(Theme::by_name("nope").background, Theme::dark().background);
    let theme = Theme::dark();
    assert_eq!(theme.tile_bg(0), theme.empty_cell);
    assert_eq!(theme.tile_bg(2048), theme.tiles[10]);
    assert_eq!(theme.tile_bg(8192), theme.super_tile);
    assert_eq!(theme.tile_text(2), theme.dark_text);
    assert_eq!(crate::theme::Color::new(1, 2, 3).as_css(), "rgb(1, 2, 3)");
}

#[wasm_bindgen_test]
fn test_browser_store_roundtrip_when_available() {
    let store = BrowserStore::new();
    if store.is_available() {
        store.set("twenty48-test", "1").unwrap();
        assert_eq!(store.get("twenty48-test").as_deref(), Some("1"));
    } else {
        assert!(store.set("twenty48-test", "1").is_err());
        assert_eq!(store.get("twenty48-test"), None);
    }
}
