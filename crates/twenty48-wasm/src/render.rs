//! Canvas rendering for the 2048 board

use crate::game::{GameState, ScreenState};
use crate::theme::Theme;
use twenty48_core::{Outcome, Position, SIZE};
use web_sys::CanvasRenderingContext2d;

const FONT: &str = "'JetBrains Mono', 'Fira Code', 'Consolas', monospace";

/// Board side length for a given cell size, gaps included
pub fn board_size(cell_size: f64) -> f64 {
    let gap = gap(cell_size);
    cell_size * SIZE as f64 + gap * (SIZE as f64 + 1.0)
}

fn gap(cell_size: f64) -> f64 {
    (cell_size * 0.12).round()
}

/// Font size that keeps a tile label inside its cell
pub fn tile_font_size(value: u32, font_size: f64) -> f64 {
    match value.to_string().len() {
        0..=2 => font_size,
        3 => font_size * 0.85,
        4 => font_size * 0.7,
        _ => font_size * 0.55,
    }
}

/// Render the complete game to canvas
pub fn render_game(
    ctx: &CanvasRenderingContext2d,
    state: &GameState,
    theme: &Theme,
    width: u32,
    height: u32,
    cell_size: f64,
    font_size: f64,
) {
    ctx.set_fill_style_str(&theme.background.as_css());
    ctx.fill_rect(0.0, 0.0, width as f64, height as f64);

    let board = board_size(cell_size);
    let board_x = 40.0;
    let board_y = (height as f64 - board) / 2.0;

    match state.screen() {
        ScreenState::Playing => {
            render_board(ctx, state, theme, board_x, board_y, cell_size, font_size);
            render_info_panel(ctx, state, theme, board_x + board + 30.0, board_y, font_size);
        }
        ScreenState::Win | ScreenState::Lose => {
            render_board(ctx, state, theme, board_x, board_y, cell_size, font_size);
            render_info_panel(ctx, state, theme, board_x + board + 30.0, board_y, font_size);
            let outcome = if state.screen() == ScreenState::Win {
                Outcome::Win
            } else {
                Outcome::Lose
            };
            render_game_over(ctx, state, theme, outcome, width, height, font_size);
        }
        ScreenState::Leaderboard => {
            render_leaderboard(ctx, state, theme, width, font_size);
        }
    }

    if let Some(msg) = state.message() {
        render_message(ctx, theme, msg, width, height, font_size);
    }
}

fn render_board(
    ctx: &CanvasRenderingContext2d,
    state: &GameState,
    theme: &Theme,
    x: f64,
    y: f64,
    cell_size: f64,
    font_size: f64,
) {
    let grid = state.session().game().grid();
    let gap = gap(cell_size);
    let size = board_size(cell_size);

    ctx.set_fill_style_str(&theme.board.as_css());
    ctx.fill_rect(x, y, size, size);

    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");

    for pos in Position::all() {
        let value = grid.get(pos);
        let cell_x = x + gap + pos.col as f64 * (cell_size + gap);
        let cell_y = y + gap + pos.row as f64 * (cell_size + gap);

        ctx.set_fill_style_str(&theme.tile_bg(value).as_css());
        ctx.fill_rect(cell_x, cell_y, cell_size, cell_size);

        if value != 0 {
            ctx.set_font(&format!("bold {}px {}", tile_font_size(value, font_size), FONT));
            ctx.set_fill_style_str(&theme.tile_text(value).as_css());
            let _ = ctx.fill_text(
                &value.to_string(),
                cell_x + cell_size / 2.0,
                cell_y + cell_size / 2.0,
            );
        }
    }

    // Outline the tiles the hint would merge, pulsing with the frame counter
    if let Some(hint) = state.hint() {
        let pulse = 0.6 + 0.4 * ((state.frame() as f64) * 0.15).sin().abs();
        ctx.set_stroke_style_str(&theme.hint_outline.as_css_alpha(pulse));
        ctx.set_line_width(3.0);
        for pair in &hint.merges {
            for pos in [pair.into, pair.from] {
                let cell_x = x + gap + pos.col as f64 * (cell_size + gap);
                let cell_y = y + gap + pos.row as f64 * (cell_size + gap);
                ctx.stroke_rect(cell_x + 1.5, cell_y + 1.5, cell_size - 3.0, cell_size - 3.0);
            }
        }
    }
}

fn render_info_panel(
    ctx: &CanvasRenderingContext2d,
    state: &GameState,
    theme: &Theme,
    x: f64,
    y: f64,
    font_size: f64,
) {
    let session = state.session();
    let game = session.game();
    let info_font = font_size * 0.65;
    let small_font = font_size * 0.5;
    let line_height = font_size * 0.9;
    let small_line = font_size * 0.6;

    ctx.set_text_align("left");
    ctx.set_text_baseline("top");

    let mut cy = y;

    ctx.set_font(&format!("bold {}px {}", font_size * 1.4, FONT));
    ctx.set_fill_style_str(&theme.title_text.as_css());
    let _ = ctx.fill_text("2048", x, cy);
    cy += font_size * 1.8;

    ctx.set_font(&format!("{}px {}", info_font, FONT));
    ctx.set_fill_style_str(&theme.info_text.as_css());
    let _ = ctx.fill_text(&format!("Score: {}", game.score()), x, cy);
    cy += line_height;

    let best_color = if game.score() > 0 && game.score() == session.best_score() {
        &theme.win_color
    } else {
        &theme.info_text
    };
    ctx.set_fill_style_str(&best_color.as_css());
    let _ = ctx.fill_text(&format!("Best:  {}", session.best_score()), x, cy);
    cy += line_height;

    ctx.set_fill_style_str(&theme.info_text.as_css());
    let _ = ctx.fill_text(&format!("Player: {}", session.player_name()), x, cy);
    cy += line_height * 1.4;

    if let Some(hint) = state.hint() {
        ctx.set_font(&format!("bold {}px {}", info_font, FONT));
        ctx.set_fill_style_str(&theme.hint_outline.as_css());
        let _ = ctx.fill_text(
            &format!("Hint: {} {}", hint.direction.arrow(), hint.direction),
            x,
            cy,
        );
        cy += line_height;
        ctx.set_font(&format!("{}px {}", small_font, FONT));
        let _ = ctx.fill_text(&hint.explanation(), x, cy);
        cy += line_height * 1.4;
    }

    ctx.set_font(&format!("{}px {}", small_font, FONT));
    ctx.set_fill_style_str(&theme.info_text.as_css_alpha(0.8));
    let controls = [
        "Arrows/WASD  move",
        "Swipe        move",
        "u            undo",
        "x            shuffle",
        "?            hint",
        "n            new game",
        "b            leaderboard",
    ];
    for line in controls {
        let _ = ctx.fill_text(line, x, cy);
        cy += small_line;
    }
}

fn render_game_over(
    ctx: &CanvasRenderingContext2d,
    state: &GameState,
    theme: &Theme,
    outcome: Outcome,
    width: u32,
    height: u32,
    font_size: f64,
) {
    let w = width as f64;
    let h = height as f64;

    let color = match outcome {
        Outcome::Win => &theme.win_color,
        Outcome::Lose => &theme.lose_color,
    };
    ctx.set_fill_style_str(&theme.background.as_css_alpha(0.75));
    ctx.fill_rect(0.0, 0.0, w, h);

    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");

    ctx.set_font(&format!("bold {}px {}", font_size * 1.6, FONT));
    ctx.set_fill_style_str(&color.as_css());
    let _ = ctx.fill_text(outcome.message(), w / 2.0, h / 2.0 - font_size * 1.5);

    ctx.set_font(&format!("{}px {}", font_size * 0.8, FONT));
    ctx.set_fill_style_str(&theme.info_text.as_css());
    let _ = ctx.fill_text(
        &format!("Final score: {}", state.session().game().score()),
        w / 2.0,
        h / 2.0,
    );

    if let Some(rank) = state.last_rank() {
        ctx.set_fill_style_str(&theme.message_text.as_css());
        let _ = ctx.fill_text(
            &format!("#{} on the leaderboard!", rank),
            w / 2.0,
            h / 2.0 + font_size,
        );
    }

    ctx.set_font(&format!("{}px {}", font_size * 0.55, FONT));
    ctx.set_fill_style_str(&theme.info_text.as_css_alpha(0.8));
    let _ = ctx.fill_text(
        "Enter: new game  u: undo  b: leaderboard",
        w / 2.0,
        h / 2.0 + font_size * 2.2,
    );
}

fn render_leaderboard(
    ctx: &CanvasRenderingContext2d,
    state: &GameState,
    theme: &Theme,
    width: u32,
    font_size: f64,
) {
    let w = width as f64;
    let session = state.session();
    let line_height = font_size * 1.1;

    ctx.set_text_align("center");
    ctx.set_text_baseline("top");
    ctx.set_font(&format!("bold {}px {}", font_size, FONT));
    ctx.set_fill_style_str(&theme.title_text.as_css());
    let _ = ctx.fill_text("LEADERBOARD", w / 2.0, 60.0);

    ctx.set_font(&format!("{}px {}", font_size * 0.7, FONT));
    let mut cy = 60.0 + line_height * 1.8;

    if session.leaderboard().is_empty() {
        ctx.set_fill_style_str(&theme.info_text.as_css());
        let _ = ctx.fill_text("No finished games yet", w / 2.0, cy);
        cy += line_height;
    }

    for (i, entry) in session.leaderboard().entries().iter().enumerate() {
        let color = theme.tiles[theme.tiles.len() - 1 - i];
        ctx.set_fill_style_str(&color.as_css());
        let _ = ctx.fill_text(
            &format!("{}. {:<14} {:>8}", i + 1, entry.name, entry.score),
            w / 2.0,
            cy,
        );
        cy += line_height;
    }

    cy += line_height;
    ctx.set_fill_style_str(&theme.info_text.as_css());
    let _ = ctx.fill_text(&format!("Best score: {}", session.best_score()), w / 2.0, cy);

    ctx.set_font(&format!("{}px {}", font_size * 0.5, FONT));
    let _ = ctx.fill_text("Esc: back", w / 2.0, cy + line_height * 1.5);
}

fn render_message(
    ctx: &CanvasRenderingContext2d,
    theme: &Theme,
    message: &str,
    width: u32,
    height: u32,
    font_size: f64,
) {
    let msg_y = height as f64 - 50.0;

    ctx.set_font(&format!("{}px {}", font_size * 0.8, FONT));

    // Background
    ctx.set_fill_style_str(&theme.background.as_css_alpha(0.8));
    let metrics = ctx.measure_text(message).ok();
    let msg_width = metrics.map(|m| m.width()).unwrap_or(200.0) + 40.0;
    ctx.fill_rect(
        (width as f64 - msg_width) / 2.0,
        msg_y - font_size,
        msg_width,
        font_size * 2.0,
    );

    // Text
    ctx.set_fill_style_str(&theme.message_text.as_css());
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    let _ = ctx.fill_text(message, width as f64 / 2.0, msg_y);
}
