use crate::app::{App, ScreenState, MAX_NAME_LEN};
use crossterm::{
    cursor::{Hide, MoveTo},
    execute,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use std::io;
use twenty48_core::{Outcome, Position, SIZE};

/// Tile size in terminal cells
const CELL_WIDTH: u16 = 8;
const CELL_HEIGHT: u16 = 3;

/// Board size including the one-cell gaps between tiles
const BOARD_WIDTH: u16 = CELL_WIDTH * SIZE as u16 + SIZE as u16 + 1;
const BOARD_HEIGHT: u16 = CELL_HEIGHT * SIZE as u16 + SIZE as u16 + 1;

const PANEL_WIDTH: u16 = 28;

pub fn render(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;

    execute!(
        stdout,
        Hide,
        SetBackgroundColor(app.theme.bg),
        Clear(ClearType::All)
    )?;

    match app.screen_state {
        ScreenState::Playing => render_game_screen(stdout, app, term_width, term_height)?,
        ScreenState::GameOver(outcome) => {
            render_game_screen(stdout, app, term_width, term_height)?;
            render_game_over(stdout, app, outcome, term_width, term_height)?;
        }
        ScreenState::Leaderboard => render_leaderboard_screen(stdout, app, term_width)?,
        ScreenState::NameEntry => {
            render_game_screen(stdout, app, term_width, term_height)?;
            render_name_prompt(stdout, app, term_width, term_height)?;
        }
    }

    if let Some(ref msg) = app.message {
        render_message(stdout, app, msg, term_width)?;
    }

    Ok(())
}

fn render_game_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    // Center the board horizontally, leave room for the info panel
    let total_width = BOARD_WIDTH + 3 + PANEL_WIDTH;
    let start_x = if term_width > total_width {
        (term_width - total_width) / 2
    } else {
        1
    };
    let start_y = if term_height > BOARD_HEIGHT + 8 { 2 } else { 1 };

    render_board(stdout, app, start_x, start_y)?;
    render_info_panel(stdout, app, start_x + BOARD_WIDTH + 3, start_y)?;
    render_controls(stdout, app, start_x, start_y + BOARD_HEIGHT + 1)?;

    Ok(())
}

fn render_board(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let grid = app.session.game().grid();

    // Tiles that the current hint would merge get a highlighted frame
    let highlighted: Vec<Position> = app
        .hint
        .iter()
        .flat_map(|hint| hint.merges.iter().flat_map(|pair| [pair.into, pair.from]))
        .collect();

    for row in 0..BOARD_HEIGHT {
        execute!(
            stdout,
            MoveTo(x, y + row),
            SetBackgroundColor(theme.border),
            Print(" ".repeat(BOARD_WIDTH as usize))
        )?;
    }

    for pos in Position::all() {
        let value = grid.get(pos);
        let cx = x + 1 + pos.col as u16 * (CELL_WIDTH + 1);
        let cy = y + 1 + pos.row as u16 * (CELL_HEIGHT + 1);

        let bg = theme.tile_bg(value);
        let edge = if highlighted.contains(&pos) {
            theme.hint_bg
        } else {
            bg
        };
        let label = if value == 0 {
            String::new()
        } else {
            value.to_string()
        };

        for line in 0..CELL_HEIGHT {
            let (line_bg, text) = if line == CELL_HEIGHT / 2 {
                (bg, format!("{:^width$}", label, width = CELL_WIDTH as usize))
            } else {
                (edge, " ".repeat(CELL_WIDTH as usize))
            };
            execute!(
                stdout,
                MoveTo(cx, cy + line),
                SetBackgroundColor(line_bg),
                SetForegroundColor(theme.tile_fg(value)),
                Print(text)
            )?;
        }
    }

    execute!(stdout, SetBackgroundColor(theme.bg))?;
    Ok(())
}

fn render_info_panel(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let session = &app.session;
    let game = session.game();

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.key),
        Print("═══ 2048 ═══")
    )?;

    execute!(
        stdout,
        MoveTo(x, y + 2),
        SetForegroundColor(theme.fg),
        Print(format!("Score:  {:>10}", game.score()))
    )?;

    let best_color = if game.score() > 0 && game.score() == session.best_score() {
        theme.success
    } else {
        theme.info
    };
    execute!(
        stdout,
        MoveTo(x, y + 3),
        SetForegroundColor(best_color),
        Print(format!("Best:   {:>10}", session.best_score()))
    )?;

    execute!(
        stdout,
        MoveTo(x, y + 5),
        SetForegroundColor(theme.info),
        Print(format!("Moves:  {:>10}", game.moves())),
        MoveTo(x, y + 6),
        Print(format!("Max:    {:>10}", game.grid().max_tile())),
        MoveTo(x, y + 7),
        Print(format!("Player: {:>10}", truncate(session.player_name(), 10)))
    )?;

    let undo_color = if game.can_undo() {
        theme.success
    } else {
        theme.border
    };
    execute!(
        stdout,
        MoveTo(x, y + 9),
        SetForegroundColor(undo_color),
        Print(if game.can_undo() {
            "Undo available"
        } else {
            "No undo"
        })
    )?;

    execute!(
        stdout,
        MoveTo(x, y + 10),
        SetForegroundColor(theme.border),
        Print("─".repeat(PANEL_WIDTH as usize - 4))
    )?;

    if let Some(ref hint) = app.hint {
        execute!(
            stdout,
            MoveTo(x, y + 12),
            SetForegroundColor(theme.success),
            Print(format!("Hint: {} {}", hint.direction.arrow(), hint.direction))
        )?;
        for (i, line) in wrap_text(&hint.explanation(), PANEL_WIDTH as usize - 4)
            .iter()
            .enumerate()
        {
            execute!(
                stdout,
                MoveTo(x, y + 13 + i as u16),
                SetForegroundColor(theme.fg),
                Print(line)
            )?;
        }
    }

    Ok(())
}

fn render_controls(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    let controls = [
        ("Arrows", "Move"),
        ("wasd/hjkl", "Move"),
        ("u", "Undo"),
        ("x", "Shuffle"),
        ("?", "Hint"),
        ("n", "New game"),
        ("b", "Leaderboard"),
        ("p", "Player name"),
        ("t", "Theme"),
        ("q", "Quit"),
    ];

    // Two rows per column
    for (i, (key, desc)) in controls.iter().enumerate() {
        let col = i / 2;
        let row = i % 2;
        let cx = x + (col as u16) * 22;
        let cy = y + row as u16;

        execute!(
            stdout,
            MoveTo(cx, cy),
            SetForegroundColor(theme.key),
            Print(format!("{:>9}", key)),
            SetForegroundColor(theme.info),
            Print(format!(" {}", desc))
        )?;
    }

    Ok(())
}

fn render_message(
    stdout: &mut io::Stdout,
    app: &App,
    msg: &str,
    term_width: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let padded = format!("  {}  ", msg);
    let x = term_width.saturating_sub(padded.chars().count() as u16) / 2;

    execute!(
        stdout,
        MoveTo(x, 0),
        SetForegroundColor(theme.fg),
        SetBackgroundColor(theme.hint_bg),
        Print(&padded),
        SetBackgroundColor(theme.bg)
    )?;

    Ok(())
}

/// Draw a filled box and return its top-left corner
fn draw_box(
    stdout: &mut io::Stdout,
    bg: Color,
    width: u16,
    height: u16,
    term_width: u16,
    term_height: u16,
) -> io::Result<(u16, u16)> {
    let x = term_width.saturating_sub(width) / 2;
    let y = term_height.saturating_sub(height) / 2;
    for row in 0..height {
        execute!(
            stdout,
            MoveTo(x, y + row),
            SetBackgroundColor(bg),
            Print(" ".repeat(width as usize))
        )?;
    }
    Ok((x, y))
}

fn render_game_over(
    stdout: &mut io::Stdout,
    app: &App,
    outcome: Outcome,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let bg = Color::Rgb {
        r: 25,
        g: 25,
        b: 35,
    };
    let (x, y) = draw_box(stdout, bg, 44, 9, term_width, term_height)?;

    let title_color = match outcome {
        Outcome::Win => theme.success,
        Outcome::Lose => theme.error,
    };
    execute!(
        stdout,
        MoveTo(x + 3, y + 1),
        SetBackgroundColor(bg),
        SetForegroundColor(title_color),
        Print(outcome.message()),
        MoveTo(x + 3, y + 3),
        SetForegroundColor(Color::White),
        Print(format!("Final score: {}", app.session.game().score()))
    )?;

    if let Some(rank) = app.last_rank {
        execute!(
            stdout,
            MoveTo(x + 3, y + 4),
            SetForegroundColor(Color::Yellow),
            Print(format!("#{} on the leaderboard!", rank))
        )?;
    }

    execute!(
        stdout,
        MoveTo(x + 3, y + 6),
        SetForegroundColor(theme.key),
        Print("Enter"),
        SetForegroundColor(Color::Grey),
        Print(" new game  "),
        SetForegroundColor(theme.key),
        Print("u"),
        SetForegroundColor(Color::Grey),
        Print(" undo  "),
        SetForegroundColor(theme.key),
        Print("b"),
        SetForegroundColor(Color::Grey),
        Print(" scores"),
        MoveTo(x + 3, y + 7),
        SetForegroundColor(theme.key),
        Print("q"),
        SetForegroundColor(Color::Grey),
        Print(" quit"),
        SetBackgroundColor(theme.bg)
    )?;

    Ok(())
}

fn render_name_prompt(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let width = MAX_NAME_LEN as u16 + 12;
    let (x, y) = draw_box(stdout, theme.hint_bg, width, 6, term_width, term_height)?;

    execute!(
        stdout,
        MoveTo(x + 2, y + 1),
        SetBackgroundColor(theme.hint_bg),
        SetForegroundColor(theme.key),
        Print("Player name"),
        MoveTo(x + 2, y + 2),
        SetForegroundColor(theme.fg),
        Print(format!("> {}_", app.name_input)),
        MoveTo(x + 2, y + 4),
        SetForegroundColor(theme.info),
        Print("Enter save  Esc cancel"),
        SetBackgroundColor(theme.bg)
    )?;

    Ok(())
}

fn render_leaderboard_screen(stdout: &mut io::Stdout, app: &App, term_width: u16) -> io::Result<()> {
    let theme = &app.theme;
    let leaderboard = app.session.leaderboard();

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    let title = "═══ LEADERBOARD ═══";
    let title_x = term_width.saturating_sub(title.chars().count() as u16) / 2;
    execute!(
        stdout,
        MoveTo(title_x, 1),
        SetForegroundColor(theme.key),
        Print(title)
    )?;

    let x = term_width.saturating_sub(30) / 2;
    let header_y = 3;
    execute!(
        stdout,
        MoveTo(x, header_y),
        SetForegroundColor(theme.fg),
        Print(format!("{:>4}  {:<14} {:>8}", "Rank", "Player", "Score")),
        MoveTo(x, header_y + 1),
        SetForegroundColor(theme.border),
        Print("─".repeat(30))
    )?;

    if leaderboard.is_empty() {
        execute!(
            stdout,
            MoveTo(x, header_y + 3),
            SetForegroundColor(theme.info),
            Print("No finished games yet")
        )?;
    }

    for (i, entry) in leaderboard.entries().iter().enumerate() {
        let rank_color = match i {
            0 => Color::Yellow,
            1 => Color::Grey,
            _ => Color::Rgb {
                r: 205,
                g: 127,
                b: 50,
            },
        };
        execute!(
            stdout,
            MoveTo(x, header_y + 2 + i as u16),
            SetForegroundColor(rank_color),
            Print(format!("{:>4}", i + 1)),
            SetForegroundColor(theme.fg),
            Print(format!(
                "  {:<14} {:>8}",
                truncate(&entry.name, 14),
                entry.score
            ))
        )?;
    }

    execute!(
        stdout,
        MoveTo(x, header_y + 7),
        SetForegroundColor(theme.info),
        Print(format!("Best score: {}", app.session.best_score())),
        MoveTo(x, header_y + 9),
        SetForegroundColor(theme.key),
        Print("Esc/b"),
        SetForegroundColor(theme.info),
        Print(" back")
    )?;

    Ok(())
}

fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.chars().count() + word.chars().count() + 1 > max_width && !current.is_empty() {
            lines.push(current);
            current = String::new();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Cut a name to at most `max` characters
fn truncate(name: &str, max: usize) -> String {
    name.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_fits_tiles() {
        assert_eq!(BOARD_WIDTH, 37);
        assert_eq!(BOARD_HEIGHT, 17);
        // Six-digit tiles still fit inside a cell
        assert!("131072".len() < CELL_WIDTH as usize);
    }

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("Move left ← to merge 2 pairs for +12", 12);
        assert!(lines.iter().all(|l| l.chars().count() <= 12));
        assert_eq!(lines.join(" "), "Move left ← to merge 2 pairs for +12");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Bartholomew", 4), "Bart");
        assert_eq!(truncate("Zoë", 10), "Zoë");
    }
}
