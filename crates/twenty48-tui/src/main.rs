mod app;
mod render;
mod store;
mod theme;

use app::App;
use clap::Parser;
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use env_logger::{Env, Target};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use store::Environment;
use theme::ThemeName;
use twenty48_core::Session;

/// Log file written next to the profile store
const LOG_FILE: &str = "twenty48.log";

/// Play 2048 in the terminal
#[derive(Parser, Debug)]
#[command(name = "twenty48", version, about)]
struct Args {
    /// Seed for a reproducible game (skips resuming the saved game)
    #[arg(long)]
    seed: Option<u64>,

    /// Player name recorded on the leaderboard
    #[arg(long)]
    player: Option<String>,

    /// Color theme
    #[arg(long, value_enum, default_value_t = ThemeName::Dark)]
    theme: ThemeName,

    /// Directory for the profile store and log file
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let dir = store::data_dir(args.data_dir.clone());
    init_logging(&dir);

    let app = build_app(&args, &dir);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Run the app
    let result = run_app(&mut stdout, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, Show, LeaveAlternateScreen)?;

    if let Err(e) = result {
        log::error!("terminal error: {}", e);
        eprintln!("Error: {}", e);
    }

    Ok(())
}

/// Send log output to a file; stdout belongs to the game screen
fn init_logging(dir: &Path) {
    let file = std::fs::create_dir_all(dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(LOG_FILE))
    });

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    match file {
        Ok(file) => {
            builder.target(Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            // Nowhere to write without corrupting the screen
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

fn build_app(args: &Args, dir: &Path) -> App {
    let env = Environment::detect();
    let store = store::create_store(env, dir);

    let mut session = match args.seed {
        Some(seed) => Session::with_seed(store, seed),
        None => {
            let mut session = Session::new(store);
            if session.load_game() {
                log::info!("resumed saved game");
            }
            session
        }
    };

    if let Some(ref name) = args.player {
        session.set_player_name(name);
    }

    App::new(session, args.theme.theme())
}

fn run_app(stdout: &mut io::Stdout, mut app: App) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        let tick_rate = app.tick_rate();

        render::render(stdout, &app)?;
        stdout.flush()?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout.min(Duration::from_millis(33)))? {
            if let Event::Key(key) = event::read()? {
                // Ignore release events on terminals that report them
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match app.handle_key(key) {
                    app::AppAction::Continue => {}
                    app::AppAction::Quit => break,
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
