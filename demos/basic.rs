//! Basic example of using the 2048 engine

use twenty48_core::{MemoryStore, Session};

fn main() {
    // A reproducible game backed by an in-memory profile
    let mut session = Session::with_seed(MemoryStore::new(), 2048);
    session.set_player_name("Demo");

    println!("Starting board:");
    println!("{}", session.game().grid());

    // Follow the hint advisor until the game ends or 200 moves pass
    let mut turns = 0;
    while turns < 200 {
        let Some(hint) = session.request_hint() else {
            break;
        };
        let report = session.move_tiles(hint.direction);
        turns += 1;

        if let Some(outcome) = report.outcome() {
            println!("{} after {} moves", outcome.message(), turns);
            break;
        }
    }

    println!("Board after {} moves:", turns);
    println!("{}", session.game().grid());
    println!("Score: {}  Best: {}", session.game().score(), session.best_score());

    // Undo is a single step
    if session.undo() {
        println!("Undid last move, score back to {}", session.game().score());
    }

    // Shuffle keeps every tile and adds one
    let before = session.game().grid().tile_count();
    session.shuffle();
    println!(
        "Shuffled: {} tiles -> {} tiles",
        before,
        session.game().grid().tile_count()
    );

    println!("\nLeaderboard:");
    for (i, entry) in session.leaderboard().entries().iter().enumerate() {
        println!("{}. {:<10} {}", i + 1, entry.name, entry.score);
    }
}
