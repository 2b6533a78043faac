//! Waterbomb Duel entry point
//!
//! The browser build is driven from JavaScript through `web::WebGame`. Natively
//! this plays one headless match with the autopilot standing in for the player.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use waterbomb_duel::autopilot::Autopilot;
    use waterbomb_duel::consts::TICK_HZ;
    use waterbomb_duel::sim::MatchStatus;
    use waterbomb_duel::{Difficulty, Game, MemoryStorage, Storage};

    env_logger::init();

    let level = std::env::args().nth(1).and_then(|arg| arg.parse::<u8>().ok()).unwrap_or(1);
    let Some(difficulty) = Difficulty::from_level(level) else {
        eprintln!("Unknown difficulty level {level} (expected 1-5)");
        std::process::exit(2);
    };

    log::info!("Waterbomb Duel (native) starting vs {}", difficulty.as_str());

    let mut storage = MemoryStorage::new();
    storage.set_item("waterbomb_unlocked_level", "5");
    storage.set_item("waterbomb_tutorial_completed", "true");

    let seed: u64 = rand::random();
    let mut game = Game::new(storage, seed);
    let mut pilot = Autopilot::new(Difficulty::PowerShower.profile(), seed.rotate_left(17));
    if !game.start_game(difficulty) {
        eprintln!("Could not start a match at level {level}");
        std::process::exit(1);
    }

    // Half an hour of game time is far beyond any real match
    let max_ticks = TICK_HZ * 60 * 30;
    while game.state().status == MatchStatus::Playing && game.clock() < max_ticks {
        pilot.act(&mut game);
        game.step();
    }

    let state = game.state();
    match state.winner {
        Some(winner) => println!(
            "{:?} after {} rounds ({:.1}s of play, seed {seed})\n  player: {:.0}% dry, {} bombs\n  AI:     {:.0}% dry, {} bombs",
            winner,
            state.round,
            game.clock() as f32 / TICK_HZ as f32,
            state.player.dryness,
            state.player.bombs,
            state.ai.dryness,
            state.ai.bombs
        ),
        None => println!("Match did not finish within {max_ticks} ticks (seed {seed})"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The WASM entry point is `web::init`, this is just to satisfy the compiler
}
