use std::{env, fs::File, process::exit, sync::Mutex};

use rand::{SeedableRng, rngs::StdRng};
use tracing::info;

use snake_monitor::config::{GameConfig, USAGE};
use snake_monitor::error::Result;
use snake_monitor::input::Key;
use snake_monitor::render::{Renderer, score_line};
use snake_monitor::session;
use snake_monitor::snake::Snake;
use snake_monitor::term::{TermKeys, TermManager};

fn main() {
    let config = match GameConfig::from_args(env::args().skip(1)) {
        Ok(Some(config)) => config,
        Ok(None) => {
            println!("{}", USAGE);
            return;
        },
        Err(e) => {
            eprintln!("snake: {}\n\n{}", e, USAGE);
            exit(2);
        },
    };

    if let Err(e) = init_logging(&config).and_then(|_| play(&config)) {
        eprintln!("snake: {}", e);
        exit(1);
    }
}

fn init_logging(config: &GameConfig) -> Result<()> {
    // The screen belongs to the game, so logs only ever go to a file
    if let Some(path) = &config.log_file {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_thread_names(true)
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    Ok(())
}

fn play(config: &GameConfig) -> Result<()> {
    let mut term = TermManager::new(config.color)?;
    let _guard = term.setup()?;
    let (width, height) = term.arena_size()?;
    let mut keys = TermKeys::new(config.poll);

    term.clear()?;
    term.show_message(&[
        "Arrow keys or WASD to move",
        "q to quit",
        "",
        "Press any key to begin"
    ])?;

    if keys.read_key_blocking()? == Key::Quit {
        return Ok(());
    }

    term.clear()?;
    term.draw_borders()?;
    term.status(&score_line(0))?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let snake = Snake::new(width, height, &mut rng)?;
    info!(width, height, tick_ms = config.tick.as_millis() as u64, "starting game");

    let outcome = session::run(snake, rng, keys, term, config.tick)?;
    info!(?outcome, "game over");
    Ok(())
}
