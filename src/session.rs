//! Wires the three threads together around one monitor and waits for all of
//! them to finish.
//!
//! ```text
//!   input ──(moves, exit)──> Monitor ──(move)──> game
//!                              ^                   │
//!   render <──(condvar)────────┴───(frames)────────┘
//! ```

use std::{sync::Arc, thread::{self, JoinHandle}, time::Duration};

use rand::Rng;
use tracing::{error, info};

use crate::error::{Result, SnakeError};
use crate::game::{Game, Outcome};
use crate::input::{self, KeySource};
use crate::monitor::Monitor;
use crate::render::{self, Renderer};
use crate::snake::{Direction, Snake};

const INITIAL_DIRECTION: Direction = Direction::Right;

/// Plays one game to the end: until the player quits, or until one of the
/// threads fails and takes the others down with it.
///
/// A dead snake doesn't end the session on its own, the player still gets to
/// look at the board before quitting.
pub fn run<R, K, T>(snake: Snake, rng: R, keys: K, renderer: T, tick: Duration) -> Result<Outcome>
where
    R: Rng + Send + 'static,
    K: KeySource + Send + 'static,
    T: Renderer + Send + 'static,
{
    let monitor = Arc::new(Monitor::new(INITIAL_DIRECTION));
    let game = Game::new(snake, Arc::clone(&monitor), rng, tick);
    monitor.publish(game.initial_signal());

    let render = spawn("render", {
        let monitor = Arc::clone(&monitor);
        move || render::run(monitor, renderer)
    })?;

    let game = match spawn("game", move || game.run()) {
        Ok(handle) => handle,
        Err(e) => {
            monitor.request_exit();
            let _ = join("render", render, &monitor);
            return Err(e);
        },
    };

    let input = match spawn("input", {
        let monitor = Arc::clone(&monitor);
        move || input::run(monitor, keys)
    }) {
        Ok(handle) => handle,
        Err(e) => {
            monitor.request_exit();
            let _ = join("game", game, &monitor);
            let _ = join("render", render, &monitor);
            return Err(e);
        },
    };

    let game_res = join("game", game, &monitor);
    let input_res = join("input", input, &monitor);
    let render_res = join("render", render, &monitor);

    let outcome = game_res?;
    input_res?;
    render_res?;

    info!(?outcome, "session over");
    Ok(outcome)
}

fn spawn<T, F>(name: &'static str, f: F) -> Result<JoinHandle<Result<T>>>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    thread::Builder::new()
        .name(format!("snake-{}", name))
        .spawn(f)
        .map_err(|source| SnakeError::ThreadSpawn { name, source })
}

fn join<T>(name: &'static str, handle: JoinHandle<Result<T>>, monitor: &Monitor) -> Result<T> {
    match handle.join() {
        Ok(res) => res,
        Err(_) => {
            error!(thread = name, "thread panicked");
            monitor.request_exit();
            Err(SnakeError::ThreadPanicked(name))
        },
    }
}
