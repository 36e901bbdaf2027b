use std::sync::Arc;

use tracing::{debug, error, info};

use crate::error::Result;
use crate::monitor::Monitor;
use crate::snake::Direction;

/// A key press, already stripped down to what the game cares about.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Move(Direction),
    Quit,
    Other,
}

/// Where key presses come from.
pub trait KeySource {
    /// The next key, or `None` if nothing was pressed in the meantime.
    /// Implementations may block for a while, but not forever, so a pending
    /// exit is noticed in time.
    fn next_key(&mut self) -> Result<Option<Key>>;
}

/// The input thread: feeds key presses into the monitor one at a time until
/// the player quits or another thread asks everyone to stop.
pub fn run<K: KeySource>(monitor: Arc<Monitor>, mut keys: K) -> Result<()> {
    info!("input thread started");

    while !monitor.exit_requested() {
        let key = match keys.next_key() {
            Ok(key) => key,
            Err(e) => {
                error!(error = %e, "reading keys failed");
                monitor.request_exit();
                return Err(e);
            },
        };

        match key {
            Some(Key::Quit) => {
                info!("quit requested");
                monitor.request_exit();
            },
            Some(Key::Move(dir)) => {
                let accepted = monitor.enqueue_move(dir);
                debug!(?dir, accepted, "move requested");
            },
            Some(Key::Other) | None => {},
        }
    }

    info!("input thread finished");
    Ok(())
}
