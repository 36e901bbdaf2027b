//! The one piece of state shared by the input, game and render threads.
//!
//! Every field lives behind a single mutex. The game thread polls it once per
//! tick and never waits on it; the render thread parks on the condition
//! variable until there is something to draw. Producers notify while still
//! holding the lock, so a render signal can't slip in between the renderer's
//! emptiness check and its wait.

use std::mem;

use parking_lot::{Condvar, Mutex};
use tracing::trace;

use crate::Coords;
use crate::snake::Direction;

/// What the game thread should do on its next tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameSignal {
    Empty,
    Exit,
    MoveAvailable,
}

/// A single tick's worth of changes, copied out of the game state so the
/// renderer never has to look at the snake itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub head: Coords,
    pub tail: Option<Coords>,
    pub food: Option<Coords>,
    pub score: u32,
}

/// What the render thread has to draw since it last woke up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderSignal {
    Empty,
    Exit,
    SnakeMoved(Vec<Frame>),
    SnakeAndFoodMoved(Vec<Frame>),
    SnakeDied { frames: Vec<Frame>, head: Coords, score: u32 },
}

impl RenderSignal {
    pub fn is_empty(&self) -> bool {
        matches!(self, RenderSignal::Empty)
    }

    /// Folds a newer signal into one the renderer hasn't consumed yet.
    ///
    /// Frames are kept in the order they were produced. Exit wins over
    /// anything, and nothing comes after a death.
    pub fn coalesce(self, next: RenderSignal) -> RenderSignal {
        use RenderSignal::*;

        match (self, next) {
            (Exit, _) | (_, Exit) => Exit,
            (Empty, next) => next,
            (prev, Empty) => prev,
            (died @ SnakeDied { .. }, _) => died,
            (prev, SnakeDied { frames, head, score }) => {
                let mut all = prev.into_frames();
                all.extend(frames);
                SnakeDied { frames: all, head, score }
            },
            (prev, next) => {
                let food_moved = matches!(prev, SnakeAndFoodMoved(_)) || matches!(next, SnakeAndFoodMoved(_));
                let mut all = prev.into_frames();
                all.extend(next.into_frames());

                if food_moved { SnakeAndFoodMoved(all) } else { SnakeMoved(all) }
            },
        }
    }

    pub fn into_frames(self) -> Vec<Frame> {
        match self {
            RenderSignal::SnakeMoved(frames)
            | RenderSignal::SnakeAndFoodMoved(frames)
            | RenderSignal::SnakeDied { frames, .. } => frames,
            RenderSignal::Empty | RenderSignal::Exit => Vec::new(),
        }
    }
}

/// What the game thread got out of the monitor for this tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameCommand {
    Exit,
    Advance(Direction),
}

#[derive(Debug)]
struct Shared {
    game: GameSignal,
    render: RenderSignal,
    move_previous: Direction,
    move_next: [Option<Direction>; 2],
}

impl Shared {
    fn enqueue(&mut self, direction: Direction) -> bool {
        if self.game == GameSignal::Exit || direction == self.move_previous.opposite() {
            return false;
        }

        let queue = self.move_next;
        match queue {
            [None, _] => self.move_next[0] = Some(direction),
            // The first queued move becomes the previous one by the time the
            // second is consumed, so its reverse is rejected too
            [Some(first), None] if first != direction && first.opposite() != direction => {
                self.move_next[1] = Some(direction)
            },
            _ => return false,
        }

        self.game = GameSignal::MoveAvailable;
        true
    }

    fn dequeue(&mut self) -> Direction {
        let active = self.move_next[0].unwrap_or(self.move_previous);

        self.move_next = [self.move_next[1], None];
        self.move_previous = active;
        self.game = if self.move_next[0].is_some() { GameSignal::MoveAvailable } else { GameSignal::Empty };

        active
    }
}

#[derive(Debug)]
pub struct Monitor {
    state: Mutex<Shared>,
    render_ready: Condvar,
}

impl Monitor {
    pub fn new(initial_direction: Direction) -> Self {
        let shared = Shared {
            game: GameSignal::Empty,
            render: RenderSignal::Empty,
            move_previous: initial_direction,
            move_next: [None, None],
        };

        Monitor { state: Mutex::new(shared), render_ready: Condvar::new() }
    }

    /// Queues a direction change. Returns whether it was accepted.
    ///
    /// Reversals of the current heading, repeats of the pending move and
    /// anything past two pending moves are dropped, as is everything once
    /// exit has been requested.
    pub fn enqueue_move(&self, direction: Direction) -> bool {
        self.state.lock().enqueue(direction)
    }

    /// Tells every thread to wind down. This is the only shutdown path.
    pub fn request_exit(&self) {
        let mut state = self.state.lock();
        state.game = GameSignal::Exit;
        state.render = mem::replace(&mut state.render, RenderSignal::Empty).coalesce(RenderSignal::Exit);
        self.render_ready.notify_all();
        trace!("exit requested");
    }

    pub fn exit_requested(&self) -> bool {
        self.state.lock().game == GameSignal::Exit
    }

    /// Hands the game thread its direction for this tick, or tells it to
    /// stop. The consumed move becomes the previous one right away, while
    /// still under the lock.
    pub fn next_command(&self) -> GameCommand {
        let mut state = self.state.lock();

        if state.game == GameSignal::Exit {
            return GameCommand::Exit;
        }

        GameCommand::Advance(state.dequeue())
    }

    pub fn publish(&self, signal: RenderSignal) {
        if signal.is_empty() {
            return;
        }

        let mut state = self.state.lock();
        state.render = mem::replace(&mut state.render, RenderSignal::Empty).coalesce(signal);
        self.render_ready.notify_one();
    }

    /// Blocks until there's something to render and takes it. An exit signal
    /// is left in place so it's seen again by anyone else who waits.
    pub fn wait_render(&self) -> RenderSignal {
        let mut state = self.state.lock();

        while state.render.is_empty() {
            self.render_ready.wait(&mut state);
        }

        if state.render == RenderSignal::Exit {
            return RenderSignal::Exit;
        }

        mem::replace(&mut state.render, RenderSignal::Empty)
    }

    /// Whether the renderer has something it hasn't picked up yet.
    pub fn pending_render(&self) -> bool {
        !self.state.lock().render.is_empty()
    }

    pub fn game_signal(&self) -> GameSignal {
        self.state.lock().game
    }

    pub fn previous_move(&self) -> Direction {
        self.state.lock().move_previous
    }

    pub fn pending_moves(&self) -> [Option<Direction>; 2] {
        self.state.lock().move_next
    }
}

impl Default for Monitor {
    fn default() -> Self {
        Monitor::new(Direction::Right)
    }
}
