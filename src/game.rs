use std::{sync::Arc, thread::sleep, time::Duration};

use rand::Rng;
use tracing::{error, info};

use crate::error::Result;
use crate::monitor::{Frame, GameCommand, Monitor, RenderSignal};
use crate::snake::{MoveResult::*, Snake, SnakeState};

/// How a game ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub state: SnakeState,
    pub score: u32,
}

/// The game thread: one move per tick, paced by a plain sleep. It only ever
/// polls the monitor, so the tick rate doesn't depend on how fast keys come
/// in or how long drawing takes.
pub struct Game<R> {
    snake: Snake,
    monitor: Arc<Monitor>,
    rng: R,
    interval: Duration,
}

impl<R: Rng> Game<R> {
    pub fn new(snake: Snake, monitor: Arc<Monitor>, rng: R, interval: Duration) -> Self {
        Game { snake, monitor, rng, interval }
    }

    /// What has to be on screen before the first tick.
    pub fn initial_signal(&self) -> RenderSignal {
        RenderSignal::SnakeAndFoodMoved(vec![Frame {
            head: self.snake.head(),
            tail: None,
            food: self.snake.food(),
            score: self.snake.score(),
        }])
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    /// Runs one tick and hands the result to the renderer.
    pub fn tick(&mut self) -> Result<SnakeState> {
        if self.snake.state() != SnakeState::Running {
            return Ok(self.snake.state());
        }

        let direction = match self.monitor.next_command() {
            GameCommand::Exit => {
                self.snake.exit();
                return Ok(SnakeState::Exited);
            },
            GameCommand::Advance(dir) => dir,
        };

        let signal = match self.snake.step(direction, &mut self.rng)? {
            Moved { head, tail } => {
                RenderSignal::SnakeMoved(vec![Frame { head, tail, food: None, score: self.snake.score() }])
            },
            Ate { head, food } => {
                RenderSignal::SnakeAndFoodMoved(vec![Frame { head, tail: None, food, score: self.snake.score() }])
            },
            Crashed => RenderSignal::SnakeDied { frames: vec![], head: self.snake.head(), score: self.snake.score() },
        };

        self.monitor.publish(signal);
        Ok(self.snake.state())
    }

    /// Ticks until the snake dies or exit is requested.
    ///
    /// A failure here brings every other thread down with it through the
    /// monitor before being returned.
    pub fn run(mut self) -> Result<Outcome> {
        info!(interval_ms = self.interval.as_millis() as u64, "game thread started");

        loop {
            match self.tick() {
                Ok(SnakeState::Running) => sleep(self.interval),
                Ok(state) => {
                    let outcome = Outcome { state, score: self.snake.score() };
                    info!(?outcome, "game thread finished");
                    return Ok(outcome);
                },
                Err(e) => {
                    error!(error = %e, "game thread failed");
                    self.monitor.request_exit();
                    return Err(e);
                },
            }
        }
    }
}
