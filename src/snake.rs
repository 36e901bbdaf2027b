use rand::Rng;
use tracing::{debug, info, warn};

use crate::{Coords, TermInt};
use crate::error::{Result, SnakeError};
use crate::ring_buffer::RingBuffer;
use Direction::*;
use MoveResult::*;

// Random picks before falling back to scanning the arena for a free cell
const FOOD_PLACEMENT_ATTEMPTS: usize = 64;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn offset(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SnakeState {
    Running,
    Dead,
    Exited,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveResult {
    Moved { head: Coords, tail: Option<Coords> },
    Ate { head: Coords, food: Option<Coords> },
    Crashed,
}

/// The snake and the arena it lives in.
///
/// The body is oldest-first: the front of the ring buffer is the tail and the
/// back is the head. Only the game thread ever touches this.
#[derive(Debug)]
pub struct Snake {
    body: RingBuffer<Coords>,
    head: Coords,
    tail: Option<Coords>,
    food: Option<Coords>,
    width: TermInt,
    height: TermInt,
    score: u32,
    state: SnakeState,
}

impl Snake {
    /// Puts a one-segment snake in the middle of a `width` x `height` arena,
    /// the outermost ring of which is wall, and drops the first piece of food.
    pub fn new<R: Rng + ?Sized>(width: TermInt, height: TermInt, rng: &mut R) -> Result<Self> {
        if width < 3 || height < 3 {
            return Err(SnakeError::InvalidArgument(format!(
                "a {}x{} arena has no room inside its walls", width, height
            )));
        }

        let head = (width / 2, height / 2);
        let mut body = RingBuffer::new()?;
        body.push_back(head)?;

        let mut snake = Snake { body, head, tail: None, food: None, width, height, score: 0, state: SnakeState::Running };
        snake.food = snake.spawn_food(rng);

        debug!(?head, food = ?snake.food, width, height, "snake created");
        Ok(snake)
    }

    /// Advances the head one cell in `direction`.
    ///
    /// Leaving the interior or running into any body segment kills the snake,
    /// after which every further step is a no-op that reports `Crashed`.
    pub fn step<R: Rng + ?Sized>(&mut self, direction: Direction, rng: &mut R) -> Result<MoveResult> {
        if self.state != SnakeState::Running {
            return Ok(Crashed);
        }

        let new_head = match self.next_head(direction) {
            Some(pos) if !self.body.contains(&pos) => pos,
            _ => {
                self.state = SnakeState::Dead;
                info!(head = ?self.head, ?direction, score = self.score, "snake crashed");
                return Ok(Crashed);
            },
        };

        self.body.push_back(new_head)?;
        self.head = new_head;

        if Some(new_head) == self.food {
            self.score += 1;
            self.tail = None;
            self.food = self.spawn_food(rng);
            debug!(score = self.score, food = ?self.food, "food eaten");
            Ok(Ate { head: new_head, food: self.food })
        } else {
            self.tail = self.body.pop_front();
            Ok(Moved { head: new_head, tail: self.tail })
        }
    }

    /// Moves the food somewhere specific. It has to be inside the walls and
    /// off the snake.
    pub fn set_food(&mut self, food: Coords) -> Result<()> {
        if !self.in_interior(food) || self.body.contains(&food) {
            return Err(SnakeError::InvalidArgument(format!("food can't go at {:?}", food)));
        }
        self.food = Some(food);
        Ok(())
    }

    pub fn exit(&mut self) {
        self.state = SnakeState::Exited;
    }

    pub fn head(&self) -> Coords {
        self.head
    }

    /// The segment dropped on the last move, if any.
    pub fn tail(&self) -> Option<Coords> {
        self.tail
    }

    pub fn food(&self) -> Option<Coords> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn state(&self) -> SnakeState {
        self.state
    }

    pub fn body(&self) -> &RingBuffer<Coords> {
        &self.body
    }

    ///////////////////////////////////////////////////////////////////////////

    fn next_head(&self, direction: Direction) -> Option<Coords> {
        let (dx, dy) = direction.offset();
        let (x, y) = (self.head.0 as i32 + dx, self.head.1 as i32 + dy);

        if x < 1 || y < 1 || x > self.width as i32 - 2 || y > self.height as i32 - 2 {
            return None;
        }

        Some((x as TermInt, y as TermInt))
    }

    fn in_interior(&self, pos: Coords) -> bool {
        pos.0 >= 1 && pos.1 >= 1 && pos.0 <= self.width - 2 && pos.1 <= self.height - 2
    }

    fn spawn_food<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Coords> {
        let (max_x, max_y) = (self.width - 2, self.height - 2);

        for _ in 0..FOOD_PLACEMENT_ATTEMPTS {
            let pos = (rng.gen_range(1..=max_x), rng.gen_range(1..=max_y));
            if !self.body.contains(&pos) {
                return Some(pos);
            }
        }

        // The arena is getting crowded, walk it from a random cell instead
        let cells = max_x as usize * max_y as usize;
        let start = rng.gen_range(0..cells);
        let found = (0..cells)
            .map(|i| (start + i) % cells)
            .map(|i| ((i % max_x as usize) as TermInt + 1, (i / max_x as usize) as TermInt + 1))
            .find(|pos| !self.body.contains(pos));

        if found.is_none() {
            warn!(len = self.body.len(), "no free cell left for food");
        }

        found
    }
}
