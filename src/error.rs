use thiserror::Error;

/// Everything that can go wrong outside of the game rules themselves.
///
/// Crashing into a wall or into the snake's own body is not an error, it's
/// a state of the game (see [`crate::snake::SnakeState`]).
#[derive(Error, Debug)]
pub enum SnakeError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("index {index} out of bounds for length {len}")]
    OutOfBounds { index: usize, len: usize },

    #[error("failed to allocate room for {requested} elements")]
    Allocation { requested: usize },

    #[error("terminal error: {0}")]
    Terminal(#[from] crossterm::ErrorKind),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not spawn the {name} thread: {source}")]
    ThreadSpawn {
        name: &'static str,
        source: std::io::Error,
    },

    #[error("the {0} thread panicked")]
    ThreadPanicked(&'static str),
}

pub type Result<T> = std::result::Result<T, SnakeError>;
