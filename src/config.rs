use std::{env, path::PathBuf, time::Duration};

use crate::error::{Result, SnakeError};

const DEFAULT_TICK_MS: u64 = 100;
const DEFAULT_POLL_MS: u64 = 100;

pub const USAGE: &str = "\
Usage: snake [OPTIONS]

Options:
      --tick-ms <MS>     Time between snake moves (default: 100)
      --poll-ms <MS>     How long to wait for a key before checking for exit (default: 100)
      --seed <N>         Seed for food placement
      --no-color         Plain glyphs only (also set by NO_COLOR)
      --log <PATH>       Write a debug log to PATH
  -h, --help             Show this help";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub tick: Duration,
    pub poll: Duration,
    pub color: bool,
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            poll: Duration::from_millis(DEFAULT_POLL_MS),
            color: env::var_os("NO_COLOR").is_none(),
            seed: None,
            log_file: None,
        }
    }
}

impl GameConfig {
    /// Builds a config from the command line, program name excluded.
    /// Returns `None` if help was asked for.
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Result<Option<Self>> {
        let mut config = GameConfig::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--tick-ms" => config.tick = Duration::from_millis(positive(&arg, args.next())?),
                "--poll-ms" => config.poll = Duration::from_millis(positive(&arg, args.next())?),
                "--seed" => config.seed = Some(number(&arg, args.next())?),
                "--no-color" => config.color = false,
                "--log" => config.log_file = Some(PathBuf::from(value(&arg, args.next())?)),
                "-h" | "--help" => return Ok(None),
                other => return Err(SnakeError::InvalidArgument(format!("unknown option '{}'", other))),
            }
        }

        Ok(Some(config))
    }
}

fn value(flag: &str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| SnakeError::InvalidArgument(format!("{} needs a value", flag)))
}

fn number(flag: &str, raw: Option<String>) -> Result<u64> {
    let raw = value(flag, raw)?;
    raw.parse()
        .map_err(|_| SnakeError::InvalidArgument(format!("{} expects a number, got '{}'", flag, raw)))
}

fn positive(flag: &str, raw: Option<String>) -> Result<u64> {
    match number(flag, raw)? {
        0 => Err(SnakeError::InvalidArgument(format!("{} must be greater than zero", flag))),
        n => Ok(n),
    }
}
