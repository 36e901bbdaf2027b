//! Terminal snake, played by three threads that only ever meet inside a
//! [`monitor::Monitor`]: one reads keys, one moves the snake on a timer, one
//! draws whatever changed.

pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod monitor;
pub mod render;
pub mod ring_buffer;
pub mod session;
pub mod snake;
pub mod term;

pub type TermInt = u16;
pub type Coords = (u16, u16);
