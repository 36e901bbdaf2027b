use crate::{Coords, TermInt};
use crate::error::{Result, SnakeError};
use crate::input::{Key, KeySource};
use crate::render::{Glyph, Renderer, Style};
use crate::snake::Direction;
use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, poll, read};

/// The terminal as the render thread sees it: a bordered arena with a
/// one-line status bar underneath.
pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    color: bool,
}

/// Puts the terminal back the way it was when dropped.
pub struct TermGuard {
    _private: (),
}

impl TermManager {
    pub fn new(color: bool) -> Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(TermManager { width, height, stdout: stdout(), color })
    }

    pub fn setup(&mut self) -> Result<TermGuard> {
        // Created first so that a half-finished setup is still undone
        let guard = TermGuard { _private: () };

        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;

        Ok(guard)
    }

    /// Size of the game area, walls included. The last row is the status bar.
    pub fn arena_size(&self) -> Result<Coords> {
        let size = (self.width, self.height.saturating_sub(1));

        if size.0 < 3 || size.1 < 3 {
            return Err(SnakeError::InvalidArgument(format!(
                "terminal is too small ({}x{})", self.width, self.height
            )));
        }

        Ok(size)
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        Ok(())
    }

    pub fn draw_borders(&mut self) -> Result<()> {
        let (width, height) = self.arena_size()?;

        let end_x = width - 1;
        let end_y = height - 1;

        for x in 0..width {
            let ch = if x == 0 || x == width - 1 {'+'} else {'-'};
            self.print_at((x, 0), ch)?;
            self.print_at((x, end_y), ch)?;
        }

        for y in 1..height - 1 {
            self.print_at((0, y), '|')?;
            self.print_at((end_x, y), '|')?;
        }

        self.flush()
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        let msg_height = lines.len() as TermInt + 2;
        let msg_width = lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) as TermInt + 2;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            queue!(self.stdout, cursor::MoveTo(top_left.0, y), style::Print(padded_line))?;
        }

        self.flush()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn print_at(&mut self, pos: Coords, ch: char) -> Result<()> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
        Ok(())
    }

    fn color_of(&self, style: Style) -> Option<Color> {
        if !self.color {
            return None;
        }

        Some(match style {
            Style::Snake => Color::Green,
            Style::Food => Color::Red,
        })
    }
}

impl Renderer for TermManager {
    fn draw(&mut self, at: Coords, glyph: Glyph, style: Style) -> Result<()> {
        match self.color_of(style) {
            Some(color) => queue!(
                self.stdout,
                cursor::MoveTo(at.0, at.1),
                style::SetForegroundColor(color),
                style::Print(glyph.as_char()),
                style::ResetColor
            )?,
            None => self.print_at(at, glyph.as_char())?,
        }
        Ok(())
    }

    fn erase(&mut self, at: Coords) -> Result<()> {
        self.print_at(at, ' ')
    }

    fn status(&mut self, message: &str) -> Result<()> {
        let row = self.height.saturating_sub(1);
        queue!(
            self.stdout,
            cursor::MoveTo(0, row),
            terminal::Clear(ClearType::CurrentLine),
            style::Print(message)
        )?;
        Ok(())
    }

    fn refresh(&mut self) -> Result<()> {
        self.flush()
    }
}

impl Drop for TermGuard {
    fn drop(&mut self) {
        // Nothing sensible left to do if any of this fails
        let mut out = stdout();
        let _ = terminal::disable_raw_mode();
        let _ = execute!(out, style::ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen);
    }
}

/// Keyboard input through crossterm's event queue.
pub struct TermKeys {
    poll_interval: Duration,
}

impl TermKeys {
    pub fn new(poll_interval: Duration) -> Self {
        TermKeys { poll_interval }
    }

    pub fn read_key_blocking(&mut self) -> Result<Key> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(translate(&ev));
            }
        }
    }
}

impl KeySource for TermKeys {
    fn next_key(&mut self) -> Result<Option<Key>> {
        if !poll(self.poll_interval)? {
            return Ok(None);
        }

        match read()? {
            Event::Key(ev) => Ok(Some(translate(&ev))),
            _ => Ok(None),
        }
    }
}

fn translate(ev: &KeyEvent) -> Key {
    match ev {
        KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL } => Key::Quit,
        KeyEvent { code, modifiers: _ } => match code {
            KeyCode::Char('w') | KeyCode::Up => Key::Move(Direction::Up),
            KeyCode::Char('a') | KeyCode::Left => Key::Move(Direction::Left),
            KeyCode::Char('s') | KeyCode::Down => Key::Move(Direction::Down),
            KeyCode::Char('d') | KeyCode::Right => Key::Move(Direction::Right),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Key::Quit,
            _ => Key::Other,
        }
    }
}
