use std::sync::Arc;

use tracing::{error, info, trace};

use crate::Coords;
use crate::error::Result;
use crate::monitor::{Frame, Monitor, RenderSignal};

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = '*';
const DEAD_SNAKE_CHAR: char = 'X';

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Glyph {
    Segment,
    Food,
    Crash,
}

impl Glyph {
    pub fn as_char(self) -> char {
        match self {
            Glyph::Segment => SNAKE_BODY_CHAR,
            Glyph::Food => FOOD_CHAR,
            Glyph::Crash => DEAD_SNAKE_CHAR,
        }
    }
}

/// Color class. Renderers without color just ignore it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Style {
    Snake,
    Food,
}

/// Something that can put cells on a screen.
pub trait Renderer {
    fn draw(&mut self, at: Coords, glyph: Glyph, style: Style) -> Result<()>;
    fn erase(&mut self, at: Coords) -> Result<()>;
    fn status(&mut self, message: &str) -> Result<()>;
    fn refresh(&mut self) -> Result<()>;
}

pub fn score_line(score: u32) -> String {
    format!("Score: {}  |  q to quit", score)
}

/// The render thread: sleeps on the monitor until the game has moved, then
/// draws the changes outside the lock. Returns once exit is signalled.
pub fn run<T: Renderer>(monitor: Arc<Monitor>, mut renderer: T) -> Result<()> {
    info!("render thread started");

    loop {
        let signal = monitor.wait_render();
        trace!(?signal, "render signal");

        if signal == RenderSignal::Exit {
            info!("render thread finished");
            return Ok(());
        }

        if let Err(e) = draw(&mut renderer, signal) {
            error!(error = %e, "drawing failed");
            monitor.request_exit();
            return Err(e);
        }
    }
}

fn draw<T: Renderer>(renderer: &mut T, signal: RenderSignal) -> Result<()> {
    match signal {
        RenderSignal::SnakeMoved(frames) | RenderSignal::SnakeAndFoodMoved(frames) => {
            draw_frames(renderer, &frames)?;
        },
        RenderSignal::SnakeDied { frames, head, score } => {
            draw_frames(renderer, &frames)?;
            renderer.draw(head, Glyph::Crash, Style::Snake)?;
            renderer.status(&format!("Game over! Score: {}  |  q to quit", score))?;
        },
        RenderSignal::Empty | RenderSignal::Exit => return Ok(()),
    }

    renderer.refresh()
}

fn draw_frames<T: Renderer>(renderer: &mut T, frames: &[Frame]) -> Result<()> {
    for frame in frames {
        if let Some(tail) = frame.tail {
            renderer.erase(tail)?;
        }

        renderer.draw(frame.head, Glyph::Segment, Style::Snake)?;

        if let Some(food) = frame.food {
            renderer.draw(food, Glyph::Food, Style::Food)?;
        }
    }

    if let Some(last) = frames.last() {
        renderer.status(&score_line(last.score))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SnakeError;
    use parking_lot::Mutex;
    use std::thread;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Op {
        Draw(Coords, Glyph, Style),
        Erase(Coords),
        Status(String),
        Refresh,
    }

    #[derive(Default, Clone)]
    struct Recorder(Arc<Mutex<Vec<Op>>>);

    impl Renderer for Recorder {
        fn draw(&mut self, at: Coords, glyph: Glyph, style: Style) -> Result<()> {
            self.0.lock().push(Op::Draw(at, glyph, style));
            Ok(())
        }

        fn erase(&mut self, at: Coords) -> Result<()> {
            self.0.lock().push(Op::Erase(at));
            Ok(())
        }

        fn status(&mut self, message: &str) -> Result<()> {
            self.0.lock().push(Op::Status(message.to_string()));
            Ok(())
        }

        fn refresh(&mut self) -> Result<()> {
            self.0.lock().push(Op::Refresh);
            Ok(())
        }
    }

    struct Broken;

    impl Renderer for Broken {
        fn draw(&mut self, _: Coords, _: Glyph, _: Style) -> Result<()> {
            Err(SnakeError::InvalidArgument("no screen".into()))
        }

        fn erase(&mut self, _: Coords) -> Result<()> {
            Ok(())
        }

        fn status(&mut self, _: &str) -> Result<()> {
            Ok(())
        }

        fn refresh(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn draws_frames_in_order_then_exits() {
        let monitor = Arc::new(Monitor::default());
        let recorder = Recorder::default();

        monitor.publish(RenderSignal::SnakeAndFoodMoved(vec![
            Frame { head: (5, 5), tail: Some((4, 5)), food: None, score: 0 },
            Frame { head: (6, 5), tail: None, food: Some((2, 3)), score: 1 },
        ]));

        let handle = {
            let monitor = Arc::clone(&monitor);
            let recorder = recorder.clone();
            thread::spawn(move || run(monitor, recorder))
        };

        // Give the renderer a chance to drain before asking it to stop. If it
        // hasn't, exit wins and nothing is drawn at all.
        while monitor.pending_render() {
            thread::yield_now();
        }
        monitor.request_exit();
        handle.join().unwrap().unwrap();

        let ops = recorder.0.lock().clone();
        assert_eq!(ops, vec![
            Op::Erase((4, 5)),
            Op::Draw((5, 5), Glyph::Segment, Style::Snake),
            Op::Draw((6, 5), Glyph::Segment, Style::Snake),
            Op::Draw((2, 3), Glyph::Food, Style::Food),
            Op::Status(score_line(1)),
            Op::Refresh,
        ]);
    }

    #[test]
    fn death_marks_the_crash() {
        let mut recorder = Recorder::default();
        draw(&mut recorder, RenderSignal::SnakeDied { frames: vec![], head: (8, 5), score: 4 }).unwrap();

        let ops = recorder.0.lock().clone();
        assert_eq!(ops[0], Op::Draw((8, 5), Glyph::Crash, Style::Snake));
        assert!(matches!(&ops[1], Op::Status(msg) if msg.contains("Game over") && msg.contains('4')));
        assert_eq!(ops[2], Op::Refresh);
    }

    #[test]
    fn exit_draws_nothing() {
        let monitor = Arc::new(Monitor::default());
        let recorder = Recorder::default();
        monitor.publish(RenderSignal::SnakeMoved(vec![Frame { head: (1, 1), tail: None, food: None, score: 0 }]));
        monitor.request_exit();

        run(Arc::clone(&monitor), recorder.clone()).unwrap();
        assert!(recorder.0.lock().is_empty());
    }

    #[test]
    fn drawing_failure_requests_exit() {
        let monitor = Arc::new(Monitor::default());
        monitor.publish(RenderSignal::SnakeMoved(vec![Frame { head: (1, 1), tail: None, food: None, score: 0 }]));

        assert!(run(Arc::clone(&monitor), Broken).is_err());
        assert!(monitor.exit_requested());
    }
}
