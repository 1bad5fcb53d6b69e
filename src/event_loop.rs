use std::io;
use std::time::{Duration, Instant};

use crossterm::event::Event;

use crate::drivers::InputDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// The UI thread's message pump.
///
/// Every hover menu operation runs from inside this loop, so nothing in the
/// menu needs to be `Send`. The handler is called with `None` once per frame
/// (advance animations, dispatch queued view events, draw) and with
/// `Some(event)` for each input event in between.
///
/// Frames are paced by a deadline rather than by input, so a stream of drag
/// reports neither starves nor speeds up the expand/collapse animation.
pub struct EventLoop<D> {
    driver: D,
    frame_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, frame_interval: Duration) -> Self {
        Self {
            driver,
            frame_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>) -> io::Result<ControlFlow>,
    {
        let mut next_frame = Instant::now();
        loop {
            let now = Instant::now();
            if now >= next_frame {
                if handler(&mut self.driver, None)? == ControlFlow::Quit {
                    return Ok(());
                }
                next_frame = now + self.frame_interval;
            }

            let timeout = next_frame.saturating_duration_since(Instant::now());
            if self.driver.poll(timeout)? {
                let event = self.driver.read()?;
                if handler(&mut self.driver, Some(event))? == ControlFlow::Quit {
                    return Ok(());
                }
            }
        }
    }
}
