use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    MouseButton, MouseEventKind,
};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use super::InputDriver;
use crate::ui::UiFrame;

/// Upper bound on events pulled ahead while looking for newer drag reports.
const MAX_READ_AHEAD: usize = 64;

/// crossterm-backed input.
///
/// Key releases are dropped and Shift+Tab arrives as BackTab. A run of
/// left-button drag reports is collapsed to its newest entry so a dragged
/// tab jumps straight to the pointer instead of replaying every cell.
pub struct ConsoleInputDriver {
    read_ahead: VecDeque<Event>,
    mouse_captured: bool,
}

impl Default for ConsoleInputDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleInputDriver {
    pub fn new() -> Self {
        Self {
            read_ahead: VecDeque::new(),
            mouse_captured: false,
        }
    }

    pub fn mouse_captured(&self) -> bool {
        self.mouse_captured
    }

    fn next_normalized(&mut self) -> io::Result<Event> {
        loop {
            if let Some(event) = normalize(crossterm::event::read()?) {
                return Ok(event);
            }
        }
    }

    fn fill_read_ahead(&mut self) -> io::Result<()> {
        while self.read_ahead.len() < MAX_READ_AHEAD && crossterm::event::poll(Duration::ZERO)? {
            if let Some(event) = normalize(crossterm::event::read()?) {
                self.read_ahead.push_back(event);
            }
        }
        Ok(())
    }
}

/// Fold Shift+Tab into BackTab and drop key releases so bindings only see
/// presses on every platform.
fn normalize(evt: Event) -> Option<Event> {
    match evt {
        Event::Key(mut key) => {
            if key.kind == KeyEventKind::Release {
                return None;
            }
            if key.code == KeyCode::Tab && key.modifiers.contains(KeyModifiers::SHIFT) {
                key.code = KeyCode::BackTab;
                key.modifiers.remove(KeyModifiers::SHIFT);
            }
            Some(Event::Key(key))
        }
        other => Some(other),
    }
}

fn is_left_drag(event: &Event) -> bool {
    matches!(
        event,
        Event::Mouse(m) if m.kind == MouseEventKind::Drag(MouseButton::Left)
    )
}

/// Replace `first` with the newest left drag directly following it in
/// `queue`. Stops at the first event of any other kind.
fn coalesce_drags(queue: &mut VecDeque<Event>, first: Event) -> Event {
    let mut latest = first;
    while queue.front().is_some_and(is_left_drag) {
        if let Some(next) = queue.pop_front() {
            latest = next;
        }
    }
    latest
}

impl InputDriver for ConsoleInputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        if !self.read_ahead.is_empty() {
            return Ok(true);
        }
        crossterm::event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        let event = match self.read_ahead.pop_front() {
            Some(event) => event,
            None => self.next_normalized()?,
        };
        if !is_left_drag(&event) {
            return Ok(event);
        }
        self.fill_read_ahead()?;
        Ok(coalesce_drags(&mut self.read_ahead, event))
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        if enabled == self.mouse_captured {
            return Ok(());
        }
        if enabled {
            execute!(io::stdout(), EnableMouseCapture)?;
        } else {
            execute!(io::stdout(), DisableMouseCapture)?;
        }
        self.mouse_captured = enabled;
        Ok(())
    }
}

/// Alternate-screen ratatui terminal the overlay is drawn into. Leaving is
/// idempotent and also happens on drop, so a panic or early return never
/// strands the shell in raw mode.
pub struct ConsoleOutputDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    entered: bool,
}

impl ConsoleOutputDriver {
    pub fn new() -> io::Result<Self> {
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        Ok(Self {
            terminal,
            entered: false,
        })
    }

    pub fn enter(&mut self) -> io::Result<()> {
        if self.entered {
            return Ok(());
        }
        execute!(self.terminal.backend_mut(), EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        self.entered = true;
        Ok(())
    }

    pub fn exit(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        terminal::disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        self.terminal.show_cursor()
    }

    /// Current screen as the area overlay surfaces are laid out in.
    pub fn size(&self) -> io::Result<Rect> {
        let size = self.terminal.size()?;
        Ok(Rect::new(0, 0, size.width, size.height))
    }

    pub fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(UiFrame<'_>),
    {
        self.terminal
            .draw(|frame| f(UiFrame::new(frame)))
            .map(|_| ())
            .map_err(|err| io::Error::other(err.to_string()))
    }
}

impl Drop for ConsoleOutputDriver {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}
