//! Drawable pieces of the overlay.

use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::ui::UiFrame;

pub mod adapter;
pub mod hover_menu_view;

pub use adapter::{MenuAdapter, MenuTab, StaticMenuAdapter};
pub use hover_menu_view::{MENU_SURFACE, TerminalHoverMenuView};

/// Something that draws into a [`UiFrame`] and may consume input.
pub trait Component {
    /// Called when the available area changes.
    fn resize(&mut self, _area: Rect) {}

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect);

    /// Returns `true` when the event was consumed.
    fn handle_event(&mut self, _event: &Event) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    struct DummyComp;
    impl Component for DummyComp {
        fn render(&mut self, _frame: &mut UiFrame<'_>, _area: Rect) {}
    }

    #[test]
    fn default_handle_event_returns_false() {
        let mut d = DummyComp;
        assert!(!d.handle_event(&Event::Key(KeyEvent::new(
            KeyCode::Char('a'),
            KeyModifiers::NONE
        ))));
    }
}
