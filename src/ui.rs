//! Clipped drawing surface for the overlay.
//!
//! The collapsed tab follows the pointer right up to the screen edges and
//! the expanded menu is sized from animation progress, so rectangles
//! routinely reach past the buffer. `Buffer` panics on out-of-range writes;
//! every call on [`UiFrame`] is clipped to the frame area instead.

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        Self {
            area,
            buffer: frame.buffer_mut(),
        }
    }

    /// Draw into an offscreen buffer. Render tests use this.
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    fn visible(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersection(self.area);
        (!clipped.is_empty()).then_some(clipped)
    }

    pub fn render_widget<W: Widget>(&mut self, widget: W, area: Rect) {
        if let Some(area) = self.visible(area) {
            widget.render(area, self.buffer);
        }
    }

    /// Paint `area` with blanks in `style`.
    pub fn fill(&mut self, area: Rect, style: Style) {
        let Some(area) = self.visible(area) else {
            return;
        };
        for position in area.positions() {
            if let Some(cell) = self.buffer.cell_mut(position) {
                cell.set_symbol(" ");
                cell.set_style(style);
            }
        }
    }

    /// Write `text` starting at (`x`, `y`), cut off at the frame's right
    /// edge. Nothing is drawn when the start lies outside the frame.
    pub fn set_string(&mut self, x: u16, y: u16, text: &str, style: Style) {
        let Some(start) = self.visible(Rect::new(x, y, 1, 1)) else {
            return;
        };
        let room = usize::from(self.area.right().saturating_sub(start.x));
        let text: String = text.chars().take(room).collect();
        self.buffer.set_string(start.x, start.y, text, style);
    }

    /// Write `text` centred on the middle row of `rect`.
    pub fn set_centered(&mut self, rect: Rect, text: &str, style: Style) {
        if rect.height == 0 {
            return;
        }
        let width = text.chars().count() as u16;
        let x = rect.x + rect.width.saturating_sub(width) / 2;
        self.set_string(x, rect.y + rect.height / 2, text, style);
    }
}

/// Read back one row of a buffer as text. Handy in render tests.
pub fn buffer_row(buffer: &Buffer, y: u16) -> String {
    let area = buffer.area;
    (area.left()..area.right())
        .filter_map(|x| buffer.cell((x, y)).map(|c| c.symbol().to_string()))
        .collect()
}
