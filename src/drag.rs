//! Pointer drag tracking for the collapsed tab.
//!
//! Terminal mouse reports are cell based. A press arms the tracker; the drag
//! only starts once the pointer has travelled past the touch slop, otherwise
//! the release is reported as a tap.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::window::rect_contains;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEvent {
    Press { column: u16, row: u16 },
    DragStart { column: u16, row: u16 },
    DragTo { column: u16, row: u16 },
    DragEnd { column: u16, row: u16 },
    Tap { column: u16, row: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragState {
    Idle,
    Pressed { origin_col: u16, origin_row: u16 },
    Dragging { last_col: u16, last_row: u16 },
}

#[derive(Debug, Clone)]
pub struct InWindowDragger {
    touch_slop: u16,
    drag_area: Option<Rect>,
    state: DragState,
}

impl InWindowDragger {
    pub fn new(touch_slop: u16) -> Self {
        Self {
            touch_slop,
            drag_area: None,
            state: DragState::Idle,
        }
    }

    /// Area that accepts presses. `None` disables the dragger.
    pub fn set_drag_area(&mut self, area: Option<Rect>) {
        self.drag_area = area;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn is_engaged(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    pub fn handle_mouse(&mut self, mouse: &MouseEvent) -> Option<DragEvent> {
        let (column, row) = (mouse.column, mouse.row);
        match (mouse.kind, self.state) {
            (MouseEventKind::Down(MouseButton::Left), _) => {
                let area = self.drag_area?;
                if !rect_contains(area, column, row) {
                    self.state = DragState::Idle;
                    return None;
                }
                self.state = DragState::Pressed {
                    origin_col: column,
                    origin_row: row,
                };
                Some(DragEvent::Press { column, row })
            }
            (
                MouseEventKind::Drag(MouseButton::Left),
                DragState::Pressed {
                    origin_col,
                    origin_row,
                },
            ) => {
                if !crossed_slop(origin_col, origin_row, column, row, self.touch_slop) {
                    return None;
                }
                self.state = DragState::Dragging {
                    last_col: column,
                    last_row: row,
                };
                Some(DragEvent::DragStart { column, row })
            }
            (
                MouseEventKind::Drag(MouseButton::Left),
                DragState::Dragging { last_col, last_row },
            ) => {
                if (last_col, last_row) == (column, row) {
                    return None;
                }
                self.state = DragState::Dragging {
                    last_col: column,
                    last_row: row,
                };
                Some(DragEvent::DragTo { column, row })
            }
            (MouseEventKind::Up(MouseButton::Left), DragState::Pressed { .. }) => {
                self.state = DragState::Idle;
                Some(DragEvent::Tap { column, row })
            }
            (MouseEventKind::Up(MouseButton::Left), DragState::Dragging { .. }) => {
                self.state = DragState::Idle;
                Some(DragEvent::DragEnd { column, row })
            }
            _ => None,
        }
    }
}

fn crossed_slop(origin_col: u16, origin_row: u16, column: u16, row: u16, slop: u16) -> bool {
    let dx = i64::from(column) - i64::from(origin_col);
    let dy = i64::from(row) - i64::from(origin_row);
    if dx == 0 && dy == 0 {
        return false;
    }
    let slop = i64::from(slop);
    dx * dx + dy * dy >= slop * slop
}
