use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::anchor::AnchorState;
use crate::window::SurfaceId;

/// Transition and exit notifications reported by a content view.
///
/// `Expanding`/`Collapsing` are emitted when an animation starts,
/// `Expanded`/`Collapsed` once it has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    Collapsing,
    Collapsed,
    Expanding,
    Expanded,
    ExitRequested,
}

/// Shared FIFO the view pushes [`MenuEvent`]s into and the menu drains.
///
/// Everything runs on the UI thread, so a plain `Rc<RefCell<..>>` is enough.
#[derive(Debug, Clone, Default)]
pub struct MenuEvents {
    queue: Rc<RefCell<VecDeque<MenuEvent>>>,
}

impl MenuEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: MenuEvent) {
        self.queue.borrow_mut().push_back(event);
    }

    pub fn pop(&self) -> Option<MenuEvent> {
        self.queue.borrow_mut().pop_front()
    }

    pub fn clear(&self) {
        self.queue.borrow_mut().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }
}

/// Visual presentation of a hover menu: expand/collapse animation, tab
/// layout, and the collapsed tab's anchor.
pub trait HoverMenuView {
    /// Content provider for the menu's tabs.
    type Adapter;

    /// Surface this view is drawn on.
    fn surface(&self) -> SurfaceId;

    /// Start animating to the expanded state.
    fn expand(&mut self);

    /// Start animating to the collapsed state.
    fn collapse(&mut self);

    fn is_expanded(&self) -> bool;

    fn anchor_state(&self) -> AnchorState;

    fn set_anchor_state(&mut self, anchor: AnchorState);

    fn set_adapter(&mut self, adapter: Option<Self::Adapter>);

    /// Register where transition and exit-request events go.
    fn set_event_sink(&mut self, sink: MenuEvents);
}
