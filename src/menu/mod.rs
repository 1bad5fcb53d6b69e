//! The hover menu: a collapsed, draggable tab that expands into a tabbed
//! content menu.

mod listeners;
pub mod memento;
mod view;
mod window_hover_menu;

use std::rc::Rc;

use crate::window::SurfaceError;

pub use listeners::{ExitListeners, ListenerId, OnExitListener};
pub use memento::{DecodeError, VisualStateMemento};
pub use view::{HoverMenuView, MenuEvent, MenuEvents};
pub use window_hover_menu::WindowHoverMenu;

/// Mutually exclusive interaction modes of a shown menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionMode {
    /// Collapsed to a single tab that can be dragged around the screen.
    Drag,
    /// Expanded, showing every tab and the selected tab's content.
    Menu,
}

/// Operations a host application drives a hover menu through.
pub trait HoverMenu {
    type Adapter;

    /// Attach and display the menu. Does nothing if already shown.
    fn show(&mut self) -> Result<(), SurfaceError>;

    /// Notify exit listeners and detach the menu. The inverse of `show`.
    fn hide(&mut self);

    /// Expand from the collapsed tab to the full menu.
    fn expand_menu(&mut self);

    /// Collapse to the draggable tab. The inverse of `expand_menu`.
    fn collapse_menu(&mut self);

    /// Serialized anchor, suitable for [`HoverMenu::restore_visual_state`].
    fn visual_state(&self) -> String;

    fn restore_visual_state(&mut self, saved_visual_state: &str);

    fn add_on_exit_listener(&mut self, listener: Rc<dyn OnExitListener>) -> ListenerId;

    fn remove_on_exit_listener(&mut self, id: ListenerId) -> bool;

    fn set_adapter(&mut self, adapter: Option<Self::Adapter>);
}
