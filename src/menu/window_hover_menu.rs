use std::rc::Rc;

use super::listeners::{ExitListeners, ListenerId, OnExitListener};
use super::memento::{self, DecodeError};
use super::view::{HoverMenuView, MenuEvent, MenuEvents};
use super::{HoverMenu, InteractionMode};
use crate::anchor::AnchorState;
use crate::window::{HostWindow, SurfaceError, SurfaceSize, WindowViewController};

/// [`HoverMenu`] that lives on an overlay surface of a [`HostWindow`].
///
/// While shown the menu is either in drag mode (collapsed tab, surface
/// untouchable so pointer input outside the tab reaches the applications
/// underneath) or in menu mode (expanded, surface touchable).
///
/// Mode changes are two-phase. A request (`expand_menu`, `collapse_menu`, or
/// the view starting an animation on its own) only records the pending
/// target. Touchability follows the view's completion events, which the
/// owner feeds in through [`WindowHoverMenu::dispatch_view_events`].
pub struct WindowHoverMenu<H: HostWindow, V: HoverMenuView> {
    windows: WindowViewController<H>,
    view: V,
    events: MenuEvents,
    showing: bool,
    in_drag_mode: bool,
    pending: Option<InteractionMode>,
    exit_listeners: ExitListeners,
    restore_error: Option<DecodeError>,
}

impl<H: HostWindow, V: HoverMenuView> WindowHoverMenu<H, V> {
    /// Wrap `view` for display on `host`.
    ///
    /// `saved_visual_state` is a string previously returned by
    /// [`HoverMenu::visual_state`]. When absent or unreadable the collapsed
    /// tab rests on the right edge, vertically centred.
    pub fn new(host: H, mut view: V, saved_visual_state: Option<&str>) -> Self {
        let mut restore_error = None;
        let anchor = match saved_visual_state.map(memento::decode) {
            Some(Ok(anchor)) => anchor,
            Some(Err(err)) => {
                tracing::warn!(error = %err, "ignoring unreadable saved visual state");
                restore_error = Some(err);
                AnchorState::default()
            }
            None => AnchorState::default(),
        };
        view.set_anchor_state(anchor);
        let events = MenuEvents::new();
        view.set_event_sink(events.clone());
        Self {
            windows: WindowViewController::new(host),
            view,
            events,
            showing: false,
            in_drag_mode: false,
            pending: None,
            exit_listeners: ExitListeners::new(),
            restore_error,
        }
    }

    pub fn is_showing(&self) -> bool {
        self.showing
    }

    /// Current mode, `None` while hidden.
    pub fn interaction_mode(&self) -> Option<InteractionMode> {
        if !self.showing {
            return None;
        }
        Some(if self.in_drag_mode {
            InteractionMode::Drag
        } else {
            InteractionMode::Menu
        })
    }

    /// Mode a requested or in-flight transition is heading to.
    pub fn pending_mode(&self) -> Option<InteractionMode> {
        self.pending
    }

    /// Whether the menu's surface intercepts pointer input, `None` while
    /// detached.
    pub fn is_touchable(&self) -> Option<bool> {
        self.windows.is_touchable(self.view.surface())
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn host(&self) -> &H {
        self.windows.host()
    }

    pub fn host_mut(&mut self) -> &mut H {
        self.windows.host_mut()
    }

    pub fn exit_listener_count(&self) -> usize {
        self.exit_listeners.len()
    }

    /// The most recent saved-state decode failure, if any, clearing it.
    pub fn take_restore_error(&mut self) -> Option<DecodeError> {
        self.restore_error.take()
    }

    /// Apply every event the view queued since the last call.
    ///
    /// Returns `true` when at least one event was handled.
    pub fn dispatch_view_events(&mut self) -> bool {
        let mut handled = false;
        while let Some(event) = self.events.pop() {
            handled = true;
            self.on_view_event(event);
        }
        handled
    }

    fn on_view_event(&mut self, event: MenuEvent) {
        if !self.showing {
            tracing::trace!(?event, "view event while hidden");
            return;
        }
        let surface = self.view.surface();
        match event {
            MenuEvent::Collapsing => {
                self.pending = Some(InteractionMode::Drag);
            }
            MenuEvent::Collapsed => {
                self.in_drag_mode = true;
                if self.pending == Some(InteractionMode::Drag) {
                    self.pending = None;
                }
                // Untouchable once collapsed so pointer input away from the
                // tab reaches the applications underneath.
                self.windows.make_untouchable(surface);
            }
            MenuEvent::Expanding => {
                self.in_drag_mode = false;
                self.pending = Some(InteractionMode::Menu);
            }
            MenuEvent::Expanded => {
                if self.pending == Some(InteractionMode::Menu) {
                    self.pending = None;
                }
                self.windows.make_touchable(surface);
            }
            MenuEvent::ExitRequested => {
                tracing::debug!("exit requested by view");
                self.hide();
            }
        }
    }

    fn request_collapse(&mut self) {
        self.pending = Some(InteractionMode::Drag);
        self.view.collapse();
    }
}

impl<H: HostWindow, V: HoverMenuView> HoverMenu for WindowHoverMenu<H, V> {
    type Adapter = V::Adapter;

    fn show(&mut self) -> Result<(), SurfaceError> {
        if self.showing {
            tracing::trace!("show ignored: already showing");
            return Ok(());
        }
        let surface = self.view.surface();
        self.windows.add_view(
            SurfaceSize::MatchParent,
            SurfaceSize::MatchParent,
            false,
            surface,
        )?;
        self.showing = true;
        self.events.clear();

        // Sync control state with whatever the view currently shows.
        if self.view.is_expanded() {
            self.in_drag_mode = false;
            self.pending = None;
            self.windows.make_touchable(surface);
        } else {
            self.in_drag_mode = false;
            self.request_collapse();
            self.dispatch_view_events();
        }
        tracing::debug!(mode = ?self.interaction_mode(), "hover menu shown");
        Ok(())
    }

    fn hide(&mut self) {
        if !self.showing {
            tracing::trace!("hide ignored: already hidden");
            return;
        }
        self.showing = false;
        self.pending = None;

        self.exit_listeners.notify_all(self.view.anchor_state());

        self.windows.remove_view(self.view.surface());
        self.events.clear();
        tracing::debug!("hover menu hidden");
    }

    fn expand_menu(&mut self) {
        if !self.showing || !self.in_drag_mode || self.pending == Some(InteractionMode::Menu) {
            tracing::trace!(mode = ?self.interaction_mode(), "expand ignored");
            return;
        }
        self.pending = Some(InteractionMode::Menu);
        self.view.expand();
    }

    fn collapse_menu(&mut self) {
        if !self.showing || self.in_drag_mode || self.pending == Some(InteractionMode::Drag) {
            tracing::trace!(mode = ?self.interaction_mode(), "collapse ignored");
            return;
        }
        self.request_collapse();
    }

    fn visual_state(&self) -> String {
        memento::encode(&self.view.anchor_state())
    }

    fn restore_visual_state(&mut self, saved_visual_state: &str) {
        match memento::decode(saved_visual_state) {
            Ok(anchor) => {
                self.view.set_anchor_state(anchor);
                self.restore_error = None;
            }
            Err(err) => {
                tracing::warn!(error = %err, "keeping current anchor: unreadable visual state");
                self.restore_error = Some(err);
            }
        }
    }

    fn add_on_exit_listener(&mut self, listener: Rc<dyn OnExitListener>) -> ListenerId {
        self.exit_listeners.add(listener)
    }

    fn remove_on_exit_listener(&mut self, id: ListenerId) -> bool {
        self.exit_listeners.remove(id)
    }

    fn set_adapter(&mut self, adapter: Option<Self::Adapter>) {
        self.view.set_adapter(adapter);
    }
}

impl<H, V> std::fmt::Debug for WindowHoverMenu<H, V>
where
    H: HostWindow,
    V: HoverMenuView,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowHoverMenu")
            .field("showing", &self.showing)
            .field("in_drag_mode", &self.in_drag_mode)
            .field("pending", &self.pending)
            .field("exit_listeners", &self.exit_listeners)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::AnchorSide;
    use crate::window::{LayoutParams, SurfaceId};
    use std::cell::RefCell;

    #[derive(Debug, Default)]
    struct FakeHost {
        adds: usize,
        removes: usize,
        touchable: Option<bool>,
    }

    impl HostWindow for FakeHost {
        fn add_surface(
            &mut self,
            _id: SurfaceId,
            params: LayoutParams,
        ) -> Result<(), SurfaceError> {
            self.adds += 1;
            self.touchable = Some(params.touchable);
            Ok(())
        }

        fn remove_surface(&mut self, _id: SurfaceId) {
            self.removes += 1;
            self.touchable = None;
        }

        fn set_touchable(&mut self, _id: SurfaceId, touchable: bool) {
            self.touchable = Some(touchable);
        }

        fn move_surface(&mut self, _id: SurfaceId, _x: i32, _y: i32) {}
    }

    /// View whose animations finish only when the test says so.
    #[derive(Debug, Default)]
    struct ManualView {
        expanded: bool,
        anchor: Option<AnchorState>,
        sink: Option<MenuEvents>,
        expand_calls: usize,
        collapse_calls: usize,
    }

    impl ManualView {
        fn emit(&self, event: MenuEvent) {
            if let Some(sink) = &self.sink {
                sink.push(event);
            }
        }
    }

    impl HoverMenuView for ManualView {
        type Adapter = ();

        fn surface(&self) -> SurfaceId {
            SurfaceId(1)
        }

        fn expand(&mut self) {
            self.expand_calls += 1;
            self.emit(MenuEvent::Expanding);
        }

        fn collapse(&mut self) {
            self.collapse_calls += 1;
            self.emit(MenuEvent::Collapsing);
        }

        fn is_expanded(&self) -> bool {
            self.expanded
        }

        fn anchor_state(&self) -> AnchorState {
            self.anchor.unwrap_or_default()
        }

        fn set_anchor_state(&mut self, anchor: AnchorState) {
            self.anchor = Some(anchor);
        }

        fn set_adapter(&mut self, _adapter: Option<()>) {}

        fn set_event_sink(&mut self, sink: MenuEvents) {
            self.sink = Some(sink);
        }
    }

    fn finish(menu: &mut WindowHoverMenu<FakeHost, ManualView>, event: MenuEvent) {
        menu.view().emit(event);
        menu.dispatch_view_events();
    }

    #[test]
    fn touchability_waits_for_collapse_completion() {
        let mut menu = WindowHoverMenu::new(FakeHost::default(), ManualView::default(), None);
        menu.show().unwrap();
        // collapse requested, not completed
        assert_eq!(menu.pending_mode(), Some(InteractionMode::Drag));
        assert_eq!(menu.host().touchable, Some(true));
        finish(&mut menu, MenuEvent::Collapsed);
        assert_eq!(menu.interaction_mode(), Some(InteractionMode::Drag));
        assert_eq!(menu.host().touchable, Some(false));
        assert_eq!(menu.pending_mode(), None);
    }

    #[test]
    fn expanding_does_not_toggle_touchability() {
        let mut menu = WindowHoverMenu::new(FakeHost::default(), ManualView::default(), None);
        menu.show().unwrap();
        finish(&mut menu, MenuEvent::Collapsed);

        menu.expand_menu();
        menu.dispatch_view_events();
        assert_eq!(menu.interaction_mode(), Some(InteractionMode::Menu));
        assert_eq!(menu.host().touchable, Some(false));

        // a second request while in flight is ignored
        menu.expand_menu();
        assert_eq!(menu.view().expand_calls, 1);

        finish(&mut menu, MenuEvent::Expanded);
        assert_eq!(menu.host().touchable, Some(true));
        assert_eq!(menu.pending_mode(), None);
    }

    #[test]
    fn collapse_in_drag_mode_is_ignored() {
        let mut menu = WindowHoverMenu::new(FakeHost::default(), ManualView::default(), None);
        menu.show().unwrap();
        finish(&mut menu, MenuEvent::Collapsed);
        let before = menu.view().collapse_calls;
        menu.collapse_menu();
        assert_eq!(menu.view().collapse_calls, before);
        assert_eq!(menu.interaction_mode(), Some(InteractionMode::Drag));
    }

    #[test]
    fn requests_while_hidden_are_ignored() {
        let mut menu = WindowHoverMenu::new(FakeHost::default(), ManualView::default(), None);
        menu.expand_menu();
        menu.collapse_menu();
        assert_eq!(menu.view().expand_calls, 0);
        assert_eq!(menu.view().collapse_calls, 0);
        assert_eq!(menu.interaction_mode(), None);
    }

    #[test]
    fn show_with_expanded_view_enters_menu_mode() {
        let view = ManualView {
            expanded: true,
            ..Default::default()
        };
        let mut menu = WindowHoverMenu::new(FakeHost::default(), view, None);
        menu.show().unwrap();
        assert_eq!(menu.interaction_mode(), Some(InteractionMode::Menu));
        assert_eq!(menu.is_touchable(), Some(true));
        assert_eq!(menu.view().collapse_calls, 0);
    }

    #[test]
    fn exit_request_notifies_then_detaches() {
        let mut menu = WindowHoverMenu::new(FakeHost::default(), ManualView::default(), None);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        menu.add_on_exit_listener(Rc::new(move |anchor: AnchorState| {
            log.borrow_mut().push(anchor.side)
        }));
        menu.show().unwrap();
        finish(&mut menu, MenuEvent::ExitRequested);
        assert!(!menu.is_showing());
        assert_eq!(*seen.borrow(), vec![AnchorSide::Right]);
        assert_eq!(menu.host().removes, 1);
        // a late completion event after hide is dropped
        finish(&mut menu, MenuEvent::Collapsed);
        assert_eq!(menu.interaction_mode(), None);
    }

    #[test]
    fn bad_restore_keeps_anchor_and_reports() {
        let saved = r#"{"anchor_side":0,"normalized_position_y":0.25}"#;
        let mut menu =
            WindowHoverMenu::new(FakeHost::default(), ManualView::default(), Some(saved));
        assert!(menu.take_restore_error().is_none());
        menu.restore_visual_state("{broken");
        assert_eq!(
            menu.view().anchor_state(),
            AnchorState::new(AnchorSide::Left, 0.25)
        );
        assert!(matches!(
            menu.take_restore_error(),
            Some(DecodeError::Malformed(_))
        ));
        assert!(menu.take_restore_error().is_none());
    }

    #[test]
    fn saved_state_restored_at_construction() {
        let saved = r#"{"anchor_side":0,"normalized_position_y":0.75}"#;
        let menu = WindowHoverMenu::new(FakeHost::default(), ManualView::default(), Some(saved));
        assert_eq!(
            menu.view().anchor_state(),
            AnchorState::new(AnchorSide::Left, 0.75)
        );
        assert_eq!(menu.visual_state(), saved);
    }

    #[test]
    fn show_hide_show_attaches_twice_and_notifies_once() {
        let mut menu = WindowHoverMenu::new(FakeHost::default(), ManualView::default(), None);
        let calls = Rc::new(RefCell::new(0));
        let counter = calls.clone();
        menu.add_on_exit_listener(Rc::new(move |_: AnchorState| *counter.borrow_mut() += 1));

        menu.show().unwrap();
        menu.hide();
        menu.view_mut().expanded = true;
        menu.show().unwrap();

        assert_eq!(menu.host().adds, 2);
        assert_eq!(menu.host().removes, 1);
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(menu.interaction_mode(), Some(InteractionMode::Menu));
    }

    #[test]
    fn listener_registration_is_deduplicated_and_removable() {
        let mut menu = WindowHoverMenu::new(FakeHost::default(), ManualView::default(), None);
        let hits = Rc::new(RefCell::new(0));
        let counter = hits.clone();
        let listener: Rc<dyn OnExitListener> =
            Rc::new(move |_: AnchorState| *counter.borrow_mut() += 1);

        let id = menu.add_on_exit_listener(listener.clone());
        assert_eq!(menu.add_on_exit_listener(listener), id);
        assert_eq!(menu.exit_listener_count(), 1);

        assert!(menu.remove_on_exit_listener(id));
        assert!(!menu.remove_on_exit_listener(id));
        assert_eq!(menu.exit_listener_count(), 0);

        menu.show().unwrap();
        menu.hide();
        assert_eq!(*hits.borrow(), 0);
    }
}
