use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::{Event, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use term_hover::anchor::{AnchorSide, AnchorState};
use proptest::prelude::*;
use term_hover::components::{
    Component, MENU_SURFACE, MenuTab, StaticMenuAdapter, TerminalHoverMenuView,
};
use term_hover::menu::{DecodeError, HoverMenu, HoverMenuView, InteractionMode, WindowHoverMenu};
use term_hover::window::{SurfaceError, TerminalWindowHost};

type Menu = WindowHoverMenu<TerminalWindowHost, TerminalHoverMenuView>;

const SCREEN: Rect = Rect {
    x: 0,
    y: 0,
    width: 40,
    height: 20,
};

fn menu(frames: u16, saved: Option<&str>) -> Menu {
    let mut view = TerminalHoverMenuView::new(1, frames);
    view.resize(SCREEN);
    let mut menu = WindowHoverMenu::new(TerminalWindowHost::new(SCREEN), view, saved);
    menu.set_adapter(Some(Box::new(StaticMenuAdapter::new(vec![
        MenuTab::new("Intro", "hello"),
        MenuTab::new("Log", "-"),
    ]))));
    menu
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

/// Deliver a pointer event the way the demo does: to the menu only when its
/// surface takes it, otherwise it passes through. Returns whether the menu
/// took it.
fn route(menu: &mut Menu, event: Event) -> bool {
    let Event::Mouse(m) = event else {
        return false;
    };
    let taken = menu.is_showing()
        && menu
            .host()
            .accepts_pointer(MENU_SURFACE, m.column, m.row, menu.view().hit_region());
    if taken {
        menu.view_mut().handle_event(&event);
    }
    menu.dispatch_view_events();
    taken
}

fn run_animation(menu: &mut Menu) {
    while menu.view_mut().tick() {}
    menu.dispatch_view_events();
}

#[test]
fn fresh_show_rests_collapsed_on_right_edge() {
    let mut menu = menu(6, None);
    menu.show().unwrap();
    assert_eq!(menu.interaction_mode(), Some(InteractionMode::Drag));
    assert_eq!(menu.is_touchable(), Some(false));
    assert!(menu.host().is_attached(MENU_SURFACE));
    assert_eq!(
        menu.visual_state(),
        r#"{"anchor_side":1,"normalized_position_y":0.5}"#
    );
    let tab = menu.view().collapsed_tab_rect();
    assert_eq!(tab.x + tab.width, SCREEN.width);
}

#[test]
fn saved_state_places_tab_on_left() {
    let mut menu = menu(0, Some(r#"{"anchor_side":0,"normalized_position_y":0.0}"#));
    menu.show().unwrap();
    assert_eq!(
        menu.view().anchor_state(),
        AnchorState::new(AnchorSide::Left, 0.0)
    );
    let tab = menu.view().collapsed_tab_rect();
    assert_eq!((tab.x, tab.y), (0, 0));
    assert!(menu.take_restore_error().is_none());
}

#[test]
fn unreadable_saved_state_falls_back_to_default() {
    let mut menu = menu(0, Some("{not json"));
    assert_eq!(menu.view().anchor_state(), AnchorState::default());
    assert!(matches!(
        menu.take_restore_error(),
        Some(DecodeError::Malformed(_))
    ));
    assert!(menu.take_restore_error().is_none());
}

#[test]
fn touchability_follows_animation_completion() {
    let mut menu = menu(3, None);
    menu.show().unwrap();

    menu.expand_menu();
    assert_eq!(menu.pending_mode(), Some(InteractionMode::Menu));
    menu.dispatch_view_events();
    assert_eq!(menu.is_touchable(), Some(false));
    // a second request mid-transition is ignored
    menu.expand_menu();

    run_animation(&mut menu);
    assert_eq!(menu.interaction_mode(), Some(InteractionMode::Menu));
    assert_eq!(menu.pending_mode(), None);
    assert_eq!(menu.is_touchable(), Some(true));

    menu.collapse_menu();
    menu.dispatch_view_events();
    assert_eq!(menu.pending_mode(), Some(InteractionMode::Drag));
    assert_eq!(menu.is_touchable(), Some(true));
    run_animation(&mut menu);
    assert_eq!(menu.interaction_mode(), Some(InteractionMode::Drag));
    assert_eq!(menu.is_touchable(), Some(false));
}

#[test]
fn pointer_passes_through_outside_collapsed_tab() {
    let mut menu = menu(0, None);
    menu.show().unwrap();
    let down = MouseEventKind::Down(MouseButton::Left);
    assert!(!route(&mut menu, mouse(down, 2, 2)));

    // tap the tab to expand, after which the whole surface takes input
    let tab = menu.view().collapsed_tab_rect();
    let (cx, cy) = (tab.x + 1, tab.y + 1);
    assert!(route(&mut menu, mouse(down, cx, cy)));
    assert!(route(
        &mut menu,
        mouse(MouseEventKind::Up(MouseButton::Left), cx, cy)
    ));
    assert_eq!(menu.interaction_mode(), Some(InteractionMode::Menu));
    assert!(route(&mut menu, mouse(down, 2, 2)));
}

#[test]
fn show_and_hide_are_idempotent() {
    let mut menu = menu(0, None);
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    menu.add_on_exit_listener(Rc::new(move |_: AnchorState| *counter.borrow_mut() += 1));

    menu.show().unwrap();
    menu.show().unwrap();
    assert_eq!(menu.host().stacking_order(), vec![MENU_SURFACE]);

    menu.hide();
    menu.hide();
    assert_eq!(*calls.borrow(), 1);
    assert!(!menu.host().is_attached(MENU_SURFACE));
    assert_eq!(menu.interaction_mode(), None);
}

#[test]
fn dropping_tab_on_exit_target_hides_and_notifies_in_order() {
    let mut menu = menu(0, None);
    let seen = Rc::new(RefCell::new(Vec::new()));
    for name in ["first", "second"] {
        let seen = Rc::clone(&seen);
        menu.add_on_exit_listener(Rc::new(move |anchor: AnchorState| {
            seen.borrow_mut().push((name, anchor));
        }));
    }
    menu.show().unwrap();

    let tab = menu.view().collapsed_tab_rect();
    let zone = menu.view().exit_zone_rect();
    let (zx, zy) = (zone.x + zone.width / 2, zone.y + 1);
    let left = MouseButton::Left;
    assert!(route(&mut menu, mouse(MouseEventKind::Down(left), tab.x + 1, tab.y + 1)));
    assert!(route(&mut menu, mouse(MouseEventKind::Drag(left), zx, zy)));
    assert!(menu.view().is_dragging());
    assert!(route(&mut menu, mouse(MouseEventKind::Up(left), zx, zy)));

    assert!(!menu.is_showing());
    assert!(!menu.host().is_attached(MENU_SURFACE));
    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], ("first", AnchorState::default()));
    assert_eq!(seen[1].0, "second");
}

#[test]
fn dragged_tab_snaps_and_state_survives_restart() {
    let mut menu = menu(0, None);
    menu.show().unwrap();
    let tab = menu.view().collapsed_tab_rect();
    let left = MouseButton::Left;
    route(&mut menu, mouse(MouseEventKind::Down(left), tab.x + 1, tab.y + 1));
    route(&mut menu, mouse(MouseEventKind::Drag(left), 6, 3));
    route(&mut menu, mouse(MouseEventKind::Up(left), 6, 3));
    assert!(menu.is_showing());

    let state = menu.visual_state();
    let restored = self::menu(0, Some(&state));
    assert_eq!(restored.view().anchor_state().side, AnchorSide::Left);
    assert_eq!(
        restored.view().anchor_state(),
        menu.view().anchor_state()
    );
}

#[test]
fn reshow_after_hide_starts_collapsed() {
    let mut menu = menu(0, None);
    menu.show().unwrap();
    menu.expand_menu();
    menu.dispatch_view_events();
    assert_eq!(menu.interaction_mode(), Some(InteractionMode::Menu));

    menu.hide();
    menu.show().unwrap();
    // the view is still expanded, so the menu comes back in menu mode
    assert_eq!(menu.interaction_mode(), Some(InteractionMode::Menu));
    assert_eq!(menu.is_touchable(), Some(true));

    menu.collapse_menu();
    menu.dispatch_view_events();
    menu.hide();
    menu.show().unwrap();
    assert_eq!(menu.interaction_mode(), Some(InteractionMode::Drag));
    assert_eq!(menu.is_touchable(), Some(false));
}

#[test]
fn denied_overlay_keeps_menu_hidden() {
    let mut menu = menu(0, None);
    menu.host_mut().set_deny_overlays(true);
    assert_eq!(
        menu.show(),
        Err(SurfaceError::PermissionDenied(MENU_SURFACE))
    );
    assert!(!menu.is_showing());
    assert_eq!(menu.is_touchable(), None);

    menu.host_mut().set_deny_overlays(false);
    menu.show().unwrap();
    assert!(menu.is_showing());
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Show,
    Hide,
    Expand,
    Collapse,
    Tick,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => Just(Op::Show),
        1 => Just(Op::Hide),
        1 => Just(Op::Expand),
        1 => Just(Op::Collapse),
        3 => Just(Op::Tick),
    ]
}

proptest! {
    #[test]
    fn settled_view_always_matches_mode_and_touchability(
        frames in 0u16..4,
        ops in proptest::collection::vec(op(), 1..60),
    ) {
        let mut menu = menu(frames, None);
        for op in ops {
            match op {
                Op::Show => menu.show().unwrap(),
                Op::Hide => menu.hide(),
                Op::Expand => menu.expand_menu(),
                Op::Collapse => menu.collapse_menu(),
                Op::Tick => {
                    menu.view_mut().tick();
                }
            }
            menu.dispatch_view_events();

            if !menu.is_showing() {
                prop_assert_eq!(menu.interaction_mode(), None);
                prop_assert_eq!(menu.is_touchable(), None);
            } else if menu.view().is_collapsed() {
                prop_assert_eq!(menu.interaction_mode(), Some(InteractionMode::Drag));
                prop_assert_eq!(menu.is_touchable(), Some(false));
            } else if menu.view().is_expanded() {
                prop_assert_eq!(menu.interaction_mode(), Some(InteractionMode::Menu));
                prop_assert_eq!(menu.is_touchable(), Some(true));
            }
        }
    }
}
