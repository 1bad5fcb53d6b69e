//! Terminal rendition of the hover menu.
//!
//! Collapsed, the menu is a small tab docked on the left or right edge. The
//! tab can be dragged; on release it snaps to the nearer edge and the new
//! resting place becomes the anchor. Dropping it on the exit target at the
//! bottom centre asks the menu to go away. Tapping it expands the menu into
//! a tab strip plus a content area.
//!
//! Expanding and collapsing are animated over a fixed number of `tick()`
//! frames. Start and completion of each animation are reported through the
//! registered [`MenuEvents`] sink.

use crossterm::event::{Event, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Paragraph, Wrap};

use super::Component;
use super::adapter::MenuAdapter;
use crate::anchor::{AnchorSide, AnchorState};
use crate::constants::{EXIT_ZONE_HEIGHT, EXIT_ZONE_WIDTH, TAB_HEIGHT, TAB_WIDTH};
use crate::drag::{DragEvent, InWindowDragger};
use crate::keybindings::{Action, KeyBindings, KeyContext};
use crate::menu::{HoverMenuView, MenuEvent, MenuEvents};
use crate::theme;
use crate::ui::UiFrame;
use crate::window::{SurfaceId, rect_contains};

/// Surface the terminal hover menu is attached as.
pub const MENU_SURFACE: SurfaceId = SurfaceId(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Collapsed,
    Expanding { remaining: u16 },
    Expanded,
    Collapsing { remaining: u16 },
}

pub struct TerminalHoverMenuView {
    surface: SurfaceId,
    area: Rect,
    anchor: AnchorState,
    phase: Phase,
    animation_frames: u16,
    adapter: Option<Box<dyn MenuAdapter>>,
    selected_tab: usize,
    dragger: InWindowDragger,
    grab_offset: (u16, u16),
    // top-left of the tab while it follows the pointer
    drag_tab: Option<(u16, u16)>,
    drag_pointer: Option<(u16, u16)>,
    keys: KeyBindings,
    sink: Option<MenuEvents>,
}

impl TerminalHoverMenuView {
    pub fn new(touch_slop: u16, animation_frames: u16) -> Self {
        Self {
            surface: MENU_SURFACE,
            area: Rect::default(),
            anchor: AnchorState::default(),
            phase: Phase::Collapsed,
            animation_frames,
            adapter: None,
            selected_tab: 0,
            dragger: InWindowDragger::new(touch_slop),
            grab_offset: (0, 0),
            drag_tab: None,
            drag_pointer: None,
            keys: KeyBindings::default(),
            sink: None,
        }
    }

    /// Advance a running animation by one frame. Returns `true` while
    /// animating.
    pub fn tick(&mut self) -> bool {
        match self.phase {
            Phase::Expanding { remaining } => {
                if remaining <= 1 {
                    self.phase = Phase::Expanded;
                    self.emit(MenuEvent::Expanded);
                } else {
                    self.phase = Phase::Expanding {
                        remaining: remaining - 1,
                    };
                }
                true
            }
            Phase::Collapsing { remaining } => {
                if remaining <= 1 {
                    self.phase = Phase::Collapsed;
                    self.emit(MenuEvent::Collapsed);
                } else {
                    self.phase = Phase::Collapsing {
                        remaining: remaining - 1,
                    };
                }
                true
            }
            Phase::Collapsed | Phase::Expanded => false,
        }
    }

    pub fn is_animating(&self) -> bool {
        matches!(
            self.phase,
            Phase::Expanding { .. } | Phase::Collapsing { .. }
        )
    }

    pub fn is_collapsed(&self) -> bool {
        self.phase == Phase::Collapsed
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_tab.is_some()
    }

    /// How far the menu is expanded, `0.0` collapsed to `1.0` expanded.
    pub fn progress(&self) -> f32 {
        let frames = f32::from(self.animation_frames.max(1));
        match self.phase {
            Phase::Collapsed => 0.0,
            Phase::Expanded => 1.0,
            Phase::Expanding { remaining } => {
                f32::from(self.animation_frames.saturating_sub(remaining)) / frames
            }
            Phase::Collapsing { remaining } => f32::from(remaining) / frames,
        }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn selected_tab(&self) -> usize {
        self.selected_tab
    }

    pub fn tab_count(&self) -> usize {
        self.adapter.as_ref().map_or(0, |a| a.tab_count())
    }

    pub fn select_tab(&mut self, index: usize) {
        if index < self.tab_count() {
            self.selected_tab = index;
        }
    }

    pub fn next_tab(&mut self) {
        let count = self.tab_count();
        if count > 0 {
            self.selected_tab = (self.selected_tab + 1) % count;
        }
    }

    pub fn prev_tab(&mut self) {
        let count = self.tab_count();
        if count > 0 {
            self.selected_tab = (self.selected_tab + count - 1) % count;
        }
    }

    /// Where the collapsed tab is drawn: following the pointer mid-drag,
    /// otherwise at the anchor.
    pub fn collapsed_tab_rect(&self) -> Rect {
        let width = TAB_WIDTH.min(self.area.width);
        let height = TAB_HEIGHT.min(self.area.height);
        let (x, y) = self.drag_tab.unwrap_or_else(|| {
            let x = match self.anchor.side {
                AnchorSide::Left => self.area.x,
                AnchorSide::Right => self.area.x + self.area.width.saturating_sub(width),
            };
            let y = self.anchor.resolve_row(self.area.y, self.area.height, height);
            (x, y)
        });
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn exit_zone_rect(&self) -> Rect {
        let width = EXIT_ZONE_WIDTH.min(self.area.width);
        let height = EXIT_ZONE_HEIGHT.min(self.area.height);
        Rect {
            x: self.area.x + (self.area.width - width) / 2,
            y: self.area.y + (self.area.height - height),
            width,
            height,
        }
    }

    /// Full extent of the expanded menu.
    pub fn menu_rect(&self) -> Rect {
        if self.area.width < 4 || self.area.height < 4 {
            return self.area;
        }
        Rect {
            x: self.area.x + 1,
            y: self.area.y + 1,
            width: self.area.width - 2,
            height: self.area.height - 2,
        }
    }

    /// Hit boxes of the tab strip entries, in tab order. Tabs that do not
    /// fit are left out.
    pub fn tab_strip_rects(&self) -> Vec<Rect> {
        let Some(adapter) = self.adapter.as_ref() else {
            return Vec::new();
        };
        let menu = self.menu_rect();
        let right = menu.x.saturating_add(menu.width);
        let mut x = menu.x.saturating_add(1);
        let mut rects = Vec::with_capacity(adapter.tab_count());
        for index in 0..adapter.tab_count() {
            let title_width = adapter.tab_title(index).chars().count();
            let width = u16::try_from(title_width)
                .unwrap_or(u16::MAX)
                .saturating_add(2);
            if x.saturating_add(width) > right {
                break;
            }
            rects.push(Rect {
                x,
                y: menu.y,
                width,
                height: 1,
            });
            x = x.saturating_add(width.saturating_add(1));
        }
        rects
    }

    /// Region that takes pointer input while the surface is untouchable.
    pub fn hit_region(&self) -> Option<Rect> {
        if self.dragger.is_engaged() {
            return Some(self.area);
        }
        (self.phase == Phase::Collapsed).then(|| self.collapsed_tab_rect())
    }

    fn emit(&self, event: MenuEvent) {
        if let Some(sink) = &self.sink {
            sink.push(event);
        }
    }

    fn cancel_drag(&mut self) {
        self.dragger.cancel();
        self.drag_tab = None;
        self.drag_pointer = None;
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) -> bool {
        match self.phase {
            Phase::Collapsed => self.handle_collapsed_mouse(mouse),
            Phase::Expanded => self.handle_expanded_mouse(mouse),
            Phase::Expanding { .. } | Phase::Collapsing { .. } => {
                rect_contains(self.area, mouse.column, mouse.row)
            }
        }
    }

    fn handle_collapsed_mouse(&mut self, mouse: &MouseEvent) -> bool {
        if !self.dragger.is_engaged() {
            self.dragger.set_drag_area(Some(self.collapsed_tab_rect()));
        }
        let Some(event) = self.dragger.handle_mouse(mouse) else {
            return false;
        };
        match event {
            DragEvent::Press { column, row } => {
                let tab = self.collapsed_tab_rect();
                self.grab_offset = (column.saturating_sub(tab.x), row.saturating_sub(tab.y));
            }
            DragEvent::DragStart { column, row } | DragEvent::DragTo { column, row } => {
                self.drag_tab = Some(self.tab_origin_for_pointer(column, row));
                self.drag_pointer = Some((column, row));
            }
            DragEvent::DragEnd { column, row } => {
                let origin = self.tab_origin_for_pointer(column, row);
                self.drag_tab = None;
                self.drag_pointer = None;
                if rect_contains(self.exit_zone_rect(), column, row) {
                    tracing::debug!("tab dropped on exit target");
                    self.emit(MenuEvent::ExitRequested);
                } else {
                    self.anchor = self.snap_anchor(origin);
                    tracing::debug!(anchor = ?self.anchor, "tab re-anchored");
                }
            }
            DragEvent::Tap { .. } => self.expand(),
        }
        true
    }

    fn handle_expanded_mouse(&mut self, mouse: &MouseEvent) -> bool {
        let (column, row) = (mouse.column, mouse.row);
        if !rect_contains(self.area, column, row) {
            return false;
        }
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return true;
        }
        let hit = self
            .tab_strip_rects()
            .iter()
            .position(|rect| rect_contains(*rect, column, row));
        match hit {
            Some(index) if index == self.selected_tab => self.collapse(),
            Some(index) => self.selected_tab = index,
            None if !rect_contains(self.menu_rect(), column, row) => self.collapse(),
            None => {}
        }
        true
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if self.phase != Phase::Expanded {
            return false;
        }
        match self.keys.action_in(KeyContext::Expanded, key) {
            Some(Action::NextTab) => self.next_tab(),
            Some(Action::PrevTab) => self.prev_tab(),
            Some(Action::CollapseMenu) => self.collapse(),
            _ => return false,
        }
        true
    }

    fn tab_origin_for_pointer(&self, column: u16, row: u16) -> (u16, u16) {
        let tab = self.collapsed_tab_rect();
        let max_x = self.area.x + self.area.width.saturating_sub(tab.width);
        let max_y = self.area.y + self.area.height.saturating_sub(tab.height);
        let x = column.saturating_sub(self.grab_offset.0).clamp(self.area.x, max_x);
        let y = row.saturating_sub(self.grab_offset.1).clamp(self.area.y, max_y);
        (x, y)
    }

    fn snap_anchor(&self, (x, y): (u16, u16)) -> AnchorState {
        let tab = self.collapsed_tab_rect();
        let centre = x + tab.width / 2;
        let side = if centre < self.area.x + self.area.width / 2 {
            AnchorSide::Left
        } else {
            AnchorSide::Right
        };
        let fraction = AnchorState::fraction_for_row(y, self.area.y, self.area.height, tab.height);
        AnchorState::new(side, fraction)
    }

    fn render_collapsed(&self, frame: &mut UiFrame<'_>) {
        if let Some((column, row)) = self.drag_pointer {
            let zone = self.exit_zone_rect();
            let armed = rect_contains(zone, column, row);
            let bg = if armed {
                theme::exit_zone_armed_bg()
            } else {
                theme::exit_zone_bg()
            };
            frame.fill(zone, Style::default().bg(bg));
            frame.set_centered(zone, " × ", Style::default().fg(theme::exit_zone_fg()).bg(bg));
        }

        let tab = self.collapsed_tab_rect();
        let bg = if self.is_dragging() {
            theme::tab_dragging_bg()
        } else {
            theme::tab_bg()
        };
        let style = Style::default()
            .fg(theme::tab_fg())
            .bg(bg)
            .add_modifier(Modifier::BOLD);
        frame.fill(tab, style);
        let glyph = self
            .adapter
            .as_ref()
            .and_then(|a| a.tab_title(self.selected_tab).chars().next())
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_else(|| "≡".to_string());
        frame.set_centered(tab, &glyph, style);
    }

    fn render_menu(&self, frame: &mut UiFrame<'_>) {
        let full = self.menu_rect();
        let visible = ((f32::from(full.height) * self.progress()).round() as u16).max(1);
        let menu = Rect {
            height: visible.min(full.height),
            ..full
        };
        if menu.width == 0 || menu.height == 0 {
            return;
        }

        let strip = Rect { height: 1, ..menu };
        frame.fill(strip, Style::default().bg(theme::tab_strip_bg()));
        if let Some(adapter) = self.adapter.as_ref() {
            for (index, rect) in self.tab_strip_rects().into_iter().enumerate() {
                let style = if index == self.selected_tab {
                    Style::default()
                        .fg(theme::tab_selected_fg())
                        .bg(theme::tab_selected_bg())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                        .fg(theme::tab_strip_fg())
                        .bg(theme::tab_strip_bg())
                };
                let label = format!(" {} ", adapter.tab_title(index));
                frame.set_string(rect.x, rect.y, &label, style);
            }
        }

        if menu.height < 2 {
            return;
        }
        let content = Rect {
            y: menu.y + 1,
            height: menu.height - 1,
            ..menu
        };
        let style = Style::default()
            .fg(theme::content_fg())
            .bg(theme::content_bg());
        frame.fill(content, style);
        let text = match self.adapter.as_ref() {
            Some(adapter) if adapter.tab_count() > 0 => adapter.content(self.selected_tab),
            _ => "(no content)".into(),
        };
        let body = Rect {
            x: content.x.saturating_add(1),
            width: content.width.saturating_sub(2),
            ..content
        };
        frame.render_widget(
            Paragraph::new(text).style(style).wrap(Wrap { trim: false }),
            body,
        );
    }
}

impl HoverMenuView for TerminalHoverMenuView {
    type Adapter = Box<dyn MenuAdapter>;

    fn surface(&self) -> SurfaceId {
        self.surface
    }

    fn expand(&mut self) {
        let remaining = match self.phase {
            Phase::Expanded | Phase::Expanding { .. } => return,
            Phase::Collapsed => self.animation_frames,
            // pick up from the current height
            Phase::Collapsing { remaining } => self.animation_frames.saturating_sub(remaining),
        };
        self.cancel_drag();
        self.emit(MenuEvent::Expanding);
        if remaining == 0 {
            self.phase = Phase::Expanded;
            self.emit(MenuEvent::Expanded);
        } else {
            self.phase = Phase::Expanding { remaining };
        }
    }

    fn collapse(&mut self) {
        let remaining = match self.phase {
            Phase::Collapsing { .. } => return,
            Phase::Collapsed => {
                self.emit(MenuEvent::Collapsed);
                return;
            }
            Phase::Expanded => self.animation_frames,
            Phase::Expanding { remaining } => self.animation_frames.saturating_sub(remaining),
        };
        self.emit(MenuEvent::Collapsing);
        if remaining == 0 {
            self.phase = Phase::Collapsed;
            self.emit(MenuEvent::Collapsed);
        } else {
            self.phase = Phase::Collapsing { remaining };
        }
    }

    fn is_expanded(&self) -> bool {
        self.phase == Phase::Expanded
    }

    fn anchor_state(&self) -> AnchorState {
        self.anchor
    }

    fn set_anchor_state(&mut self, anchor: AnchorState) {
        self.cancel_drag();
        self.anchor = anchor;
    }

    fn set_adapter(&mut self, adapter: Option<Self::Adapter>) {
        self.adapter = adapter;
        let count = self.tab_count();
        if self.selected_tab >= count {
            self.selected_tab = 0;
        }
    }

    fn set_event_sink(&mut self, sink: MenuEvents) {
        self.sink = Some(sink);
    }
}

impl Component for TerminalHoverMenuView {
    fn resize(&mut self, area: Rect) {
        if area != self.area {
            self.cancel_drag();
            self.area = area;
        }
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        self.resize(area);
        if area.width == 0 || area.height == 0 {
            return;
        }
        match self.phase {
            Phase::Collapsed => self.render_collapsed(frame),
            _ => self.render_menu(frame),
        }
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Key(key) => self.handle_key(key),
            Event::Resize(width, height) => {
                self.resize(Rect::new(0, 0, *width, *height));
                false
            }
            _ => false,
        }
    }
}

impl std::fmt::Debug for TerminalHoverMenuView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalHoverMenuView")
            .field("surface", &self.surface)
            .field("area", &self.area)
            .field("anchor", &self.anchor)
            .field("phase", &self.phase)
            .field("selected_tab", &self.selected_tab)
            .field("tab_count", &self.tab_count())
            .field("drag_tab", &self.drag_tab)
            .finish()
    }
}
