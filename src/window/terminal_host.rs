use std::collections::BTreeMap;

use ratatui::layout::Rect;

use super::{HostWindow, LayoutParams, SurfaceError, SurfaceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceRecord {
    pub params: LayoutParams,
    pub touchable: bool,
    pub z_order: usize,
}

/// Overlay layer for a terminal screen.
///
/// Surfaces are stacked above the application content in attach order. The
/// host itself draws nothing; it answers where a surface lives and whether a
/// pointer event at a cell belongs to it or passes through to the
/// application underneath.
#[derive(Debug, Default)]
pub struct TerminalWindowHost {
    screen: Rect,
    surfaces: BTreeMap<SurfaceId, SurfaceRecord>,
    next_z: usize,
    deny_overlays: bool,
}

impl TerminalWindowHost {
    pub fn new(screen: Rect) -> Self {
        Self {
            screen,
            ..Self::default()
        }
    }

    /// Refuse every future attach, as a host without overlay permission would.
    pub fn set_deny_overlays(&mut self, deny: bool) {
        self.deny_overlays = deny;
    }

    pub fn resize(&mut self, screen: Rect) {
        self.screen = screen;
    }

    pub fn screen(&self) -> Rect {
        self.screen
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&SurfaceRecord> {
        self.surfaces.get(&id)
    }

    pub fn is_attached(&self, id: SurfaceId) -> bool {
        self.surfaces.contains_key(&id)
    }

    pub fn is_touchable(&self, id: SurfaceId) -> bool {
        self.surfaces.get(&id).is_some_and(|s| s.touchable)
    }

    /// Screen area covered by an attached surface.
    pub fn surface_area(&self, id: SurfaceId) -> Option<Rect> {
        let record = self.surfaces.get(&id)?;
        let params = record.params;
        let x = params.x.clamp(0, i32::from(self.screen.width)) as u16;
        let y = params.y.clamp(0, i32::from(self.screen.height)) as u16;
        let area = Rect {
            x: self.screen.x.saturating_add(x),
            y: self.screen.y.saturating_add(y),
            width: params.width.resolve(self.screen.width),
            height: params.height.resolve(self.screen.height),
        };
        Some(area.intersection(self.screen))
    }

    /// Surfaces from bottom to top.
    pub fn stacking_order(&self) -> Vec<SurfaceId> {
        let mut ids: Vec<(usize, SurfaceId)> = self
            .surfaces
            .iter()
            .map(|(id, record)| (record.z_order, *id))
            .collect();
        ids.sort_unstable();
        ids.into_iter().map(|(_, id)| id).collect()
    }

    /// Whether a pointer event at (`column`, `row`) is delivered to `id`.
    ///
    /// Touchable surfaces take every event inside their area. Untouchable
    /// surfaces only take events inside `hit_region`, which is where the
    /// collapsed tab's drag watcher sits; everything else passes through.
    pub fn accepts_pointer(
        &self,
        id: SurfaceId,
        column: u16,
        row: u16,
        hit_region: Option<Rect>,
    ) -> bool {
        let Some(area) = self.surface_area(id) else {
            return false;
        };
        if !rect_contains(area, column, row) {
            return false;
        }
        if self.is_touchable(id) {
            return true;
        }
        hit_region.is_some_and(|hit| rect_contains(hit, column, row))
    }
}

impl HostWindow for TerminalWindowHost {
    fn add_surface(&mut self, id: SurfaceId, params: LayoutParams) -> Result<(), SurfaceError> {
        if self.deny_overlays {
            tracing::warn!(surface = ?id, "overlay permission denied");
            return Err(SurfaceError::PermissionDenied(id));
        }
        if self.surfaces.contains_key(&id) {
            return Err(SurfaceError::AlreadyAttached(id));
        }
        let z_order = self.next_z;
        self.next_z += 1;
        self.surfaces.insert(
            id,
            SurfaceRecord {
                params,
                touchable: params.touchable,
                z_order,
            },
        );
        Ok(())
    }

    fn remove_surface(&mut self, id: SurfaceId) {
        self.surfaces.remove(&id);
    }

    fn set_touchable(&mut self, id: SurfaceId, touchable: bool) {
        if let Some(record) = self.surfaces.get_mut(&id) {
            record.touchable = touchable;
        }
    }

    fn move_surface(&mut self, id: SurfaceId, x: i32, y: i32) {
        if let Some(record) = self.surfaces.get_mut(&id) {
            record.params.x = x;
            record.params.y = y;
        }
    }
}

pub(crate) fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}
