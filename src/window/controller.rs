use std::collections::BTreeMap;

use super::{HostWindow, LayoutParams, SurfaceError, SurfaceId, SurfaceSize};

/// Shows, hides and positions surfaces on a [`HostWindow`].
///
/// The controller remembers which surfaces it attached so detaching or
/// poking a surface that is not attached never reaches the host.
#[derive(Debug)]
pub struct WindowViewController<H> {
    host: H,
    attached: BTreeMap<SurfaceId, bool>,
}

impl<H: HostWindow> WindowViewController<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            attached: BTreeMap::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn add_view(
        &mut self,
        width: SurfaceSize,
        height: SurfaceSize,
        focusable: bool,
        surface: SurfaceId,
    ) -> Result<(), SurfaceError> {
        let params = LayoutParams::new(width, height, focusable);
        if let Err(err) = self.host.add_surface(surface, params) {
            tracing::warn!(surface = ?surface, error = %err, "host refused surface");
            return Err(err);
        }
        self.attached.insert(surface, params.touchable);
        tracing::debug!(surface = ?surface, ?width, ?height, focusable, "attached surface");
        Ok(())
    }

    pub fn remove_view(&mut self, surface: SurfaceId) {
        if self.attached.remove(&surface).is_none() {
            return;
        }
        self.host.remove_surface(surface);
        tracing::debug!(surface = ?surface, "removed surface");
    }

    pub fn move_view(&mut self, surface: SurfaceId, x: i32, y: i32) {
        if self.attached.contains_key(&surface) {
            self.host.move_surface(surface, x, y);
        }
    }

    pub fn make_touchable(&mut self, surface: SurfaceId) {
        self.set_touchable(surface, true);
    }

    pub fn make_untouchable(&mut self, surface: SurfaceId) {
        self.set_touchable(surface, false);
    }

    pub fn is_attached(&self, surface: SurfaceId) -> bool {
        self.attached.contains_key(&surface)
    }

    /// Touchability as last requested, `None` when detached.
    pub fn is_touchable(&self, surface: SurfaceId) -> Option<bool> {
        self.attached.get(&surface).copied()
    }

    fn set_touchable(&mut self, surface: SurfaceId, touchable: bool) {
        let Some(state) = self.attached.get_mut(&surface) else {
            return;
        };
        *state = touchable;
        self.host.set_touchable(surface, touchable);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct CountingHost {
        adds: usize,
        removes: usize,
        touch_calls: Vec<bool>,
        moves: Vec<(i32, i32)>,
        refuse: bool,
    }

    impl HostWindow for CountingHost {
        fn add_surface(
            &mut self,
            id: SurfaceId,
            _params: LayoutParams,
        ) -> Result<(), SurfaceError> {
            if self.refuse {
                return Err(SurfaceError::PermissionDenied(id));
            }
            self.adds += 1;
            Ok(())
        }

        fn remove_surface(&mut self, _id: SurfaceId) {
            self.removes += 1;
        }

        fn set_touchable(&mut self, _id: SurfaceId, touchable: bool) {
            self.touch_calls.push(touchable);
        }

        fn move_surface(&mut self, _id: SurfaceId, x: i32, y: i32) {
            self.moves.push((x, y));
        }
    }

    const ID: SurfaceId = SurfaceId(7);

    #[test]
    fn remove_when_detached_is_noop() {
        let mut c = WindowViewController::new(CountingHost::default());
        c.remove_view(ID);
        assert_eq!(c.host().removes, 0);
        c.add_view(SurfaceSize::MatchParent, SurfaceSize::MatchParent, false, ID)
            .unwrap();
        c.remove_view(ID);
        c.remove_view(ID);
        assert_eq!(c.host().removes, 1);
    }

    #[test]
    fn touch_toggles_only_reach_attached_surfaces() {
        let mut c = WindowViewController::new(CountingHost::default());
        c.make_untouchable(ID);
        assert!(c.host().touch_calls.is_empty());
        c.add_view(SurfaceSize::MatchParent, SurfaceSize::MatchParent, false, ID)
            .unwrap();
        assert_eq!(c.is_touchable(ID), Some(true));
        c.make_untouchable(ID);
        assert_eq!(c.is_touchable(ID), Some(false));
        assert_eq!(c.host().touch_calls, vec![false]);
    }

    #[test]
    fn host_failure_leaves_surface_detached() {
        let host = CountingHost {
            refuse: true,
            ..Default::default()
        };
        let mut c = WindowViewController::new(host);
        let err = c
            .add_view(SurfaceSize::MatchParent, SurfaceSize::MatchParent, false, ID)
            .unwrap_err();
        assert_eq!(err, SurfaceError::PermissionDenied(ID));
        assert!(!c.is_attached(ID));
    }

    #[test]
    fn move_reaches_host_only_while_attached() {
        let mut c = WindowViewController::new(CountingHost::default());
        c.move_view(ID, 3, 4);
        assert!(c.host().moves.is_empty());
        c.add_view(SurfaceSize::MatchParent, SurfaceSize::MatchParent, false, ID)
            .unwrap();
        c.move_view(ID, 10, 2);
        c.remove_view(ID);
        c.move_view(ID, 0, 0);
        assert_eq!(c.host().moves, vec![(10, 2)]);
    }
}
