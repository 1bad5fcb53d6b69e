//! Host windowing contract for overlay surfaces.
//!
//! A [`HostWindow`] is whatever draws surfaces above other application
//! content. The hover menu only needs to attach and detach one surface,
//! reposition it, and toggle whether it intercepts pointer input.

mod controller;
mod terminal_host;

use thiserror::Error;

pub use controller::WindowViewController;
pub(crate) use terminal_host::rect_contains;
pub use terminal_host::{SurfaceRecord, TerminalWindowHost};

/// Identifies a surface attached to a host window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(pub u32);

/// Sizing along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceSize {
    MatchParent,
    Fixed(u16),
}

impl SurfaceSize {
    pub fn resolve(self, parent: u16) -> u16 {
        match self {
            SurfaceSize::MatchParent => parent,
            SurfaceSize::Fixed(size) => size.min(parent),
        }
    }
}

/// Layout request for a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutParams {
    pub width: SurfaceSize,
    pub height: SurfaceSize,
    pub focusable: bool,
    pub touchable: bool,
    pub x: i32,
    pub y: i32,
}

impl LayoutParams {
    pub fn new(width: SurfaceSize, height: SurfaceSize, focusable: bool) -> Self {
        Self {
            width,
            height,
            focusable,
            touchable: true,
            x: 0,
            y: 0,
        }
    }
}

/// Failures reported by a host window. These are not recoverable by the
/// hover menu; callers decide whether to abort.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("host refused to attach overlay surface {0:?}: permission denied")]
    PermissionDenied(SurfaceId),
    #[error("surface {0:?} is already attached")]
    AlreadyAttached(SurfaceId),
}

pub trait HostWindow {
    fn add_surface(&mut self, id: SurfaceId, params: LayoutParams) -> Result<(), SurfaceError>;
    fn remove_surface(&mut self, id: SurfaceId);
    fn set_touchable(&mut self, id: SurfaceId, touchable: bool);
    fn move_surface(&mut self, id: SurfaceId, x: i32, y: i32);
}

impl<T: HostWindow + ?Sized> HostWindow for &mut T {
    fn add_surface(&mut self, id: SurfaceId, params: LayoutParams) -> Result<(), SurfaceError> {
        (**self).add_surface(id, params)
    }

    fn remove_surface(&mut self, id: SurfaceId) {
        (**self).remove_surface(id)
    }

    fn set_touchable(&mut self, id: SurfaceId, touchable: bool) {
        (**self).set_touchable(id, touchable)
    }

    fn move_surface(&mut self, id: SurfaceId, x: i32, y: i32) {
        (**self).move_surface(id, x, y)
    }
}
