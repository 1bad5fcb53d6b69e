//! Shared crate-wide constants.

/// Default vertical resting position of the collapsed tab, as a fraction of
/// the usable height.
pub const DEFAULT_NORMALIZED_Y: f32 = 0.5;

/// Default touch slop in terminal cells.
///
/// A pointer press on the collapsed tab only turns into a drag once the
/// pointer has travelled at least this far (euclidean, in cells). Anything
/// shorter is reported as a tap, which expands the menu.
pub const DEFAULT_TOUCH_SLOP: u16 = 1;

/// Number of `tick()` frames an expand or collapse animation takes by default.
pub const DEFAULT_ANIMATION_FRAMES: u16 = 6;

/// Width of the collapsed tab in terminal columns.
pub const TAB_WIDTH: u16 = 5;

/// Height of the collapsed tab in terminal rows.
pub const TAB_HEIGHT: u16 = 3;

/// Width of the exit target drawn at the bottom centre while dragging.
pub const EXIT_ZONE_WIDTH: u16 = 9;

/// Height of the exit target drawn at the bottom centre while dragging.
pub const EXIT_ZONE_HEIGHT: u16 = 3;

/// Background of the expanded content area (0xFF3b3b3b).
pub const CONTENT_BACKGROUND_RGB: (u8, u8, u8) = (0x3b, 0x3b, 0x3b);
