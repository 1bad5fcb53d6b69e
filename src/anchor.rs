//! Resting position of the collapsed tab.
//!
//! The anchor is normalized so it survives terminal resizes: a side of the
//! screen plus a vertical fraction of the usable height.

use crate::constants::DEFAULT_NORMALIZED_Y;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorSide {
    Left,
    Right,
}

impl AnchorSide {
    /// Integer used on the wire for this side.
    pub const fn wire_value(self) -> i64 {
        match self {
            AnchorSide::Left => 0,
            AnchorSide::Right => 1,
        }
    }

    pub const fn from_wire_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(AnchorSide::Left),
            1 => Some(AnchorSide::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorState {
    pub side: AnchorSide,
    pub normalized_y: f32,
}

impl AnchorState {
    /// Build an anchor, clamping the vertical fraction into `0.0..=1.0`.
    /// Non-finite fractions fall back to the default position.
    pub fn new(side: AnchorSide, normalized_y: f32) -> Self {
        let normalized_y = if normalized_y.is_finite() {
            normalized_y.clamp(0.0, 1.0)
        } else {
            DEFAULT_NORMALIZED_Y
        };
        Self { side, normalized_y }
    }

    /// Resolve the anchor's top row for an item of `item_height` rows placed
    /// inside `height` rows starting at `origin`.
    pub fn resolve_row(&self, origin: u16, height: u16, item_height: u16) -> u16 {
        let travel = height.saturating_sub(item_height);
        let offset = (travel as f32 * self.normalized_y).round() as u16;
        origin.saturating_add(offset.min(travel))
    }

    /// Inverse of [`AnchorState::resolve_row`]: the fraction that places an
    /// item's top row at `row`.
    pub fn fraction_for_row(row: u16, origin: u16, height: u16, item_height: u16) -> f32 {
        let travel = height.saturating_sub(item_height);
        if travel == 0 {
            return DEFAULT_NORMALIZED_Y;
        }
        let offset = row.saturating_sub(origin).min(travel);
        offset as f32 / travel as f32
    }
}

impl Default for AnchorState {
    /// Right edge, vertically centred.
    fn default() -> Self {
        Self {
            side: AnchorSide::Right,
            normalized_y: DEFAULT_NORMALIZED_Y,
        }
    }
}
