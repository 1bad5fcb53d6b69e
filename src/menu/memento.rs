//! Persisted visual state of a hover menu.
//!
//! The wire format is a flat JSON object with exactly two fields:
//!
//! ```json
//! {"anchor_side":1,"normalized_position_y":0.5}
//! ```
//!
//! `anchor_side` is `0` (left) or `1` (right); `normalized_position_y` is a
//! float in `0.0..=1.0`. Anything else fails to decode as a whole; a decode
//! never produces a partially populated anchor.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::anchor::{AnchorSide, AnchorState};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed visual state: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unknown anchor side {0}")]
    UnknownSide(i64),
    #[error("normalized position {0} is outside 0.0..=1.0")]
    PositionOutOfRange(f64),
}

/// Flat snapshot of an [`AnchorState`], created on demand for persistence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VisualStateMemento {
    anchor_side: i64,
    normalized_position_y: f64,
}

impl VisualStateMemento {
    pub fn from_anchor(anchor: &AnchorState) -> Self {
        Self {
            anchor_side: anchor.side.wire_value(),
            normalized_position_y: f64::from(anchor.normalized_y),
        }
    }

    pub fn anchor_side(&self) -> i64 {
        self.anchor_side
    }

    pub fn normalized_position_y(&self) -> f64 {
        self.normalized_position_y
    }

    pub fn from_json_str(json: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> String {
        // Two plain numeric fields cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_anchor(&self) -> Result<AnchorState, DecodeError> {
        let side = AnchorSide::from_wire_value(self.anchor_side)
            .ok_or(DecodeError::UnknownSide(self.anchor_side))?;
        let y = self.normalized_position_y;
        if !y.is_finite() || !(0.0..=1.0).contains(&y) {
            return Err(DecodeError::PositionOutOfRange(y));
        }
        Ok(AnchorState {
            side,
            normalized_y: y as f32,
        })
    }
}

/// Serialize an anchor to its wire form.
pub fn encode(anchor: &AnchorState) -> String {
    VisualStateMemento::from_anchor(anchor).to_json_string()
}

/// Parse a wire-form anchor. Callers treat an error as "no prior state".
pub fn decode(json: &str) -> Result<AnchorState, DecodeError> {
    VisualStateMemento::from_json_str(json)?.to_anchor()
}
