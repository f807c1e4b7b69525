//! Geometry primitives shared by the resize engine and the image node view.

use serde::{Deserialize, Serialize};

/// Multiplier applied to raw pointer movement while dragging a resize handle.
///
/// The element is centered, so dragging one edge grows it on both sides.
pub const DRAG_SENSITIVITY: f64 = 2.0;

/// Width/height pair of a resizable element, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Height over width, or `None` when the width is zero.
    pub fn height_ratio(&self) -> Option<f64> {
        (self.width != 0.0).then(|| self.height / self.width)
    }

    /// Width over height, or `None` when the height is zero.
    pub fn aspect_ratio(&self) -> Option<f64> {
        (self.height != 0.0).then(|| self.width / self.height)
    }

    /// Returns a copy with only the width replaced.
    pub fn with_width(self, width: f64) -> Self {
        Self { width, ..self }
    }
}

/// Which edge handle is being dragged.
///
/// The idle state is `Option::<ResizeDirection>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeDirection {
    Left,
    Right,
}

impl ResizeDirection {
    /// Signed growth produced by moving the pointer from `origin_x` to `x`.
    ///
    /// Moving the left handle leftward, or the right handle rightward, grows
    /// the element.
    pub fn movement_delta(self, origin_x: f64, x: f64) -> f64 {
        let raw = match self {
            Self::Left => origin_x - x,
            Self::Right => x - origin_x,
        };
        raw * DRAG_SENSITIVITY
    }
}
