// THEORY:
// A `Region` is the unit of spatial query and of spatial result. Callers hand one in
// to restrict an operation to part of a frame, and the rectangle detector hands them
// back out to say "the thing you asked for is here."
//
// Key architectural principles:
// 1.  **Caller Geometry**: Coordinates are signed. Automation code derives boxes from
//     window offsets and percentages, and those computations can land left of or above
//     the frame. Such a box is representable; it is the `region_extractor` that
//     decides it is unusable.
// 2.  **Immutability**: A `Region` is a small `Copy` value with read-only accessors.
//     Attaching a confidence produces a new value.
// 3.  **Optional Confidence**: Query regions carry no confidence. Detected regions carry
//     the fill ratio that justified them, always within [0, 1].

use serde::{Deserialize, Serialize};
use std::fmt;

/// An axis-aligned rectangle in frame coordinates, optionally scored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    confidence: Option<f64>,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            confidence: None,
        }
    }

    /// Returns a copy of this region scored with `confidence`, clamped to [0, 1].
    #[must_use]
    pub fn with_confidence(self, confidence: f64) -> Self {
        Self {
            confidence: Some(confidence.clamp(0.0, 1.0)),
            ..self
        }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }

    /// Exclusive right edge. Widened so that hostile inputs cannot overflow.
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Pixel count covered by the rectangle; zero for degenerate boxes.
    pub fn area(&self) -> u64 {
        if self.width <= 0 || self.height <= 0 {
            return 0;
        }
        self.width as u64 * self.height as u64
    }

    /// Returns this region moved by `(dx, dy)`, keeping its confidence.
    #[must_use]
    pub fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..self
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) {}x{}",
            self.x, self.y, self.width, self.height
        )?;
        if let Some(confidence) = self.confidence {
            write!(f, " @ {confidence:.3}")?;
        }
        Ok(())
    }
}
