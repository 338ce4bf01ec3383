//! Plain geometry types shared by the normalizer, the stick control and the host

use serde::{Deserialize, Serialize};

/// A position in points. Screen convention: Y grows downward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Width and height of a bounding box
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Square box with the given side length
    pub fn square(side: f32) -> Self {
        Self::new(side, side)
    }

    /// Radius of the circle inscribed in the larger dimension
    pub fn radius(&self) -> f32 {
        self.width.max(self.height) / 2.0
    }
}

/// Output of a stick: both axes in `[-1.0, 1.0]`, Y grows upward
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisValue {
    pub x: f32,
    pub y: f32,
}

impl AxisValue {
    pub const CENTER: AxisValue = AxisValue { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_centered(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Euclidean magnitude (may exceed 1.0 on diagonals, axes are clamped independently)
    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn in_range(&self) -> bool {
        (-1.0..=1.0).contains(&self.x) && (-1.0..=1.0).contains(&self.y)
    }
}
