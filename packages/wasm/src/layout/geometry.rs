//! Small 2D helpers shared by placement, animation and rendering.

use serde::Serialize;

use crate::error::{GraphError, GraphResult};

/// A point in surface coordinates (origin top-left, y down).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The point at `distance` from `self` along `angle` (radians).
    #[inline]
    pub fn polar_offset(self, angle: f32, distance: f32) -> Self {
        Self {
            x: self.x + angle.cos() * distance,
            y: self.y + angle.sin() * distance,
        }
    }

    #[inline]
    pub fn distance_to(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Angle of the vector from `self` to `other`.
    #[inline]
    pub fn angle_to(self, other: Point) -> f32 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Linear interpolation, `t` in `[0, 1]`.
    #[inline]
    pub fn lerp(self, other: Point, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// Size of the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Validate and build a surface size.
    pub fn new(width: f32, height: f32) -> GraphResult<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(GraphError::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    /// Surface left for the diagram once the page header strip is removed.
    pub fn from_window(width: f32, height: f32, chrome_height: f32) -> GraphResult<Self> {
        Self::new(width, height - chrome_height)
    }

    /// Surface center.
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}
