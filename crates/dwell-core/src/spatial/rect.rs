//! Axis-aligned bounding boxes for hit testing

use serde::{Deserialize, Serialize};

use super::Point;

/// Axis-aligned box given by its edges
///
/// Edges are inclusive: a point lying exactly on `right` or `bottom` is inside.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    /// Create a box from its four edges
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a box from an origin and a size
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> f64 {
        (self.right - self.left).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.bottom - self.top).max(0.0)
    }

    /// A box with no area cannot be looked at
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Get the center of the box
    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Check if a point is inside the box
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right
            && point.y >= self.top
            && point.y <= self.bottom
    }

    /// Grow the box outward by `margin` on all four sides
    pub fn expand(&self, margin: f64) -> Self {
        Self::new(
            self.left - margin,
            self.top - margin,
            self.right + margin,
            self.bottom + margin,
        )
    }

    /// Check if this box overlaps another
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left <= other.right
            && self.right >= other.left
            && self.top <= other.bottom
            && self.bottom >= other.top
    }

    /// Get the distance from a point to the closest edge (0 when inside)
    pub fn distance_to(&self, point: Point) -> f64 {
        let closest = Point::new(
            point.x.clamp(self.left, self.right.max(self.left)),
            point.y.clamp(self.top, self.bottom.max(self.top)),
        );
        closest.distance(&point)
    }
}
