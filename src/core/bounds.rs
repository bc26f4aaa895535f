//! Axis-aligned bounding box.

use super::point::Point2D;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box over world-space points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum corner (smallest x and y).
    pub min: Point2D,
    /// Maximum corner (largest x and y).
    pub max: Point2D,
}

impl Bounds {
    /// Create a bounding box from min and max corners.
    #[inline]
    pub const fn new(min: Point2D, max: Point2D) -> Self {
        Self { min, max }
    }

    /// Empty (inverted) bounds that expand to fit any point.
    #[inline]
    pub fn empty() -> Self {
        Self {
            min: Point2D::new(f64::INFINITY, f64::INFINITY),
            max: Point2D::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// True if no point has been included yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Grow to include the given point.
    #[inline]
    pub fn expand_to_include(&mut self, p: Point2D) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Bounds of a point slice, or `None` when the slice is empty.
    pub fn of_points(points: &[Point2D]) -> Option<Bounds> {
        if points.is_empty() {
            return None;
        }
        let mut bounds = Bounds::empty();
        for p in points {
            bounds.expand_to_include(*p);
        }
        Some(bounds)
    }

    /// Width (x span).
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Height (y span).
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Larger of width and height.
    #[inline]
    pub fn span(&self) -> f64 {
        self.width().max(self.height())
    }

    /// True if the point lies inside or on the boundary.
    #[inline]
    pub fn contains(&self, p: Point2D) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}
