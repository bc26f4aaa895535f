//! World-space point and vector type.
//!
//! Track coordinates are stored on disk as signed 32-bit fixed-point
//! integers at 500 units per inch. In memory all geometry is computed in
//! f64 (a track DLONG can exceed 10^7 units, which is outside f32's exact
//! integer range), and only persisted values are rounded back to i32.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// Fixed-point world units per inch in the on-disk format.
pub const UNITS_PER_INCH: f64 = 500.0;

/// Fixed-point world units per foot.
pub const UNITS_PER_FOOT: f64 = UNITS_PER_INCH * 12.0;

/// 2D point (or direction vector) in world units.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate in world units.
    pub x: f64,
    /// Y coordinate in world units.
    pub y: f64,
}

impl Point2D {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Origin.
    pub const ZERO: Point2D = Point2D { x: 0.0, y: 0.0 };

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(&self, other: &Point2D) -> f64 {
        (*other - *self).length()
    }

    /// Squared distance (avoids the sqrt).
    #[inline]
    pub fn distance_squared(&self, other: &Point2D) -> f64 {
        let d = *other - *self;
        d.x * d.x + d.y * d.y
    }

    /// Length of this point as a vector from the origin.
    #[inline]
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Dot product with another vector.
    #[inline]
    pub fn dot(&self, other: &Point2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product.
    #[inline]
    pub fn cross(&self, other: &Point2D) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Angle of this vector from +X, counter-clockwise, in radians.
    #[inline]
    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Unit vector at the given angle.
    #[inline]
    pub fn from_angle(angle: f64) -> Point2D {
        Point2D::new(angle.cos(), angle.sin())
    }

    /// Normalize to unit length. Returns `None` for the zero vector rather
    /// than producing NaNs.
    #[inline]
    pub fn normalize(&self) -> Option<Point2D> {
        let len = self.length();
        if len > 0.0 {
            Some(Point2D::new(self.x / len, self.y / len))
        } else {
            None
        }
    }

    /// Perpendicular vector 90 degrees counter-clockwise (the "left normal"
    /// when this vector is a direction of travel).
    #[inline]
    pub fn left_normal(&self) -> Point2D {
        Point2D::new(-self.y, self.x)
    }

    /// Perpendicular vector 90 degrees clockwise.
    #[inline]
    pub fn right_normal(&self) -> Point2D {
        Point2D::new(self.y, -self.x)
    }

    /// Round both coordinates to the nearest fixed-point integer.
    #[inline]
    pub fn round_units(&self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

impl Add for Point2D {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Point2D::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point2D {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Point2D::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Point2D {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f64) -> Self {
        Point2D::new(self.x * scalar, self.y * scalar)
    }
}

impl Neg for Point2D {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Point2D::new(-self.x, -self.y)
    }
}
