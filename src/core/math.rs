//! Angle and heading helpers.
//!
//! All angles are in radians, counter-clockwise positive. Headings are unit
//! direction vectors; before persisting they are quantized to 5 decimal
//! digits, matching the precision the on-disk format survives.

use super::point::Point2D;
use std::f64::consts::PI;

/// Two times PI (full circle).
pub const TWO_PI: f64 = 2.0 * PI;

/// Normalize angle to [-π, π).
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle % TWO_PI;
    if a >= PI {
        a -= TWO_PI;
    } else if a < -PI {
        a += TWO_PI;
    }
    a
}

/// Clamp a cosine/dot value into [-1, 1] before acos.
#[inline]
pub fn clamp_unit(value: f64) -> f64 {
    value.clamp(-1.0, 1.0)
}

/// Unsigned angle between two direction vectors.
#[inline]
pub fn angle_between(a: Point2D, b: Point2D) -> f64 {
    clamp_unit(a.dot(&b)).acos()
}

/// Normalize a vector to unit length, `None` for degenerate input.
#[inline]
pub fn normalize_heading(vec: Point2D) -> Option<Point2D> {
    vec.normalize()
}

/// Normalize and quantize a heading to 5 decimal digits per component.
#[inline]
pub fn round_heading(vec: Point2D) -> Option<Point2D> {
    let n = vec.normalize()?;
    Some(Point2D::new(round5(n.x), round5(n.y)))
}

#[inline]
fn round5(v: f64) -> f64 {
    (v * 1e5).round() / 1e5
}

/// Angular deviation between a stored heading and a candidate, zero when
/// either is missing. Used for solver candidate scoring.
#[inline]
pub fn heading_angle_error(original: Option<Point2D>, candidate: Option<Point2D>) -> f64 {
    match (original, candidate) {
        (Some(a), Some(b)) => clamp_unit(a.dot(&b)).acos(),
        _ => 0.0,
    }
}
