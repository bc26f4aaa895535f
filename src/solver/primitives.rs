//! Closed-form circle constructions shared by the solver entry points.
//!
//! `orientation` is +1.0 for a counter-clockwise sweep and -1.0 for
//! clockwise throughout.

use crate::core::math::clamp_unit;
use crate::core::Point2D;

/// Unit tangent of the circle at `point`, swept in `orientation`.
/// `None` when the point coincides with the center.
pub fn curve_tangent_heading(
    center: Point2D,
    point: Point2D,
    orientation: f64,
) -> Option<Point2D> {
    let v = point - center;
    let radius = v.length();
    if radius <= 0.0 {
        return None;
    }
    Some(Point2D::new(
        orientation * (-v.y / radius),
        orientation * (v.x / radius),
    ))
}

/// Arc length between two points on a circle of the given radius, taking
/// the minor arc. `None` for a zero subtended angle.
pub fn curve_arc_length(
    center: Point2D,
    start: Point2D,
    end: Point2D,
    radius: f64,
) -> Option<f64> {
    let s = start - center;
    let e = end - center;
    let dot = clamp_unit(s.dot(&e) / (radius * radius).max(1e-9));
    let angle = s.cross(&e).atan2(dot).abs();
    if angle <= 0.0 {
        return None;
    }
    Some(radius * angle)
}

/// Center and radius of the circle through `fixed_point` and
/// `moving_point` whose tangent at `fixed_point` is `fixed_heading`.
///
/// The center lies on the perpendicular to the heading through the fixed
/// point, at the distance that makes it equidistant from both points:
/// `r = |d|^2 / (2 d.n)` where `n` is the orientation-signed normal.
/// `None` when the moving point sits on the heading line (no finite
/// circle) or the solved radius comes out behind the normal.
pub fn curve_center_from_fixed_heading(
    fixed_point: Point2D,
    moving_point: Point2D,
    fixed_heading: Point2D,
    orientation: f64,
) -> Option<(Point2D, f64)> {
    let h = fixed_heading.normalize()?;
    let normal = Point2D::new(-orientation * h.y, orientation * h.x);

    let d = moving_point - fixed_point;
    let dot = d.dot(&normal);
    if dot.abs() <= 1e-9 {
        return None;
    }

    let radius = d.dot(&d) / (2.0 * dot);
    if radius <= 0.0 {
        return None;
    }

    Some((fixed_point + normal * radius, radius))
}

/// Center of the circle tangent to both headings at both points, found by
/// intersecting the two center-ward normal rays. Returns the center and
/// the two ray parameters (both must come out positive for the center to
/// lie on the correct side of each point). `None` when the rays are
/// parallel or intersect behind either point.
pub fn circle_center_from_tangent_headings(
    start: Point2D,
    start_heading: Point2D,
    end: Point2D,
    end_heading: Point2D,
    orientation: f64,
) -> Option<(Point2D, f64, f64)> {
    let sh = start_heading.normalize()?;
    let eh = end_heading.normalize()?;

    let ns = Point2D::new(-orientation * sh.y, orientation * sh.x);
    let ne = Point2D::new(-orientation * eh.y, orientation * eh.x);

    let d = end - start;

    let det = ns.x * (-ne.y) - ns.y * (-ne.x);
    if det.abs() <= 1e-9 {
        return None;
    }

    let ts = (d.x * (-ne.y) - d.y * (-ne.x)) / det;
    let te = (ns.x * d.y - ns.y * d.x) / det;
    if ts <= 0.0 || te <= 0.0 {
        return None;
    }

    Some((start + ns * ts, ts, te))
}

/// Orthogonal projection of `target` onto the line through `origin` along
/// `heading`.
pub fn project_point_along_heading(
    origin: Point2D,
    heading: Point2D,
    target: Point2D,
) -> Option<Point2D> {
    let h = heading.normalize()?;
    let projection = (target - origin).dot(&h);
    Some(origin + h * projection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_tangent_heading_ccw() {
        let t = curve_tangent_heading(Point2D::ZERO, Point2D::new(50.0, 0.0), 1.0).unwrap();
        assert!((t.x - 0.0).abs() < 1e-12);
        assert!((t.y - 1.0).abs() < 1e-12);
        assert!(curve_tangent_heading(Point2D::ZERO, Point2D::ZERO, 1.0).is_none());
    }

    #[test]
    fn test_arc_length_semicircle() {
        let len = curve_arc_length(
            Point2D::ZERO,
            Point2D::new(50.0, 0.0),
            Point2D::new(-50.0, 0.0),
            50.0,
        )
        .unwrap();
        assert!((len - 50.0 * PI).abs() < 1e-9);
    }

    #[test]
    fn test_center_from_fixed_heading() {
        // Tangent pointing up at (0,0), other point at (100,0): the circle
        // is the radius-50 semicircle centered at (50,0), reachable only
        // with a clockwise sweep.
        let up = Point2D::new(0.0, 1.0);
        assert!(curve_center_from_fixed_heading(
            Point2D::ZERO,
            Point2D::new(100.0, 0.0),
            up,
            1.0
        )
        .is_none());
        let (center, radius) = curve_center_from_fixed_heading(
            Point2D::ZERO,
            Point2D::new(100.0, 0.0),
            up,
            -1.0,
        )
        .unwrap();
        assert!((center.x - 50.0).abs() < 1e-9);
        assert!(center.y.abs() < 1e-9);
        assert!((radius - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_center_from_two_headings() {
        // Quarter circle: up at (50,0), left at (0,50), centered on origin.
        let (center, ts, te) = circle_center_from_tangent_headings(
            Point2D::new(50.0, 0.0),
            Point2D::new(0.0, 1.0),
            Point2D::new(0.0, 50.0),
            Point2D::new(-1.0, 0.0),
            1.0,
        )
        .unwrap();
        assert!(center.length() < 1e-9);
        assert!((ts - 50.0).abs() < 1e-9);
        assert!((te - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_parallel_headings_rejected() {
        assert!(circle_center_from_tangent_headings(
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(100.0, 10.0),
            Point2D::new(1.0, 0.0),
            1.0,
        )
        .is_none());
    }

    #[test]
    fn test_project_along_heading() {
        let p = project_point_along_heading(
            Point2D::ZERO,
            Point2D::new(2.0, 0.0),
            Point2D::new(30.0, 40.0),
        )
        .unwrap();
        assert_eq!(p, Point2D::new(30.0, 0.0));
    }
}
