//! Forward mapping (DLONG, DLAT) -> world position, and uniform
//! centerline sampling built on top of it.

use super::Centerline;
use crate::core::{Bounds, Point2D};
use crate::elevation::ElevationProfile;
use crate::ring::{DlongLookup, TrackRing};
use crate::section::{arc_span, SectionKind};

/// World-space sample: position plus altitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackPoint {
    pub position: Point2D,
    pub altitude: f64,
}

/// Map a (DLONG, DLAT) pair to world coordinates. DLONG wraps modulo the
/// track length; DLAT is unclamped (positive is to the left of travel)
/// so off-track surfaces are reachable. `None` when the ring is empty or
/// the DLONG cannot be resolved.
pub fn getxyz(
    ring: &TrackRing,
    profile: &ElevationProfile,
    lookup: &DlongLookup,
    dlong: f64,
    dlat: f64,
) -> Option<TrackPoint> {
    let position = lookup.position(dlong)?;
    let section = ring.section(position.section_index)?;
    let t = position.fraction;

    let xy = match section.kind {
        SectionKind::Straight => {
            let chord = section.end - section.start;
            let heading = chord.normalize().or(section.start_heading)?;
            section.start + chord * t + heading.left_normal() * dlat
        }
        SectionKind::Curve { center, radius } => {
            let magnitude = radius.abs();
            let span = arc_span(
                section.start,
                section.end,
                center,
                magnitude,
                section.start_heading,
            )?;
            // DLAT is measured to the left of travel: toward the center
            // on a left turn, away from it on a right turn.
            let orientation = if span >= 0.0 { 1.0 } else { -1.0 };
            let angle = (section.start - center).angle() + span * t;
            center + Point2D::from_angle(angle) * (magnitude - orientation * dlat)
        }
    };

    Some(TrackPoint {
        position: xy,
        altitude: profile.altitude(position.section_index, t, dlat),
    })
}

/// Sample the centerline at uniform DLONG steps around the whole ring.
/// The loop is closed explicitly: the final point is the DLONG-zero point
/// appended again, never left to floating-point equality.
pub fn sample_centerline(
    ring: &TrackRing,
    profile: &ElevationProfile,
    step: f64,
) -> Centerline {
    if ring.is_empty() || ring.track_length <= 0.0 || step <= 0.0 {
        return Centerline::default();
    }
    let lookup = ring.dlong_lookup();

    let mut points = Vec::new();
    let mut dlongs = Vec::new();
    let mut dlong = 0.0;
    while dlong < ring.track_length {
        if let Some(sample) = getxyz(ring, profile, &lookup, dlong, 0.0) {
            points.push(sample.position);
            dlongs.push(dlong);
        }
        dlong += step;
    }

    if let Some(sample) = getxyz(ring, profile, &lookup, ring.track_length, 0.0) {
        points.push(sample.position);
        dlongs.push(ring.track_length);
    }
    if points.first() != points.last() {
        if let Some(first) = points.first().copied() {
            points.push(first);
            dlongs.push(ring.track_length);
        }
    }

    let bounds = Bounds::of_points(&points).unwrap_or_else(Bounds::empty);
    Centerline {
        points,
        dlongs,
        bounds,
        track_length: ring.track_length,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::test_ring::{rectangle, stadium};

    fn flat_profile(ring: &TrackRing) -> ElevationProfile {
        let mut ring = ring.clone();
        for section in &mut ring.sections {
            section.alt = vec![0; ring.xsect_dlats.len()];
            section.grade = vec![0; ring.xsect_dlats.len()];
        }
        ElevationProfile::from_ring(&ring)
    }

    #[test]
    fn test_getxyz_at_origin() {
        let ring = rectangle(1000.0, 500.0);
        let profile = flat_profile(&ring);
        let lookup = ring.dlong_lookup();
        let p = getxyz(&ring, &profile, &lookup, 0.0, 0.0).unwrap();
        assert_eq!(p.position, ring.sections[0].start);
        assert_eq!(p.altitude, 0.0);
    }

    #[test]
    fn test_getxyz_lateral_offset_straight() {
        let ring = rectangle(1000.0, 500.0);
        let profile = flat_profile(&ring);
        let lookup = ring.dlong_lookup();
        // section 0 runs +X; DLAT +100 is 100 units toward +Y (the left)
        let p = getxyz(&ring, &profile, &lookup, 500.0, 100.0).unwrap();
        assert!((p.position.x - 500.0).abs() < 1e-9);
        assert!((p.position.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_getxyz_wraps_dlong() {
        let ring = rectangle(1000.0, 500.0);
        let profile = flat_profile(&ring);
        let lookup = ring.dlong_lookup();
        let a = getxyz(&ring, &profile, &lookup, 200.0, 0.0).unwrap();
        let b = getxyz(&ring, &profile, &lookup, 200.0 + 3000.0, 0.0).unwrap();
        assert_eq!(a.position, b.position);
    }

    #[test]
    fn test_getxyz_on_curve() {
        let ring = stadium(100_000.0, 20_000.0);
        let profile = flat_profile(&ring);
        let lookup = ring.dlong_lookup();

        // halfway through the first semicircle: its apex
        let curve = &ring.sections[1];
        let mid_dlong = curve.start_dlong + curve.length / 2.0;
        let p = getxyz(&ring, &profile, &lookup, mid_dlong, 0.0).unwrap();
        assert!((p.position.x - 120_000.0).abs() < 1.0, "{:?}", p.position);
        assert!((p.position.y - 20_000.0).abs() < 1.0);

        // positive DLAT on a left turn moves toward the curve center
        let inner = getxyz(&ring, &profile, &lookup, mid_dlong, 5_000.0).unwrap();
        let center = Point2D::new(100_000.0, 20_000.0);
        assert!(inner.position.distance(&center) < p.position.distance(&center));
    }

    #[test]
    fn test_sample_counts() {
        // ring of total length 1,000,000: 100 interior samples at step
        // 10,000 plus one closing point equal to the first
        let ring = rectangle(300_000.0, 200_000.0);
        assert_eq!(ring.track_length, 1_000_000.0);

        let profile = flat_profile(&ring);
        let line = sample_centerline(&ring, &profile, 10_000.0);
        assert_eq!(line.points.len(), 101);
        assert_eq!(line.points[0], line.points[100]);
        assert_eq!(line.dlongs[100], ring.track_length);
    }

    #[test]
    fn test_sample_empty_ring() {
        let ring = TrackRing {
            sections: Vec::new(),
            track_length: 0.0,
            xsect_dlats: Vec::new(),
        };
        let profile = ElevationProfile::default();
        assert!(sample_centerline(&ring, &profile, 10_000.0).is_empty());
    }
}
