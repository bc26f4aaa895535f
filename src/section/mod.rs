//! Per-section track geometry.
//!
//! A section is either a straight or a constant-radius curve. Raw integer
//! fields decoded from the SG file are kept alongside the derived
//! floating-point geometry so an unedited section writes back bit-exact.
//! Derived state (headings, signed radius, polyline) is recomputed wholesale
//! whenever a primary field changes; a section handed back from
//! [`Section::recompute`] is always internally consistent.

pub mod invariants;

pub use invariants::{validate_sections, InvariantError};

use crate::codec::{SgFsect, SgSection, SECTION_TYPE_CURVE, SECTION_TYPE_STRAIGHT};
use crate::core::math::{normalize_angle, round_heading};
use crate::core::Point2D;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest angular step between adjacent arc samples (5 degrees).
pub const MAX_ARC_STEP: f64 = std::f64::consts::PI / 36.0;

/// Minimum number of arc samples regardless of span.
pub const MIN_ARC_SAMPLES: usize = 8;

/// Smallest arc span accepted for a curve; anything below this is
/// numerically unstable and rejected.
pub const MIN_ARC_SPAN: f64 = 1e-6;

/// Geometric construction failures. A section that fails these checks must
/// not be installed into a ring.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Curve radius resolved to zero or the arc span collapsed below
    /// [`MIN_ARC_SPAN`].
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
}

/// Straight/curve discriminant with curve-only parameters.
///
/// `radius` is signed: positive when the center sits to the left of the
/// start heading (a left turn), negative for a right turn.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum SectionKind {
    Straight,
    Curve { center: Point2D, radius: f64 },
}

impl SectionKind {
    #[inline]
    pub fn is_curve(&self) -> bool {
        matches!(self, SectionKind::Curve { .. })
    }

    /// SG type tag for this kind.
    #[inline]
    pub fn type_tag(&self) -> i32 {
        match self {
            SectionKind::Straight => SECTION_TYPE_STRAIGHT,
            SectionKind::Curve { .. } => SECTION_TYPE_CURVE,
        }
    }
}

/// Raw SG integer fields preserved verbatim for byte-exact write-back.
/// The sang/eang pairs encode the start/end headings as large-scale
/// sin/cos integers; they are only regenerated when an edit changes the
/// heading they encode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSectionFields {
    pub sang1: i32,
    pub sang2: i32,
    pub eang1: i32,
    pub eang2: i32,
    pub radius: i32,
    pub num1: i32,
}

/// One section of the track ring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Unique id, equal to the section's index in the ring list.
    pub id: usize,
    /// Neighbor indices; -1 (or any out-of-range value) means disconnected.
    pub prev_id: i32,
    pub next_id: i32,
    pub kind: SectionKind,
    pub start: Point2D,
    pub end: Point2D,
    /// Cumulative DLONG at the section start, fixed-point units.
    pub start_dlong: f64,
    /// Longitudinal length, fixed-point units.
    pub length: f64,
    /// Unit tangent at the section start, quantized to 5 decimals.
    pub start_heading: Option<Point2D>,
    pub end_heading: Option<Point2D>,
    /// Altitude per xsect column, raw SG values.
    pub alt: Vec<i32>,
    /// Grade per xsect column, raw SG values (slope * 8192).
    pub grade: Vec<i32>,
    /// Surface strips in file order, ground and boundary interleaved.
    pub fsects: Vec<SgFsect>,
    pub raw: RawSectionFields,
    /// Cached shape approximation; 2 points for straights, arc samples
    /// for curves. First and last points are exactly `start` and `end`.
    pub polyline: Vec<Point2D>,
}

impl Section {
    /// Build a straight section between two points. Never fails.
    pub fn new_straight(id: usize, start: Point2D, end: Point2D) -> Section {
        let mut section = Section {
            id,
            prev_id: -1,
            next_id: -1,
            kind: SectionKind::Straight,
            start,
            end,
            start_dlong: 0.0,
            length: start.distance(&end),
            start_heading: None,
            end_heading: None,
            alt: Vec::new(),
            grade: Vec::new(),
            fsects: Vec::new(),
            raw: RawSectionFields::default(),
            polyline: Vec::new(),
        };
        // Straights cannot be degenerate.
        let _ = section.recompute();
        section
    }

    /// Build a curve from explicit center and signed radius.
    pub fn new_curve(
        id: usize,
        start: Point2D,
        end: Point2D,
        center: Point2D,
        radius: f64,
    ) -> Result<Section, GeometryError> {
        let mut section = Section {
            id,
            prev_id: -1,
            next_id: -1,
            kind: SectionKind::Curve { center, radius },
            start,
            end,
            start_dlong: 0.0,
            length: 0.0,
            start_heading: None,
            end_heading: None,
            alt: Vec::new(),
            grade: Vec::new(),
            fsects: Vec::new(),
            raw: RawSectionFields::default(),
            polyline: Vec::new(),
        };
        section.recompute()?;
        section.length = section.arc_length().unwrap_or(0.0);
        Ok(section)
    }

    /// Convert a decoded SG record into a section. The record's id is the
    /// record's position in the file.
    pub fn from_sg(id: usize, rec: &SgSection) -> Result<Section, GeometryError> {
        let start = Point2D::new(rec.start_x as f64, rec.start_y as f64);
        let end = Point2D::new(rec.end_x as f64, rec.end_y as f64);
        let start_heading =
            round_heading(Point2D::new(rec.sang1 as f64, rec.sang2 as f64));
        let end_heading = round_heading(Point2D::new(rec.eang1 as f64, rec.eang2 as f64));

        let kind = if rec.section_type == SECTION_TYPE_CURVE {
            let center = Point2D::new(rec.center_x as f64, rec.center_y as f64);
            let magnitude = if rec.radius != 0 {
                (rec.radius as f64).abs()
            } else {
                start.distance(&center)
            };
            let radius = signed_radius_from_heading(start_heading, start, center, magnitude);
            SectionKind::Curve { center, radius }
        } else {
            SectionKind::Straight
        };

        let mut section = Section {
            id,
            prev_id: rec.prev,
            next_id: rec.next,
            kind,
            start,
            end,
            start_dlong: rec.start_dlong as f64,
            length: rec.length as f64,
            start_heading,
            end_heading,
            alt: rec.alt.clone(),
            grade: rec.grade.clone(),
            fsects: rec.fsects.clone(),
            raw: RawSectionFields {
                sang1: rec.sang1,
                sang2: rec.sang2,
                eang1: rec.eang1,
                eang2: rec.eang2,
                radius: rec.radius,
                num1: rec.num1,
            },
            polyline: Vec::new(),
        };
        section.recompute()?;
        Ok(section)
    }

    /// Curve center, if any.
    #[inline]
    pub fn center(&self) -> Option<Point2D> {
        match self.kind {
            SectionKind::Curve { center, .. } => Some(center),
            SectionKind::Straight => None,
        }
    }

    /// Signed curve radius, if any.
    #[inline]
    pub fn radius(&self) -> Option<f64> {
        match self.kind {
            SectionKind::Curve { radius, .. } => Some(radius),
            SectionKind::Straight => None,
        }
    }

    /// Neighbor index as an option, treating any out-of-range value as
    /// disconnected.
    pub fn next_in(&self, count: usize) -> Option<usize> {
        index_in(self.next_id, count)
    }

    pub fn prev_in(&self, count: usize) -> Option<usize> {
        index_in(self.prev_id, count)
    }

    /// Ground strips (surface types 0..=6) in file order.
    pub fn ground_fsects(&self) -> impl Iterator<Item = &SgFsect> {
        self.fsects.iter().filter(|f| f.is_ground())
    }

    /// Copy of this section scaled uniformly about the origin. Headings
    /// are direction vectors and survive unchanged; every length-like
    /// field (coordinates, center, radius, DLONG, cached polyline)
    /// multiplies by `factor`.
    pub fn scaled(&self, factor: f64) -> Result<Section, GeometryError> {
        if !(factor > 0.0 && factor.is_finite()) {
            return Err(GeometryError::DegenerateGeometry(format!(
                "section {}: scale factor {factor} is not a positive number",
                self.id
            )));
        }
        let mut scaled = self.clone();
        scaled.start = self.start * factor;
        scaled.end = self.end * factor;
        scaled.start_dlong = self.start_dlong * factor;
        scaled.length = self.length * factor;
        if let SectionKind::Curve { center, radius } = self.kind {
            scaled.kind = SectionKind::Curve {
                center: center * factor,
                radius: radius * factor,
            };
        }
        scaled.polyline = self.polyline.iter().map(|p| *p * factor).collect();
        Ok(scaled)
    }

    /// Arc length implied by the curve geometry, `None` for straights.
    pub fn arc_length(&self) -> Option<f64> {
        let SectionKind::Curve { center, radius } = self.kind else {
            return None;
        };
        let span = arc_span(self.start, self.end, center, radius.abs(), self.start_heading)?;
        Some(span.abs() * radius.abs())
    }

    /// Rebuild every derived field from the primary ones: normalized
    /// headings, signed radius, and the cached polyline. Fails for curves
    /// whose radius or arc span collapses.
    pub fn recompute(&mut self) -> Result<(), GeometryError> {
        self.start_heading = self.start_heading.and_then(round_heading);
        self.end_heading = self.end_heading.and_then(round_heading);

        match self.kind {
            SectionKind::Straight => {
                self.polyline = vec![self.start, self.end];
                if self.start_heading.is_none() || self.end_heading.is_none() {
                    let chord = round_heading(self.end - self.start);
                    self.start_heading = self.start_heading.or(chord);
                    self.end_heading = self.end_heading.or(chord);
                }
                Ok(())
            }
            SectionKind::Curve { center, radius } => {
                let magnitude = radius.abs();
                if magnitude <= 0.0 {
                    return Err(GeometryError::DegenerateGeometry(format!(
                        "section {}: curve radius is zero",
                        self.id
                    )));
                }
                let signed =
                    signed_radius_from_heading(self.start_heading, self.start, center, magnitude);
                self.kind = SectionKind::Curve {
                    center,
                    radius: signed,
                };
                self.polyline = build_arc_polyline(
                    self.id,
                    self.start,
                    self.end,
                    center,
                    magnitude,
                    self.start_heading,
                    self.end_heading,
                )?;
                if self.start_heading.is_none() || self.end_heading.is_none() {
                    let chord = round_heading(self.end - self.start);
                    self.start_heading = self.start_heading.or(chord);
                    self.end_heading = self.end_heading.or(chord);
                }
                Ok(())
            }
        }
    }

    /// Copy this section's derived geometry back into an SG record,
    /// leaving raw fields untouched unless the geometry they encode
    /// changed.
    pub fn apply_to_sg(&self, rec: &mut SgSection) {
        rec.section_type = self.kind.type_tag();
        rec.prev = self.prev_id;
        rec.next = self.next_id;

        write_back(&mut rec.start_x, self.start.x);
        write_back(&mut rec.start_y, self.start.y);
        write_back(&mut rec.end_x, self.end.x);
        write_back(&mut rec.end_y, self.end.y);
        write_back(&mut rec.start_dlong, self.start_dlong);
        write_back(&mut rec.length, self.length);

        if let SectionKind::Curve { center, radius } = self.kind {
            write_back(&mut rec.center_x, center.x);
            write_back(&mut rec.center_y, center.y);
            write_back(&mut rec.radius, radius.abs());
        }

        // Heading ints are only regenerated when the quantized heading no
        // longer matches what the stored pair encodes.
        if let Some(h) = self.start_heading {
            let stored = round_heading(Point2D::new(rec.sang1 as f64, rec.sang2 as f64));
            if stored != Some(h) {
                rec.sang1 = heading_component(h.x);
                rec.sang2 = heading_component(h.y);
            }
        }
        if let Some(h) = self.end_heading {
            let stored = round_heading(Point2D::new(rec.eang1 as f64, rec.eang2 as f64));
            if stored != Some(h) {
                rec.eang1 = heading_component(h.x);
                rec.eang2 = heading_component(h.y);
            }
        }

        rec.num1 = self.raw.num1;
        rec.alt = self.alt.clone();
        rec.grade = self.grade.clone();
        rec.fsects = self.fsects.clone();
    }
}

#[inline]
fn index_in(id: i32, count: usize) -> Option<usize> {
    (id >= 0 && (id as usize) < count).then_some(id as usize)
}

#[inline]
fn write_back(field: &mut i32, value: f64) {
    let rounded = value.round();
    if *field as f64 != rounded {
        *field = rounded as i32;
    }
}

/// Heading component scaled back to the SG sin/cos integer encoding.
#[inline]
fn heading_component(unit: f64) -> i32 {
    (unit * (1i64 << 30) as f64).round() as i32
}

/// Return `magnitude` with the turn-direction sign: positive when the
/// center lies to the left of the heading at the start point. Falls back
/// to the unsigned magnitude when the heading is missing or the center
/// sits on the heading line.
pub fn signed_radius_from_heading(
    heading: Option<Point2D>,
    start: Point2D,
    center: Point2D,
    magnitude: f64,
) -> f64 {
    let Some(h) = heading else {
        return magnitude;
    };
    let cross = h.cross(&(center - start));
    if cross.abs() <= 1e-9 || magnitude == 0.0 {
        return magnitude;
    }
    if cross > 0.0 {
        magnitude.abs()
    } else {
        -magnitude.abs()
    }
}

/// Angle of the center→point radius vector implied by a tangent heading:
/// the radius is perpendicular to the heading, on whichever side points
/// toward `reference` (the actual radius vector).
fn heading_radius_angle(heading: Option<Point2D>, reference: Point2D) -> Option<f64> {
    let h = heading?.normalize()?;
    let heading_angle = h.y.atan2(h.x);
    let candidates = [
        heading_angle - std::f64::consts::FRAC_PI_2,
        heading_angle + std::f64::consts::FRAC_PI_2,
    ];
    let Some(r) = reference.normalize() else {
        return Some(candidates[0]);
    };
    let dot = |a: f64| a.cos() * r.x + a.sin() * r.y;
    if dot(candidates[0]) >= dot(candidates[1]) {
        Some(candidates[0])
    } else {
        Some(candidates[1])
    }
}

/// Whether a counter-clockwise sweep matches `heading` at the point whose
/// radius vector is `radius_vec`. `None` when the comparison is ambiguous.
fn heading_prefers_ccw(radius_vec: Point2D, heading: Point2D) -> Option<bool> {
    let h = heading.normalize()?;
    let v = radius_vec.normalize()?;
    let ccw_dot = v.left_normal().dot(&h);
    let cw_dot = v.right_normal().dot(&h);
    if (ccw_dot - cw_dot).abs() < 1e-9 {
        return None;
    }
    Some(ccw_dot > cw_dot)
}

/// Signed arc span from start to end around `center`, oriented by the
/// start heading when available. `None` when the radius is zero.
pub fn arc_span(
    start: Point2D,
    end: Point2D,
    center: Point2D,
    radius_magnitude: f64,
    start_heading: Option<Point2D>,
) -> Option<f64> {
    if radius_magnitude <= 0.0 {
        return None;
    }
    let start_vec = start - center;
    let end_vec = end - center;
    let start_angle = heading_radius_angle(start_heading, start_vec)
        .unwrap_or_else(|| start_vec.y.atan2(start_vec.x));
    let end_angle = end_vec.y.atan2(end_vec.x);

    let prefer_ccw = start_heading
        .and_then(|h| heading_prefers_ccw(start_vec, h))
        .unwrap_or(true);

    let mut span = normalize_angle(end_angle - start_angle);
    if prefer_ccw && span <= 0.0 {
        span += crate::core::math::TWO_PI;
    } else if !prefer_ccw && span >= 0.0 {
        span -= crate::core::math::TWO_PI;
    }
    Some(span)
}

/// Sample an arc into a polyline: steps of at most 5 degrees, at least 8
/// samples, endpoints pinned exactly to `start`/`end`.
fn build_arc_polyline(
    id: usize,
    start: Point2D,
    end: Point2D,
    center: Point2D,
    radius_magnitude: f64,
    start_heading: Option<Point2D>,
    end_heading: Option<Point2D>,
) -> Result<Vec<Point2D>, GeometryError> {
    let start_vec = start - center;
    let end_vec = end - center;

    let radius_length = if radius_magnitude > 0.0 {
        radius_magnitude
    } else {
        start_vec.length()
    };
    if radius_length <= 0.0 {
        return Err(GeometryError::DegenerateGeometry(format!(
            "section {id}: curve radius is zero"
        )));
    }

    let start_angle = heading_radius_angle(start_heading, start_vec)
        .unwrap_or_else(|| start_vec.y.atan2(start_vec.x));
    let end_angle = heading_radius_angle(end_heading, end_vec)
        .unwrap_or_else(|| end_vec.y.atan2(end_vec.x));

    let mut prefer_ccw = start_heading
        .and_then(|h| heading_prefers_ccw(start_vec, h))
        .or_else(|| end_heading.and_then(|h| heading_prefers_ccw(end_vec, h)))
        .unwrap_or_else(|| choose_ccw_direction(start_vec, end_vec));

    // A sweep whose start tangent points away from the chord is wound the
    // wrong way round the circle; flip it.
    if let Some(chord) = (end - start).normalize() {
        let tangent = if prefer_ccw {
            start_vec.left_normal()
        } else {
            start_vec.right_normal()
        };
        if let Some(t) = tangent.normalize() {
            if t.dot(&chord) < 0.0 {
                log::debug!(
                    "section {id}: arc direction flipped (radius {radius_length:.1})"
                );
                prefer_ccw = !prefer_ccw;
            }
        }
    }

    let mut span = end_angle - start_angle;
    if prefer_ccw {
        if span <= 0.0 {
            span += crate::core::math::TWO_PI;
        }
    } else if span >= 0.0 {
        span -= crate::core::math::TWO_PI;
    }

    // When the end tangent disagrees with the chord, the minor arc is the
    // right reading of a span that came out past a half circle.
    if let Some(chord) = (end - start).normalize() {
        let end_tangent = if prefer_ccw {
            end_vec.left_normal()
        } else {
            end_vec.right_normal()
        };
        if let Some(t) = end_tangent.normalize() {
            if t.dot(&chord) < 0.0 && span.abs() > std::f64::consts::PI {
                span -= crate::core::math::TWO_PI.copysign(span);
            }
        }
    }

    let total = span.abs();
    if total < MIN_ARC_SPAN {
        return Err(GeometryError::DegenerateGeometry(format!(
            "section {id}: arc span {total:.2e} rad below minimum"
        )));
    }

    let steps = ((total / MAX_ARC_STEP).ceil() as usize).max(MIN_ARC_SAMPLES);
    let mut points = Vec::with_capacity(steps + 1);
    for step in 0..=steps {
        let angle = start_angle + span * (step as f64 / steps as f64);
        points.push(center + Point2D::from_angle(angle) * radius_length);
    }
    points[0] = start;
    *points
        .last_mut()
        .ok_or_else(|| GeometryError::DegenerateGeometry(format!("section {id}: empty arc")))? =
        end;
    Ok(points)
}

fn choose_ccw_direction(start_vec: Point2D, end_vec: Point2D) -> bool {
    match (start_vec.normalize(), end_vec.normalize()) {
        (Some(s), Some(e)) => {
            let cross = s.cross(&e);
            if cross.abs() > 1e-9 {
                cross > 0.0
            } else {
                true
            }
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_straight_polyline_is_endpoints() {
        let s = Section::new_straight(0, Point2D::new(0.0, 0.0), Point2D::new(100.0, 0.0));
        assert_eq!(s.polyline, vec![s.start, s.end]);
        assert_eq!(s.length, 100.0);
        assert_eq!(s.start_heading, Some(Point2D::new(1.0, 0.0)));
    }

    #[test]
    fn test_semicircle_polyline() {
        // Quarter of a unit-50 circle swept counter-clockwise from the
        // right: start (50,0) heading up, end (-50,0).
        let mut s = Section::new_curve(
            0,
            Point2D::new(50.0, 0.0),
            Point2D::new(-50.0, 0.0),
            Point2D::new(0.0, 0.0),
            50.0,
        )
        .unwrap();
        s.start_heading = Some(Point2D::new(0.0, 1.0));
        s.recompute().unwrap();

        assert_eq!(s.polyline[0], s.start);
        assert_eq!(*s.polyline.last().unwrap(), s.end);
        assert!(s.polyline.len() >= MIN_ARC_SAMPLES + 1);
        // midpoint of a CCW semicircle sits at the top
        let mid = s.polyline[s.polyline.len() / 2];
        assert!(mid.y > 49.0, "mid = {mid:?}");
        // left turn: positive radius
        assert_eq!(s.radius(), Some(50.0));
        let span = arc_span(s.start, s.end, Point2D::new(0.0, 0.0), 50.0, s.start_heading)
            .unwrap();
        assert!((span - PI).abs() < 1e-9);
    }

    #[test]
    fn test_right_turn_radius_negative() {
        let mut s = Section::new_curve(
            1,
            Point2D::new(-50.0, 0.0),
            Point2D::new(50.0, 0.0),
            Point2D::new(0.0, 0.0),
            50.0,
        )
        .unwrap();
        // heading up at (-50,0) with center to the right
        s.start_heading = Some(Point2D::new(0.0, 1.0));
        s.recompute().unwrap();
        assert_eq!(s.radius(), Some(-50.0));
        let span = arc_span(s.start, s.end, Point2D::new(0.0, 0.0), 50.0, s.start_heading)
            .unwrap();
        assert!((span + PI).abs() < 1e-9);
    }

    #[test]
    fn test_zero_radius_rejected() {
        let err = Section::new_curve(
            0,
            Point2D::new(0.0, 0.0),
            Point2D::new(0.0, 0.0),
            Point2D::new(0.0, 0.0),
            0.0,
        )
        .unwrap_err();
        assert!(matches!(err, GeometryError::DegenerateGeometry(_)));
    }

    #[test]
    fn test_arc_sampling_density() {
        // 90 degree arc: about 18 steps of at most 5 degrees each.
        let s = Section::new_curve(
            0,
            Point2D::new(50.0, 0.0),
            Point2D::new(0.0, 50.0),
            Point2D::new(0.0, 0.0),
            50.0,
        )
        .unwrap();
        assert!(s.polyline.len() >= MIN_ARC_SAMPLES + 1);
        for pair in s.polyline.windows(2) {
            let a = (pair[0] - Point2D::new(0.0, 0.0)).angle();
            let b = (pair[1] - Point2D::new(0.0, 0.0)).angle();
            assert!(normalize_angle(b - a).abs() <= MAX_ARC_STEP + 1e-9);
        }
    }

    #[test]
    fn test_disconnected_neighbor_ids() {
        let mut s = Section::new_straight(0, Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0));
        s.next_id = -1;
        s.prev_id = 7;
        assert_eq!(s.next_in(5), None);
        assert_eq!(s.prev_in(5), None);
        s.prev_id = 4;
        assert_eq!(s.prev_in(5), Some(4));
    }

    #[test]
    fn test_scaled_curve_doubles_lengths_keeps_headings() {
        let mut s = Section::new_curve(
            0,
            Point2D::new(50.0, 0.0),
            Point2D::new(0.0, 50.0),
            Point2D::new(0.0, 0.0),
            50.0,
        )
        .unwrap();
        s.start_dlong = 120.0;
        let doubled = s.scaled(2.0).unwrap();
        assert_eq!(doubled.start, Point2D::new(100.0, 0.0));
        assert_eq!(doubled.end, Point2D::new(0.0, 100.0));
        assert_eq!(doubled.radius(), Some(100.0));
        assert_eq!(doubled.start_dlong, 240.0);
        assert!((doubled.length - 2.0 * s.length).abs() < 1e-9);
        assert_eq!(doubled.start_heading, s.start_heading);
        assert_eq!(doubled.end_heading, s.end_heading);
        assert_eq!(doubled.polyline.len(), s.polyline.len());

        assert!(s.scaled(0.0).is_err());
        assert!(s.scaled(f64::NAN).is_err());
    }

    #[test]
    fn test_sg_roundtrip_preserves_raw_fields() {
        let rec = SgSection {
            section_type: SECTION_TYPE_CURVE,
            next: 1,
            prev: 3,
            start_x: 25_000,
            start_y: 0,
            end_x: -25_000,
            end_y: 0,
            start_dlong: 0,
            length: 78_540,
            center_x: 0,
            center_y: 0,
            sang1: 0,
            sang2: 1 << 30,
            eang1: 0,
            eang2: -(1 << 30),
            radius: 25_000,
            num1: 42,
            alt: vec![0, 100, 0],
            grade: vec![0, 0, 0],
            fsects: vec![SgFsect {
                ftype1: 0,
                ftype2: 0,
                fstart: -6000,
                fend: 6000,
            }],
        };
        let section = Section::from_sg(2, &rec).unwrap();
        assert_eq!(section.id, 2);
        assert!(section.kind.is_curve());
        assert_eq!(section.raw.num1, 42);

        let mut back = rec.clone();
        section.apply_to_sg(&mut back);
        assert_eq!(back, rec);
    }
}
