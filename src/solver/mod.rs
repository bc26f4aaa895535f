//! Curve fitting from partial constraints.
//!
//! The solver reconstructs a curve (center, radius, headings) from
//! incomplete inputs during interactive edits: two endpoints plus one
//! fixed tangent heading, or a dragged endpoint of an existing curve.
//! Every returned fit satisfies the circle constraints exactly (it comes
//! out of a closed-form construction, not an iterative fit); candidate
//! selection is what the tolerances govern. On failure the caller keeps
//! its previous geometry untouched, since failures are routine during a
//! live drag.

pub mod primitives;

use crate::config::SolverConfig;
use crate::core::math::heading_angle_error;
use crate::core::Point2D;
use crate::section::{Section, SectionKind};
use primitives::{curve_arc_length, curve_center_from_fixed_heading, curve_tangent_heading};
use thiserror::Error;

/// No candidate curve satisfied the constraints within tolerance. A
/// recoverable, expected condition while dragging.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    #[error("cannot solve curve: {0}")]
    CannotSolve(String),
}

/// A solved curve. `radius` is the unsigned magnitude; `orientation` is
/// +1.0 for counter-clockwise, -1.0 for clockwise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveFit {
    pub center: Point2D,
    pub radius: f64,
    pub orientation: f64,
    pub start_heading: Point2D,
    pub end_heading: Point2D,
    pub arc_length: f64,
}

/// Find the circle through `start` and `end` whose tangent at the fixed
/// endpoint matches `fixed_heading`. Both sweep orientations are tried,
/// starting from `orientation_hint`; geometrically invalid ones (center
/// behind the direction of travel) drop out of the closed form. When both
/// survive, the shorter arc wins.
pub fn solve_fixed_heading(
    start: Point2D,
    end: Point2D,
    fixed_point_is_start: bool,
    fixed_heading: Point2D,
    orientation_hint: f64,
) -> Result<CurveFit, SolverError> {
    let hint = if orientation_hint < 0.0 { -1.0 } else { 1.0 };
    let candidates = fixed_heading_candidates(start, end, fixed_point_is_start, fixed_heading, hint);

    candidates
        .into_iter()
        .min_by(|a, b| {
            a.arc_length
                .total_cmp(&b.arc_length)
                .then(a.orientation.total_cmp(&b.orientation))
        })
        .ok_or_else(|| {
            SolverError::CannotSolve(format!(
                "no circle through ({:.1},{:.1})-({:.1},{:.1}) is tangent to the fixed heading",
                start.x, start.y, end.x, end.y
            ))
        })
}

fn fixed_heading_candidates(
    start: Point2D,
    end: Point2D,
    fixed_point_is_start: bool,
    fixed_heading: Point2D,
    orientation_hint: f64,
) -> Vec<CurveFit> {
    let (fixed_point, moving_point) = if fixed_point_is_start {
        (start, end)
    } else {
        (end, start)
    };

    let mut candidates = Vec::with_capacity(2);
    for orientation in [orientation_hint, -orientation_hint] {
        let Some((center, radius)) =
            curve_center_from_fixed_heading(fixed_point, moving_point, fixed_heading, orientation)
        else {
            log::trace!("fixed-heading solve: orientation {orientation:+.0} has no valid center");
            continue;
        };
        let (Some(start_heading), Some(end_heading)) = (
            curve_tangent_heading(center, start, orientation),
            curve_tangent_heading(center, end, orientation),
        ) else {
            continue;
        };
        let Some(arc_length) = curve_arc_length(center, start, end, radius) else {
            continue;
        };
        candidates.push(CurveFit {
            center,
            radius,
            orientation,
            start_heading,
            end_heading,
            arc_length,
        });
    }
    candidates
}

/// Refit an existing curve after one endpoint moved to a new position.
///
/// When exactly one endpoint moved and the opposite endpoint has a known
/// heading, the fit preserves that heading exactly. Otherwise the center
/// is searched along the perpendicular bisector of the new chord, scoring
/// candidates against the previous curve (heading drift weighted 2.0,
/// excess radius change 0.05, center drift 0.01).
pub fn solve_drag(
    section: &Section,
    start: Point2D,
    end: Point2D,
    config: &SolverConfig,
) -> Result<CurveFit, SolverError> {
    if start == end {
        return Err(SolverError::CannotSolve(
            "degenerate drag: endpoints coincide".into(),
        ));
    }

    let center_hint = section.center().unwrap_or(start);
    let orientation_hint = curve_orientation_hint(section);

    let moved_start = start != section.start;
    let moved_end = end != section.end;
    let heading_preserving = if moved_start && !moved_end {
        section
            .end_heading
            .map(|h| fixed_heading_candidates(start, end, false, h, orientation_hint))
            .unwrap_or_default()
    } else if moved_end && !moved_start {
        section
            .start_heading
            .map(|h| fixed_heading_candidates(start, end, true, h, orientation_hint))
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    let pinned = if moved_start { section.end_heading } else { section.start_heading };
    let mut best: Option<(f64, CurveFit)> = None;
    for fit in heading_preserving {
        if fit.arc_length / fit.radius < config.min_arc_span {
            continue;
        }
        let solved = if moved_start { Some(fit.end_heading) } else { Some(fit.start_heading) };
        if heading_angle_error(pinned, solved) > config.tangency_tolerance {
            continue;
        }
        let score = solution_metric(&fit, section, config.fit_tolerance);
        if best.as_ref().map_or(true, |(s, _)| score < *s) {
            best = Some((score, fit));
        }
    }
    if let Some((score, fit)) = best {
        log::debug!(
            "drag solve kept fixed heading: radius {:.1}, score {score:.4}",
            fit.radius
        );
        return Ok(fit);
    }

    // Fallback: pick the circle center along the perpendicular bisector of
    // the new chord, trying the offset that preserves the old radius, the
    // offset nearest the old center, and their blend.
    let chord = end - start;
    let chord_length = chord.length();
    if chord_length <= 1e-6 {
        return Err(SolverError::CannotSolve("chord length is zero".into()));
    }
    let half_chord = chord_length / 2.0;
    let mid = start + chord * 0.5;
    let normal = Point2D::new(-chord.y / chord_length, chord.x / chord_length);

    let offset_from_center = (center_hint - mid).dot(&normal);
    let offset_sign = if offset_from_center >= 0.0 { 1.0 } else { -1.0 };

    let radius_target = section.radius().map(f64::abs).filter(|r| *r > 0.0);
    let offset_for_radius = radius_target
        .filter(|r| *r > half_chord)
        .map(|r| (r * r - half_chord * half_chord).max(0.0).sqrt() * offset_sign);

    let preferred_offset = offset_sign * offset_from_center.abs().max(config.fit_tolerance);

    let mut offsets = Vec::with_capacity(3);
    if let Some(o) = offset_for_radius {
        offsets.push(o);
    }
    offsets.push(preferred_offset);
    if let Some(o) = offset_for_radius {
        offsets.push((o + preferred_offset) / 2.0);
    }

    for offset in offsets {
        if offset == 0.0 {
            continue;
        }
        let center = mid + normal * offset;
        let radius = start.distance(&center);
        if radius <= half_chord {
            continue;
        }
        let orientation = if offset > 0.0 { 1.0 } else { -1.0 };
        let (Some(start_heading), Some(end_heading)) = (
            curve_tangent_heading(center, start, orientation),
            curve_tangent_heading(center, end, orientation),
        ) else {
            continue;
        };
        let Some(arc_length) = curve_arc_length(center, start, end, radius) else {
            continue;
        };
        if arc_length / radius < config.min_arc_span {
            continue;
        }
        let fit = CurveFit {
            center,
            radius,
            orientation,
            start_heading,
            end_heading,
            arc_length,
        };
        let score = solution_metric(&fit, section, config.fit_tolerance);
        if best.as_ref().map_or(true, |(s, _)| score < *s) {
            best = Some((score, fit));
        }
    }

    best.map(|(_, fit)| fit).ok_or_else(|| {
        SolverError::CannotSolve(format!(
            "no candidate center fits chord ({:.1},{:.1})-({:.1},{:.1})",
            start.x, start.y, end.x, end.y
        ))
    })
}

/// Score a candidate against the curve being edited; lower is better.
fn solution_metric(fit: &CurveFit, section: &Section, tolerance: f64) -> f64 {
    let center_penalty = section
        .center()
        .map(|c| fit.center.distance(&c) * 0.01)
        .unwrap_or(0.0);

    let radius_penalty = section
        .radius()
        .map(f64::abs)
        .filter(|r| *r > 0.0)
        .map(|r| ((fit.radius - r).abs() - tolerance).max(0.0) * 0.05)
        .unwrap_or(0.0);

    let heading_penalty = heading_angle_error(section.start_heading, Some(fit.start_heading))
        + heading_angle_error(section.end_heading, Some(fit.end_heading));

    heading_penalty * 2.0 + radius_penalty + center_penalty
}

/// Sweep orientation implied by the section's current geometry: the
/// start→end sweep around the stored center when present, otherwise the
/// turn between the stored headings, defaulting to counter-clockwise.
pub fn curve_orientation_hint(section: &Section) -> f64 {
    if let Some(center) = section.center() {
        let cross = (section.start - center).cross(&(section.end - center));
        if cross.abs() > 1e-9 {
            return if cross > 0.0 { 1.0 } else { -1.0 };
        }
    }
    if let (Some(sh), Some(eh)) = (section.start_heading, section.end_heading) {
        let cross = sh.cross(&eh);
        if cross.abs() > 1e-9 {
            return if cross > 0.0 { 1.0 } else { -1.0 };
        }
    }
    1.0
}

/// Install a fit into a copy of `section` with the given endpoints. The
/// input section is untouched, so a degenerate result leaves the caller's
/// geometry intact.
pub fn apply_fit(
    section: &Section,
    start: Point2D,
    end: Point2D,
    fit: &CurveFit,
) -> Result<Section, crate::section::GeometryError> {
    let mut updated = section.clone();
    updated.start = start;
    updated.end = end;
    updated.kind = SectionKind::Curve {
        center: fit.center,
        radius: fit.radius,
    };
    updated.start_heading = Some(fit.start_heading);
    updated.end_heading = Some(fit.end_heading);
    updated.length = fit.arc_length;
    updated.recompute()?;
    Ok(updated)
}
