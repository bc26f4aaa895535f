//! Ground surface mesh builder.
//!
//! Each section's ground strips become quads bounded by interpolated
//! DLAT edges at the subsection's start/end DLONG, with corners placed
//! through the forward (DLONG, DLAT) mapping so the quads follow track
//! curvature. Curves are subdivided into roughly 60k-unit slices;
//! straights always get a single slice. Strips sweep right-to-left
//! starting from the outermost boundary edge, each strip's right edge
//! becoming the next one's left.

use crate::centerline::sample::getxyz;
use crate::config::MeshConfig;
use crate::core::{Bounds, Point2D};
use crate::elevation::ElevationProfile;
use crate::ring::TrackRing;
use crate::section::Section;

/// One ground strip slice as a world-space quad.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceQuad {
    /// Corners in sweep order: left-start, left-end, right-end,
    /// right-start.
    pub points: [Point2D; 4],
    /// SG surface type of the source strip.
    pub surface_type: i32,
    pub section_index: usize,
}

/// Build the ground quads for every section with at least one ground
/// strip. Quads whose area falls below `config.min_quad_area` are
/// dropped.
pub fn build_ground_surface_mesh(
    ring: &TrackRing,
    profile: &ElevationProfile,
    config: &MeshConfig,
) -> Vec<SurfaceQuad> {
    let lookup = ring.dlong_lookup();
    let mut quads = Vec::new();

    for (section_index, section) in ring.sections.iter().enumerate() {
        let grounds: Vec<_> = section.ground_fsects().collect();
        if grounds.is_empty() {
            continue;
        }

        let num_subsects = if section.kind.is_curve() {
            ((section.length / config.curve_subsection_length).round() as usize).max(1)
        } else {
            1
        };

        let Some((left_boundary_start, left_boundary_end)) = outer_left_edge(section) else {
            continue;
        };

        let start_dlong = section.start_dlong;
        let subsection_length = section.length / num_subsects as f64;
        let left_increment = (left_boundary_end - left_boundary_start) / num_subsects as f64;

        for sub in 0..num_subsects {
            let sub_start = start_dlong + subsection_length * sub as f64;
            let sub_end = if sub == num_subsects - 1 {
                start_dlong + section.length
            } else {
                start_dlong + subsection_length * (sub + 1) as f64
            };

            let mut left_start = left_boundary_start + left_increment * sub as f64;
            let mut left_end = left_boundary_start + left_increment * (sub + 1) as f64;

            for fsect in grounds.iter().rev() {
                let right_total_start = fsect.fstart as f64;
                let right_total_end = fsect.fend as f64;
                let right_span = right_total_end - right_total_start;

                let right_start =
                    right_total_start + right_span * (sub as f64 / num_subsects as f64);
                let right_end =
                    right_total_start + right_span * ((sub + 1) as f64 / num_subsects as f64);

                let corners = [
                    (sub_start, left_start),
                    (sub_end, left_end),
                    (sub_end, right_end),
                    (sub_start, right_start),
                ];
                let mut points = [Point2D::ZERO; 4];
                let mut resolved = true;
                for (slot, (dlong, dlat)) in corners.into_iter().enumerate() {
                    match getxyz(ring, profile, &lookup, dlong, dlat) {
                        Some(sample) => points[slot] = sample.position,
                        None => {
                            resolved = false;
                            break;
                        }
                    }
                }

                // A culled sliver keeps the current left edge so it
                // merges into the next strip.
                if resolved && polygon_area(&points) > config.min_quad_area {
                    quads.push(SurfaceQuad {
                        points,
                        surface_type: fsect.ftype1,
                        section_index,
                    });
                    left_start = right_start;
                    left_end = right_end;
                }
            }
        }
    }

    quads
}

/// Axis-aligned bounds over every quad corner, `None` for an empty mesh.
pub fn mesh_bounds(quads: &[SurfaceQuad]) -> Option<Bounds> {
    let mut bounds = Bounds::empty();
    for quad in quads {
        for point in quad.points {
            bounds.expand_to_include(point);
        }
    }
    (!bounds.is_empty()).then_some(bounds)
}

/// DLAT edge the sweep starts from: the last boundary strip's span, or
/// the first ground strip's start edge when the section has no
/// boundaries.
fn outer_left_edge(section: &Section) -> Option<(f64, f64)> {
    if let Some(boundary) = section.fsects.iter().filter(|f| !f.is_ground()).last() {
        return Some((boundary.fstart as f64, boundary.fend as f64));
    }
    section
        .ground_fsects()
        .next()
        .map(|f| (f.fstart as f64, f.fstart as f64))
}

/// Shoelace area of a polygon.
fn polygon_area(points: &[Point2D]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        area += p.x * q.y - q.x * p.y;
    }
    area.abs() * 0.5
}
