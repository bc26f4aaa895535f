//! Continuous centerline derived from the section ring.
//!
//! The centerline is a read-only snapshot: a flattened point sequence
//! with the DLONG at each point, plus a uniform-grid spatial index for
//! nearest-point queries. It is rebuilt wholesale after every geometry
//! edit; resampling is cheap next to how rarely edits happen, and an
//! immutable snapshot is safe to hand to a background integrity pass.

pub mod index;
pub mod sample;

pub use index::{CenterlineIndex, Projection};
pub use sample::{getxyz, sample_centerline, TrackPoint};

use crate::core::{Bounds, Point2D};
use crate::ring::TrackRing;
use serde::{Deserialize, Serialize};

/// Flattened centerline snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Centerline {
    /// Points in ring order; for a closed ring the last equals the first.
    pub points: Vec<Point2D>,
    /// DLONG at each point.
    pub dlongs: Vec<f64>,
    pub bounds: Bounds,
    pub track_length: f64,
}

impl Centerline {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.len() < 2
    }

    /// Flatten the section polylines directly, using cumulative polyline
    /// arc length as the DLONG parameter. Consecutive duplicate points at
    /// section joins collapse into one.
    pub fn from_sections(ring: &TrackRing) -> Centerline {
        let mut points: Vec<Point2D> = Vec::new();
        for section in &ring.sections {
            for point in &section.polyline {
                if points.last() == Some(point) {
                    continue;
                }
                points.push(*point);
            }
        }
        if points.len() < 2 {
            return Centerline::default();
        }

        let bounds = Bounds::of_points(&points).unwrap_or_else(Bounds::empty);
        let mut dlongs = Vec::with_capacity(points.len());
        let mut distance = 0.0;
        dlongs.push(0.0);
        for pair in points.windows(2) {
            distance += pair[0].distance(&pair[1]);
            dlongs.push(distance);
        }

        Centerline {
            points,
            dlongs,
            bounds,
            track_length: distance,
        }
    }

    /// Build the spatial index for this snapshot.
    pub fn build_index(&self, grid_target_cells: f64) -> CenterlineIndex {
        CenterlineIndex::build(&self.points, self.bounds, grid_target_cells)
    }
}
