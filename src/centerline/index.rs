//! Uniform-grid spatial index over the flattened centerline.
//!
//! Cells are sized so roughly 64 of them span the longer bounding-box
//! axis, floored at 1.0 world unit so tiny tracks still get
//! non-degenerate cells. Queries expand ring by ring (radius 0, 1, 2)
//! and stop at the first radius that yields candidates; if the whole
//! grid misses, the query degrades to an exhaustive segment scan.

use crate::core::{Bounds, Point2D};
use std::collections::HashMap;

/// Result of projecting a query point onto the centerline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// Closest point on the centerline.
    pub point: Point2D,
    /// Interpolated DLONG at that point.
    pub dlong: f64,
    pub distance_squared: f64,
}

/// Grid index mapping cells to the centerline segments crossing them.
#[derive(Clone, Debug, Default)]
pub struct CenterlineIndex {
    points: Vec<Point2D>,
    grid: HashMap<(i64, i64), Vec<usize>>,
    origin: Point2D,
    cell_size: f64,
}

impl CenterlineIndex {
    /// Index the closed polyline `points` (segment `i` runs from point
    /// `i` to point `(i + 1) % len`).
    pub fn build(points: &[Point2D], bounds: Bounds, grid_target_cells: f64) -> CenterlineIndex {
        let mut index = CenterlineIndex {
            points: points.to_vec(),
            grid: HashMap::new(),
            origin: bounds.min,
            cell_size: 1.0,
        };
        if points.len() < 2 || bounds.is_empty() {
            return index;
        }

        let span = bounds.width().max(bounds.height());
        if span <= 0.0 {
            return index;
        }
        index.cell_size = (span / grid_target_cells).max(1.0);

        for seg in 0..points.len() {
            let start = points[seg];
            let end = points[(seg + 1) % points.len()];
            let (gx0, gy0) = index.cell_of(Point2D::new(
                start.x.min(end.x),
                start.y.min(end.y),
            ));
            let (gx1, gy1) = index.cell_of(Point2D::new(
                start.x.max(end.x),
                start.y.max(end.y),
            ));
            for gx in gx0..=gx1 {
                for gy in gy0..=gy1 {
                    index.grid.entry((gx, gy)).or_default().push(seg);
                }
            }
        }
        index
    }

    #[inline]
    fn cell_of(&self, point: Point2D) -> (i64, i64) {
        (
            ((point.x - self.origin.x) / self.cell_size).floor() as i64,
            ((point.y - self.origin.y) / self.cell_size).floor() as i64,
        )
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.points.len()
    }

    /// Candidate segments near a query point: grid cells at expanding
    /// radius, falling back to every segment when the grid yields none.
    pub fn query_segments(&self, query: Point2D) -> Vec<usize> {
        if self.grid.is_empty() {
            return (0..self.segment_count()).collect();
        }
        let (gx, gy) = self.cell_of(query);

        let mut candidates: Vec<usize> = Vec::new();
        for radius in 0..3i64 {
            for cx in (gx - radius)..=(gx + radius) {
                for cy in (gy - radius)..=(gy + radius) {
                    if let Some(segs) = self.grid.get(&(cx, cy)) {
                        candidates.extend_from_slice(segs);
                    }
                }
            }
            if !candidates.is_empty() {
                break;
            }
        }
        if candidates.is_empty() {
            return (0..self.segment_count()).collect();
        }
        candidates.sort_unstable();
        candidates.dedup();
        candidates
    }

    /// Closest point on the polyline to `query`, with its interpolated
    /// DLONG. Grid-accelerated: only the first non-empty cell block is
    /// scanned, so for a query sitting right on a cell boundary the
    /// result may land on the neighboring segment of the true nearest
    /// one. `None` when the index is empty or the track length is not
    /// positive.
    pub fn project_point(
        &self,
        query: Point2D,
        dlongs: &[f64],
        track_length: f64,
    ) -> Option<Projection> {
        self.project_over(self.query_segments(query), query, dlongs, track_length)
    }

    /// Exhaustive variant of [`project_point`]; the two must agree.
    pub fn project_point_exhaustive(
        &self,
        query: Point2D,
        dlongs: &[f64],
        track_length: f64,
    ) -> Option<Projection> {
        self.project_over(
            (0..self.segment_count()).collect(),
            query,
            dlongs,
            track_length,
        )
    }

    fn project_over(
        &self,
        segments: Vec<usize>,
        query: Point2D,
        dlongs: &[f64],
        track_length: f64,
    ) -> Option<Projection> {
        if self.points.len() < 2 || dlongs.len() != self.points.len() || track_length <= 0.0 {
            return None;
        }

        let mut best: Option<Projection> = None;
        for seg in segments {
            let start = self.points[seg];
            let end = self.points[(seg + 1) % self.points.len()];
            let v = end - start;
            let den = v.dot(&v);
            if den == 0.0 {
                continue;
            }

            let start_dlong = dlongs[seg];
            let end_dlong = dlongs[(seg + 1) % dlongs.len()];
            let mut dlong_delta = end_dlong - start_dlong;
            if dlong_delta <= 0.0 {
                dlong_delta += track_length;
            }

            let t = ((query - start).dot(&v) / den).clamp(0.0, 1.0);
            let projected = start + v * t;
            let distance_squared = query.distance_squared(&projected);

            if best.map_or(true, |b| distance_squared < b.distance_squared) {
                let mut dlong = start_dlong + dlong_delta * t;
                if dlong >= track_length {
                    dlong -= track_length;
                }
                best = Some(Projection {
                    point: projected,
                    dlong,
                    distance_squared,
                });
            }
        }
        best
    }
}
