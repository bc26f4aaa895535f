//! Topology edits: delete, insert, split, start/finish reassignment.
//!
//! Every edit keeps the ring consistent before returning: ids are
//! renumbered to match list positions, neighbor links are remapped, DLONG
//! offsets are re-walked from section 0, and cached section geometry is
//! rebuilt. Out-of-range indices are explicit errors, never silent no-ops.

use super::TrackRing;
use crate::config::SolverConfig;
use crate::core::Point2D;
use crate::section::invariants::CONTINUITY_TOLERANCE;
use crate::section::{GeometryError, Section, SectionKind};
use crate::solver::{apply_fit, solve_drag, SolverError};
use thiserror::Error;

/// Fraction band within which a straight may be split; splits closer to
/// an endpoint than this produce slivers and are rejected.
const SPLIT_MARGIN: f64 = 0.02;

/// Topology operation failures. The ring is left unchanged on error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TopologyError {
    #[error("section index {index} out of range for {count} sections")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("track must be a closed loop to {0}")]
    NotAClosedLoop(&'static str),

    #[error("section {0} is not a straight")]
    NotAStraight(usize),

    #[error("section {0} is not a curve")]
    NotACurve(usize),

    #[error("split point at fraction {0:.3} is too close to a section endpoint")]
    SplitTooCloseToEnd(f64),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Solver(#[from] SolverError),
}

impl TrackRing {
    fn check_index(&self, index: usize) -> Result<(), TopologyError> {
        if index >= self.len() {
            return Err(TopologyError::IndexOutOfRange {
                index,
                count: self.len(),
            });
        }
        Ok(())
    }

    /// Remove a section, reconnecting its former neighbors to each other,
    /// then renumber ids and re-walk DLONG.
    pub fn delete_section(&mut self, index: usize) -> Result<(), TopologyError> {
        self.check_index(index)?;
        let count = self.len();

        let removed = self.sections.remove(index);
        let prev = removed.prev_in(count).filter(|p| *p != index);
        let next = removed.next_in(count).filter(|n| *n != index);

        // Old index -> new index for the survivors.
        let remap = |old: i32| -> i32 {
            if old < 0 || old as usize >= count || old as usize == index {
                -1
            } else if (old as usize) > index {
                old - 1
            } else {
                old
            }
        };

        for (new_id, section) in self.sections.iter_mut().enumerate() {
            section.id = new_id;
            section.prev_id = remap(section.prev_id);
            section.next_id = remap(section.next_id);
        }

        // Bridge the gap the removed section left behind, both in the
        // links and in the endpoint geometry.
        if let (Some(prev), Some(next)) = (prev, next) {
            let prev_new = remap(prev as i32);
            let next_new = remap(next as i32);
            if prev_new >= 0 && next_new >= 0 && prev_new != next_new {
                self.sections[prev_new as usize].next_id = next_new;
                self.sections[next_new as usize].prev_id = prev_new;
                self.close_gap(prev_new as usize, next_new as usize)?;
            }
        }

        self.recompute_sections()?;
        Ok(())
    }

    /// Pull two newly adjacent sections onto a shared endpoint. A straight
    /// side is re-pointed; when both sides are curves the earlier one is
    /// re-fit through the drag solver.
    fn close_gap(&mut self, prev: usize, next: usize) -> Result<(), TopologyError> {
        let gap = self.sections[prev].end.distance(&self.sections[next].start);
        if gap <= CONTINUITY_TOLERANCE {
            return Ok(());
        }
        if !self.sections[prev].kind.is_curve() {
            let target = self.sections[next].start;
            let section = &mut self.sections[prev];
            section.end = target;
            section.length = section.start.distance(&target);
            section.start_heading = None;
            section.end_heading = None;
        } else if !self.sections[next].kind.is_curve() {
            let target = self.sections[prev].end;
            let section = &mut self.sections[next];
            section.start = target;
            section.length = target.distance(&section.end);
            section.start_heading = None;
            section.end_heading = None;
        } else {
            let section = &self.sections[prev];
            let target = self.sections[next].start;
            let fit = solve_drag(section, section.start, target, &SolverConfig::default())?;
            self.sections[prev] = apply_fit(section, section.start, target, &fit)?;
        }
        Ok(())
    }

    /// Append `section` and, when the section at `after_index` has a
    /// disconnected forward end, wire the new section in behind it.
    /// Otherwise the new section stays a dangling branch. Returns the new
    /// section's index.
    pub fn insert_section_after(
        &mut self,
        after_index: usize,
        mut section: Section,
    ) -> Result<usize, TopologyError> {
        self.check_index(after_index)?;
        let new_index = self.len();

        section.id = new_index;
        section.prev_id = -1;
        section.next_id = -1;
        if self.sections[after_index].next_in(new_index).is_none() {
            self.sections[after_index].next_id = new_index as i32;
            section.prev_id = after_index as i32;
        }
        self.sections.push(section);

        self.recompute_sections()?;
        Ok(new_index)
    }

    /// Split a straight at the projection of `split_point` onto it. Both
    /// halves keep a deep copy of the original's fsect list, so later
    /// surface edits to one half never leak into the other.
    pub fn split_straight(
        &mut self,
        index: usize,
        split_point: Point2D,
    ) -> Result<(), TopologyError> {
        self.check_index(index)?;
        let section = &self.sections[index];
        if section.kind.is_curve() {
            return Err(TopologyError::NotAStraight(index));
        }

        let v = section.end - section.start;
        let den = v.dot(&v);
        if den <= 0.0 {
            return Err(TopologyError::Geometry(GeometryError::DegenerateGeometry(
                format!("section {index}: zero-length straight cannot be split"),
            )));
        }
        let t = (split_point - section.start).dot(&v) / den;
        if t <= SPLIT_MARGIN || t >= 1.0 - SPLIT_MARGIN {
            return Err(TopologyError::SplitTooCloseToEnd(t));
        }
        let split = section.start + v * t;

        let mut first = section.clone();
        let mut second = section.clone();
        first.end = split;
        second.start = split;
        self.install_split(index, first, second)
    }

    /// Split a curve at the point on its circle nearest `split_point`.
    pub fn split_curve(
        &mut self,
        index: usize,
        split_point: Point2D,
    ) -> Result<(), TopologyError> {
        self.check_index(index)?;
        let section = &self.sections[index];
        let SectionKind::Curve { center, radius } = section.kind else {
            return Err(TopologyError::NotACurve(index));
        };

        let magnitude = radius.abs();
        let split_unit = (split_point - center).normalize().ok_or_else(|| {
            GeometryError::DegenerateGeometry(format!(
                "section {index}: split point coincides with the curve center"
            ))
        })?;
        let split = center + split_unit * magnitude;

        let orientation = if radius >= 0.0 { 1.0 } else { -1.0 };
        let start_angle = (section.start - center).angle();
        let end_angle = (section.end - center).angle();
        let split_angle = (split - center).angle();

        let total_span = directed_angle(start_angle, end_angle, orientation);
        let split_span = directed_angle(start_angle, split_angle, orientation);
        let fraction = split_span / total_span;
        if fraction <= SPLIT_MARGIN || fraction >= 1.0 - SPLIT_MARGIN {
            return Err(TopologyError::SplitTooCloseToEnd(fraction));
        }

        let split_heading = crate::solver::primitives::curve_tangent_heading(
            center,
            split,
            orientation,
        )
        .ok_or_else(|| {
            GeometryError::DegenerateGeometry(format!(
                "section {index}: degenerate tangent at the split point"
            ))
        })?;

        let mut first = section.clone();
        let mut second = section.clone();
        first.end = split;
        first.end_heading = Some(split_heading);
        first.length = section.length * fraction;
        second.start = split;
        second.start_heading = Some(split_heading);
        second.length = section.length * (1.0 - fraction);
        self.install_split(index, first, second)
    }

    fn install_split(
        &mut self,
        index: usize,
        mut first: Section,
        mut second: Section,
    ) -> Result<(), TopologyError> {
        let count = self.len();
        // Every old index past the split shifts up by one.
        let adjust = |old: i32| -> i32 {
            if old < 0 || old as usize >= count {
                -1
            } else if (old as usize) > index {
                old + 1
            } else {
                old
            }
        };

        first.prev_id = adjust(first.prev_id);
        first.next_id = (index + 1) as i32;
        second.prev_id = index as i32;
        second.next_id = adjust(second.next_id);
        if !first.kind.is_curve() {
            first.length = first.start.distance(&first.end);
            second.length = second.start.distance(&second.end);
        }

        for section in &mut self.sections {
            section.prev_id = adjust(section.prev_id);
            section.next_id = adjust(section.next_id);
        }
        let first_prev = first.prev_id;
        let second_next = second.next_id;

        self.sections.splice(index..=index, [first, second]);
        if first_prev >= 0 {
            self.sections[first_prev as usize].next_id = index as i32;
        }
        if second_next >= 0 {
            self.sections[second_next as usize].prev_id = (index + 1) as i32;
        }

        self.recompute_sections()?;
        Ok(())
    }

    /// Re-root DLONG zero at `start_index`: reorder the list into
    /// traversal order starting there, relink 0-1-...-n-0, and re-walk
    /// DLONG. Requires a closed loop.
    pub fn set_start_finish(&mut self, start_index: usize) -> Result<(), TopologyError> {
        self.check_index(start_index)?;
        if !self.is_closed_loop() {
            return Err(TopologyError::NotAClosedLoop("set the start/finish line"));
        }

        let n = self.len();
        let mut order = Vec::with_capacity(n);
        let mut i = start_index;
        for _ in 0..n {
            order.push(i);
            // closed-loop check above guarantees the link is valid
            i = self.sections[i].next_id as usize;
        }

        let mut reordered = Vec::with_capacity(n);
        for (new_id, old_index) in order.iter().enumerate() {
            let mut section = self.sections[*old_index].clone();
            section.id = new_id;
            section.prev_id = ((new_id + n - 1) % n) as i32;
            section.next_id = ((new_id + 1) % n) as i32;
            reordered.push(section);
        }
        self.sections = reordered;

        self.recompute_sections()?;
        Ok(())
    }

    /// Renumber ids, re-walk DLONG, and rebuild cached geometry. Shared
    /// tail of every edit.
    fn recompute_sections(&mut self) -> Result<(), TopologyError> {
        for (id, section) in self.sections.iter_mut().enumerate() {
            section.id = id;
            section.recompute()?;
        }
        self.recompute_dlongs();
        Ok(())
    }
}

/// Angle swept from `start_angle` to `end_angle` in the given orientation,
/// always non-zero in that direction.
fn directed_angle(start_angle: f64, end_angle: f64, orientation: f64) -> f64 {
    let mut angle = end_angle - start_angle;
    if orientation > 0.0 {
        while angle <= 0.0 {
            angle += crate::core::math::TWO_PI;
        }
    } else {
        while angle >= 0.0 {
            angle -= crate::core::math::TWO_PI;
        }
    }
    angle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::test_ring::{rectangle, stadium};

    #[test]
    fn test_delete_relinks_neighbors() {
        // five-section ring: rectangle plus one extra straight spliced in
        let mut ring = rectangle(1000.0, 500.0);
        let mid = Point2D::new(500.0, 0.0);
        ring.split_straight(0, mid).unwrap();
        assert_eq!(ring.len(), 5);
        assert!(ring.is_closed_loop());

        ring.delete_section(2).unwrap();
        assert_eq!(ring.len(), 4);
        // former section 3 is now index 2 and section 1 points at it
        assert_eq!(ring.sections[1].next_id, 2);
        assert_eq!(ring.sections[2].prev_id, 1);
        // the survivors meet where the removed section used to sit
        assert_eq!(ring.sections[1].end, ring.sections[2].start);
        assert!(ring.is_closed_loop());
        assert!(ring.validate().is_ok());
    }

    #[test]
    fn test_delete_between_curves_refits_the_first() {
        let mut ring = stadium(100_000.0, 20_000.0);
        // removes the top straight, leaving the two semicircles adjacent
        ring.delete_section(2).unwrap();

        assert_eq!(ring.len(), 3);
        assert!(ring.is_closed_loop());
        assert!(ring.sections[1].kind.is_curve());
        assert_eq!(ring.sections[1].end, ring.sections[2].start);
        assert!(ring.validate().is_ok());
    }

    #[test]
    fn test_delete_out_of_range() {
        let mut ring = rectangle(1000.0, 500.0);
        let err = ring.delete_section(9).unwrap_err();
        assert_eq!(
            err,
            TopologyError::IndexOutOfRange { index: 9, count: 4 }
        );
        assert_eq!(ring.len(), 4);
    }

    #[test]
    fn test_delete_renumbers_dlong() {
        let mut ring = rectangle(1000.0, 500.0);
        ring.delete_section(1).unwrap();
        // section 0 now stretches to the far corner
        let diagonal = Point2D::new(1000.0, 500.0).distance(&Point2D::ZERO);
        assert!((ring.track_length - (1500.0 + diagonal)).abs() < 1e-9);
        assert_eq!(ring.sections[0].end, ring.sections[1].start);
        let mut cursor = 0.0;
        for section in &ring.sections {
            assert!((section.start_dlong - cursor).abs() < 1e-9);
            cursor += section.length;
        }
    }

    #[test]
    fn test_split_straight() {
        let mut ring = rectangle(1000.0, 500.0);
        ring.sections[0].fsects.push(crate::codec::SgFsect {
            ftype1: 0,
            ftype2: 0,
            fstart: -6000,
            fend: 6000,
        });
        ring.split_straight(0, Point2D::new(400.0, 10.0)).unwrap();

        assert_eq!(ring.len(), 5);
        assert!(ring.is_closed_loop());
        assert_eq!(ring.sections[0].end, Point2D::new(400.0, 0.0));
        assert_eq!(ring.sections[1].start, Point2D::new(400.0, 0.0));
        assert_eq!(ring.track_length, 3000.0);

        // fsects are copies, not shared
        assert_eq!(ring.sections[0].fsects.len(), 1);
        assert_eq!(ring.sections[1].fsects.len(), 1);
        ring.sections[0].fsects[0].fend = 9000;
        assert_eq!(ring.sections[1].fsects[0].fend, 6000);
    }

    #[test]
    fn test_split_too_close_rejected() {
        let mut ring = rectangle(1000.0, 500.0);
        let err = ring.split_straight(0, Point2D::new(5.0, 0.0)).unwrap_err();
        assert!(matches!(err, TopologyError::SplitTooCloseToEnd(_)));
        assert_eq!(ring.len(), 4);
    }

    #[test]
    fn test_split_curve() {
        let mut ring = stadium(100_000.0, 20_000.0);
        let before_length = ring.track_length;
        // split the first semicircle near its apex
        let apex = Point2D::new(125_000.0, 20_000.0);
        ring.split_curve(1, apex).unwrap();

        assert_eq!(ring.len(), 5);
        assert!(ring.is_closed_loop());
        assert!((ring.track_length - before_length).abs() < 1.0);
        assert!(ring.sections[1].kind.is_curve());
        assert!(ring.sections[2].kind.is_curve());
        // shared endpoint with a continuous tangent
        assert_eq!(ring.sections[1].end, ring.sections[2].start);
    }

    #[test]
    fn test_split_wrong_kind() {
        let mut ring = stadium(100_000.0, 20_000.0);
        assert!(matches!(
            ring.split_straight(1, Point2D::new(0.0, 0.0)),
            Err(TopologyError::NotAStraight(1))
        ));
        assert!(matches!(
            ring.split_curve(0, Point2D::new(50.0, 0.0)),
            Err(TopologyError::NotACurve(0))
        ));
    }

    #[test]
    fn test_insert_after_closes_gap() {
        let mut ring = rectangle(1000.0, 500.0);
        // open the ring between 3 and 0
        ring.sections[3].next_id = -1;
        ring.sections[0].prev_id = -1;

        let section = Section::new_straight(
            0,
            Point2D::new(0.0, 500.0),
            Point2D::new(0.0, 250.0),
        );
        let index = ring.insert_section_after(3, section).unwrap();
        assert_eq!(index, 4);
        assert_eq!(ring.sections[3].next_id, 4);
        assert_eq!(ring.sections[4].prev_id, 3);
        assert_eq!(ring.sections[4].next_id, -1);
    }

    #[test]
    fn test_insert_after_connected_is_dangling() {
        let mut ring = rectangle(1000.0, 500.0);
        let section = Section::new_straight(
            0,
            Point2D::new(2000.0, 0.0),
            Point2D::new(3000.0, 0.0),
        );
        let index = ring.insert_section_after(1, section).unwrap();
        assert_eq!(ring.sections[index].prev_id, -1);
        assert_eq!(ring.sections[index].next_id, -1);
        // existing link untouched
        assert_eq!(ring.sections[1].next_id, 2);
    }

    #[test]
    fn test_set_start_finish() {
        let mut ring = rectangle(1000.0, 500.0);
        let old_start = ring.sections[2].start;
        ring.set_start_finish(2).unwrap();

        assert_eq!(ring.sections[0].start, old_start);
        assert_eq!(ring.sections[0].start_dlong, 0.0);
        assert!(ring.is_closed_loop());
        assert_eq!(ring.track_length, 3000.0);
        // DLONG re-walked in the new order
        assert_eq!(ring.sections[1].start_dlong, 1000.0);
    }

    #[test]
    fn test_set_start_finish_requires_closed_loop() {
        let mut ring = rectangle(1000.0, 500.0);
        ring.sections[3].next_id = -1;
        assert!(matches!(
            ring.set_start_finish(1),
            Err(TopologyError::NotAClosedLoop(_))
        ));
    }
}
