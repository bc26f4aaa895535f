//! Structural and geometric invariant checks for a section list.
//!
//! These run after load and after every topology edit. They are cheap
//! (linear in the section count) and catch the failure modes that would
//! otherwise surface as silent geometry corruption much later.

use super::Section;
use thiserror::Error;

/// Largest endpoint gap tolerated between connected neighbors, world
/// units.
pub const CONTINUITY_TOLERANCE: f64 = 1.0;

/// A section list violates a structural or geometric invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invariant violation: {0}")]
pub struct InvariantError(pub String);

/// Section ids must be unique and equal to their list index.
pub fn assert_unique_section_ids(sections: &[Section]) -> Result<(), InvariantError> {
    for (index, section) in sections.iter().enumerate() {
        if section.id != index {
            return Err(InvariantError(format!(
                "section id {} does not match list index {index}",
                section.id
            )));
        }
    }
    Ok(())
}

/// Neighbor links must be -1 or a valid index, and reciprocal:
/// `a.next_id == b.id` implies `b.prev_id == a.id`, and vice versa.
pub fn assert_consistent_topology(sections: &[Section]) -> Result<(), InvariantError> {
    let count = sections.len();
    for section in sections {
        for (label, link) in [("previous", section.prev_id), ("next", section.next_id)] {
            if link != -1 && (link < 0 || link as usize >= count) {
                return Err(InvariantError(format!(
                    "section {} has invalid {label} link {link}",
                    section.id
                )));
            }
        }
        if let Some(prev) = section.prev_in(count) {
            if sections[prev].next_id != section.id as i32 {
                return Err(InvariantError(format!(
                    "section {}.previous_id={prev}, but section {prev}.next_id={}",
                    section.id, sections[prev].next_id
                )));
            }
        }
        if let Some(next) = section.next_in(count) {
            if sections[next].prev_id != section.id as i32 {
                return Err(InvariantError(format!(
                    "section {}.next_id={next}, but section {next}.previous_id={}",
                    section.id, sections[next].prev_id
                )));
            }
        }
    }
    Ok(())
}

/// Endpoint coordinates must be finite, lengths non-negative, and cached
/// polylines must start/end at the section endpoints.
pub fn assert_geometry_valid(sections: &[Section]) -> Result<(), InvariantError> {
    for section in sections {
        let coords = [
            section.start.x,
            section.start.y,
            section.end.x,
            section.end.y,
        ];
        if coords.iter().any(|v| !v.is_finite()) {
            return Err(InvariantError(format!(
                "section {} has non-finite endpoint coordinates",
                section.id
            )));
        }
        if !section.length.is_finite() || section.length < 0.0 {
            return Err(InvariantError(format!(
                "section {} has invalid length {}",
                section.id, section.length
            )));
        }
        if let (Some(first), Some(last)) = (section.polyline.first(), section.polyline.last()) {
            if *first != section.start {
                return Err(InvariantError(format!(
                    "section {} polyline does not start at the section start",
                    section.id
                )));
            }
            if *last != section.end {
                return Err(InvariantError(format!(
                    "section {} polyline does not end at the section end",
                    section.id
                )));
            }
        }
    }
    Ok(())
}

/// Connected neighbors must meet: the `end` of a section and the `start`
/// of its `next` may differ by at most [`CONTINUITY_TOLERANCE`].
pub fn assert_endpoint_continuity(sections: &[Section]) -> Result<(), InvariantError> {
    let count = sections.len();
    for section in sections {
        if let Some(next) = section.next_in(count) {
            let gap = section.end.distance(&sections[next].start);
            if gap > CONTINUITY_TOLERANCE {
                return Err(InvariantError(format!(
                    "section {} ends {gap:.1} units away from the start of section {next}",
                    section.id
                )));
            }
        }
    }
    Ok(())
}

/// Run every section invariant.
pub fn validate_sections(sections: &[Section]) -> Result<(), InvariantError> {
    assert_unique_section_ids(sections)?;
    assert_consistent_topology(sections)?;
    assert_geometry_valid(sections)?;
    assert_endpoint_continuity(sections)
}
