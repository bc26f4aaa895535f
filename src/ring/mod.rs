//! The track ring: the ordered section list plus the lateral column table.
//!
//! Sections are doubly linked through `prev_id`/`next_id` and carry
//! cumulative DLONG offsets. Topology edits live in [`edit`]; every edit
//! renumbers ids to match list positions and re-walks DLONG from section
//! zero, so consumers can always treat the list index as the section id.

pub mod dlong;
pub mod edit;

pub use dlong::{DlongLookup, SectionPosition};
pub use edit::TopologyError;

use crate::codec::SgFile;
use crate::section::{validate_sections, GeometryError, InvariantError, Section};
use serde::{Deserialize, Serialize};

/// Ordered section collection with the shared lateral sampling columns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackRing {
    pub sections: Vec<Section>,
    /// Total DLONG around the ring (sum of all section lengths).
    pub track_length: f64,
    /// DLAT of each xsect column, ordered as stored in the file.
    pub xsect_dlats: Vec<i32>,
}

impl TrackRing {
    /// Build a ring from a decoded SG file.
    pub fn from_sg(file: &SgFile) -> Result<TrackRing, GeometryError> {
        let mut sections = Vec::with_capacity(file.sections.len());
        for (id, rec) in file.sections.iter().enumerate() {
            sections.push(Section::from_sg(id, rec)?);
        }
        let track_length = sections.iter().map(|s| s.length).sum();
        Ok(TrackRing {
            sections,
            track_length,
            xsect_dlats: file.xsect_dlats.clone(),
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    #[inline]
    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    /// True iff the sections form exactly one closed loop: every link
    /// valid, the forward walk from section 0 visits every section once
    /// and returns to 0, and every backward link agrees.
    pub fn is_closed_loop(&self) -> bool {
        let n = self.len();
        if n == 0 {
            return false;
        }
        for section in &self.sections {
            if section.next_in(n).is_none() || section.prev_in(n).is_none() {
                return false;
            }
        }

        let mut visited = vec![false; n];
        let mut i = 0usize;
        while !visited[i] {
            visited[i] = true;
            match self.sections[i].next_in(n) {
                Some(next) => i = next,
                None => return false,
            }
        }
        if i != 0 || visited.iter().any(|v| !v) {
            return false;
        }

        self.sections.iter().all(|section| {
            section
                .next_in(n)
                .map(|next| self.sections[next].prev_id == section.id as i32)
                .unwrap_or(false)
        })
    }

    /// Run the structural and geometric section invariants.
    pub fn validate(&self) -> Result<(), InvariantError> {
        validate_sections(&self.sections)
    }

    /// Re-walk DLONG offsets in list order from section 0 and refresh the
    /// total track length. Called after every topology edit.
    pub fn recompute_dlongs(&mut self) {
        let mut cursor = 0.0;
        for section in &mut self.sections {
            section.start_dlong = cursor;
            cursor += section.length;
        }
        self.track_length = cursor;
    }

    /// Build the DLONG interval lookup for the current geometry.
    pub fn dlong_lookup(&self) -> DlongLookup {
        DlongLookup::build(&self.sections, self.track_length)
    }

    /// Scale the whole track uniformly about the world origin.
    pub fn scale(&mut self, factor: f64) -> Result<(), GeometryError> {
        for section in &mut self.sections {
            *section = section.scaled(factor)?;
        }
        self.track_length *= factor;
        Ok(())
    }
}
