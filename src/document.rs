//! Editing session around one SG file.
//!
//! [`TrackDocument`] owns the parsed file, the editable section ring,
//! and every derived structure (elevation profile, sampled centerline,
//! spatial index). Edits go through the document so the derived state
//! is rebuilt wholesale afterwards; nothing is patched incrementally.
//!
//! Saving writes the ring back into the original records field by
//! field, so a load/save cycle with no edits reproduces the input
//! bytes exactly.

use std::path::Path;

use thiserror::Error;

use crate::centerline::{sample_centerline, Centerline, CenterlineIndex, Projection};
use crate::codec::{CodecError, SgFile, SgSection};
use crate::config::{SamplerConfig, SolverConfig};
use crate::core::Point2D;
use crate::elevation::ElevationProfile;
use crate::ring::{TopologyError, TrackRing};
use crate::section::{GeometryError, InvariantError, Section, SectionKind};
use crate::solver::{apply_fit, solve_drag, SolverError};

/// Anything that can go wrong while loading, editing, or saving a
/// document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Topology(#[from] TopologyError),
    #[error(transparent)]
    Solver(#[from] SolverError),
    #[error("invariant violation: {0}")]
    Invariant(#[from] InvariantError),
}

/// An SG file plus everything derived from it.
#[derive(Clone, Debug)]
pub struct TrackDocument {
    sg: SgFile,
    pub ring: TrackRing,
    pub profile: ElevationProfile,
    pub centerline: Centerline,
    pub index: CenterlineIndex,
    pub solver_config: SolverConfig,
    pub sampler_config: SamplerConfig,
}

impl TrackDocument {
    /// Read and validate an SG file from disk.
    pub fn open(path: &Path) -> Result<TrackDocument, DocumentError> {
        let sg = SgFile::load(path)?;
        log::info!(
            "opened {} ({} sections, {} cross-section columns)",
            path.display(),
            sg.sections.len(),
            sg.xsect_dlats.len()
        );
        Self::from_sg(sg)
    }

    /// Build a document around an already-parsed file.
    pub fn from_sg(sg: SgFile) -> Result<TrackDocument, DocumentError> {
        let ring = TrackRing::from_sg(&sg)?;
        ring.validate()?;
        let mut doc = TrackDocument {
            sg,
            ring,
            profile: ElevationProfile::default(),
            centerline: Centerline::default(),
            index: CenterlineIndex::default(),
            solver_config: SolverConfig::default(),
            sampler_config: SamplerConfig::default(),
        };
        doc.rebuild_derived();
        Ok(doc)
    }

    /// Regenerate the elevation profile, sampled centerline, and spatial
    /// index from the current ring. Called after every edit.
    pub fn rebuild_derived(&mut self) {
        self.profile = ElevationProfile::from_ring(&self.ring);
        self.centerline = sample_centerline(&self.ring, &self.profile, self.sampler_config.step);
        self.index = self
            .centerline
            .build_index(self.sampler_config.grid_target_cells);
        log::debug!(
            "rebuilt derived state: {} centerline points over length {:.0}",
            self.centerline.points.len(),
            self.ring.track_length
        );
    }

    /// Validate, then rebuild derived state. Edits that go through the
    /// ring directly should call this before reading anything derived.
    pub fn commit(&mut self) -> Result<(), DocumentError> {
        self.ring.validate()?;
        self.rebuild_derived();
        Ok(())
    }

    /// Remove a section, reconnecting its former neighbors.
    pub fn delete_section(&mut self, index: usize) -> Result<(), DocumentError> {
        self.ring.delete_section(index)?;
        self.commit()
    }

    /// Split a straight section in two at `split_point`.
    pub fn split_straight(
        &mut self,
        index: usize,
        split_point: Point2D,
    ) -> Result<(), DocumentError> {
        self.ring.split_straight(index, split_point)?;
        self.commit()
    }

    /// Split a curve in two at (the circle snap of) `split_point`.
    pub fn split_curve(
        &mut self,
        index: usize,
        split_point: Point2D,
    ) -> Result<(), DocumentError> {
        self.ring.split_curve(index, split_point)?;
        self.commit()
    }

    /// Reorder the ring so `start_index` becomes section 0 at DLONG 0.
    pub fn set_start_finish(&mut self, start_index: usize) -> Result<(), DocumentError> {
        self.ring.set_start_finish(start_index)?;
        self.commit()
    }

    /// Move one endpoint of a section. Straights are re-pointed and
    /// recomputed directly; curves are re-fit through the drag solver so
    /// the fixed endpoint's tangent heading survives the move. The
    /// neighbor sharing the moved endpoint follows it, so connected
    /// sections stay coincident.
    pub fn drag_endpoint(
        &mut self,
        index: usize,
        moved_start: bool,
        position: Point2D,
    ) -> Result<(), DocumentError> {
        let section = self
            .ring
            .section(index)
            .ok_or(TopologyError::IndexOutOfRange {
                index,
                count: self.ring.len(),
            })?;

        let (start, end) = if moved_start {
            (position, section.end)
        } else {
            (section.start, position)
        };
        let updated = self.reshaped(section, start, end)?;

        let count = self.ring.len();
        let neighbor = if moved_start {
            section.prev_in(count)
        } else {
            section.next_in(count)
        };
        let neighbor_update = match neighbor.filter(|n| *n != index) {
            Some(n) => {
                let adjoining = &self.ring.sections[n];
                let (n_start, n_end) = if moved_start {
                    (adjoining.start, position)
                } else {
                    (position, adjoining.end)
                };
                Some((n, self.reshaped(adjoining, n_start, n_end)?))
            }
            None => None,
        };

        self.ring.sections[index] = updated;
        if let Some((n, moved)) = neighbor_update {
            self.ring.sections[n] = moved;
        }
        self.ring.recompute_dlongs();
        self.commit()
    }

    /// A copy of `section` spanning the new endpoints. Straight headings
    /// are rederived from the chord; curves go through the drag solver.
    fn reshaped(
        &self,
        section: &Section,
        start: Point2D,
        end: Point2D,
    ) -> Result<Section, DocumentError> {
        match section.kind {
            SectionKind::Straight => {
                let mut moved = section.clone();
                moved.start = start;
                moved.end = end;
                moved.length = start.distance(&end);
                moved.start_heading = None;
                moved.end_heading = None;
                moved.recompute()?;
                Ok(moved)
            }
            SectionKind::Curve { .. } => {
                let fit = solve_drag(section, start, end, &self.solver_config)?;
                Ok(apply_fit(section, start, end, &fit)?)
            }
        }
    }

    /// Scale the whole track uniformly about the world origin.
    pub fn scale(&mut self, factor: f64) -> Result<(), DocumentError> {
        self.ring.scale(factor)?;
        self.commit()
    }

    /// Append a new section linked after `after_index`.
    pub fn insert_section_after(
        &mut self,
        after_index: usize,
        section: Section,
    ) -> Result<usize, DocumentError> {
        let new_index = self.ring.insert_section_after(after_index, section)?;
        self.commit()?;
        Ok(new_index)
    }

    /// Nearest centerline point to a world-space query.
    pub fn project_point(&self, query: Point2D) -> Option<Projection> {
        self.index.project_point(
            query,
            &self.centerline.dlongs,
            self.centerline.track_length,
        )
    }

    /// Sync the ring back into the SG records and serialize.
    ///
    /// Sections added by edits get fresh zeroed records before the
    /// write-back; removed sections drop their records. With no edits
    /// the output is byte-identical to the parsed input.
    pub fn to_bytes(&mut self) -> Vec<u8> {
        let num_xsects = self.sg.xsect_dlats.len();
        self.sg
            .sections
            .resize_with(self.ring.len(), || blank_record(num_xsects));
        for (section, rec) in self.ring.sections.iter().zip(self.sg.sections.iter_mut()) {
            section.apply_to_sg(rec);
        }
        self.sg.header.num_sects = self.ring.len() as i32;
        self.sg.encode()
    }

    /// Write the document to disk.
    pub fn save(&mut self, path: &Path) -> Result<(), DocumentError> {
        let bytes = self.to_bytes();
        std::fs::write(path, &bytes).map_err(CodecError::from)?;
        log::info!("saved {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    /// The parsed file as of the last load or save sync.
    pub fn sg(&self) -> &SgFile {
        &self.sg
    }
}

fn blank_record(num_xsects: usize) -> SgSection {
    SgSection {
        section_type: 0,
        next: -1,
        prev: -1,
        start_x: 0,
        start_y: 0,
        end_x: 0,
        end_y: 0,
        start_dlong: 0,
        length: 0,
        center_x: 0,
        center_y: 0,
        sang1: 0,
        sang2: 0,
        eang1: 0,
        eang2: 0,
        radius: 0,
        num1: 0,
        alt: vec![0; num_xsects],
        grade: vec![0; num_xsects],
        fsects: Vec::new(),
    }
}
