//! Altitude interpolation across the track surface.
//!
//! Elevation is stored per (section, xsect column) as a cubic in the
//! section fraction: `alt(t) = g1*t^3 + g2*t^2 + g3*t + begin_alt`. The
//! coefficients come either straight out of a compiled TRK file or are
//! derived from an SG ring's per-column altitude/grade data, where a
//! section's profile runs from the previous section's altitude to its own
//! and grades are slopes scaled by 8192. Laterally, altitude is
//! interpolated between the two bracketing columns and clamped to the
//! outermost columns beyond them.

use crate::codec::TrkFile;
use crate::ring::TrackRing;
use serde::{Deserialize, Serialize};

/// Grade values are slope * 8192 in the SG format.
const GRADE_SCALE: f64 = 8192.0;

/// Cubic altitude coefficients for one (section, column) pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ElevationColumn {
    pub g1: f64,
    pub g2: f64,
    pub g3: f64,
    pub begin_alt: f64,
}

impl ElevationColumn {
    /// Altitude at fraction `t` of the section.
    #[inline]
    pub fn altitude(&self, t: f64) -> f64 {
        self.g1 * t * t * t + self.g2 * t * t + self.g3 * t + self.begin_alt
    }
}

/// Elevation data for every section and lateral column of one ring.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ElevationProfile {
    num_xsects: usize,
    xsect_dlats: Vec<i32>,
    /// `num_sects * num_xsects` entries, section-major.
    columns: Vec<ElevationColumn>,
}

impl ElevationProfile {
    /// Derive the cubic coefficients from an SG ring's altitude and grade
    /// columns. Sections with zero length get flat columns.
    pub fn from_ring(ring: &TrackRing) -> ElevationProfile {
        let num_sects = ring.len();
        let num_xsects = ring.xsect_dlats.len();
        let mut columns = Vec::with_capacity(num_sects * num_xsects);

        for index in 0..num_sects {
            let prev_index = (index + num_sects - 1) % num_sects;
            let section = &ring.sections[index];
            let prev = &ring.sections[prev_index];
            let length = section.length;

            for xsect in 0..num_xsects {
                let begin_alt = *prev.alt.get(xsect).unwrap_or(&0) as f64;
                let end_alt = *section.alt.get(xsect).unwrap_or(&0) as f64;
                let cur_slope = *prev.grade.get(xsect).unwrap_or(&0) as f64 / GRADE_SCALE;
                let next_slope = *section.grade.get(xsect).unwrap_or(&0) as f64 / GRADE_SCALE;

                let column = if length > 0.0 {
                    ElevationColumn {
                        g1: ((2.0 * begin_alt / length + cur_slope + next_slope
                            - 2.0 * end_alt / length)
                            * length)
                            .round(),
                        g2: ((3.0 * end_alt / length - 3.0 * begin_alt / length
                            - 2.0 * cur_slope
                            - next_slope)
                            * length)
                            .round(),
                        g3: (cur_slope * length).round(),
                        begin_alt,
                    }
                } else {
                    ElevationColumn {
                        begin_alt,
                        ..Default::default()
                    }
                };
                columns.push(column);
            }
        }

        ElevationProfile {
            num_xsects,
            xsect_dlats: ring.xsect_dlats.clone(),
            columns,
        }
    }

    /// Read the precomputed coefficients out of a compiled TRK file.
    pub fn from_trk(file: &TrkFile) -> ElevationProfile {
        let num_xsects = file.num_xsects();
        ElevationProfile {
            num_xsects,
            xsect_dlats: file.xsect_dlats[..num_xsects].to_vec(),
            columns: file
                .xsect_data
                .iter()
                .map(|rec| ElevationColumn {
                    g1: rec.grade1 as f64,
                    g2: rec.grade2 as f64,
                    g3: rec.grade3 as f64,
                    begin_alt: rec.alt as f64,
                })
                .collect(),
        }
    }

    #[inline]
    pub fn num_xsects(&self) -> usize {
        self.num_xsects
    }

    fn column(&self, section_index: usize, xsect: usize) -> ElevationColumn {
        self.columns
            .get(section_index * self.num_xsects + xsect)
            .copied()
            .unwrap_or_default()
    }

    /// Altitude at `fraction` through a section, offset laterally to
    /// `dlat`. DLAT outside the column table clamps to the outermost
    /// column rather than extrapolating.
    pub fn altitude(&self, section_index: usize, fraction: f64, dlat: f64) -> f64 {
        if self.num_xsects == 0 {
            return 0.0;
        }
        let last = self.num_xsects - 1;

        // bracketing columns; "right" is the lower-DLAT side
        let (left_xsect, right_xsect) = if dlat <= self.xsect_dlats[0] as f64 {
            (0, 0)
        } else if dlat >= self.xsect_dlats[last] as f64 {
            (last, last)
        } else {
            let mut pair = (last, last);
            for xsect in 0..last {
                if self.xsect_dlats[xsect] as f64 <= dlat
                    && dlat < self.xsect_dlats[xsect + 1] as f64
                {
                    pair = (xsect + 1, xsect);
                    break;
                }
            }
            pair
        };

        let left_alt = self.column(section_index, left_xsect).altitude(fraction);
        let right_alt = self.column(section_index, right_xsect).altitude(fraction);

        let left_dlat = self.xsect_dlats[left_xsect] as f64;
        let right_dlat = self.xsect_dlats[right_xsect] as f64;
        let span = left_dlat - right_dlat;
        if span == 0.0 {
            return right_alt;
        }
        right_alt + (left_alt - right_alt) * ((dlat - right_dlat) / span)
    }
}
