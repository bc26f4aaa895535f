//! DLONG to section lookup.
//!
//! Maps an absolute DLONG (wrapped modulo track length) to the section
//! containing it and the local fraction along that section. Built once
//! per geometry change; lookups binary-search the sorted interval starts
//! and additionally test intervals that wrap past the track length.

use crate::section::Section;

/// A resolved DLONG position: section index plus fraction in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionPosition {
    pub section_index: usize,
    pub fraction: f64,
}

#[derive(Clone, Copy, Debug)]
struct Interval {
    start: f64,
    end: f64,
    section_index: usize,
}

/// Sorted DLONG intervals for one ring snapshot.
#[derive(Clone, Debug, Default)]
pub struct DlongLookup {
    intervals: Vec<Interval>,
    starts: Vec<f64>,
    /// Intervals whose end extends past the track length.
    wrapping: Vec<usize>,
    track_length: f64,
}

impl DlongLookup {
    /// Build the lookup from the section list. Zero-length sections get
    /// no interval.
    pub fn build(sections: &[Section], track_length: f64) -> DlongLookup {
        let mut lookup = DlongLookup {
            intervals: Vec::with_capacity(sections.len()),
            starts: Vec::with_capacity(sections.len()),
            wrapping: Vec::new(),
            track_length,
        };
        for (section_index, section) in sections.iter().enumerate() {
            if section.length <= 0.0 {
                continue;
            }
            let start = section.start_dlong;
            let end = start + section.length;
            if end > track_length {
                lookup.wrapping.push(lookup.intervals.len());
            }
            lookup.intervals.push(Interval {
                start,
                end,
                section_index,
            });
            lookup.starts.push(start);
        }
        lookup
    }

    /// Resolve an absolute DLONG, wrapping modulo the track length.
    /// `None` when the lookup is empty or the track length is zero.
    pub fn position(&self, dlong: f64) -> Option<SectionPosition> {
        if self.intervals.is_empty() || self.track_length <= 0.0 {
            return None;
        }
        let wrapped = dlong.rem_euclid(self.track_length);

        // Candidate set: the interval whose start brackets the query, its
        // immediate neighbors (float edges), and every wrapping interval.
        let bracket = self.starts.partition_point(|s| *s <= wrapped);
        let mut candidates: Vec<usize> = Vec::with_capacity(3 + self.wrapping.len());
        if bracket > 0 {
            candidates.push(bracket - 1);
        }
        if bracket >= 2 {
            candidates.push(bracket - 2);
        }
        if bracket < self.intervals.len() {
            candidates.push(bracket);
        }
        candidates.extend_from_slice(&self.wrapping);
        candidates.sort_by_key(|i| self.intervals[*i].section_index);
        candidates.dedup();

        for index in candidates {
            let interval = self.intervals[index];
            if !self.contains(wrapped, interval) {
                continue;
            }
            let length = interval.end - interval.start;
            if length <= 0.0 {
                continue;
            }
            let mut fraction = (wrapped - interval.start) / length;
            if interval.end > self.track_length && wrapped < interval.start {
                fraction = (wrapped + self.track_length - interval.start) / length;
            }
            return Some(SectionPosition {
                section_index: interval.section_index,
                fraction: fraction.clamp(0.0, 1.0),
            });
        }

        // Numerical edge: the query fell between interval edges. Snap to
        // the end of the final section.
        Some(SectionPosition {
            section_index: self.intervals.last()?.section_index,
            fraction: 1.0,
        })
    }

    fn contains(&self, wrapped: f64, interval: Interval) -> bool {
        if interval.end <= self.track_length {
            return (interval.start <= wrapped && wrapped < interval.end)
                || approx_eq(wrapped, interval.end);
        }
        let wrapped_end = interval.end - self.track_length;
        wrapped >= interval.start || wrapped < wrapped_end || approx_eq(wrapped, wrapped_end)
    }
}

#[inline]
fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}
