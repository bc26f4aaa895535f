//! TRK compiled track file codec.
//!
//! Layout (all i32, little-endian):
//! - Header (7 words): `magic, version, track_length, num_xsects,
//!   num_sects, ground_bytes, sect_bytes`
//! - 10 xsect DLAT slots (zero-padded past `num_xsects`)
//! - `num_sects` byte offsets into the section data block
//! - `num_sects * num_xsects` xsect records of 8 words:
//!   `grade1, grade2, grade3, alt, grade4, grade5, pos1, pos2`
//! - `ground_bytes / 4` words of ground fsect triples:
//!   `dlat_start, dlat_end, surface_type`
//! - Section data block (`sect_bytes / 4` words): per section 13 fixed
//!   words `type, start_dlong, length, heading, ang1..ang5,
//!   xsect_counter, ground_fsects, ground_counter, num_bounds`, then
//!   `num_bounds` boundary groups of `wall_type, dlat_start, dlat_end,
//!   filler, filler`
//!
//! The filler words are `-858993460` (0xCCCCCCCC) in files produced by the
//! original tooling but are preserved verbatim here so any input
//! round-trips byte-exact.

use super::{put, CodecError, WordReader};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// TRK magic word.
pub const TRK_MAGIC: i32 = 1414676811;

/// Filler word written into unused boundary fields by the original tools.
pub const TRK_FILLER: i32 = -858993460;

/// Fixed xsect DLAT slot count in the TRK header block.
pub const TRK_XSECT_SLOTS: usize = 10;

const SECTION_FIXED_WORDS: usize = 13;
const BOUNDARY_WORDS: usize = 5;
const XSECT_RECORD_WORDS: usize = 8;

/// TRK file header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrkHeader {
    pub magic: i32,
    pub version: i32,
    pub track_length: i32,
    pub num_xsects: i32,
    pub num_sects: i32,
    /// Byte length of the ground fsect block.
    pub ground_bytes: i32,
    /// Byte length of the section data block.
    pub sect_bytes: i32,
}

/// Elevation record for one (section, xsect column) pair. `grade1..3` are
/// cubic altitude coefficients over the section fraction; `alt` is the
/// altitude at fraction 0; `grade4`/`grade5` are the precomputed slope
/// derivatives; `pos1`/`pos2` hold the column's world x/y for straights or
/// `radius − dlat` (and filler) for curves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrkXsectRecord {
    pub grade1: i32,
    pub grade2: i32,
    pub grade3: i32,
    pub alt: i32,
    pub grade4: i32,
    pub grade5: i32,
    pub pos1: i32,
    pub pos2: i32,
}

/// One ground strip reference: DLAT bounds plus TRK surface type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrkGroundFsect {
    pub dlat_start: i32,
    pub dlat_end: i32,
    pub surface_type: i32,
}

/// One wall/fence boundary group in a section record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrkBoundary {
    pub wall_type: i32,
    pub dlat_start: i32,
    pub dlat_end: i32,
    /// Preserved verbatim; `TRK_FILLER` in well-formed files.
    pub filler: [i32; 2],
}

/// One TRK section record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrkSection {
    /// 1 = straight, 2 = curve.
    pub section_type: i32,
    pub start_dlong: i32,
    pub length: i32,
    /// Travel heading at the section start, as a 2^31-scaled angle.
    pub heading: i32,
    /// For curves: center x. For straights: a heading-derived constant.
    pub ang1: i32,
    /// For curves: center y.
    pub ang2: i32,
    pub ang3: i32,
    pub ang4: i32,
    pub ang5: i32,
    /// Index of this section's first record in the xsect table.
    pub xsect_counter: i32,
    /// Number of ground fsects referenced.
    pub ground_fsects: i32,
    /// Index of this section's first entry in the ground table.
    pub ground_counter: i32,
    pub boundaries: Vec<TrkBoundary>,
}

impl TrkSection {
    fn record_words(&self) -> usize {
        SECTION_FIXED_WORDS + BOUNDARY_WORDS * self.boundaries.len()
    }
}

/// A parsed TRK file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrkFile {
    pub header: TrkHeader,
    /// All 10 DLAT slots, including zero padding.
    pub xsect_dlats: [i32; TRK_XSECT_SLOTS],
    pub xsect_data: Vec<TrkXsectRecord>,
    pub ground_data: Vec<TrkGroundFsect>,
    pub sections: Vec<TrkSection>,
}

impl TrkFile {
    /// Number of active xsect columns.
    pub fn num_xsects(&self) -> usize {
        self.header.num_xsects as usize
    }

    /// Elevation record for a (section, xsect column) pair.
    pub fn xsect_record(&self, section: usize, xsect: usize) -> Option<&TrkXsectRecord> {
        self.xsect_data.get(section * self.num_xsects() + xsect)
    }

    /// Ground fsects referenced by a section.
    pub fn section_ground(&self, section: usize) -> &[TrkGroundFsect] {
        let Some(s) = self.sections.get(section) else {
            return &[];
        };
        let start = s.ground_counter as usize;
        let end = start + s.ground_fsects as usize;
        self.ground_data.get(start..end).unwrap_or(&[])
    }

    /// Parse a TRK byte buffer.
    pub fn decode(bytes: &[u8]) -> Result<TrkFile, CodecError> {
        let mut r = WordReader::new(bytes)?;

        let magic = r.take()?;
        if magic != TRK_MAGIC {
            return Err(CodecError::MalformedHeader(format!(
                "bad magic word {magic:#010x}"
            )));
        }
        let version = r.take()?;
        let track_length = r.take()?;
        let raw_num_xsects = r.take()?;
        let raw_num_sects = r.take()?;
        let ground_bytes = r.take()?;
        let sect_bytes = r.take()?;

        let num_xsects = r.check_count("xsect", raw_num_xsects, 0)?;
        if num_xsects > TRK_XSECT_SLOTS {
            return Err(CodecError::MalformedHeader(format!(
                "xsect count {num_xsects} exceeds the {TRK_XSECT_SLOTS}-slot table"
            )));
        }

        let mut xsect_dlats = [0i32; TRK_XSECT_SLOTS];
        for slot in xsect_dlats.iter_mut() {
            *slot = r.take()?;
        }

        let num_sects = r.check_count("section", raw_num_sects, 1)?;
        let raw_offsets = r.take_vec(num_sects)?;

        let record_count = num_sects * num_xsects;
        if r.remaining() < record_count * XSECT_RECORD_WORDS {
            return Err(CodecError::TruncatedInput {
                offset: r.position(),
                needed: record_count * XSECT_RECORD_WORDS,
                remaining: r.remaining(),
            });
        }
        let mut xsect_data = Vec::with_capacity(record_count);
        for _ in 0..record_count {
            xsect_data.push(TrkXsectRecord {
                grade1: r.take()?,
                grade2: r.take()?,
                grade3: r.take()?,
                alt: r.take()?,
                grade4: r.take()?,
                grade5: r.take()?,
                pos1: r.take()?,
                pos2: r.take()?,
            });
        }

        let ground_words = Self::block_words("ground", ground_bytes, 3)?;
        let mut ground_data = Vec::with_capacity(ground_words / 3);
        for _ in 0..ground_words / 3 {
            ground_data.push(TrkGroundFsect {
                dlat_start: r.take()?,
                dlat_end: r.take()?,
                surface_type: r.take()?,
            });
        }

        let sect_words = Self::block_words("section data", sect_bytes, 1)?;
        let sections = Self::decode_sections(&mut r, &raw_offsets, sect_words)?;

        if r.remaining() != 0 {
            return Err(CodecError::MalformedHeader(format!(
                "{} trailing words after section data",
                r.remaining()
            )));
        }

        Ok(TrkFile {
            header: TrkHeader {
                magic,
                version,
                track_length,
                num_xsects: raw_num_xsects,
                num_sects: raw_num_sects,
                ground_bytes,
                sect_bytes,
            },
            xsect_dlats,
            xsect_data,
            ground_data,
            sections,
        })
    }

    fn block_words(name: &str, bytes: i32, group: usize) -> Result<usize, CodecError> {
        if bytes < 0 || bytes % 4 != 0 {
            return Err(CodecError::MalformedHeader(format!(
                "{name} byte length {bytes} is not a non-negative multiple of 4"
            )));
        }
        let words = bytes as usize / 4;
        if group > 1 && words % group != 0 {
            return Err(CodecError::MalformedHeader(format!(
                "{name} block of {words} words is not a multiple of {group}"
            )));
        }
        Ok(words)
    }

    fn decode_sections(
        r: &mut WordReader<'_>,
        raw_offsets: &[i32],
        sect_words: usize,
    ) -> Result<Vec<TrkSection>, CodecError> {
        let mut sections = Vec::with_capacity(raw_offsets.len());
        let mut cursor = 0usize;

        for (i, raw_offset) in raw_offsets.iter().enumerate() {
            if *raw_offset < 0 || *raw_offset % 4 != 0 {
                return Err(CodecError::MalformedHeader(format!(
                    "section {i} offset {raw_offset} is not a non-negative multiple of 4"
                )));
            }
            if *raw_offset as usize / 4 != cursor {
                return Err(CodecError::MalformedHeader(format!(
                    "section {i} offset {} does not match record position {}",
                    *raw_offset as usize / 4,
                    cursor
                )));
            }

            let section_type = r.take()?;
            let start_dlong = r.take()?;
            let length = r.take()?;
            let heading = r.take()?;
            let ang1 = r.take()?;
            let ang2 = r.take()?;
            let ang3 = r.take()?;
            let ang4 = r.take()?;
            let ang5 = r.take()?;
            let xsect_counter = r.take()?;
            let ground_fsects = r.take()?;
            let ground_counter = r.take()?;
            let num_bounds = r.take()?;

            if num_bounds < 0 {
                return Err(CodecError::MalformedHeader(format!(
                    "section {i} boundary count is negative ({num_bounds})"
                )));
            }
            let mut boundaries = Vec::with_capacity(num_bounds as usize);
            for _ in 0..num_bounds {
                boundaries.push(TrkBoundary {
                    wall_type: r.take()?,
                    dlat_start: r.take()?,
                    dlat_end: r.take()?,
                    filler: [r.take()?, r.take()?],
                });
            }

            let section = TrkSection {
                section_type,
                start_dlong,
                length,
                heading,
                ang1,
                ang2,
                ang3,
                ang4,
                ang5,
                xsect_counter,
                ground_fsects,
                ground_counter,
                boundaries,
            };
            cursor += section.record_words();
            sections.push(section);
        }

        if cursor != sect_words {
            return Err(CodecError::MalformedHeader(format!(
                "section data block is {sect_words} words but records cover {cursor}"
            )));
        }
        Ok(sections)
    }

    /// Serialize back to the on-disk byte layout.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();

        put(&mut out, self.header.magic);
        put(&mut out, self.header.version);
        put(&mut out, self.header.track_length);
        put(&mut out, self.header.num_xsects);
        put(&mut out, self.header.num_sects);
        put(&mut out, self.header.ground_bytes);
        put(&mut out, self.header.sect_bytes);

        for dlat in self.xsect_dlats {
            put(&mut out, dlat);
        }

        let mut offset = 0i32;
        for s in &self.sections {
            put(&mut out, offset);
            offset += 4 * s.record_words() as i32;
        }

        for rec in &self.xsect_data {
            put(&mut out, rec.grade1);
            put(&mut out, rec.grade2);
            put(&mut out, rec.grade3);
            put(&mut out, rec.alt);
            put(&mut out, rec.grade4);
            put(&mut out, rec.grade5);
            put(&mut out, rec.pos1);
            put(&mut out, rec.pos2);
        }

        for g in &self.ground_data {
            put(&mut out, g.dlat_start);
            put(&mut out, g.dlat_end);
            put(&mut out, g.surface_type);
        }

        for s in &self.sections {
            put(&mut out, s.section_type);
            put(&mut out, s.start_dlong);
            put(&mut out, s.length);
            put(&mut out, s.heading);
            put(&mut out, s.ang1);
            put(&mut out, s.ang2);
            put(&mut out, s.ang3);
            put(&mut out, s.ang4);
            put(&mut out, s.ang5);
            put(&mut out, s.xsect_counter);
            put(&mut out, s.ground_fsects);
            put(&mut out, s.ground_counter);
            put(&mut out, s.boundaries.len() as i32);
            for b in &s.boundaries {
                put(&mut out, b.wall_type);
                put(&mut out, b.dlat_start);
                put(&mut out, b.dlat_end);
                put(&mut out, b.filler[0]);
                put(&mut out, b.filler[1]);
            }
        }

        out
    }

    /// Load a TRK file from disk.
    pub fn load(path: &Path) -> Result<TrkFile, CodecError> {
        let bytes = std::fs::read(path)?;
        Self::decode(&bytes)
    }

    /// Write the TRK file to disk.
    pub fn save(&self, path: &Path) -> Result<(), CodecError> {
        std::fs::write(path, self.encode())?;
        Ok(())
    }
}
