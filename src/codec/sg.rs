//! SG source-geometry file codec.
//!
//! Layout (all i32, little-endian):
//! - Header (6 words): `file_type, unknown1, unknown2, unknown3,
//!   num_sects, num_xsects`
//! - `num_xsects` xsect DLAT values
//! - `num_sects` fixed-size section records of `58 + 2*num_xsects` words:
//!   - 17 words: `type, next, prev, start_x, start_y, end_x, end_y,
//!     start_dlong, length, center_x, center_y, sang1, sang2, eang1,
//!     eang2, radius, num1`
//!   - `num_xsects` pairs of `alt, grade`
//!   - `num_fsects`, then exactly 10 fsect slots of
//!     `ftype1, ftype2, fstart, fend` (unused slots zeroed)

use super::{put, CodecError, WordReader};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fixed fsect slot count in an SG section record.
pub const SG_FSECT_SLOTS: usize = 10;

/// Section type tag for straights.
pub const SECTION_TYPE_STRAIGHT: i32 = 1;
/// Section type tag for curves.
pub const SECTION_TYPE_CURVE: i32 = 2;

/// SG file header. The three unknown words are preserved verbatim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SgHeader {
    pub file_type: i32,
    pub unknown: [i32; 3],
    pub num_sects: i32,
    pub num_xsects: i32,
}

/// One lateral surface strip definition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SgFsect {
    pub ftype1: i32,
    pub ftype2: i32,
    /// Starting DLAT bound.
    pub fstart: i32,
    /// Ending DLAT bound.
    pub fend: i32,
}

impl SgFsect {
    /// Ground strips carry surface types 0..=6; everything else is a
    /// wall/fence boundary.
    #[inline]
    pub fn is_ground(&self) -> bool {
        (0..=6).contains(&self.ftype1)
    }
}

/// One raw SG section record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SgSection {
    /// 1 = straight, 2 = curve.
    pub section_type: i32,
    pub next: i32,
    pub prev: i32,
    pub start_x: i32,
    pub start_y: i32,
    pub end_x: i32,
    pub end_y: i32,
    pub start_dlong: i32,
    pub length: i32,
    pub center_x: i32,
    pub center_y: i32,
    /// Start heading as a center-relative sin/cos pair.
    pub sang1: i32,
    pub sang2: i32,
    /// End heading, same encoding.
    pub eang1: i32,
    pub eang2: i32,
    /// Signed curve radius; meaningless for straights but preserved.
    pub radius: i32,
    /// Unknown field, preserved verbatim.
    pub num1: i32,
    /// Altitude per xsect column.
    pub alt: Vec<i32>,
    /// Grade per xsect column.
    pub grade: Vec<i32>,
    /// Fsects in record order (ground and boundary interleaved).
    pub fsects: Vec<SgFsect>,
}

impl SgSection {
    /// Iterate over just the ground strips.
    pub fn ground_fsects(&self) -> impl Iterator<Item = &SgFsect> {
        self.fsects.iter().filter(|f| f.is_ground())
    }

    /// Iterate over just the wall/fence boundaries.
    pub fn boundary_fsects(&self) -> impl Iterator<Item = &SgFsect> {
        self.fsects.iter().filter(|f| !f.is_ground())
    }
}

/// A parsed SG file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SgFile {
    pub header: SgHeader,
    pub xsect_dlats: Vec<i32>,
    pub sections: Vec<SgSection>,
}

impl SgFile {
    /// Parse an SG byte buffer.
    pub fn decode(bytes: &[u8]) -> Result<SgFile, CodecError> {
        let mut r = WordReader::new(bytes)?;

        let file_type = r.take()?;
        let unknown = [r.take()?, r.take()?, r.take()?];
        let raw_num_sects = r.take()?;
        let raw_num_xsects = r.take()?;

        let num_xsects = r.check_count("xsect", raw_num_xsects, 1)?;
        let xsect_dlats = r.take_vec(num_xsects)?;

        let record_words = 58 + 2 * num_xsects;
        let num_sects = r.check_count("section", raw_num_sects, record_words)?;

        let mut sections = Vec::with_capacity(num_sects);
        for _ in 0..num_sects {
            sections.push(Self::decode_section(&mut r, num_xsects)?);
        }

        Ok(SgFile {
            header: SgHeader {
                file_type,
                unknown,
                num_sects: raw_num_sects,
                num_xsects: raw_num_xsects,
            },
            xsect_dlats,
            sections,
        })
    }

    fn decode_section(r: &mut WordReader<'_>, num_xsects: usize) -> Result<SgSection, CodecError> {
        let section_type = r.take()?;
        let next = r.take()?;
        let prev = r.take()?;
        let start_x = r.take()?;
        let start_y = r.take()?;
        let end_x = r.take()?;
        let end_y = r.take()?;
        let start_dlong = r.take()?;
        let length = r.take()?;
        let center_x = r.take()?;
        let center_y = r.take()?;
        let sang1 = r.take()?;
        let sang2 = r.take()?;
        let eang1 = r.take()?;
        let eang2 = r.take()?;
        let radius = r.take()?;
        let num1 = r.take()?;

        let mut alt = Vec::with_capacity(num_xsects);
        let mut grade = Vec::with_capacity(num_xsects);
        for _ in 0..num_xsects {
            alt.push(r.take()?);
            grade.push(r.take()?);
        }

        let num_fsects = r.take()?;
        if num_fsects < 0 || num_fsects as usize > SG_FSECT_SLOTS {
            return Err(CodecError::MalformedHeader(format!(
                "fsect count {num_fsects} outside 0..={SG_FSECT_SLOTS} at word {}",
                r.position()
            )));
        }
        let mut fsects = Vec::with_capacity(num_fsects as usize);
        for slot in 0..SG_FSECT_SLOTS {
            let f = SgFsect {
                ftype1: r.take()?,
                ftype2: r.take()?,
                fstart: r.take()?,
                fend: r.take()?,
            };
            if slot < num_fsects as usize {
                fsects.push(f);
            }
        }

        Ok(SgSection {
            section_type,
            next,
            prev,
            start_x,
            start_y,
            end_x,
            end_y,
            start_dlong,
            length,
            center_x,
            center_y,
            sang1,
            sang2,
            eang1,
            eang2,
            radius,
            num1,
            alt,
            grade,
            fsects,
        })
    }

    /// Serialize back to the on-disk byte layout. For well-formed input
    /// this reproduces the decoded bytes exactly.
    pub fn encode(&self) -> Vec<u8> {
        let num_xsects = self.xsect_dlats.len();
        let record_words = 58 + 2 * num_xsects;
        let mut out = Vec::with_capacity(4 * (6 + num_xsects + record_words * self.sections.len()));

        put(&mut out, self.header.file_type);
        for u in self.header.unknown {
            put(&mut out, u);
        }
        put(&mut out, self.header.num_sects);
        put(&mut out, self.header.num_xsects);
        for dlat in &self.xsect_dlats {
            put(&mut out, *dlat);
        }

        for s in &self.sections {
            put(&mut out, s.section_type);
            put(&mut out, s.next);
            put(&mut out, s.prev);
            put(&mut out, s.start_x);
            put(&mut out, s.start_y);
            put(&mut out, s.end_x);
            put(&mut out, s.end_y);
            put(&mut out, s.start_dlong);
            put(&mut out, s.length);
            put(&mut out, s.center_x);
            put(&mut out, s.center_y);
            put(&mut out, s.sang1);
            put(&mut out, s.sang2);
            put(&mut out, s.eang1);
            put(&mut out, s.eang2);
            put(&mut out, s.radius);
            put(&mut out, s.num1);
            for i in 0..num_xsects {
                put(&mut out, s.alt.get(i).copied().unwrap_or(0));
                put(&mut out, s.grade.get(i).copied().unwrap_or(0));
            }
            put(&mut out, s.fsects.len() as i32);
            for slot in 0..SG_FSECT_SLOTS {
                let f = s.fsects.get(slot).copied().unwrap_or_default();
                put(&mut out, f.ftype1);
                put(&mut out, f.ftype2);
                put(&mut out, f.fstart);
                put(&mut out, f.fend);
            }
        }

        out
    }

    /// Load an SG file from disk.
    pub fn load(path: &Path) -> Result<SgFile, CodecError> {
        let bytes = std::fs::read(path)?;
        Self::decode(&bytes)
    }

    /// Write the SG file to disk.
    pub fn save(&self, path: &Path) -> Result<(), CodecError> {
        std::fs::write(path, self.encode())?;
        Ok(())
    }
}
