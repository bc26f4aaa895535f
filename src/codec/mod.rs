//! Binary codecs for the ICR2 track description formats.
//!
//! Both formats are flat streams of little-endian signed 32-bit integers
//! with no padding between records. SG files hold fixed-size section
//! records (the editable source geometry); TRK files hold count-prefixed
//! variable-width records (the compiled form the game engine loads).
//!
//! The game engine is byte-format-sensitive, so the single most important
//! property of this layer is that `encode(decode(bytes)) == bytes` exactly
//! for well-formed input. Decoding is a pure in-memory transform; file I/O
//! lives in thin path wrappers.

pub mod sg;
pub mod trk;

pub use sg::{SgFile, SgFsect, SgHeader, SgSection, SECTION_TYPE_CURVE, SECTION_TYPE_STRAIGHT};
pub use trk::{TrkBoundary, TrkFile, TrkGroundFsect, TrkHeader, TrkSection, TrkXsectRecord};

use thiserror::Error;

/// Parse failures for the track file codecs. Fatal for the load operation;
/// never recovered into a partial file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The buffer ended before the declared record counts were satisfied.
    #[error("truncated input: needed {needed} words at offset {offset}, {remaining} left")]
    TruncatedInput {
        /// Word offset where the shortfall was detected.
        offset: usize,
        /// Words still required.
        needed: usize,
        /// Words actually remaining.
        remaining: usize,
    },

    /// A header or count field is negative, inconsistent, or larger than
    /// the remaining buffer could possibly hold.
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// Underlying file I/O failure from a path wrapper.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for CodecError {
    fn from(e: std::io::Error) -> Self {
        CodecError::Io(e.to_string())
    }
}

/// Cursor over a little-endian i32 word stream.
pub(crate) struct WordReader<'a> {
    words: &'a [u8],
    pos: usize,
}

impl<'a> WordReader<'a> {
    /// Wrap a byte buffer. The length must be a multiple of 4.
    pub fn new(bytes: &'a [u8]) -> Result<Self, CodecError> {
        if bytes.len() % 4 != 0 {
            return Err(CodecError::MalformedHeader(format!(
                "buffer length {} is not a whole number of words",
                bytes.len()
            )));
        }
        Ok(Self {
            words: bytes,
            pos: 0,
        })
    }

    /// Words not yet consumed.
    pub fn remaining(&self) -> usize {
        self.words.len() / 4 - self.pos
    }

    /// Current word offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Read the next word.
    pub fn take(&mut self) -> Result<i32, CodecError> {
        if self.remaining() == 0 {
            return Err(CodecError::TruncatedInput {
                offset: self.pos,
                needed: 1,
                remaining: 0,
            });
        }
        let byte = self.pos * 4;
        let value = i32::from_le_bytes([
            self.words[byte],
            self.words[byte + 1],
            self.words[byte + 2],
            self.words[byte + 3],
        ]);
        self.pos += 1;
        Ok(value)
    }

    /// Read `count` words into a vector.
    pub fn take_vec(&mut self, count: usize) -> Result<Vec<i32>, CodecError> {
        if self.remaining() < count {
            return Err(CodecError::TruncatedInput {
                offset: self.pos,
                needed: count,
                remaining: self.remaining(),
            });
        }
        (0..count).map(|_| self.take()).collect()
    }

    /// Validate a header count field: non-negative and small enough that
    /// `count * words_each` could still fit in the remaining buffer.
    pub fn check_count(&self, name: &str, count: i32, words_each: usize) -> Result<usize, CodecError> {
        if count < 0 {
            return Err(CodecError::MalformedHeader(format!(
                "{name} count is negative ({count})"
            )));
        }
        let count = count as usize;
        if count.saturating_mul(words_each) > self.remaining() {
            return Err(CodecError::MalformedHeader(format!(
                "{name} count {count} exceeds remaining buffer ({} words)",
                self.remaining()
            )));
        }
        Ok(count)
    }
}

/// Append an i32 word to an output buffer.
#[inline]
pub(crate) fn put(out: &mut Vec<u8>, value: i32) {
    out.extend_from_slice(&value.to_le_bytes());
}
