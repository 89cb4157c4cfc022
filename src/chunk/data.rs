//! The Chunk type - the bytes between two boundaries.

use std::fmt;
use std::ops::Range;

use bytes::Bytes;

use super::{ChunkHash, CutKind, hash::hash_if_enabled};
use crate::config::HashConfig;

/// A content-defined chunk with its position in the stream.
///
/// Produced by the data-carrying APIs ([`Splitter`](crate::Splitter),
/// [`ChunkIter`](crate::ChunkIter) and the async stream). Concatenating the
/// chunks of a stream in order reproduces the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// The chunk bytes.
    pub data: Bytes,

    /// Absolute offset of the first byte.
    pub offset: u64,

    /// BLAKE3 hash of `data`, when hashing is enabled.
    pub hash: Option<ChunkHash>,

    /// What closed this chunk.
    pub kind: CutKind,
}

impl Chunk {
    /// Creates an unhashed chunk.
    pub fn new(data: impl Into<Bytes>, offset: u64, kind: CutKind) -> Self {
        Self {
            data: data.into(),
            offset,
            hash: None,
            kind,
        }
    }

    /// Builds a chunk from `data`, hashing it if `hash_config` asks for it.
    pub(crate) fn hashed(data: Bytes, offset: u64, kind: CutKind, hash_config: &HashConfig) -> Self {
        let hash = hash_if_enabled(hash_config, &data);
        Self {
            data,
            offset,
            hash,
            kind,
        }
    }

    /// Copies the accumulated bytes in `buf` out as a chunk starting at
    /// `*start`, clears `buf` and advances `*start` past the chunk.
    pub(crate) fn drain_from(
        buf: &mut Vec<u8>,
        start: &mut u64,
        kind: CutKind,
        hash_config: &HashConfig,
    ) -> Self {
        let chunk = Self::hashed(Bytes::copy_from_slice(buf), *start, kind, hash_config);
        *start += buf.len() as u64;
        buf.clear();
        chunk
    }

    /// Returns the length of the chunk data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the chunk has no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the offset one past the last byte.
    pub fn end(&self) -> u64 {
        self.offset + self.data.len() as u64
    }

    /// Returns the byte range covered in the stream.
    pub fn range(&self) -> Range<u64> {
        self.offset..self.end()
    }

    /// Returns the offset a boundary event would report for this chunk.
    ///
    /// `None` for an empty chunk.
    pub fn last_byte_offset(&self) -> Option<u64> {
        self.end().checked_sub(1).filter(|_| !self.is_empty())
    }

    /// Consumes the chunk and returns the underlying data.
    pub fn into_data(self) -> Bytes {
        self.data
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chunk({} bytes @ {}, {:?}", self.len(), self.offset, self.kind)?;
        if let Some(hash) = self.hash {
            write!(f, ", hash={}", hash)?;
        }
        write!(f, ")")
    }
}
