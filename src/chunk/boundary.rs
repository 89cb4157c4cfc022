//! Boundary events emitted by the chunker.

use std::fmt;

/// Why a boundary was placed where it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CutKind {
    /// The chunk reached the configured maximum length.
    MaxSize,
    /// The rolling checksum matched the split pattern past the minimum length.
    Checksum,
    /// The stream ended after a partial chunk. Boundary APIs report it only
    /// under [`TailPolicy::Emit`](crate::TailPolicy::Emit).
    EndOfStream,
}

/// A chunk boundary: the absolute offset of the last byte of the chunk that
/// just closed.
///
/// The next chunk starts at `offset + 1`. Boundaries from one stream are
/// strictly increasing.
///
/// # Example
///
/// ```
/// use rollsplit::{ChunkConfig, Chunker, CutKind};
///
/// let mut chunker = Chunker::new(ChunkConfig::default());
/// let zeros = vec![0u8; 1 << 20];
/// let cuts: Vec<_> = chunker.boundaries(&zeros).collect();
///
/// assert_eq!(cuts.len(), 1);
/// assert_eq!(cuts[0].offset(), 1_048_575);
/// assert_eq!(cuts[0].kind(), CutKind::MaxSize);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkBoundary {
    offset: u64,
    kind: CutKind,
    bits: u32,
}

impl ChunkBoundary {
    pub(crate) fn new(offset: u64, kind: CutKind, bits: u32) -> Self {
        Self { offset, kind, bits }
    }

    /// Returns the absolute offset of the last byte in the closed chunk.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns the offset one past the closed chunk, where the next one starts.
    pub fn end(&self) -> u64 {
        self.offset + 1
    }

    /// Returns what triggered the cut.
    pub fn kind(&self) -> CutKind {
        self.kind
    }

    /// Returns the cut weight.
    ///
    /// Checksum cuts carry [`RollingChecksum::bits`](crate::RollingChecksum::bits),
    /// size-cap cuts carry `log2(max_blob_size)` and end-of-stream cuts carry 0.
    pub fn bits(&self) -> u32 {
        self.bits
    }
}

impl fmt::Display for ChunkBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.offset)
    }
}

impl From<ChunkBoundary> for u64 {
    fn from(boundary: ChunkBoundary) -> Self {
        boundary.offset
    }
}
