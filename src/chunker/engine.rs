//! Boundary policy driven by the rolling checksum.
//!
//! [`Chunker`] feeds every byte through a [`RollingChecksum`] and cuts when
//! either
//!
//! - the chunk has reached `max_blob_size` bytes, or
//! - the checksum marks a split candidate and the chunk is already longer
//!   than `too_small_threshold` bytes.
//!
//! The size cap is tested first, so no chunk ever exceeds it. The minimum
//! gate keeps an unlucky checksum run from producing tiny chunks.
//!
//! # Example
//!
//! ```
//! use rollsplit::{ChunkConfig, Chunker};
//!
//! let mut chunker = Chunker::new(ChunkConfig::default());
//!
//! let zeros = vec![0u8; 3_000_000];
//! let offsets: Vec<u64> = chunker.boundaries(&zeros).map(|b| b.offset()).collect();
//!
//! assert_eq!(offsets, vec![1_048_575, 2_097_151]);
//! ```

use std::io::Read;

use tracing::debug;

use super::iter::{BoundaryIter, ChunkIter};
use crate::cdc::RollingChecksum;
use crate::chunk::{ChunkBoundary, CutKind};
use crate::config::{ChunkConfig, TailPolicy};
use crate::error::ChunkError;

/// Streaming boundary detector.
///
/// `Chunker` owns one [`RollingChecksum`] and the length of the chunk being
/// accumulated. Feed it bytes in stream order, one at a time with
/// [`Chunker::process_byte`] or as slices with [`Chunker::boundaries`]. How
/// the input is split into calls never changes the result.
///
/// It never fails and holds O(`window_size`) memory regardless of stream
/// length. One instance serves one stream; chunk parallel streams with
/// separate instances.
#[derive(Debug, Clone)]
pub struct Chunker {
    checksum: RollingChecksum,

    /// Bytes accumulated since the last boundary.
    current_length: usize,

    /// Absolute position of the next byte.
    offset: u64,

    /// Weight reported for size-cap cuts.
    max_bits: u32,

    config: ChunkConfig,
}

impl Chunker {
    /// Creates a chunker for a fresh stream.
    ///
    /// # Panics
    ///
    /// Panics if `config` fails [`ChunkConfig::validate`]. Use
    /// [`Chunker::try_new`] to get an error instead.
    ///
    /// # Example
    ///
    /// ```
    /// use rollsplit::{ChunkConfig, Chunker};
    ///
    /// let chunker = Chunker::new(ChunkConfig::default());
    /// assert_eq!(chunker.offset(), 0);
    /// ```
    pub fn new(config: ChunkConfig) -> Self {
        match Self::try_new(config) {
            Ok(chunker) => chunker,
            Err(e) => panic!("{e}"),
        }
    }

    /// Creates a chunker, validating `config` first.
    pub fn try_new(config: ChunkConfig) -> Result<Self, ChunkError> {
        Ok(Self {
            checksum: RollingChecksum::try_new(&config)?,
            current_length: 0,
            offset: 0,
            max_bits: config.max_blob_size().ilog2(),
            config,
        })
    }

    /// Processes the next byte of the stream.
    ///
    /// Returns the boundary closing the current chunk if this byte ends it.
    /// The boundary offset is the absolute position of `byte` itself.
    #[inline]
    pub fn process_byte(&mut self, byte: u8) -> Option<ChunkBoundary> {
        self.current_length += 1;
        self.checksum.roll(byte);
        let on_split = self.checksum.is_split_candidate();

        let at = self.offset;
        self.offset += 1;

        let (kind, bits) = if self.current_length == self.config.max_blob_size() {
            (CutKind::MaxSize, self.max_bits)
        } else if on_split && self.current_length > self.config.too_small_threshold() {
            (CutKind::Checksum, self.checksum.bits())
        } else {
            return None;
        };

        self.current_length = 0;
        Some(ChunkBoundary::new(at, kind, bits))
    }

    /// Returns a lazy iterator over the boundaries found in `data`.
    ///
    /// Bytes are consumed only as the iterator advances; dropping it early
    /// leaves the rest of `data` unprocessed.
    pub fn boundaries<'a>(&'a mut self, data: &'a [u8]) -> Boundaries<'a> {
        Boundaries {
            chunker: self,
            bytes: data.iter(),
        }
    }

    /// Processes `data` up to and including the first byte that closes a
    /// chunk.
    ///
    /// Returns how many bytes of `data` were consumed together with the
    /// boundary, or `None` when all of `data` was consumed without a cut.
    pub fn find_boundary(&mut self, data: &[u8]) -> Option<(usize, ChunkBoundary)> {
        data.iter()
            .enumerate()
            .find_map(|(i, &byte)| self.process_byte(byte).map(|b| (i + 1, b)))
    }

    /// Ends the stream.
    ///
    /// With [`TailPolicy::Emit`], returns an end-of-stream boundary at the
    /// last byte if any bytes followed the last cut. With
    /// [`TailPolicy::Drop`], those bytes are discarded and `None` is returned.
    /// Either way the pending length is cleared, so a second call returns
    /// `None`.
    pub fn finish(&mut self) -> Option<ChunkBoundary> {
        match self.config.tail_policy() {
            TailPolicy::Emit => self.take_tail(),
            TailPolicy::Drop => {
                if self.current_length > 0 {
                    debug!(
                        tail_bytes = self.current_length,
                        offset = self.offset,
                        "dropping trailing partial chunk"
                    );
                    self.current_length = 0;
                }
                None
            }
        }
    }

    /// Closes the pending chunk at the last processed byte, regardless of
    /// tail policy.
    pub(crate) fn take_tail(&mut self) -> Option<ChunkBoundary> {
        if self.current_length == 0 {
            return None;
        }
        self.current_length = 0;
        Some(ChunkBoundary::new(self.offset - 1, CutKind::EndOfStream, 0))
    }

    /// Starts a new chunk at the current offset, keeping the checksum window.
    ///
    /// Used when a data-carrying adapter takes over a chunker that may have
    /// consumed bytes the adapter never saw.
    pub(crate) fn begin_chunk(&mut self) {
        if self.current_length > 0 {
            debug!(
                pending = self.current_length,
                offset = self.offset,
                "restarting chunk length at adapter start"
            );
            self.current_length = 0;
        }
    }

    /// Resets all state for a new stream, keeping the configuration.
    pub fn reset(&mut self) {
        self.checksum.reset();
        self.current_length = 0;
        self.offset = 0;
    }

    /// Wraps a reader in a lazy iterator of boundaries.
    ///
    /// The iterator continues from this chunker's current state and honors
    /// the configured [`TailPolicy`] when the reader is exhausted.
    ///
    /// # Example
    ///
    /// ```
    /// use std::io::Cursor;
    /// use rollsplit::{ChunkConfig, Chunker, TailPolicy};
    ///
    /// let config = ChunkConfig::default().with_tail_policy(TailPolicy::Emit);
    /// let offsets: Vec<u64> = Chunker::new(config)
    ///     .read_boundaries(Cursor::new(vec![7u8; 100]))
    ///     .map(|b| b.map(|b| b.offset()))
    ///     .collect::<Result<_, _>>()?;
    ///
    /// assert_eq!(offsets, vec![99]);
    /// # Ok::<(), rollsplit::ChunkError>(())
    /// ```
    pub fn read_boundaries<R: Read>(self, reader: R) -> BoundaryIter<R> {
        BoundaryIter::new(reader, self)
    }

    /// Wraps a reader in a lazy iterator of data chunks.
    ///
    /// The final partial chunk is always yielded so the chunks cover the
    /// whole stream. The first chunk starts at [`Chunker::offset`]; bytes
    /// already processed are not part of any chunk, and the size gates count
    /// from there.
    pub fn read_chunks<R: Read>(self, reader: R) -> ChunkIter<R> {
        ChunkIter::new(reader, self)
    }

    /// Returns the number of bytes processed since the stream started.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns the number of bytes accumulated since the last boundary.
    pub fn current_length(&self) -> usize {
        self.current_length
    }

    /// Returns the rolling checksum state.
    pub fn checksum(&self) -> &RollingChecksum {
        &self.checksum
    }

    /// Returns the configuration used by this chunker.
    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(ChunkConfig::default())
    }
}

/// Lazy iterator over the boundaries in a byte slice.
///
/// Created by [`Chunker::boundaries`].
#[derive(Debug)]
pub struct Boundaries<'a> {
    chunker: &'a mut Chunker,
    bytes: std::slice::Iter<'a, u8>,
}

impl Iterator for Boundaries<'_> {
    type Item = ChunkBoundary;

    fn next(&mut self) -> Option<Self::Item> {
        let chunker = &mut *self.chunker;
        self.bytes.find_map(|&byte| chunker.process_byte(byte))
    }
}
