//! Push-based splitter over `Bytes` batches.
//!
//! [`Splitter`] is the data-carrying counterpart of [`Chunker`]: feed it
//! batches of any size with `push()` and it returns the complete chunks,
//! sliced zero-copy out of the input where possible. Call `finish()` when
//! the stream ends to collect the trailing chunk.
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use rollsplit::{ChunkConfig, Splitter};
//!
//! let mut splitter = Splitter::new(ChunkConfig::default());
//!
//! let (chunks, _pending) = splitter.push(Bytes::from(vec![0u8; 1_500_000]));
//! assert_eq!(chunks.len(), 1);
//! assert_eq!(chunks[0].len(), 1 << 20);
//!
//! let tail = splitter.finish().expect("451,424 bytes remain");
//! assert_eq!(tail.offset, 1 << 20);
//! ```

use bytes::Bytes;

use super::Chunker;
use crate::chunk::{Chunk, CutKind};
use crate::config::ChunkConfig;
use crate::util::concat_bytes;

/// Splits a stream of `Bytes` batches into content-defined chunks.
///
/// Boundaries are identical to [`Chunker::boundaries`] over the
/// concatenated input, however the batches are sized.
///
/// # Zero-Copy
///
/// A chunk that lies entirely inside one pushed batch is a slice of that
/// batch. Only chunks spanning several batches are copied together.
#[derive(Debug)]
pub struct Splitter {
    chunker: Chunker,
    pending: Option<Bytes>,
    chunk_start: u64,
}

impl Splitter {
    /// Creates a splitter for a fresh stream.
    ///
    /// # Panics
    ///
    /// Panics if `config` fails [`ChunkConfig::validate`].
    pub fn new(config: ChunkConfig) -> Self {
        Self::from_chunker(Chunker::new(config))
    }

    /// Creates a splitter continuing from `chunker`'s state.
    ///
    /// The checksum window carries over, but the first chunk starts at
    /// [`Chunker::offset`] with an empty length: bytes the chunker already
    /// processed belong to no chunk, so no chunk is reported short or
    /// without its data.
    pub fn from_chunker(mut chunker: Chunker) -> Self {
        chunker.begin_chunk();
        Self {
            chunk_start: chunker.offset(),
            chunker,
            pending: None,
        }
    }

    /// Pushes the next batch and returns the chunks it completes.
    ///
    /// Returns `(chunks, pending)`, where `pending` is a view of the bytes
    /// that follow the last cut and are held internally until a later push
    /// or [`Splitter::finish`] closes them. The caller does not feed
    /// `pending` back in.
    pub fn push(&mut self, data: Bytes) -> (Vec<Chunk>, Bytes) {
        let mut chunks = Vec::new();
        let mut start = 0;

        while let Some((used, boundary)) = self.chunker.find_boundary(&data[start..]) {
            let end = start + used;
            let chunk_data = match self.pending.take() {
                Some(pending) => concat_bytes(&pending, &data[start..end]),
                None => data.slice(start..end),
            };
            chunks.push(self.make_chunk(chunk_data, boundary.kind()));
            start = end;
        }

        if start < data.len() {
            let rest = data.slice(start..);
            self.pending = Some(match self.pending.take() {
                Some(pending) => concat_bytes(&pending, &rest),
                None => rest,
            });
        }

        (chunks, self.pending.clone().unwrap_or_default())
    }

    /// Splits a whole in-memory buffer, including its trailing chunk.
    ///
    /// # Example
    ///
    /// ```
    /// use rollsplit::{ChunkConfig, Splitter};
    ///
    /// let mut splitter = Splitter::new(ChunkConfig::default());
    /// let chunks = splitter.split(&b"hello world"[..]);
    /// assert_eq!(chunks.len(), 1);
    /// assert_eq!(&chunks[0].data[..], b"hello world");
    /// ```
    pub fn split(&mut self, data: impl Into<Bytes>) -> Vec<Chunk> {
        let (mut chunks, _) = self.push(data.into());
        chunks.extend(self.finish());
        chunks
    }

    /// Ends the stream and returns the trailing chunk, if any bytes follow
    /// the last cut.
    ///
    /// The chunk is returned whatever the configured
    /// [`TailPolicy`](crate::TailPolicy); its kind is
    /// [`CutKind::EndOfStream`](crate::CutKind::EndOfStream).
    pub fn finish(&mut self) -> Option<Chunk> {
        let boundary = self.chunker.take_tail()?;
        let data = self.pending.take().unwrap_or_default();
        Some(self.make_chunk(data, boundary.kind()))
    }

    /// Resets the splitter for a new stream.
    pub fn reset(&mut self) {
        self.chunker.reset();
        self.pending = None;
        self.chunk_start = 0;
    }

    /// Returns the offset where the next chunk starts.
    pub fn offset(&self) -> u64 {
        self.chunk_start
    }

    /// Returns the number of bytes held for the next chunk.
    pub fn pending_len(&self) -> usize {
        self.pending.as_ref().map_or(0, Bytes::len)
    }

    /// Returns the underlying chunker.
    pub fn chunker(&self) -> &Chunker {
        &self.chunker
    }

    fn make_chunk(&mut self, data: Bytes, kind: CutKind) -> Chunk {
        let offset = self.chunk_start;
        self.chunk_start += data.len() as u64;
        Chunk::hashed(data, offset, kind, self.chunker.config().hash_config())
    }
}

impl Default for Splitter {
    fn default() -> Self {
        Self::new(ChunkConfig::default())
    }
}
