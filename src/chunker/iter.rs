//! Reader-driven iterators: [`BoundaryIter`] and [`ChunkIter`].
//!
//! Both pull from a [`std::io::Read`] source in fixed-size reads, so memory
//! use does not depend on stream length. [`BoundaryIter`] only reports cut
//! positions; [`ChunkIter`] also hands back the bytes of each chunk.
//!
//! # Example
//!
//! ```no_run
//! use std::fs::File;
//! use rollsplit::{ChunkConfig, Chunker};
//!
//! let file = File::open("disk.img")?;
//! for boundary in Chunker::new(ChunkConfig::default()).read_boundaries(file) {
//!     println!("{}", boundary?);
//! }
//! # Ok::<(), rollsplit::ChunkError>(())
//! ```

use std::io::Read;

use tracing::{debug, trace};

use super::Chunker;
use crate::buffer::ReadBuffer;
use crate::chunk::{Chunk, ChunkBoundary};
use crate::error::ChunkError;

/// An iterator that yields chunk boundaries from a reader.
///
/// Created by [`Chunker::read_boundaries`]. Once the reader is exhausted
/// the configured [`TailPolicy`](crate::TailPolicy) decides whether a final
/// end-of-stream boundary is yielded. After an I/O error the iterator is
/// fused and yields `None`.
pub struct BoundaryIter<R> {
    reader: R,
    chunker: Chunker,
    buffer: ReadBuffer,
    emitted: u64,
    finished: bool,
}

impl<R: Read> BoundaryIter<R> {
    pub(crate) fn new(reader: R, chunker: Chunker) -> Self {
        Self {
            reader,
            chunker,
            buffer: ReadBuffer::take(),
            emitted: 0,
            finished: false,
        }
    }

    /// Returns the chunker driving this iterator.
    pub fn chunker(&self) -> &Chunker {
        &self.chunker
    }

    /// Consumes the iterator and returns the reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Iterator for BoundaryIter<R> {
    type Item = Result<ChunkBoundary, ChunkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            if let Some((used, boundary)) = self.chunker.find_boundary(self.buffer.remaining()) {
                self.buffer.consume(used);
                self.emitted += 1;
                trace!(offset = boundary.offset(), kind = ?boundary.kind(), "boundary");
                return Some(Ok(boundary));
            }

            match self.buffer.refill(&mut self.reader) {
                Ok(0) => {
                    self.finished = true;
                    let tail = self.chunker.finish();
                    self.emitted += u64::from(tail.is_some());
                    debug!(
                        bytes = self.chunker.offset(),
                        boundaries = self.emitted,
                        "boundary stream finished"
                    );
                    return tail.map(Ok);
                }
                Ok(_) => {}
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}

/// An iterator that yields data chunks from a reader.
///
/// Created by [`Chunker::read_chunks`]. Each chunk is copied out of the
/// read buffer, so at most `max_blob_size` bytes are held at once. The
/// trailing partial chunk is always yielded, with
/// [`CutKind::EndOfStream`](crate::CutKind::EndOfStream).
pub struct ChunkIter<R> {
    reader: R,
    chunker: Chunker,
    buffer: ReadBuffer,
    chunk_buffer: Vec<u8>,
    chunk_start: u64,
    finished: bool,
}

impl<R: Read> ChunkIter<R> {
    pub(crate) fn new(reader: R, mut chunker: Chunker) -> Self {
        chunker.begin_chunk();
        let chunk_start = chunker.offset();
        Self {
            reader,
            chunk_buffer: Vec::with_capacity(chunker.config().too_small_threshold()),
            chunker,
            buffer: ReadBuffer::take(),
            chunk_start,
            finished: false,
        }
    }

    fn emit_chunk(&mut self, boundary: ChunkBoundary) -> Chunk {
        let hash_config = *self.chunker.config().hash_config();
        let chunk = Chunk::drain_from(
            &mut self.chunk_buffer,
            &mut self.chunk_start,
            boundary.kind(),
            &hash_config,
        );
        trace!(offset = chunk.offset, len = chunk.len(), kind = ?chunk.kind, "chunk");
        chunk
    }
}

impl<R: Read> Iterator for ChunkIter<R> {
    type Item = Result<Chunk, ChunkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let rest = self.buffer.remaining();
            match self.chunker.find_boundary(rest) {
                Some((used, boundary)) => {
                    self.chunk_buffer.extend_from_slice(&rest[..used]);
                    self.buffer.consume(used);
                    return Some(Ok(self.emit_chunk(boundary)));
                }
                None => {
                    let used = rest.len();
                    self.chunk_buffer.extend_from_slice(rest);
                    self.buffer.consume(used);
                }
            }

            match self.buffer.refill(&mut self.reader) {
                Ok(0) => {
                    self.finished = true;
                    debug!(
                        bytes = self.chunker.offset(),
                        tail_bytes = self.chunk_buffer.len(),
                        "chunk stream finished"
                    );
                    return self
                        .chunker
                        .take_tail()
                        .map(|boundary| Ok(self.emit_chunk(boundary)));
                }
                Ok(_) => {}
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor};

    use super::*;
    use crate::chunk::CutKind;
    use crate::config::{ChunkConfig, HashConfig, TailPolicy};

    fn small_config() -> ChunkConfig {
        ChunkConfig::new(16, 6, 1024, 128).unwrap()
    }

    fn sample(len: usize) -> Vec<u8> {
        (0..len as u32).map(|i| (i.wrapping_mul(2_654_435_761) >> 9) as u8).collect()
    }

    #[test]
    fn test_boundary_iter_matches_slice_api() {
        let data = sample(100_000);

        let expected: Vec<_> = Chunker::new(small_config()).boundaries(&data).collect();
        let actual: Vec<_> = Chunker::new(small_config())
            .read_boundaries(Cursor::new(&data))
            .collect::<Result<_, _>>()
            .unwrap();

        assert!(!expected.is_empty());
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_boundary_iter_tail_policy() {
        let data = vec![0u8; 2500];

        let dropped: Vec<u64> = Chunker::new(small_config())
            .read_boundaries(Cursor::new(&data))
            .map(|b| b.unwrap().offset())
            .collect();
        assert_eq!(dropped, vec![1023, 2047]);

        let config = small_config().with_tail_policy(TailPolicy::Emit);
        let emitted: Vec<_> = Chunker::new(config)
            .read_boundaries(Cursor::new(&data))
            .map(Result::unwrap)
            .collect();
        assert_eq!(emitted.len(), 3);
        assert_eq!(emitted[2].offset(), 2499);
        assert_eq!(emitted[2].kind(), CutKind::EndOfStream);
    }

    #[test]
    fn test_boundary_iter_empty_reader() {
        let config = small_config().with_tail_policy(TailPolicy::Emit);
        let mut iter = Chunker::new(config).read_boundaries(io::empty());
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_boundary_iter_fuses_after_error() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("disk on fire"))
            }
        }

        let mut iter = Chunker::default().read_boundaries(Broken);
        assert!(matches!(iter.next(), Some(Err(ChunkError::Io(_)))));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_chunk_iter_covers_input() {
        let data = sample(50_000);
        let chunks: Vec<Chunk> = Chunker::new(small_config())
            .read_chunks(Cursor::new(&data))
            .collect::<Result<_, _>>()
            .unwrap();

        let mut expected_offset = 0;
        for chunk in &chunks {
            assert_eq!(chunk.offset, expected_offset);
            assert!(chunk.len() <= 1024);
            expected_offset = chunk.end();
        }
        assert_eq!(expected_offset, data.len() as u64);

        let joined: Vec<u8> = chunks.iter().flat_map(|c| c.data.iter().copied()).collect();
        assert_eq!(joined, data);
    }

    #[test]
    fn test_chunk_iter_ends_match_boundaries() {
        let data = sample(50_000);
        let boundaries: Vec<u64> = Chunker::new(small_config())
            .boundaries(&data)
            .map(|b| b.offset())
            .collect();

        let chunks: Vec<Chunk> = Chunker::new(small_config())
            .read_chunks(Cursor::new(&data))
            .collect::<Result<_, _>>()
            .unwrap();

        let (tail, cut) = chunks.split_last().unwrap();
        let cut_ends: Vec<u64> = cut.iter().filter_map(Chunk::last_byte_offset).collect();
        if tail.kind == CutKind::EndOfStream {
            assert_eq!(cut_ends, boundaries);
        } else {
            assert_eq!(cut_ends.len() + 1, boundaries.len());
        }
    }

    #[test]
    fn test_chunk_iter_after_partial_chunk() {
        let mut chunker = Chunker::new(small_config());
        assert_eq!(chunker.boundaries(&[0u8; 700]).count(), 0);

        let chunks: Vec<Chunk> = chunker
            .read_chunks(Cursor::new(vec![0u8; 1200]))
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(chunks[0].offset, 700);
        assert_eq!(chunks[0].len(), 1024);
        assert_eq!(chunks[0].kind, CutKind::MaxSize);
        assert_eq!(chunks[1].offset, 1724);
        assert_eq!(chunks[1].len(), 176);
    }

    #[test]
    fn test_chunk_iter_hashing() {
        let data = sample(5_000);
        let hashed = small_config().with_hash_config(HashConfig::enabled());
        let plain = small_config().with_hash_config(HashConfig::disabled());

        for chunk in Chunker::new(plain).read_chunks(Cursor::new(&data)) {
            assert!(chunk.unwrap().hash.is_none());
        }

        #[cfg(feature = "hash-blake3")]
        for chunk in Chunker::new(hashed).read_chunks(Cursor::new(&data)) {
            let chunk = chunk.unwrap();
            assert_eq!(chunk.hash, Some(crate::ChunkHash::of(&chunk.data)));
        }
        #[cfg(not(feature = "hash-blake3"))]
        let _ = hashed;
    }
}
