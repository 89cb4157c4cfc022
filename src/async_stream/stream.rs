//! Async stream adapter for chunking.
//!
//! # Example
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use rollsplit::{chunk_async, ChunkConfig};
//! use futures_io::AsyncRead;
//!
//! async fn demo<R: AsyncRead + Unpin>(reader: R) -> Result<(), rollsplit::ChunkError> {
//!     let mut stream = chunk_async(reader, ChunkConfig::default());
//!
//!     while let Some(chunk) = stream.next().await {
//!         let chunk = chunk?;
//!         println!("chunk at {}: {} bytes", chunk.offset, chunk.len());
//!     }
//!     Ok(())
//! }
//! ```

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use futures_io::AsyncRead;
use pin_project_lite::pin_project;
use tracing::{debug, trace};

use crate::chunk::{Chunk, ChunkBoundary};
use crate::chunker::Chunker;
use crate::config::ChunkConfig;
use crate::error::ChunkError;

const ASYNC_READ_SIZE: usize = 8192;

pin_project! {
    /// A stream that yields data chunks from an async reader.
    ///
    /// Boundaries are the same as [`Chunker::read_chunks`] finds over the
    /// same bytes. The trailing partial chunk is always yielded. After an
    /// I/O error the stream ends.
    pub struct ChunkStream<R> {
        #[pin]
        reader: R,
        chunker: Chunker,
        read_buf: Vec<u8>,
        pos: usize,
        filled: usize,
        chunk_buf: Vec<u8>,
        chunk_start: u64,
        finished: bool,
    }
}

impl<R> ChunkStream<R> {
    /// Creates a chunk stream over `reader`.
    ///
    /// # Panics
    ///
    /// Panics if `config` fails [`ChunkConfig::validate`].
    pub fn new(reader: R, config: ChunkConfig) -> Self {
        Self::from_chunker(reader, Chunker::new(config))
    }

    /// Creates a chunk stream continuing from `chunker`'s state.
    ///
    /// The first chunk starts at [`Chunker::offset`]; bytes already
    /// processed belong to no chunk.
    pub fn from_chunker(reader: R, mut chunker: Chunker) -> Self {
        chunker.begin_chunk();
        Self {
            reader,
            chunk_buf: Vec::with_capacity(chunker.config().too_small_threshold()),
            chunk_start: chunker.offset(),
            chunker,
            read_buf: vec![0u8; ASYNC_READ_SIZE],
            pos: 0,
            filled: 0,
            finished: false,
        }
    }

    /// Returns the chunker driving this stream.
    pub fn chunker(&self) -> &Chunker {
        &self.chunker
    }
}

fn emit_chunk(chunker: &Chunker, buf: &mut Vec<u8>, start: &mut u64, boundary: ChunkBoundary) -> Chunk {
    let chunk = Chunk::drain_from(buf, start, boundary.kind(), chunker.config().hash_config());
    trace!(offset = chunk.offset, len = chunk.len(), kind = ?chunk.kind, "chunk");
    chunk
}

impl<R: AsyncRead> Stream for ChunkStream<R> {
    type Item = Result<Chunk, ChunkError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.finished {
            return Poll::Ready(None);
        }

        loop {
            let rest = &this.read_buf[*this.pos..*this.filled];
            match this.chunker.find_boundary(rest) {
                Some((used, boundary)) => {
                    this.chunk_buf.extend_from_slice(&rest[..used]);
                    *this.pos += used;
                    let chunk = emit_chunk(this.chunker, this.chunk_buf, this.chunk_start, boundary);
                    return Poll::Ready(Some(Ok(chunk)));
                }
                None => {
                    this.chunk_buf.extend_from_slice(rest);
                    *this.pos = *this.filled;
                }
            }

            match this.reader.as_mut().poll_read(cx, &mut this.read_buf[..]) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Err(e)) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Poll::Ready(Err(e)) => {
                    *this.finished = true;
                    return Poll::Ready(Some(Err(ChunkError::Io(e))));
                }
                Poll::Ready(Ok(0)) => {
                    *this.finished = true;
                    debug!(
                        bytes = this.chunker.offset(),
                        tail_bytes = this.chunk_buf.len(),
                        "async chunk stream finished"
                    );
                    return match this.chunker.take_tail() {
                        Some(boundary) => {
                            let chunk = emit_chunk(this.chunker, this.chunk_buf, this.chunk_start, boundary);
                            Poll::Ready(Some(Ok(chunk)))
                        }
                        None => Poll::Ready(None),
                    };
                }
                Poll::Ready(Ok(n)) => {
                    *this.pos = 0;
                    *this.filled = n;
                }
            }
        }
    }
}

/// Creates a chunk stream from an async reader.
///
/// Uses `futures_io::AsyncRead`, so any runtime works. Tokio readers can be
/// adapted with `tokio_util::compat`:
///
/// ```ignore
/// use tokio_util::compat::TokioAsyncReadCompatExt;
/// use rollsplit::{chunk_async, ChunkConfig};
///
/// let file = tokio::fs::File::open("disk.img").await?;
/// let stream = chunk_async(file.compat(), ChunkConfig::default());
/// ```
///
/// # Panics
///
/// Panics if `config` fails [`ChunkConfig::validate`].
pub fn chunk_async<R: AsyncRead>(reader: R, config: ChunkConfig) -> ChunkStream<R> {
    ChunkStream::new(reader, config)
}
