//! rollsplit
//!
//! Streaming content-defined chunking with a bup-style rolling checksum.
//!
//! `rollsplit` turns a byte stream into chunks whose boundaries depend only
//! on the bytes near them, so an insertion or deletion in one place leaves
//! the boundaries elsewhere untouched. That makes it a building block for:
//!
//! - deduplicating backup stores
//! - delta synchronization
//! - content-addressable storage
//!
//! A boundary is placed after a byte when the chunk has reached
//! `max_blob_size` bytes, or when the rolling checksum over the last
//! `window_size` bytes matches the split mask and the chunk is already longer
//! than `too_small_threshold` bytes. The crate does not store chunks, open
//! files or manage concurrency.
//!
//! # Boundaries
//!
//! ```
//! use rollsplit::{ChunkConfig, Chunker};
//!
//! let mut chunker = Chunker::new(ChunkConfig::default());
//! let cuts: Vec<u64> = chunker.boundaries(&vec![0u8; 2_200_000]).map(|b| b.offset()).collect();
//! assert_eq!(cuts, vec![1_048_575, 2_097_151]);
//! ```
//!
//! # Chunks from a reader
//!
//! ```no_run
//! use std::fs::File;
//! use rollsplit::{ChunkConfig, ChunkError, Chunker};
//!
//! fn main() -> Result<(), ChunkError> {
//!     let file = File::open("disk.img")?;
//!
//!     for chunk in Chunker::new(ChunkConfig::default()).read_chunks(file) {
//!         let chunk = chunk?;
//!         println!("{chunk}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Async (feature = "async-io")
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use rollsplit::{chunk_async, ChunkConfig};
//!
//! let mut stream = chunk_async(reader, ChunkConfig::default());
//! while let Some(chunk) = stream.next().await {
//!     println!("chunk {}", chunk?.len());
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chunk;
mod chunker;
mod config;
mod error;

mod buffer; // internal (thread-local reuse)
mod cdc; // rolling checksum
mod util;

#[cfg(feature = "async-io")]
mod async_stream;

pub use cdc::RollingChecksum;
pub use chunk::{Chunk, ChunkBoundary, ChunkHash, CutKind};
pub use chunker::{Boundaries, BoundaryIter, ChunkIter, Chunker, Splitter};
pub use config::{
    ChunkConfig, HashConfig, TailPolicy, DEFAULT_BLOB_BITS, DEFAULT_CHAR_OFFSET,
    DEFAULT_MAX_BLOB_SIZE, DEFAULT_TOO_SMALL_THRESHOLD, DEFAULT_WINDOW_SIZE,
};
pub use error::ChunkError;

#[cfg(feature = "async-io")]
pub use async_stream::{chunk_async, ChunkStream};
