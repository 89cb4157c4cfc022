//! Chunking engine for processing byte streams.
//!
//! - [`Chunker`] - Boundary policy over a rolling checksum, fed byte by byte
//! - [`Boundaries`] - Lazy boundaries within one slice
//! - [`Splitter`] - Push/finish API producing zero-copy data chunks
//! - [`BoundaryIter`] / [`ChunkIter`] - Lazy iterators over a [`std::io::Read`] source

mod engine;
mod iter;
mod splitter;

pub use engine::{Boundaries, Chunker};
pub use iter::{BoundaryIter, ChunkIter};
pub use splitter::Splitter;
