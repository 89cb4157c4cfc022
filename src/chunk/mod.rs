//! Chunk types.
//!
//! - [`ChunkBoundary`] - Where a chunk ends, and why ([`CutKind`])
//! - [`Chunk`] - Chunk bytes with offset, cut kind and optional hash
//! - [`ChunkHash`] - 32-byte BLAKE3 digest

mod boundary;
mod data;
mod hash;

pub use boundary::{ChunkBoundary, CutKind};
pub use data::Chunk;
pub use hash::ChunkHash;
