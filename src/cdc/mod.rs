//! Content-Defined Chunking (CDC) primitives.
//!
//! This module contains the rolling checksum that decides which byte
//! positions are eligible to become chunk boundaries.
//!
//! - [`RollingChecksum`] - bup/rsync style rolling checksum

mod rollsum;

pub use rollsum::RollingChecksum;
