//! Chunk hash types.

use std::fmt;

use crate::config::HashConfig;

/// A 32-byte BLAKE3 digest identifying chunk content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkHash([u8; 32]);

impl ChunkHash {
    /// The size of the hash in bytes.
    pub const SIZE: usize = 32;

    /// Wraps raw digest bytes.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Hashes `data` with BLAKE3.
    #[cfg(feature = "hash-blake3")]
    pub fn of(data: &[u8]) -> Self {
        Self(blake3::hash(data).into())
    }

    /// Returns the digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the lowercase hex form, 64 characters long.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }

    /// Parses the hex form produced by [`ChunkHash::to_hex`].
    ///
    /// Returns `None` unless `hex` is exactly 64 hex digits.
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != Self::SIZE * 2 || !hex.is_ascii() {
            return None;
        }
        let mut bytes = [0u8; 32];
        for (byte, pair) in bytes.iter_mut().zip(hex.as_bytes().chunks_exact(2)) {
            let pair = std::str::from_utf8(pair).ok()?;
            *byte = u8::from_str_radix(pair, 16).ok()?;
        }
        Some(Self(bytes))
    }
}

impl AsRef<[u8]> for ChunkHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for ChunkHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Hashes `data` when hashing is enabled and compiled in.
pub(crate) fn hash_if_enabled(config: &HashConfig, data: &[u8]) -> Option<ChunkHash> {
    if !config.enabled {
        return None;
    }
    #[cfg(feature = "hash-blake3")]
    return Some(ChunkHash::of(data));
    #[cfg(not(feature = "hash-blake3"))]
    {
        let _ = data;
        None
    }
}
