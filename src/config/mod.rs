//! Configuration for chunking behavior.
//!
//! This module provides types to configure how chunking is performed:
//!
//! - [`ChunkConfig`] - Rolling checksum parameters, size gates and tail handling
//! - [`HashConfig`] - Whether chunk-producing APIs compute BLAKE3 hashes
//! - [`TailPolicy`] - What boundary APIs report for trailing bytes at end of stream
//!
//! # Example
//!
//! ```
//! use rollsplit::{ChunkConfig, HashConfig, TailPolicy};
//!
//! // Smaller chunks for a test corpus
//! let config = ChunkConfig::new(64, 13, 64 * 1024, 4 * 1024)?;
//! assert_eq!(config.blob_size(), 8192);
//!
//! // Report the trailing partial chunk and skip hashing
//! let config = ChunkConfig::default()
//!     .with_tail_policy(TailPolicy::Emit)
//!     .with_hash_config(HashConfig::disabled());
//! # Ok::<(), rollsplit::ChunkError>(())
//! ```

use crate::error::ChunkError;

/// Default number of bytes in the rolling checksum window.
pub const DEFAULT_WINDOW_SIZE: usize = 64;

/// Default bias added to every byte entering the checksum.
pub const DEFAULT_CHAR_OFFSET: u32 = 31;

/// Default log2 of the target chunk size (128 KiB).
pub const DEFAULT_BLOB_BITS: u32 = 17;

/// Default hard cap on chunk length (1 MiB).
pub const DEFAULT_MAX_BLOB_SIZE: usize = 1 << 20;

/// Default length a chunk must exceed before a checksum cut is honored (64 KiB).
pub const DEFAULT_TOO_SMALL_THRESHOLD: usize = 64 << 10;

/// Configuration for content-defined chunking behavior.
///
/// All values are fixed once a [`Chunker`](crate::Chunker) is built from them.
///
/// - `window_size` - Number of trailing bytes the rolling checksum covers
/// - `char_offset` - Additive bias applied to each byte in the checksum sums
/// - `blob_bits` - A byte is a split candidate when the low `blob_bits` bits of
///   the weighted sum are all ones; chunks average about `2^blob_bits` bytes
/// - `max_blob_size` - No chunk is ever longer than this
/// - `too_small_threshold` - Checksum cuts are ignored until a chunk is longer
///   than this
///
/// # Example
///
/// ```
/// use rollsplit::ChunkConfig;
///
/// let config = ChunkConfig::default()
///     .with_blob_bits(13)
///     .with_max_blob_size(64 * 1024)
///     .with_too_small_threshold(2048);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkConfig {
    window_size: usize,
    char_offset: u32,
    blob_bits: u32,
    max_blob_size: usize,
    too_small_threshold: usize,
    tail_policy: TailPolicy,
    hash_config: HashConfig,
}

impl ChunkConfig {
    /// Creates a new configuration with the given checksum and size parameters.
    ///
    /// The character offset keeps its default; use [`ChunkConfig::with_char_offset`]
    /// to change it.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if:
    /// - `window_size` or `max_blob_size` is zero
    /// - `blob_bits` is outside `1..=31`
    /// - `too_small_threshold >= max_blob_size`
    ///
    /// # Example
    ///
    /// ```
    /// use rollsplit::ChunkConfig;
    ///
    /// let config = ChunkConfig::new(64, 17, 1 << 20, 64 << 10)?;
    /// assert_eq!(config, ChunkConfig::default());
    /// # Ok::<(), rollsplit::ChunkError>(())
    /// ```
    pub fn new(
        window_size: usize,
        blob_bits: u32,
        max_blob_size: usize,
        too_small_threshold: usize,
    ) -> Result<Self, ChunkError> {
        let config = Self {
            window_size,
            blob_bits,
            max_blob_size,
            too_small_threshold,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the rolling checksum window length.
    ///
    /// Note: This does not validate the configuration. Use [`ChunkConfig::validate`]
    /// to check if the configuration is valid.
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Sets the per-byte bias used by the checksum sums.
    pub fn with_char_offset(mut self, char_offset: u32) -> Self {
        self.char_offset = char_offset;
        self
    }

    /// Sets the number of low bits of the weighted sum that must all be ones.
    ///
    /// Note: This does not validate the configuration.
    pub fn with_blob_bits(mut self, blob_bits: u32) -> Self {
        self.blob_bits = blob_bits;
        self
    }

    /// Sets the hard chunk length cap.
    ///
    /// Note: This does not validate the configuration.
    pub fn with_max_blob_size(mut self, max_blob_size: usize) -> Self {
        self.max_blob_size = max_blob_size;
        self
    }

    /// Sets the length a chunk must exceed before a checksum cut fires.
    ///
    /// Note: This does not validate the configuration.
    pub fn with_too_small_threshold(mut self, too_small_threshold: usize) -> Self {
        self.too_small_threshold = too_small_threshold;
        self
    }

    /// Sets how boundary APIs treat trailing bytes at end of stream.
    pub fn with_tail_policy(mut self, tail_policy: TailPolicy) -> Self {
        self.tail_policy = tail_policy;
        self
    }

    /// Sets the hash configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use rollsplit::{ChunkConfig, HashConfig};
    ///
    /// let config = ChunkConfig::default()
    ///     .with_hash_config(HashConfig::disabled());
    /// assert!(!config.hash_config().enabled);
    /// ```
    pub fn with_hash_config(mut self, config: HashConfig) -> Self {
        self.hash_config = config;
        self
    }

    /// Returns the rolling checksum window length.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Returns the per-byte checksum bias.
    pub fn char_offset(&self) -> u32 {
        self.char_offset
    }

    /// Returns log2 of the target chunk size.
    pub fn blob_bits(&self) -> u32 {
        self.blob_bits
    }

    /// Returns the target chunk size, `2^blob_bits`.
    ///
    /// Returns 0 when `blob_bits` is 32 or more, which [`ChunkConfig::validate`]
    /// rejects.
    pub fn blob_size(&self) -> u32 {
        1u32.checked_shl(self.blob_bits).unwrap_or(0)
    }

    /// Returns the mask selecting the low `blob_bits` bits of the weighted sum.
    pub fn blob_mask(&self) -> u32 {
        self.blob_size().wrapping_sub(1)
    }

    /// Returns the pattern the masked weighted sum must equal at a split point.
    ///
    /// This is the all-ones pattern over the masked bits.
    pub fn split_mask(&self) -> u32 {
        self.blob_mask()
    }

    /// Returns the hard chunk length cap.
    pub fn max_blob_size(&self) -> usize {
        self.max_blob_size
    }

    /// Returns the minimum length before checksum cuts are honored.
    pub fn too_small_threshold(&self) -> usize {
        self.too_small_threshold
    }

    /// Returns the tail policy.
    pub fn tail_policy(&self) -> TailPolicy {
        self.tail_policy
    }

    /// Returns the hash configuration.
    pub fn hash_config(&self) -> &HashConfig {
        &self.hash_config
    }

    /// Validates the current configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use rollsplit::ChunkConfig;
    ///
    /// let config = ChunkConfig::default().with_window_size(0);
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ChunkError> {
        if self.window_size == 0 {
            return Err(ChunkError::InvalidConfig {
                message: "window_size must be non-zero",
            });
        }

        if u32::try_from(self.window_size).is_err() {
            return Err(ChunkError::InvalidConfig {
                message: "window_size must fit in 32 bits",
            });
        }

        if !(1..=31).contains(&self.blob_bits) {
            return Err(ChunkError::InvalidConfig {
                message: "blob_bits must be between 1 and 31",
            });
        }

        if self.max_blob_size == 0 {
            return Err(ChunkError::InvalidConfig {
                message: "max_blob_size must be non-zero",
            });
        }

        if self.too_small_threshold >= self.max_blob_size {
            return Err(ChunkError::InvalidConfig {
                message: "too_small_threshold must be smaller than max_blob_size",
            });
        }

        Ok(())
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            char_offset: DEFAULT_CHAR_OFFSET,
            blob_bits: DEFAULT_BLOB_BITS,
            max_blob_size: DEFAULT_MAX_BLOB_SIZE,
            too_small_threshold: DEFAULT_TOO_SMALL_THRESHOLD,
            tail_policy: TailPolicy::default(),
            hash_config: HashConfig::default(),
        }
    }
}

/// What boundary-level APIs report for bytes left over when a stream ends.
///
/// Bytes after the last cut form a partial chunk that never met a cut
/// condition. [`TailPolicy::Drop`] leaves that chunk unreported, so boundary
/// offsets only ever mark size-cap or checksum cuts. [`TailPolicy::Emit`] adds
/// one final boundary at the last byte of the stream.
///
/// Data-producing APIs ([`Splitter`](crate::Splitter),
/// [`ChunkIter`](crate::ChunkIter)) always return the trailing chunk so that
/// the chunks concatenate back to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TailPolicy {
    /// Trailing bytes produce no boundary.
    #[default]
    Drop,
    /// Trailing bytes produce a final [`CutKind::EndOfStream`](crate::CutKind::EndOfStream) boundary.
    Emit,
}

/// Configuration for chunk hashing behavior.
///
/// `HashConfig` controls whether BLAKE3 hashes are computed for each chunk
/// produced by the data-carrying APIs. Hashing is enabled by default and has
/// no effect without the `hash-blake3` feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashConfig {
    /// Whether to compute BLAKE3 hashes for chunks.
    pub enabled: bool,
}

impl HashConfig {
    /// Creates a new hash configuration.
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Enables hashing.
    pub const fn enabled() -> Self {
        Self { enabled: true }
    }

    /// Disables hashing.
    pub const fn disabled() -> Self {
        Self { enabled: false }
    }
}

impl Default for HashConfig {
    fn default() -> Self {
        Self::enabled()
    }
}
