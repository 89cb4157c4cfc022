//! Rolling checksum over a sliding byte window.
//!
//! This is the bup/rsync style checksum: two 32-bit sums over the last
//! `window_size` bytes, both updated in O(1) per byte from the entering byte
//! and the byte leaving the window.
//!
//! # Algorithm Overview
//!
//! With `W` the window length, `c` the character offset and `drop` the byte
//! leaving the window:
//!
//! ```text
//! s1 <- s1 + add - drop
//! s2 <- s2 + s1 - W * (drop + c)
//! ```
//!
//! Both sums wrap modulo 2^32. A byte is a split candidate when the low
//! `blob_bits` bits of `s2` are all ones, which for well-mixed input happens
//! about once every `2^blob_bits` bytes.
//!
//! The sums only depend on the bytes currently inside the window, so two
//! streams that share a run of at least `W` bytes agree on every split
//! candidate inside that run.

use crate::config::ChunkConfig;
use crate::error::ChunkError;

/// Rolling checksum state.
///
/// # Example
///
/// ```
/// use rollsplit::RollingChecksum;
///
/// let mut rs = RollingChecksum::default();
/// assert_eq!(rs.s1(), 1984);
/// assert_eq!(rs.s2(), 124_992);
///
/// for &byte in b"hello world" {
///     rs.roll(byte);
/// }
/// assert!(!rs.is_split_candidate());
/// ```
#[derive(Debug, Clone)]
pub struct RollingChecksum {
    /// Running sum of `byte + char_offset` over the window.
    s1: u32,

    /// Running weighted sum.
    s2: u32,

    /// Circular buffer holding the last `window_size` bytes.
    window: Box<[u8]>,

    /// Slot holding the oldest byte, overwritten by the next roll.
    cursor: usize,

    /// `window.len()` as the 32-bit multiplier used by `roll`.
    window_weight: u32,

    char_offset: u32,

    blob_bits: u32,

    blob_mask: u32,

    split_mask: u32,
}

impl RollingChecksum {
    /// Creates a checksum over a zero-filled window using the parameters in `config`.
    ///
    /// # Panics
    ///
    /// Panics if `config` fails [`ChunkConfig::validate`]. Use
    /// [`RollingChecksum::try_new`] to get an error instead.
    pub fn new(config: &ChunkConfig) -> Self {
        match Self::try_new(config) {
            Ok(rs) => rs,
            Err(e) => panic!("{e}"),
        }
    }

    /// Creates a checksum, validating `config` first.
    pub fn try_new(config: &ChunkConfig) -> Result<Self, ChunkError> {
        config.validate()?;

        let window_weight =
            u32::try_from(config.window_size()).map_err(|_| ChunkError::InvalidConfig {
                message: "window_size must fit in 32 bits",
            })?;
        let char_offset = config.char_offset();

        Ok(Self {
            s1: initial_s1(window_weight, char_offset),
            s2: initial_s2(window_weight, char_offset),
            window: vec![0u8; config.window_size()].into_boxed_slice(),
            cursor: 0,
            window_weight,
            char_offset,
            blob_bits: config.blob_bits(),
            blob_mask: config.blob_mask(),
            split_mask: config.split_mask(),
        })
    }

    /// Restores the zero-window state without reallocating.
    pub fn reset(&mut self) {
        self.window.fill(0);
        self.cursor = 0;
        self.s1 = initial_s1(self.window_weight, self.char_offset);
        self.s2 = initial_s2(self.window_weight, self.char_offset);
    }

    /// Pushes `add` into the window, evicting the oldest byte.
    ///
    /// Reads the evicted byte, updates `s1` then `s2` (in that order, `s2`
    /// uses the new `s1`), stores `add` and advances the cursor. Arithmetic
    /// wraps.
    #[inline]
    pub fn roll(&mut self, add: u8) {
        let drop = self.window[self.cursor];

        self.s1 = self
            .s1
            .wrapping_add(u32::from(add))
            .wrapping_sub(u32::from(drop));
        self.s2 = self.s2.wrapping_add(self.s1).wrapping_sub(
            self.window_weight
                .wrapping_mul(u32::from(drop).wrapping_add(self.char_offset)),
        );

        self.window[self.cursor] = add;
        self.cursor += 1;
        if self.cursor == self.window.len() {
            self.cursor = 0;
        }
    }

    /// Returns true if the current position is a candidate split point.
    #[inline]
    pub fn is_split_candidate(&self) -> bool {
        (self.s2 & self.blob_mask) == self.split_mask
    }

    /// Returns the combined 32-bit digest, `s1` in the high half and the low
    /// 16 bits of `s2` in the low half.
    pub fn digest(&self) -> u32 {
        (self.s1 << 16) | (self.s2 & 0xffff)
    }

    /// Returns the weight of the current split point.
    ///
    /// Starts at `blob_bits` and adds one for each consecutive one bit in the
    /// digest above the masked bits. Rarer split points score higher, which
    /// lets a consumer arrange chunks into a hierarchy of spans.
    pub fn bits(&self) -> u32 {
        let mut bits = self.blob_bits;
        let mut rsum = self.digest() >> self.blob_bits;
        while (rsum >> 1) & 1 != 0 {
            rsum >>= 1;
            bits += 1;
        }
        bits
    }

    /// Returns the plain running sum.
    pub fn s1(&self) -> u32 {
        self.s1
    }

    /// Returns the weighted running sum.
    pub fn s2(&self) -> u32 {
        self.s2
    }

    /// Returns the window length in bytes.
    pub fn window_size(&self) -> usize {
        self.window.len()
    }
}

impl Default for RollingChecksum {
    fn default() -> Self {
        Self::new(&ChunkConfig::default())
    }
}

fn initial_s1(window: u32, char_offset: u32) -> u32 {
    window.wrapping_mul(char_offset)
}

fn initial_s2(window: u32, char_offset: u32) -> u32 {
    window
        .wrapping_mul(window.wrapping_sub(1))
        .wrapping_mul(char_offset)
}
