// Integration tests for the push-based Splitter and the reader APIs
// Tests cover: push/finish semantics, offsets, size limits, batching, hashing

use std::io::Cursor;

use bytes::Bytes;
use rollsplit::{ChunkConfig, ChunkHash, Chunker, CutKind, HashConfig, Splitter, TailPolicy};

fn small_config() -> ChunkConfig {
    ChunkConfig::new(16, 6, 256, 32).unwrap()
}

fn noise(len: usize, seed: u32) -> Vec<u8> {
    let mut x = seed | 1;
    (0..len)
        .map(|_| {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            (x >> 24) as u8
        })
        .collect()
}

// ============================================================================
// Basic Functionality Tests
// ============================================================================

#[test]
fn test_empty_input() {
    let mut splitter = Splitter::default();
    let (chunks, pending) = splitter.push(Bytes::new());

    assert!(chunks.is_empty(), "Empty input should produce no chunks");
    assert!(pending.is_empty(), "Empty input should have no pending bytes");
    assert!(
        splitter.finish().is_none(),
        "finish() on empty state should return None"
    );
}

#[test]
fn test_small_data_below_threshold() {
    let mut splitter = Splitter::new(small_config());
    let (chunks, pending) = splitter.push(Bytes::from(vec![0xAA; 20]));

    assert!(chunks.is_empty(), "Data below the threshold should not be cut");
    assert_eq!(pending.len(), 20, "All data should be pending");

    let tail = splitter.finish().expect("finish() should emit pending data");
    assert_eq!(tail.len(), 20);
    assert_eq!(tail.kind, CutKind::EndOfStream);
}

#[test]
fn test_large_data_preserves_bytes() {
    let data = noise(20_000, 7);
    let chunks = Splitter::new(small_config()).split(data.clone());

    assert!(chunks.len() > 10, "Expected many chunks, got {}", chunks.len());
    let joined: Vec<u8> = chunks.iter().flat_map(|c| c.data.iter().copied()).collect();
    assert_eq!(joined, data, "Output bytes must match input bytes");
}

// ============================================================================
// Streaming and Push/Finish Semantics
// ============================================================================

#[test]
fn test_streaming_data_in_batches() {
    let mut splitter = Splitter::new(small_config());
    let batches = vec![
        Bytes::from(noise(256, 1)),
        Bytes::from(noise(256, 2)),
        Bytes::from(noise(256, 3)),
        Bytes::from(noise(232, 4)),
    ];

    let mut all_chunks = Vec::new();
    for batch in batches {
        let (chunks, _pending) = splitter.push(batch);
        all_chunks.extend(chunks);
    }
    all_chunks.extend(splitter.finish());

    let total_len: usize = all_chunks.iter().map(|c| c.len()).sum();
    assert_eq!(total_len, 1000, "Streaming must preserve total byte count");
}

#[test]
fn test_multiple_finish_calls() {
    let mut splitter = Splitter::new(small_config());

    let (chunks, pending) = splitter.push(Bytes::from(vec![0u8; 256]));
    assert_eq!(chunks.len(), 1, "Zeros are cut exactly at the cap");
    assert!(pending.is_empty());

    assert!(splitter.finish().is_none(), "Nothing follows the cap cut");
    assert!(splitter.finish().is_none(), "Second finish() should return None");
}

#[test]
fn test_finish_ignores_tail_policy() {
    for policy in [TailPolicy::Drop, TailPolicy::Emit] {
        let mut splitter = Splitter::new(small_config().with_tail_policy(policy));
        splitter.push(Bytes::from_static(b"short"));
        let tail = splitter.finish();
        assert_eq!(tail.map(|c| c.len()), Some(5), "{policy:?}");
    }
}

// ============================================================================
// Offset Tracking
// ============================================================================

#[test]
fn test_chunk_offset_tracking() {
    let data = noise(5_000, 11);
    let chunks = Splitter::new(small_config()).split(data.clone());

    let mut expected_offset = 0u64;
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.offset, expected_offset, "Chunk {i} offset");
        expected_offset = chunk.end();
    }
    assert_eq!(expected_offset, data.len() as u64);
}

#[test]
fn test_offset_resets_after_reset() {
    let mut splitter = Splitter::new(small_config());
    splitter.split(noise(1_000, 3));
    assert!(splitter.offset() > 0, "Offset should be > 0 after processing");

    splitter.reset();
    let chunks = splitter.split(Bytes::from_static(b"second"));
    assert_eq!(chunks.first().map(|c| c.offset), Some(0));
}

// ============================================================================
// Size Constraints
// ============================================================================

#[test]
fn test_chunks_respect_limits() {
    let chunks = Splitter::new(small_config()).split(noise(50_000, 5));
    let (_tail, cut) = chunks.split_last().unwrap();

    for chunk in cut {
        assert!(chunk.len() <= 256, "Chunk exceeds max: {}", chunk.len());
        match chunk.kind {
            CutKind::MaxSize => assert_eq!(chunk.len(), 256),
            CutKind::Checksum => assert!(chunk.len() > 32, "Chunk below threshold: {}", chunk.len()),
            CutKind::EndOfStream => panic!("Only the last chunk ends the stream"),
        }
    }
}

#[test]
fn test_exact_max_size_boundary() {
    let mut splitter = Splitter::new(small_config());
    let (chunks, pending) = splitter.push(Bytes::from(vec![0u8; 512]));

    assert_eq!(chunks.len(), 2);
    assert!(chunks.iter().all(|c| c.len() == 256 && c.kind == CutKind::MaxSize));
    assert!(pending.is_empty());
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_determinism_across_push_sizes() {
    let data = noise(30_000, 42);
    let config = small_config().with_hash_config(HashConfig::enabled());

    let whole = Splitter::new(config).split(data.clone());

    for batch_size in [1, 10, 37, 4096] {
        let mut splitter = Splitter::new(config);
        let mut chunks = Vec::new();
        for batch in data.chunks(batch_size) {
            let (done, _pending) = splitter.push(Bytes::copy_from_slice(batch));
            chunks.extend(done);
        }
        chunks.extend(splitter.finish());

        assert_eq!(whole, chunks, "Chunks differ with batch size {batch_size}");
    }
}

#[test]
fn test_splitter_matches_reader_iter() {
    let data = noise(40_000, 9);

    let from_splitter = Splitter::new(small_config()).split(data.clone());
    let from_reader: Vec<_> = Chunker::new(small_config())
        .read_chunks(Cursor::new(&data))
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(from_splitter, from_reader);
}

#[test]
fn test_splitter_matches_boundaries() {
    let data = noise(40_000, 13);

    let cuts: Vec<u64> = Chunker::new(small_config())
        .boundaries(&data)
        .map(|b| b.offset())
        .collect();
    let ends: Vec<u64> = Splitter::new(small_config())
        .split(data)
        .iter()
        .filter(|c| c.kind != CutKind::EndOfStream)
        .filter_map(|c| c.last_byte_offset())
        .collect();

    assert_eq!(cuts, ends);
}

// ============================================================================
// Zero-Copy Verification
// ============================================================================

#[test]
fn test_zero_copy_semantics() {
    let original = Bytes::from(noise(10_000, 21));
    let chunks = Splitter::new(small_config()).split(original.clone());

    let start = original.as_ptr() as usize;
    let end = start + original.len();
    for chunk in &chunks {
        let ptr = chunk.data.as_ptr() as usize;
        assert!(
            ptr >= start && ptr + chunk.len() <= end,
            "Chunk data must be a slice of the original Bytes"
        );
    }
}

// ============================================================================
// Hashing Tests
// ============================================================================

#[cfg(feature = "hash-blake3")]
mod hashing_tests {
    use super::*;

    #[test]
    fn test_hashing_enabled() {
        let config = small_config().with_hash_config(HashConfig::enabled());
        for chunk in Splitter::new(config).split(noise(3_000, 8)) {
            assert_eq!(chunk.hash, Some(ChunkHash::of(&chunk.data)));
        }
    }

    #[test]
    fn test_hashing_disabled() {
        let config = small_config().with_hash_config(HashConfig::disabled());
        for chunk in Splitter::new(config).split(noise(3_000, 8)) {
            assert!(chunk.hash.is_none(), "Chunk at {} has a hash", chunk.offset);
        }
    }

    #[test]
    fn test_identical_content_identical_hash() {
        let config = small_config().with_hash_config(HashConfig::enabled());
        let chunks = Splitter::new(config).split(vec![0u8; 768]);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].hash, chunks[1].hash);
        assert_eq!(chunks[1].hash, chunks[2].hash);
        assert_ne!(chunks[0].offset, chunks[1].offset);
    }
}

// ============================================================================
// Edge Cases and Error Conditions
// ============================================================================

#[test]
fn test_config_validation() {
    assert!(ChunkConfig::new(0, 17, 1 << 20, 64 << 10).is_err(), "zero window");
    assert!(ChunkConfig::new(64, 0, 1 << 20, 64 << 10).is_err(), "zero blob bits");
    assert!(ChunkConfig::new(64, 32, 1 << 20, 64 << 10).is_err(), "blob bits too wide");
    assert!(ChunkConfig::new(64, 17, 0, 0).is_err(), "zero max size");
    assert!(ChunkConfig::new(64, 17, 1024, 1024).is_err(), "threshold == max");
    assert!(ChunkConfig::new(64, 17, 1024, 1023).is_ok());
}

#[test]
fn test_reader_errors_surface() {
    use std::io::{self, Read};

    struct FailsAfter(usize);
    impl Read for FailsAfter {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0 == 0 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
            }
            let n = buf.len().min(self.0);
            buf[..n].fill(0);
            self.0 -= n;
            Ok(n)
        }
    }

    let results: Vec<_> = Chunker::new(small_config()).read_chunks(FailsAfter(600)).collect();
    assert_eq!(results.len(), 3, "two cap chunks then the error");
    assert!(results[0].is_ok() && results[1].is_ok());
    assert!(matches!(results[2], Err(rollsplit::ChunkError::Io(_))));
}
