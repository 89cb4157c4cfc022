#![no_main]

use libfuzzer_sys::fuzz_target;
use rollsplit::{ChunkConfig, CutKind, HashConfig, Splitter};

fuzz_target!(|data: Vec<u8>| {
    let configs = [
        // Tiny window, frequent candidates
        ChunkConfig::new(4, 3, 64, 8).unwrap(),
        ChunkConfig::new(16, 6, 1024, 128).unwrap(),
        ChunkConfig::new(64, 12, 16384, 2048).unwrap(),
        ChunkConfig::default(),
    ];

    for config in configs {
        let chunks = Splitter::new(config).split(data.clone());

        let mut expected_offset = 0u64;
        for chunk in &chunks {
            assert_eq!(chunk.offset, expected_offset);
            assert!(!chunk.is_empty());
            assert!(chunk.len() <= config.max_blob_size());
            match chunk.kind {
                CutKind::MaxSize => assert_eq!(chunk.len(), config.max_blob_size()),
                CutKind::Checksum => assert!(chunk.len() > config.too_small_threshold()),
                CutKind::EndOfStream => assert_eq!(chunk.end(), data.len() as u64),
            }
            expected_offset = chunk.end();
        }
        assert_eq!(expected_offset, data.len() as u64);

        // Same input, same chunks
        let again = Splitter::new(config).split(data.clone());
        assert_eq!(chunks, again);
    }

    let hashed = ChunkConfig::default().with_hash_config(HashConfig::enabled());
    for chunk in Splitter::new(hashed).split(data) {
        assert!(chunk.hash.is_some());
    }
});
