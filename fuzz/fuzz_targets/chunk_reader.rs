#![no_main]

use std::io::Cursor;

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use rollsplit::{ChunkConfig, Chunker, Splitter, TailPolicy};

fuzz_target!(|data: Vec<u8>| {
    let configs = [
        ChunkConfig::new(4, 3, 64, 8).unwrap(),
        ChunkConfig::new(16, 6, 1024, 128).unwrap(),
        ChunkConfig::default(),
    ];

    for config in configs {
        let cuts: Vec<u64> = Chunker::new(config)
            .boundaries(&data)
            .map(|b| b.offset())
            .collect();

        // Reader-driven boundaries match the slice API
        let from_reader: Vec<u64> = Chunker::new(config)
            .read_boundaries(Cursor::new(&data))
            .map(|b| b.unwrap().offset())
            .collect();
        assert_eq!(cuts, from_reader);

        // Emit adds exactly one boundary when bytes follow the last cut
        let emitted = Chunker::new(config.with_tail_policy(TailPolicy::Emit))
            .read_boundaries(Cursor::new(&data))
            .count();
        let has_tail = cuts.last().map_or(!data.is_empty(), |&o| o + 1 < data.len() as u64);
        assert_eq!(emitted, cuts.len() + usize::from(has_tail));

        // Pushing in uneven batches yields the reader's chunks
        let from_chunks: Vec<_> = Chunker::new(config)
            .read_chunks(Cursor::new(&data))
            .map(|c| c.unwrap())
            .collect();

        let mut splitter = Splitter::new(config);
        let mut pushed = Vec::new();
        let mut rest = &data[..];
        let mut step = 1;
        while !rest.is_empty() {
            let (batch, tail) = rest.split_at(step.min(rest.len()));
            pushed.extend(splitter.push(Bytes::copy_from_slice(batch)).0);
            rest = tail;
            step = step * 3 % 97 + 1;
        }
        pushed.extend(splitter.finish());
        assert_eq!(from_chunks, pushed);
    }
});
