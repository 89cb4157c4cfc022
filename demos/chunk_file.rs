//! File chunking example.
//!
//! Run with:
//!     cargo run --example chunk_file -- /path/to/file

use std::env;
use std::fs::File;

use rollsplit::{ChunkConfig, Chunker, CutKind};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("rollsplit=debug").init();

    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "Cargo.toml".to_string());

    println!("Chunking file: {}\n", path);

    let file = File::open(&path)?;
    let metadata = file.metadata()?;
    println!("File size: {} bytes\n", metadata.len());

    // Smaller chunks than the default 64 KiB..1 MiB range
    let config = ChunkConfig::new(
        64,        // window
        13,        // ~8 KiB between checksum cuts
        64 * 1024, // max: 64 KiB
        2 * 1024,  // min: 2 KiB
    )?;

    let mut total_chunks = 0;
    let mut total_bytes = 0;
    let mut capped = 0;

    for chunk in Chunker::new(config).read_chunks(file) {
        let chunk = chunk?;
        total_chunks += 1;
        total_bytes += chunk.len();
        capped += usize::from(chunk.kind == CutKind::MaxSize);

        let hash = chunk.hash.map(|h| h.to_hex()).unwrap_or_default();
        println!(
            "Chunk {:>5}: offset={:>10}, len={:>8}, {:?} {}",
            total_chunks,
            chunk.offset,
            chunk.len(),
            chunk.kind,
            hash
        );
    }

    println!("\nTotal: {} chunks, {} bytes, {} cut at max size", total_chunks, total_bytes, capped);
    if total_chunks > 0 {
        println!("Average chunk size: {} bytes", total_bytes / total_chunks);
    }

    Ok(())
}
