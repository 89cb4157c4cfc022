//! Async chunking of several files concurrently.
//!
//! Each file gets its own stream; tokio readers are adapted to
//! `futures_io::AsyncRead` through `tokio_util::compat`.
//!
//! Run with:
//!     cargo run --example async_tokio --features async-io -- a.img b.img

use futures_util::StreamExt;
use rollsplit::{ChunkConfig, chunk_async};
use tokio_util::compat::TokioAsyncReadCompatExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("rollsplit=debug").init();

    let mut paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        paths.push("Cargo.toml".to_string());
    }

    let handles: Vec<_> = paths
        .into_iter()
        .map(|path| tokio::spawn(process_file(path, ChunkConfig::default())))
        .collect();

    for handle in handles {
        let (path, chunk_count, total_bytes) = handle.await??;
        println!("{}: {} chunks, {} bytes", path, chunk_count, total_bytes);
    }

    Ok(())
}

async fn process_file(
    path: String,
    config: ChunkConfig,
) -> Result<(String, usize, u64), Box<dyn std::error::Error + Send + Sync>> {
    let file = tokio::fs::File::open(&path).await?;
    let mut stream = chunk_async(file.compat(), config);

    let mut chunk_count = 0;
    let mut total_bytes = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        chunk_count += 1;
        total_bytes += chunk.len() as u64;
    }

    Ok((path, chunk_count, total_bytes))
}
