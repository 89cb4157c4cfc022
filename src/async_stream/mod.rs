//! Async streaming support (feature `async-io`).
//!
//! Built on `futures-io::AsyncRead`, so it runs on tokio, async-std, smol or
//! any other futures-compatible runtime.
//!
//! - [`chunk_async`] - Creates an async stream of chunks from an async reader

mod stream;

pub use stream::{chunk_async, ChunkStream};
