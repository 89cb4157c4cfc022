//! Prints the boundary offsets of a file, one decimal offset per line.
//!
//! Run with:
//!     cargo run --example print_boundaries -- /path/to/image
//!
//! Set `RUST_LOG=rollsplit=trace` to log every cut on stderr.

use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process;

use rollsplit::{ChunkConfig, ChunkError, Chunker};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: print_boundaries <path>");
        process::exit(1);
    };

    let file = match File::open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("open {path}: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = run(file) {
        eprintln!("{path}: {e}");
        process::exit(1);
    }
}

fn run(file: File) -> Result<(), ChunkError> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    for boundary in Chunker::new(ChunkConfig::default()).read_boundaries(file) {
        writeln!(out, "{}", boundary?)?;
    }
    out.flush()?;
    Ok(())
}
