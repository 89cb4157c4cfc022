//! Error types for rollsplit.
//!
//! The rolling checksum and the boundary policy are total and never fail.
//! Errors only come from the edges: invalid configuration and reader I/O.

use thiserror::Error;

/// Errors that can occur while configuring or feeding a chunker.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// An I/O error occurred while reading input data.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}
