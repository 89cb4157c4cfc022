//! Internal helpers.

use bytes::{BufMut, Bytes, BytesMut};

/// Joins held-over bytes with the start of a new batch.
///
/// Used when a chunk spans several pushed batches and cannot be a single
/// zero-copy slice.
pub(crate) fn concat_bytes(head: &Bytes, tail: &[u8]) -> Bytes {
    let mut joined = BytesMut::with_capacity(head.len() + tail.len());
    joined.put_slice(head);
    joined.put_slice(tail);
    joined.freeze()
}
