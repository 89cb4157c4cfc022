//! Internal read buffer management.
//!
//! Reader-driven iterators borrow a buffer from a thread-local pool instead
//! of allocating one per stream. It is an implementation detail and not part
//! of the public API.

mod pool;

pub(crate) use pool::ReadBuffer;
