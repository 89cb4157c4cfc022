//! Thread-local pool of read buffers.

use std::cell::RefCell;
use std::io::{self, Read};

/// Size of each read buffer.
pub const READ_BUFFER_SIZE: usize = 32 * 1024;

/// Maximum number of buffers to keep per thread.
pub const MAX_POOL_SIZE: usize = 4;

thread_local! {
    static THREAD_BUFFER_POOL: RefCell<Vec<Box<[u8]>>> = const { RefCell::new(Vec::new()) };
}

/// A fixed-size read buffer with a cursor over its filled region.
///
/// Bytes in `data[pos..end]` have been read but not yet consumed.
pub struct ReadBuffer {
    data: Box<[u8]>,
    pos: usize,
    end: usize,
}

impl ReadBuffer {
    /// Takes a buffer from the thread-local pool or allocates a new one.
    pub fn take() -> Self {
        let data = THREAD_BUFFER_POOL
            .with(|pool| pool.borrow_mut().pop())
            .unwrap_or_else(|| vec![0u8; READ_BUFFER_SIZE].into_boxed_slice());
        Self { data, pos: 0, end: 0 }
    }

    /// Returns the read but unconsumed bytes.
    pub fn remaining(&self) -> &[u8] {
        &self.data[self.pos..self.end]
    }

    /// Marks `n` bytes of [`ReadBuffer::remaining`] as consumed.
    pub fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.end - self.pos);
        self.pos += n;
    }

    /// Replaces the buffer contents with the next read from `reader`.
    ///
    /// Retries on [`io::ErrorKind::Interrupted`]. Returns the number of bytes
    /// read; 0 means end of stream.
    pub fn refill<R: Read>(&mut self, reader: &mut R) -> io::Result<usize> {
        self.pos = 0;
        self.end = 0;
        let n = loop {
            match reader.read(&mut self.data) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        self.end = n;
        Ok(n)
    }
}

impl Drop for ReadBuffer {
    fn drop(&mut self) {
        let data = std::mem::take(&mut self.data);
        // try_with: the pool may already be gone during thread teardown.
        let _ = THREAD_BUFFER_POOL.try_with(|pool| {
            let mut pool = pool.borrow_mut();
            if pool.len() < MAX_POOL_SIZE {
                pool.push(data);
            }
        });
    }
}

impl Default for ReadBuffer {
    fn default() -> Self {
        Self::take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_refill_and_consume() {
        let mut buf = ReadBuffer::take();
        let mut reader = Cursor::new(b"hello world".to_vec());

        assert_eq!(buf.refill(&mut reader).unwrap(), 11);
        assert_eq!(buf.remaining(), b"hello world");

        buf.consume(6);
        assert_eq!(buf.remaining(), b"world");

        assert_eq!(buf.refill(&mut reader).unwrap(), 0);
        assert!(buf.remaining().is_empty());
    }

    #[test]
    fn test_refill_reads_at_most_buffer_size() {
        let mut buf = ReadBuffer::take();
        let mut reader = Cursor::new(vec![1u8; READ_BUFFER_SIZE * 2 + 5]);
        assert_eq!(buf.refill(&mut reader).unwrap(), READ_BUFFER_SIZE);
        assert_eq!(buf.refill(&mut reader).unwrap(), READ_BUFFER_SIZE);
        assert_eq!(buf.refill(&mut reader).unwrap(), 5);
    }

    #[test]
    fn test_refill_retries_interrupted() {
        struct Flaky(bool);
        impl Read for Flaky {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if !self.0 {
                    self.0 = true;
                    return Err(io::Error::from(io::ErrorKind::Interrupted));
                }
                buf[0] = 42;
                Ok(1)
            }
        }

        let mut buf = ReadBuffer::take();
        assert_eq!(buf.refill(&mut Flaky(false)).unwrap(), 1);
        assert_eq!(buf.remaining(), &[42]);
    }

    #[test]
    fn test_buffer_reuse() {
        {
            let mut buf = ReadBuffer::take();
            buf.refill(&mut Cursor::new(b"test data".to_vec())).unwrap();
        }

        let buf = ReadBuffer::take();
        assert!(buf.remaining().is_empty());
        assert_eq!(buf.data.len(), READ_BUFFER_SIZE);
    }
}
