// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io::{self, BufRead, Read};

use crate::{ByteSource, ChunkCursor, Error, Result};

/// Pull-style reader that walks the chunk sequence byte by byte or slab by slab.
///
/// Where [`ScatterReader`][crate::ScatterReader] is framed by the capacity of the caller's
/// destination buffers, this reader lets the consumer pull at its own granularity: single
/// bytes via [`ByteSource::read_byte()`], or zero-copy borrowed slabs via the [`BufRead`]
/// implementation, where each slab is the unread remainder of the current chunk. Boundary
/// crossing still runs through the same shared cursor routine as the other readers.
///
/// Create an instance via [`ChunkBuf::chunk_reader()`][crate::ChunkBuf::chunk_reader].
#[derive(Debug)]
pub struct ChunkReader<'buf> {
    cursor: ChunkCursor<'buf>,
    closed: bool,
}

impl<'buf> ChunkReader<'buf> {
    pub(crate) fn new(cursor: ChunkCursor<'buf>) -> Self {
        Self { cursor, closed: false }
    }

    /// Bytes not yet delivered.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    /// References the unread remainder of the current chunk without consuming anything.
    ///
    /// Empty exactly when the reader is exhausted. There are no guarantees on the slab
    /// length otherwise - it reflects how the producer chunked the content. The borrow
    /// comes from the underlying buffer, so it stays valid while the reader advances.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Closed`][crate::Error::Closed] if the reader has been closed.
    pub fn first_slice(&self) -> Result<&'buf [u8]> {
        self.ensure_open()?;

        Ok(self.cursor.first_slice())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::Closed);
        }

        Ok(())
    }
}

impl ByteSource for ChunkReader<'_> {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        self.ensure_open()?;

        Ok(self.cursor.next_byte())
    }

    fn read_into(&mut self, dst: &mut [u8]) -> Result<usize> {
        self.ensure_open()?;

        Ok(self.cursor.fill(dst))
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Read for ChunkReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_into(buf).map_err(io::Error::from)
    }
}

/// The chunks are already buffered, so [`BufRead`] is implemented directly without an
/// intermediate buffer. Prefer this over wrapping in [`std::io::BufReader`].
impl BufRead for ChunkReader<'_> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.ensure_open()?;

        Ok(self.cursor.first_slice())
    }

    fn consume(&mut self, amount: usize) {
        self.cursor.advance(amount);
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use static_assertions::assert_impl_all;

    use super::*;
    use crate::{ChunkBuf, ContentKind, TextEncoding};

    assert_impl_all!(ChunkReader<'_>: Send, Sync);

    fn chunked() -> ChunkBuf {
        let mut buf = ChunkBuf::new(ContentKind::Raw, TextEncoding::Utf8);
        buf.append_chunk(Bytes::from_static(b"abc"));
        buf.append_chunk(Bytes::from_static(b""));
        buf.append_chunk(Bytes::from_static(b"d"));
        buf.append_chunk(Bytes::from_static(b"efghi"));
        buf
    }

    #[test]
    fn per_byte_pull_sees_every_byte_once() {
        let buf = chunked();
        let mut reader = buf.chunk_reader();

        let mut collected = Vec::new();
        while let Some(byte) = reader.read_byte().unwrap() {
            collected.push(byte);
        }

        assert_eq!(collected, b"abcdefghi");
        assert_eq!(reader.read_byte().unwrap(), None);
    }

    #[test]
    fn range_reads_cross_chunk_boundaries() {
        let buf = chunked();
        let mut reader = buf.chunk_reader();
        let mut dst = [0_u8; 4];

        assert_eq!(reader.read_into(&mut dst).unwrap(), 4);
        assert_eq!(&dst, b"abcd");

        assert_eq!(reader.read_into(&mut dst).unwrap(), 4);
        assert_eq!(&dst, b"efgh");

        assert_eq!(reader.read_into(&mut dst).unwrap(), 1);
        assert_eq!(dst[0], b'i');

        assert_eq!(reader.read_into(&mut dst).unwrap(), 0);
    }

    #[test]
    fn slabs_reflect_chunk_structure() {
        let buf = chunked();
        let mut reader = buf.chunk_reader();

        assert_eq!(reader.first_slice().unwrap(), b"abc");

        // Consuming a whole slab reveals the next non-empty chunk.
        let len = reader.first_slice().unwrap().len();
        reader.consume(len);
        assert_eq!(reader.first_slice().unwrap(), b"d");

        reader.consume(1);
        assert_eq!(reader.first_slice().unwrap(), b"efghi");

        reader.consume(5);
        assert!(reader.first_slice().unwrap().is_empty());
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn buf_read_fill_buf_and_consume() {
        let buf = chunked();
        let mut reader = buf.chunk_reader();

        assert_eq!(reader.fill_buf().unwrap(), b"abc");
        reader.consume(2);
        assert_eq!(reader.fill_buf().unwrap(), b"c");
    }

    #[test]
    fn mixed_granularity_keeps_order() {
        let buf = chunked();
        let mut reader = buf.chunk_reader();

        assert_eq!(reader.read_byte().unwrap(), Some(b'a'));

        let mut dst = [0_u8; 3];
        assert_eq!(reader.read_into(&mut dst).unwrap(), 3);
        assert_eq!(&dst, b"bcd");

        assert_eq!(reader.first_slice().unwrap(), b"efghi");
    }

    #[test]
    fn read_after_close_is_an_error() {
        let buf = chunked();
        let mut reader = buf.chunk_reader();
        reader.close();

        assert!(reader.is_closed());
        assert!(matches!(reader.read_byte(), Err(Error::Closed)));
        assert!(matches!(reader.first_slice(), Err(Error::Closed)));

        let error = reader.fill_buf().unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::NotConnected);
    }

    #[test]
    fn std_read_to_end_matches_materialization() {
        let buf = chunked();

        let mut collected = Vec::new();
        buf.chunk_reader().read_to_end(&mut collected).unwrap();

        assert_eq!(collected, buf.to_vec());
    }
}
