// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io::{self, Read};

use crate::{ByteSource, ChunkCursor, Error, Result};

/// Reads buffered chunks directly into caller-supplied destination buffers.
///
/// This is the zero-allocation strategy: every read runs the shared scatter routine against
/// the chunk sequence, copying straight into the caller's buffer and crossing chunk
/// boundaries as needed. The caller frames consumption by the capacity of the buffers it
/// supplies - nothing is allocated beyond them.
///
/// Create an instance via [`ChunkBuf::scatter_reader()`][crate::ChunkBuf::scatter_reader].
#[derive(Debug)]
pub struct ScatterReader<'buf> {
    cursor: ChunkCursor<'buf>,
    closed: bool,
}

impl<'buf> ScatterReader<'buf> {
    pub(crate) fn new(cursor: ChunkCursor<'buf>) -> Self {
        Self { cursor, closed: false }
    }

    /// Whether the reader is still open for reading.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.closed
    }

    /// Bytes not yet delivered.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::Closed);
        }

        Ok(())
    }
}

impl ByteSource for ScatterReader<'_> {
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

impl Read for ScatterReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_into(buf).map_err(io::Error::from)
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use static_assertions::assert_impl_all;

    use super::*;
    use crate::{ChunkBuf, ContentKind, TextEncoding};

    assert_impl_all!(ScatterReader<'_>: Send, Sync);

    fn hi_bob() -> ChunkBuf {
        let mut buf = ChunkBuf::new(ContentKind::Raw, TextEncoding::Utf8);
        buf.append_text("hi").unwrap();
        buf.append_text(" ").unwrap();
        buf.append_text("bob").unwrap();
        buf
    }

    #[test]
    fn drains_in_caller_sized_steps() {
        let buf = hi_bob();
        let mut reader = buf.scatter_reader();
        let mut dst = [0_u8; 2];

        assert_eq!(reader.remaining(), 6);

        assert_eq!(reader.read_into(&mut dst).unwrap(), 2);
        assert_eq!(&dst, b"hi");

        assert_eq!(reader.read_into(&mut dst).unwrap(), 2);
        assert_eq!(&dst, b" b");

        assert_eq!(reader.read_into(&mut dst).unwrap(), 2);
        assert_eq!(&dst, b"ob");

        assert_eq!(reader.read_into(&mut dst).unwrap(), 0);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn exhaustion_is_idempotent() {
        let buf = hi_bob();
        let mut reader = buf.scatter_reader();
        let mut dst = [0_u8; 16];

        assert_eq!(reader.read_into(&mut dst).unwrap(), 6);
        assert_eq!(reader.read_into(&mut dst).unwrap(), 0);
        assert_eq!(reader.read_into(&mut dst).unwrap(), 0);
        assert_eq!(reader.read_byte().unwrap(), None);
    }

    #[test]
    fn read_after_close_is_an_error() {
        let buf = hi_bob();
        let mut reader = buf.scatter_reader();
        let mut dst = [0_u8; 2];

        assert!(reader.is_open());
        reader.close();
        assert!(!reader.is_open());
        assert!(reader.is_closed());

        assert!(matches!(reader.read_into(&mut dst), Err(Error::Closed)));
        assert!(matches!(reader.read_byte(), Err(Error::Closed)));
    }

    #[test]
    fn close_before_exhaustion_is_safe() {
        let buf = hi_bob();
        let mut reader = buf.scatter_reader();
        let mut dst = [0_u8; 2];

        assert_eq!(reader.read_into(&mut dst).unwrap(), 2);
        reader.close();
        reader.close(); // Idempotent.

        assert!(matches!(reader.read_into(&mut dst), Err(Error::Closed)));
    }

    #[test]
    fn independent_readers_do_not_interfere() {
        let buf = hi_bob();
        let mut first = buf.scatter_reader();
        let mut second = buf.scatter_reader();
        let mut dst = [0_u8; 5];

        assert_eq!(first.read_into(&mut dst).unwrap(), 5);
        assert_eq!(&dst, b"hi bo");

        // The second reader still starts from the beginning.
        assert_eq!(second.read_into(&mut dst).unwrap(), 5);
        assert_eq!(&dst, b"hi bo");
    }

    #[test]
    fn std_read_reports_closed_as_io_error() {
        let buf = hi_bob();
        let mut reader = buf.scatter_reader();
        reader.close();

        let mut dst = [0_u8; 2];
        let error = reader.read(&mut dst).unwrap_err();

        assert_eq!(error.kind(), io::ErrorKind::NotConnected);
    }

    #[test]
    fn std_read_to_end_matches_materialization() {
        let mut buf = hi_bob();
        buf.append_chunk(Bytes::from_static(b"!"));

        let mut collected = Vec::new();
        buf.scatter_reader().read_to_end(&mut collected).unwrap();

        assert_eq!(collected, buf.to_vec());
    }
}
