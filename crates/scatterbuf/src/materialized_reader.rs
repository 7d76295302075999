// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io::{self, BufRead, Read};

use crate::{ByteSource, Error, Result};

/// Serves reads from one contiguous upfront copy of the buffer contents.
///
/// Construction pays the full materialization cost - a single `len()`-sized allocation and
/// one pass of copying - and every read after that is a plain slice copy. This is the
/// simplest strategy, and because the reader owns its copy it does not borrow the buffer,
/// so it can outlive it or move to another thread.
///
/// Create an instance via
/// [`ChunkBuf::materialized_reader()`][crate::ChunkBuf::materialized_reader].
#[derive(Debug)]
pub struct MaterializedReader {
    bytes: Vec<u8>,
    position: usize,
    closed: bool,
}

impl MaterializedReader {
    pub(crate) fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            position: 0,
            closed: false,
        }
    }

    /// Bytes not yet delivered.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::Closed);
        }

        Ok(())
    }
}

impl ByteSource for MaterializedReader {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        self.ensure_open()?;

        let byte = self.bytes.get(self.position).copied();
        if byte.is_some() {
            self.position += 1;
        }

        Ok(byte)
    }

    fn read_into(&mut self, dst: &mut [u8]) -> Result<usize> {
        self.ensure_open()?;

        let count = self.remaining().min(dst.len());
        dst[..count].copy_from_slice(&self.bytes[self.position..self.position + count]);
        self.position += count;

        Ok(count)
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Read for MaterializedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_into(buf).map_err(io::Error::from)
    }
}

/// The contents are already in one contiguous allocation, so [`BufRead`] is implemented
/// directly. Prefer this over wrapping in [`std::io::BufReader`].
impl BufRead for MaterializedReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.ensure_open()?;

        Ok(&self.bytes[self.position..])
    }

    fn consume(&mut self, amount: usize) {
        self.position += amount.min(self.remaining());
    }
}
