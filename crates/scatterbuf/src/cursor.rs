// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use bytes::Bytes;

/// A read position over the chunk sequence of a [`ChunkBuf`][crate::ChunkBuf].
///
/// This is the one shared scatter routine behind every reader: a `(chunk_index, chunk_offset)`
/// pair that advances monotonically over the chunks, crossing chunk boundaries as needed to
/// satisfy a read. Keeping the boundary logic in a single place means the known trouble spots
/// (reads spanning chunks, zero-length chunks) are handled once instead of per reader.
///
/// The cursor is strictly read-only over the chunk data. Each reader owns its own cursor,
/// so independent traversals of the same buffer never interfere.
///
/// # Invariant
///
/// The cursor never rests on an exhausted chunk: after every movement it skips forward past
/// fully consumed and zero-length chunks. Consequently `chunk_offset` is always strictly
/// inside the current chunk, and `chunk_index == chunks.len()` exactly when the sequence
/// is exhausted.
#[derive(Debug)]
pub(crate) struct ChunkCursor<'buf> {
    chunks: &'buf [Bytes],

    /// Index of the chunk the next byte comes from; `chunks.len()` once exhausted.
    chunk_index: usize,

    /// Byte offset into the current chunk.
    chunk_offset: usize,

    /// Total bytes delivered so far.
    consumed: usize,

    /// Total length of the chunk sequence, cached by the owning buffer.
    len: usize,
}

impl<'buf> ChunkCursor<'buf> {
    pub(crate) fn new(chunks: &'buf [Bytes], len: usize) -> Self {
        debug_assert_eq!(len, chunks.iter().map(Bytes::len).sum::<usize>());

        let mut cursor = Self {
            chunks,
            chunk_index: 0,
            chunk_offset: 0,
            consumed: 0,
            len,
        };

        // The sequence may legally start with zero-length chunks.
        cursor.skip_exhausted_chunks();
        cursor
    }

    /// Copies bytes into `dst` until it is full or the sequence is exhausted, advancing
    /// the cursor past everything copied.
    ///
    /// A single call crosses as many chunk boundaries as needed. Returns the number of
    /// bytes copied; `0` means the sequence is exhausted (or that `dst` is empty).
    pub(crate) fn fill(&mut self, dst: &mut [u8]) -> usize {
        let mut filled = 0;

        while filled < dst.len() {
            let Some(chunk) = self.chunks.get(self.chunk_index) else {
                break;
            };

            // The invariant guarantees the current chunk has at least one unread byte.
            let available = chunk.len() - self.chunk_offset;
            let count = available.min(dst.len() - filled);

            dst[filled..filled + count].copy_from_slice(&chunk[self.chunk_offset..self.chunk_offset + count]);

            self.chunk_offset += count;
            self.consumed += count;
            filled += count;

            self.skip_exhausted_chunks();
        }

        filled
    }

    /// Takes the next byte, or `None` once the sequence is exhausted.
    pub(crate) fn next_byte(&mut self) -> Option<u8> {
        let chunk = self.chunks.get(self.chunk_index)?;
        let byte = chunk[self.chunk_offset];

        self.chunk_offset += 1;
        self.consumed += 1;
        self.skip_exhausted_chunks();

        Some(byte)
    }

    /// References the unread remainder of the current chunk.
    ///
    /// Empty exactly when the cursor is exhausted. There are no guarantees on the length
    /// otherwise - it is determined by how the producer chunked the content.
    pub(crate) fn first_slice(&self) -> &'buf [u8] {
        self.chunks
            .get(self.chunk_index)
            .map_or(&[], |chunk| &chunk[self.chunk_offset..])
    }

    /// Marks `count` bytes of the current chunk as consumed without copying them.
    ///
    /// # Panics
    ///
    /// Panics if `count` exceeds the unread remainder of the current chunk, i.e. the
    /// length of [`first_slice()`][Self::first_slice].
    pub(crate) fn advance(&mut self, count: usize) {
        assert!(
            count <= self.first_slice().len(),
            "attempted to advance past the end of the current chunk"
        );

        self.chunk_offset += count;
        self.consumed += count;
        self.skip_exhausted_chunks();
    }

    /// Bytes not yet delivered.
    pub(crate) fn remaining(&self) -> usize {
        self.len - self.consumed
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.chunk_index >= self.chunks.len()
    }

    /// Restores the invariant by stepping past fully consumed and zero-length chunks.
    ///
    /// Zero-length chunks are legal anywhere in the sequence; stepping over them here is
    /// what keeps every read path from stalling on them.
    #[cfg_attr(test, mutants::skip)] // Mutating this can cause infinite loops.
    fn skip_exhausted_chunks(&mut self) {
        while let Some(chunk) = self.chunks.get(self.chunk_index) {
            if self.chunk_offset < chunk.len() {
                break;
            }

            self.chunk_index += 1;
            self.chunk_offset = 0;
        }
    }
}
