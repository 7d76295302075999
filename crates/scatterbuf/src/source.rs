// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::Result;

/// A sequential, forward-only source of already-buffered bytes.
///
/// This is the single capability every reader of a [`ChunkBuf`][crate::ChunkBuf] exposes.
/// The three reading strategies ([`ScatterReader`][crate::ScatterReader],
/// [`MaterializedReader`][crate::MaterializedReader], [`ChunkReader`][crate::ChunkReader])
/// are interchangeable behind this trait, so a collaborator can select one based on measured
/// trade-offs rather than on API shape. The trait is object-safe for runtime selection via
/// `Box<dyn ByteSource>`.
///
/// The consumption contract is the same for every implementation:
///
/// * bytes are delivered strictly in content order, exactly once;
/// * at exhaustion, [`read_byte()`][Self::read_byte] returns `Ok(None)` and
///   [`read_into()`][Self::read_into] returns `Ok(0)`, repeatably and without error;
/// * after [`close()`][Self::close], every read fails with
///   [`Error::Closed`][crate::Error::Closed].
///
/// Reads never block and perform no I/O - they only copy bytes that are already buffered.
pub trait ByteSource {
    /// Reads the next byte, or `Ok(None)` once the source is exhausted.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Closed`][crate::Error::Closed] if the source has been closed.
    fn read_byte(&mut self) -> Result<Option<u8>>;

    /// Reads up to `dst.len()` bytes into `dst`, returning how many were delivered.
    ///
    /// A single call delivers as many bytes as the destination can hold, which may span
    /// multiple underlying chunks. `Ok(0)` means the source is exhausted (or that `dst`
    /// is empty).
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Closed`][crate::Error::Closed] if the source has been closed.
    fn read_into(&mut self, dst: &mut [u8]) -> Result<usize>;

    /// Closes the source.
    ///
    /// Closing before exhaustion is the way to abandon a traversal early. Closing an
    /// already-closed source has no further effect.
    fn close(&mut self);

    /// Whether the source has been closed.
    fn is_closed(&self) -> bool;
}
