// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Write-once, chunked output buffer for incrementally produced content.
//!
//! A [`ChunkBuf`] accumulates the output of an incremental producer (typically a template
//! renderer) as an ordered sequence of immutable byte chunks. Pre-encoded content - static
//! template text, cached fragments - is appended *by reference*: the buffer stores a cheap
//! [`Bytes`] handle instead of copying the data. Text fragments are converted to bytes using
//! the buffer's [`TextEncoding`] at append time and stored as fresh chunks.
//!
//! Writing is append-only and single-phase. Once the producer is done, the finished contents
//! are consumed through one of several read surfaces, each with a different copy/allocation
//! trade-off but all delivering the exact same byte sequence.
//!
//! # Producing
//!
//! ```
//! use bytes::Bytes;
//! use scatterbuf::{ChunkBuf, ContentKind, TextEncoding};
//!
//! let mut buf = ChunkBuf::new(ContentKind::Html, TextEncoding::Utf8);
//!
//! // Static chunks are referenced, not copied.
//! buf.append_chunk(Bytes::from_static(b"<p>"));
//!
//! // Text fragments are encoded into a new chunk at append time.
//! buf.append_text("hi bob")?;
//!
//! buf.append_chunk(Bytes::from_static(b"</p>"));
//!
//! assert_eq!(buf.len(), 13);
//! # Ok::<(), scatterbuf::Error>(())
//! ```
//!
//! # Consuming
//!
//! For collaborators that need the whole payload as one unit (e.g. to set a content-length
//! header), [`ChunkBuf::to_vec()`] materializes the contiguous byte concatenation and
//! [`ChunkBuf::to_text()`] decodes it back into text.
//!
//! For streaming consumption, the buffer hands out readers. Any number of readers may be
//! open over the same buffer; each owns an independent cursor and traverses the contents
//! forward-only, exactly once.
//!
//! | Reader | Strategy | Allocation cost |
//! |---|---|---|
//! | [`ChunkBuf::scatter_reader()`] | copies straight from the chunks into caller buffers | none |
//! | [`ChunkBuf::materialized_reader()`] | one contiguous upfront copy, then reads from that | one `len()`-sized allocation |
//! | [`ChunkBuf::chunk_reader()`] | pull-style per-byte and borrowed-slab access | none |
//!
//! All readers implement [`ByteSource`] (read one byte / read into a buffer / close) as well
//! as [`std::io::Read`], so the choice of strategy can be made at runtime by the collaborator
//! that pipes the bytes to an actual I/O sink.
//!
//! ```
//! use scatterbuf::{ByteSource, ChunkBuf, ContentKind, TextEncoding};
//!
//! let mut buf = ChunkBuf::new(ContentKind::Raw, TextEncoding::Utf8);
//! buf.append_text("hi")?;
//! buf.append_text(" ")?;
//! buf.append_text("bob")?;
//!
//! let mut reader = buf.scatter_reader();
//! let mut dst = [0_u8; 2];
//!
//! assert_eq!(reader.read_into(&mut dst)?, 2);
//! assert_eq!(&dst, b"hi");
//! assert_eq!(reader.read_into(&mut dst)?, 2);
//! assert_eq!(&dst, b" b");
//! assert_eq!(reader.read_into(&mut dst)?, 2);
//! assert_eq!(&dst, b"ob");
//!
//! // Exhaustion is idempotent - further reads keep returning zero.
//! assert_eq!(reader.read_into(&mut dst)?, 0);
//! assert_eq!(reader.read_into(&mut dst)?, 0);
//! # Ok::<(), scatterbuf::Error>(())
//! ```
//!
//! Closing a reader early is the cancellation mechanism. A closed reader is distinct from an
//! exhausted one: reads after [`ByteSource::close()`] fail with [`Error::Closed`] instead of
//! reporting end of stream.
//!
//! # Contract
//!
//! Appended chunks must never change afterwards. This is not a documented convention the
//! caller has to uphold - [`Bytes`] is immutable, so handing a chunk to the buffer makes
//! later mutation impossible by construction.
//!
//! The buffer performs no synchronization of its own. The append phase requires `&mut self`,
//! and readers borrow the buffer immutably, so the borrow checker enforces the intended
//! single-writer-then-many-readers phase discipline at compile time. A finished `ChunkBuf`
//! is `Send + Sync` and may be drained from multiple threads through independent readers.
//!
//! [`Bytes`]: bytes::Bytes

mod buf;
mod chunk_reader;
mod constants;
mod content_kind;
mod cursor;
mod encoding;
mod error;
mod materialized_reader;
mod scatter_reader;
mod source;

pub use buf::ChunkBuf;
pub use chunk_reader::ChunkReader;
pub use constants::MAX_INLINE_CHUNKS;
pub use content_kind::ContentKind;
pub(crate) use cursor::ChunkCursor;
pub use encoding::TextEncoding;
pub use error::{Error, Result};
pub use materialized_reader::MaterializedReader;
pub use scatter_reader::ScatterReader;
pub use source::ByteSource;
