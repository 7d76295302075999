// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use bytes::Bytes;
use nm::{Event, Magnitude};
use smallvec::SmallVec;

use crate::{
    ChunkCursor, ChunkReader, ContentKind, MAX_INLINE_CHUNKS, MaterializedReader, Result, ScatterReader, TextEncoding,
};

/// A write-once output buffer that stores an ordered sequence of immutable byte chunks.
///
/// The buffer is optimized for producers that interleave pre-encoded content with text:
/// [`append_chunk()`][Self::append_chunk] stores a reference to the given [`Bytes`] chunk
/// instead of copying it, so appending static template text costs one handle, no matter how
/// large the text is. [`append_text()`][Self::append_text] encodes a text fragment with the
/// buffer's [`TextEncoding`] and stores the result as a fresh chunk. The logical content is
/// the concatenation of all chunks in append order.
///
/// Chunks cannot change after being appended - [`Bytes`] is immutable, so there is no
/// aliasing hazard to document around the zero-copy write path.
///
/// # Write phase, then read phase
///
/// Appending requires `&mut self`; readers borrow the buffer immutably. The borrow checker
/// therefore enforces the intended lifecycle - appends all happen before any reader opens,
/// and while readers exist the contents are frozen. Any number of readers may be open at
/// once, each owning an independent cursor, including from multiple threads.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use scatterbuf::{ChunkBuf, ContentKind, TextEncoding};
///
/// let mut buf = ChunkBuf::new(ContentKind::Html, TextEncoding::Utf8);
///
/// buf.append_chunk(Bytes::from_static(b"<p>"));
/// buf.append_text("hi bob")?;
/// buf.append_chunk(Bytes::from_static(b"</p>"));
///
/// assert_eq!(buf.len(), 13);
/// assert_eq!(buf.to_text()?, "<p>hi bob</p>");
/// # Ok::<(), scatterbuf::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct ChunkBuf {
    /// Chunks in logical content order. Never reordered, never mutated once appended.
    chunks: SmallVec<[Bytes; MAX_INLINE_CHUNKS]>,

    /// Total length of all chunks. Cached so `len()` stays O(1).
    len: usize,

    encoding: TextEncoding,
    content_kind: ContentKind,
}

impl ChunkBuf {
    /// Creates an empty buffer bound to the given content kind and text encoding.
    ///
    /// Both are fixed for the lifetime of the buffer.
    #[must_use]
    pub fn new(content_kind: ContentKind, encoding: TextEncoding) -> Self {
        Self {
            chunks: SmallVec::new(),
            len: 0,
            encoding,
            content_kind,
        }
    }

    /// Creates an empty buffer, resolving the text encoding from a charset name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedEncoding`][crate::Error::UnsupportedEncoding] if the
    /// name is not recognized.
    pub fn with_encoding_name(content_kind: ContentKind, charset_name: &str) -> Result<Self> {
        Ok(Self::new(content_kind, charset_name.parse()?))
    }

    /// Appends a chunk of pre-encoded bytes by reference, without copying.
    ///
    /// Zero-length chunks are legal and contribute nothing to the content.
    ///
    /// # Panics
    ///
    /// Panics if the total buffered length would exceed `usize::MAX` bytes.
    pub fn append_chunk(&mut self, chunk: Bytes) {
        self.len = self
            .len
            .checked_add(chunk.len())
            .expect("attempted to buffer more than usize::MAX bytes");

        self.chunks.push(chunk);
    }

    /// Appends a copy of the given bytes as a new chunk.
    ///
    /// Prefer [`append_chunk()`][Self::append_chunk] when the data already lives in a
    /// [`Bytes`] - this method exists for content that only exists as a transient slice.
    pub fn append_slice(&mut self, slice: &[u8]) {
        self.append_chunk(Bytes::copy_from_slice(slice));
    }

    /// Encodes a text fragment with the buffer's encoding and appends it as a new chunk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unencodable`][crate::Error::Unencodable] if the fragment contains
    /// a character the encoding cannot represent. The buffer is left untouched in that
    /// case - a failed append changes neither the chunk sequence nor [`len()`][Self::len].
    pub fn append_text(&mut self, text: &str) -> Result<()> {
        let chunk = self.encoding.encode(text)?;
        self.append_chunk(chunk);

        Ok(())
    }

    /// The total number of content bytes buffered so far. O(1).
    #[must_use]
    pub fn len(&self) -> usize {
        // Sanity check.
        debug_assert_eq!(self.len, self.chunks.iter().map(Bytes::len).sum::<usize>());

        self.len
    }

    /// Whether nothing has been buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of chunks, including zero-length ones.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// The stored chunk sequence, in content order.
    #[must_use]
    pub fn chunks(&self) -> &[Bytes] {
        &self.chunks
    }

    /// The text encoding fixed at construction.
    #[must_use]
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// The content kind fixed at construction.
    #[must_use]
    pub fn content_kind(&self) -> ContentKind {
        self.content_kind
    }

    /// Materializes the contents into one contiguous byte buffer.
    ///
    /// This is the expensive primitive every "eager" consumer relies on: one allocation of
    /// [`len()`][Self::len] bytes and one copy of every chunk, in append order. Use it when
    /// a collaborator needs the whole payload as a unit (e.g. to set a content-length
    /// header); use a reader to stream without the upfront copy.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.len);

        for chunk in &self.chunks {
            bytes.extend_from_slice(chunk);
        }

        bytes
    }

    /// Decodes the entire contents back into text using the buffer's encoding.
    ///
    /// The buffer is materialized first and decoded as a whole. Decoding chunk by chunk
    /// would be wrong: an encoded character may legally straddle a chunk boundary, and
    /// per-chunk decoding would tear it apart.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Undecodable`][crate::Error::Undecodable] if the accumulated bytes
    /// do not form valid text in the buffer's encoding (possible when raw chunks were
    /// appended alongside encoded text).
    pub fn to_text(&self) -> Result<String> {
        self.encoding.decode(self.to_vec())
    }

    /// Opens a reader that copies chunks directly into caller-supplied buffers.
    ///
    /// Allocation-free; see [`ScatterReader`].
    #[must_use]
    pub fn scatter_reader(&self) -> ScatterReader<'_> {
        self.observe_reader_opened();

        ScatterReader::new(ChunkCursor::new(&self.chunks, self.len))
    }

    /// Opens a reader over one contiguous upfront copy of the contents.
    ///
    /// Pays the [`to_vec()`][Self::to_vec] materialization cost at open time; see
    /// [`MaterializedReader`].
    #[must_use]
    pub fn materialized_reader(&self) -> MaterializedReader {
        self.observe_reader_opened();

        MaterializedReader::new(self.to_vec())
    }

    /// Opens a pull-style reader for per-byte and borrowed-slab consumption.
    ///
    /// Allocation-free; see [`ChunkReader`].
    #[must_use]
    pub fn chunk_reader(&self) -> ChunkReader<'_> {
        self.observe_reader_opened();

        ChunkReader::new(ChunkCursor::new(&self.chunks, self.len))
    }

    fn observe_reader_opened(&self) {
        // We can use this to fine-tune the inline chunk count once we have real-world data.
        READER_OPENED_CHUNKS.with(|x| x.observe(self.chunks.len()));
    }
}

const CHUNK_COUNT_BUCKETS: &[Magnitude] = &[0, 1, 2, 4, 8, 16, 32];

thread_local! {
    static READER_OPENED_CHUNKS: Event = Event::builder()
        .name("scatterbuf_reader_opened_chunks")
        .histogram(CHUNK_COUNT_BUCKETS)
        .build();
}
