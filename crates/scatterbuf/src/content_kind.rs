// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// The kind of content a [`ChunkBuf`][crate::ChunkBuf] holds.
///
/// The buffer itself treats all content as opaque bytes. The kind is carried as metadata,
/// fixed at construction, so that collaborators (e.g. the renderer deciding on escaping, or
/// a sink choosing a content-type header) can query what they are dealing with.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ContentKind {
    /// Markup output. Producers are expected to escape text fragments before appending.
    Html,

    /// Unprocessed output, appended verbatim.
    Raw,
}
