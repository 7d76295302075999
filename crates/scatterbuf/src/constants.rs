// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// If a `ChunkBuf` holds no more than this many chunks, the chunk list metadata
/// (and only the metadata) is stored entirely inline, without a separate heap allocation.
///
/// Typical rendered output interleaves a handful of static chunks with encoded text
/// fragments, so most buffers are expected to stay under this threshold. This is purely
/// an efficiency fine-tuning knob and does not have any effect on correctness.
///
/// This is contractually PRIVATE but is marked `pub` so benchmarks can reference it.
#[doc(hidden)]
pub const MAX_INLINE_CHUNKS: usize = 8;
