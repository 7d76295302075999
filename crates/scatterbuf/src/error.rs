// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io;

use crate::TextEncoding;

/// A `Result` that may contain an [`Error`] from this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// An error from a chunked buffer operation.
///
/// Every variant is a deterministic function of misuse (reading a closed reader, text that
/// does not fit the configured encoding) - nothing in this crate performs fallible I/O of
/// its own, so there is never anything to retry.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A read was issued on a reader that has already been closed.
    ///
    /// This is distinct from end of stream: an exhausted reader keeps reporting
    /// "no more data" without error, while a closed one always fails.
    #[error("reader is closed")]
    Closed,

    /// A character encoding was requested by a name this crate does not recognize.
    #[error("unsupported encoding name: {0}")]
    UnsupportedEncoding(String),

    /// A text fragment contained a character that is not representable in the
    /// buffer's encoding. The buffer is left untouched by the failed append.
    #[error("character {character:?} is not representable in {encoding}")]
    Unencodable {
        /// The first offending character of the fragment.
        character: char,

        /// The encoding that could not represent it.
        encoding: TextEncoding,
    },

    /// The buffered bytes do not form valid text in the buffer's encoding.
    #[error("buffered bytes are not valid {encoding} past offset {valid_up_to}")]
    Undecodable {
        /// The encoding the bytes were decoded with.
        encoding: TextEncoding,

        /// How many bytes from the start of the buffer decoded cleanly.
        valid_up_to: usize,
    },
}

impl From<Error> for io::Error {
    fn from(error: Error) -> Self {
        match error {
            Error::Closed => Self::new(io::ErrorKind::NotConnected, error),
            other => Self::other(other),
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync);

    #[test]
    fn closed_maps_to_not_connected() {
        let error = io::Error::from(Error::Closed);

        assert_eq!(error.kind(), io::ErrorKind::NotConnected);
    }

    #[test]
    fn encoding_errors_map_to_other() {
        let error = io::Error::from(Error::UnsupportedEncoding("EBCDIC".to_string()));

        assert_eq!(error.kind(), io::ErrorKind::Other);
    }

    #[test]
    fn display_names_the_offender() {
        let error = Error::Unencodable {
            character: 'ö',
            encoding: TextEncoding::Ascii,
        };

        assert!(error.to_string().contains("US-ASCII"));
    }
}
