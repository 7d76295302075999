// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;

use crate::{Error, Result};

/// The character encoding a [`ChunkBuf`][crate::ChunkBuf] uses to convert text fragments
/// to bytes at append time.
///
/// The encoding is fixed at buffer construction and applies symmetrically: text fragments
/// are encoded with it on append, and [`to_text()`][crate::ChunkBuf::to_text] decodes the
/// materialized contents with it. There is intentionally no transcoding, normalization or
/// other charset logic beyond this append-time conversion.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum TextEncoding {
    /// UTF-8. Encoding never fails; decoding fails on invalid byte sequences.
    #[default]
    Utf8,

    /// 7-bit US-ASCII. Both directions fail on anything outside the 0x00..=0x7F range.
    Ascii,

    /// ISO-8859-1. Encoding fails for characters above U+00FF; decoding never fails
    /// because every byte maps to exactly one character.
    Latin1,
}

impl TextEncoding {
    /// The canonical name of the encoding, matching what [`FromStr`] accepts.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Ascii => "US-ASCII",
            Self::Latin1 => "ISO-8859-1",
        }
    }

    /// Encodes a text fragment into a standalone chunk of bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unencodable`] if the fragment contains a character the
    /// encoding cannot represent. Nothing is produced in that case.
    pub fn encode(self, text: &str) -> Result<Bytes> {
        match self {
            Self::Utf8 => Ok(Bytes::copy_from_slice(text.as_bytes())),
            Self::Ascii => {
                if let Some(character) = text.chars().find(|c| !c.is_ascii()) {
                    return Err(Error::Unencodable {
                        character,
                        encoding: self,
                    });
                }

                // ASCII text is byte-for-byte identical to its UTF-8 representation.
                Ok(Bytes::copy_from_slice(text.as_bytes()))
            }
            Self::Latin1 => {
                let mut bytes = Vec::with_capacity(text.len());

                for character in text.chars() {
                    let Ok(byte) = u8::try_from(u32::from(character)) else {
                        return Err(Error::Unencodable {
                            character,
                            encoding: self,
                        });
                    };

                    bytes.push(byte);
                }

                Ok(Bytes::from(bytes))
            }
        }
    }

    /// Decodes a complete materialized byte sequence into text.
    ///
    /// This always operates on the whole sequence at once. An encoded character may legally
    /// straddle a chunk boundary, so decoding chunk by chunk would tear multi-byte
    /// characters apart - which is why the chunked buffer materializes before decoding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Undecodable`] if the bytes do not form valid text in this encoding,
    /// reporting how many leading bytes decoded cleanly.
    pub fn decode(self, bytes: Vec<u8>) -> Result<String> {
        match self {
            Self::Utf8 => String::from_utf8(bytes).map_err(|error| Error::Undecodable {
                encoding: self,
                valid_up_to: error.utf8_error().valid_up_to(),
            }),
            Self::Ascii => {
                if let Some(position) = bytes.iter().position(|byte| !byte.is_ascii()) {
                    return Err(Error::Undecodable {
                        encoding: self,
                        valid_up_to: position,
                    });
                }

                Ok(String::from_utf8(bytes).expect("ASCII bytes are always valid UTF-8"))
            }
            Self::Latin1 => Ok(bytes.iter().copied().map(char::from).collect()),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextEncoding {
    type Err = Error;

    /// Parses an encoding from a charset name, accepting common aliases case-insensitively.
    fn from_str(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "us-ascii" | "ascii" => Ok(Self::Ascii),
            "iso-8859-1" | "latin-1" | "latin1" => Ok(Self::Latin1),
            _ => Err(Error::UnsupportedEncoding(name.to_string())),
        }
    }
}
