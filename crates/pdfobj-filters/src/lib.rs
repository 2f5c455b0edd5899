//! Invertible byte transforms for PDF stream filters.
//!
//! This crate provides the filter pipeline building blocks used by stream
//! objects: each filter is a pure transform with an `encode` and a `decode`
//! direction, and `decode(encode(x)) == x` for every byte sequence `x`.
//!
//! Supported filters:
//! - `FlateDecode` — zlib/deflate compression
//! - `ASCIIHexDecode` — two hex digits per byte
//! - `ASCII85Decode` — base-85 with `z` zero-group shorthand
//! - `RunLengthDecode` — byte-oriented run-length coding
//!
//! # Example
//!
//! ```
//! use pdfobj_filters::Filter;
//!
//! let filter = Filter::from_name("ASCIIHexDecode").unwrap();
//! let encoded = filter.encode(b"hi").unwrap();
//! assert_eq!(encoded, b"6869>");
//! assert_eq!(filter.decode(&encoded).unwrap(), b"hi");
//! ```

use thiserror::Error;

mod ascii85;
mod ascii_hex;
mod flate;
mod run_length;

/// Error type for filter transforms.
///
/// Encoding never fails for the supported filter set; every variant here
/// describes corrupt input met while decoding.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The zlib stream could not be inflated or deflated.
    #[error("corrupt flate stream: {0}")]
    Flate(String),
    /// A byte outside `0-9 a-f A-F`, whitespace, and `>` in ASCIIHex data.
    #[error("invalid character 0x{0:02x} in ASCIIHex data")]
    InvalidHexDigit(u8),
    /// Malformed ASCII85 data (character out of range, `z` inside a group,
    /// group overflow, or a single trailing digit).
    #[error("invalid ASCII85 data: {0}")]
    InvalidAscii85(&'static str),
    /// A run-length chunk claims more bytes than the input holds.
    #[error("truncated run-length data")]
    TruncatedRun,
}

/// The closed set of supported stream filters.
///
/// Filter names not in this set are a recoverable condition for callers
/// ([`Filter::from_name`] returns `None`); how to recover is the stream
/// object's decision, not this crate's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    Flate,
    AsciiHex,
    Ascii85,
    RunLength,
}

impl Filter {
    /// Every supported filter, in no particular order.
    pub const ALL: [Filter; 4] = [
        Filter::Flate,
        Filter::AsciiHex,
        Filter::Ascii85,
        Filter::RunLength,
    ];

    /// Resolves a PDF filter name to a supported filter.
    pub fn from_name(name: &str) -> Option<Filter> {
        match name {
            "FlateDecode" => Some(Filter::Flate),
            "ASCIIHexDecode" => Some(Filter::AsciiHex),
            "ASCII85Decode" => Some(Filter::Ascii85),
            "RunLengthDecode" => Some(Filter::RunLength),
            _ => None,
        }
    }

    /// The canonical PDF name of this filter.
    pub fn name(self) -> &'static str {
        match self {
            Filter::Flate => "FlateDecode",
            Filter::AsciiHex => "ASCIIHexDecode",
            Filter::Ascii85 => "ASCII85Decode",
            Filter::RunLength => "RunLengthDecode",
        }
    }

    /// Applies the filter in the encode direction (payload to wire bytes).
    pub fn encode(self, data: &[u8]) -> Result<Vec<u8>, FilterError> {
        match self {
            Filter::Flate => flate::encode(data),
            Filter::AsciiHex => Ok(ascii_hex::encode(data)),
            Filter::Ascii85 => Ok(ascii85::encode(data)),
            Filter::RunLength => Ok(run_length::encode(data)),
        }
    }

    /// Applies the filter in the decode direction (wire bytes to payload).
    pub fn decode(self, data: &[u8]) -> Result<Vec<u8>, FilterError> {
        match self {
            Filter::Flate => flate::decode(data),
            Filter::AsciiHex => ascii_hex::decode(data),
            Filter::Ascii85 => ascii85::decode(data),
            Filter::RunLength => run_length::decode(data),
        }
    }
}
